//! Groups raw fueling transactions into weekly periods.
//!
//! A period window opens on the date of the earliest transaction not yet
//! grouped and spans that day plus the following six. Windows are therefore
//! anchored to the data rather than to calendar weeks, and never overlap.

use chrono::{Datelike, Days, NaiveDate};
use fleet_api::endpoints::transactions::{ExpenseCategory, FuelType, Transaction};
use std::collections::BTreeSet;
use std::fmt::Display;
use uuid::Uuid;

const PERIOD_SPAN_DAYS: u64 = 6;

/// Stable identifier of a period, derived from its window and first transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeriodId(Uuid);

impl PeriodId {
    fn derive(week_key: NaiveDate, first_transaction: &Transaction) -> Self {
        let name = format!("{}/{}", week_key.format("%Y-%m-%d"), first_transaction.id);
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()))
    }
}

impl Display for PeriodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Weekly aggregate of one or more transactions. Rebuilt on every ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct Period {
    pub id: PeriodId,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Distinct providers in first-seen order.
    pub providers: Vec<String>,
    pub fuel_type: FuelType,
    pub total_liters: f64,
    pub total_value: f64,
    pub unit_price: f64,
    pub odometer: u64,
    /// Weekdays with at least one fueling, 0 = Sunday.
    pub fueling_days: BTreeSet<u8>,
    pub fueling_dates: Vec<NaiveDate>,
    pub fueling_count: usize,
    pub category: Option<ExpenseCategory>,
}

impl Period {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.period_start <= date && date <= self.period_end
    }

    pub fn providers_label(&self) -> String {
        self.providers.join(", ")
    }
}

pub fn aggregate(transactions: &[Transaction]) -> Vec<Period> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    // sort_by_key is stable, equal timestamps keep their input order
    sorted.sort_by_key(|t| t.date);

    let mut periods = Vec::new();
    let mut rest = sorted.as_slice();
    while let Some(anchor) = rest.first() {
        let start = anchor.date.date();
        let end = start
            .checked_add_days(Days::new(PERIOD_SPAN_DAYS))
            .unwrap_or(NaiveDate::MAX);
        let len = rest.iter().take_while(|t| t.date.date() <= end).count();
        let (window, tail) = rest.split_at(len);
        periods.push(build_period(start, end, window));
        rest = tail;
    }

    periods
}

fn build_period(start: NaiveDate, end: NaiveDate, window: &[&Transaction]) -> Period {
    let first = window[0];

    let mut providers: Vec<String> = Vec::new();
    let mut fueling_days = BTreeSet::new();
    let mut fueling_dates = Vec::with_capacity(window.len());
    let mut total_liters = 0.0;
    let mut total_value = 0.0;
    let mut odometer = 0;
    let mut category = None;

    for t in window {
        if !providers.iter().any(|p| p == &t.provider) {
            providers.push(t.provider.clone());
        }
        let date = t.date.date();
        fueling_days.insert(date.weekday().num_days_from_sunday() as u8);
        fueling_dates.push(date);
        total_liters += t.liters;
        total_value += t.total_value;
        odometer = odometer.max(t.odometer);
        if category.is_none() {
            category = t.category;
        }
    }

    Period {
        id: PeriodId::derive(start, first),
        period_start: start,
        period_end: end,
        providers,
        fuel_type: first.fuel_type,
        total_liters,
        total_value,
        unit_price: mean_unit_price(window),
        odometer,
        fueling_days,
        fueling_dates,
        fueling_count: window.len(),
        category,
    }
}

/// Mean of each transaction's own price per liter. A missing price falls back
/// to value/liters, and is skipped when the transaction has no liters.
fn mean_unit_price(window: &[&Transaction]) -> f64 {
    if window.iter().all(|t| t.liters <= 0.0) {
        return 0.0;
    }

    let prices: Vec<f64> = window
        .iter()
        .filter_map(|t| {
            if t.unit_price > 0.0 {
                Some(t.unit_price)
            } else if t.liters > 0.0 {
                Some(t.total_value / t.liters)
            } else {
                None
            }
        })
        .collect();

    if prices.is_empty() {
        0.0
    } else {
        prices.iter().sum::<f64>() / prices.len() as f64
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use fleet_api::endpoints::{
        transactions::{FuelType, Transaction},
        TransactionId,
    };

    pub fn tx(id: &str, date: &str, liters: f64, total_value: f64) -> Transaction {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Transaction {
            id: TransactionId::new(id),
            date,
            provider: "Posto Ipiranga".to_string(),
            fuel_type: FuelType::Diesel,
            liters,
            total_value,
            unit_price: 0.0,
            odometer: 1000,
            category: None,
        }
    }

    /// Mon W1, Wed W1 and Mon W2 of March 2024.
    pub fn two_week_fixture() -> Vec<Transaction> {
        vec![
            tx("a", "2024-03-04", 10.0, 50.0),
            tx("b", "2024-03-06", 20.0, 100.0),
            tx("c", "2024-03-11", 15.0, 75.0),
        ]
    }
}
