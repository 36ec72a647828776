use super::aggregator::{Period, PeriodId};
use crate::source::TransactionSource;
use fleet_api::endpoints::{
    transactions::{Transaction, TransactionPatch},
    TransactionId,
};
use std::collections::BTreeSet;

/// Aggregate fields that can be edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EditField {
    Value,
    Liters,
    UnitPrice,
    Odometer,
}

impl EditField {
    /// Name of the transaction field the aggregate field maps to.
    pub fn transaction_field(&self) -> &'static str {
        match self {
            Self::Value => "totalValue",
            Self::Liters => "liters",
            Self::UnitPrice => "unitPrice",
            Self::Odometer => "odometer",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Liters => "liters",
            Self::UnitPrice => "unit price",
            Self::Odometer => "odometer",
        }
    }

    fn patch(&self, value: f64) -> TransactionPatch {
        let mut patch = TransactionPatch::default();
        match self {
            Self::Value => patch.total_value = Some(value),
            Self::Liters => patch.liters = Some(value),
            Self::UnitPrice => patch.unit_price = Some(value),
            Self::Odometer => patch.odometer = Some(value as u64),
        }
        patch
    }
}

impl std::fmt::Display for EditField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("'{0}' is not a valid number")]
    InvalidInput(String),
    #[error("period groups {count} fuelings, edit a single-fueling period instead")]
    AmbiguousEdit { period_id: PeriodId, count: usize },
    #[error("period {0} no longer exists")]
    UnknownPeriod(PeriodId),
    #[error("no transaction found inside period {0}")]
    NoMatchingTransaction(PeriodId),
    #[error("an edit of {field} is already pending for this period")]
    EditPending { period_id: PeriodId, field: EditField },
    #[error("write-back failed: {0}")]
    WriteBackFailed(String),
}

// 2^64, the first value a u64 odometer cannot hold
const ODOMETER_LIMIT: f64 = u64::MAX as f64;

/// Prefixes and suffixes that may decorate a displayed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueDecorations {
    prefixes: Vec<String>,
    suffixes: Vec<String>,
}

impl Default for ValueDecorations {
    fn default() -> Self {
        Self::with_currency("R$")
    }
}

impl ValueDecorations {
    pub fn with_currency(currency_prefix: &str) -> Self {
        let mut prefixes = vec![currency_prefix.to_string(), "R$".to_string(), "$".to_string()];
        prefixes.retain(|p| !p.is_empty());
        // longest first so "R$" wins over "$"
        prefixes.sort_by_key(|p| std::cmp::Reverse(p.len()));
        prefixes.dedup();

        Self {
            prefixes,
            suffixes: ["/L", "/l", "km", "L", "l"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    fn strip<'a>(&self, raw: &'a str) -> &'a str {
        let mut value = raw.trim();
        if let Some(rest) = self.prefixes.iter().find_map(|p| value.strip_prefix(p.as_str())) {
            value = rest.trim_start();
        }
        if let Some(rest) = self.suffixes.iter().find_map(|s| value.strip_suffix(s.as_str())) {
            value = rest.trim_end();
        }
        value
    }

    /// Parse an edited value, tolerating decorations and a decimal comma.
    pub fn parse(&self, raw: &str, field: EditField) -> Result<f64, EditError> {
        let invalid = || EditError::InvalidInput(raw.to_string());
        let stripped = self.strip(raw);
        if stripped.is_empty() {
            return Err(invalid());
        }

        let normalised = normalise_separators(stripped);
        let value: f64 = normalised.parse().map_err(|_| invalid())?;

        if !value.is_finite() || value < 0.0 {
            return Err(invalid());
        }
        if field == EditField::Odometer && (value.fract() != 0.0 || value >= ODOMETER_LIMIT) {
            return Err(invalid());
        }

        Ok(value)
    }
}

/// The rightmost of `,` and `.` is the decimal separator, the other groups thousands.
/// Dots alone are grouping when every group after the first has exactly three digits,
/// matching how the table prints values.
fn normalise_separators(s: &str) -> String {
    match (s.rfind(','), s.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        (Some(_), None) => s.replace(',', "."),
        (None, Some(_)) if is_dot_grouped(s) => s.replace('.', ""),
        _ => s.to_string(),
    }
}

fn is_dot_grouped(s: &str) -> bool {
    let mut groups = s.split('.');
    let leading = groups.next().unwrap_or_default();
    (1..=3).contains(&leading.len())
        && groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()))
}

/// A validated single-field update for exactly one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteBack {
    pub period_id: PeriodId,
    pub field: EditField,
    pub transaction_id: TransactionId,
    pub patch: TransactionPatch,
}

/// Maps edited aggregate cells back to the transaction they represent.
#[derive(Default, Debug, Clone)]
pub struct Reconciler {
    decorations: ValueDecorations,
    pending: BTreeSet<(PeriodId, EditField)>,
}

impl Reconciler {
    pub fn new(decorations: ValueDecorations) -> Self {
        Self {
            decorations,
            pending: BTreeSet::new(),
        }
    }

    pub fn is_pending(&self, period_id: PeriodId, field: EditField) -> bool {
        self.pending.contains(&(period_id, field))
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Validate an edit and mark it pending. Nothing is marked on error.
    pub fn prepare(
        &mut self,
        periods: &[Period],
        transactions: &[Transaction],
        period_id: PeriodId,
        field: EditField,
        raw: &str,
    ) -> Result<WriteBack, EditError> {
        if self.is_pending(period_id, field) {
            return Err(EditError::EditPending { period_id, field });
        }

        let value = self.decorations.parse(raw, field)?;

        let period = periods
            .iter()
            .find(|p| p.id == period_id)
            .ok_or(EditError::UnknownPeriod(period_id))?;

        if period.fueling_count != 1 {
            return Err(EditError::AmbiguousEdit {
                period_id,
                count: period.fueling_count,
            });
        }

        let mut matching = transactions
            .iter()
            .filter(|t| period.contains(t.date.date()));
        let transaction = matching
            .next()
            .ok_or(EditError::NoMatchingTransaction(period_id))?;
        let extra = matching.count();
        if extra > 0 {
            return Err(EditError::AmbiguousEdit {
                period_id,
                count: extra + 1,
            });
        }

        self.pending.insert((period_id, field));
        tracing::info!(
            "Writing {}={} to transaction {}",
            field.transaction_field(),
            value,
            transaction.id
        );

        Ok(WriteBack {
            period_id,
            field,
            transaction_id: transaction.id.clone(),
            patch: field.patch(value),
        })
    }

    /// Clear the pending flag once the write-back round-trip finished.
    pub fn settle(&mut self, period_id: PeriodId, field: EditField) {
        self.pending.remove(&(period_id, field));
    }

    /// Validate, write back through `source` and settle.
    pub async fn update_field(
        &mut self,
        source: &dyn TransactionSource,
        periods: &[Period],
        transactions: &[Transaction],
        period_id: PeriodId,
        field: EditField,
        raw: &str,
    ) -> Result<Transaction, EditError> {
        let write_back = self.prepare(periods, transactions, period_id, field, raw)?;
        let result = source
            .update_transaction(&write_back.transaction_id, &write_back.patch)
            .await;
        self.settle(period_id, field);

        result.map_err(|e| {
            tracing::error!("Write-back to {} failed: {}", write_back.transaction_id, e);
            EditError::WriteBackFailed(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::aggregator::{aggregate, test_support::*};
    use crate::testing::RecordingSource;

    fn parse(raw: &str, field: EditField) -> Result<f64, EditError> {
        ValueDecorations::default().parse(raw, field)
    }

    #[test]
    fn strips_decorations_before_parsing() {
        assert_eq!(parse("R$ 120,50", EditField::Value), Ok(120.5));
        assert_eq!(parse("$99.9", EditField::Value), Ok(99.9));
        assert_eq!(parse("5,89/L", EditField::UnitPrice), Ok(5.89));
        assert_eq!(parse("40 L", EditField::Liters), Ok(40.0));
        assert_eq!(parse("123456 km", EditField::Odometer), Ok(123456.0));
        assert_eq!(parse("1.234,56", EditField::Value), Ok(1234.56));
        assert_eq!(parse("1,234.56", EditField::Value), Ok(1234.56));
        assert_eq!(parse("52.000 km", EditField::Odometer), Ok(52000.0));
        assert_eq!(parse("1.234.567", EditField::Odometer), Ok(1234567.0));
        assert_eq!(parse("1000.5", EditField::Value), Ok(1000.5));
    }

    #[test]
    fn displayed_cells_parse_back_to_their_values() {
        use crate::engine::columns::ColumnId;
        use crate::ui::format::cell_text;

        let mut transactions = two_week_fixture();
        for t in &mut transactions {
            t.odometer += 51_000;
            t.total_value += 1_000.0;
        }
        let periods = aggregate(&transactions);
        let decorations = ValueDecorations::default();

        for period in &periods {
            for (column, field, expected) in [
                (ColumnId::Value, EditField::Value, period.total_value),
                (ColumnId::Liters, EditField::Liters, period.total_liters),
                (ColumnId::UnitPrice, EditField::UnitPrice, period.unit_price),
                (ColumnId::Odometer, EditField::Odometer, period.odometer as f64),
            ] {
                let text = cell_text(period, column, "R$");
                let parsed = decorations.parse(&text, field).unwrap();
                let decimals = match field {
                    EditField::UnitPrice => 3,
                    EditField::Odometer => 0,
                    _ => 2,
                };
                let tolerance = 0.5 * 10f64.powi(-decimals);
                assert!(
                    (parsed - expected).abs() <= tolerance,
                    "{text} parsed as {parsed}, expected {expected}"
                );
            }
        }
    }

    #[test]
    fn odometer_beyond_u64_is_rejected() {
        assert!(matches!(
            parse("99999999999999999999999 km", EditField::Odometer),
            Err(EditError::InvalidInput(_))
        ));
        assert!(matches!(
            parse("18446744073709551616", EditField::Odometer),
            Err(EditError::InvalidInput(_))
        ));
        assert_eq!(parse("4000000000 km", EditField::Odometer), Ok(4_000_000_000.0));
    }

    #[test]
    fn displayed_odometer_round_trips_through_write_back() {
        let mut transactions = two_week_fixture();
        transactions[2].odometer = 52_000;
        let periods = aggregate(&transactions);
        let mut reconciler = Reconciler::default();

        let write_back = reconciler
            .prepare(&periods, &transactions, periods[1].id, EditField::Odometer, "52.000 km")
            .unwrap();

        assert_eq!(write_back.patch.odometer, Some(52_000));
    }

    #[test]
    fn rejects_non_numeric_values() {
        for raw in ["", "R$", "abc", "12abc", "-5", "NaN", "inf"] {
            assert!(
                matches!(parse(raw, EditField::Value), Err(EditError::InvalidInput(_))),
                "{raw} should be rejected"
            );
        }
        assert!(matches!(
            parse("1000.5 km", EditField::Odometer),
            Err(EditError::InvalidInput(_))
        ));
    }

    #[test]
    fn builds_single_field_patch_for_sole_transaction() {
        let transactions = two_week_fixture();
        let periods = aggregate(&transactions);
        let mut reconciler = Reconciler::default();

        let write_back = reconciler
            .prepare(&periods, &transactions, periods[1].id, EditField::Value, "R$ 80")
            .unwrap();

        assert_eq!(write_back.transaction_id, TransactionId::new("c"));
        assert_eq!(
            write_back.patch,
            TransactionPatch {
                total_value: Some(80.0),
                ..Default::default()
            }
        );
        assert!(reconciler.is_pending(periods[1].id, EditField::Value));
        assert!(!reconciler.is_pending(periods[1].id, EditField::Liters));
    }

    #[test]
    fn multi_transaction_periods_are_ambiguous() {
        let transactions = two_week_fixture();
        let periods = aggregate(&transactions);
        let mut reconciler = Reconciler::default();

        let result = reconciler.prepare(&periods, &transactions, periods[0].id, EditField::Liters, "12");

        assert_eq!(
            result,
            Err(EditError::AmbiguousEdit {
                period_id: periods[0].id,
                count: 2
            })
        );
        assert!(!reconciler.has_pending());
    }

    #[test]
    fn second_edit_of_pending_cell_is_rejected() {
        let transactions = two_week_fixture();
        let periods = aggregate(&transactions);
        let mut reconciler = Reconciler::default();
        let id = periods[1].id;

        reconciler
            .prepare(&periods, &transactions, id, EditField::Odometer, "2000")
            .unwrap();
        assert_eq!(
            reconciler.prepare(&periods, &transactions, id, EditField::Odometer, "2100"),
            Err(EditError::EditPending {
                period_id: id,
                field: EditField::Odometer
            })
        );
        // other fields of the same period are independent
        assert!(reconciler
            .prepare(&periods, &transactions, id, EditField::Liters, "16")
            .is_ok());

        reconciler.settle(id, EditField::Odometer);
        assert!(reconciler
            .prepare(&periods, &transactions, id, EditField::Odometer, "2100")
            .is_ok());
    }

    #[test]
    fn invalid_input_leaves_nothing_pending() {
        let transactions = two_week_fixture();
        let periods = aggregate(&transactions);
        let mut reconciler = Reconciler::default();

        let result = reconciler.prepare(&periods, &transactions, periods[1].id, EditField::Value, "lots");
        assert!(matches!(result, Err(EditError::InvalidInput(_))));
        assert!(!reconciler.has_pending());
    }

    #[tokio::test]
    async fn ambiguous_edit_issues_no_write_back() {
        let transactions = two_week_fixture();
        let periods = aggregate(&transactions);
        let source = RecordingSource::new(transactions.clone());
        let mut reconciler = Reconciler::default();

        for field in [
            EditField::Value,
            EditField::Liters,
            EditField::UnitPrice,
            EditField::Odometer,
        ] {
            let result = reconciler
                .update_field(&source, &periods, &transactions, periods[0].id, field, "10")
                .await;
            assert!(matches!(result, Err(EditError::AmbiguousEdit { .. })));
        }

        assert_eq!(source.update_count(), 0);
    }

    #[tokio::test]
    async fn successful_write_back_settles_pending_flag() {
        let transactions = two_week_fixture();
        let periods = aggregate(&transactions);
        let source = RecordingSource::new(transactions.clone());
        let mut reconciler = Reconciler::default();

        let updated = reconciler
            .update_field(&source, &periods, &transactions, periods[1].id, EditField::Liters, "18")
            .await
            .unwrap();

        assert_eq!(updated.liters, 18.0);
        assert_eq!(source.update_count(), 1);
        assert!(!reconciler.has_pending());
    }

    #[tokio::test]
    async fn failed_write_back_is_reported_and_settled() {
        let transactions = two_week_fixture();
        let periods = aggregate(&transactions);
        let source = RecordingSource::new(transactions.clone()).failing_updates();
        let mut reconciler = Reconciler::default();

        let result = reconciler
            .update_field(&source, &periods, &transactions, periods[1].id, EditField::Value, "80")
            .await;

        assert!(matches!(result, Err(EditError::WriteBackFailed(_))));
        assert!(!reconciler.has_pending());
    }
}
