//! Text of table cells.

use crate::engine::aggregator::Period;
use crate::engine::columns::ColumnId;
use itertools::Itertools;

const WEEKDAY_INITIALS: [char; 7] = ['S', 'M', 'T', 'W', 'T', 'F', 'S'];

pub fn fmt_currency(prefix: &str, amount: f64) -> String {
    format!("{} {}", prefix, fmt_decimal(amount, 2))
}

/// Fixed decimals with `,` as the decimal separator and `.` grouping thousands.
pub fn fmt_decimal(amount: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, amount.abs());
    let (integer, fraction) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), ""));

    let grouped = integer
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .join(".");
    let sign = if amount < 0.0 { "-" } else { "" };

    if fraction.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped},{fraction}")
    }
}

pub fn fmt_period(period: &Period) -> String {
    format!(
        "{} - {}",
        period.period_start.format("%d/%m/%Y"),
        period.period_end.format("%d/%m/%Y")
    )
}

/// One letter per weekday from Sunday, `·` where nothing was fueled.
pub fn fmt_days(period: &Period) -> String {
    WEEKDAY_INITIALS
        .iter()
        .enumerate()
        .map(|(day, initial)| {
            if period.fueling_days.contains(&(day as u8)) {
                *initial
            } else {
                '·'
            }
        })
        .join("")
}

pub fn cell_text(period: &Period, column: ColumnId, currency_prefix: &str) -> String {
    match column {
        ColumnId::Period => fmt_period(period),
        ColumnId::Provider => period.providers_label(),
        ColumnId::FuelType => period.fuel_type.label().to_string(),
        ColumnId::Liters => format!("{} L", fmt_decimal(period.total_liters, 2)),
        ColumnId::Value => fmt_currency(currency_prefix, period.total_value),
        ColumnId::UnitPrice => format!("{}/L", fmt_decimal(period.unit_price, 3)),
        ColumnId::Odometer => format!("{} km", fmt_decimal(period.odometer as f64, 0)),
        ColumnId::FuelingDays => fmt_days(period),
        ColumnId::FuelingCount => period.fueling_count.to_string(),
        ColumnId::Category => period
            .category
            .as_ref()
            .map(|c| c.label().to_string())
            .unwrap_or_else(|| "-".to_string()),
    }
}

/// Pad `text` to `width` cells, keeping one blank cell as column spacing.
/// Numeric columns are right-aligned.
pub fn pad(text: &str, width: u16, right_align: bool) -> String {
    let inner = usize::from(width.saturating_sub(1));
    let text: String = text.chars().take(inner).collect();
    if right_align {
        format!("{text:>inner$} ")
    } else {
        format!("{text:<inner$} ")
    }
}
