use super::aggregator::Period;
use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("expected START..END, got '{0}'")]
    MissingSeparator(String),
    #[error("'{0}' is not a date (YYYY-MM-DD)")]
    InvalidDate(String),
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Bounds given in reverse are swapped.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Parse `YYYY-MM-DD..YYYY-MM-DD`. Blank input clears the range.
    pub fn parse(input: &str) -> Result<Option<Self>, DateRangeError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        let (start, end) = input
            .split_once("..")
            .ok_or_else(|| DateRangeError::MissingSeparator(input.to_string()))?;

        Ok(Some(Self::new(parse_date(start)?, parse_date(end)?)))
    }

    fn overlaps(&self, period: &Period) -> bool {
        self.contains(period.period_start)
            || self.contains(period.period_end)
            || (period.period_start <= self.start && self.end <= period.period_end)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, DateRangeError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| DateRangeError::InvalidDate(s.to_string()))
}

/// Keep the periods overlapping `range`, in their original order.
pub fn filter_periods<'a>(periods: &'a [Period], range: Option<&DateRange>) -> Vec<&'a Period> {
    match range {
        None => periods.iter().collect(),
        Some(range) => periods.iter().filter(|p| range.overlaps(p)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::aggregator::{aggregate, test_support::*};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn no_range_keeps_everything() {
        let periods = aggregate(&two_week_fixture());
        assert_eq!(filter_periods(&periods, None).len(), 2);
    }

    #[test]
    fn keeps_periods_overlapping_by_start_end_or_span() {
        // 2024-03-04..10 and 2024-03-11..17
        let periods = aggregate(&two_week_fixture());

        let end_inside = DateRange::new(date("2024-03-08"), date("2024-03-09"));
        let kept = filter_periods(&periods, Some(&end_inside));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, periods[0].id);

        let start_inside = DateRange::new(date("2024-03-01"), date("2024-03-04"));
        assert_eq!(filter_periods(&periods, Some(&start_inside)).len(), 1);

        let straddles = DateRange::new(date("2024-03-10"), date("2024-03-11"));
        assert_eq!(filter_periods(&periods, Some(&straddles)).len(), 2);

        let before = DateRange::new(date("2024-02-01"), date("2024-02-20"));
        assert!(filter_periods(&periods, Some(&before)).is_empty());
    }

    #[test]
    fn parses_and_normalises_ranges() {
        assert_eq!(DateRange::parse("  ").unwrap(), None);

        let range = DateRange::parse("2024-03-31..2024-03-01").unwrap().unwrap();
        assert_eq!(range.start, date("2024-03-01"));
        assert_eq!(range.to_string(), "2024-03-01..2024-03-31");

        assert!(matches!(
            DateRange::parse("2024-03-01"),
            Err(DateRangeError::MissingSeparator(_))
        ));
        assert!(matches!(
            DateRange::parse("2024-03-01..soon"),
            Err(DateRangeError::InvalidDate(_))
        ));
    }
}
