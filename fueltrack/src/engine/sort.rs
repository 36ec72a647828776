use super::aggregator::Period;
use super::columns::ColumnId;
use std::cmp::Ordering;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    None,
    Asc,
    Desc,
}

impl SortDirection {
    /// asc → desc → none → asc
    pub fn next(&self) -> Self {
        match self {
            Self::None => Self::Asc,
            Self::Asc => Self::Desc,
            Self::Desc => Self::None,
        }
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Asc => "▲",
            Self::Desc => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: ColumnId,
    pub direction: SortDirection,
}

/// At most one active `(column, direction)` pair.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    active: Option<SortSpec>,
}

impl SortState {
    pub fn active(&self) -> Option<SortSpec> {
        self.active
    }

    pub fn direction_of(&self, column: ColumnId) -> SortDirection {
        match self.active {
            Some(spec) if spec.column == column => spec.direction,
            _ => SortDirection::None,
        }
    }

    pub fn toggle(&mut self, column: ColumnId) {
        let direction = match self.active {
            Some(spec) if spec.column == column => spec.direction.next(),
            _ => SortDirection::Asc,
        };

        tracing::debug!("Sort {:?} -> {:?}", column, direction);
        self.active = Some(SortSpec { column, direction });
    }
}

/// Stable sort; with no active direction the input order is kept untouched.
pub fn apply_sort(periods: &mut [&Period], state: &SortState) {
    let Some(spec) = state.active else {
        return;
    };

    match spec.direction {
        SortDirection::None => {}
        SortDirection::Asc => periods.sort_by(|a, b| compare(spec.column, a, b)),
        // swap operands instead of reversing so ties keep their order
        SortDirection::Desc => periods.sort_by(|a, b| compare(spec.column, b, a)),
    }
}

fn compare(column: ColumnId, a: &Period, b: &Period) -> Ordering {
    match column {
        ColumnId::Period => a.period_start.cmp(&b.period_start),
        ColumnId::Provider => a
            .providers_label()
            .to_lowercase()
            .cmp(&b.providers_label().to_lowercase()),
        ColumnId::FuelType => a
            .fuel_type
            .label()
            .to_lowercase()
            .cmp(&b.fuel_type.label().to_lowercase()),
        ColumnId::Category => {
            let label = |p: &Period| p.category.map(|c| c.label().to_lowercase());
            label(a).cmp(&label(b))
        }
        ColumnId::Liters => a.total_liters.total_cmp(&b.total_liters),
        ColumnId::Value => a.total_value.total_cmp(&b.total_value),
        ColumnId::UnitPrice => a.unit_price.total_cmp(&b.unit_price),
        ColumnId::Odometer => a.odometer.cmp(&b.odometer),
        ColumnId::FuelingDays => a.fueling_days.len().cmp(&b.fueling_days.len()),
        ColumnId::FuelingCount => a.fueling_count.cmp(&b.fueling_count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::aggregator::{aggregate, test_support::*};

    #[test]
    fn toggling_one_column_cycles_through_three_states() {
        let mut state = SortState::default();
        let mut seen = Vec::new();
        for _ in 0..4 {
            state.toggle(ColumnId::Value);
            seen.push(state.direction_of(ColumnId::Value));
        }

        assert_eq!(
            seen,
            vec![
                SortDirection::Asc,
                SortDirection::Desc,
                SortDirection::None,
                SortDirection::Asc
            ]
        );
    }

    #[test]
    fn switching_columns_restarts_at_ascending() {
        let mut state = SortState::default();
        state.toggle(ColumnId::Value);
        state.toggle(ColumnId::Value);
        state.toggle(ColumnId::Liters);

        assert_eq!(state.direction_of(ColumnId::Liters), SortDirection::Asc);
        assert_eq!(state.direction_of(ColumnId::Value), SortDirection::None);
    }

    #[test]
    fn sorts_periods_by_value_both_ways() {
        let periods = aggregate(&two_week_fixture());
        let mut state = SortState::default();

        state.toggle(ColumnId::Value);
        let mut rows: Vec<&Period> = periods.iter().collect();
        apply_sort(&mut rows, &state);
        assert_eq!(rows[0].id, periods[1].id);
        assert_eq!(rows[1].id, periods[0].id);

        state.toggle(ColumnId::Value);
        let mut rows: Vec<&Period> = periods.iter().collect();
        apply_sort(&mut rows, &state);
        assert_eq!(rows[0].id, periods[0].id);
        assert_eq!(rows[1].id, periods[1].id);
    }

    #[test]
    fn none_direction_keeps_aggregate_order() {
        let periods = aggregate(&two_week_fixture());
        let mut state = SortState::default();
        for _ in 0..3 {
            state.toggle(ColumnId::Value);
        }

        let mut rows: Vec<&Period> = periods.iter().rev().collect();
        apply_sort(&mut rows, &state);
        assert_eq!(rows[0].id, periods[1].id);
    }

    #[test]
    fn equal_keys_keep_relative_order_in_both_directions() {
        // four single-transaction weeks, two pairs with equal liters
        let periods = aggregate(&[
            tx("a", "2024-01-01", 10.0, 50.0),
            tx("b", "2024-01-08", 20.0, 90.0),
            tx("c", "2024-01-15", 10.0, 55.0),
            tx("d", "2024-01-22", 20.0, 95.0),
        ]);
        let mut state = SortState::default();
        state.toggle(ColumnId::Liters);

        let mut rows: Vec<&Period> = periods.iter().collect();
        apply_sort(&mut rows, &state);
        let values: Vec<f64> = rows.iter().map(|p| p.total_value).collect();
        assert_eq!(values, vec![50.0, 55.0, 90.0, 95.0]);

        state.toggle(ColumnId::Liters);
        let mut rows: Vec<&Period> = periods.iter().collect();
        apply_sort(&mut rows, &state);
        let values: Vec<f64> = rows.iter().map(|p| p.total_value).collect();
        assert_eq!(values, vec![90.0, 95.0, 50.0, 55.0]);
    }

    #[test]
    fn text_columns_ignore_case() {
        let mut upper = tx("a", "2024-01-01", 10.0, 50.0);
        upper.provider = "Zeta".to_string();
        let mut lower = tx("b", "2024-01-08", 10.0, 50.0);
        lower.provider = "alpha".to_string();
        let periods = aggregate(&[upper, lower]);

        let mut state = SortState::default();
        state.toggle(ColumnId::Provider);
        let mut rows: Vec<&Period> = periods.iter().collect();
        apply_sort(&mut rows, &state);

        assert_eq!(rows[0].providers, vec!["alpha"]);
    }
}
