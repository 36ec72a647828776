use super::columns::{default_columns, ColumnDef, ColumnId, ACTIONS_SLOT_WIDTH, SELECTION_SLOT_WIDTH};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinSide {
    Left,
    Right,
}

/// A position in the rendered column sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Row selection checkbox.
    Leading,
    Column(ColumnId),
    /// Row actions.
    Trailing,
}

/// The single pin mapping of a table. Layout is always derived from it and
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPins {
    columns: Vec<ColumnDef>,
    pins: BTreeMap<ColumnId, PinSide>,
    leading_width: u16,
    trailing_width: u16,
}

impl Default for ColumnPins {
    fn default() -> Self {
        Self::new(default_columns())
    }
}

impl ColumnPins {
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        let mut pins = BTreeMap::new();
        if columns.iter().any(|c| c.id == ColumnId::Period) {
            pins.insert(ColumnId::Period, PinSide::Left);
        }

        Self {
            columns,
            pins,
            leading_width: SELECTION_SLOT_WIDTH,
            trailing_width: ACTIONS_SLOT_WIDTH,
        }
    }

    /// Pinning a column to the side it is already on unpins it.
    pub fn toggle_pin(&mut self, column: ColumnId, side: PinSide) {
        if self.pins.get(&column) == Some(&side) {
            self.pins.remove(&column);
            tracing::debug!("Unpinned {:?}", column);
        } else {
            self.pins.insert(column, side);
            tracing::debug!("Pinned {:?} to {:?}", column, side);
        }
    }

    pub fn pin_of(&self, column: ColumnId) -> Option<PinSide> {
        self.pins.get(&column).copied()
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn leading_width(&self) -> u16 {
        self.leading_width
    }

    pub fn trailing_width(&self) -> u16 {
        self.trailing_width
    }

    pub fn width_of(&self, column: ColumnId) -> u16 {
        self.columns
            .iter()
            .find(|c| c.id == column)
            .map(|c| c.width)
            .unwrap_or(0)
    }

    fn with_pin(&self, pin: Option<PinSide>) -> impl Iterator<Item = &ColumnDef> + '_ {
        self.columns
            .iter()
            .filter(move |c| self.pin_of(c.id) == pin)
    }

    /// Columns ordered left-pinned, unpinned, right-pinned; each group in base order.
    pub fn ordered_columns(&self) -> Vec<ColumnDef> {
        self.with_pin(Some(PinSide::Left))
            .chain(self.with_pin(None))
            .chain(self.with_pin(Some(PinSide::Right)))
            .copied()
            .collect()
    }

    pub fn visual_order(&self) -> Vec<Slot> {
        std::iter::once(Slot::Leading)
            .chain(self.ordered_columns().into_iter().map(|c| Slot::Column(c.id)))
            .chain(std::iter::once(Slot::Trailing))
            .collect()
    }

    /// Sticky distance from the left edge. Only defined for left-pinned columns.
    pub fn left_offset(&self, column: ColumnId) -> Option<u16> {
        if self.pin_of(column) != Some(PinSide::Left) {
            return None;
        }

        let preceding: u16 = self
            .with_pin(Some(PinSide::Left))
            .take_while(|c| c.id != column)
            .map(|c| c.width)
            .sum();
        Some(self.leading_width + preceding)
    }

    /// Sticky distance from the right edge, not counting the actions slot.
    /// Only defined for right-pinned columns.
    pub fn right_offset(&self, column: ColumnId) -> Option<u16> {
        if self.pin_of(column) != Some(PinSide::Right) {
            return None;
        }

        let following: u16 = self
            .with_pin(Some(PinSide::Right))
            .skip_while(|c| c.id != column)
            .skip(1)
            .map(|c| c.width)
            .sum();
        Some(following)
    }

    /// True for the last left-pinned and the first right-pinned column.
    pub fn shows_divider(&self, column: ColumnId) -> bool {
        let last_left = self.with_pin(Some(PinSide::Left)).last().map(|c| c.id);
        let first_right = self.with_pin(Some(PinSide::Right)).next().map(|c| c.id);
        last_left == Some(column) || first_right == Some(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_starts_pinned_left() {
        let pins = ColumnPins::default();
        assert_eq!(pins.pin_of(ColumnId::Period), Some(PinSide::Left));
        assert_eq!(pins.pin_of(ColumnId::Provider), None);
    }

    #[test]
    fn toggling_same_side_twice_restores_pin_state() {
        let mut pins = ColumnPins::default();
        let original = pins.clone();

        pins.toggle_pin(ColumnId::Liters, PinSide::Left);
        assert_eq!(pins.pin_of(ColumnId::Liters), Some(PinSide::Left));
        pins.toggle_pin(ColumnId::Liters, PinSide::Left);
        assert_eq!(pins, original);

        pins.toggle_pin(ColumnId::Period, PinSide::Left);
        assert_eq!(pins.pin_of(ColumnId::Period), None);
        pins.toggle_pin(ColumnId::Period, PinSide::Left);
        assert_eq!(pins, original);
    }

    #[test]
    fn pinning_other_side_moves_the_column() {
        let mut pins = ColumnPins::default();
        pins.toggle_pin(ColumnId::Period, PinSide::Right);
        assert_eq!(pins.pin_of(ColumnId::Period), Some(PinSide::Right));
    }

    #[test]
    fn visual_order_places_pinned_blocks_against_fixed_slots() {
        let mut pins = ColumnPins::default();
        pins.toggle_pin(ColumnId::Provider, PinSide::Right);

        let order = pins.visual_order();
        assert_eq!(order[0], Slot::Leading);
        assert_eq!(order[1], Slot::Column(ColumnId::Period));
        assert_eq!(order[order.len() - 2], Slot::Column(ColumnId::Provider));
        assert_eq!(order[order.len() - 1], Slot::Trailing);
        assert_eq!(order.len(), ColumnId::ALL.len() + 2);
    }

    #[test]
    fn pinning_period_left_then_provider_right() {
        let mut pins = ColumnPins::default();
        pins.toggle_pin(ColumnId::Period, PinSide::Left);
        pins.toggle_pin(ColumnId::Provider, PinSide::Right);

        // period was already pinned left, so it is now the first unpinned column
        assert_eq!(pins.pin_of(ColumnId::Period), None);
        let order = pins.visual_order();
        assert_eq!(order[0], Slot::Leading);
        assert_eq!(order[1], Slot::Column(ColumnId::Period));
        assert_eq!(order[order.len() - 2], Slot::Column(ColumnId::Provider));
        assert_eq!(order[order.len() - 1], Slot::Trailing);

        pins.toggle_pin(ColumnId::Period, PinSide::Left);
        assert_eq!(pins.pin_of(ColumnId::Period), Some(PinSide::Left));
        let order = pins.visual_order();
        assert_eq!(order[1], Slot::Column(ColumnId::Period));
        assert_eq!(order[order.len() - 2], Slot::Column(ColumnId::Provider));
        assert_eq!(pins.left_offset(ColumnId::Period), Some(SELECTION_SLOT_WIDTH));
    }

    #[test]
    fn unpinned_columns_keep_base_order() {
        let mut pins = ColumnPins::default();
        pins.toggle_pin(ColumnId::Odometer, PinSide::Left);

        let ids: Vec<ColumnId> = pins.ordered_columns().iter().map(|c| c.id).collect();
        assert_eq!(
            &ids[..4],
            &[
                ColumnId::Period,
                ColumnId::Odometer,
                ColumnId::Provider,
                ColumnId::FuelType
            ]
        );
    }

    #[test]
    fn offsets_sum_preceding_pinned_widths() {
        let mut pins = ColumnPins::default();
        pins.toggle_pin(ColumnId::Liters, PinSide::Left);
        pins.toggle_pin(ColumnId::Value, PinSide::Right);
        pins.toggle_pin(ColumnId::Odometer, PinSide::Right);

        assert_eq!(pins.left_offset(ColumnId::Period), Some(SELECTION_SLOT_WIDTH));
        assert_eq!(
            pins.left_offset(ColumnId::Liters),
            Some(SELECTION_SLOT_WIDTH + ColumnId::Period.default_width())
        );
        assert_eq!(
            pins.right_offset(ColumnId::Value),
            Some(ColumnId::Odometer.default_width())
        );
        assert_eq!(pins.right_offset(ColumnId::Odometer), Some(0));
        assert_eq!(pins.left_offset(ColumnId::Provider), None);
        assert_eq!(pins.right_offset(ColumnId::Provider), None);
    }

    #[test]
    fn divider_follows_edge_of_pinned_blocks() {
        let mut pins = ColumnPins::default();
        assert!(pins.shows_divider(ColumnId::Period));

        pins.toggle_pin(ColumnId::Provider, PinSide::Left);
        assert!(!pins.shows_divider(ColumnId::Period));
        assert!(pins.shows_divider(ColumnId::Provider));

        pins.toggle_pin(ColumnId::Liters, PinSide::Right);
        pins.toggle_pin(ColumnId::Value, PinSide::Right);
        assert!(pins.shows_divider(ColumnId::Liters));
        assert!(!pins.shows_divider(ColumnId::Value));
        assert!(!pins.shows_divider(ColumnId::Odometer));
    }
}
