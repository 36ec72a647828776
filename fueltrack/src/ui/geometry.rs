//! Places table columns on screen.
//!
//! Pinned blocks stick to their edge; unpinned columns fill the space between
//! them and are shifted left by the drag-scroll offset.

use crate::engine::columns::{ColumnDef, ColumnId};
use crate::engine::pin::{ColumnPins, PinSide, Slot};
use ratatui::layout::Rect;

/// The visible part of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub slot: Slot,
    /// Absolute x of the first visible cell.
    pub x: u16,
    /// Visible width.
    pub width: u16,
    /// Cells of the column scrolled or clipped out on the left.
    pub clip_left: u16,
}

impl Placement {
    pub fn contains(&self, x: u16) -> bool {
        self.x <= x && x < self.x + self.width
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnGeometry {
    pub placements: Vec<Placement>,
    pub scroll_left: u16,
    pub max_scroll_left: u16,
    /// Width of the region unpinned columns scroll through.
    pub scroll_width: u16,
}

/// Row under the pointer, relative to the table area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRow {
    Header,
    Body(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub row: HitRow,
    pub slot: Slot,
}

fn block_width(columns: &[ColumnDef]) -> i32 {
    columns.iter().map(|c| i32::from(c.width)).sum()
}

fn by_pin(pins: &ColumnPins, pin: Option<PinSide>) -> Vec<ColumnDef> {
    pins.ordered_columns()
        .into_iter()
        .filter(|c| pins.pin_of(c.id) == pin)
        .collect()
}

struct Bounds {
    origin: i32,
    lo: i32,
    hi: i32,
}

impl Bounds {
    fn place(&self, slot: Slot, start: i32, width: u16) -> Option<Placement> {
        let end = start + i32::from(width);
        let visible_start = start.max(self.lo);
        let visible_end = end.min(self.hi);
        if visible_start >= visible_end {
            return None;
        }

        Some(Placement {
            slot,
            x: (self.origin + visible_start) as u16,
            width: (visible_end - visible_start) as u16,
            clip_left: (visible_start - start) as u16,
        })
    }
}

pub fn layout(pins: &ColumnPins, area: Rect, scroll_left: u16) -> ColumnGeometry {
    let width = i32::from(area.width);
    let leading = i32::from(pins.leading_width());
    let trailing = i32::from(pins.trailing_width());

    let left = by_pin(pins, Some(PinSide::Left));
    let middle = by_pin(pins, None);
    let right = by_pin(pins, Some(PinSide::Right));

    let left_end = (leading + block_width(&left)).min(width);
    let right_start = (width - trailing - block_width(&right)).max(left_end);
    let scroll_width = right_start - left_end;
    let max_scroll_left = (block_width(&middle) - scroll_width).max(0);
    let scroll = i32::from(scroll_left).min(max_scroll_left);

    let bounds = |lo: i32, hi: i32| Bounds {
        origin: i32::from(area.x),
        lo,
        hi,
    };
    let whole = bounds(0, width);
    let scrolling = bounds(left_end, right_start);
    let right_block = bounds(left_end, (width - trailing).max(left_end));
    let trailing_block = bounds(left_end, width);

    let mut placements = Vec::new();
    placements.extend(whole.place(Slot::Leading, 0, pins.leading_width()));

    for column in &left {
        let start = pins.left_offset(column.id).map(i32::from).unwrap_or(leading);
        placements.extend(whole.place(Slot::Column(column.id), start, column.width));
    }

    let mut start = left_end - scroll;
    for column in &middle {
        placements.extend(scrolling.place(Slot::Column(column.id), start, column.width));
        start += i32::from(column.width);
    }

    for column in &right {
        let offset = pins.right_offset(column.id).map(i32::from).unwrap_or(0);
        let start = width - trailing - offset - i32::from(column.width);
        placements.extend(right_block.place(Slot::Column(column.id), start, column.width));
    }

    placements.extend(trailing_block.place(Slot::Trailing, width - trailing, pins.trailing_width()));

    ColumnGeometry {
        placements,
        scroll_left: scroll as u16,
        max_scroll_left: max_scroll_left as u16,
        scroll_width: scroll_width as u16,
    }
}

impl ColumnGeometry {
    pub fn slot_at(&self, x: u16) -> Option<Slot> {
        self.placements
            .iter()
            .find(|p| p.contains(x))
            .map(|p| p.slot)
    }

    pub fn placement(&self, slot: Slot) -> Option<&Placement> {
        self.placements.iter().find(|p| p.slot == slot)
    }
}

/// Locate the cell under `(x, y)`. The header is the first row of `area`.
pub fn hit_test(geometry: &ColumnGeometry, area: Rect, rows: usize, x: u16, y: u16) -> Option<Hit> {
    if y < area.y || y >= area.y + area.height {
        return None;
    }
    let slot = geometry.slot_at(x)?;
    let row = match (y - area.y) as usize {
        0 => HitRow::Header,
        n if n <= rows => HitRow::Body(n - 1),
        _ => return None,
    };
    Some(Hit { row, slot })
}

/// Scroll offset that brings an unpinned column fully into view.
pub fn scroll_to_reveal(pins: &ColumnPins, geometry: &ColumnGeometry, column: ColumnId) -> u16 {
    if pins.pin_of(column).is_some() {
        return geometry.scroll_left;
    }

    let middle = by_pin(pins, None);
    let Some(index) = middle.iter().position(|c| c.id == column) else {
        return geometry.scroll_left;
    };
    let start: u16 = middle[..index].iter().map(|c| c.width).sum();
    let end = start + middle[index].width;
    let scroll = geometry.scroll_left;

    let revealed = if start < scroll {
        start
    } else if end > scroll + geometry.scroll_width {
        end.saturating_sub(geometry.scroll_width)
    } else {
        scroll
    };
    revealed.min(geometry.max_scroll_left)
}
