//! The period table.
//!
//! Drawn cell by cell from [`geometry::layout`] so pinned blocks stay put
//! while the unpinned columns scroll underneath them. The area the table was
//! drawn into is stored in the state for pointer hit-testing.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::engine::aggregator::Period;
use crate::engine::columns::{ColumnId, ColumnKind};
use crate::engine::pin::{PinSide, Slot};
use crate::engine::{TableView, Totals};
use crate::state::AppState;
use crate::ui::format;
use crate::ui::geometry::{self, ColumnGeometry, Placement};
use crate::ui::theme;

const DIVIDER: &str = "│";
const ACTIONS_LABEL: &str = " [edit] ";

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let view = state.engine.view();
    let title = format!(
        " Fuel periods · page {}/{} · {} rows ",
        view.page.page,
        view.page.total_pages.max(1),
        view.page.total_rows
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(theme::title_style());
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.height < 3 {
        return;
    }

    let table_area = Rect {
        height: inner.height - 1,
        ..inner
    };
    let footer_area = Rect {
        y: inner.bottom() - 1,
        height: 1,
        ..inner
    };
    state.table_area.set(table_area);

    let geometry = geometry::layout(
        state.engine.pins(),
        table_area,
        state.engine.drag().scroll_left(),
    );

    let buf = f.buffer_mut();
    render_header(buf, table_area.y, &geometry, &view, state);
    for (index, period) in view.rows.iter().enumerate() {
        let y = table_area.y + 1 + index as u16;
        if y >= table_area.bottom() {
            break;
        }
        render_row(buf, y, &geometry, state, index, period);
    }

    let last_row = (table_area.y + view.rows.len() as u16).min(table_area.bottom() - 1);
    render_dividers(buf, table_area, last_row, &geometry, state);
    render_totals(buf, footer_area, &view.totals, &geometry, state);
}

fn slot_width(state: &AppState, slot: Slot) -> u16 {
    let pins = state.engine.pins();
    match slot {
        Slot::Leading => pins.leading_width(),
        Slot::Trailing => pins.trailing_width(),
        Slot::Column(id) => pins.width_of(id),
    }
}

/// Write the visible part of a full-width cell.
fn draw(buf: &mut Buffer, placement: &Placement, y: u16, full: &str, style: Style) {
    let visible: String = full
        .chars()
        .skip(usize::from(placement.clip_left))
        .take(usize::from(placement.width))
        .collect();
    buf.set_stringn(placement.x, y, visible, usize::from(placement.width), style);
}

fn render_header(
    buf: &mut Buffer,
    y: u16,
    geometry: &ColumnGeometry,
    view: &TableView,
    state: &AppState,
) {
    for placement in &geometry.placements {
        let width = slot_width(state, placement.slot);
        let text = match placement.slot {
            Slot::Leading => " ".repeat(usize::from(width)),
            Slot::Trailing => format::pad("", width, false),
            Slot::Column(id) => {
                let sort = view
                    .columns
                    .iter()
                    .find(|c| c.column_id() == Some(id))
                    .map(|c| c.sort.indicator())
                    .unwrap_or("");
                let label = format!("{}{}", id.label(), sort);
                format::pad(&label, width, id.kind() == ColumnKind::Numeric)
            }
        };
        draw(buf, placement, y, &text, theme::header_style());
    }
}

fn render_row(
    buf: &mut Buffer,
    y: u16,
    geometry: &ColumnGeometry,
    state: &AppState,
    index: usize,
    period: &Period,
) {
    let focused = index == state.cursor.row;
    let row_style = if focused {
        theme::selection_style()
    } else {
        Style::default()
    };

    for placement in &geometry.placements {
        let width = slot_width(state, placement.slot);
        let (text, style) = match placement.slot {
            Slot::Leading => {
                let mark = if state.selected_periods.contains(&period.id) {
                    "[x]"
                } else {
                    "[ ]"
                };
                (mark.to_string(), row_style)
            }
            Slot::Trailing => (ACTIONS_LABEL.to_string(), row_style.patch(theme::help_text_style())),
            Slot::Column(id) => cell(state, period, id, width, focused, row_style),
        };
        draw(buf, placement, y, &text, style);
    }
}

fn cell(
    state: &AppState,
    period: &Period,
    column: ColumnId,
    width: u16,
    focused: bool,
    row_style: Style,
) -> (String, Style) {
    let numeric = column.kind() == ColumnKind::Numeric;
    let field = column.edit_field();

    let editing = state
        .cell_edit
        .as_ref()
        .filter(|edit| edit.period_id == period.id && Some(edit.field) == field);
    if let Some(edit) = editing {
        let text = format!("{}▏", edit.buffer);
        return (format::pad(&text, width, false), theme::edit_style());
    }

    let mut text = format::cell_text(period, column, &state.currency_prefix);
    let mut style = if focused && column == state.cursor.column {
        theme::cursor_style()
    } else {
        row_style
    };

    if let Some(field) = field {
        if state.engine.is_pending(period.id, field) {
            text.push('…');
            style = style.patch(theme::pending_style());
        } else if state.cell_error(period.id, field).is_some() {
            text.push('!');
            style = style.patch(theme::error_style());
        }
    }

    (format::pad(&text, width, numeric), style)
}

/// Vertical rules after the left-pinned block and before the right-pinned one.
fn render_dividers(
    buf: &mut Buffer,
    area: Rect,
    last_row: u16,
    geometry: &ColumnGeometry,
    state: &AppState,
) {
    let pins = state.engine.pins();
    for placement in &geometry.placements {
        let Slot::Column(id) = placement.slot else {
            continue;
        };
        if !pins.shows_divider(id) {
            continue;
        }

        let x = match pins.pin_of(id) {
            Some(PinSide::Left) => placement.x + placement.width - 1,
            Some(PinSide::Right) if placement.x > area.x => placement.x - 1,
            _ => continue,
        };
        for y in area.y..=last_row {
            buf.set_string(x, y, DIVIDER, theme::divider_style());
        }
    }
}

fn render_totals(
    buf: &mut Buffer,
    area: Rect,
    totals: &Totals,
    geometry: &ColumnGeometry,
    state: &AppState,
) {
    let mut text = format!(
        " Σ {} periods · {} L · {} · {} fuelings",
        totals.periods,
        format::fmt_decimal(totals.liters, 2),
        format::fmt_currency(&state.currency_prefix, totals.value),
        totals.fueling_count,
    );
    if geometry.max_scroll_left > 0 {
        text.push_str(&format!(
            " · scroll {}/{}",
            geometry.scroll_left, geometry.max_scroll_left
        ));
    }
    buf.set_stringn(area.x, area.y, text, usize::from(area.width), theme::title_style());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::DataEvent;
    use crate::state::reducer::reduce_data_event;
    use crate::engine::aggregator::test_support::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(state: &AppState, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render(f, area, state)
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    fn loaded() -> AppState {
        let mut state = AppState::new();
        let scope_id = state.scope_id.clone();
        reduce_data_event(
            &mut state,
            DataEvent::TransactionsLoaded {
                scope_id,
                transactions: two_week_fixture(),
            },
        );
        state
    }

    #[test]
    fn records_table_area_inside_border() {
        let state = loaded();
        rendered(&state, 120, 10);
        assert_eq!(state.table_area.get(), Rect::new(1, 1, 118, 7));
    }

    #[test]
    fn draws_header_rows_and_totals() {
        let state = loaded();
        let lines = rendered(&state, 120, 10);

        assert!(lines[1].contains("Period"));
        assert!(lines[2].contains("[ ]"));
        assert!(lines[2].contains("04/03/2024 - 10/03/2024"));
        assert!(lines[3].contains("11/03/2024 - 17/03/2024"));
        assert!(lines[8].contains("Σ 2 periods"));
        assert!(lines[8].contains("45,00 L"));
    }

    #[test]
    fn pinned_period_stays_when_scrolled() {
        let mut state = loaded();
        rendered(&state, 80, 10);
        state.sync_viewport();
        state.engine.drag_mut().scroll_by(40);

        let lines = rendered(&state, 80, 10);
        assert!(lines[2].contains("04/03/2024 - 10/03/2024"));
        assert!(!lines[1].contains("Provider"));
        assert!(lines[8].contains("scroll 40/"));
    }
}
