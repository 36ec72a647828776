pub mod reducer;

use crate::engine::{
    aggregator::{Period, PeriodId},
    columns::ColumnId,
    reconciler::{EditField, ValueDecorations},
    TableEngine,
};
use crate::settings::Settings;
use crate::ui::geometry::{self, ColumnGeometry};
use fleet_api::endpoints::ScopeId;
use ratatui::layout::Rect;
use std::cell::Cell;
use std::collections::BTreeSet;
use throbber_widgets_tui::ThrobberState;

/// Represents loading state separate from data state
#[derive(Default, Debug, Clone, PartialEq)]
pub enum LoadingState {
    #[default]
    NotStarted,
    Loading(ThrobberState),
    Loaded,
    Error(String),
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    CellEdit,
    DateRange,
    /// Blocking message, dismissed with Enter or Esc.
    Notice,
}

/// Focused cell. `row` indexes the rows of the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub column: ColumnId,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            row: 0,
            column: ColumnId::Period,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellEditState {
    pub period_id: PeriodId,
    pub field: EditField,
    pub buffer: String,
    /// Shown next to the cell, the edit stays open.
    pub validation_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: TableEngine,
    pub scope_id: ScopeId,
    pub currency_prefix: String,
    pub loading: LoadingState,
    pub input_mode: InputMode,
    pub cursor: Cursor,
    pub cell_edit: Option<CellEditState>,
    pub range_input: String,
    pub range_error: Option<String>,
    pub notice: Option<String>,
    pub status: Option<StatusMessage>,
    /// Last write-back failure per cell.
    pub cell_errors: Vec<((PeriodId, EditField), String)>,
    pub selected_periods: BTreeSet<PeriodId>,
    /// Written during render, read when hit-testing pointer events.
    pub table_area: Cell<Rect>,
    pub help_visible: bool,
    pub should_quit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::from_settings(&Settings::default())
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let engine = TableEngine::new(settings.page_size)
            .with_drag_threshold(settings.drag_threshold)
            .with_decorations(ValueDecorations::with_currency(&settings.currency_prefix));

        Self {
            engine,
            scope_id: ScopeId::new(settings.scope_id.clone()),
            currency_prefix: settings.currency_prefix.clone(),
            loading: LoadingState::default(),
            input_mode: InputMode::default(),
            cursor: Cursor::default(),
            cell_edit: None,
            range_input: String::new(),
            range_error: None,
            notice: None,
            status: None,
            cell_errors: Vec::new(),
            selected_periods: BTreeSet::new(),
            table_area: Cell::new(Rect::default()),
            help_visible: false,
            should_quit: false,
        }
    }

    pub fn loading_state(&mut self) -> Option<&mut ThrobberState> {
        match self.loading {
            LoadingState::Loading(ref mut throbber_state) => Some(throbber_state),
            _ => None,
        }
    }

    /// Rows of the current page, as rendered.
    pub fn page_rows(&self) -> Vec<&Period> {
        self.engine.page_rows()
    }

    pub fn focused_period(&self) -> Option<Period> {
        self.page_rows().get(self.cursor.row).map(|period| (*period).clone())
    }

    pub fn geometry(&self) -> ColumnGeometry {
        geometry::layout(
            self.engine.pins(),
            self.table_area.get(),
            self.engine.drag().scroll_left(),
        )
    }

    /// Recompute the scroll bounds from the last rendered viewport.
    pub fn sync_viewport(&mut self) {
        let max = self.geometry().max_scroll_left;
        self.engine.drag_mut().set_max_scroll_left(max);
    }

    /// Keep the cursor on an existing row after the row set changed.
    pub fn clamp_cursor(&mut self) {
        let rows = self.page_rows().len();
        self.cursor.row = self.cursor.row.min(rows.saturating_sub(1));
    }

    pub fn cell_error(&self, period_id: PeriodId, field: EditField) -> Option<&str> {
        self.cell_errors
            .iter()
            .find(|(key, _)| *key == (period_id, field))
            .map(|(_, error)| error.as_str())
    }

    pub fn set_cell_error(&mut self, period_id: PeriodId, field: EditField, error: String) {
        self.clear_cell_error(period_id, field);
        self.cell_errors.push(((period_id, field), error));
    }

    pub fn clear_cell_error(&mut self, period_id: PeriodId, field: EditField) {
        self.cell_errors.retain(|(key, _)| *key != (period_id, field));
    }

    /// Data columns in on-screen order.
    pub fn visual_columns(&self) -> Vec<ColumnId> {
        self.engine
            .pins()
            .ordered_columns()
            .into_iter()
            .map(|c| c.id)
            .collect()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
