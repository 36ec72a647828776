//! The fueling-history table engine.
//!
//! [`TableEngine`] owns the state of one table instance and runs the render
//! pipeline `aggregate -> filter -> sort -> paginate`, emitting a
//! [`TableView`] that any presentation layer can draw as-is.

pub mod aggregator;
pub mod columns;
pub mod drag;
pub mod filter;
pub mod pin;
pub mod reconciler;
pub mod sort;

use crate::source::TransactionSource;
use aggregator::{aggregate, Period, PeriodId};
use columns::ColumnId;
use drag::DragScroll;
use filter::{filter_periods, DateRange};
use fleet_api::endpoints::transactions::Transaction;
use pin::{ColumnPins, PinSide, Slot};
use reconciler::{EditError, EditField, Reconciler, ValueDecorations, WriteBack};
use sort::{apply_sort, SortDirection, SortState};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct TableEngine {
    transactions: Vec<Transaction>,
    periods: Vec<Period>,
    date_range: Option<DateRange>,
    sort: SortState,
    pins: ColumnPins,
    drag: DragScroll,
    reconciler: Reconciler,
    /// 1-based
    page: usize,
    page_size: usize,
}

impl Default for TableEngine {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl TableEngine {
    pub fn new(page_size: usize) -> Self {
        Self {
            transactions: Vec::new(),
            periods: Vec::new(),
            date_range: None,
            sort: SortState::default(),
            pins: ColumnPins::default(),
            drag: DragScroll::default(),
            reconciler: Reconciler::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn with_drag_threshold(mut self, threshold: u16) -> Self {
        self.drag = DragScroll::new(threshold);
        self
    }

    pub fn with_decorations(mut self, decorations: ValueDecorations) -> Self {
        self.reconciler = Reconciler::new(decorations);
        self
    }

    /// Replace the transaction set and rebuild every period from scratch.
    pub fn ingest(&mut self, transactions: Vec<Transaction>) {
        self.transactions = transactions;
        self.periods = aggregate(&self.transactions);
        tracing::debug!(
            "Aggregated {} transactions into {} periods",
            self.transactions.len(),
            self.periods.len()
        );
        self.set_page(self.page);
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn period(&self, id: PeriodId) -> Option<&Period> {
        self.periods.iter().find(|p| p.id == id)
    }

    // Filtering

    pub fn date_range(&self) -> Option<&DateRange> {
        self.date_range.as_ref()
    }

    pub fn set_date_range(&mut self, range: Option<DateRange>) {
        self.date_range = range;
        self.page = 1;
    }

    // Sorting and pinning

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn toggle_sort(&mut self, column: ColumnId) {
        self.sort.toggle(column);
    }

    pub fn pins(&self) -> &ColumnPins {
        &self.pins
    }

    pub fn toggle_pin(&mut self, column: ColumnId, side: PinSide) {
        self.pins.toggle_pin(column, side);
    }

    // Drag scrolling

    pub fn drag(&self) -> &DragScroll {
        &self.drag
    }

    pub fn drag_mut(&mut self) -> &mut DragScroll {
        &mut self.drag
    }

    // Inline edits

    pub fn is_pending(&self, period_id: PeriodId, field: EditField) -> bool {
        self.reconciler.is_pending(period_id, field)
    }

    /// Validate an edit and mark the cell pending. The caller performs the
    /// write-back and reports back with [`Self::finish_edit`].
    pub fn begin_edit(
        &mut self,
        period_id: PeriodId,
        field: EditField,
        raw: &str,
    ) -> Result<WriteBack, EditError> {
        self.reconciler
            .prepare(&self.periods, &self.transactions, period_id, field, raw)
    }

    pub fn finish_edit(&mut self, period_id: PeriodId, field: EditField) {
        self.reconciler.settle(period_id, field);
    }

    /// Edit a cell and await the write-back. Periods are left untouched; the
    /// caller re-ingests the refreshed transaction list.
    pub async fn update_field(
        &mut self,
        source: &dyn TransactionSource,
        period_id: PeriodId,
        field: EditField,
        raw: &str,
    ) -> Result<Transaction, EditError> {
        self.reconciler
            .update_field(
                source,
                &self.periods,
                &self.transactions,
                period_id,
                field,
                raw,
            )
            .await
    }

    // Pagination

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.filtered_len().div_ceil(self.page_size)
    }

    /// Clamped to `1..=total_pages`.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages().max(1));
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    fn filtered_len(&self) -> usize {
        filter_periods(&self.periods, self.date_range.as_ref()).len()
    }

    /// Filtered then sorted rows, before pagination.
    pub fn visible_rows(&self) -> Vec<&Period> {
        let mut rows = filter_periods(&self.periods, self.date_range.as_ref());
        apply_sort(&mut rows, &self.sort);
        rows
    }

    /// Rows of the current page, borrowed from the engine.
    pub fn page_rows(&self) -> Vec<&Period> {
        paginate(self.visible_rows(), self.page, self.page_size)
    }

    pub fn view(&self) -> TableView {
        let rows = self.visible_rows();
        let totals = Totals::of(&rows);
        let page = PageInfo {
            page: self.page,
            page_size: self.page_size,
            total_pages: rows.len().div_ceil(self.page_size),
            total_rows: rows.len(),
        };

        TableView {
            columns: self.column_views(),
            rows: paginate(rows, self.page, self.page_size)
                .into_iter()
                .cloned()
                .collect(),
            page,
            totals,
            scroll_left: self.drag.scroll_left(),
        }
    }

    fn column_views(&self) -> Vec<ColumnView> {
        self.pins
            .visual_order()
            .into_iter()
            .map(|slot| match slot {
                Slot::Leading => ColumnView::fixed(slot, self.pins.leading_width()),
                Slot::Trailing => ColumnView::fixed(slot, self.pins.trailing_width()),
                Slot::Column(id) => ColumnView {
                    slot,
                    label: id.label(),
                    width: self.pins.width_of(id),
                    pin: self.pins.pin_of(id),
                    left_offset: self.pins.left_offset(id),
                    right_offset: self.pins.right_offset(id),
                    divider: self.pins.shows_divider(id),
                    sort: self.sort.direction_of(id),
                },
            })
            .collect()
    }
}

/// Rows of `page` (1-based).
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Vec<T> {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    items.into_iter().skip(start).take(page_size).collect()
}

/// Render-ready snapshot of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub columns: Vec<ColumnView>,
    pub rows: Vec<Period>,
    pub page: PageInfo,
    pub totals: Totals,
    pub scroll_left: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView {
    pub slot: Slot,
    pub label: &'static str,
    pub width: u16,
    pub pin: Option<PinSide>,
    pub left_offset: Option<u16>,
    pub right_offset: Option<u16>,
    pub divider: bool,
    pub sort: SortDirection,
}

impl ColumnView {
    fn fixed(slot: Slot, width: u16) -> Self {
        Self {
            slot,
            label: "",
            width,
            pin: None,
            left_offset: None,
            right_offset: None,
            divider: false,
            sort: SortDirection::None,
        }
    }

    pub fn column_id(&self) -> Option<ColumnId> {
        match self.slot {
            Slot::Column(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_rows: usize,
}

/// Sums over the filtered rows of every page.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub periods: usize,
    pub liters: f64,
    pub value: f64,
    pub fueling_count: usize,
}

impl Totals {
    fn of(rows: &[&Period]) -> Self {
        rows.iter().fold(
            Totals {
                periods: rows.len(),
                ..Default::default()
            },
            |acc, p| Totals {
                liters: acc.liters + p.total_liters,
                value: acc.value + p.total_value,
                fueling_count: acc.fueling_count + p.fueling_count,
                ..acc
            },
        )
    }
}
