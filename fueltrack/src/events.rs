use crate::engine::{
    aggregator::PeriodId, columns::ColumnId, pin::PinSide, reconciler::EditField,
};
use crate::input::PointerEvent;
use fleet_api::endpoints::{
    transactions::{NewTransaction, Transaction},
    ScopeId,
};

/// Commands to execute (user actions → state changes or background tasks)
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    // Cursor
    SelectNextRow,
    SelectPreviousRow,
    SelectNextColumn,
    SelectPreviousColumn,
    SelectFirstColumn,
    SelectLastColumn,

    // Table
    ToggleSort(ColumnId),
    TogglePin {
        column: ColumnId,
        side: PinSide,
    },
    NextPage,
    PreviousPage,
    ScrollColumns(i32),
    ToggleRowSelection(PeriodId),

    // Inline edit
    BeginCellEdit,
    AppendEditChar(char),
    DeleteEditChar,
    CancelCellEdit,
    SubmitCellEdit,

    // Date range
    EnterDateRangeMode,
    AppendRangeChar(char),
    DeleteRangeChar,
    CancelDateRange,
    SubmitDateRange,

    // Pointer
    Pointer(PointerEvent),
    FocusLost,

    // Data
    LoadTransactions {
        force_refresh: bool,
    },
    CreateTransaction(Box<NewTransaction>),

    // System
    DismissNotice,
    ToggleHelp,
    Quit,
}

/// Events from background tasks (responses to commands)
#[derive(Debug, Clone)]
pub enum DataEvent {
    // Cache events (instant)
    TransactionsCacheLoaded {
        scope_id: ScopeId,
        transactions: Vec<Transaction>,
    },

    // API events (slower)
    TransactionsLoaded {
        scope_id: ScopeId,
        transactions: Vec<Transaction>,
    },

    // Inline edit write-back
    TransactionUpdated {
        period_id: PeriodId,
        field: EditField,
        transaction: Transaction,
    },
    TransactionUpdateFailed {
        period_id: PeriodId,
        field: EditField,
        error: String,
    },

    // Transaction creation
    TransactionCreated {
        transaction: Transaction,
    },
    TransactionCreateFailed {
        error: String,
    },

    // Errors
    LoadError {
        error: String,
    },
}
