use super::{AppState, InputMode, LoadingState, StatusMessage};
use crate::events::DataEvent;
use fleet_api::endpoints::transactions::Transaction;

/// Apply a background result to the UI state
pub fn reduce_data_event(state: &mut AppState, event: DataEvent) {
    match event {
        DataEvent::TransactionsCacheLoaded {
            scope_id,
            transactions,
        }
        | DataEvent::TransactionsLoaded {
            scope_id,
            transactions,
        } => {
            if scope_id != state.scope_id {
                tracing::debug!("Dropping transactions for stale scope {}", scope_id);
                return;
            }
            state.engine.ingest(transactions);
            state.loading = LoadingState::Loaded;
            state.clamp_cursor();
        }

        DataEvent::TransactionUpdated {
            period_id,
            field,
            transaction,
        } => {
            state.engine.finish_edit(period_id, field);
            state.clear_cell_error(period_id, field);
            merge_transaction(state, transaction);
            state.status = Some(StatusMessage::Info(format!("Saved {}", field)));
        }

        DataEvent::TransactionUpdateFailed {
            period_id,
            field,
            error,
        } => {
            // displayed value is untouched, only the pending flag goes away
            state.engine.finish_edit(period_id, field);
            state.status = Some(StatusMessage::Error(format!(
                "Could not save {}: {}",
                field, error
            )));
            state.set_cell_error(period_id, field, error);
        }

        DataEvent::TransactionCreated { transaction } => {
            merge_transaction(state, transaction);
            state.status = Some(StatusMessage::Info("Fueling added".to_string()));
        }

        DataEvent::TransactionCreateFailed { error } => {
            state.status = Some(StatusMessage::Error(format!(
                "Could not add fueling: {}",
                error
            )));
        }

        DataEvent::LoadError { error } => {
            state.loading = LoadingState::Error(error);
        }
    }
}

/// Replace or append one transaction and rebuild the periods from scratch.
fn merge_transaction(state: &mut AppState, transaction: Transaction) {
    let mut transactions = state.engine.transactions().to_vec();
    match transactions.iter_mut().find(|t| t.id == transaction.id) {
        Some(existing) => *existing = transaction,
        None => transactions.push(transaction),
    }
    transactions.retain(Transaction::is_visible);

    state.engine.ingest(transactions);
    state.clamp_cursor();

    // the edited period may have been regrouped under a new id
    if state.input_mode == InputMode::CellEdit
        && state
            .cell_edit
            .as_ref()
            .is_some_and(|edit| state.engine.period(edit.period_id).is_none())
    {
        state.cell_edit = None;
        state.input_mode = InputMode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::aggregator::test_support::*;
    use crate::engine::reconciler::EditField;
    use fleet_api::endpoints::ScopeId;

    fn loaded_state() -> AppState {
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
    fn loading_transactions_rebuilds_periods() {
        let state = loaded_state();
        assert_eq!(state.loading, LoadingState::Loaded);
        assert_eq!(state.engine.periods().len(), 2);
    }

    #[test]
    fn other_scopes_are_ignored() {
        let mut state = AppState::new();
        reduce_data_event(
            &mut state,
            DataEvent::TransactionsCacheLoaded {
                scope_id: ScopeId::new("someone-else"),
                transactions: two_week_fixture(),
            },
        );
        assert!(state.engine.periods().is_empty());
        assert_eq!(state.loading, LoadingState::NotStarted);
    }

    #[test]
    fn update_merges_transaction_and_clears_pending() {
        let mut state = loaded_state();
        let period_id = state.engine.periods()[1].id;
        let write_back = state
            .engine
            .begin_edit(period_id, EditField::Value, "80")
            .unwrap();
        assert!(state.engine.is_pending(period_id, EditField::Value));

        let mut updated = tx("c", "2024-03-11", 15.0, 75.0);
        write_back.patch.apply_to(&mut updated);
        reduce_data_event(
            &mut state,
            DataEvent::TransactionUpdated {
                period_id,
                field: EditField::Value,
                transaction: updated,
            },
        );

        assert!(!state.engine.is_pending(period_id, EditField::Value));
        assert_eq!(state.engine.periods()[1].total_value, 80.0);
        assert_eq!(state.engine.periods()[1].id, period_id);
    }

    #[test]
    fn failed_update_keeps_values_and_reports() {
        let mut state = loaded_state();
        let period_id = state.engine.periods()[1].id;
        state
            .engine
            .begin_edit(period_id, EditField::Liters, "99")
            .unwrap();

        reduce_data_event(
            &mut state,
            DataEvent::TransactionUpdateFailed {
                period_id,
                field: EditField::Liters,
                error: "timeout".to_string(),
            },
        );

        assert!(!state.engine.is_pending(period_id, EditField::Liters));
        assert_eq!(state.engine.periods()[1].total_liters, 15.0);
        assert_eq!(state.cell_error(period_id, EditField::Liters), Some("timeout"));
        assert!(matches!(state.status, Some(StatusMessage::Error(_))));
    }

    #[test]
    fn created_transaction_joins_its_week() {
        let mut state = loaded_state();
        reduce_data_event(
            &mut state,
            DataEvent::TransactionCreated {
                transaction: tx("d", "2024-03-12", 5.0, 25.0),
            },
        );

        assert_eq!(state.engine.periods().len(), 2);
        assert_eq!(state.engine.periods()[1].fueling_count, 2);
    }

    #[test]
    fn load_error_is_recorded() {
        let mut state = AppState::new();
        reduce_data_event(
            &mut state,
            DataEvent::LoadError {
                error: "offline".to_string(),
            },
        );
        assert_eq!(state.loading, LoadingState::Error("offline".to_string()));
    }
}
