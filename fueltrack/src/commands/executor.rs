use crate::background::{data_loader::DataLoader, BackgroundTaskManager};
use crate::engine::columns::ColumnId;
use crate::engine::drag::{InteractiveElement, PointerTarget, Release};
use crate::engine::filter::DateRange;
use crate::engine::pin::Slot;
use crate::engine::reconciler::{EditError, EditField, WriteBack};
use crate::events::AppCommand;
use crate::input::{PointerEvent, PointerKind};
use crate::state::*;
use crate::ui::geometry::{self, HitRow};
use fleet_api::endpoints::{transactions::NewTransaction, ScopeId};
use throbber_widgets_tui::ThrobberState;

/// Side effect requested by a command, run off the UI loop in production
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Load {
        scope_id: ScopeId,
        force_refresh: bool,
    },
    WriteBack {
        scope_id: ScopeId,
        write_back: WriteBack,
    },
    Create {
        scope_id: ScopeId,
        transaction: Box<NewTransaction>,
    },
}

/// Execute a command, spawning background tasks for its side effects
pub fn execute_command(
    command: AppCommand,
    state: &mut AppState,
    task_manager: &mut BackgroundTaskManager,
    data_loader: &DataLoader,
) {
    let Some(effect) = apply_command(command, state) else {
        return;
    };

    let data_loader = data_loader.clone();
    match effect {
        Effect::Load {
            scope_id,
            force_refresh,
        } => {
            let task_id = format!("load_transactions_{}", scope_id);
            task_manager.spawn_load_task(task_id, async move {
                data_loader.load_transactions(scope_id, force_refresh).await;
            });
        }
        Effect::WriteBack {
            scope_id,
            write_back,
        } => {
            task_manager.spawn_write_task(async move {
                data_loader.update_transaction(scope_id, write_back).await;
            });
        }
        Effect::Create {
            scope_id,
            transaction,
        } => {
            task_manager.spawn_write_task(async move {
                data_loader.create_transaction(scope_id, *transaction).await;
            });
        }
    }
}

/// Execute a command without spawning anything (tests). The requested
/// effect is handed back to the caller.
pub fn execute_command_sync(command: AppCommand, state: &mut AppState) -> Option<Effect> {
    apply_command(command, state)
}

fn apply_command(command: AppCommand, state: &mut AppState) -> Option<Effect> {
    match command {
        AppCommand::Quit => state.should_quit = true,
        AppCommand::ToggleHelp => state.help_visible = !state.help_visible,
        AppCommand::DismissNotice => {
            state.notice = None;
            state.status = None;
            state.input_mode = InputMode::Normal;
        }

        // Cursor
        AppCommand::SelectNextRow => {
            let rows = state.page_rows().len();
            if rows > 0 {
                state.cursor.row = (state.cursor.row + 1) % rows;
            }
        }
        AppCommand::SelectPreviousRow => {
            let rows = state.page_rows().len();
            if rows > 0 {
                state.cursor.row = state.cursor.row.checked_sub(1).unwrap_or(rows - 1);
            }
        }
        AppCommand::SelectNextColumn => move_cursor_column(state, |i, len| (i + 1).min(len - 1)),
        AppCommand::SelectPreviousColumn => move_cursor_column(state, |i, _| i.saturating_sub(1)),
        AppCommand::SelectFirstColumn => move_cursor_column(state, |_, _| 0),
        AppCommand::SelectLastColumn => move_cursor_column(state, |_, len| len - 1),

        // Table
        AppCommand::ToggleSort(column) => {
            state.engine.toggle_sort(column);
            state.clamp_cursor();
        }
        AppCommand::TogglePin { column, side } => {
            state.engine.toggle_pin(column, side);
            reveal_cursor(state);
        }
        AppCommand::NextPage => {
            state.engine.next_page();
            state.clamp_cursor();
        }
        AppCommand::PreviousPage => {
            state.engine.previous_page();
            state.clamp_cursor();
        }
        AppCommand::ScrollColumns(delta) => {
            state.sync_viewport();
            state.engine.drag_mut().scroll_by(delta);
        }
        AppCommand::ToggleRowSelection(period_id) => {
            if !state.selected_periods.remove(&period_id) {
                state.selected_periods.insert(period_id);
            }
        }

        // Inline edit
        AppCommand::BeginCellEdit => begin_cell_edit(state),
        AppCommand::AppendEditChar(c) => {
            if let Some(edit) = state.cell_edit.as_mut() {
                edit.buffer.push(c);
                edit.validation_error = None;
            }
        }
        AppCommand::DeleteEditChar => {
            if let Some(edit) = state.cell_edit.as_mut() {
                edit.buffer.pop();
                edit.validation_error = None;
            }
        }
        AppCommand::CancelCellEdit => {
            state.cell_edit = None;
            state.input_mode = InputMode::Normal;
        }
        AppCommand::SubmitCellEdit => return submit_cell_edit(state),

        // Date range
        AppCommand::EnterDateRangeMode => {
            state.range_input = state
                .engine
                .date_range()
                .map(|r| r.to_string())
                .unwrap_or_default();
            state.range_error = None;
            state.input_mode = InputMode::DateRange;
        }
        AppCommand::AppendRangeChar(c) => {
            state.range_input.push(c);
            state.range_error = None;
        }
        AppCommand::DeleteRangeChar => {
            state.range_input.pop();
            state.range_error = None;
        }
        AppCommand::CancelDateRange => {
            state.range_error = None;
            state.input_mode = InputMode::Normal;
        }
        AppCommand::SubmitDateRange => match DateRange::parse(&state.range_input) {
            Ok(range) => {
                tracing::info!("Date range set to {:?}", range);
                state.engine.set_date_range(range);
                state.cursor.row = 0;
                state.input_mode = InputMode::Normal;
            }
            Err(e) => state.range_error = Some(e.to_string()),
        },

        // Pointer
        AppCommand::Pointer(event) => handle_pointer(state, event),
        AppCommand::FocusLost => state.engine.drag_mut().blur(),

        // Data
        AppCommand::LoadTransactions { force_refresh } => {
            state.loading = LoadingState::Loading(ThrobberState::default());
            return Some(Effect::Load {
                scope_id: state.scope_id.clone(),
                force_refresh,
            });
        }
        AppCommand::CreateTransaction(transaction) => {
            state.status = Some(StatusMessage::Info("Adding fueling…".to_string()));
            return Some(Effect::Create {
                scope_id: state.scope_id.clone(),
                transaction,
            });
        }
    }

    None
}

fn move_cursor_column(state: &mut AppState, step: impl Fn(usize, usize) -> usize) {
    let columns = state.visual_columns();
    if columns.is_empty() {
        return;
    }
    let index = columns
        .iter()
        .position(|c| *c == state.cursor.column)
        .unwrap_or(0);
    state.cursor.column = columns[step(index, columns.len())];
    reveal_cursor(state);
}

/// Scroll so the focused column is fully visible.
fn reveal_cursor(state: &mut AppState) {
    state.sync_viewport();
    let geometry = state.geometry();
    let target = geometry::scroll_to_reveal(state.engine.pins(), &geometry, state.cursor.column);
    let delta = i32::from(target) - i32::from(geometry.scroll_left);
    state.engine.drag_mut().scroll_by(delta);
}

fn begin_cell_edit(state: &mut AppState) {
    let Some(period) = state.focused_period() else {
        return;
    };
    let Some(field) = state.cursor.column.edit_field() else {
        state.status = Some(StatusMessage::Error(format!(
            "{} cannot be edited",
            state.cursor.column.label()
        )));
        return;
    };

    // decimal comma without grouping, so the buffer parses back unchanged
    let buffer = match field {
        EditField::Value => format!("{:.2}", period.total_value).replace('.', ","),
        EditField::Liters => format!("{:.2}", period.total_liters).replace('.', ","),
        EditField::UnitPrice => format!("{:.3}", period.unit_price).replace('.', ","),
        EditField::Odometer => period.odometer.to_string(),
    };

    tracing::debug!("Editing {} of period {}", field, period.id);
    state.cell_edit = Some(CellEditState {
        period_id: period.id,
        field,
        buffer,
        validation_error: None,
    });
    state.input_mode = InputMode::CellEdit;
}

fn submit_cell_edit(state: &mut AppState) -> Option<Effect> {
    let edit = state.cell_edit.take()?;

    match state
        .engine
        .begin_edit(edit.period_id, edit.field, &edit.buffer)
    {
        Ok(write_back) => {
            state.input_mode = InputMode::Normal;
            state.clear_cell_error(edit.period_id, edit.field);
            state.status = Some(StatusMessage::Info(format!("Saving {}…", edit.field)));
            Some(Effect::WriteBack {
                scope_id: state.scope_id.clone(),
                write_back,
            })
        }
        Err(e @ EditError::InvalidInput(_)) => {
            state.cell_edit = Some(CellEditState {
                validation_error: Some(e.to_string()),
                ..edit
            });
            None
        }
        Err(e) => {
            tracing::warn!("Edit of {} rejected: {}", edit.field, e);
            state.notice = Some(e.to_string());
            state.input_mode = InputMode::Notice;
            None
        }
    }
}

fn handle_pointer(state: &mut AppState, event: PointerEvent) {
    state.sync_viewport();
    let x = i32::from(event.x);

    match event.kind {
        PointerKind::Down => {
            let Some(hit) = hit_at(state, event) else {
                // a press outside the table starts no gesture
                state.engine.drag_mut().blur();
                return;
            };
            let target = match (hit.row, hit.slot) {
                (HitRow::Body(_), Slot::Leading) => {
                    PointerTarget::Interactive(InteractiveElement::Input)
                }
                (HitRow::Body(_), Slot::Trailing) => {
                    PointerTarget::Interactive(InteractiveElement::Button)
                }
                _ => PointerTarget::Surface,
            };
            state
                .engine
                .drag_mut()
                .pointer_down(event.pointer_id, x, target);
        }
        PointerKind::Move => {
            state.engine.drag_mut().pointer_move(event.pointer_id, x);
        }
        PointerKind::Up => {
            let release = state.engine.drag_mut().pointer_up(event.pointer_id);
            if release == Release::Ignored {
                return;
            }
            let clickable = state.input_mode == InputMode::Normal && !state.help_visible;
            if state.engine.drag_mut().accept_click() && clickable {
                click(state, event);
            }
        }
        PointerKind::Wheel(delta) => state.engine.drag_mut().scroll_by(delta),
    }
}

fn hit_at(state: &AppState, event: PointerEvent) -> Option<geometry::Hit> {
    geometry::hit_test(
        &state.geometry(),
        state.table_area.get(),
        state.page_rows().len(),
        event.x,
        event.y,
    )
}

fn click(state: &mut AppState, event: PointerEvent) {
    let Some(hit) = hit_at(state, event) else {
        return;
    };
    tracing::debug!("Click on {:?}", hit);

    match (hit.row, hit.slot) {
        (HitRow::Header, Slot::Column(column)) => {
            state.engine.toggle_sort(column);
            state.clamp_cursor();
        }
        (HitRow::Header, _) => {}
        (HitRow::Body(row), Slot::Leading) => {
            let id = state.page_rows().get(row).map(|period| period.id);
            if let Some(id) = id {
                if !state.selected_periods.remove(&id) {
                    state.selected_periods.insert(id);
                }
            }
        }
        (HitRow::Body(row), Slot::Column(column)) => {
            state.cursor = Cursor { row, column };
        }
        (HitRow::Body(row), Slot::Trailing) => {
            state.cursor.row = row;
            if !state.cursor.column.is_editable() {
                state.cursor.column = ColumnId::Value;
            }
            begin_cell_edit(state);
        }
    }
}
