use crate::engine::pin::PinSide;
use crate::events::AppCommand;
use crate::input::{Key, KeyEvent, PointerEvent, PointerKind};
use crate::state::{AppState, InputMode};

const KEYBOARD_SCROLL_STEP: i32 = 4;

/// Map user input (KeyEvent) to AppCommand based on current UI state
/// Returns None if the key should be ignored
pub fn handle_key_input(event: KeyEvent, state: &AppState) -> Option<AppCommand> {
    let key = event.key;

    if event.modifiers.ctrl && key == Key::Char('c') {
        return Some(AppCommand::Quit);
    }

    match state.input_mode {
        InputMode::Notice => {
            return match key {
                Key::Enter | Key::Esc => Some(AppCommand::DismissNotice),
                _ => None,
            };
        }
        InputMode::CellEdit => {
            return match key {
                Key::Enter => Some(AppCommand::SubmitCellEdit),
                Key::Esc => Some(AppCommand::CancelCellEdit),
                Key::Backspace => Some(AppCommand::DeleteEditChar),
                Key::Char(c) if c != '\0' => Some(AppCommand::AppendEditChar(c)),
                _ => None,
            };
        }
        InputMode::DateRange => {
            return match key {
                Key::Enter => Some(AppCommand::SubmitDateRange),
                Key::Esc => Some(AppCommand::CancelDateRange),
                Key::Backspace => Some(AppCommand::DeleteRangeChar),
                Key::Char(c) if c != '\0' => Some(AppCommand::AppendRangeChar(c)),
                _ => None,
            };
        }
        InputMode::Normal => {}
    }

    // Help overlay swallows everything else
    if state.help_visible {
        return match key {
            Key::Char('?') | Key::Esc => Some(AppCommand::ToggleHelp),
            Key::Char('q') => Some(AppCommand::Quit),
            _ => None,
        };
    }

    let column = state.cursor.column;
    match key {
        Key::Char('q') => Some(AppCommand::Quit),
        Key::Char('?') => Some(AppCommand::ToggleHelp),

        Key::Char('j') | Key::Down => Some(AppCommand::SelectNextRow),
        Key::Char('k') | Key::Up => Some(AppCommand::SelectPreviousRow),
        Key::Char('l') | Key::Right => Some(AppCommand::SelectNextColumn),
        Key::Char('h') | Key::Left => Some(AppCommand::SelectPreviousColumn),
        Key::Char('0') | Key::Home => Some(AppCommand::SelectFirstColumn),
        Key::Char('$') | Key::End => Some(AppCommand::SelectLastColumn),
        Key::Char('H') => Some(AppCommand::ScrollColumns(-KEYBOARD_SCROLL_STEP)),
        Key::Char('L') => Some(AppCommand::ScrollColumns(KEYBOARD_SCROLL_STEP)),

        Key::Char('s') => Some(AppCommand::ToggleSort(column)),
        Key::Char('[') => Some(AppCommand::TogglePin {
            column,
            side: PinSide::Left,
        }),
        Key::Char(']') => Some(AppCommand::TogglePin {
            column,
            side: PinSide::Right,
        }),

        Key::Char('n') | Key::PageDown => Some(AppCommand::NextPage),
        Key::Char('p') | Key::PageUp => Some(AppCommand::PreviousPage),

        Key::Char('e') | Key::Enter => Some(AppCommand::BeginCellEdit),
        Key::Char(' ') => state
            .focused_period()
            .map(|period| AppCommand::ToggleRowSelection(period.id)),
        Key::Char('d') => Some(AppCommand::EnterDateRangeMode),
        Key::Char('r') => Some(AppCommand::LoadTransactions {
            force_refresh: true,
        }),
        Key::Esc if state.status.is_some() => Some(AppCommand::DismissNotice),

        _ => None,
    }
}

/// Pointer input only reaches the table in normal mode; wheel scrolls directly
pub fn handle_pointer_input(event: PointerEvent, state: &AppState) -> Option<AppCommand> {
    if state.input_mode != InputMode::Normal || state.help_visible {
        // a release still has to end a drag armed before the mode changed
        return match event.kind {
            PointerKind::Up => Some(AppCommand::Pointer(event)),
            _ => None,
        };
    }

    match event.kind {
        PointerKind::Wheel(delta) => Some(AppCommand::ScrollColumns(delta)),
        _ => Some(AppCommand::Pointer(event)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::columns::ColumnId;

    fn key(state: &AppState, key: Key) -> Option<AppCommand> {
        handle_key_input(KeyEvent::new(key), state)
    }

    #[test]
    fn table_keys_target_focused_column() {
        let mut state = AppState::new();
        state.cursor.column = ColumnId::Liters;

        assert_eq!(
            key(&state, Key::Char('s')),
            Some(AppCommand::ToggleSort(ColumnId::Liters))
        );
        assert_eq!(
            key(&state, Key::Char(']')),
            Some(AppCommand::TogglePin {
                column: ColumnId::Liters,
                side: PinSide::Right
            })
        );
    }

    #[test]
    fn edit_mode_captures_typing() {
        let mut state = AppState::new();
        state.input_mode = InputMode::CellEdit;

        assert_eq!(key(&state, Key::Char('q')), Some(AppCommand::AppendEditChar('q')));
        assert_eq!(key(&state, Key::Enter), Some(AppCommand::SubmitCellEdit));
        assert_eq!(key(&state, Key::Esc), Some(AppCommand::CancelCellEdit));
    }

    #[test]
    fn notice_only_accepts_dismissal() {
        let mut state = AppState::new();
        state.input_mode = InputMode::Notice;

        assert_eq!(key(&state, Key::Char('s')), None);
        assert_eq!(key(&state, Key::Esc), Some(AppCommand::DismissNotice));
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut state = AppState::new();
        state.input_mode = InputMode::DateRange;
        assert_eq!(
            handle_key_input(KeyEvent::with_ctrl(Key::Char('c')), &state),
            Some(AppCommand::Quit)
        );
    }

    #[test]
    fn wheel_scrolls_and_modes_block_pointer() {
        let mut state = AppState::new();
        let wheel = PointerEvent::new(PointerKind::Wheel(4), 10, 3);
        assert_eq!(
            handle_pointer_input(wheel, &state),
            Some(AppCommand::ScrollColumns(4))
        );

        state.input_mode = InputMode::CellEdit;
        let down = PointerEvent::new(PointerKind::Down, 10, 3);
        assert_eq!(handle_pointer_input(down, &state), None);
        let up = PointerEvent::new(PointerKind::Up, 10, 3);
        assert_eq!(handle_pointer_input(up, &state), Some(AppCommand::Pointer(up)));
    }
}
