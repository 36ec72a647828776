use ratatui::prelude::Rect;
use ratatui::{
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::state::{AppState, StatusMessage};
use crate::ui::theme;

/// One line under the table: the open edit, the focused cell's last
/// write-back error, or the latest status message.
pub fn render_status_line(f: &mut Frame, area: Rect, state: &AppState) {
    let line = if let Some(edit) = &state.cell_edit {
        let mut spans = vec![
            Span::styled(format!("{}: ", edit.field.label()), theme::header_style()),
            Span::styled(edit.buffer.clone(), theme::edit_style()),
        ];
        if let Some(error) = &edit.validation_error {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(error.clone(), theme::error_style()));
        }
        Line::from(spans)
    } else if let Some(error) = focused_cell_error(state) {
        Line::from(Span::styled(error, theme::error_style()))
    } else {
        match &state.status {
            Some(StatusMessage::Info(message)) => {
                Line::from(Span::styled(message.clone(), theme::success_style()))
            }
            Some(StatusMessage::Error(message)) => {
                Line::from(Span::styled(message.clone(), theme::error_style()))
            }
            None => Line::default(),
        }
    };

    f.render_widget(Paragraph::new(line), area);
}

fn focused_cell_error(state: &AppState) -> Option<String> {
    let period = state.focused_period()?;
    let field = state.cursor.column.edit_field()?;
    state
        .cell_error(period.id, field)
        .map(|error| format!("{} not saved: {}", field.label(), error))
}
