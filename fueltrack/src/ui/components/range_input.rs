//! Date range input shown above the table.

use ratatui::prelude::Rect;
use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::theme;

pub fn render_range_input(f: &mut Frame, area: Rect, query: &str, error: Option<&str>) {
    let mut spans = vec![Span::styled(format!("{query}▏"), theme::loading_style())];
    if let Some(error) = error {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(error, theme::error_style()));
    }

    let input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Date range (Enter: apply, Esc: cancel)"),
    );

    f.render_widget(input, area);
}
