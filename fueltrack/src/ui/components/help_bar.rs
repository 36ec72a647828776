//! Shared help bar component for bottom navigation hints.

use ratatui::prelude::Rect;
use ratatui::{
    layout::Alignment,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::state::InputMode;
use crate::ui::theme;

pub fn render_help_bar(f: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(text)
        .style(theme::help_text_style())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, area);
}

pub const HELP_TEXT_DEFAULT: &str =
    "s sort · [ ] pin · e edit · d dates · n/p page · r refresh · ? help";

/// Hint for the current input mode.
pub fn help_text(mode: InputMode) -> &'static str {
    match mode {
        InputMode::Normal => HELP_TEXT_DEFAULT,
        InputMode::CellEdit => "Enter: save · Esc: cancel",
        InputMode::DateRange => "YYYY-MM-DD..YYYY-MM-DD · Enter: apply (empty clears) · Esc: cancel",
        InputMode::Notice => "Enter/Esc: dismiss",
    }
}
