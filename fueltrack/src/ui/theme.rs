//! Centralized theme constants and style functions for consistent UI styling.

use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// Colors
// =============================================================================

/// Background color for the focused row
pub const COLOR_SELECTION_BG: Color = Color::DarkGray;

/// Color for table headers
pub const COLOR_HEADER: Color = Color::Yellow;

/// Color for help text and secondary information
pub const COLOR_HELP_TEXT: Color = Color::Gray;

/// Color for screen titles and accent text
pub const COLOR_TITLE: Color = Color::Cyan;

/// Color for loading/status messages
pub const COLOR_LOADING: Color = Color::Yellow;

/// Color for cells with a failed write-back and for error messages
pub const COLOR_ERROR: Color = Color::Red;

/// Color for confirmations
pub const COLOR_SUCCESS: Color = Color::Green;

/// Color for the pinned block dividers
pub const COLOR_DIVIDER: Color = Color::Blue;

/// Border color for blocking notices
pub const COLOR_BORDER_DANGER: Color = Color::Red;

/// Border color for accent/highlighted elements
pub const COLOR_BORDER_ACCENT: Color = Color::Cyan;

// =============================================================================
// Layout Constants
// =============================================================================

/// Standard margin around screen content
pub const SCREEN_MARGIN: u16 = 1;

/// Height of the title/header area
pub const TITLE_HEIGHT: u16 = 1;

/// Height of the help bar at the bottom
pub const HELP_BAR_HEIGHT: u16 = 3;

/// Height of the date range input when visible
pub const RANGE_INPUT_HEIGHT: u16 = 3;

/// Height of the status line
pub const STATUS_HEIGHT: u16 = 1;

// =============================================================================
// Style Functions
// =============================================================================

/// Style for the focused row
pub fn selection_style() -> Style {
    Style::default().bg(COLOR_SELECTION_BG)
}

/// Style for the focused cell inside the focused row
pub fn cursor_style() -> Style {
    Style::default()
        .bg(COLOR_SELECTION_BG)
        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
}

/// Style for table headers
pub fn header_style() -> Style {
    Style::default()
        .fg(COLOR_HEADER)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Style for help bar text
pub fn help_text_style() -> Style {
    Style::default().fg(COLOR_HELP_TEXT)
}

/// Style for screen titles
pub fn title_style() -> Style {
    Style::default()
        .fg(COLOR_TITLE)
        .add_modifier(Modifier::BOLD)
}

/// Style for loading/status messages
pub fn loading_style() -> Style {
    Style::default().fg(COLOR_LOADING)
}

pub fn error_style() -> Style {
    Style::default().fg(COLOR_ERROR)
}

pub fn success_style() -> Style {
    Style::default().fg(COLOR_SUCCESS)
}

/// Cells whose write-back has not settled yet
pub fn pending_style() -> Style {
    Style::default()
        .fg(COLOR_HELP_TEXT)
        .add_modifier(Modifier::ITALIC)
}

/// Cell being edited
pub fn edit_style() -> Style {
    Style::default()
        .fg(COLOR_LOADING)
        .add_modifier(Modifier::BOLD)
}

pub fn divider_style() -> Style {
    Style::default().fg(COLOR_DIVIDER)
}

/// Style for danger/warning borders
pub fn danger_border_style() -> Style {
    Style::default()
        .fg(COLOR_BORDER_DANGER)
        .add_modifier(Modifier::BOLD)
}

/// Style for accent borders
pub fn accent_border_style() -> Style {
    Style::default().fg(COLOR_BORDER_ACCENT)
}
