//! Reusable layout builders for consistent screen structure.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::theme::{
    HELP_BAR_HEIGHT, RANGE_INPUT_HEIGHT, SCREEN_MARGIN, STATUS_HEIGHT, TITLE_HEIGHT,
};

/// Areas of the main screen. `range_input` is only present while a date
/// range is being typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    pub title: Rect,
    pub range_input: Option<Rect>,
    pub content: Rect,
    pub status: Rect,
    pub help: Rect,
}

/// Standard screen layout with title, optional range input, content area,
/// status line and help bar.
pub fn screen_layout(area: Rect, with_range_input: bool) -> ScreenAreas {
    let mut constraints = vec![Constraint::Length(TITLE_HEIGHT)];
    if with_range_input {
        constraints.push(Constraint::Length(RANGE_INPUT_HEIGHT));
    }
    constraints.extend([
        Constraint::Min(5),
        Constraint::Length(STATUS_HEIGHT),
        Constraint::Length(HELP_BAR_HEIGHT),
    ]);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(SCREEN_MARGIN)
        .constraints(constraints)
        .split(area);

    let (range_input, rest) = if with_range_input {
        (Some(chunks[1]), &chunks[2..])
    } else {
        (None, &chunks[1..])
    };

    ScreenAreas {
        title: chunks[0],
        range_input,
        content: rest[0],
        status: rest[1],
        help: rest[2],
    }
}

/// Split a title area into title text and loading indicator.
///
/// Returns (title_text_area, loading_indicator_area)
pub fn title_with_loading(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    (chunks[0], chunks[1])
}

/// Create a centered popup rectangle.
///
/// # Arguments
/// * `percent_x` - Width as percentage of parent (0-100)
/// * `percent_y` - Height as percentage of parent (0-100)
/// * `area` - The parent area to center within
pub fn centered_popup(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Standard popup sizes
pub mod popup_sizes {
    /// Medium popup (60% x 30%) - for notices
    pub const MEDIUM: (u16, u16) = (60, 30);

    /// Large popup (80% x 80%) - for help screens
    pub const LARGE: (u16, u16) = (80, 80);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_input_sits_between_title_and_content() {
        let areas = screen_layout(Rect::new(0, 0, 100, 40), true);
        let input = areas.range_input.unwrap();

        assert_eq!(input.height, RANGE_INPUT_HEIGHT);
        assert!(areas.title.y < input.y);
        assert!(input.y < areas.content.y);
        assert_eq!(areas.help.height, HELP_BAR_HEIGHT);
    }

    #[test]
    fn popup_is_centered() {
        let popup = centered_popup(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!(popup, Rect::new(25, 10, 50, 20));
    }
}
