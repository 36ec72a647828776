pub mod components;
pub mod format;
pub mod fueling_table;
pub mod geometry;
pub mod layouts;
pub mod theme;

use crate::state::{AppState, InputMode, LoadingState};
use components::*;
use ratatui::Frame;

/// Render dispatcher. The only state it writes is the table area kept for
/// pointer hit-testing.
pub fn render_app(f: &mut Frame, state: &AppState) {
    let areas = layouts::screen_layout(f.area(), state.input_mode == InputMode::DateRange);

    screen_title::render_screen_title(f, areas.title, state);
    if let Some(area) = areas.range_input {
        range_input::render_range_input(
            f,
            area,
            &state.range_input,
            state.range_error.as_deref(),
        );
    }

    if state.engine.periods().is_empty() {
        match &state.loading {
            LoadingState::Loading(..) | LoadingState::NotStarted => {
                empty_state::render_empty_state(
                    f,
                    areas.content,
                    "Fuel periods",
                    "Loading fuelings...",
                    None,
                )
            }
            LoadingState::Error(error) => empty_state::render_empty_state(
                f,
                areas.content,
                "Fuel periods",
                error,
                Some("Press r to retry"),
            ),
            LoadingState::Loaded => empty_state::render_empty_state(
                f,
                areas.content,
                "Fuel periods",
                "No fuelings recorded",
                Some("Press r to refresh"),
            ),
        }
    } else if state.engine.view().rows.is_empty() {
        empty_state::render_empty_state(
            f,
            areas.content,
            "Fuel periods",
            "No periods in this date range",
            Some("Press d and submit an empty range to clear it"),
        );
    } else {
        fueling_table::render(f, areas.content, state);
    }

    status_line::render_status_line(f, areas.status, state);
    help_bar::render_help_bar(f, areas.help, help_bar::help_text(state.input_mode));

    if let Some(message) = state.notice.as_deref() {
        notice::render_notice(f, message);
    }

    if state.help_visible {
        help_popup::render_help_popup(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render_app(f, state)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn shows_loading_before_first_data() {
        let state = AppState::new();
        assert!(screen(&state).contains("Loading fuelings..."));
    }

    #[test]
    fn shows_notice_and_help_overlays() {
        let mut state = AppState::new();
        state.loading = LoadingState::Loaded;
        state.notice = Some("Period has 2 fuelings".to_string());
        state.input_mode = InputMode::Notice;
        assert!(screen(&state).contains("Period has 2 fuelings"));

        state.notice = None;
        state.input_mode = InputMode::Normal;
        state.help_visible = true;
        assert!(screen(&state).contains("Help (press ? or Esc to close)"));
    }
}
