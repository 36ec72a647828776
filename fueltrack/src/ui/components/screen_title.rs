//! Screen title with the active scope, date range and loading indicator.

use ratatui::prelude::Rect;
use ratatui::{
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::state::AppState;
use crate::ui::{layouts, theme};

use super::loading_indicator;

pub fn render_screen_title(f: &mut Frame, area: Rect, state: &AppState) {
    let (title_area, indicator_area) = layouts::title_with_loading(area);

    let mut spans = vec![
        Span::styled("Fuel history", theme::title_style()),
        Span::raw(format!(" · {}", state.scope_id)),
    ];
    if let Some(range) = state.engine.date_range() {
        spans.push(Span::styled(format!(" · {range}"), theme::loading_style()));
    }
    if !state.selected_periods.is_empty() {
        spans.push(Span::styled(
            format!(" · {} selected", state.selected_periods.len()),
            theme::help_text_style(),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), title_area);
    loading_indicator::render_loading_indicator(f, indicator_area, &state.loading);
}
