use ratatui::{
    prelude::*,
    widgets::{List, ListItem},
    Frame,
};

use crate::ui::{layouts, theme};

pub fn render_help_popup(f: &mut Frame) {
    let inner = super::popup::render_popup_frame(
        f,
        f.area(),
        layouts::popup_sizes::LARGE,
        " Help (press ? or Esc to close) ",
        theme::accent_border_style(),
    );

    let items: Vec<ListItem> = help_items()
        .iter()
        .map(|(key, description)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:15}", key), theme::header_style()),
                Span::raw(*description),
            ]))
        })
        .collect();

    let list = List::new(items).style(Style::default().fg(Color::White));

    f.render_widget(list, inner);
}

fn help_items() -> Vec<(&'static str, &'static str)> {
    vec![
        ("↑/k ↓/j", "Move between rows"),
        ("←/h →/l", "Move between columns"),
        ("0 / $", "First / last column"),
        ("H / L", "Scroll columns left / right"),
        ("Drag", "Scroll columns with the mouse"),
        ("s / click", "Cycle sort of the focused column"),
        ("[ / ]", "Pin focused column left / right"),
        ("e / Enter", "Edit focused cell"),
        ("Space", "Select row"),
        ("d", "Filter by date range"),
        ("n / p", "Next / previous page"),
        ("r", "Refresh from the fleet service"),
        ("Esc", "Dismiss message"),
        ("?", "Toggle help"),
        ("q / Ctrl+C", "Quit"),
    ]
}
