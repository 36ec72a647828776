pub mod empty_state;
pub mod help_bar;
pub mod help_popup;
pub mod loading_indicator;
pub mod notice;
pub mod popup;
pub mod range_input;
pub mod screen_title;
pub mod status_line;
