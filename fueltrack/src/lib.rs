mod app;
pub mod app_core;
pub mod background;
pub mod cache;
pub mod commands;
pub mod engine;
pub mod events;
pub mod input;
pub mod logging;
pub mod settings;
pub mod source;
pub mod state;
pub mod ui;

pub use app::App;

// Always expose testing module (integration tests need it)
pub mod testing;
