use anyhow::Result;
use crossterm::{
    event::{
        DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
        EventStream, KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fleet_api::Client;
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::sync::Arc;

use crate::background::{data_loader::DataLoader, BackgroundTaskManager};
use crate::cache::Cache;
use crate::commands::{executor, handlers, AppCommand};
use crate::input::{KeyEvent, PointerEvent};
use crate::logging::init_logging;
use crate::settings::Settings;
use crate::source::ApiTransactionSource;
use crate::state::AppState;

pub struct App {
    settings: Settings,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub async fn run(&self) -> Result<()> {
        let log_path = init_logging()?;

        tracing::info!("fueltrack starting, logging to {}", log_path.display());
        tracing::info!(
            "Scope {} at {}",
            self.settings.scope_id,
            self.settings.api_url
        );

        let cache = Arc::new(Cache::new().await?);
        let client = match &self.settings.api_token {
            Some(token) => Client::with_token(&self.settings.api_url, token),
            None => Client::new(&self.settings.api_url),
        };
        let source = Arc::new(ApiTransactionSource::new(client));

        let (data_tx, mut data_rx) = tokio::sync::mpsc::unbounded_channel();
        let data_loader = DataLoader::new(source, cache, data_tx);

        let mut ui_state = AppState::from_settings(&self.settings);
        let mut task_manager = BackgroundTaskManager::new();

        let mut terminal = self.init()?;
        let mut event_stream = EventStream::new();

        executor::execute_command(
            AppCommand::LoadTransactions {
                force_refresh: false,
            },
            &mut ui_state,
            &mut task_manager,
            &data_loader,
        );

        tracing::info!("Entering main event loop");

        let mut interval = tokio::time::interval(std::time::Duration::from_millis(100));
        loop {
            terminal.draw(|f| {
                crate::ui::render_app(f, &ui_state);
            })?;

            tokio::select! {
                _ = interval.tick() => {
                    if let Some(throbber_state) = ui_state.loading_state() {
                        throbber_state.calc_next();
                    }
                }
                Some(Ok(event)) = event_stream.next() => {
                    let command = match event {
                        Event::Key(key) if matches!(key.kind, KeyEventKind::Press) => {
                            tracing::debug!("Key press: {:?}", key);
                            handlers::handle_key_input(KeyEvent::from(key), &ui_state)
                        }
                        Event::Mouse(mouse) => PointerEvent::from_mouse(mouse)
                            .and_then(|pointer| handlers::handle_pointer_input(pointer, &ui_state)),
                        Event::FocusLost => Some(AppCommand::FocusLost),
                        _ => None,
                    };

                    if let Some(command) = command {
                        if !matches!(command, AppCommand::Pointer(_)) {
                            tracing::info!("Executing command: {:?}", command);
                        }
                        executor::execute_command(
                            command,
                            &mut ui_state,
                            &mut task_manager,
                            &data_loader,
                        );
                    }
                }
                Some(data_event) = data_rx.recv() => {
                    tracing::debug!("Received data event: {:?}", data_event);
                    crate::state::reducer::reduce_data_event(&mut ui_state, data_event);
                }
            }

            if ui_state.should_quit {
                tracing::info!("Quit requested, exiting event loop");
                break;
            }
        }

        tracing::info!("Cleaning up application");

        if task_manager.in_flight_writes() > 0 {
            tracing::warn!(
                "Abandoning {} unfinished write-backs",
                task_manager.in_flight_writes()
            );
        }
        task_manager.cancel_all();

        self.exit(terminal)?;

        Ok(())
    }

    fn init(&self) -> Result<Terminal<CrosstermBackend<std::io::Stdout>>, std::io::Error> {
        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange
        )?;
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend)
    }

    fn exit(
        &self,
        mut terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<(), std::io::Error> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableFocusChange
        )?;
        terminal.show_cursor()?;
        Ok(())
    }
}
