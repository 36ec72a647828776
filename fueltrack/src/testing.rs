use crate::app_core::{AppCore, DataEventHandler};
use crate::commands::executor::{self, Effect};
use crate::events::{AppCommand, DataEvent};
use crate::input::{Key, KeyEvent, PointerEvent, PointerKind};
use crate::source::{SourceError, TransactionSource};
use crate::state::AppState;
use async_trait::async_trait;
use fleet_api::endpoints::{
    transactions::{NewTransaction, Transaction, TransactionPatch},
    ScopeId, TransactionId,
};
use ratatui::layout::Rect;
use std::sync::{Arc, Mutex, MutexGuard};

/// Mock data event handler for tests (no real async tasks)
///
/// Commands run through execute_command_sync. Effects that would have been
/// spawned in production are recorded instead.
#[derive(Default)]
pub struct MockDataHandler {
    effects: Vec<Effect>,
}

impl MockDataHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }
}

impl DataEventHandler for MockDataHandler {
    fn execute_with_context(&mut self, command: AppCommand, state: &mut AppState) {
        if let Some(effect) = executor::execute_command_sync(command, state) {
            self.effects.push(effect);
        }
    }
}

pub struct TestApp {
    core: AppCore<MockDataHandler>,
}

impl TestApp {
    /// Create a new test app with mock handler
    pub fn new() -> Self {
        Self {
            core: AppCore::new(MockDataHandler::new()),
        }
    }

    /// Create a test app whose table was last rendered into `area`
    pub fn with_viewport(area: Rect) -> Self {
        let mut app = Self::new();
        app.set_viewport(area);
        app
    }

    pub fn set_viewport(&mut self, area: Rect) {
        self.core.state().table_area.set(area);
        self.core.state_mut().sync_viewport();
    }

    /// Send a single key event
    pub fn send_key(&mut self, key: Key) {
        self.core.handle_key(KeyEvent::new(key));
    }

    /// Send a key event with modifiers
    pub fn send_key_event(&mut self, event: KeyEvent) {
        self.core.handle_key(event);
    }

    /// Send multiple keys in sequence
    pub fn send_keys(&mut self, keys: &[Key]) {
        for key in keys {
            self.send_key(*key);
        }
    }

    /// Type a string, one character key per char
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.send_key(Key::Char(c));
        }
    }

    pub fn send_pointer(&mut self, kind: PointerKind, x: u16, y: u16) {
        self.core.handle_pointer(PointerEvent::new(kind, x, y));
    }

    pub fn send_command(&mut self, command: AppCommand) {
        self.core.execute(command);
    }

    /// Inject a data event (simulate API response or cache load)
    pub fn send_data_event(&mut self, event: DataEvent) {
        self.core.handle_data_event(event);
    }

    /// Get read-only access to current state
    pub fn state(&self) -> &AppState {
        self.core.state()
    }

    /// Effects requested so far, in order
    pub fn effects(&self) -> &[Effect] {
        self.core.handler().effects()
    }

    pub fn write_backs(&self) -> usize {
        self.effects()
            .iter()
            .filter(|e| matches!(e, Effect::WriteBack { .. }))
            .count()
    }

    /// Assert that the app should quit
    pub fn assert_should_quit(&self) {
        assert!(self.core.should_quit(), "Expected app to quit");
    }

    /// Assert that the app should NOT quit
    pub fn assert_not_quit(&self) {
        assert!(!self.core.should_quit(), "Expected app not to quit");
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct RecordingState {
    transactions: Vec<Transaction>,
    updates: Vec<(TransactionId, TransactionPatch)>,
    created: usize,
    fail_updates: bool,
    fail_fetches: bool,
}

/// In-memory [`TransactionSource`] that records the patches it receives.
/// Clones share the same store.
#[derive(Clone, Default)]
pub struct RecordingSource {
    inner: Arc<Mutex<RecordingState>>,
}

impl RecordingSource {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RecordingState {
                transactions,
                ..Default::default()
            })),
        }
    }

    pub fn failing_updates(self) -> Self {
        self.lock().fail_updates = true;
        self
    }

    pub fn failing_fetches(self) -> Self {
        self.lock().fail_fetches = true;
        self
    }

    pub fn update_count(&self) -> usize {
        self.lock().updates.len()
    }

    pub fn updates(&self) -> Vec<(TransactionId, TransactionPatch)> {
        self.lock().updates.clone()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.lock().transactions.clone()
    }

    fn lock(&self) -> MutexGuard<'_, RecordingState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TransactionSource for RecordingSource {
    async fn fetch_transactions(&self, _scope_id: &ScopeId) -> Result<Vec<Transaction>, SourceError> {
        let state = self.lock();
        if state.fail_fetches {
            return Err(SourceError::Rejected("fleet service unavailable".to_string()));
        }
        Ok(state.transactions.clone())
    }

    async fn update_transaction(
        &self,
        id: &TransactionId,
        patch: &TransactionPatch,
    ) -> Result<Transaction, SourceError> {
        let mut state = self.lock();
        state.updates.push((id.clone(), patch.clone()));
        if state.fail_updates {
            return Err(SourceError::Rejected("update rejected".to_string()));
        }

        let transaction = state
            .transactions
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| SourceError::NotFound(id.clone()))?;
        patch.apply_to(transaction);
        Ok(transaction.clone())
    }

    async fn create_transaction(
        &self,
        _scope_id: &ScopeId,
        transaction: NewTransaction,
    ) -> Result<Transaction, SourceError> {
        let mut state = self.lock();
        state.created += 1;
        let created = Transaction {
            id: TransactionId::new(format!("new-{}", state.created)),
            date: transaction.date,
            provider: transaction.provider,
            fuel_type: transaction.fuel_type,
            liters: transaction.liters,
            total_value: transaction.total_value,
            unit_price: transaction.unit_price,
            odometer: transaction.odometer,
            category: transaction.category,
        };
        state.transactions.push(created.clone());
        Ok(created)
    }
}
