use crate::cache::Cache;
use crate::engine::reconciler::WriteBack;
use crate::events::DataEvent;
use crate::source::TransactionSource;
use fleet_api::endpoints::{
    transactions::{NewTransaction, Transaction},
    ScopeId,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Cache-first loading and write-backs, reported as [`DataEvent`]s
#[derive(Clone)]
pub struct DataLoader {
    pub source: Arc<dyn TransactionSource>,
    pub cache: Arc<Cache>,
    pub data_tx: mpsc::UnboundedSender<DataEvent>,
}

fn visible(transactions: Vec<Transaction>) -> Vec<Transaction> {
    transactions.into_iter().filter(Transaction::is_visible).collect()
}

impl DataLoader {
    pub fn new(
        source: Arc<dyn TransactionSource>,
        cache: Arc<Cache>,
        data_tx: mpsc::UnboundedSender<DataEvent>,
    ) -> Self {
        Self {
            source,
            cache,
            data_tx,
        }
    }

    /// Deliver the cached list right away, then the fresh one from the source
    pub async fn load_transactions(&self, scope_id: ScopeId, force_refresh: bool) {
        tracing::info!(
            "Loading transactions for scope {} (force_refresh={})",
            scope_id,
            force_refresh
        );

        if !force_refresh {
            match self.cache.get_transactions(&scope_id).await {
                Ok(Some(cached)) => {
                    tracing::debug!("Loaded {} transactions from cache", cached.transactions.len());
                    let _ = self.data_tx.send(DataEvent::TransactionsCacheLoaded {
                        scope_id: scope_id.clone(),
                        transactions: visible(cached.transactions),
                    });
                }
                Ok(None) => tracing::debug!("No cached transactions found"),
                Err(e) => tracing::warn!("Ignoring unreadable cache: {}", e),
            }
        }

        self.fetch_transactions(scope_id).await;
    }

    async fn fetch_transactions(&self, scope_id: ScopeId) {
        match self.source.fetch_transactions(&scope_id).await {
            Ok(transactions) => {
                tracing::info!("Fetched {} transactions", transactions.len());
                if let Err(e) = self.cache.set_transactions(&scope_id, &transactions).await {
                    tracing::error!("Failed to cache transactions: {}", e);
                }
                let _ = self.data_tx.send(DataEvent::TransactionsLoaded {
                    scope_id,
                    transactions: visible(transactions),
                });
            }
            Err(e) => {
                tracing::error!("Failed to fetch transactions: {}", e);
                let _ = self.data_tx.send(DataEvent::LoadError {
                    error: e.to_string(),
                });
            }
        }
    }

    /// Write one edited field back, then invalidate and refetch the scope
    pub async fn update_transaction(&self, scope_id: ScopeId, write_back: WriteBack) {
        let WriteBack {
            period_id,
            field,
            transaction_id,
            patch,
        } = write_back;

        match self.source.update_transaction(&transaction_id, &patch).await {
            Ok(transaction) => {
                tracing::info!("Updated {} of transaction {}", field, transaction_id);
                let _ = self.data_tx.send(DataEvent::TransactionUpdated {
                    period_id,
                    field,
                    transaction,
                });
                self.invalidate_and_refetch(scope_id).await;
            }
            Err(e) => {
                tracing::error!("Failed to update transaction {}: {}", transaction_id, e);
                let _ = self.data_tx.send(DataEvent::TransactionUpdateFailed {
                    period_id,
                    field,
                    error: e.to_string(),
                });
            }
        }
    }

    pub async fn create_transaction(&self, scope_id: ScopeId, transaction: NewTransaction) {
        match self.source.create_transaction(&scope_id, transaction).await {
            Ok(transaction) => {
                tracing::info!("Created transaction {}", transaction.id);
                let _ = self
                    .data_tx
                    .send(DataEvent::TransactionCreated { transaction });
                self.invalidate_and_refetch(scope_id).await;
            }
            Err(e) => {
                tracing::error!("Failed to create transaction: {}", e);
                let _ = self.data_tx.send(DataEvent::TransactionCreateFailed {
                    error: e.to_string(),
                });
            }
        }
    }

    async fn invalidate_and_refetch(&self, scope_id: ScopeId) {
        if let Err(e) = self.cache.invalidate(&scope_id).await {
            tracing::error!("Failed to invalidate cache for {}: {}", scope_id, e);
        }
        self.fetch_transactions(scope_id).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::aggregator::{aggregate, test_support::*};
    use crate::engine::reconciler::Reconciler;
    use crate::engine::reconciler::EditField;
    use crate::testing::RecordingSource;

    async fn loader(
        source: RecordingSource,
        dir: &tempfile::TempDir,
    ) -> (DataLoader, mpsc::UnboundedReceiver<DataEvent>) {
        let cache = Arc::new(Cache::with_dir(dir.path()).await.unwrap());
        let (tx, rx) = mpsc::unbounded_channel();
        (DataLoader::new(Arc::new(source), cache, tx), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<DataEvent>) -> Vec<DataEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn serves_cache_before_fresh_data() {
        let dir = tempfile::tempdir().unwrap();
        let scope = ScopeId::new("truck-1");
        let (loader, mut rx) = loader(RecordingSource::new(two_week_fixture()), &dir).await;
        loader
            .cache
            .set_transactions(&scope, &[tx("old", "2024-01-01", 5.0, 20.0)])
            .await
            .unwrap();

        loader.load_transactions(scope.clone(), false).await;

        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            DataEvent::TransactionsCacheLoaded { transactions, .. } if transactions.len() == 1
        ));
        assert!(matches!(
            &events[1],
            DataEvent::TransactionsLoaded { transactions, .. } if transactions.len() == 3
        ));

        let cached = loader.cache.get_transactions(&scope).await.unwrap().unwrap();
        assert_eq!(cached.transactions.len(), 3);
    }

    #[tokio::test]
    async fn drops_records_without_fuel_or_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut transactions = two_week_fixture();
        transactions.push(tx("draft", "2024-03-05", 0.0, 0.0));
        let (loader, mut rx) = loader(RecordingSource::new(transactions), &dir).await;

        loader.load_transactions(ScopeId::new("truck-1"), true).await;

        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            DataEvent::TransactionsLoaded { transactions, .. } if transactions.len() == 3
        ));
    }

    #[tokio::test]
    async fn fetch_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let (loader, mut rx) = loader(RecordingSource::new(Vec::new()).failing_fetches(), &dir).await;

        loader.load_transactions(ScopeId::new("truck-1"), true).await;

        assert!(matches!(drain(&mut rx).as_slice(), [DataEvent::LoadError { .. }]));
    }

    #[tokio::test]
    async fn update_invalidates_cache_and_refetches() {
        let dir = tempfile::tempdir().unwrap();
        let scope = ScopeId::new("truck-1");
        let transactions = two_week_fixture();
        let source = RecordingSource::new(transactions.clone());
        let updates = source.clone();
        let (loader, mut rx) = loader(source, &dir).await;
        loader.cache.set_transactions(&scope, &transactions).await.unwrap();

        let periods = aggregate(&transactions);
        let write_back = Reconciler::default()
            .prepare(&periods, &transactions, periods[1].id, EditField::Value, "90")
            .unwrap();
        loader.update_transaction(scope.clone(), write_back).await;

        let events = drain(&mut rx);
        assert!(matches!(
            &events[0],
            DataEvent::TransactionUpdated { transaction, .. } if transaction.total_value == 90.0
        ));
        assert!(matches!(
            &events[1],
            DataEvent::TransactionsLoaded { transactions, .. }
                if transactions.iter().any(|t| t.total_value == 90.0)
        ));
        assert_eq!(updates.update_count(), 1);
    }

    #[tokio::test]
    async fn failed_update_skips_refetch() {
        let dir = tempfile::tempdir().unwrap();
        let transactions = two_week_fixture();
        let (loader, mut rx) =
            loader(RecordingSource::new(transactions.clone()).failing_updates(), &dir).await;

        let periods = aggregate(&transactions);
        let write_back = Reconciler::default()
            .prepare(&periods, &transactions, periods[1].id, EditField::Liters, "12")
            .unwrap();
        loader.update_transaction(ScopeId::new("truck-1"), write_back).await;

        assert!(matches!(
            drain(&mut rx).as_slice(),
            [DataEvent::TransactionUpdateFailed { field: EditField::Liters, .. }]
        ));
    }

    #[tokio::test]
    async fn create_reports_new_transaction_and_refetches() {
        let dir = tempfile::tempdir().unwrap();
        let source = RecordingSource::new(two_week_fixture());
        let store = source.clone();
        let (loader, mut rx) = loader(source, &dir).await;

        let template = tx("template", "2024-03-18", 25.0, 125.0);
        let new_transaction = fleet_api::endpoints::transactions::NewTransaction {
            date: template.date,
            provider: template.provider,
            fuel_type: template.fuel_type,
            liters: template.liters,
            total_value: template.total_value,
            unit_price: 5.0,
            odometer: 1300,
            category: None,
        };
        loader
            .create_transaction(ScopeId::new("truck-1"), new_transaction)
            .await;

        let events = drain(&mut rx);
        assert!(matches!(&events[0], DataEvent::TransactionCreated { .. }));
        assert!(matches!(
            &events[1],
            DataEvent::TransactionsLoaded { transactions, .. } if transactions.len() == 4
        ));
        assert_eq!(store.transactions().len(), 4);
    }
}
