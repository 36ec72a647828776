use async_trait::async_trait;
use fleet_api::{
    endpoints::{
        transactions::{NewTransaction, Transaction, TransactionPatch},
        ScopeId, TransactionId,
    },
    Client, FleetApiError, Request,
};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Api(#[from] FleetApiError),
    #[error("transaction {0} not found")]
    NotFound(TransactionId),
    #[error("{0}")]
    Rejected(String),
}

/// Where raw transactions come from and where edits are written back.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn fetch_transactions(&self, scope_id: &ScopeId) -> Result<Vec<Transaction>, SourceError>;

    /// Must be safe to retry with the same patch.
    async fn update_transaction(
        &self,
        id: &TransactionId,
        patch: &TransactionPatch,
    ) -> Result<Transaction, SourceError>;

    async fn create_transaction(
        &self,
        scope_id: &ScopeId,
        transaction: NewTransaction,
    ) -> Result<Transaction, SourceError>;
}

/// [`TransactionSource`] backed by the fleet HTTP API.
pub struct ApiTransactionSource {
    client: Client,
}

impl ApiTransactionSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TransactionSource for ApiTransactionSource {
    async fn fetch_transactions(&self, scope_id: &ScopeId) -> Result<Vec<Transaction>, SourceError> {
        let req = Request::transactions().with_scope(scope_id.clone()).list();
        let response = self.client.send(req).await?;
        Ok(response.data.transactions)
    }

    async fn update_transaction(
        &self,
        id: &TransactionId,
        patch: &TransactionPatch,
    ) -> Result<Transaction, SourceError> {
        let req = Request::transactions().update(id.clone()).patch(patch.clone());
        let response = self.client.send(req).await?;
        Ok(response.data.transaction)
    }

    async fn create_transaction(
        &self,
        scope_id: &ScopeId,
        transaction: NewTransaction,
    ) -> Result<Transaction, SourceError> {
        let req = Request::transactions()
            .with_scope(scope_id.clone())
            .create(transaction);
        let response = self.client.send(req).await?;
        Ok(response.data.transaction)
    }
}
