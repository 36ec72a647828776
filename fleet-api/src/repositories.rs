use crate::endpoints::{
    ScopeId, TransactionId,
    transactions::{CreateTransaction, ListTransactions, NewTransaction, UpdateTransaction},
};

#[derive(Default)]
pub struct TransactionRepository {
    scope_id: ScopeId,
}

impl TransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope(mut self, scope_id: impl Into<ScopeId>) -> Self {
        self.scope_id = scope_id.into();
        self
    }

    pub fn list(&self) -> ListTransactions {
        ListTransactions::new(self.scope_id.clone())
    }

    pub fn create(&self, transaction: NewTransaction) -> CreateTransaction {
        CreateTransaction::new(self.scope_id.clone(), transaction)
    }

    pub fn update(&self, transaction_id: TransactionId) -> UpdateTransaction {
        UpdateTransaction::new(transaction_id)
    }
}
