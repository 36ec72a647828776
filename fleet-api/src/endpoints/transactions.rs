use super::{ScopeId, TransactionId};
use crate::macros::setter;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tower_api_client::{Method, Request, RequestData};

// Common

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub date: NaiveDateTime,
    pub provider: String,
    pub fuel_type: FuelType,
    pub liters: f64,
    pub total_value: f64,
    #[serde(default)]
    pub unit_price: f64,
    pub odometer: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ExpenseCategory>,
}

impl Transaction {
    /// Records without fuel or without a value are drafts and never shown.
    pub fn is_visible(&self) -> bool {
        self.liters > 0.0 && self.total_value > 0.0
    }
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Gasoline,
    Ethanol,
    Diesel,
    DieselS10,
    Cng,
    Electric,
}

impl FuelType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Gasoline => "Gasoline",
            Self::Ethanol => "Ethanol",
            Self::Diesel => "Diesel",
            Self::DieselS10 => "Diesel S10",
            Self::Cng => "CNG",
            Self::Electric => "Electric",
        }
    }
}

impl std::fmt::Display for FuelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Operational,
    Administrative,
    Maintenance,
    Travel,
}

impl ExpenseCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Operational => "Operational",
            Self::Administrative => "Administrative",
            Self::Maintenance => "Maintenance",
            Self::Travel => "Travel",
        }
    }
}

// Requests

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListTransactions {
    scope_id: ScopeId,
}

impl ListTransactions {
    pub fn new(scope_id: ScopeId) -> Self {
        Self { scope_id }
    }
}

impl Request for ListTransactions {
    type Data = ();
    type Response = TransactionsResponse;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/scopes/{}/fuel-transactions", self.scope_id).into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTransaction {
    #[serde(skip)]
    scope_id: ScopeId,
    transaction: NewTransaction,
}

impl CreateTransaction {
    pub fn new(scope_id: ScopeId, transaction: NewTransaction) -> Self {
        Self {
            scope_id,
            transaction,
        }
    }
}

impl Request for CreateTransaction {
    type Data = Self;
    type Response = TransactionResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/scopes/{}/fuel-transactions", self.scope_id).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub date: NaiveDateTime,
    pub provider: String,
    pub fuel_type: FuelType,
    pub liters: f64,
    pub total_value: f64,
    pub unit_price: f64,
    pub odometer: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ExpenseCategory>,
}

/// Partial update of a transaction. Only the present fields are sent, and
/// every field carries an absolute value, so replaying the same patch is a no-op.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liters: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odometer: Option<u64>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.liters.is_none()
            && self.total_value.is_none()
            && self.unit_price.is_none()
            && self.odometer.is_none()
    }

    /// Apply the patch to a local copy of a transaction.
    pub fn apply_to(&self, transaction: &mut Transaction) {
        if let Some(liters) = self.liters {
            transaction.liters = liters;
        }
        if let Some(total_value) = self.total_value {
            transaction.total_value = total_value;
        }
        if let Some(unit_price) = self.unit_price {
            transaction.unit_price = unit_price;
        }
        if let Some(odometer) = self.odometer {
            transaction.odometer = odometer;
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateTransaction {
    #[serde(skip)]
    transaction_id: TransactionId,
    #[serde(flatten)]
    patch: TransactionPatch,
}

impl UpdateTransaction {
    pub fn new(transaction_id: TransactionId) -> Self {
        Self {
            transaction_id,
            patch: TransactionPatch::default(),
        }
    }

    pub fn patch(mut self, patch: TransactionPatch) -> Self {
        self.patch = patch;
        self
    }

    setter!(opt patch.liters: f64);
    setter!(opt patch.total_value: f64);
    setter!(opt patch.unit_price: f64);
    setter!(opt patch.odometer: u64);
}

impl Request for UpdateTransaction {
    type Data = Self;
    type Response = TransactionResponse;
    const METHOD: Method = Method::PATCH;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/fuel-transactions/{}", self.transaction_id).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

// Responses

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub data: TransactionsData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionsData {
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub data: TransactionData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionData {
    pub transaction: Transaction,
}
