use fleet_api::endpoints::{transactions::Transaction, ScopeId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Could not find cache directory")]
    NoCacheDir,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedTransactions {
    pub transactions: Vec<Transaction>,
    pub cached_at: i64, // Unix timestamp
}

/// Last fetched transaction list per scope, stored as JSON files.
#[derive(Debug, Clone)]
pub struct Cache {
    cache_dir: PathBuf,
}

impl Cache {
    pub async fn new() -> Result<Self, CacheError> {
        let cache_dir = dirs::cache_dir()
            .ok_or(CacheError::NoCacheDir)?
            .join("fueltrack")
            .join("data");
        Self::with_dir(cache_dir).await
    }

    pub async fn with_dir(cache_dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir).await?;
        Ok(Self { cache_dir })
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    fn transactions_path(&self, scope_id: &ScopeId) -> PathBuf {
        // scope ids are opaque, keep the file name portable
        let key: String = scope_id
            .as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.cache_dir.join(format!("transactions_{}.json", key))
    }

    pub async fn get_transactions(
        &self,
        scope_id: &ScopeId,
    ) -> Result<Option<CachedTransactions>, CacheError> {
        let path = self.transactions_path(scope_id);
        if !fs::try_exists(&path).await? {
            return Ok(None);
        }

        let data = fs::read_to_string(&path).await?;
        let cached: CachedTransactions = serde_json::from_str(&data)?;
        Ok(Some(cached))
    }

    pub async fn set_transactions(
        &self,
        scope_id: &ScopeId,
        transactions: &[Transaction],
    ) -> Result<(), CacheError> {
        let cached = CachedTransactions {
            transactions: transactions.to_vec(),
            cached_at: chrono::Utc::now().timestamp(),
        };

        let path = self.transactions_path(scope_id);
        let json = serde_json::to_string_pretty(&cached)?;
        fs::write(&path, json).await?;
        Ok(())
    }

    /// Drop the cached list so the next load goes to the source.
    pub async fn invalidate(&self, scope_id: &ScopeId) -> Result<(), CacheError> {
        match fs::remove_file(self.transactions_path(scope_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fleet_api::endpoints::{transactions::FuelType, TransactionId};

    fn transaction(id: &str) -> Transaction {
        Transaction {
            id: TransactionId::new(id),
            date: NaiveDate::from_ymd_opt(2024, 5, 2)
                .unwrap()
                .and_hms_opt(7, 15, 0)
                .unwrap(),
            provider: "BR Mania".to_string(),
            fuel_type: FuelType::Gasoline,
            liters: 32.5,
            total_value: 191.75,
            unit_price: 5.9,
            odometer: 54_000,
            category: None,
        }
    }

    #[tokio::test]
    async fn missing_scope_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::with_dir(dir.path()).await.unwrap();

        let cached = cache.get_transactions(&ScopeId::new("truck-7")).await.unwrap();
        assert!(cached.is_none());
    }

    #[tokio::test]
    async fn stores_transactions_per_scope() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::with_dir(dir.path()).await.unwrap();
        let scope = ScopeId::new("truck-7");

        cache
            .set_transactions(&scope, &[transaction("1"), transaction("2")])
            .await
            .unwrap();

        let cached = cache.get_transactions(&scope).await.unwrap().unwrap();
        assert_eq!(cached.transactions.len(), 2);
        assert_eq!(cached.transactions[1], transaction("2"));
        assert!(cache
            .get_transactions(&ScopeId::new("van-2"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn invalidate_removes_entry_and_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::with_dir(dir.path()).await.unwrap();
        let scope = ScopeId::new("fleet/north");

        cache.set_transactions(&scope, &[transaction("1")]).await.unwrap();
        cache.invalidate(&scope).await.unwrap();
        assert!(cache.get_transactions(&scope).await.unwrap().is_none());

        cache.invalidate(&scope).await.unwrap();
    }
}
