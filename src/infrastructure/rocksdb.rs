use crate::domain::order::OrderId;
use crate::domain::payment::TransactionStatus;
use crate::domain::ports::OrderStore;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing order statuses.
pub const CF_ORDERS: &str = "orders";

/// A persistent order store using RocksDB.
///
/// Keys are the raw order id bytes, values the JSON-encoded status. Survives
/// restarts, so duplicate webhook deliveries after a redeploy are still
/// recognized.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBOrderStore {
    db: Arc<DB>,
}

impl RocksDBOrderStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "orders" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_orders = ColumnFamilyDescriptor::new(CF_ORDERS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_orders])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn orders_cf(&self) -> Result<&ColumnFamily> {
        self.db.cf_handle(CF_ORDERS).ok_or_else(|| {
            PaymentError::StorageError(Box::new(std::io::Error::other(
                "Orders column family not found",
            )))
        })
    }
}

#[async_trait]
impl OrderStore for RocksDBOrderStore {
    async fn update(&self, order_id: &OrderId, status: &TransactionStatus) -> Result<()> {
        let value = serde_json::to_vec(status).map_err(|e| {
            PaymentError::StorageError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization error: {}", e),
            )))
        })?;

        let cf = self.orders_cf()?;
        self.db.put_cf(&cf, order_id.as_str().as_bytes(), value)?;
        Ok(())
    }

    async fn get(&self, order_id: &OrderId) -> Result<Option<TransactionStatus>> {
        let cf = self.orders_cf()?;
        let Some(bytes) = self.db.get_cf(&cf, order_id.as_str().as_bytes())? else {
            return Ok(None);
        };

        let status = serde_json::from_slice(&bytes).map_err(|e| {
            PaymentError::StorageError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Deserialization error: {}", e),
            )))
        })?;
        Ok(Some(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDBOrderStore::open(dir.path()).expect("Failed to open RocksDB");

        assert!(store.db.cf_handle(CF_ORDERS).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_order_store() {
        let dir = tempdir().unwrap();
        let store = RocksDBOrderStore::open(dir.path()).unwrap();
        let order = OrderId::new("A1").unwrap();

        store
            .update(&order, &TransactionStatus::new("paid"))
            .await
            .unwrap();

        let retrieved = store.get(&order).await.unwrap();
        assert_eq!(retrieved, Some(TransactionStatus::new("paid")));

        assert!(
            store
                .get(&OrderId::new("A2").unwrap())
                .await
                .unwrap()
                .is_none()
        );
    }
}
