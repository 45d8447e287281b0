use crate::domain::order::OrderId;
use crate::domain::payment::TransactionStatus;
use crate::domain::ports::OrderStore;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for order statuses.
///
/// Uses `Arc<RwLock<HashMap<OrderId, TransactionStatus>>>`; clones share the same map.
/// Default store when no database path is configured.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, TransactionStatus>>>,
}

impl InMemoryOrderStore {
    /// Creates a new, empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn update(&self, order_id: &OrderId, status: &TransactionStatus) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders.insert(order_id.clone(), status.clone());
        Ok(())
    }

    async fn get(&self, order_id: &OrderId) -> Result<Option<TransactionStatus>> {
        let orders = self.orders.read().await;
        Ok(orders.get(order_id).cloned())
    }
}
