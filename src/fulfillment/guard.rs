//! Keyed in-flight guard: at most one `resolve` per order at a time.
//!
//! Entries live in a shared `DashMap` and are removed once nobody holds or waits on them, so
//! the map only ever contains orders that are being resolved right now.

use crate::model::OrderId;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Clone, Default)]
pub struct OrderGuards {
    locks: Arc<DashMap<OrderId, Arc<Mutex<()>>>>,
}

impl OrderGuards {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other caller holds `order_id`, then holds it until the guard drops.
    pub async fn acquire(&self, order_id: OrderId) -> OrderGuard {
        // Clone the Arc out before awaiting so no shard lock is held across the await.
        let lock = self.locks.entry(order_id.clone()).or_default().clone();
        let permit = lock.lock_owned().await;
        OrderGuard {
            permit: Some(permit),
            order_id,
            locks: Arc::clone(&self.locks),
        }
    }

    /// Orders currently held or waited on.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

pub struct OrderGuard {
    permit: Option<OwnedMutexGuard<()>>,
    order_id: OrderId,
    locks: Arc<DashMap<OrderId, Arc<Mutex<()>>>>,
}

impl OrderGuard {
    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }
}

impl Drop for OrderGuard {
    fn drop(&mut self) {
        // The permit holds its own Arc to the mutex; release it first so a count of one
        // means only the map still references the entry.
        self.permit.take();
        self.locks
            .remove_if(&self.order_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn same_order_is_serialized() {
        let guards = OrderGuards::new();
        let inside = Arc::new(AtomicU32::new(0));
        let mut tasks = Vec::new();

        for _ in 0..8 {
            let guards = guards.clone();
            let inside = inside.clone();
            tasks.push(tokio::spawn(async move {
                let _guard = guards.acquire(OrderId(1)).await;
                assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                tokio::time::sleep(Duration::from_millis(2)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        assert!(guards.is_empty());
    }

    #[tokio::test]
    async fn distinct_orders_do_not_block_each_other() {
        let guards = OrderGuards::new();
        let first = guards.acquire(OrderId(1)).await;
        let second = tokio::time::timeout(Duration::from_millis(100), guards.acquire(OrderId(2)))
            .await
            .expect("second order must not wait on the first");
        assert_eq!(guards.len(), 2);
        assert_eq!(second.order_id(), &OrderId(2));

        drop(first);
        drop(second);
        assert!(guards.is_empty());
    }
}
