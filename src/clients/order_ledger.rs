//! # Order Ledger
//!
//! High-level API for the Order actor. Creation validation and price snapshotting happen in
//! the actor's `on_create` hook; this wrapper only turns calls into requests and framework
//! errors into [`OrderError`].
use crate::model::{ItemId, Order, OrderCreate, OrderFilter, OrderId, OrderStatus, UserId};
use crate::order_actor::{OrderAction, OrderError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use std::cmp::Reverse;
use tracing::{debug, instrument};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderLedger {
    inner: ResourceClient<Order>,
}

impl OrderLedger {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Creates a `pending` order with price and kind copied from the item.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        user_id: UserId,
        item_id: ItemId,
        quantity: u32,
    ) -> Result<Order, OrderError> {
        debug!("Sending request");
        let id = self
            .inner
            .create(OrderCreate {
                user_id,
                item_id,
                quantity,
            })
            .await
            .map_err(Self::map_error)?;
        self.get_order(id).await
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, OrderError> {
        self.get(id.clone())
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    /// `pending -> awaiting_verification`, recording the buyer's payment reference.
    #[instrument(skip(self))]
    pub async fn record_txn(&self, id: OrderId, reference: &str) -> Result<Order, OrderError> {
        self.action(id, OrderAction::RecordTxn(reference.to_string()))
            .await
    }

    /// Applies one edge of the state machine.
    #[instrument(skip(self))]
    pub async fn transition(&self, id: OrderId, target: OrderStatus) -> Result<Order, OrderError> {
        self.action(id, OrderAction::Transition(target)).await
    }

    /// Voucher confirm: marks the order delivered and stores its codes.
    #[instrument(skip(self, codes), fields(count = codes.len()))]
    pub async fn attach_codes(&self, id: OrderId, codes: Vec<String>) -> Result<Order, OrderError> {
        self.action(id, OrderAction::Deliver(codes)).await
    }

    /// Orders matching `filter`, newest first.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: OrderFilter) -> Result<Vec<Order>, OrderError> {
        let mut orders: Vec<Order> = ActorClient::list(self)
            .await?
            .into_iter()
            .filter(|order| filter.matches(order))
            .collect();
        orders.sort_by_key(|order| Reverse((order.created_at, order.id.0)));
        Ok(orders)
    }

    async fn action(&self, id: OrderId, action: OrderAction) -> Result<Order, OrderError> {
        debug!(?action, "Sending request");
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderLedger {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError<OrderError>) -> Self::Error {
        match e {
            FrameworkError::Entity(e) => e,
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
