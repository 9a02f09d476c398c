//! Error types for the Order actor.

use crate::item_actor::CatalogError;
use crate::model::OrderStatus;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// Quantity below one or above the item's stock at order time.
    #[error("Invalid quantity: requested {requested}, available {available}")]
    InvalidQuantity { requested: u32, available: u32 },

    /// The transition is not an edge of the order state machine.
    #[error("Invalid transition from {from} to {to}")]
    InvalidState { from: OrderStatus, to: OrderStatus },

    /// The order is already terminal, or already in the requested state. Nothing changed.
    #[error("Order already processed: {status}")]
    AlreadyProcessed { status: OrderStatus },

    /// The order data provided is invalid.
    #[error("Order validation error: {0}")]
    Validation(String),

    /// The item lookup behind the order failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
