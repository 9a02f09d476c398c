//! # Order Actor
//!
//! Order ledger of the shop: creates orders and moves them through the state machine
//! documented on [`Order`](crate::model::Order).
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Order`]
//! - [`error`] - [`OrderError`] type for type-safe error handling
//! - [`actions`] - [`OrderAction`], one per state machine edge
//! - [`new()`] - Factory function that creates the actor and client
//!
//! The actor is started with an item client as its context (see
//! [`ShopSystem`](crate::lifecycle::ShopSystem)); order creation reads the item through it.
//!
//! ## Idempotence
//!
//! A transition against a terminal order, or into the state the order is already in, fails
//! with [`OrderError::AlreadyProcessed`] and changes nothing. Since actions are applied one at
//! a time, two racing transitions on the same order can never both succeed.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Order;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::new(buffer_size)
}
