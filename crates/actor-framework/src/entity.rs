//! # ActorEntity Trait
//!
//! The contract every stored resource (category, item, order, …) implements so that one
//! generic [`ResourceActor`](crate::ResourceActor) can own it. Associated types pin down the
//! id, the create/update DTOs, the custom actions and the error type, so a `Category` actor
//! can never be handed an `ItemCreate` payload.
//!
//! # Hooks
//! - [`ActorEntity::from_create_params`] builds the entity synchronously.
//! - [`ActorEntity::on_create`] runs after construction with the injected context; use it to
//!   validate against other actors or to snapshot data from them.
//! - [`ActorEntity::on_update`] and [`ActorEntity::handle_action`] mutate a *draft* copy. The
//!   actor only commits the draft when the hook returns `Ok`, so a failing hook can never
//!   leave half-applied state behind.
//! - [`ActorEntity::unique_key`] lets an entity declare a key that must be unique across the
//!   whole store (e.g. a category name).

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by `ResourceActor`.
///
/// # Async & Context
/// The trait is `#[async_trait]` so hooks can call other actors. `Context` is injected into
/// every hook when the actor is started ("late binding"), which keeps construction free of
/// dependency cycles.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    /// Must be convertible from u32 for automatic ID generation.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Enum representing resource-specific operations (e.g. `Allocate`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// One enum per actor rather than one per message: callers match on a single type and the
    /// framework hands it back untouched inside [`FrameworkError::Entity`](crate::FrameworkError::Entity).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the entity's own id. Used when a store is rebuilt from a snapshot.
    fn id(&self) -> Self::Id;

    /// Construct the full entity from the ID and payload.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Key that must be unique across the store, if any.
    fn unique_key(&self) -> Option<String> {
        None
    }

    /// Invariants checked on every entity loaded from a snapshot.
    fn validate(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called after the entity is constructed and before it is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    // --- Action Handler (Async) ---

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
