//! # Actor Framework
//!
//! Building blocks for type-safe, concurrent actor systems: a **resource-oriented** API
//! (create / get / list / update plus custom actions) on top of the **Actor Model**.
//!
//! ## Why ROA + Actor Model?
//!
//! - Each resource type (category, item, order) gets its own actor with isolated state.
//! - An actor processes its mailbox sequentially, so a check-then-modify inside one request
//!   never interleaves with another request against the same store. This is what lets an item
//!   actor hand out a single-use code exactly once, no matter how many callers ask at once.
//! - When resources need to interact they exchange **Action messages** through clients that
//!   are injected as context, instead of sharing memory.
//!
//! **Further Reading**:
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - domain models and their hooks
//! 2. **Runtime Layer** ([`ResourceActor`]) - message processing, draft/commit, persistence
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - type-safe communication
//!
//! ## Context Injection Pattern
//!
//! Dependencies are injected at **runtime** via `run()`, not at construction time:
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor, ResourceClient};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Aisle { id: u32 }
//! #[derive(Debug)] struct AisleCreate;
//! #[derive(Debug)] struct NoUpdate;
//! #[derive(Debug)] enum NoAction {}
//! #[derive(Debug, thiserror::Error)] #[error("no such aisle")] struct AisleError;
//!
//! #[async_trait]
//! impl ActorEntity for Aisle {
//!     type Id = u32; type Create = AisleCreate; type Update = NoUpdate; type Action = NoAction;
//!     type ActionResult = (); type Context = (); type Error = AisleError;
//!     fn id(&self) -> u32 { self.id }
//!     fn from_create_params(id: u32, _: AisleCreate) -> Result<Self, Self::Error> { Ok(Self { id }) }
//!     async fn on_update(&mut self, _: NoUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
//!     async fn handle_action(&mut self, _: NoAction, _: &()) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! // A Bin must sit in an existing Aisle; it receives the aisle client as its context.
//! #[derive(Clone, Debug)] struct Bin { id: u32, aisle: u32 }
//! #[derive(Debug)] struct BinCreate { aisle: u32 }
//!
//! #[async_trait]
//! impl ActorEntity for Bin {
//!     type Id = u32; type Create = BinCreate; type Update = NoUpdate; type Action = NoAction;
//!     type ActionResult = (); type Context = ResourceClient<Aisle>; type Error = AisleError;
//!     fn id(&self) -> u32 { self.id }
//!     fn from_create_params(id: u32, p: BinCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, aisle: p.aisle })
//!     }
//!     async fn on_create(&mut self, aisles: &ResourceClient<Aisle>) -> Result<(), Self::Error> {
//!         match aisles.get(self.aisle).await {
//!             Ok(Some(_)) => Ok(()),
//!             _ => Err(AisleError),
//!         }
//!     }
//!     async fn on_update(&mut self, _: NoUpdate, _: &ResourceClient<Aisle>) -> Result<(), Self::Error> { Ok(()) }
//!     async fn handle_action(&mut self, _: NoAction, _: &ResourceClient<Aisle>) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     // 1. Create all actors (no dependencies yet)
//!     let (aisle_actor, aisles) = ResourceActor::<Aisle>::new(10);
//!     let (bin_actor, bins) = ResourceActor::<Bin>::new(10);
//!
//!     // 2. Wire dependencies when starting actors
//!     tokio::spawn(aisle_actor.run(()));
//!     tokio::spawn(bin_actor.run(aisles.clone()));
//!
//!     let aisle = aisles.create(AisleCreate).await.unwrap();
//!     assert!(bins.create(BinCreate { aisle }).await.is_ok());
//!     assert!(bins.create(BinCreate { aisle: 99 }).await.is_err());
//! }
//! ```
//!
//! ## Persistence
//!
//! [`snapshot::JsonSnapshot`] keeps a store on disk; see the [`snapshot`] module.
//!
//! ## Testing
//!
//! [`mock::MockClient`] hands out a real `ResourceClient<T>` answered from queued
//! expectations, so an actor's dependencies can be stubbed. See the [`mock`] module.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod snapshot;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
pub use snapshot::{JsonSnapshot, Persistence, SnapshotError, StoreImage};
