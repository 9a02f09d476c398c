//! # Framework Errors
//!
//! Errors produced by the plumbing between a `ResourceClient` and its `ResourceActor`.
//! Entity errors travel through unchanged in [`FrameworkError::Entity`] so clients can
//! match on the domain error instead of parsing strings.

use crate::snapshot::SnapshotError;

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError<E: std::error::Error + 'static> {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unique key already taken: {0}")]
    Conflict(String),
    #[error("Snapshot write failed: {0}")]
    Persistence(#[from] SnapshotError),
    #[error(transparent)]
    Entity(E),
}
