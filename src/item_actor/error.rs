//! Error types shared by the Category and Item actors.

use thiserror::Error;

/// Errors that can occur during catalog operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    /// The requested category or item was not found.
    #[error("Catalog entry not found: {0}")]
    NotFound(String),

    /// A category with this name already exists.
    #[error("Category already exists: {0}")]
    DuplicateCategory(String),

    /// The input was rejected before touching the store.
    #[error("Catalog validation error: {0}")]
    Validation(String),

    /// The code pool cannot cover the request. Nothing was withdrawn.
    #[error("Out of stock: requested {requested}, available {available}")]
    OutOfStock { requested: u32, available: u32 },

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
