//! # Category Actor
//!
//! Owns the catalog categories. Names are unique across the store; a second category with
//! the same name is refused by the framework's unique-key check and surfaces as
//! [`CatalogError::DuplicateCategory`] through [`CatalogClient`](crate::clients::CatalogClient).
//! Categories are never deleted.

pub mod entity;

pub use crate::item_actor::CatalogError;
pub use entity::CategoryAction;

use crate::model::Category;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Category actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Category>, ResourceClient<Category>) {
    ResourceActor::new(buffer_size)
}
