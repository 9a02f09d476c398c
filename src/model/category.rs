//! A catalog category.
//!
//! # Actor Framework
//! This struct implements the [`ActorEntity`](actor_framework::ActorEntity) trait, see
//! [`crate::category_actor`]. The name is the store-wide unique key, so two categories can
//! never share one.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub u32);

impl From<u32> for CategoryId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "category_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Payload for creating a category.
#[derive(Debug, Clone)]
pub struct CategoryCreate {
    pub name: String,
}

/// Renames a category.
#[derive(Debug, Clone)]
pub struct CategoryUpdate {
    pub name: String,
}
