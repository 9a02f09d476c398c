//! Pure data structures (DTOs) implementing the [`ActorEntity`](actor_framework::ActorEntity) trait.

pub mod category;
pub mod item;
pub mod order;

pub use category::*;
pub use item::*;
pub use order::*;
