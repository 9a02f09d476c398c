//! # Item Actor
//!
//! Owns every catalog item, including each voucher's code pool, and is the inventory
//! allocator of the shop.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Item`]
//! - [`error`] - [`CatalogError`], shared with the category actor
//! - [`actions`] - [`ItemAction`] and [`ItemActionResult`] for stock management
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Atomic allocation
//!
//! `Allocate(n)` is checked and applied in one message: either the first `n` codes leave the
//! pool together with `n` units of quantity, or the item is untouched and the caller gets
//! `OutOfStock`. Two buyers confirmed at the same moment are simply two messages in the
//! mailbox, so the same code can never be handed out twice.
//!
//! ## Usage
//!
//! ```rust
//! use storefront::{category_actor, item_actor};
//! use storefront::clients::CatalogClient;
//! use storefront::model::NewItem;
//! use rust_decimal::Decimal;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (category_actor, categories) = category_actor::new(8);
//!     let (item_actor, items) = item_actor::new(8);
//!     tokio::spawn(category_actor.run(()));
//!     tokio::spawn(item_actor.run(categories.clone()));
//!     let catalog = CatalogClient::new(categories, items);
//!
//!     let games = catalog.add_category("Games").await?;
//!     let card = catalog
//!         .add_item(NewItem {
//!             category_id: games,
//!             title: "Gift Card".into(),
//!             kind: "voucher".into(),
//!             unit_price: Decimal::from(100),
//!             quantity: 2,
//!             codes: vec!["A".into(), "B".into()],
//!         })
//!         .await?;
//!
//!     assert_eq!(catalog.allocate(card.clone(), 1).await?, vec!["A".to_string()]);
//!     assert_eq!(catalog.get_item(card).await?.quantity, 1);
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Item;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Item actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Item>, ResourceClient<Item>) {
    ResourceActor::new(buffer_size)
}
