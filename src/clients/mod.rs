//! Domain clients wrapping the generic [`ResourceClient`](actor_framework::ResourceClient).

pub mod catalog_client;
pub mod order_ledger;

pub use catalog_client::*;
pub use order_ledger::*;
