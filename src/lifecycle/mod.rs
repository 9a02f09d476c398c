//! Startup, wiring and shutdown of the shop, plus tracing setup.

pub mod shop_system;
pub mod tracing;

pub use shop_system::{ShopError, ShopSystem};
pub use self::tracing::setup_tracing;
