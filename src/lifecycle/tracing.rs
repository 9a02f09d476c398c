//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by `RUST_LOG`.
//! Module paths are hidden (`with_target(false)`); actors tag every line with `entity_type`
//! instead.
//!
//! ## Usage
//!
//! ```bash
//! # Lifecycle, commits and resolutions
//! RUST_LOG=info cargo run
//!
//! # Every request with its payload
//! RUST_LOG=debug cargo run
//!
//! # Only the coordinator
//! RUST_LOG=storefront::fulfillment=debug cargo run
//! ```
//!
//! ## Confirm trace
//!
//! Actors run in their own tasks, so their lines carry no request span. With `RUST_LOG=info`,
//! confirming a two-code voucher order reads:
//!
//! ```text
//! INFO Action ok entity_type="Item" id=item_1
//! INFO Action ok entity_type="Order" id=order_1
//! INFO resolve{order=order_1 order_id=OrderId(1) admin=UserId(1) action=Confirm}: Order resolved resolution=Delivered { .. }
//! ```
//!
//! A failed buyer notification adds a `WARN Notification failed` line per attempt; the order
//! keeps its new status.

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
