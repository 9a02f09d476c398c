//! # Storefront
//!
//! > **Order & inventory fulfillment for a chat storefront.**
//!
//! Buyers browse a catalog, pick a quantity, pay out of band and send a payment reference. An
//! admin then confirms or rejects the order. Confirming a voucher hands the buyer single-use
//! codes from the item's pool; confirming a recharge marks it paid until an admin tops it up.
//! The chat transport itself is not part of this crate; it talks to the shop through
//! [`FulfillmentCoordinator`](fulfillment::FulfillmentCoordinator) and receives messages
//! through a [`Notifier`](fulfillment::Notifier).
//!
//! ## 🏗️ Architecture
//!
//! Every entity type is owned by one actor from the `actor-framework` crate. An actor handles
//! its mailbox one request at a time and applies each mutation to a draft, so a request either
//! commits completely or leaves the store untouched.
//!
//! ```text
//! FulfillmentCoordinator ──> OrderLedger ──> Order actor ──(context)──> Item actor
//!          │                                                               │
//!          ├──> CatalogClient ──> Item actor ──(context)──> Category actor ┘
//!          ├──> Directory (admins, settings)
//!          └──> Notifier (chat transport)
//! ```
//!
//! ## 🔒 A code goes to one order
//!
//! - The item actor checks and withdraws codes in a single message (`ItemAction::Allocate`),
//!   so concurrent confirms on one item can never split or share a code.
//! - The coordinator holds a per-order guard while resolving, and the order actor refuses to
//!   leave a terminal state, so a second confirm of the same order is a no-op
//!   (`Resolution::AlreadyProcessed`).
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Domain ([`model`])
//! Categories, items with their code pool, and orders with their state machine.
//!
//! ### 2. The Actors ([`category_actor`], [`item_actor`], [`order_actor`])
//! `ActorEntity` implementations: validation hooks, stock actions and order transitions.
//!
//! ### 3. The Clients ([`clients`])
//! [`CatalogClient`](clients::CatalogClient) and [`OrderLedger`](clients::OrderLedger) turn
//! actor messages into typed calls and framework errors into domain errors.
//!
//! ### 4. The Coordinator ([`fulfillment`])
//! Buyer checkout and admin resolution, plus notifications. Supported by [`directory`]
//! (admins, payment handle), [`quantity`] (the stateless keypad token) and [`payment`].
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`config`])
//! [`ShopSystem`](lifecycle::ShopSystem) spawns and wires everything from a
//! [`ShopConfig`](config::ShopConfig); [`setup_tracing`](lifecycle::setup_tracing) installs
//! the log subscriber.

pub mod category_actor;
pub mod clients;
pub mod config;
pub mod directory;
pub mod fulfillment;
pub mod item_actor;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod payment;
pub mod quantity;
