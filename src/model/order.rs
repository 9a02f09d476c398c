//! Represents a customer order.
//!
//! # Actor Framework
//! This struct implements the [`ActorEntity`](actor_framework::ActorEntity) trait, see
//! [`crate::order_actor`]. Price, kind and total are copied from the item when the order is
//! created and never recomputed.
//!
//! # State machine
//!
//! ```text
//! pending --(buyer supplies txn)--> awaiting_verification
//! awaiting_verification --(confirm, voucher)--> delivered
//! awaiting_verification --(confirm, recharge)--> paid
//! paid --(done)--> delivered
//! pending | awaiting_verification | paid --(reject)--> rejected
//! ```

use crate::model::{ItemId, ItemKind};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Chat user id of a buyer or admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    AwaitingVerification,
    Paid,
    Delivered,
    Rejected,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::AwaitingVerification => "awaiting_verification",
            OrderStatus::Paid => "paid",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Rejected)
    }

    /// Whether `self -> to` is an edge of the state machine for an order of `kind`.
    pub fn can_transition(&self, to: OrderStatus, kind: ItemKind) -> bool {
        use OrderStatus::*;
        match (self, to) {
            (Pending, AwaitingVerification) => true,
            (AwaitingVerification, Delivered) => kind == ItemKind::Voucher,
            (AwaitingVerification, Paid) => kind == ItemKind::Recharge,
            (Paid, Delivered) => kind == ItemKind::Recharge,
            (Pending | AwaitingVerification | Paid, Rejected) => true,
            _ => false,
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub item_id: ItemId,
    pub item_kind: ItemKind,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub txn_reference: Option<String>,
    #[serde(default)]
    pub delivered_codes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// A fresh pending order. Price and kind are filled in from the item by `on_create`.
    pub fn new(id: OrderId, user_id: UserId, item_id: ItemId, quantity: u32) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            item_id,
            item_kind: ItemKind::Voucher,
            quantity,
            unit_price: Decimal::ZERO,
            total: Decimal::ZERO,
            status: OrderStatus::Pending,
            txn_reference: None,
            delivered_codes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Payload for creating a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub quantity: u32,
}

/// Orders only change through [`OrderAction`](crate::order_actor::OrderAction)s.
#[derive(Debug, Clone)]
pub enum OrderUpdate {}

/// Selection for the admin order view. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub user_id: Option<UserId>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        self.status.map_or(true, |s| s == order.status)
            && self.user_id.map_or(true, |u| u == order.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn terminal_states_have_no_exits() {
        for from in [Delivered, Rejected] {
            for to in [Pending, AwaitingVerification, Paid, Delivered, Rejected] {
                assert!(!from.can_transition(to, ItemKind::Voucher));
                assert!(!from.can_transition(to, ItemKind::Recharge));
            }
        }
    }

    #[test]
    fn confirm_edges_depend_on_kind() {
        assert!(AwaitingVerification.can_transition(Delivered, ItemKind::Voucher));
        assert!(!AwaitingVerification.can_transition(Delivered, ItemKind::Recharge));
        assert!(AwaitingVerification.can_transition(Paid, ItemKind::Recharge));
        assert!(!AwaitingVerification.can_transition(Paid, ItemKind::Voucher));
        assert!(Paid.can_transition(Delivered, ItemKind::Recharge));
        assert!(!Pending.can_transition(Delivered, ItemKind::Voucher));
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AwaitingVerification).unwrap(),
            "\"awaiting_verification\""
        );
        assert_eq!(AwaitingVerification.to_string(), "awaiting_verification");
    }

    #[test]
    fn filter_matches_status_and_user() {
        let order = Order::new(OrderId(1), UserId(7), ItemId(1), 1);
        assert!(OrderFilter::default().matches(&order));
        assert!(OrderFilter {
            status: Some(Pending),
            user_id: Some(UserId(7)),
        }
        .matches(&order));
        assert!(!OrderFilter {
            status: Some(Paid),
            user_id: None,
        }
        .matches(&order));
        assert!(!OrderFilter {
            status: None,
            user_id: Some(UserId(8)),
        }
        .matches(&order));
    }
}
