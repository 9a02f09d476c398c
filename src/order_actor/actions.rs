//! Custom actions for the Order actor.
//!
//! Every action moves the order along one edge of the state machine documented on
//! [`Order`](crate::model::Order). Each returns the order as committed.

use crate::model::OrderStatus;

/// Custom actions for Order entities.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Buyer supplied a payment reference: `pending -> awaiting_verification`.
    RecordTxn(String),
    /// Applies one edge without attaching codes (recharge confirm and done, reject).
    Transition(OrderStatus),
    /// Voucher confirm: `awaiting_verification -> delivered` with the allocated codes.
    Deliver(Vec<String>),
}
