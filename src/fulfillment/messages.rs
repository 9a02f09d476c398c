//! Texts sent to buyers and shown to admins.

use super::notify::Notice;
use crate::model::{Order, OrderStatus, UserId};
use crate::payment::PaymentRequest;

pub fn codes_delivered(order: &Order, title: &str, codes: &[String]) -> Notice {
    let label = if codes.len() == 1 { "Code" } else { "Codes" };
    let listed = codes
        .iter()
        .map(|code| format!("`{code}`"))
        .collect::<Vec<_>>()
        .join("\n");
    Notice::text(format!(
        "🎉 Your Order #{} is confirmed.\nItem: {title}\n{label}:\n{listed}\nThanks for shopping!",
        order.id.0
    ))
}

pub fn recharge_paid(order: &Order) -> Notice {
    Notice::text(format!(
        "✅ Your recharge Order #{} is marked as paid and will be processed by admin.",
        order.id.0
    ))
}

pub fn rejected(order: &Order, support_link: &str) -> Notice {
    Notice::text(format!(
        "❌ Your Order #{} was rejected. Contact support: {support_link}",
        order.id.0
    ))
}

pub fn completed(order: &Order, payee: &str) -> Notice {
    Notice::text(format!(
        "✅ Admin has successfully processed your Order #{}. Thanks for purchasing at {payee}.",
        order.id.0
    ))
}

/// Sent to every admin once the buyer has supplied a payment reference.
pub fn awaiting_verification(order: &Order, title: &str) -> Notice {
    Notice::text(format!(
        "🧾 Order #{} awaits verification.\nBuyer: {}\nItem: {title}\nQty: {}\nTotal: ₹{}\nTXN: {}",
        order.id.0,
        order.user_id,
        order.quantity,
        order.total.round_dp(2),
        order.txn_reference.as_deref().unwrap_or("-"),
    ))
}

/// Payment page for a freshly placed order. The UPI link rides along for QR rendering.
pub fn payment_details(title: &str, order: &Order, payment: &PaymentRequest, payee: &str) -> Notice {
    Notice {
        text: format!(
            "PAYMENT DETAILS\n\nItem: {title}\nQty: {}\nPrice/unit: ₹{}\nTotal: ₹{}\n\nUPI: {}",
            order.quantity,
            order.unit_price.round_dp(2),
            payment.amount.round_dp(2),
            payment.payment_handle,
        ),
        attachment: payment.upi_uri(payee),
    }
}

pub fn ack_delivered() -> String {
    "Delivered to user.".to_string()
}

pub fn ack_paid() -> String {
    "Marked as paid.".to_string()
}

pub fn ack_rejected() -> String {
    "Rejected and user notified.".to_string()
}

pub fn ack_completed() -> String {
    "User notified of completion.".to_string()
}

pub fn ack_already(order_number: u32, status: OrderStatus) -> String {
    format!("Order #{order_number} already {status}.")
}

pub fn ack_notify_failed(user: UserId, reason: &str) -> String {
    format!("Delivery failed: could not reach {user}: {reason}")
}
