//! Payment request shown to the buyer after an order is placed.
//!
//! Payment itself happens out of band; the shop only renders where to pay and how much.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// UPI id from the shop settings. Empty when no admin has set one yet.
    pub payment_handle: String,
    pub amount: Decimal,
}

impl PaymentRequest {
    pub fn new(payment_handle: impl Into<String>, amount: Decimal) -> Self {
        Self {
            payment_handle: payment_handle.into(),
            amount,
        }
    }

    /// `upi://pay` deep link for the QR image. `None` without a payment handle.
    pub fn upi_uri(&self, payee: &str) -> Option<String> {
        let handle = self.payment_handle.trim();
        if handle.is_empty() {
            return None;
        }
        Some(format!(
            "upi://pay?pa={}&pn={}&cu=INR&am={:.2}",
            urlencoding::encode(handle),
            urlencoding::encode(payee.trim()),
            self.amount.round_dp(2)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_carries_handle_payee_and_amount() {
        let request = PaymentRequest::new("shop@upi", Decimal::from(200));
        assert_eq!(
            request.upi_uri("CodesProDiscounts").as_deref(),
            Some("upi://pay?pa=shop%40upi&pn=CodesProDiscounts&cu=INR&am=200.00")
        );
    }

    #[test]
    fn payee_cannot_break_the_query() {
        let request = PaymentRequest::new("shop@upi", Decimal::from(5));
        assert_eq!(
            request.upi_uri("Codes & Co=1").as_deref(),
            Some("upi://pay?pa=shop%40upi&pn=Codes%20%26%20Co%3D1&cu=INR&am=5.00")
        );
    }

    #[test]
    fn amount_is_rendered_with_two_decimals() {
        let request = PaymentRequest::new("shop@upi", Decimal::new(12346, 3));
        let uri = request.upi_uri("Shop").unwrap();
        assert!(uri.ends_with("&am=12.35"), "{uri}");
    }

    #[test]
    fn no_uri_without_handle() {
        assert_eq!(PaymentRequest::new("  ", Decimal::ONE).upi_uri("Shop"), None);
    }
}
