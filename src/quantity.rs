//! Stateless quantity picker.
//!
//! The buyer's keypad carries its whole state in a token such as `inc_3_2` (step, item id,
//! current quantity). Nothing is stored server side; every press is re-validated against the
//! item's stock at the time it arrives.

use crate::model::ItemId;
use crate::order_actor::OrderError;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Inc,
    Dec,
    /// Redisplay at the current quantity.
    Qty,
    /// Proceed to payment with the current quantity.
    Pay,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Inc => "inc",
            Step::Dec => "dec",
            Step::Qty => "qty",
            Step::Pay => "pay",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityToken {
    pub step: Step,
    pub item_id: ItemId,
    pub quantity: u32,
}

impl QuantityToken {
    pub fn new(step: Step, item_id: ItemId, quantity: u32) -> Self {
        Self {
            step,
            item_id,
            quantity,
        }
    }

    /// The quantity this press leads to, given `available` units in stock.
    ///
    /// Stepping clamps into `1..=available`; `Pay` refuses a quantity outside that range
    /// rather than silently changing what the buyer agreed to.
    pub fn resolve(&self, available: u32) -> Result<u32, OrderError> {
        let out_of_range = || OrderError::InvalidQuantity {
            requested: self.quantity,
            available,
        };
        if available == 0 {
            return Err(out_of_range());
        }
        let next = match self.step {
            Step::Inc => self.quantity.saturating_add(1),
            Step::Dec => self.quantity.saturating_sub(1),
            Step::Qty => self.quantity,
            Step::Pay => {
                if self.quantity < 1 || self.quantity > available {
                    return Err(out_of_range());
                }
                return Ok(self.quantity);
            }
        };
        Ok(next.clamp(1, available))
    }

    /// Tokens for the keypad shown at `quantity`: decrement, redisplay, increment, pay.
    pub fn keypad(item_id: &ItemId, quantity: u32) -> [QuantityToken; 4] {
        [Step::Dec, Step::Qty, Step::Inc, Step::Pay]
            .map(|step| QuantityToken::new(step, item_id.clone(), quantity))
    }
}

impl FromStr for QuantityToken {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || OrderError::Validation(format!("malformed quantity token: {s:?}"));
        let mut parts = s.trim().split('_');
        let (Some(step), Some(item), Some(quantity), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };
        let step = match step {
            "inc" => Step::Inc,
            "dec" => Step::Dec,
            "qty" => Step::Qty,
            "pay" => Step::Pay,
            _ => return Err(malformed()),
        };
        let item_id = item.parse::<u32>().map_err(|_| malformed())?;
        let quantity = quantity.parse::<u32>().map_err(|_| malformed())?;
        Ok(Self::new(step, ItemId(item_id), quantity))
    }
}

impl Display for QuantityToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}_{}", self.step.as_str(), self.item_id.0, self.quantity)
    }
}
