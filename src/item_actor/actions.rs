//! Custom actions for the Item actor.
//!
//! These are the inventory operations on an [`Item`](crate::model::Item). Each one is handled
//! to completion inside the item actor before the next message is read, which makes the
//! check-and-withdraw in [`ItemAction::Allocate`] atomic with respect to every other caller.

/// Custom actions for Item entities.
#[derive(Debug, Clone)]
pub enum ItemAction {
    /// Withdraws `n` units.
    ///
    /// Voucher items hand out their first `n` codes; recharge items succeed without change.
    ///
    /// # Errors
    /// `OutOfStock` if fewer than `n` codes remain, `Validation` if `n == 0`.
    Allocate(u32),
    /// Puts codes from a failed fulfilment back at the front of the pool.
    Release(Vec<String>),
    /// Adds stock.
    Restock(Restock),
}

/// New stock for an item.
#[derive(Debug, Clone)]
pub enum Restock {
    /// Codes appended to a voucher pool.
    Codes(Vec<String>),
    /// Units added to a recharge item.
    Units(u32),
}

/// Results from ItemActions - variants match 1:1 with ItemAction
#[derive(Debug, Clone, PartialEq)]
pub enum ItemActionResult {
    /// The withdrawn codes, oldest first. Empty for recharge items.
    Allocate(Vec<String>),
    /// Quantity after the release.
    Release(u32),
    /// Quantity after the restock.
    Restock(u32),
}
