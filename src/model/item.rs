//! Represents an item in the catalog.
//!
//! # Actor Framework
//! This struct implements the [`ActorEntity`](actor_framework::ActorEntity) trait, see
//! [`crate::item_actor`] for:
//! - Creation parameters ([`ItemCreate`], validated from raw [`NewItem`] input)
//! - Update parameters ([`ItemUpdate`])
//! - Custom actions ([`ItemAction`](crate::item_actor::ItemAction))
//!
//! # Stock
//! A `voucher` item sells single-use codes, so its stock *is* its [`CodePool`]:
//! `quantity == codes.len()` holds after every committed change. A `recharge` item is
//! fulfilled by hand and keeps only a unit count.

use crate::item_actor::CatalogError;
use crate::model::CategoryId;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashSet, VecDeque};
use std::fmt::Display;
use std::str::FromStr;

/// Separator between codes in the stored pool string.
pub const CODE_DELIMITER: &str = "||";

/// Type-safe identifier for Items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

impl From<u32> for ItemId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Fulfilled instantly from the code pool.
    Voucher,
    /// Fulfilled manually by an admin after payment is confirmed.
    Recharge,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Voucher => "voucher",
            ItemKind::Recharge => "recharge",
        }
    }
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "voucher" => Ok(ItemKind::Voucher),
            "recharge" => Ok(ItemKind::Recharge),
            other => Err(CatalogError::Validation(format!(
                "kind must be voucher or recharge, got '{other}'"
            ))),
        }
    }
}

/// Ordered pool of unique single-use codes, oldest first.
///
/// Stored as one string joined with [`CODE_DELIMITER`]; blank segments are skipped when read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodePool(VecDeque<String>);

impl CodePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a pool from individual codes, rejecting blanks, the delimiter and duplicates.
    pub fn from_codes<I, S>(codes: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut pool = Self::new();
        pool.extend(codes)?;
        Ok(pool)
    }

    /// Parses the joined form.
    pub fn parse(joined: &str) -> Result<Self, CatalogError> {
        Self::from_codes(
            joined
                .split(CODE_DELIMITER)
                .filter(|segment| !segment.trim().is_empty()),
        )
    }

    pub fn joined(&self) -> String {
        self.0
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(CODE_DELIMITER)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Removes and returns the first `n` codes, or all of them if fewer remain.
    pub fn take_front(&mut self, n: usize) -> Vec<String> {
        let n = n.min(self.0.len());
        self.0.drain(..n).collect()
    }

    /// Appends codes at the back.
    pub fn extend<I, S>(&mut self, codes: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fresh = self.checked(codes)?;
        self.0.extend(fresh);
        Ok(())
    }

    /// Puts codes back at the front, keeping their order.
    pub fn restore_front<I, S>(&mut self, codes: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fresh = self.checked(codes)?;
        for code in fresh.into_iter().rev() {
            self.0.push_front(code);
        }
        Ok(())
    }

    fn checked<I, S>(&self, codes: I) -> Result<Vec<String>, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: HashSet<String> = self.0.iter().cloned().collect();
        let mut fresh = Vec::new();
        for code in codes {
            let code = code.as_ref().trim().to_string();
            if code.is_empty() {
                return Err(CatalogError::Validation("code must not be blank".into()));
            }
            if code.contains(CODE_DELIMITER) {
                return Err(CatalogError::Validation(format!(
                    "code '{code}' contains the reserved delimiter '{CODE_DELIMITER}'"
                )));
            }
            if !seen.insert(code.clone()) {
                return Err(CatalogError::Validation(format!("duplicate code '{code}'")));
            }
            fresh.push(code);
        }
        Ok(fresh)
    }
}

impl Serialize for CodePool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.joined())
    }
}

impl<'de> Deserialize<'de> for CodePool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let joined = String::deserialize(deserializer)?;
        CodePool::parse(&joined).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub category_id: CategoryId,
    pub title: String,
    pub kind: ItemKind,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub codes: CodePool,
    pub active: bool,
}

impl Item {
    /// `quantity` matches the code pool (always true for recharge items).
    pub fn stock_consistent(&self) -> bool {
        self.kind != ItemKind::Voucher || self.quantity as usize == self.codes.len()
    }

    /// Same rules as [`ItemCreate::validate`], for items read back from storage.
    pub fn check_invariants(&self) -> Result<(), CatalogError> {
        check_item(
            &self.title,
            self.unit_price,
            self.kind,
            self.quantity,
            &self.codes,
        )
    }
}

/// Raw item input as an admin typed it. Converted into [`ItemCreate`] with `try_from`.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub category_id: CategoryId,
    pub title: String,
    pub kind: String,
    pub unit_price: Decimal,
    pub quantity: i64,
    pub codes: Vec<String>,
}

/// Validated payload for creating an item.
#[derive(Debug, Clone)]
pub struct ItemCreate {
    pub category_id: CategoryId,
    pub title: String,
    pub kind: ItemKind,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub codes: CodePool,
}

impl ItemCreate {
    /// Rules every stored item satisfies, whichever way it was created.
    pub fn validate(&self) -> Result<(), CatalogError> {
        check_item(
            &self.title,
            self.unit_price,
            self.kind,
            self.quantity,
            &self.codes,
        )
    }
}

impl TryFrom<NewItem> for ItemCreate {
    type Error = CatalogError;

    fn try_from(raw: NewItem) -> Result<Self, Self::Error> {
        let kind: ItemKind = raw.kind.parse()?;
        let quantity = u32::try_from(raw.quantity).map_err(|_| {
            CatalogError::Validation(format!("quantity out of range: {}", raw.quantity))
        })?;
        let create = Self {
            category_id: raw.category_id,
            title: raw.title.trim().to_string(),
            kind,
            unit_price: raw.unit_price,
            quantity,
            codes: CodePool::from_codes(&raw.codes)?,
        };
        create.validate()?;
        Ok(create)
    }
}

fn check_item(
    title: &str,
    unit_price: Decimal,
    kind: ItemKind,
    quantity: u32,
    codes: &CodePool,
) -> Result<(), CatalogError> {
    if title.trim().is_empty() {
        return Err(CatalogError::Validation("title must not be blank".into()));
    }
    if unit_price < Decimal::ZERO {
        return Err(CatalogError::Validation(format!(
            "price must not be negative, got {unit_price}"
        )));
    }
    match kind {
        ItemKind::Voucher if codes.len() != quantity as usize => Err(CatalogError::Validation(
            format!("voucher quantity {quantity} does not match {} codes", codes.len()),
        )),
        ItemKind::Recharge if !codes.is_empty() => Err(CatalogError::Validation(
            "recharge items do not take codes".into(),
        )),
        _ => Ok(()),
    }
}

/// DTO for item edits. Price changes never reach existing orders.
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    pub title: Option<String>,
    pub unit_price: Option<Decimal>,
    pub active: Option<bool>,
}
