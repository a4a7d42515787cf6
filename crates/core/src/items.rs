//! Items

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::serialize_amount;

/// Errors raised while validating a raw line item.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineItemError {
    /// The item has no identifier, or the identifier is blank.
    #[error("item is missing an id")]
    MissingId,

    /// The item has no price.
    #[error("item {0} is missing a price")]
    MissingPrice(String),

    /// The item price is below zero.
    #[error("item {0} has a negative price ({1})")]
    NegativePrice(String, Decimal),

    /// The item quantity is zero, negative or does not fit a `u32`.
    #[error("item {0} has an invalid quantity ({1})")]
    InvalidQuantity(String, i64),
}

/// Stable identifier of a line item within the cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates an item id, rejecting blank values.
    ///
    /// # Errors
    ///
    /// Returns [`LineItemError::MissingId`] when the id is empty or whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, LineItemError> {
        let id = id.into();

        if id.trim().is_empty() {
            return Err(LineItemError::MissingId);
        }

        Ok(Self(id))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for ItemId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ItemId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One product entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    id: ItemId,
    name: String,
    #[serde(serialize_with = "serialize_amount")]
    price: Decimal,
    quantity: u32,
}

impl LineItem {
    /// Creates a validated line item.
    ///
    /// # Errors
    ///
    /// Returns a [`LineItemError`] if the id is blank, the price is negative or
    /// the quantity is zero.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: impl Into<Decimal>,
        quantity: u32,
    ) -> Result<Self, LineItemError> {
        let id = ItemId::new(id)?;
        let price = price.into();

        if price.is_sign_negative() && !price.is_zero() {
            return Err(LineItemError::NegativePrice(id.0, price));
        }

        if quantity == 0 {
            return Err(LineItemError::InvalidQuantity(id.0, 0));
        }

        Ok(Self {
            id,
            name: name.into(),
            price,
            quantity,
        })
    }

    /// Item id
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price in major currency units
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Quantity, always at least one
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price multiplied by quantity, saturating at [`Decimal::MAX`].
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }

    /// Adds `quantity` units to this item, returning `None` on overflow.
    pub(crate) fn merged(&self, quantity: u32) -> Option<Self> {
        let quantity = self.quantity.checked_add(quantity)?;

        Some(Self {
            quantity,
            ..self.clone()
        })
    }
}

impl<'de> Deserialize<'de> for LineItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = NewLineItem::deserialize(deserializer)?;

        LineItem::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// Unvalidated item shape, as supplied by an add-to-cart trigger or read back
/// from storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewLineItem {
    /// Item id
    #[serde(default)]
    pub id: Option<String>,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// Unit price, integer or fractional
    #[serde(default)]
    pub price: Option<Decimal>,

    /// Quantity, defaults to one when absent
    #[serde(default)]
    pub quantity: Option<i64>,
}

impl TryFrom<NewLineItem> for LineItem {
    type Error = LineItemError;

    fn try_from(raw: NewLineItem) -> Result<Self, Self::Error> {
        let id = ItemId::new(raw.id.unwrap_or_default())?;

        let price = raw
            .price
            .ok_or_else(|| LineItemError::MissingPrice(id.0.clone()))?;

        if price.is_sign_negative() && !price.is_zero() {
            return Err(LineItemError::NegativePrice(id.0, price));
        }

        let quantity = raw.quantity.unwrap_or(1);

        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|quantity| *quantity > 0)
            .ok_or_else(|| LineItemError::InvalidQuantity(id.0.clone(), quantity))?;

        Ok(Self {
            id,
            name: raw.name.unwrap_or_default(),
            price,
            quantity,
        })
    }
}
