//! Cart view models.
//!
//! Render-ready snapshots of the cart for the modal and checkout form. They
//! are rebuilt from the store on every change and hold no state of their own.

use rusty_money::iso::Currency;

use crate::{
    cart::{CartError, CartObserver, CartStore},
    items::LineItem,
    messages,
    pricing::{format_money, format_price},
    storage::Storage,
};

/// Render model for one cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    /// Item id, used by the remove control
    pub id: String,

    /// Display name
    pub name: String,

    /// Quantity
    pub quantity: u32,

    /// Formatted `price * quantity`
    pub line_total: String,
}

impl CartLineView {
    fn from_line(line: &LineItem, currency: &Currency) -> Self {
        Self {
            id: line.id().to_string(),
            name: line.name().to_string(),
            quantity: line.quantity(),
            line_total: format_price(line.line_total(), currency),
        }
    }
}

/// Render model for the cart modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartModalView {
    /// Lines in cart order
    pub lines: Vec<CartLineView>,

    /// Formatted cart total
    pub total: String,
}

impl CartModalView {
    /// Builds the modal contents from the current cart.
    pub fn from_store<S: Storage, O: CartObserver>(
        cart: &CartStore<S, O>,
        currency: &Currency,
    ) -> Self {
        Self {
            lines: cart
                .items()
                .iter()
                .map(|line| CartLineView::from_line(line, currency))
                .collect(),
            total: format_money(&cart.total_money(currency)),
        }
    }
}

/// What the cart icon does when clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartIconAction {
    /// The cart is empty: show the empty-cart message instead of a modal.
    NotifyEmpty,

    /// Open the cart modal with these contents.
    ShowModal(CartModalView),
}

impl CartIconAction {
    /// Resolves a cart icon click, raising the empty-cart notification when
    /// there is nothing to show.
    pub fn resolve<S: Storage, O: CartObserver>(
        cart: &mut CartStore<S, O>,
        currency: &Currency,
    ) -> Self {
        if cart.is_empty() {
            cart.show_notification(messages::CART_EMPTY);

            return Self::NotifyEmpty;
        }

        Self::ShowModal(CartModalView::from_store(cart, currency))
    }
}

/// Clear-all control on the cart modal: empties the cart and confirms it.
///
/// # Errors
///
/// Returns a [`CartError`] if the empty cart could not be persisted.
pub fn clear_from_modal<S: Storage, O: CartObserver>(
    cart: &mut CartStore<S, O>,
) -> Result<(), CartError> {
    cart.clear()?;
    cart.show_notification(messages::CART_CLEARED);

    Ok(())
}

/// Render model for the checkout form footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSummary {
    /// Formatted cart total
    pub total: String,
}

impl CheckoutSummary {
    /// Builds the summary from the current cart.
    pub fn from_store<S: Storage, O: CartObserver>(
        cart: &CartStore<S, O>,
        currency: &Currency,
    ) -> Self {
        Self {
            total: format_money(&cart.total_money(currency)),
        }
    }
}
