//! Checkout

use jiff::Timestamp;
use thiserror::Error;
use tracing::info;

use crate::{
    cart::{CartError, CartObserver, CartStore},
    messages,
    orders::{CustomerDetails, Order, OrderLog, OrderLogError},
    storage::Storage,
};

/// Errors raised while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing in the cart to order.
    #[error("cannot place an order for an empty cart")]
    EmptyCart,

    /// The order could not be appended to the log; the cart is unchanged.
    #[error("failed to record order")]
    OrderLog(#[from] OrderLogError),

    /// The order was recorded but the cart could not be cleared.
    #[error("order recorded but the cart could not be cleared")]
    Cart(#[from] CartError),
}

/// Places an order for the current cart contents.
///
/// The order is appended to the log before the cart is cleared, and the
/// confirmation message is raised once both have succeeded.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`]: the cart has no lines.
/// - [`CheckoutError::OrderLog`]: the order log could not be read or written.
/// - [`CheckoutError::Cart`]: the cleared cart could not be persisted.
pub fn submit_order<S, O, L>(
    cart: &mut CartStore<S, O>,
    orders: &OrderLog<L>,
    customer: CustomerDetails,
    placed_at: Timestamp,
) -> Result<Order, CheckoutError>
where
    S: Storage,
    O: CartObserver,
    L: Storage,
{
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let order = Order {
        customer: customer.normalized(),
        items: cart.items().to_vec(),
        total: cart.total(),
        timestamp: placed_at,
    };

    orders.append(&order)?;
    cart.clear()?;

    info!(
        total = %order.total,
        lines = order.items.len(),
        "placed order"
    );

    cart.show_notification(messages::ORDER_PLACED);

    Ok(order)
}
