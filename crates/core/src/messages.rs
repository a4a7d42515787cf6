//! User-facing notification messages.

/// Raised after an item is added to the cart.
pub const ITEM_ADDED: &str = "Товар добавлен в корзину";

/// Raised when the cart icon is used while the cart is empty.
pub const CART_EMPTY: &str = "Корзина пуста";

/// Raised after the cart is cleared from the cart modal.
pub const CART_CLEARED: &str = "Корзина очищена";

/// Raised after an order has been placed.
pub const ORDER_PLACED: &str = "Спасибо! Совсем скоро мы с вами свяжемся!";
