//! Page-wide cart state shared by the components.

use gran::{
    cart::{CartObserver, CartStore},
    checkout::{CheckoutError, submit_order},
    items::LineItem,
    notifications::{Notification, NotificationCenter, NotificationTiming},
    orders::{CustomerDetails, OrderLog},
    view::{CartIconAction, CartModalView, CheckoutSummary, clear_from_modal},
};
use jiff::Timestamp;
use leptos::{logging::warn, prelude::*};
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::browser::{BrowserScheduler, PageStorage};

/// Checkout submission failures seen by the page.
#[derive(Debug, Error)]
pub(crate) enum PlaceOrderError {
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// The cart or order log was disposed with its owning component.
    #[error("cart is no longer available")]
    Unavailable,
}

/// Routes cart side effects into reactive signals and the toast stack.
pub(crate) struct PageObserver {
    counter: RwSignal<u64>,
    revision: RwSignal<u64>,
    toasts: NotificationCenter<BrowserScheduler>,
}

impl CartObserver for PageObserver {
    fn counter_changed(&mut self, count: u64) {
        self.counter.set(count);
        self.revision.update(|revision| *revision = revision.wrapping_add(1));
    }

    fn notify(&mut self, message: &str) {
        self.toasts.show(message);
    }
}

type PageCart = CartStore<PageStorage, PageObserver>;

/// Handles to the cart, order log and modal state.
#[derive(Clone, Copy)]
pub(crate) struct Shop {
    cart: StoredValue<PageCart, LocalStorage>,
    orders: StoredValue<OrderLog<PageStorage>, LocalStorage>,
    counter: RwSignal<u64>,
    revision: RwSignal<u64>,
    pub(crate) toasts: RwSignal<Vec<Notification>>,
    pub(crate) cart_open: RwSignal<bool>,
    pub(crate) checkout_open: RwSignal<bool>,
    pub(crate) currency: &'static Currency,
}

impl Shop {
    pub(crate) fn new(
        storage: &PageStorage,
        currency: &'static Currency,
        timing: NotificationTiming,
    ) -> Self {
        let counter = RwSignal::new(0);
        let revision = RwSignal::new(0);
        let toasts = RwSignal::new(Vec::new());

        let center = NotificationCenter::new(BrowserScheduler, timing);

        center.subscribe(move |active| toasts.set(active.to_vec()));

        let observer = PageObserver {
            counter,
            revision,
            toasts: center,
        };

        Self {
            cart: StoredValue::new_local(CartStore::with_observer(storage.clone(), observer)),
            orders: StoredValue::new_local(OrderLog::new(storage.clone())),
            counter,
            revision,
            toasts,
            cart_open: RwSignal::new(false),
            checkout_open: RwSignal::new(false),
            currency,
        }
    }

    /// Header counter value.
    pub(crate) fn counter(self) -> u64 {
        self.counter.get()
    }

    pub(crate) fn add(self, item: LineItem) {
        self.cart.update_value(|cart| {
            if let Err(error) = cart.add_item(item) {
                warn!("failed to add item to cart: {error}");
            }
        });
    }

    /// Re-reads the cart after another tab wrote it.
    pub(crate) fn reload(self) {
        self.cart.update_value(PageCart::reload);
    }

    pub(crate) fn remove(self, id: &str) {
        self.cart.update_value(|cart| {
            if let Err(error) = cart.remove_item(id) {
                warn!("failed to remove item from cart: {error}");
            }
        });
    }

    /// Clear-all control: empties the cart and closes the modal.
    pub(crate) fn clear(self) {
        self.cart.update_value(|cart| {
            if let Err(error) = clear_from_modal(cart) {
                warn!("failed to clear cart: {error}");
            }
        });

        self.cart_open.set(false);
    }

    /// Cart icon click.
    pub(crate) fn open_cart(self) {
        let currency = self.currency;
        let action = self
            .cart
            .try_update_value(|cart| CartIconAction::resolve(cart, currency));

        if let Some(CartIconAction::ShowModal(_)) = action {
            self.cart_open.set(true);
        }
    }

    /// Checkout control on the cart modal.
    pub(crate) fn open_checkout(self) {
        self.cart_open.set(false);
        self.checkout_open.set(true);
    }

    /// Current modal contents, re-derived after every cart mutation.
    pub(crate) fn modal_view(self) -> CartModalView {
        self.revision.track();

        self.cart
            .with_value(|cart| CartModalView::from_store(cart, self.currency))
    }

    pub(crate) fn checkout_summary(self) -> CheckoutSummary {
        self.revision.track();

        self.cart
            .with_value(|cart| CheckoutSummary::from_store(cart, self.currency))
    }

    /// Checkout form submission.
    pub(crate) fn place_order(self, customer: CustomerDetails) -> Result<(), PlaceOrderError> {
        let orders = self
            .orders
            .try_get_value()
            .ok_or(PlaceOrderError::Unavailable)?;

        self.cart
            .try_update_value(|cart| submit_order(cart, &orders, customer, Timestamp::now()))
            .ok_or(PlaceOrderError::Unavailable)??;

        self.checkout_open.set(false);

        Ok(())
    }
}

/// Whether a `storage` event from another tab touched the cart. A `None` key
/// means the whole storage area was cleared.
#[cfg(any(target_arch = "wasm32", test))]
fn affects_cart(key: Option<&str>) -> bool {
    use gran::storage::CART_KEY;

    key.is_none_or(|key| key == CART_KEY)
}

/// Reloads the cart whenever another tab changes it.
#[cfg(target_arch = "wasm32")]
pub(crate) fn install_storage_listener(shop: Shop) {
    _ = window_event_listener(leptos::ev::storage, move |event| {
        if affects_cart(event.key().as_deref()) {
            shop.reload();
        }
    });
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn install_storage_listener(_shop: Shop) {}
