//! Cart store.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tracing::{debug, warn};

use crate::{
    cart::{CartError, CartObserver, NoopObserver},
    items::LineItem,
    messages,
    storage::{CART_KEY, Storage, Stored, read_json, write_json},
};

/// Owner of the cart lines, their persisted form and derived totals.
///
/// The store is read once from storage when opened. Every mutation computes
/// the next state, writes it through to storage, and only then commits it
/// and pushes the new counter value to the observer.
#[derive(Debug)]
pub struct CartStore<S: Storage, O: CartObserver = NoopObserver> {
    items: Vec<LineItem>,
    storage: S,
    observer: O,
}

impl<S: Storage> CartStore<S> {
    /// Opens the cart without an observer.
    pub fn open(storage: S) -> Self {
        Self::with_observer(storage, NoopObserver)
    }
}

impl<S: Storage, O: CartObserver> CartStore<S, O> {
    /// Opens the cart, loading any saved lines and pushing the initial counter.
    pub fn with_observer(storage: S, observer: O) -> Self {
        let items = load_items(&storage);

        let mut store = Self {
            items,
            storage,
            observer,
        };

        store.update_counter();

        store
    }

    /// Re-reads the saved lines from storage, discarding in-memory state.
    ///
    /// Used when another context (e.g. a second browser tab) has written the
    /// cart key.
    pub fn reload(&mut self) {
        self.items = load_items(&self.storage);
        self.update_counter();
    }

    /// Adds an item, merging quantities into an existing line with the same id.
    ///
    /// # Errors
    ///
    /// - [`CartError::QuantityOverflow`]: the merged quantity does not fit.
    /// - [`CartError::Storage`]: the new state could not be persisted.
    pub fn add_item(&mut self, item: LineItem) -> Result<(), CartError> {
        let mut next = self.items.clone();

        if let Some(existing) = next.iter_mut().find(|line| line.id() == item.id()) {
            *existing = existing
                .merged(item.quantity())
                .ok_or_else(|| CartError::QuantityOverflow(item.id().clone()))?;
        } else {
            next.push(item.clone());
        }

        self.commit(next)?;

        debug!(id = %item.id(), quantity = item.quantity(), "added item to cart");

        self.show_notification(messages::ITEM_ADDED);

        Ok(())
    }

    /// Removes every line with the given id. Removing an absent id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the new state could not be persisted.
    pub fn remove_item(&mut self, id: &str) -> Result<(), CartError> {
        let next = self
            .items
            .iter()
            .filter(|line| line.id() != id)
            .cloned()
            .collect();

        self.commit(next)?;

        debug!(id, "removed item from cart");

        Ok(())
    }

    /// Empties the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the empty state could not be persisted.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.commit(Vec::new())?;

        debug!("cleared cart");

        Ok(())
    }

    /// Sum of `price * quantity` over every line; zero for an empty cart.
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |total, line| total.saturating_add(line.line_total()))
    }

    /// Total as money in the given currency.
    pub fn total_money<'c>(&self, currency: &'c Currency) -> Money<'c, Currency> {
        Money::from_decimal(self.total(), currency)
    }

    /// Sum of quantities over every line (not the number of lines).
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|line| u64::from(line.quantity()))
            .sum()
    }

    /// Pushes the current item count to the observer.
    pub fn update_counter(&mut self) {
        let count = self.item_count();

        self.observer.counter_changed(count);
    }

    /// Raises a transient message through the observer.
    pub fn show_notification(&mut self, message: &str) {
        self.observer.notify(message);
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Line with the given id, if present.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|line| line.id() == id)
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Observer receiving counter and notification callbacks.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Mutable access to the observer.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    fn commit(&mut self, next: Vec<LineItem>) -> Result<(), CartError> {
        write_json(&self.storage, CART_KEY, &next)?;

        self.items = next;
        self.update_counter();

        Ok(())
    }
}

fn load_items<S: Storage>(storage: &S) -> Vec<LineItem> {
    match read_json::<_, Vec<LineItem>>(storage, CART_KEY) {
        Ok(Stored::Present(items)) if has_unique_ids(&items) => items,
        Ok(Stored::Present(_)) => {
            warn!("saved cart contains duplicate item ids; starting with an empty cart");

            Vec::new()
        }
        Ok(Stored::Malformed(error)) => {
            warn!(%error, "saved cart is malformed; starting with an empty cart");

            Vec::new()
        }
        Ok(Stored::Absent) => Vec::new(),
        Err(error) => {
            warn!(%error, "failed to read saved cart; starting with an empty cart");

            Vec::new()
        }
    }
}

fn has_unique_ids(items: &[LineItem]) -> bool {
    items.iter().enumerate().all(|(index, item)| {
        items
            .iter()
            .skip(index + 1)
            .all(|other| other.id() != item.id())
    })
}

#[cfg(test)]
mod tests {
    use mockall::Sequence;
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::{
        cart::{RecordingObserver, observer::MockCartObserver},
        storage::{MemoryStorage, MockStorage, StorageError},
    };

    use super::*;

    fn ring(quantity: u32) -> Result<LineItem, crate::items::LineItemError> {
        LineItem::new("r1", "Ring", 5000, quantity)
    }

    #[test]
    fn opens_empty_when_nothing_is_saved() {
        let cart = CartStore::open(MemoryStorage::new());

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn adding_same_id_merges_quantities() -> TestResult {
        let mut cart = CartStore::open(MemoryStorage::new());

        cart.add_item(ring(1)?)?;
        cart.add_item(ring(2)?)?;

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.get("r1").map(LineItem::quantity), Some(3));
        assert_eq!(cart.total(), Decimal::from(15_000));

        Ok(())
    }

    #[test]
    fn merge_keeps_existing_name_and_price() -> TestResult {
        let mut cart = CartStore::open(MemoryStorage::new());

        cart.add_item(ring(1)?)?;
        cart.add_item(LineItem::new("r1", "Renamed", 1, 1)?)?;

        let line = cart.get("r1");

        assert_eq!(line.map(LineItem::name), Some("Ring"));
        assert_eq!(line.map(LineItem::price), Some(Decimal::from(5000)));
        assert_eq!(line.map(LineItem::quantity), Some(2));

        Ok(())
    }

    #[test]
    fn distinct_items_keep_insertion_order() -> TestResult {
        let mut cart = CartStore::open(MemoryStorage::new());

        cart.add_item(LineItem::new("b", "Bracelet", 1000, 1)?)?;
        cart.add_item(LineItem::new("a", "Anklet", 2500, 1)?)?;
        cart.add_item(LineItem::new("b", "Bracelet", 1000, 1)?)?;

        let ids: Vec<&str> = cart.items().iter().map(|line| line.id().as_str()).collect();

        assert_eq!(ids, ["b", "a"]);

        Ok(())
    }

    #[test]
    fn removing_updates_the_total() -> TestResult {
        let mut cart = CartStore::open(MemoryStorage::new());

        cart.add_item(LineItem::new("p1", "Pendant", 1000, 1)?)?;
        cart.add_item(LineItem::new("e1", "Earrings", 2500, 1)?)?;

        assert_eq!(cart.total(), Decimal::from(3500));

        cart.remove_item("p1")?;

        assert_eq!(cart.total(), Decimal::from(2500));

        Ok(())
    }

    #[test]
    fn removing_twice_is_a_no_op() -> TestResult {
        let mut cart = CartStore::open(MemoryStorage::new());

        cart.add_item(ring(1)?)?;
        cart.add_item(LineItem::new("e1", "Earrings", 2500, 1)?)?;

        cart.remove_item("r1")?;
        let after_first = cart.items().to_vec();

        cart.remove_item("r1")?;

        assert_eq!(cart.items(), after_first.as_slice());

        Ok(())
    }

    #[test]
    fn clear_empties_the_cart() -> TestResult {
        let mut cart = CartStore::open(MemoryStorage::new());

        cart.add_item(ring(2)?)?;
        cart.clear()?;

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);

        cart.clear()?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn reopening_restores_the_same_items() -> TestResult {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::open(storage.clone());

        cart.add_item(ring(1)?)?;
        cart.add_item(LineItem::new("e1", "Earrings", 2500, 4)?)?;

        let reopened = CartStore::open(storage);

        assert_eq!(reopened.items(), cart.items());

        Ok(())
    }

    #[test]
    fn malformed_saved_cart_falls_back_to_empty() -> TestResult {
        let storage = MemoryStorage::new();

        storage.set_item(CART_KEY, "definitely not json")?;

        let cart = CartStore::open(storage);

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn saved_cart_with_invalid_line_falls_back_to_empty() -> TestResult {
        let storage = MemoryStorage::new();

        storage.set_item(
            CART_KEY,
            r#"[{"id":"r1","name":"Ring","price":5000,"quantity":0}]"#,
        )?;

        assert!(CartStore::open(storage).is_empty());

        Ok(())
    }

    #[test]
    fn saved_cart_with_fractional_prices_loads() -> TestResult {
        let storage = MemoryStorage::new();

        storage.set_item(
            CART_KEY,
            r#"[{"id":"r1","name":"Ring","price":5000,"quantity":2},{"id":"c1","name":"Chain","price":1999.5,"quantity":1}]"#,
        )?;

        let cart = CartStore::open(storage);

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.total(), Decimal::new(119_995, 1));

        Ok(())
    }

    #[test]
    fn saved_cart_with_duplicate_ids_falls_back_to_empty() -> TestResult {
        let storage = MemoryStorage::new();

        storage.set_item(
            CART_KEY,
            r#"[{"id":"r1","price":1,"quantity":1},{"id":"r1","price":1,"quantity":2}]"#,
        )?;

        assert!(CartStore::open(storage).is_empty());

        Ok(())
    }

    #[test]
    fn reload_picks_up_external_writes() -> TestResult {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::open(storage.clone());
        let mut other_tab = CartStore::open(storage);

        other_tab.add_item(ring(2)?)?;

        assert!(cart.is_empty());

        cart.reload();

        assert_eq!(cart.item_count(), 2);

        Ok(())
    }

    #[test]
    fn counter_counts_quantities_not_lines() -> TestResult {
        let mut cart = CartStore::with_observer(MemoryStorage::new(), RecordingObserver::default());

        cart.add_item(ring(2)?)?;
        cart.add_item(LineItem::new("e1", "Earrings", 2500, 3)?)?;

        assert_eq!(cart.observer().counter, 5);

        cart.remove_item("r1")?;

        assert_eq!(cart.observer().counter, 3);

        Ok(())
    }

    #[test]
    fn add_notifies_but_remove_and_clear_do_not() -> TestResult {
        let mut cart = CartStore::with_observer(MemoryStorage::new(), RecordingObserver::default());

        cart.add_item(ring(1)?)?;
        cart.remove_item("r1")?;
        cart.clear()?;

        assert_eq!(cart.observer().messages, [messages::ITEM_ADDED]);

        Ok(())
    }

    #[test]
    fn add_persists_then_redraws_then_notifies() -> TestResult {
        let mut sequence = Sequence::new();
        let mut observer = MockCartObserver::new();

        observer
            .expect_counter_changed()
            .withf(|count| *count == 0)
            .times(1)
            .in_sequence(&mut sequence)
            .return_const(());

        observer
            .expect_counter_changed()
            .withf(|count| *count == 1)
            .times(1)
            .in_sequence(&mut sequence)
            .return_const(());

        observer
            .expect_notify()
            .withf(|message| message == messages::ITEM_ADDED)
            .times(1)
            .in_sequence(&mut sequence)
            .return_const(());

        let storage = MemoryStorage::new();
        let mut cart = CartStore::with_observer(storage.clone(), observer);

        cart.add_item(ring(1)?)?;

        assert_eq!(
            storage.get_item(CART_KEY)?,
            Some(r#"[{"id":"r1","name":"Ring","price":5000,"quantity":1}]"#.to_string())
        );

        Ok(())
    }

    #[test]
    fn failed_write_leaves_cart_unchanged() -> TestResult {
        let mut storage = MockStorage::new();

        storage.expect_get_item().returning(|_| Ok(None));
        storage.expect_set_item().returning(|key, _| {
            Err(StorageError::Rejected {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            })
        });

        let mut cart = CartStore::with_observer(storage, RecordingObserver::default());

        let result = cart.add_item(ring(1)?);

        assert!(matches!(result, Err(CartError::Storage(_))));
        assert!(cart.is_empty());
        assert!(cart.observer().messages.is_empty());

        Ok(())
    }

    #[test]
    fn read_failure_on_open_falls_back_to_empty() {
        let mut storage = MockStorage::new();

        storage
            .expect_get_item()
            .returning(|_| Err(StorageError::Unavailable));

        assert!(CartStore::open(storage).is_empty());
    }

    #[test]
    fn merge_overflow_is_reported() -> TestResult {
        let mut cart = CartStore::open(MemoryStorage::new());

        cart.add_item(ring(u32::MAX)?)?;

        let result = cart.add_item(ring(1)?);

        assert!(matches!(result, Err(CartError::QuantityOverflow(id)) if id == "r1"));
        assert_eq!(cart.get("r1").map(LineItem::quantity), Some(u32::MAX));

        Ok(())
    }

    #[test]
    fn total_money_uses_major_units() -> TestResult {
        let mut cart = CartStore::open(MemoryStorage::new());

        cart.add_item(ring(3)?)?;

        assert_eq!(cart.total_money(iso::RUB), Money::from_major(15_000, iso::RUB));

        Ok(())
    }
}
