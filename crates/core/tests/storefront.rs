//! End-to-end storefront flows over file-backed storage

use std::time::Duration;

use gran::{
    cart::{CartObserver, CartStore, RecordingObserver},
    catalog::Catalog,
    checkout::{CheckoutError, submit_order},
    messages,
    notifications::{ManualScheduler, NotificationCenter, NotificationTiming},
    orders::{CustomerDetails, OrderLog},
    storage::{FileStorage, Storage},
};
use jiff::Timestamp;
use rust_decimal::Decimal;
use testresult::TestResult;

const CATALOG: &str = "
products:
  - id: r1
    name: Ring
    price: 5000
  - id: e1
    name: Earrings
    price: 1000
  - id: p1
    name: Pendant
    price: 2500
";

/// Forwards cart messages to a toast stack.
struct Toasts {
    center: NotificationCenter<ManualScheduler>,
    counter: u64,
}

impl CartObserver for Toasts {
    fn counter_changed(&mut self, count: u64) {
        self.counter = count;
    }

    fn notify(&mut self, message: &str) {
        self.center.show(message);
    }
}

fn customer() -> CustomerDetails {
    CustomerDetails {
        name: "Anna".to_string(),
        phone: "+7 900 000 00 00".to_string(),
        email: "anna@example.com".to_string(),
        address: "Moscow".to_string(),
        message: Some("   ".to_string()),
    }
}

#[test]
fn cart_survives_a_restart() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("storage.json");
    let catalog = Catalog::from_yaml(CATALOG)?;

    {
        let mut cart = CartStore::open(FileStorage::new(&path));

        for id in ["r1", "p1", "r1"] {
            let product = catalog.get(id).ok_or("unknown product")?;

            cart.add_item(product.line_item()?)?;
        }
    }

    let cart = CartStore::open(FileStorage::new(&path));
    let quantities: Vec<(&str, u32)> = cart
        .items()
        .iter()
        .map(|line| (line.id().as_str(), line.quantity()))
        .collect();

    assert_eq!(quantities, [("r1", 2), ("p1", 1)]);
    assert_eq!(cart.total(), Decimal::from(12_500));

    Ok(())
}

#[test]
fn checkout_logs_one_order_and_empties_the_cart() -> TestResult {
    let dir = tempfile::tempdir()?;
    let storage = FileStorage::new(dir.path().join("storage.json"));
    let catalog = Catalog::from_yaml(CATALOG)?;
    let orders = OrderLog::new(storage.clone());
    let mut cart = CartStore::with_observer(storage.clone(), RecordingObserver::default());

    for id in ["e1", "p1"] {
        let product = catalog.get(id).ok_or("unknown product")?;

        cart.add_item(product.line_item()?)?;
    }

    assert_eq!(cart.total(), Decimal::from(3500));

    cart.remove_item("e1")?;

    assert_eq!(cart.total(), Decimal::from(2500));

    let order = submit_order(&mut cart, &orders, customer(), Timestamp::from_second(1_700_000_000)?)?;

    assert_eq!(order.total, Decimal::from(2500));
    assert_eq!(order.customer.message, None);
    assert_eq!(orders.orders()?, [order]);
    assert!(cart.is_empty());
    assert_eq!(storage.get_item("cart")?, Some("[]".to_string()));
    assert_eq!(cart.observer().counter, 0);
    assert_eq!(
        cart.observer().messages.last().map(String::as_str),
        Some(messages::ORDER_PLACED)
    );

    let again = submit_order(&mut cart, &orders, customer(), Timestamp::from_second(1_700_000_060)?);

    assert!(matches!(again, Err(CheckoutError::EmptyCart)));
    assert_eq!(orders.orders()?.len(), 1);

    Ok(())
}

#[test]
fn added_items_raise_toasts_that_expire() -> TestResult {
    let dir = tempfile::tempdir()?;
    let scheduler = ManualScheduler::new();
    let observer = Toasts {
        center: NotificationCenter::new(scheduler.clone(), NotificationTiming::default()),
        counter: 0,
    };
    let mut cart = CartStore::with_observer(FileStorage::new(dir.path().join("s.json")), observer);
    let catalog = Catalog::from_yaml(CATALOG)?;
    let ring = catalog.get("r1").ok_or("unknown product")?.line_item()?;

    cart.add_item(ring.clone())?;
    scheduler.advance(Duration::from_millis(500));
    cart.add_item(ring)?;

    assert_eq!(cart.observer().counter, 2);
    assert_eq!(cart.observer().center.active().len(), 2);

    scheduler.advance(Duration::from_millis(2800));

    assert_eq!(cart.observer().center.active().len(), 1, "first toast removed at 3300ms");

    scheduler.run_all();

    assert!(cart.observer().center.active().is_empty());

    Ok(())
}
