//! Orders

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    items::LineItem,
    pricing::serialize_amount,
    storage::{ORDERS_KEY, Storage, StorageError, Stored, read_json, write_json},
};

/// Order log errors
#[derive(Debug, Error)]
pub enum OrderLogError {
    /// The saved order log could not be decoded. It is left untouched.
    #[error("saved order log is corrupt")]
    Corrupt(#[source] serde_json::Error),

    /// Wrapped storage error.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Customer-supplied checkout fields. Values are accepted as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    /// Customer name
    pub name: String,

    /// Contact phone
    pub phone: String,

    /// Contact email
    pub email: String,

    /// Delivery address
    pub address: String,

    /// Optional comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CustomerDetails {
    /// Treats a blank comment as absent.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self
            .message
            .as_deref()
            .is_some_and(|message| message.trim().is_empty())
        {
            self.message = None;
        }

        self
    }
}

/// Snapshot of a completed checkout submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Customer fields
    #[serde(flatten)]
    pub customer: CustomerDetails,

    /// Cart lines at submission time
    pub items: Vec<LineItem>,

    /// Cart total at submission time
    #[serde(serialize_with = "serialize_amount")]
    pub total: Decimal,

    /// Creation time
    pub timestamp: Timestamp,
}

/// Append-only log of placed orders.
#[derive(Debug, Clone)]
pub struct OrderLog<S: Storage> {
    storage: S,
}

impl<S: Storage> OrderLog<S> {
    /// Creates a log over `storage`.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Every placed order, oldest first. An absent log is empty.
    ///
    /// # Errors
    ///
    /// - [`OrderLogError::Corrupt`]: the saved log cannot be decoded.
    /// - [`OrderLogError::Storage`]: the backend could not be read.
    pub fn orders(&self) -> Result<Vec<Order>, OrderLogError> {
        match read_json(&self.storage, ORDERS_KEY)? {
            Stored::Present(orders) => Ok(orders),
            Stored::Absent => Ok(Vec::new()),
            Stored::Malformed(error) => Err(OrderLogError::Corrupt(error)),
        }
    }

    /// Appends `order` to the log.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderLogError`] if the existing log cannot be read or the
    /// updated log cannot be written. A corrupt log is never overwritten.
    pub fn append(&self, order: &Order) -> Result<(), OrderLogError> {
        let mut orders = self.orders()?;

        orders.push(order.clone());

        write_json(&self.storage, ORDERS_KEY, &orders)?;

        debug!(count = orders.len(), "appended order to log");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::storage::MemoryStorage;

    use super::*;

    fn order(name: &str, total: u32) -> Result<Order, Box<dyn std::error::Error>> {
        let total = Decimal::from(total);

        Ok(Order {
            customer: CustomerDetails {
                name: name.to_string(),
                phone: "+7 900 000-00-00".to_string(),
                email: "buyer@example.com".to_string(),
                address: "Moscow".to_string(),
                message: None,
            },
            items: vec![LineItem::new("r1", "Ring", total, 1)?],
            total,
            timestamp: "2026-10-16T12:00:00Z".parse()?,
        })
    }

    #[test]
    fn absent_log_is_empty() -> TestResult {
        let log = OrderLog::new(MemoryStorage::new());

        assert!(log.orders()?.is_empty());

        Ok(())
    }

    #[test]
    fn append_preserves_previous_orders() -> TestResult {
        let log = OrderLog::new(MemoryStorage::new());

        log.append(&order("Anna", 5000)?)?;
        log.append(&order("Boris", 2500)?)?;

        let names: Vec<String> = log
            .orders()?
            .into_iter()
            .map(|order| order.customer.name)
            .collect();

        assert_eq!(names, ["Anna", "Boris"]);

        Ok(())
    }

    #[test]
    fn corrupt_log_is_reported_and_left_alone() -> TestResult {
        let storage = MemoryStorage::new();

        storage.set_item(ORDERS_KEY, "{broken")?;

        let log = OrderLog::new(storage.clone());
        let result = log.append(&order("Anna", 5000)?);

        assert!(matches!(result, Err(OrderLogError::Corrupt(_))));
        assert_eq!(storage.get_item(ORDERS_KEY)?, Some("{broken".to_string()));

        Ok(())
    }

    #[test]
    fn order_serializes_flat_like_the_page() -> TestResult {
        let encoded = serde_json::to_value(order("Anna", 5000)?)?;

        assert_eq!(encoded["name"], "Anna");
        assert_eq!(encoded["total"], 5000);
        assert_eq!(encoded["timestamp"], "2026-10-16T12:00:00Z");
        assert_eq!(encoded["items"][0]["id"], "r1");
        assert!(encoded.get("message").is_none());
        assert!(encoded.get("customer").is_none());

        Ok(())
    }

    #[test]
    fn blank_message_is_normalized_away() {
        let details = CustomerDetails {
            message: Some("   ".to_string()),
            ..CustomerDetails::default()
        }
        .normalized();

        assert_eq!(details.message, None);
    }

    #[test]
    fn reads_orders_with_null_message() -> TestResult {
        let storage = MemoryStorage::new();

        storage.set_item(
            ORDERS_KEY,
            r#"[{"name":"A","phone":"1","email":"a@b","address":"x","message":null,
                "items":[{"id":"r1","name":"Ring","price":5000,"quantity":1}],
                "total":5000,"timestamp":"2026-10-16T12:00:00.000Z"}]"#,
        )?;

        let orders = OrderLog::new(storage).orders()?;

        assert_eq!(orders.len(), 1);
        assert_eq!(orders.first().map(|order| order.total), Some(Decimal::from(5000)));

        Ok(())
    }
}
