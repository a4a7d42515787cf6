//! Cart errors.

use thiserror::Error;

use crate::{items::ItemId, storage::StorageError};

/// Errors returned by cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Merging the incoming quantity would overflow the line quantity.
    #[error("quantity for item {0} would overflow")]
    QuantityOverflow(ItemId),

    /// The new cart state could not be persisted; the cart is unchanged.
    #[error("failed to persist cart")]
    Storage(#[from] StorageError),
}
