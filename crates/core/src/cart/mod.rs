//! Cart

pub mod errors;
pub mod observer;
pub mod store;

pub use errors::CartError;
pub use observer::{CartObserver, NoopObserver, RecordingObserver};
pub use store::CartStore;
