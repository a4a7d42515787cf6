//! Browser adapters for the storefront core.

use std::time::Duration;

use gran::{
    notifications::{Scheduler, Task, TaskHandle},
    storage::{MemoryStorage, Storage, StorageError},
};

/// Page storage: `window.localStorage` when the browser grants it, an
/// in-memory map otherwise (private mode, native builds).
#[derive(Debug, Clone)]
pub(crate) enum PageStorage {
    Local(web_sys::Storage),
    Memory(MemoryStorage),
}

impl PageStorage {
    #[cfg(target_arch = "wasm32")]
    pub(crate) fn detect() -> Self {
        web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .map_or_else(|| Self::Memory(MemoryStorage::new()), Self::Local)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub(crate) fn detect() -> Self {
        Self::Memory(MemoryStorage::new())
    }
}

impl Storage for PageStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            Self::Local(storage) => storage
                .get_item(key)
                .map_err(|_err| StorageError::Unavailable),
            Self::Memory(storage) => storage.get_item(key),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            Self::Local(storage) => {
                storage
                    .set_item(key, value)
                    .map_err(|error| StorageError::Rejected {
                        key: key.to_string(),
                        reason: format!("{error:?}"),
                    })
            }
            Self::Memory(storage) => storage.set_item(key, value),
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match self {
            Self::Local(storage) => storage
                .remove_item(key)
                .map_err(|_err| StorageError::Unavailable),
            Self::Memory(storage) => storage.remove_item(key),
        }
    }
}

/// Scheduler backed by `window.setTimeout`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    #[cfg(target_arch = "wasm32")]
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        use leptos::{leptos_dom::helpers::set_timeout_with_handle, logging::warn};

        let (handle, task) = TaskHandle::guard(task);

        if let Err(error) = set_timeout_with_handle(task, delay) {
            warn!("failed to schedule timer: {error:?}");
        }

        handle
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn schedule(&self, _delay: Duration, task: Task) -> TaskHandle {
        // No event loop to defer to outside the browser.
        TaskHandle::guard(task).0
    }
}
