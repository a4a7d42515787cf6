//! Gran prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CartError, CartObserver, CartStore, NoopObserver, RecordingObserver},
    catalog::{Catalog, CatalogError, Product},
    checkout::{CheckoutError, submit_order},
    config::{ConfigError, StorefrontConfig},
    consent::{CookieBanner, CookieConsent},
    items::{ItemId, LineItem, LineItemError, NewLineItem},
    navigation::{
        MobileMenu, RevealOptions, RevealTracker, SectionOffset, active_section, is_link_active,
    },
    notifications::{
        ManualScheduler, Notification, NotificationCenter, NotificationHandle, NotificationPhase,
        NotificationTiming, Scheduler, TaskHandle,
    },
    orders::{CustomerDetails, Order, OrderLog, OrderLogError},
    pricing::{format_money, format_price},
    storage::{FileStorage, MemoryStorage, Storage, StorageError},
    view::{CartIconAction, CartModalView, CheckoutSummary, clear_from_modal},
};
