//! Gran
//!
//! Gran is the storefront engine behind a small jewellery shop: a persistent
//! shopping cart, order checkout, toast notifications, cookie consent and the
//! page's navigation state, kept independent of any particular UI host.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod consent;
pub mod items;
pub mod messages;
pub mod navigation;
pub mod notifications;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod storage;
pub mod view;
