//! Gran storefront page

use std::sync::Arc;

use gran::{
    catalog::{Catalog, Product},
    config::StorefrontConfig,
    consent::{CookieBanner, CookieConsent},
    navigation::MobileMenu,
};
use leptos::prelude::*;

use crate::{
    browser::{BrowserScheduler, PageStorage},
    shop::Shop,
};

mod browser;
mod cart;
mod cookies;
mod header;
mod products;
mod shop;
mod toasts;

const CATALOG_YAML: &str = include_str!("../../../fixtures/catalog.yml");
const STOREFRONT_YAML: &str = include_str!("../../../fixtures/storefront.yml");

/// Parsed fixtures used by the page.
#[derive(Debug)]
struct AppData {
    products: Arc<Vec<Product>>,
    config: StorefrontConfig,
}

impl AppData {
    fn load() -> Result<Self, String> {
        let catalog = Catalog::from_yaml(CATALOG_YAML)
            .map_err(|error| format!("Failed to load catalogue: {error}"))?;

        let config = StorefrontConfig::from_yaml(STOREFRONT_YAML)
            .map_err(|error| format!("Failed to load storefront config: {error}"))?;

        Ok(Self {
            products: Arc::new(catalog.products().to_vec()),
            config,
        })
    }
}

#[component]
fn Storefront(data: AppData) -> impl IntoView {
    let storage = PageStorage::detect();

    let shop = match data.config.currency() {
        Ok(currency) => Shop::new(&storage, currency, data.config.notifications),
        Err(error) => return view! { <LoadError message=error.to_string() /> }.into_any(),
    };

    let menu = RwSignal::new(MobileMenu::default());
    let current_section = RwSignal::new(None::<String>);
    let banner_visible = RwSignal::new(false);

    let banner = StoredValue::new_local(CookieBanner::init_with_listener(
        CookieConsent::new(storage),
        &BrowserScheduler,
        data.config.cookie_banner_delay(),
        move |visible| banner_visible.set(visible),
    ));

    let scroll_offset = data.config.scroll_offset;

    Effect::new(move |_| {
        header::install_page_listeners(current_section, menu, scroll_offset);
        shop::install_storage_listener(shop);
    });

    view! {
        <header::Header shop=shop current=current_section menu=menu />
        <main>
            <section id="hero" class="hero">
                <h1>"Украшения ручной работы"</h1>
                <p>"Серебро, жемчуг и натуральные камни"</p>
                <a class="hero-btn" href="#catalog">"Смотреть каталог"</a>
            </section>
            <section id="catalog" class="catalog">
                <h2>"Каталог"</h2>
                <products::ProductGrid
                    products=Arc::clone(&data.products)
                    shop=shop
                    reveal=data.config.reveal.clone()
                />
            </section>
            <section id="about" class="about">
                <h2>"О нас"</h2>
                <p>"Небольшая мастерская, где каждое изделие делают вручную."</p>
            </section>
            <section id="contacts" class="contacts">
                <h2>"Контакты"</h2>
                <p>"info@gran.example"</p>
            </section>
        </main>
        <cart::CartModal shop=shop />
        <cart::CheckoutModal shop=shop />
        <toasts::ToastStack toasts=shop.toasts />
        <cookies::CookieBannerView banner=banner visible=banner_visible />
    }
    .into_any()
}

#[component]
fn LoadError(message: String) -> impl IntoView {
    view! {
        <main class="load-error">
            <p>{message}</p>
        </main>
    }
}

/// Page shell.
#[component]
fn App() -> impl IntoView {
    match AppData::load() {
        Ok(data) => view! { <Storefront data=data /> }.into_any(),
        Err(message) => view! { <LoadError message=message /> }.into_any(),
    }
}

fn main() {
    console_error_panic_hook::set_once();

    leptos::mount::mount_to_body(App);
}
