use std::sync::Arc;

use gran::{catalog::Product, navigation::RevealOptions, pricing::format_price};
use leptos::{logging::warn, prelude::*};

use crate::shop::Shop;

#[component]
fn ProductCard(product: Product, shop: Shop, revealed: RwSignal<Vec<String>>) -> impl IntoView {
    let id = product.id.clone();
    let price = format_price(product.price, shop.currency);

    let is_revealed = move || revealed.with(|ids| ids.contains(&id));

    let line = product.line_item();

    let on_add = move |_| match &line {
        Ok(item) => shop.add(item.clone()),
        Err(error) => warn!("product cannot be added to the cart: {error}"),
    };

    view! {
        <article
            class="jewelry-item"
            class:revealed=is_revealed
            data-reveal-id=product.id
        >
            <h3 class="jewelry-name">{product.name}</h3>
            {product
                .description
                .map(|description| view! { <p class="jewelry-description">{description}</p> })}
            <p class="jewelry-price">{price}</p>
            <button class="add-to-cart" on:click=on_add>
                "В корзину"
            </button>
        </article>
    }
}

#[component]
pub(crate) fn ProductGrid(
    products: Arc<Vec<Product>>,
    shop: Shop,
    reveal: RevealOptions,
) -> impl IntoView {
    let revealed = RwSignal::new(Vec::<String>::new());

    Effect::new(move |_| install_reveal_observer(&reveal, revealed));

    view! {
        <div class="jewelry-grid">
            {products
                .iter()
                .cloned()
                .map(|product| view! { <ProductCard product=product shop=shop revealed=revealed /> })
                .collect_view()}
        </div>
    }
}

/// Reveals each product card the first time it scrolls into view.
#[cfg(target_arch = "wasm32")]
fn install_reveal_observer(options: &RevealOptions, revealed: RwSignal<Vec<String>>) {
    use gran::navigation::RevealTracker;
    use wasm_bindgen::{JsCast, JsValue, closure::Closure};

    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };

    let Ok(targets) = document.query_selector_all(".jewelry-item[data-reveal-id]") else {
        return;
    };

    let mut tracker = RevealTracker::new();

    let callback = Closure::<dyn FnMut(js_sys::Array, web_sys::IntersectionObserver)>::new(
        move |entries: js_sys::Array, _observer: web_sys::IntersectionObserver| {
            let batch: Vec<(String, bool)> = (0..entries.length())
                .filter_map(|index| {
                    entries
                        .get(index)
                        .dyn_into::<web_sys::IntersectionObserverEntry>()
                        .ok()
                })
                .filter_map(|entry| {
                    entry
                        .target()
                        .get_attribute("data-reveal-id")
                        .map(|id| (id, entry.is_intersecting()))
                })
                .collect();

            let fresh = tracker.observe(batch.iter().map(|(id, hit)| (id.as_str(), *hit)));

            if !fresh.is_empty() {
                revealed.update(|ids| ids.extend(fresh));
            }
        },
    );

    let init = web_sys::IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(&options.root_margin);

    let Ok(observer) =
        web_sys::IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
    else {
        return;
    };

    for index in 0..targets.length() {
        let Some(element) = targets
            .item(index)
            .and_then(|node| node.dyn_into::<web_sys::Element>().ok())
        else {
            continue;
        };

        observer.observe(&element);
    }

    // Observers live as long as the page.
    callback.forget();
}

#[cfg(not(target_arch = "wasm32"))]
fn install_reveal_observer(_options: &RevealOptions, _revealed: RwSignal<Vec<String>>) {}
