use gran::navigation::{MobileMenu, is_link_active};
use leptos::prelude::*;

use crate::shop::Shop;

/// Section anchors shown in both the desktop and mobile navigation.
pub(crate) const NAV_LINKS: [(&str, &str); 4] = [
    ("#hero", "Главная"),
    ("#catalog", "Каталог"),
    ("#about", "О нас"),
    ("#contacts", "Контакты"),
];

/// Clicks inside these elements leave the mobile menu open.
pub(crate) const MENU_AREA_SELECTOR: &str = ".header-container, .mobile-nav";

#[component]
fn NavLinks(
    current: RwSignal<Option<String>>,
    menu: RwSignal<MobileMenu>,
    list_class: &'static str,
) -> impl IntoView {
    view! {
        <ul class=list_class>
            {NAV_LINKS
                .into_iter()
                .map(|(href, label)| {
                    view! {
                        <li>
                            <a
                                href=href
                                class:active=move || {
                                    current.with(|current| is_link_active(href, current.as_deref()))
                                }
                                on:click=move |_| menu.update(MobileMenu::handle_link_click)
                            >
                                {label}
                            </a>
                        </li>
                    }
                })
                .collect_view()}
        </ul>
    }
}

#[component]
pub(crate) fn Header(
    shop: Shop,
    current: RwSignal<Option<String>>,
    menu: RwSignal<MobileMenu>,
) -> impl IntoView {
    view! {
        <header class="header">
            <div class="header-container">
                <a class="logo" href="#hero">"GRAN"</a>
                <nav class="nav">
                    <NavLinks current=current menu=menu list_class="nav-list" />
                </nav>
                <button
                    id="cartIcon"
                    class="cart-icon"
                    aria-label="Корзина"
                    on:click=move |_| shop.open_cart()
                >
                    <span class="cart-icon-label">"Корзина"</span>
                    <span id="cartCounter" class="cart-count">{move || shop.counter()}</span>
                </button>
                <button
                    class="hamburger"
                    class:active=move || menu.get().is_open()
                    aria-label="Меню"
                    on:click=move |_| menu.update(MobileMenu::toggle)
                >
                    <span></span>
                    <span></span>
                    <span></span>
                </button>
            </div>
        </header>
        <nav class="mobile-nav" class:active=move || menu.get().is_open()>
            <NavLinks current=current menu=menu list_class="mobile-nav-list" />
        </nav>
    }
}

/// Keeps the highlighted nav link in step with the scroll position and closes
/// the mobile menu on clicks outside it.
#[cfg(target_arch = "wasm32")]
pub(crate) fn install_page_listeners(
    current: RwSignal<Option<String>>,
    menu: RwSignal<MobileMenu>,
    scroll_offset: f64,
) {
    use wasm_bindgen::JsCast;

    refresh_active_section(current, scroll_offset);

    _ = window_event_listener(leptos::ev::scroll, move |_| {
        refresh_active_section(current, scroll_offset);
    });

    _ = window_event_listener(leptos::ev::click, move |event| {
        let inside = event
            .target()
            .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
            .and_then(|element| element.closest(MENU_AREA_SELECTOR).ok().flatten())
            .is_some();

        menu.update(|menu| menu.handle_document_click(inside));
    });
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn install_page_listeners(
    _current: RwSignal<Option<String>>,
    _menu: RwSignal<MobileMenu>,
    _scroll_offset: f64,
) {
}

#[cfg(target_arch = "wasm32")]
fn refresh_active_section(current: RwSignal<Option<String>>, scroll_offset: f64) {
    use gran::navigation::{SectionOffset, active_section};
    use wasm_bindgen::JsCast;

    let Some(window) = web_sys::window() else {
        return;
    };

    let Some(document) = window.document() else {
        return;
    };

    let Ok(nodes) = document.query_selector_all("section[id]") else {
        return;
    };

    let mut sections = Vec::new();

    for index in 0..nodes.length() {
        let Some(element) = nodes
            .item(index)
            .and_then(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            continue;
        };

        sections.push(SectionOffset::new(
            element.id(),
            f64::from(element.offset_top()),
        ));
    }

    let scroll_y = window.scroll_y().unwrap_or_default();
    let active = active_section(&sections, scroll_y, scroll_offset).map(str::to_string);

    if current.with_untracked(|current| *current != active) {
        current.set(active);
    }
}
