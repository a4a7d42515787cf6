use gran::consent::CookieBanner;
use leptos::{logging::warn, prelude::*};

use crate::browser::PageStorage;

#[component]
pub(crate) fn CookieBannerView(
    banner: StoredValue<CookieBanner<PageStorage>, LocalStorage>,
    visible: RwSignal<bool>,
) -> impl IntoView {
    let on_accept = move |_| {
        banner.update_value(|banner| {
            if let Err(error) = banner.accept() {
                warn!("failed to record cookie consent: {error}");
            }
        });
    };

    view! {
        <div id="cookieBanner" class="cookie-banner" class:show=move || visible.get()>
            <p>
                "Мы используем файлы cookie, чтобы сделать сайт удобнее. "
                "Продолжая пользоваться сайтом, вы соглашаетесь с этим."
            </p>
            <button id="cookieBtn" class="cookie-btn" on:click=on_accept>
                "Принять"
            </button>
        </div>
    }
}
