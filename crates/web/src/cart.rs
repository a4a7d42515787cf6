use gran::orders::CustomerDetails;
use leptos::{ev::SubmitEvent, logging::warn, prelude::*};

use crate::shop::Shop;

/// Closes a modal when the click landed on its backdrop rather than its content.
fn close_on_backdrop(open: RwSignal<bool>) -> impl Fn(leptos::ev::MouseEvent) + 'static {
    move |event| {
        if event.target() == event.current_target() {
            open.set(false);
        }
    }
}

#[component]
pub(crate) fn CartModal(shop: Shop) -> impl IntoView {
    let content = move || {
        let modal = shop.modal_view();

        view! {
            <div class="cart-items">
                {modal
                    .lines
                    .into_iter()
                    .map(|line| {
                        let id = line.id;

                        view! {
                            <div class="cart-item">
                                <div class="cart-item-info">
                                    <h4>{line.name}</h4>
                                    <p>{format!("Количество: {}", line.quantity)}</p>
                                    <p class="cart-item-price">{line.line_total}</p>
                                </div>
                                <button class="cart-item-remove" on:click=move |_| shop.remove(&id)>
                                    "Удалить"
                                </button>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
            <div class="cart-total">
                <p>"Итого: " <strong>{modal.total}</strong></p>
            </div>
        }
    };

    view! {
        <Show when=move || shop.cart_open.get()>
            <div class="cart-modal" on:click=close_on_backdrop(shop.cart_open)>
                <div class="cart-modal-content">
                    <button
                        class="cart-modal-close"
                        aria-label="Закрыть"
                        on:click=move |_| shop.cart_open.set(false)
                    >
                        "×"
                    </button>
                    <h2>"Ваша корзина"</h2>
                    {content}
                    <button class="cart-checkout-btn" on:click=move |_| shop.open_checkout()>
                        "ОФОРМИТЬ ЗАКАЗ"
                    </button>
                    <button class="cart-clear-btn" on:click=move |_| shop.clear()>
                        "ОЧИСТИТЬ КОРЗИНУ"
                    </button>
                </div>
            </div>
        </Show>
    }
}

/// Checkout form fields, bound to the inputs.
#[derive(Clone, Copy)]
struct CheckoutFields {
    name: RwSignal<String>,
    phone: RwSignal<String>,
    email: RwSignal<String>,
    address: RwSignal<String>,
    message: RwSignal<String>,
}

impl CheckoutFields {
    fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            address: RwSignal::new(String::new()),
            message: RwSignal::new(String::new()),
        }
    }

    fn details(self) -> CustomerDetails {
        customer_details(
            self.name.get_untracked(),
            self.phone.get_untracked(),
            self.email.get_untracked(),
            self.address.get_untracked(),
            self.message.get_untracked(),
        )
    }

    fn reset(self) {
        for field in [self.name, self.phone, self.email, self.address, self.message] {
            field.set(String::new());
        }
    }
}

fn customer_details(
    name: String,
    phone: String,
    email: String,
    address: String,
    message: String,
) -> CustomerDetails {
    CustomerDetails {
        name,
        phone,
        email,
        address,
        message: Some(message),
    }
    .normalized()
}

#[component]
pub(crate) fn CheckoutModal(shop: Shop) -> impl IntoView {
    let fields = CheckoutFields::new();

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();

        match shop.place_order(fields.details()) {
            Ok(()) => fields.reset(),
            Err(error) => warn!("failed to place order: {error}"),
        }

        shop.checkout_open.set(false);
    };

    view! {
        <Show when=move || shop.checkout_open.get()>
            <div class="checkout-modal" on:click=close_on_backdrop(shop.checkout_open)>
                <div class="checkout-modal-content">
                    <button
                        class="checkout-modal-close"
                        aria-label="Закрыть"
                        on:click=move |_| shop.checkout_open.set(false)
                    >
                        "×"
                    </button>
                    <h2>"ОФОРМЛЕНИЕ ЗАКАЗА"</h2>
                    <form class="checkout-form" on:submit=on_submit>
                        <div class="form-group">
                            <label for="name">"Имя *"</label>
                            <input type="text" id="name" name="name" required bind:value=fields.name />
                        </div>
                        <div class="form-group">
                            <label for="phone">"Телефон *"</label>
                            <input type="tel" id="phone" name="phone" required bind:value=fields.phone />
                        </div>
                        <div class="form-group">
                            <label for="email">"Email *"</label>
                            <input type="email" id="email" name="email" required bind:value=fields.email />
                        </div>
                        <div class="form-group">
                            <label for="address">"Адрес доставки *"</label>
                            <textarea id="address" name="address" rows="3" required bind:value=fields.address></textarea>
                        </div>
                        <div class="form-group">
                            <label for="message">"Комментарий"</label>
                            <textarea id="message" name="message" rows="2" bind:value=fields.message></textarea>
                        </div>
                        <div class="checkout-total">
                            <p>"Итого: " <strong>{move || shop.checkout_summary().total}</strong></p>
                        </div>
                        <button type="submit" class="checkout-submit-btn">"ОТПРАВИТЬ ЗАКАЗ"</button>
                    </form>
                </div>
            </div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_comment_is_dropped() {
        let details = customer_details(
            "Anna".to_string(),
            "+7 900 000 00 00".to_string(),
            "anna@example.com".to_string(),
            "Moscow".to_string(),
            "  ".to_string(),
        );

        assert_eq!(details.message, None);
        assert_eq!(details.name, "Anna");
    }

    #[test]
    fn comment_is_kept_verbatim() {
        let details = customer_details(
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            "Позвоните заранее".to_string(),
        );

        assert_eq!(details.message.as_deref(), Some("Позвоните заранее"));
    }
}
