use gran::notifications::{Notification, NotificationPhase};
use leptos::prelude::*;

/// Toast classes for a phase; `show` drives both the fade-in and the fade-out.
fn phase_class(phase: NotificationPhase) -> &'static str {
    match phase {
        NotificationPhase::Visible => "notification show",
        NotificationPhase::Entering | NotificationPhase::Leaving => "notification",
    }
}

#[component]
pub(crate) fn ToastStack(toasts: RwSignal<Vec<Notification>>) -> impl IntoView {
    view! {
        <div class="notifications" role="status" aria-live="polite">
            <For
                each=move || toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    let class = move || {
                        toasts
                            .with(|active| {
                                active.iter().find(|toast| toast.id == id).map(|toast| toast.phase)
                            })
                            .map_or("notification", phase_class)
                    };

                    view! { <div class=class>{toast.message}</div> }
                }
            />
        </div>
    }
}
