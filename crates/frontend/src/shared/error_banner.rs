use leptos::prelude::*;

use crate::shared::alert;

/// Show an error both inline and as a blocking dialog
pub fn report_error(banner: RwSignal<Option<String>>, context: &str, message: String) {
    log::error!("{}: {}", context, message);
    alert(&format!("{}: {}", context, message));
    banner.set(Some(message));
}

#[component]
pub fn ErrorBanner(message: RwSignal<Option<String>>) -> impl IntoView {
    move || {
        message.get().map(|text| {
            view! {
                <div class="error-banner">
                    <span>"⚠️ " {text}</span>
                    <button class="error-banner__close" on:click=move |_| message.set(None)>
                        "✕"
                    </button>
                </div>
            }
        })
    }
}
