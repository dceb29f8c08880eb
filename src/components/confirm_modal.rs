//! Confirm Modal Component
//!
//! Centered dialog over a dimmed backdrop. Clicking the backdrop cancels.

use leptos::prelude::*;

#[component]
pub fn ConfirmModal(
    #[prop(into)] title: String,
    #[prop(into)] message: Signal<String>,
    #[prop(into)] confirm_text: Signal<String>,
    #[prop(into)] confirm_disabled: Signal<bool>,
    #[prop(into)] on_confirm: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="modal-root">
            <div class="modal-backdrop" on:click=move |_| on_cancel.run(())></div>
            <div class="modal">
                <h3 class="modal-title">{title}</h3>
                <p class="modal-message">{move || message.get()}</p>
                <div class="modal-actions">
                    <button class="btn ghost" on:click=move |_| on_cancel.run(())>"取消"</button>
                    <button
                        class="btn danger"
                        disabled=move || confirm_disabled.get()
                        on:click=move |_| on_confirm.run(())
                    >
                        {move || confirm_text.get()}
                    </button>
                </div>
            </div>
        </div>
    }
}
