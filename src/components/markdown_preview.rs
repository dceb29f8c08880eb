//! Live preview pane for Discord message text.

use leptos::prelude::*;

use crate::markdown::render_discord;

#[component]
pub fn MarkdownPreview(
    #[prop(into)] text: Signal<String>,
    #[prop(optional)] placeholder: Option<&'static str>,
) -> impl IntoView {
    let empty = placeholder.unwrap_or("预览将显示在这里");
    view! {
        <div class="md-preview">
            <Show
                when=move || !text.get().trim().is_empty()
                fallback=move || view! { <p class="md-empty">{empty}</p> }
            >
                <div class="md-body" inner_html=move || render_discord(&text.get())></div>
            </Show>
        </div>
    }
}
