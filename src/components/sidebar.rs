//! Navigation sidebar.

use leptos::prelude::*;

use crate::router::{Route, NAV};

#[component]
pub fn Sidebar(route: ReadSignal<Route>) -> impl IntoView {
    view! {
        <aside class="sidebar">
            <div class="sidebar-logo">
                <span class="sidebar-logo-icon">"🐧"</span>
                <div>
                    <div class="sidebar-title">"小鹅子 Bot"</div>
                    <div class="sidebar-subtitle">"管理面板"</div>
                </div>
            </div>
            <nav class="sidebar-nav">
                {NAV
                    .into_iter()
                    .map(|item| {
                        view! {
                            <a
                                href=item.href()
                                class=move || {
                                    if item.is_active(route.get()) { "nav-item active" } else { "nav-item" }
                                }
                            >
                                <span class="nav-icon">{item.icon()}</span>
                                <span>{item.label()}</span>
                            </a>
                        }
                    })
                    .collect_view()}
            </nav>
        </aside>
    }
}
