//! Top bar with the logged-in admin and a logout menu.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::models::AdminUser;

#[component]
pub fn Header(user: AdminUser) -> impl IntoView {
    let ctx = use_app_context();
    let (show_menu, set_show_menu) = signal(false);

    let avatar = match user.avatar.clone() {
        Some(url) => view! { <img class="avatar" src=url alt="" /> }.into_any(),
        None => view! { <div class="avatar placeholder">{user.initial()}</div> }.into_any(),
    };

    view! {
        <header class="topbar">
            <div class="topbar-crumb">{move || ctx.route.get().label()}</div>
            <div class="user-menu">
                <button class="user-btn" on:click=move |_| set_show_menu.update(|v| *v = !*v)>
                    {avatar}
                    <span class="user-name">{user.username.clone()}</span>
                    <span class="caret">"▾"</span>
                </button>
                <Show when=move || show_menu.get()>
                    <div class="user-dropdown">
                        <button
                            class="logout-btn"
                            on:click=move |_| {
                                set_show_menu.set(false);
                                ctx.logout();
                            }
                        >
                            "退出登录"
                        </button>
                    </div>
                </Show>
            </div>
        </header>
    }
}
