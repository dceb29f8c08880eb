//! Login screen. The button is a plain link into the server's OAuth flow.

use leptos::prelude::*;

use crate::api;

#[component]
pub fn LoginView() -> impl IntoView {
    view! {
        <div class="login-screen">
            <div class="login-card">
                <div class="login-goose">"🐧"</div>
                <h1>"小鹅子管理面板"</h1>
                <p class="login-hint">"仅限拥有管理员身份组的成员登录"</p>
                <a class="discord-btn" href=api::auth::login_url()>
                    "Discord 登录"
                </a>
            </div>
        </div>
    }
}
