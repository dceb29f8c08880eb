//! Goose Admin Console App
//!
//! Root component: session bootstrap, login gate and the sidebar layout.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::api;
use crate::components::{Header, Loading, LoginView, Sidebar};
use crate::context::AppContext;
use crate::pages::{
    AnonPage, ConfigPage, DashboardPage, FaqPage, FilesPage, LotteryPage, RolesPage, ToolsPage,
};
use crate::router::{self, Route};
use crate::store::{store_login, store_logout, SessionState, SessionStateStoreFields};

/// Store a `?token=` handed back by the OAuth callback and drop it from the URL
fn capture_callback_token() {
    let location = window().location();
    let search = location.search().unwrap_or_default();
    let Some(token) = router::token_param(&search) else {
        return;
    };
    api::set_token(&token);

    let path = location.pathname().unwrap_or_default();
    let hash = location.hash().unwrap_or_default();
    let cleaned = format!("{path}{hash}");
    match window().history() {
        Ok(history) => {
            if history
                .replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&cleaned))
                .is_err()
            {
                log::warn!("[APP] could not strip token from url");
            }
        }
        Err(_) => log::warn!("[APP] history unavailable"),
    }
    log::info!("[APP] captured login token");
}

#[component]
pub fn App() -> impl IntoView {
    capture_callback_token();

    let session = Store::new(SessionState::new());
    let route = router::use_hash_route();

    // Provide context to all children
    provide_context(AppContext::new(route, session));

    // Check the stored token once
    if api::get_token().is_some() {
        spawn_local(async move {
            match api::auth::me().await {
                Ok(user) => {
                    if route.get_untracked() == Route::Login {
                        router::navigate(Route::Dashboard);
                    }
                    store_login(&session, user);
                }
                Err(e) => {
                    log::warn!("[APP] session check failed: {e}");
                    api::clear_token();
                    store_logout(&session);
                }
            }
        });
    } else {
        store_logout(&session);
    }

    // A 401 anywhere sends the browser to #/login; drop the stale user there
    Effect::new(move |_| {
        if route.get() == Route::Login && session.user().get_untracked().is_some() {
            log::info!("[APP] session expired");
            store_logout(&session);
        }
    });

    move || {
        if session.checking().get() {
            return view! {
                <div class="boot-screen">
                    <Loading />
                </div>
            }
            .into_any();
        }
        match session.user().get() {
            None => view! { <LoginView /> }.into_any(),
            Some(user) => view! {
                <div class="app-layout">
                    <Sidebar route=route />
                    <div class="main-column">
                        <Header user=user />
                        <main class="main-content">
                            {move || page_for(route.get())}
                        </main>
                    </div>
                </div>
            }
            .into_any(),
        }
    }
}

fn page_for(route: Route) -> AnyView {
    match route {
        Route::Dashboard | Route::Login => view! { <DashboardPage /> }.into_any(),
        Route::Files => view! { <FilesPage /> }.into_any(),
        Route::Anon => view! { <AnonPage /> }.into_any(),
        Route::Lottery => view! { <LotteryPage /> }.into_any(),
        Route::Roles => view! { <RolesPage /> }.into_any(),
        Route::Tools => view! { <ToolsPage /> }.into_any(),
        Route::Config => view! { <ConfigPage /> }.into_any(),
        Route::Faq => view! { <FaqPage /> }.into_any(),
    }
}
