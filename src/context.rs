//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::router::{self, Route};
use crate::store::{store_logout, SessionStore};

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Current hash route
    pub route: ReadSignal<Route>,
    session: SessionStore,
}

impl AppContext {
    pub fn new(route: ReadSignal<Route>, session: SessionStore) -> Self {
        Self { route, session }
    }

    /// End the session on both sides and show the login view
    pub fn logout(&self) {
        let session = self.session;
        spawn_local(async move {
            api::auth::logout().await;
            api::clear_token();
            store_logout(&session);
            router::navigate(Route::Login);
        });
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
