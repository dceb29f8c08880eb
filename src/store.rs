//! Session State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::AdminUser;

/// Who is logged in, and whether that is still being checked
#[derive(Clone, Debug, Store)]
pub struct SessionState {
    /// Logged-in admin, `None` until `/auth/me` succeeds
    pub user: Option<AdminUser>,
    /// True while the startup session check is in flight
    pub checking: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self { user: None, checking: true }
    }
}

pub type SessionStore = Store<SessionState>;

// ========================
// Store Helper Functions
// ========================

pub fn store_login(store: &SessionStore, user: AdminUser) {
    log::info!("[session] logged in as {}", user.username);
    store.user().set(Some(user));
    store.checking().set(false);
}

pub fn store_logout(store: &SessionStore) {
    store.user().set(None);
    store.checking().set(false);
}
