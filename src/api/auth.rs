//! Session Endpoints

use super::{get_json, post_empty, Ack, ApiError};
use crate::config;
use crate::models::AdminUser;

/// Browser navigation target that starts the Discord OAuth flow
pub fn login_url() -> String {
    config::get().api_url("/auth/login")
}

pub async fn me() -> Result<AdminUser, ApiError> {
    get_json("/auth/me").await
}

/// End the server session. Failures are logged and otherwise ignored.
pub async fn logout() {
    if let Err(e) = post_empty::<Ack>("/auth/logout").await {
        log::warn!("[auth] logout request failed: {e}");
    }
}
