//! Bot Configuration Endpoints

use serde::{Deserialize, Serialize};

use super::{encode_component, get_json, put_json, ApiError};
use crate::models::ConfigResponse;

pub const WELCOME_MESSAGE: &str = "welcome_message";
pub const RULES_MESSAGE: &str = "rules_message";
pub const ADMIN_ROLE_NAMES: &str = "admin_role_names";
pub const ANON_NICKNAMES: &str = "anon_nicknames";

#[derive(Serialize)]
struct UpdateArgs<'a, V: Serialize> {
    value: &'a V,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigItem {
    pub key: String,
    pub value: serde_json::Value,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Updated {
    #[serde(default)]
    pub updated_at: Option<String>,
}

pub async fn list() -> Result<ConfigResponse, ApiError> {
    get_json("/config").await
}

pub async fn get_item(key: &str) -> Result<ConfigItem, ApiError> {
    get_json(&format!("/config/{}", encode_component(key))).await
}

/// Replace one config value; the server validates its shape
pub async fn update<V: Serialize>(key: &str, value: &V) -> Result<Updated, ApiError> {
    put_json(&format!("/config/{}", encode_component(key)), &UpdateArgs { value }).await
}
