//! Admin API Client
//!
//! Authenticated fetch wrapper around the bot's REST API, organized by domain.
//! Every request carries the stored bearer token; a 401 clears the token and
//! sends the browser back to the login view.

mod error;

pub mod anon;
pub mod auth;
pub mod bot_config;
pub mod files;
pub mod lottery;
pub mod roles;
pub mod stats;
pub mod tasks;

pub use error::ApiError;

use gloo_net::http::{Method, RequestBuilder, Response};
use gloo_storage::{LocalStorage, Storage};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::router::{self, Route};

/// Characters left alone by `encodeURIComponent`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode one path segment or query value
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

// ========================
// Token Storage
// ========================

pub fn get_token() -> Option<String> {
    LocalStorage::raw()
        .get_item(&config::get().token_key)
        .ok()
        .flatten()
        .filter(|token| !token.is_empty())
}

pub fn set_token(token: &str) {
    if LocalStorage::raw().set_item(&config::get().token_key, token).is_err() {
        log::warn!("[api] could not persist token");
    }
}

pub fn clear_token() {
    LocalStorage::delete(&config::get().token_key);
}

// ========================
// Request Plumbing
// ========================

enum Body {
    Empty,
    Json(serde_json::Value),
    Form(web_sys::FormData),
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

async fn send(method: Method, path: &str, body: Body) -> Result<Response, ApiError> {
    let url = config::get().api_url(path);
    log::debug!("[api] {method:?} {url}");

    let mut builder = RequestBuilder::new(&url).method(method);
    if let Some(token) = get_token() {
        builder = builder.header("Authorization", &format!("Bearer {token}"));
    }

    // FormData sets its own multipart boundary header
    let request = match body {
        Body::Empty => builder.build(),
        Body::Json(value) => builder.json(&value),
        Body::Form(form) => builder.body(form),
    }
    .map_err(|e| ApiError::Request(e.to_string()))?;

    let resp = request.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
    check_status(resp).await
}

async fn check_status(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status == 401 {
        log::warn!("[api] session rejected, returning to login");
        clear_token();
        router::navigate(Route::Login);
        return Err(ApiError::Unauthorized);
    }
    if !resp.ok() {
        let message = resp.json::<ErrorBody>().await.ok().and_then(|body| body.error);
        return Err(ApiError::Status { status, message });
    }
    Ok(resp)
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    resp.json::<T>().await.map_err(ApiError::from)
}

fn to_json<B: Serialize + ?Sized>(body: &B) -> Result<Body, ApiError> {
    serde_json::to_value(body)
        .map(Body::Json)
        .map_err(|e| ApiError::Request(e.to_string()))
}

pub async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    decode(send(Method::GET, path, Body::Empty).await?).await
}

pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(path: &str, body: &B) -> Result<T, ApiError> {
    decode(send(Method::POST, path, to_json(body)?).await?).await
}

/// POST without a request body
pub async fn post_empty<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    decode(send(Method::POST, path, Body::Empty).await?).await
}

pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(path: &str, body: &B) -> Result<T, ApiError> {
    decode(send(Method::PUT, path, to_json(body)?).await?).await
}

pub async fn delete<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    decode(send(Method::DELETE, path, Body::Empty).await?).await
}

pub async fn post_form<T: DeserializeOwned>(path: &str, form: web_sys::FormData) -> Result<T, ApiError> {
    decode(send(Method::POST, path, Body::Form(form)).await?).await
}

/// Generic `{"ok": true, ...}` acknowledgement
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_like_encode_uri_component() {
        assert_eq!(encode_component("角色卡 v2"), "%E8%A7%92%E8%89%B2%E5%8D%A1%20v2");
        assert_eq!(encode_component("a/b?c=d&e"), "a%2Fb%3Fc%3Dd%26e");
        assert_eq!(encode_component("keep-_.!~*'()"), "keep-_.!~*'()");
    }
}
