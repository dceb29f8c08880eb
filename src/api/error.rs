//! API Errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Session missing or expired; token already cleared
    #[error("未登录")]
    Unauthorized,

    #[error("{}", status_text(*status, message.as_deref()))]
    Status { status: u16, message: Option<String> },

    #[error("网络错误: {0}")]
    Network(String),

    #[error("解析失败: {0}")]
    Decode(String),

    #[error("请求构造失败: {0}")]
    Request(String),
}

fn status_text(status: u16, message: Option<&str>) -> String {
    match message {
        Some(msg) if !msg.is_empty() => msg.to_string(),
        _ => format!("HTTP {status}"),
    }
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => ApiError::Decode(e.to_string()),
            other => ApiError::Network(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_prefers_server_message() {
        let err = ApiError::Status { status: 400, message: Some("抽奖状态为 ended，无法开奖".into()) };
        assert_eq!(err.to_string(), "抽奖状态为 ended，无法开奖");
    }

    #[test]
    fn status_without_message_shows_code() {
        let err = ApiError::Status { status: 502, message: None };
        assert_eq!(err.to_string(), "HTTP 502");
        let err = ApiError::Status { status: 404, message: Some(String::new()) };
        assert_eq!(err.to_string(), "HTTP 404");
    }

    #[test]
    fn unauthorized_is_detected() {
        assert!(ApiError::Unauthorized.is_unauthorized());
        assert!(!ApiError::Network("offline".into()).is_unauthorized());
    }
}
