use serde_json::Value;
use std::io;
use thiserror::Error;

use crate::model::Envelope;

pub const FALLBACK_NOTICE: &str = "Request failed";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Validation failed: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Validation(Vec<FieldError>),
}

pub type AppResult<T> = Result<T, AppError>;

/// 请求管道对外暴露的分类错误
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// HTTP 2xx 但信封 code != 0
    #[error("API error {}: {}", .0.code, .0.message)]
    Application(Envelope<Value>),

    #[error("authentication required")]
    Unauthorized,

    #[error("permission denied")]
    Forbidden,

    #[error("resource not found")]
    NotFound,

    #[error("server error (HTTP {0})")]
    Server(u16),

    #[error("request failed (HTTP {status})")]
    Status { status: u16, message: Option<String> },

    /// 没有收到任何响应（连接失败、超时）
    #[error("network error: {0}")]
    Network(String),

    /// 请求构造失败
    #[error("invalid request: {0}")]
    Build(String),

    /// 2xx 响应体无法解析成信封或目标类型
    #[error("invalid response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// 按 HTTP 状态码分类非 2xx 响应
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            s if s >= 500 => ApiError::Server(s),
            s => ApiError::Status { status: s, message },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden => Some(403),
            ApiError::NotFound => Some(404),
            ApiError::Server(s) => Some(*s),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 展示给用户的提示文本
    pub fn notice(&self) -> String {
        match self {
            ApiError::Application(envelope) => non_empty(&envelope.message),
            ApiError::Unauthorized => "Please log in".to_string(),
            ApiError::Forbidden => "No permission".to_string(),
            ApiError::NotFound => "Requested resource not found".to_string(),
            ApiError::Server(_) => "Server error".to_string(),
            ApiError::Status { message, .. } => {
                non_empty(message.as_deref().unwrap_or_default())
            }
            ApiError::Network(_) => "Network error, please check your connection".to_string(),
            ApiError::Build(message) => non_empty(message),
            ApiError::Decode(_) => FALLBACK_NOTICE.to_string(),
        }
    }
}

fn non_empty(message: &str) -> String {
    if message.trim().is_empty() {
        FALLBACK_NOTICE.to_string()
    } else {
        message.to_string()
    }
}

/// 表单本地校验失败的字段
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}
