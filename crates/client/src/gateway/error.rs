use contracts::shared::api_error::{ApiErrorBody, FieldError};
use thiserror::Error;

/// Категория ошибки, доступная для программной проверки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Ответ не получен (соединение, таймаут)
    Network,
    /// 5xx или неожиданная форма ответа
    Server,
    /// 4xx с описанием ошибок полей
    Validation,
    NotFound,
    /// 401/403 или отсутствует токен сессии
    Unauthorized,
    /// Повторная операция над записью, запрос по которой ещё выполняется
    Busy,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Server => "server",
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::Busy => "busy",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ошибки удалённого шлюза коллекции
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field_errors: Vec<FieldError>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::Server { .. } => ErrorKind::Server,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field_errors: Vec::new(),
        }
    }

    /// Ответ пришёл, но его форма не соответствует контракту
    pub fn unexpected_shape(message: impl Into<String>) -> Self {
        Self::Server {
            status: 200,
            message: message.into(),
        }
    }

    /// Преобразовать неуспешный HTTP-статус и тело ответа в ошибку
    pub fn from_status(status: u16, body: &str) -> Self {
        let parsed = ApiErrorBody::parse(body);
        match status {
            401 | 403 => Self::Unauthorized(
                parsed
                    .message
                    .unwrap_or_else(|| "Session expired, please log in again".to_string()),
            ),
            404 => Self::NotFound(
                parsed
                    .message
                    .unwrap_or_else(|| "Resource not found".to_string()),
            ),
            400..=499 => Self::Validation {
                message: parsed
                    .message
                    .or_else(|| parsed.errors.first().map(|e| e.message.clone()))
                    .unwrap_or_else(|| format!("Request rejected ({})", status)),
                field_errors: parsed.errors,
            },
            _ => Self::Server {
                status,
                message: parsed
                    .message
                    .unwrap_or_else(|| "Internal server error".to_string()),
            },
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Network(format!("Request timed out: {}", e))
        } else if e.is_decode() {
            Self::unexpected_shape(format!("Failed to parse response: {}", e))
        } else {
            Self::Network(format!("Failed to send request: {}", e))
        }
    }
}
