use contracts::shared::api_error::FieldError;
use thiserror::Error;

use crate::gateway::{ErrorKind, GatewayError};

/// Ошибка операции контроллера: одно сообщение для пользователя и вид ошибки
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ControllerError {
    pub kind: ErrorKind,
    pub message: String,
    pub field_errors: Vec<FieldError>,
}

pub type ControllerResult<T> = Result<T, ControllerError>;

impl ControllerError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field_errors: Vec::new(),
        }
    }

    pub fn busy(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Busy, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Ошибки черновика; сообщением служит первая ошибка поля
    pub fn validation(field_errors: Vec<FieldError>) -> Self {
        let message = field_errors
            .first()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| "Invalid data".to_string());
        Self {
            kind: ErrorKind::Validation,
            message,
            field_errors,
        }
    }

    /// Добавить контекст операции к сообщению
    pub fn context(mut self, operation: &str) -> Self {
        self.message = format!("{}: {}", operation, self.message);
        self
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl From<GatewayError> for ControllerError {
    fn from(error: GatewayError) -> Self {
        let kind = error.kind();
        let text = error.to_string();
        match error {
            GatewayError::Validation {
                message,
                field_errors,
            } => Self {
                kind,
                message,
                field_errors,
            },
            GatewayError::Network(message)
            | GatewayError::NotFound(message)
            | GatewayError::Unauthorized(message) => Self::new(kind, message),
            GatewayError::Server { .. } => Self::new(kind, text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_gateway_keeps_kind_and_fields() {
        let err = ControllerError::from(GatewayError::from_status(
            400,
            r#"{"message":"Validation failed","errors":[{"field":"title","message":"Title is required"}]}"#,
        ));
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.field_error("title"), Some("Title is required"));
        assert_eq!(err.to_string(), "Validation failed");
    }

    #[test]
    fn test_context_prefixes_message() {
        let err = ControllerError::from(GatewayError::Network("connection refused".into()))
            .context("Failed to delete page");
        assert_eq!(err.kind, ErrorKind::Network);
        assert_eq!(err.message, "Failed to delete page: connection refused");
    }
}
