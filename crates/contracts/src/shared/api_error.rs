use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ошибка валидации отдельного поля
///
/// Принимает и формат express-validator (`{ msg, param }` / `{ msg, path }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(alias = "param", alias = "path")]
    pub field: String,
    #[serde(alias = "msg")]
    pub message: String,
}

/// Тело ответа API при ошибке (`{ message, errors }`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, alias = "error")]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<FieldError>,
}

impl ApiErrorBody {
    /// Разобрать тело ответа
    ///
    /// JSON-объект с непонятным `errors` даёт только `message`;
    /// не-JSON тело становится сообщением как есть.
    pub fn parse(body: &str) -> Self {
        if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
            return parsed;
        }
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
            let message = ["message", "error"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .map(str::to_string);
            return Self {
                message,
                errors: Vec::new(),
            };
        }

        let trimmed = body.trim();
        Self {
            message: (!trimmed.is_empty()).then(|| trimmed.to_string()),
            errors: Vec::new(),
        }
    }
}
