use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Идентификатор записи, выданный удалённым хранилищем
///
/// Для Mongo-коллекций это `_id`, для товаров `shopifyId`.
/// Клиент никогда не генерирует идентификаторы сам.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Извлечь ID из JSON-значения
    ///
    /// Сервер отдаёт ссылки либо строкой, либо числом (Shopify),
    /// либо populated-объектом с полем `_id`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            Value::Object(map) => map.get("_id").and_then(Self::from_json),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_from_populated_reference() {
        let populated = json!({ "_id": "65f0c0ffee", "name": "Labrador" });
        assert_eq!(
            EntityId::from_json(&populated),
            Some(EntityId::from("65f0c0ffee"))
        );
    }

    #[test]
    fn test_numeric_shopify_id() {
        assert_eq!(
            EntityId::from_json(&json!(8123456789u64)),
            Some(EntityId::from("8123456789"))
        );
    }

    #[test]
    fn test_blank_and_null_are_not_ids() {
        assert_eq!(EntityId::from_json(&json!("  ")), None);
        assert_eq!(EntityId::from_json(&Value::Null), None);
        assert_eq!(EntityId::from_json(&json!(["a"])), None);
    }
}
