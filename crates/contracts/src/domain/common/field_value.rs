use serde_json::Value;

use super::EntityId;

/// Новый файл, выбранный пользователем в форме
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Ссылка на изображение: уже загруженное (относительный путь) или новое
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRef {
    Remote(String),
    Upload(Attachment),
}

/// Значение поля записи
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Ref(EntityId),
    /// Множество внешних ключей, без повторов, в порядке выбора
    Refs(Vec<EntityId>),
    File(FileRef),
    Json(Value),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_ref_id(&self) -> Option<&EntityId> {
        match self {
            Self::Ref(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_refs(&self) -> Option<&[EntityId]> {
        match self {
            Self::Refs(ids) => Some(ids),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileRef> {
        match self {
            Self::File(file) => Some(file),
            _ => None,
        }
    }

    /// Строковый ключ для сравнения с категориальным фильтром
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Ref(id) => Some(id.as_str()),
            Self::File(FileRef::Remote(path)) => Some(path),
            Self::Json(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Представление для отправки в JSON / вывода в консоль
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Text(s) => Value::String(s.clone()),
            Self::Ref(id) => Value::String(id.0.clone()),
            Self::Refs(ids) => Value::Array(
                ids.iter()
                    .map(|id| Value::String(id.0.clone()))
                    .collect(),
            ),
            Self::File(FileRef::Remote(path)) => Value::String(path.clone()),
            Self::File(FileRef::Upload(attachment)) => {
                Value::String(attachment.file_name.clone())
            }
            Self::Json(value) => value.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<EntityId> for FieldValue {
    fn from(value: EntityId) -> Self {
        Self::Ref(value)
    }
}

impl From<Attachment> for FieldValue {
    fn from(value: Attachment) -> Self {
        Self::File(FileRef::Upload(value))
    }
}
