use serde_json::{Map, Value};

use super::{EntityId, EntitySchema, FieldValue, Fields, FileRef};
use crate::shared::metadata::FieldKind;

/// Ключ позиции в упорядочиваемых коллекциях
pub const ORDER_KEY: &str = "order";

/// Запись коллекции, сохранённая на сервере
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub fields: Fields,
    /// Позиция; имеет смысл только для упорядочиваемых коллекций
    pub order: Option<i64>,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
            order: None,
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    /// ID для ссылок из других коллекций; `None`, если ключа ссылки нет в ответе
    pub fn ref_id(&self, schema: &EntitySchema) -> Option<EntityId> {
        let key = match schema.ref_key {
            Some(key) if key != schema.id_key => key,
            _ => return Some(self.id.clone()),
        };
        match self.fields.get(key)? {
            FieldValue::Json(raw) => EntityId::from_json(raw),
            FieldValue::Text(text) => Some(EntityId::from(text.as_str())).filter(|id| !id.is_empty()),
            other => other.as_ref_id().cloned(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldValue::as_text)
    }

    /// Разобрать JSON-объект ответа сервера по схеме коллекции
    ///
    /// Поля идут в порядке схемы, затем неизвестные ключи (как `Json`).
    pub fn from_json(value: &Value, schema: &EntitySchema) -> Result<Self, String> {
        let object = value
            .as_object()
            .ok_or_else(|| format!("Expected {} object, got {}", schema.kind, kind_of(value)))?;

        let id = object
            .get(schema.id_key)
            .and_then(EntityId::from_json)
            .ok_or_else(|| format!("{} without `{}`", schema.kind, schema.id_key))?;

        let mut fields = Fields::new();
        for def in schema.fields {
            fields.set(def.name, decode_field(def.kind, object.get(def.name)));
        }
        for (key, raw) in object {
            if key == schema.id_key || key == ORDER_KEY || schema.field(key).is_some() {
                continue;
            }
            fields.set(key.as_str(), FieldValue::Json(raw.clone()));
        }

        Ok(Self {
            id,
            fields,
            order: object.get(ORDER_KEY).and_then(Value::as_i64),
        })
    }

    /// Обратное преобразование в JSON (для вывода и фейкового шлюза)
    pub fn to_json(&self, schema: &EntitySchema) -> Value {
        let mut object = Map::new();
        object.insert(schema.id_key.to_string(), Value::String(self.id.0.clone()));
        for (name, value) in self.fields.iter() {
            object.insert(name.to_string(), value.to_json());
        }
        if let Some(order) = self.order {
            object.insert(ORDER_KEY.to_string(), Value::from(order));
        }
        Value::Object(object)
    }
}

fn decode_field(kind: FieldKind, raw: Option<&Value>) -> FieldValue {
    let raw = match raw {
        None | Some(Value::Null) => return FieldValue::Null,
        Some(v) => v,
    };

    match kind {
        FieldKind::Text | FieldKind::LongText | FieldKind::Choice(_) => match raw {
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Number(n) => FieldValue::Text(n.to_string()),
            Value::Bool(b) => FieldValue::Text(b.to_string()),
            other => FieldValue::Json(other.clone()),
        },
        FieldKind::File => match raw {
            Value::String(path) if !path.is_empty() => FieldValue::File(FileRef::Remote(path.clone())),
            _ => FieldValue::Null,
        },
        FieldKind::Ref => EntityId::from_json(raw)
            .map(FieldValue::Ref)
            .unwrap_or(FieldValue::Null),
        FieldKind::Refs => {
            let mut ids: Vec<EntityId> = Vec::new();
            if let Value::Array(items) = raw {
                for id in items.iter().filter_map(EntityId::from_json) {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
            }
            FieldValue::Refs(ids)
        }
        FieldKind::Json => FieldValue::Json(raw.clone()),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
