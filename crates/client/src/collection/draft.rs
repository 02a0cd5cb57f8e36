use contracts::domain::common::{Attachment, Entity, EntityId, EntitySchema, FieldValue, Fields};
use contracts::shared::api_error::FieldError;

/// Черновик формы создания или редактирования
///
/// Содержит только редактируемые поля схемы; проверяется целиком перед отправкой.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    fields: Fields,
}

impl Draft {
    /// Пустой черновик со значениями по умолчанию
    pub fn for_create(schema: &EntitySchema) -> Self {
        let fields = schema
            .writable_fields()
            .filter_map(|def| def.initial_value().map(|value| (def.name, value)))
            .collect();
        Self { fields }
    }

    /// Черновик, заполненный из существующей записи
    pub fn from_entity(schema: &EntitySchema, entity: &Entity) -> Self {
        let fields = schema
            .writable_fields()
            .filter_map(|def| {
                let value = match entity.field(def.name) {
                    Some(value) => Some(value.clone()),
                    None => def.initial_value(),
                };
                value.map(|value| (def.name, value))
            })
            .collect();
        Self { fields }
    }

    pub fn from_fields(fields: Fields) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Текстовое значение поля, пустая строка если не задано
    pub fn text(&self, name: &str) -> &str {
        self.get(name)
            .and_then(FieldValue::as_text)
            .unwrap_or_default()
    }

    pub fn set_text(&mut self, name: &str, value: impl Into<String>) {
        self.fields.set(name, FieldValue::Text(value.into()));
    }

    pub fn set_ref(&mut self, name: &str, id: Option<EntityId>) {
        let value = match id {
            Some(id) if !id.is_empty() => FieldValue::Ref(id),
            _ => FieldValue::Null,
        };
        self.fields.set(name, value);
    }

    pub fn set_file(&mut self, name: &str, attachment: Attachment) {
        self.fields.set(name, attachment);
    }

    /// Убрать выбранный файл; файл на сервере при этом не удаляется
    pub fn clear_file(&mut self, name: &str) {
        self.fields.set(name, FieldValue::Null);
    }

    pub fn refs(&self, name: &str) -> &[EntityId] {
        self.get(name)
            .and_then(FieldValue::as_refs)
            .unwrap_or_default()
    }

    /// Заменить набор ссылок; повторы отбрасываются
    pub fn set_refs(&mut self, name: &str, ids: impl IntoIterator<Item = EntityId>) {
        let mut unique: Vec<EntityId> = Vec::new();
        for id in ids {
            if !id.is_empty() && !unique.contains(&id) {
                unique.push(id);
            }
        }
        self.fields.set(name, FieldValue::Refs(unique));
    }

    /// Переключить выбор в мультиселекте; `true`, если ID теперь выбран
    pub fn toggle_ref(&mut self, name: &str, id: EntityId) -> bool {
        let mut ids = self.refs(name).to_vec();
        let selected = match ids.iter().position(|existing| existing == &id) {
            Some(index) => {
                ids.remove(index);
                false
            }
            None => {
                ids.push(id);
                true
            }
        };
        self.fields.set(name, FieldValue::Refs(ids));
        selected
    }

    /// Проверить все поля схемы; возвращает все найденные ошибки
    pub fn validate(&self, schema: &EntitySchema) -> Result<(), Vec<FieldError>> {
        let errors: Vec<FieldError> = schema
            .writable_fields()
            .filter_map(|def| {
                def.validate(self.get(def.name))
                    .err()
                    .map(|message| FieldError {
                        field: def.name.to_string(),
                        message,
                    })
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
