use contracts::domain::common::{Entity, EntityId, EntitySchema, FieldValue};

/// Фильтр списка: строка поиска и/или категория
///
/// Производное состояние: отфильтрованный вид пересчитывается при каждом чтении.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub category: Option<String>,
}

impl FilterState {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = (!category.trim().is_empty()).then_some(category);
        self
    }

    /// Пустой фильтр пропускает всё
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.category.is_none()
    }

    /// Категория по `category_field` И подстрока без учёта регистра в `display_field`
    pub fn matches(&self, schema: &EntitySchema, entity: &Entity) -> bool {
        if let Some(category) = &self.category {
            let value = schema
                .category_field
                .and_then(|name| entity.field(name))
                .and_then(FieldValue::as_key);
            if value != Some(category.as_str()) {
                return false;
            }
        }

        let needle = self.search.trim();
        if !needle.is_empty() {
            let haystack = entity.text(schema.display_field).unwrap_or_default();
            if !haystack.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }

        true
    }

    pub fn apply(&self, schema: &EntitySchema, items: &[Entity]) -> Vec<Entity> {
        items
            .iter()
            .filter(|entity| self.matches(schema, entity))
            .cloned()
            .collect()
    }
}

/// Вариант для мультиселекта связанных записей
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOption {
    pub id: EntityId,
    pub label: String,
    pub selected: bool,
}

/// Варианты выбора из коллекции: фильтр по поиску, отметка выбранных
///
/// `id` варианта совпадает с тем, что хранится в ссылках (`Entity::ref_id`).
/// Выбранные записи остаются в списке даже если не проходят поиск;
/// записи без ключа ссылки выбрать нельзя.
pub fn picker_options(
    schema: &EntitySchema,
    items: &[Entity],
    search: &str,
    selected: &[EntityId],
) -> Vec<PickerOption> {
    let filter = FilterState::default().with_search(search);
    items
        .iter()
        .filter_map(|entity| {
            let id = entity.ref_id(schema)?;
            let is_selected = selected.contains(&id);
            if !is_selected && !filter.matches(schema, entity) {
                return None;
            }
            Some(PickerOption {
                label: entity
                    .text(schema.display_field)
                    .unwrap_or(entity.id.as_str())
                    .to_string(),
                id,
                selected: is_selected,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Draft;
    use contracts::domain::common::Fields;
    use contracts::domain::{a001_subcategory, a002_page, a005_product};
    use serde_json::json;

    fn subcategory(id: &str, name: &str, category: &str) -> Entity {
        let fields: Fields = [("name", name), ("category", category)].into_iter().collect();
        Entity::new(id, fields)
    }

    fn collection() -> Vec<Entity> {
        vec![
            subcategory("1", "Labrador Retriever", "Shop by Breed"),
            subcategory("2", "Arthritis", "Shop by Disease"),
            subcategory("3", "Golden Retriever", "Shop by Breed"),
        ]
    }

    fn ids(items: &[Entity]) -> Vec<&str> {
        items.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let items = collection();
        let filter = FilterState::default().with_search("   ");
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&a001_subcategory::SCHEMA, &items), items);
    }

    #[test]
    fn test_search_and_category_are_anded() {
        let items = collection();
        let schema = &a001_subcategory::SCHEMA;

        let by_search = FilterState::default().with_search("RETRIEVER");
        assert_eq!(ids(&by_search.apply(schema, &items)), vec!["1", "3"]);

        let both = by_search.clone().with_category("Shop by Disease");
        assert!(both.apply(schema, &items).is_empty());

        let by_category = FilterState::default().with_category("Shop by Disease");
        assert_eq!(ids(&by_category.apply(schema, &items)), vec!["2"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let items = collection();
        let schema = &a001_subcategory::SCHEMA;
        let filter = FilterState::default().with_search("golden");
        let once = filter.apply(schema, &items);
        assert_eq!(filter.apply(schema, &once), once);
    }

    #[test]
    fn test_category_on_reference_field() {
        let mut fields = Fields::new();
        fields.set("title", "Beagle care");
        fields.set("subcategory", FieldValue::Ref("sub-9".into()));
        let page = Entity::new("p1", fields);

        let filter = FilterState::default().with_category("sub-9");
        assert!(filter.matches(&a002_page::SCHEMA, &page));
        assert!(!FilterState::default()
            .with_category("sub-1")
            .matches(&a002_page::SCHEMA, &page));
    }

    #[test]
    fn test_picker_keeps_selected_items() {
        let items = collection();
        let options = picker_options(
            &a001_subcategory::SCHEMA,
            &items,
            "golden",
            &["2".into()],
        );
        let labels: Vec<(&str, bool)> = options
            .iter()
            .map(|o| (o.label.as_str(), o.selected))
            .collect();
        assert_eq!(labels, vec![("Arthritis", true), ("Golden Retriever", false)]);
    }

    #[test]
    fn test_picker_links_products_by_mongo_id() {
        let page = Entity::from_json(
            &json!({
                "_id": "page-1",
                "title": "Labrador Retriever",
                "linkedProducts": [{ "_id": "65f0aa", "shopifyId": 8123, "title": "Puppy Chow" }]
            }),
            &a002_page::SCHEMA,
        )
        .unwrap();
        let products = vec![
            Entity::from_json(
                &json!({ "_id": "65f0aa", "shopifyId": 8123, "title": "Puppy Chow" }),
                &a005_product::SCHEMA,
            )
            .unwrap(),
            Entity::from_json(
                &json!({ "_id": "65f0bb", "shopifyId": 8124, "title": "Chew Rope" }),
                &a005_product::SCHEMA,
            )
            .unwrap(),
        ];

        let mut draft = Draft::from_entity(&a002_page::SCHEMA, &page);
        let options = picker_options(
            &a005_product::SCHEMA,
            &products,
            "",
            draft.refs("linkedProducts"),
        );
        let picked: Vec<(&str, bool)> = options
            .iter()
            .map(|o| (o.id.as_str(), o.selected))
            .collect();
        assert_eq!(picked, vec![("65f0aa", true), ("65f0bb", false)]);

        assert!(draft.toggle_ref("linkedProducts", options[1].id.clone()));
        assert!(!draft.toggle_ref("linkedProducts", options[0].id.clone()));
        assert_eq!(draft.refs("linkedProducts"), &[EntityId::from("65f0bb")]);
    }
}
