//! Remote collection gateway
//!
//! Implemented by:
//! - `HttpGateway` - REST + multipart client for production
//! - `InMemoryGateway` - in-memory store for tests and demos
//!
//! The controller only sees the trait, so both run through the same code path.

pub mod error;
pub mod fake;
pub mod http;
pub mod multipart;

use async_trait::async_trait;
use contracts::domain::a005_product::SyncResponse;
use contracts::domain::common::{Entity, EntityId, EntitySchema, Fields};

pub use error::{ErrorKind, GatewayError, GatewayResult};
pub use fake::{InMemoryGateway, Operation};
pub use http::HttpGateway;

/// Параметры серверной выборки списка
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl ListQuery {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = (!search.trim().is_empty()).then_some(search);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = (!category.trim().is_empty()).then_some(category);
        self
    }

    /// Query-параметры, которые поддерживает данная коллекция
    pub fn to_pairs(&self, schema: &EntitySchema) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let (Some(param), Some(search)) = (schema.search_param, &self.search) {
            pairs.push((param, search.clone()));
        }
        if let (Some(param), Some(category)) = (schema.category_param, &self.category) {
            pairs.push((param, category.clone()));
        }
        pairs
    }
}

/// Операции над удалённой коллекцией
#[async_trait]
pub trait CollectionGateway: Send + Sync {
    /// Схема коллекции, которую обслуживает шлюз
    fn schema(&self) -> &'static EntitySchema;

    /// Список записей; пустой список тоже успех
    async fn list(&self, query: &ListQuery) -> GatewayResult<Vec<Entity>>;

    async fn get(&self, id: &EntityId) -> GatewayResult<Entity>;

    /// Создать запись; файлы передаются multipart-частями
    async fn create(&self, fields: &Fields) -> GatewayResult<Entity>;

    async fn update(&self, id: &EntityId, fields: &Fields) -> GatewayResult<Entity>;

    /// Удалить запись; для уже удалённого ID возвращает `NotFound`
    async fn delete(&self, id: &EntityId) -> GatewayResult<()>;

    /// Заменить порядок всей коллекции; набор ID должен совпадать точно
    async fn reorder(&self, ordered_ids: &[EntityId]) -> GatewayResult<()>;
}

/// Повторная синхронизация каталога товаров с Shopify
#[async_trait]
pub trait CatalogSyncGateway: Send + Sync {
    async fn sync(&self) -> GatewayResult<SyncResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::{a001_subcategory, a002_page, a005_product};

    #[test]
    fn test_pairs_only_for_supported_params() {
        let query = ListQuery::default()
            .with_search("cat")
            .with_category("sub-1");

        assert_eq!(
            query.to_pairs(&a005_product::SCHEMA),
            vec![("search", "cat".to_string())]
        );
        assert_eq!(
            query.to_pairs(&a002_page::SCHEMA),
            vec![("subcategory", "sub-1".to_string())]
        );
        assert!(query.to_pairs(&a001_subcategory::SCHEMA).is_empty());
    }

    #[test]
    fn test_blank_values_are_dropped() {
        let query = ListQuery::default().with_search("  ").with_category("");
        assert_eq!(query, ListQuery::default());
    }
}
