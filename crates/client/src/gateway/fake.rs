//! In-memory collection gateway
//!
//! Behaves like the REST API for one collection: assigns ids, keeps
//! positions of orderable collections, filters lists by the same query
//! parameters. Tests can queue failures and hold a call open until they
//! release it.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use contracts::domain::a005_product::SyncResponse;
use contracts::domain::common::{Entity, EntityId, EntitySchema, FieldValue, Fields, FileRef};
use contracts::shared::api_error::FieldError;
use contracts::shared::reorder::ReorderRequest;
use tokio::sync::Notify;
use uuid::Uuid;

use super::{CatalogSyncGateway, CollectionGateway, GatewayError, GatewayResult, ListQuery};

/// Вид запроса к шлюзу
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
    Reorder,
    Sync,
}

#[derive(Default)]
struct Controls {
    calls: HashMap<Operation, usize>,
    failures: HashMap<Operation, VecDeque<GatewayError>>,
    holds: HashMap<Operation, Arc<Notify>>,
    last_reorder: Option<Vec<EntityId>>,
}

pub struct InMemoryGateway {
    schema: &'static EntitySchema,
    items: tokio::sync::Mutex<Vec<Entity>>,
    controls: Mutex<Controls>,
}

impl InMemoryGateway {
    pub fn new(schema: &'static EntitySchema) -> Self {
        Self {
            schema,
            items: tokio::sync::Mutex::new(Vec::new()),
            controls: Mutex::new(Controls::default()),
        }
    }

    /// Заполнить коллекцию; для упорядочиваемых коллекций позиции нумеруются по порядку
    pub fn with_items(self, items: Vec<Entity>) -> Self {
        let orderable = self.schema.orderable;
        let items = items
            .into_iter()
            .enumerate()
            .map(|(index, mut item)| {
                if orderable && item.order.is_none() {
                    item.order = Some(index as i64);
                }
                item
            })
            .collect();
        Self {
            items: tokio::sync::Mutex::new(items),
            ..self
        }
    }

    /// Снимок хранимых записей (в порядке хранения)
    pub async fn items(&self) -> Vec<Entity> {
        self.items.lock().await.clone()
    }

    pub async fn ids(&self) -> Vec<EntityId> {
        self.items.lock().await.iter().map(|e| e.id.clone()).collect()
    }

    /// Следующий вызов `op` завершится ошибкой `error`
    pub fn fail_next(&self, op: Operation, error: GatewayError) {
        self.controls()
            .failures
            .entry(op)
            .or_default()
            .push_back(error);
    }

    /// Задержать следующий вызов `op` до `notify_one()` на возвращённом гейте
    pub fn hold_next(&self, op: Operation) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.controls().holds.insert(op, Arc::clone(&gate));
        gate
    }

    /// Сколько раз вызывалась операция
    pub fn calls(&self, op: Operation) -> usize {
        self.controls().calls.get(&op).copied().unwrap_or(0)
    }

    /// Последний принятый или отклонённый порядок из `reorder`
    pub fn last_reorder(&self) -> Option<Vec<EntityId>> {
        self.controls().last_reorder.clone()
    }

    fn controls(&self) -> MutexGuard<'_, Controls> {
        self.controls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Учесть вызов, дождаться гейта, выдать запланированную ошибку
    async fn enter(&self, op: Operation) -> GatewayResult<()> {
        let hold = {
            let mut controls = self.controls();
            *controls.calls.entry(op).or_insert(0) += 1;
            controls.holds.remove(&op)
        };

        if let Some(gate) = hold {
            tracing::debug!("{:?} on {} held", op, self.schema.kind);
            gate.notified().await;
        }

        let failure = self
            .controls()
            .failures
            .get_mut(&op)
            .and_then(VecDeque::pop_front);
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn not_found(&self, id: &EntityId) -> GatewayError {
        GatewayError::NotFound(format!("{} {} not found", self.schema.element_name, id))
    }

    /// Проверка обязательных полей, как это делает сервер
    fn check_required(&self, fields: &Fields) -> GatewayResult<()> {
        let errors: Vec<FieldError> = self
            .schema
            .writable_fields()
            .filter_map(|def| {
                def.validate(fields.get(def.name))
                    .err()
                    .map(|message| FieldError {
                        field: def.name.to_string(),
                        message,
                    })
            })
            .collect();

        match errors.first() {
            None => Ok(()),
            Some(first) => Err(GatewayError::Validation {
                message: first.message.clone(),
                field_errors: errors,
            }),
        }
    }

    fn matches(&self, entity: &Entity, query: &ListQuery) -> bool {
        if let (Some(_), Some(category)) = (self.schema.category_param, &query.category) {
            let value = self
                .schema
                .category_field
                .and_then(|name| entity.field(name))
                .and_then(FieldValue::as_key);
            if value != Some(category.as_str()) {
                return false;
            }
        }
        if let (Some(_), Some(search)) = (self.schema.search_param, &query.search) {
            let needle = search.trim().to_lowercase();
            let title = entity
                .text(self.schema.display_field)
                .unwrap_or_default()
                .to_lowercase();
            if !title.contains(&needle) {
                return false;
            }
        }
        true
    }
}

/// Сохранённое значение: новые файлы получают серверный путь
fn stored_value(value: &FieldValue) -> FieldValue {
    match value {
        FieldValue::File(FileRef::Upload(attachment)) => {
            FieldValue::File(FileRef::Remote(format!("uploads/{}", attachment.file_name)))
        }
        other => other.clone(),
    }
}

#[async_trait]
impl CollectionGateway for InMemoryGateway {
    fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    async fn list(&self, query: &ListQuery) -> GatewayResult<Vec<Entity>> {
        self.enter(Operation::List).await?;
        let items = self.items.lock().await;
        let mut result: Vec<Entity> = items
            .iter()
            .filter(|e| self.matches(e, query))
            .cloned()
            .collect();
        if self.schema.orderable {
            result.sort_by_key(|e| e.order.unwrap_or(i64::MAX));
        }
        Ok(result)
    }

    async fn get(&self, id: &EntityId) -> GatewayResult<Entity> {
        self.enter(Operation::Get).await?;
        let items = self.items.lock().await;
        items
            .iter()
            .find(|e| &e.id == id)
            .cloned()
            .ok_or_else(|| self.not_found(id))
    }

    async fn create(&self, fields: &Fields) -> GatewayResult<Entity> {
        self.enter(Operation::Create).await?;
        self.check_required(fields)?;

        let stored: Fields = self
            .schema
            .fields
            .iter()
            .map(|def| {
                let value = fields.get(def.name).map(stored_value).unwrap_or(FieldValue::Null);
                (def.name, value)
            })
            .collect();

        let mut items = self.items.lock().await;
        let mut entity = Entity::new(Uuid::new_v4().to_string(), stored);
        if self.schema.orderable {
            entity = entity.with_order(items.len() as i64);
        }
        tracing::debug!("created {} {}", self.schema.kind, entity.id);
        items.push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: &EntityId, fields: &Fields) -> GatewayResult<Entity> {
        self.enter(Operation::Update).await?;

        let mut items = self.items.lock().await;
        let entity = items
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| self.not_found(id))?;

        let mut merged = entity.fields.clone();
        for (name, value) in fields.iter() {
            let writable = self
                .schema
                .field(name)
                .map(|def| def.kind.is_writable())
                .unwrap_or(false);
            match value {
                // Не отправленные части не меняют запись
                FieldValue::Null | FieldValue::File(FileRef::Remote(_)) => {}
                _ if writable => merged.set(name, stored_value(value)),
                _ => {}
            }
        }
        self.check_required(&merged)?;

        entity.fields = merged;
        Ok(entity.clone())
    }

    async fn delete(&self, id: &EntityId) -> GatewayResult<()> {
        self.enter(Operation::Delete).await?;
        let mut items = self.items.lock().await;
        let index = items
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| self.not_found(id))?;
        items.remove(index);
        Ok(())
    }

    async fn reorder(&self, ordered_ids: &[EntityId]) -> GatewayResult<()> {
        self.controls().last_reorder = Some(ordered_ids.to_vec());
        self.enter(Operation::Reorder).await?;

        if !self.schema.orderable {
            return Err(GatewayError::validation(format!(
                "{} cannot be reordered",
                self.schema.list_name
            )));
        }

        let mut items = self.items.lock().await;
        let stored: Vec<EntityId> = items.iter().map(|e| e.id.clone()).collect();
        if !ReorderRequest::new(ordered_ids.to_vec()).matches_set(&stored) {
            return Err(GatewayError::validation(
                "Reorder must list every item exactly once",
            ));
        }

        let mut reordered = Vec::with_capacity(items.len());
        for (position, id) in ordered_ids.iter().enumerate() {
            if let Some(index) = items.iter().position(|e| &e.id == id) {
                let mut entity = items.remove(index);
                entity.order = Some(position as i64);
                reordered.push(entity);
            }
        }
        *items = reordered;
        Ok(())
    }
}

#[async_trait]
impl CatalogSyncGateway for InMemoryGateway {
    async fn sync(&self) -> GatewayResult<SyncResponse> {
        self.enter(Operation::Sync).await?;
        let count = self.items.lock().await.len();
        Ok(SyncResponse {
            message: Some(format!("{} synced", self.schema.list_name)),
            synced: Some(count as u64),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::{a001_subcategory, a003_homepage_section};

    fn section(id: &str, title: &str) -> Entity {
        let fields: Fields = [("title", title), ("sectionType", "products")]
            .into_iter()
            .collect();
        Entity::new(id, fields)
    }

    #[tokio::test]
    async fn test_reorder_requires_exact_set() {
        let gateway = InMemoryGateway::new(&a003_homepage_section::SCHEMA)
            .with_items(vec![section("a", "A"), section("b", "B"), section("c", "C")]);

        let partial = gateway.reorder(&["b".into(), "a".into()]).await;
        assert_eq!(partial.unwrap_err().kind(), super::super::ErrorKind::Validation);

        gateway
            .reorder(&["c".into(), "a".into(), "b".into()])
            .await
            .unwrap();
        let items = gateway.items().await;
        let order: Vec<(&str, Option<i64>)> =
            items.iter().map(|e| (e.id.as_str(), e.order)).collect();
        assert_eq!(order, vec![("c", Some(0)), ("a", Some(1)), ("b", Some(2))]);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_required_fields() {
        let gateway = InMemoryGateway::new(&a001_subcategory::SCHEMA);
        let err = gateway
            .create(&[("name", "Beagle")].into_iter().collect())
            .await
            .unwrap_err();

        match err {
            GatewayError::Validation { field_errors, .. } => {
                assert_eq!(field_errors[0].field, "category");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(gateway.calls(Operation::Create), 1);
        assert!(gateway.items().await.is_empty());
    }

    #[tokio::test]
    async fn test_queued_failure_is_used_once() {
        let gateway = InMemoryGateway::new(&a001_subcategory::SCHEMA);
        gateway.fail_next(Operation::List, GatewayError::Network("offline".into()));

        assert!(gateway.list(&ListQuery::default()).await.is_err());
        assert!(gateway.list(&ListQuery::default()).await.is_ok());
        assert_eq!(gateway.calls(Operation::List), 2);
    }

    #[tokio::test]
    async fn test_delete_of_missing_id_is_not_found() {
        let gateway = InMemoryGateway::new(&a003_homepage_section::SCHEMA)
            .with_items(vec![section("a", "A")]);
        gateway.delete(&"a".into()).await.unwrap();
        let err = gateway.delete(&"a".into()).await.unwrap_err();
        assert_eq!(err.kind(), super::super::ErrorKind::NotFound);
    }
}
