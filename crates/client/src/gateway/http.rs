use std::sync::Arc;

use async_trait::async_trait;
use contracts::domain::a005_product::SyncResponse;
use contracts::domain::common::{Entity, EntityId, EntitySchema, Fields};
use contracts::shared::reorder::ReorderRequest;
use reqwest::{RequestBuilder, Response};
use serde_json::Value;

use super::multipart::{build_form, plan_parts};
use super::{CatalogSyncGateway, CollectionGateway, GatewayError, GatewayResult, ListQuery};
use crate::shared::api_utils::{item_url, with_query};
use crate::system::auth::Session;

/// HTTP-шлюз коллекции поверх REST API админки
///
/// Токен сессии прикладывается к каждому запросу; таймаут задаётся
/// в `reqwest::Client` сессии, поэтому зависший запрос завершается
/// сетевой ошибкой.
pub struct HttpGateway {
    session: Arc<Session>,
    schema: &'static EntitySchema,
}

impl HttpGateway {
    pub fn new(session: Arc<Session>, schema: &'static EntitySchema) -> Self {
        Self { session, schema }
    }

    fn collection_url(&self) -> String {
        self.session.url(self.schema.path)
    }

    fn item_url(&self, id: &EntityId) -> String {
        item_url(&self.session.api().base_url, self.schema.path, id.as_str())
    }

    async fn send(&self, request: RequestBuilder) -> GatewayResult<Response> {
        let response = self.session.authorize(request)?.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = GatewayError::from_status(status.as_u16(), &body);
        tracing::warn!("{} request failed: {}", self.schema.kind, error);
        Err(error)
    }

    async fn read_entity(&self, response: Response) -> GatewayResult<Entity> {
        let value: Value = response.json().await?;
        parse_entity(&value, self.schema)
    }
}

/// Разобрать запись; некоторые ответы завёрнуты в `{ data: {...} }`
fn parse_entity(value: &Value, schema: &EntitySchema) -> GatewayResult<Entity> {
    let object = match value.get(schema.id_key) {
        Some(_) => value,
        None => value.get("data").unwrap_or(value),
    };
    Entity::from_json(object, schema).map_err(GatewayError::unexpected_shape)
}

#[async_trait]
impl CollectionGateway for HttpGateway {
    fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    async fn list(&self, query: &ListQuery) -> GatewayResult<Vec<Entity>> {
        let url = with_query(
            &self.session.url(self.schema.list_path()),
            &query.to_pairs(self.schema),
        );
        tracing::debug!("GET {}", url);

        let response = self.send(self.session.http().get(&url)).await?;
        let value: Value = response.json().await?;
        let items = value.as_array().ok_or_else(|| {
            GatewayError::unexpected_shape(format!(
                "Expected a list of {}",
                self.schema.list_name.to_lowercase()
            ))
        })?;

        items
            .iter()
            .map(|item| parse_entity(item, self.schema))
            .collect()
    }

    async fn get(&self, id: &EntityId) -> GatewayResult<Entity> {
        let url = self.item_url(id);
        tracing::debug!("GET {}", url);
        let response = self.send(self.session.http().get(&url)).await?;
        self.read_entity(response).await
    }

    async fn create(&self, fields: &Fields) -> GatewayResult<Entity> {
        let url = self.collection_url();
        let form = build_form(plan_parts(self.schema, fields))?;
        tracing::debug!("POST {} (multipart)", url);
        let response = self
            .send(self.session.http().post(&url).multipart(form))
            .await?;
        self.read_entity(response).await
    }

    async fn update(&self, id: &EntityId, fields: &Fields) -> GatewayResult<Entity> {
        let url = self.item_url(id);
        let form = build_form(plan_parts(self.schema, fields))?;
        tracing::debug!("PUT {} (multipart)", url);
        let response = self
            .send(self.session.http().put(&url).multipart(form))
            .await?;
        self.read_entity(response).await
    }

    async fn delete(&self, id: &EntityId) -> GatewayResult<()> {
        let url = self.item_url(id);
        tracing::debug!("DELETE {}", url);
        self.send(self.session.http().delete(&url)).await?;
        Ok(())
    }

    async fn reorder(&self, ordered_ids: &[EntityId]) -> GatewayResult<()> {
        let url = self.session.url(&self.schema.reorder_path());
        let body = ReorderRequest::new(ordered_ids.to_vec());
        tracing::debug!("PUT {} ({} ids)", url, ordered_ids.len());
        self.send(self.session.http().put(&url).json(&body)).await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogSyncGateway for HttpGateway {
    async fn sync(&self) -> GatewayResult<SyncResponse> {
        let url = format!("{}/sync", self.collection_url());
        tracing::debug!("POST {}", url);
        let response = self.send(self.session.http().post(&url)).await?;
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(SyncResponse::default());
        }
        serde_json::from_str(&body).map_err(|e| {
            GatewayError::unexpected_shape(format!("Failed to parse sync response: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_subcategory;
    use serde_json::json;

    #[test]
    fn test_parse_entity_unwraps_data_envelope() {
        let wrapped = json!({ "message": "Created", "data": { "_id": "s1", "name": "Beagle" } });
        let entity = parse_entity(&wrapped, &a001_subcategory::SCHEMA).unwrap();
        assert_eq!(entity.id, EntityId::from("s1"));
        assert_eq!(entity.text("name"), Some("Beagle"));
    }

    #[test]
    fn test_parse_entity_without_id_is_server_error() {
        let err = parse_entity(&json!({ "message": "ok" }), &a001_subcategory::SCHEMA).unwrap_err();
        assert_eq!(err.kind(), super::super::ErrorKind::Server);
    }
}
