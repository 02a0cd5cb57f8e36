use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::common::{Entity, EntityId, EntitySchema, FieldValue};
use crate::shared::metadata::{FieldDef, FieldKind};

pub const FIELDS: &[FieldDef] = &[
    FieldDef::new("title", "Title", FieldKind::Text),
    FieldDef::new("vendor", "Vendor", FieldKind::Text),
    FieldDef::new("productType", "Product type", FieldKind::Text),
    FieldDef::new("status", "Status", FieldKind::Text),
    FieldDef::new("variants", "Variants", FieldKind::Json),
    FieldDef::new("images", "Images", FieldKind::Json),
    FieldDef::new("createdAt", "Created", FieldKind::Text),
    FieldDef::new("updatedAt", "Updated", FieldKind::Text),
];

/// Товар, синхронизированный из Shopify (только чтение)
///
/// Поиск выполняется на сервере через `?search=`.
pub static SCHEMA: EntitySchema = EntitySchema {
    kind: "product",
    element_name: "Product",
    list_name: "Products",
    path: "/products",
    list_path: None,
    id_key: "shopifyId",
    ref_key: Some("_id"),
    fields: FIELDS,
    display_field: "title",
    category_field: Some("productType"),
    category_param: None,
    search_param: Some("search"),
    orderable: false,
    read_only: true,
};

/// Ответ `POST /products/sync`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "count", alias = "syncedCount")]
    pub synced: Option<u64>,
}

/// Строка таблицы товаров: данные первого варианта и первое изображение
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub id: EntityId,
    pub title: String,
    pub sku: Option<String>,
    pub price: Option<String>,
    pub inventory_quantity: Option<i64>,
    pub image_src: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Entity> for ProductRow {
    fn from(product: &Entity) -> Self {
        let first_variant = json_field(product, "variants")
            .and_then(Value::as_array)
            .and_then(|v| v.first());
        let first_image = json_field(product, "images")
            .and_then(Value::as_array)
            .and_then(|v| v.first());

        Self {
            id: product.id.clone(),
            title: product.text("title").unwrap_or_default().to_string(),
            sku: first_variant
                .and_then(|v| v.get("sku"))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            price: first_variant.and_then(|v| v.get("price")).and_then(|p| match p {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }),
            inventory_quantity: first_variant
                .and_then(|v| v.get("inventory_quantity"))
                .and_then(Value::as_i64),
            image_src: first_image
                .and_then(|i| i.get("src"))
                .and_then(Value::as_str)
                .map(str::to_string),
            created_at: parse_timestamp(product.text("createdAt")),
            updated_at: parse_timestamp(product.text("updatedAt")),
        }
    }
}

fn json_field<'a>(entity: &'a Entity, name: &str) -> Option<&'a Value> {
    match entity.field(name)? {
        FieldValue::Json(value) => Some(value),
        _ => None,
    }
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value?)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
