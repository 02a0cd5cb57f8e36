pub mod common;

pub mod a001_subcategory;
pub mod a002_page;
pub mod a003_homepage_section;
pub mod a004_offer_section;
pub mod a005_product;

use common::EntitySchema;

/// Все коллекции каталога в порядке пунктов меню
pub fn all_schemas() -> [&'static EntitySchema; 5] {
    [
        &a001_subcategory::SCHEMA,
        &a002_page::SCHEMA,
        &a003_homepage_section::SCHEMA,
        &a004_offer_section::SCHEMA,
        &a005_product::SCHEMA,
    ]
}

/// Найти схему по имени коллекции (`subcategory`, `page`, ...)
pub fn schema_by_kind(kind: &str) -> Option<&'static EntitySchema> {
    all_schemas().into_iter().find(|s| s.kind == kind)
}
