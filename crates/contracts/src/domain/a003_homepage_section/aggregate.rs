use crate::domain::common::{Attachment, EntityId, EntitySchema, FieldValue, Fields};
use crate::shared::metadata::{FieldDef, FieldKind};

/// Типы блоков главной страницы
pub const SECTION_TYPES: &[&str] = &["banner", "products", "subcategories", "pages"];

pub const FIELDS: &[FieldDef] = &[
    FieldDef::new("title", "Title", FieldKind::Text).required(),
    FieldDef::new("sectionType", "Section type", FieldKind::Choice(SECTION_TYPES))
        .required()
        .with_default("products"),
    FieldDef::new("banner", "Banner", FieldKind::File),
    FieldDef::new("subcategories", "Subcategories", FieldKind::Refs),
    FieldDef::new("products", "Products", FieldKind::Refs),
];

/// Блок главной страницы; порядок блоков задаётся перетаскиванием
pub static SCHEMA: EntitySchema = EntitySchema {
    kind: "homepage_section",
    element_name: "Homepage section",
    list_name: "Homepage sections",
    path: "/homepage-sections",
    list_path: None,
    id_key: "_id",
    ref_key: None,
    fields: FIELDS,
    display_field: "title",
    category_field: Some("sectionType"),
    category_param: None,
    search_param: None,
    orderable: true,
    read_only: false,
};

/// Данные формы блока главной страницы
#[derive(Debug, Clone)]
pub struct HomepageSectionDto {
    pub title: String,
    pub section_type: String,
    pub banner: Option<Attachment>,
    pub subcategories: Vec<EntityId>,
    pub products: Vec<EntityId>,
}

impl Default for HomepageSectionDto {
    fn default() -> Self {
        Self {
            title: String::new(),
            section_type: "products".to_string(),
            banner: None,
            subcategories: Vec::new(),
            products: Vec::new(),
        }
    }
}

impl HomepageSectionDto {
    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.set("title", self.title);
        fields.set("sectionType", self.section_type);
        if let Some(banner) = self.banner {
            fields.set("banner", banner);
        }
        fields.set("subcategories", FieldValue::Refs(self.subcategories));
        fields.set("products", FieldValue::Refs(self.products));
        fields
    }
}
