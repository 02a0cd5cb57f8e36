use crate::domain::common::{Attachment, EntityId, EntitySchema, FieldValue, Fields};
use crate::shared::metadata::{FieldDef, FieldKind};

pub const FIELDS: &[FieldDef] = &[
    FieldDef::new("title", "Title", FieldKind::Text).required(),
    FieldDef::new("banner", "Banner", FieldKind::File),
    FieldDef::new("subcategories", "Subcategories", FieldKind::Refs),
    FieldDef::new("products", "Products", FieldKind::Refs),
];

/// Промо-блок с подборкой подкатегорий и товаров
pub static SCHEMA: EntitySchema = EntitySchema {
    kind: "offer_section",
    element_name: "Offer section",
    list_name: "Offer sections",
    path: "/offer-sections",
    list_path: None,
    id_key: "_id",
    ref_key: None,
    fields: FIELDS,
    display_field: "title",
    category_field: None,
    category_param: None,
    search_param: None,
    orderable: false,
    read_only: false,
};

/// Данные формы промо-блока
#[derive(Debug, Clone, Default)]
pub struct OfferSectionDto {
    pub title: String,
    pub banner: Option<Attachment>,
    pub subcategories: Vec<EntityId>,
    pub products: Vec<EntityId>,
}

impl OfferSectionDto {
    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.set("title", self.title);
        if let Some(banner) = self.banner {
            fields.set("banner", banner);
        }
        fields.set("subcategories", FieldValue::Refs(self.subcategories));
        fields.set("products", FieldValue::Refs(self.products));
        fields
    }
}
