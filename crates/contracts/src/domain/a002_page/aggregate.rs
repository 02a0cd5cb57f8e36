use crate::domain::common::{Attachment, EntityId, EntitySchema, FieldValue, Fields};
use crate::shared::metadata::{FieldDef, FieldKind};

pub const FIELDS: &[FieldDef] = &[
    FieldDef::new("title", "Title", FieldKind::Text).required(),
    FieldDef::new("content", "Content", FieldKind::LongText).required(),
    FieldDef::new("subcategory", "Subcategory", FieldKind::Ref).required(),
    FieldDef::new("linkedProducts", "Linked products", FieldKind::Refs),
    FieldDef::new("bannerImage", "Banner image", FieldKind::File),
    FieldDef::new("avatarImage", "Avatar image", FieldKind::File),
];

/// Информационная страница (порода / заболевание)
///
/// Список в админке берётся из `/pages/admin`, с фильтром `?subcategory=`.
pub static SCHEMA: EntitySchema = EntitySchema {
    kind: "page",
    element_name: "Page",
    list_name: "Pages",
    path: "/pages",
    list_path: Some("/pages/admin"),
    id_key: "_id",
    ref_key: None,
    fields: FIELDS,
    display_field: "title",
    category_field: Some("subcategory"),
    category_param: Some("subcategory"),
    search_param: None,
    orderable: false,
    read_only: false,
};

/// Данные формы страницы
#[derive(Debug, Clone, Default)]
pub struct PageDto {
    pub title: String,
    pub content: String,
    pub subcategory: Option<EntityId>,
    pub linked_products: Vec<EntityId>,
    pub banner_image: Option<Attachment>,
    pub avatar_image: Option<Attachment>,
}

impl PageDto {
    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.set("title", self.title);
        fields.set("content", self.content);
        fields.set(
            "subcategory",
            self.subcategory.map(FieldValue::Ref).unwrap_or(FieldValue::Null),
        );
        fields.set("linkedProducts", FieldValue::Refs(self.linked_products));
        if let Some(banner) = self.banner_image {
            fields.set("bannerImage", banner);
        }
        if let Some(avatar) = self.avatar_image {
            fields.set("avatarImage", avatar);
        }
        fields
    }
}
