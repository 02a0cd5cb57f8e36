use crate::domain::common::{Attachment, EntitySchema, Fields};
use crate::shared::metadata::{FieldDef, FieldKind, ValidationRules};

/// Разделы витрины, к которым относится подкатегория
pub const CATEGORIES: &[&str] = &["Shop by Breed", "Shop by Disease"];

pub const FIELDS: &[FieldDef] = &[
    FieldDef::new("name", "Name", FieldKind::Text)
        .with_validation(ValidationRules::required().with_max_length(120)),
    FieldDef::new("category", "Category", FieldKind::Choice(CATEGORIES)).required(),
    FieldDef::new("bannerImage", "Banner image", FieldKind::File),
    FieldDef::new("avatarImage", "Avatar image", FieldKind::File),
];

/// Подкатегория (порода или заболевание)
pub static SCHEMA: EntitySchema = EntitySchema {
    kind: "subcategory",
    element_name: "Subcategory",
    list_name: "Subcategories",
    path: "/subcategories",
    list_path: None,
    id_key: "_id",
    ref_key: None,
    fields: FIELDS,
    display_field: "name",
    category_field: Some("category"),
    category_param: None,
    search_param: None,
    orderable: false,
    read_only: false,
};

/// Данные формы подкатегории
#[derive(Debug, Clone, Default)]
pub struct SubcategoryDto {
    pub name: String,
    pub category: String,
    pub banner_image: Option<Attachment>,
    pub avatar_image: Option<Attachment>,
}

impl SubcategoryDto {
    /// Поля для отправки; изображения только если выбраны новые файлы
    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.set("name", self.name);
        fields.set("category", self.category);
        if let Some(banner) = self.banner_image {
            fields.set("bannerImage", banner);
        }
        if let Some(avatar) = self.avatar_image {
            fields.set("avatarImage", avatar);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::common::FieldValue;

    #[test]
    fn test_dto_skips_unchanged_images() {
        let fields = SubcategoryDto {
            name: "Labrador".into(),
            category: "Shop by Breed".into(),
            avatar_image: Some(Attachment::new("lab.png", "image/png", vec![0])),
            ..Default::default()
        }
        .into_fields();

        assert_eq!(
            fields.names().collect::<Vec<_>>(),
            vec!["name", "category", "avatarImage"]
        );
        assert!(matches!(fields.get("avatarImage"), Some(FieldValue::File(_))));
    }
}
