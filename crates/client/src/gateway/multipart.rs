//! Multipart encoding of draft fields
//!
//! Text-like values become text parts, new files become binary parts and
//! every id of a `Refs` field is its own part under the shared field name.
//! Unchanged remote files and read-only fields are not sent.

use contracts::domain::common::{Attachment, EntitySchema, FieldValue, Fields, FileRef};
use reqwest::multipart::{Form, Part};

use super::GatewayError;

#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, attachment: Attachment },
}

impl FormPart {
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }
}

/// Список частей формы в порядке полей
pub fn plan_parts(schema: &EntitySchema, fields: &Fields) -> Vec<FormPart> {
    let mut parts = Vec::new();

    for (name, value) in fields.iter() {
        let writable = schema
            .field(name)
            .map(|def| def.kind.is_writable())
            .unwrap_or(false);
        if !writable {
            continue;
        }

        let text = |value: &str| FormPart::Text {
            name: name.to_string(),
            value: value.to_string(),
        };

        match value {
            FieldValue::Text(s) => parts.push(text(s)),
            FieldValue::Ref(id) => parts.push(text(id.as_str())),
            FieldValue::Refs(ids) => parts.extend(ids.iter().map(|id| text(id.as_str()))),
            FieldValue::File(FileRef::Upload(attachment)) => parts.push(FormPart::File {
                name: name.to_string(),
                attachment: attachment.clone(),
            }),
            FieldValue::File(FileRef::Remote(_)) | FieldValue::Json(_) | FieldValue::Null => {}
        }
    }

    parts
}

/// Собрать reqwest-форму из плана
pub fn build_form(parts: Vec<FormPart>) -> Result<Form, GatewayError> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File { name, attachment } => {
                let file_part = Part::bytes(attachment.bytes)
                    .file_name(attachment.file_name)
                    .mime_str(&attachment.content_type)
                    .map_err(|e| {
                        GatewayError::validation(format!(
                            "Invalid content type `{}`: {}",
                            attachment.content_type, e
                        ))
                    })?;
                form.part(name, file_part)
            }
        };
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a002_page::{self, PageDto};
    use contracts::domain::a004_offer_section::{self, OfferSectionDto};
    use contracts::domain::common::EntityId;
    use serde_json::json;

    #[test]
    fn test_refs_become_repeated_parts() {
        let fields = PageDto {
            title: "Persian Cat".into(),
            content: "Long-haired breed".into(),
            subcategory: Some(EntityId::from("sub-2")),
            linked_products: vec!["p1".into(), "p2".into()],
            banner_image: Some(Attachment::new("persian.jpg", "image/jpeg", vec![1, 2, 3])),
            avatar_image: None,
        }
        .into_fields();

        let parts = plan_parts(&a002_page::SCHEMA, &fields);
        let names: Vec<&str> = parts.iter().map(FormPart::name).collect();
        assert_eq!(
            names,
            vec!["title", "content", "subcategory", "linkedProducts", "linkedProducts", "bannerImage"]
        );
        assert_eq!(
            parts[4],
            FormPart::Text {
                name: "linkedProducts".into(),
                value: "p2".into()
            }
        );
    }

    #[test]
    fn test_remote_files_and_unknown_fields_are_skipped() {
        let mut fields = Fields::new();
        fields.set("title", "Kept");
        fields.set("bannerImage", FieldValue::File(FileRef::Remote("uploads/a.png".into())));
        fields.set("avatarImage", FieldValue::Null);
        fields.set("__v", FieldValue::Json(json!(0)));

        let parts = plan_parts(&a002_page::SCHEMA, &fields);
        assert_eq!(
            parts,
            vec![FormPart::Text {
                name: "title".into(),
                value: "Kept".into()
            }]
        );
    }

    #[test]
    fn test_invalid_mime_is_rejected() {
        let parts = vec![FormPart::File {
            name: "banner".into(),
            attachment: Attachment::new("x.bin", "not a mime", vec![]),
        }];
        assert!(build_form(parts).is_err());
    }

    #[test]
    fn test_empty_refs_send_no_parts() {
        let fields = OfferSectionDto {
            title: "Spring sale".into(),
            products: vec!["p9".into()],
            ..Default::default()
        }
        .into_fields();

        let parts = plan_parts(&a004_offer_section::SCHEMA, &fields);
        let names: Vec<&str> = parts.iter().map(FormPart::name).collect();
        assert_eq!(names, vec!["title", "products"]);
    }
}
