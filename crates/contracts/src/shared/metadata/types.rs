//! Field descriptors used by collection schemas
//!
//! All types use 'static lifetimes so schemas can be compile-time constants.

use super::field_type::FieldKind;
use super::validation::ValidationRules;
use crate::domain::common::FieldValue;

/// Описание поля коллекции
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Key on the wire (JSON property and multipart part name)
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub validation: ValidationRules,
    /// Initial text value for a new draft
    pub default: Option<&'static str>,
}

impl FieldDef {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            validation: ValidationRules::none(),
            default: None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.validation = ValidationRules::required();
        self
    }

    pub const fn with_validation(mut self, validation: ValidationRules) -> Self {
        self.validation = validation;
        self
    }

    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    /// Value a freshly created draft starts with, `None` for read-only fields
    pub fn initial_value(&self) -> Option<FieldValue> {
        match self.kind {
            FieldKind::Text | FieldKind::LongText | FieldKind::Choice(_) => Some(
                FieldValue::Text(self.default.unwrap_or_default().to_string()),
            ),
            FieldKind::Refs => Some(FieldValue::Refs(Vec::new())),
            FieldKind::Ref | FieldKind::File => Some(FieldValue::Null),
            FieldKind::Json => None,
        }
    }

    /// Validate a draft value against the field kind and rules
    pub fn validate(&self, value: Option<&FieldValue>) -> Result<(), String> {
        if !self.kind.is_writable() {
            return Ok(());
        }

        let value = match value {
            None | Some(FieldValue::Null) => {
                return if self.validation.required {
                    Err(self.validation.missing_message(self.label))
                } else {
                    Ok(())
                };
            }
            Some(v) => v,
        };

        match (self.kind, value) {
            (FieldKind::Text | FieldKind::LongText, FieldValue::Text(text)) => {
                self.validation.validate_string(text, self.label)
            }
            (FieldKind::Choice(choices), FieldValue::Text(text)) => {
                self.validation.validate_string(text, self.label)?;
                if !text.is_empty() && !choices.contains(&text.as_str()) {
                    return Err(format!(
                        "{} must be one of: {}",
                        self.label,
                        choices.join(", ")
                    ));
                }
                Ok(())
            }
            (FieldKind::Ref, FieldValue::Ref(id)) => {
                if self.validation.required && id.is_empty() {
                    return Err(self.validation.missing_message(self.label));
                }
                Ok(())
            }
            (FieldKind::Refs, FieldValue::Refs(ids)) => {
                if self.validation.required && ids.is_empty() {
                    return Err(self.validation.missing_message(self.label));
                }
                Ok(())
            }
            (FieldKind::File, FieldValue::File(_)) => Ok(()),
            (kind, _) => Err(format!(
                "{} expects a {} value",
                self.label,
                kind.as_str()
            )),
        }
    }
}
