//! Field kind enumeration for collection schemas

/// How a field is stored on the entity and transmitted in a multipart form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    #[default]
    Text,
    LongText,        // free text, rendered as a textarea
    Choice(&'static [&'static str]),
    File,            // image path on read, binary part on write
    Ref,             // single foreign key
    Refs,            // set of foreign keys, one multipart part per id
    Json,            // opaque nested data, never sent back
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::LongText => "long_text",
            Self::Choice(_) => "choice",
            Self::File => "file",
            Self::Ref => "ref",
            Self::Refs => "refs",
            Self::Json => "json",
        }
    }

    /// Whether the field can be edited through a draft and submitted
    pub fn is_writable(&self) -> bool {
        !matches!(self, Self::Json)
    }

    /// Allowed values for `Choice` fields
    pub fn choices(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Choice(values) => Some(values),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_fields_are_not_writable() {
        assert!(!FieldKind::Json.is_writable());
        assert!(FieldKind::Refs.is_writable());
        assert_eq!(FieldKind::Choice(&["a"]).choices(), Some(&["a"][..]));
        assert_eq!(FieldKind::File.choices(), None);
    }
}
