//! Field metadata for describing catalog collections
//!
//! Schemas are compile-time constants built from these descriptors.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use contracts::domain::a001_subcategory::SCHEMA;
//!
//! for field in SCHEMA.fields {
//!     if field.validation.required {
//!         println!("Required: {}", field.label);
//!     }
//! }
//! ```

mod field_type;
mod types;
mod validation;

pub use field_type::FieldKind;
pub use types::FieldDef;
pub use validation::ValidationRules;
