//! Common types for all catalog collections

pub mod entity;
pub mod entity_id;
pub mod entity_schema;
pub mod field_value;
pub mod fields;

// Re-exports
pub use entity::{Entity, ORDER_KEY};
pub use entity_id::EntityId;
pub use entity_schema::EntitySchema;
pub use field_value::{Attachment, FieldValue, FileRef};
pub use fields::Fields;
