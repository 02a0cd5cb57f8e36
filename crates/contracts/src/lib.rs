//! Wire-level contracts shared between the catalog admin client and the API.
//!
//! - `domain`: entities, field values and the schema of every catalog collection
//! - `shared`: field metadata, reorder payload, API error body
//! - `system`: authentication DTOs

pub mod domain;
pub mod shared;
pub mod system;
