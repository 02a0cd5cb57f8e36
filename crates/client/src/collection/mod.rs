//! Managed collection: cached list, filter view, edit session and reorder
//!
//! One controller serves every catalog screen; it is parameterized by the
//! entity schema, the gateway and an optional filter predicate.

pub mod controller;
pub mod draft;
pub mod edit_session;
pub mod error;
pub mod filter;
pub mod reorder;

pub use controller::{CollectionController, FilterPredicate};
pub use draft::Draft;
pub use edit_session::EditSession;
pub use error::{ControllerError, ControllerResult};
pub use filter::FilterState;
