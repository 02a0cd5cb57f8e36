//! Client for the pet catalog admin API.
//!
//! - `collection`: managed collection controller, edit session, drafts, filtering
//! - `gateway`: remote collection gateway (HTTP and in-memory)
//! - `domain`: collection-specific extensions (product catalog sync)
//! - `system`: session, authentication, logging
//! - `shared`: configuration and URL helpers

pub mod collection;
pub mod domain;
pub mod gateway;
pub mod shared;
pub mod system;
