//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are the traits the core depends on; their implementations live in
//! adapter crates.
//!
//! ## Ports Overview
//!
//! - [`ICatalogStore`] - Persistent catalog storage (server side)
//! - [`ICatalogApi`] - Remote catalog access used by the sync driver (client side)

pub mod catalog_api;
pub mod catalog_store;

pub use catalog_api::ICatalogApi;
pub use catalog_store::ICatalogStore;
