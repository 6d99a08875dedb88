//! Use cases (interactors) for filecat
//!
//! Thin coordinators between wire input, domain rules and the store port.
//!
//! ## Use Cases
//!
//! - [`CatalogService`] - Batch upsert, listings, classification views, delete

pub mod catalog_service;

pub use catalog_service::CatalogService;
