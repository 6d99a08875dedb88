//! FileCat Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain types** - `CatalogName`, `RelativePath`, `ContentHash`, `FileId`
//!   and the wire records exchanged between hosts and the catalog service
//! - **Classification** - partitioning of per-host observations into
//!   differences, duplicates and singletons
//! - **Change detection** - `needs_update`, the metadata predicate the sync
//!   client uses to skip unchanged files
//! - **Port definitions** - `ICatalogStore` (server persistence) and
//!   `ICatalogApi` (what the sync client needs from the service)
//! - **Use cases** - `CatalogService`, the request-level operations of the
//!   catalog service
//!
//! # Architecture
//!
//! The domain module is pure and performs no I/O. Ports define trait
//! interfaces that adapter crates implement (`filecat-store`,
//! `filecat-client`). Use cases orchestrate domain types through ports.

pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
