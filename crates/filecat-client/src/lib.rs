//! FileCat Client - HTTP access to a catalog service
//!
//! Typed client for every operation the catalog service exposes, and the
//! `ICatalogApi` adapter used by the sync driver.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use filecat_client::CatalogClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = CatalogClient::new("http://localhost:5000")?;
//! for catalog in client.get_catalogs().await? {
//!     println!("{}", catalog.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;

pub use client::{CatalogClient, ClientError};
