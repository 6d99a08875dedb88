//! FileCat Server - HTTP transport for the catalog service
//!
//! Maps the catalog operations onto HTTP/1.1 + JSON routes:
//!
//! | Method | Path                                    | Operation            |
//! |--------|-----------------------------------------|----------------------|
//! | GET    | `/catalogs`                             | catalogs listing     |
//! | GET    | `/catalogs/{name}/files[?path=prefix]`  | file listing         |
//! | GET    | `/catalogs/{name}/files/differences`    | differences          |
//! | GET    | `/catalogs/{name}/files/duplicates`     | duplicates           |
//! | GET    | `/catalogs/{name}/files/singletons`     | singletons           |
//! | POST   | `/catalogs/{name}/files`                | batch upsert         |
//! | DELETE | `/catalogs/{name}/files/{id}`           | delete by id         |
//!
//! The server is stateless; every request is answered from the store.
//! Upsert bodies above the configured limit are refused with `413`.

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use routes::Route;
pub use server::{CatalogServer, DEFAULT_BODY_LIMIT};
