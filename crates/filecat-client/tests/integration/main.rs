//! Integration tests for filecat-client
//!
//! Uses wiremock to simulate the catalog service and verifies request
//! shapes, response parsing and status handling of CatalogClient.

mod common;

mod test_queries;
mod test_writes;
