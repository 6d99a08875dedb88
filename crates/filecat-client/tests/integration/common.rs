//! Shared test helpers for catalog client integration tests

use wiremock::MockServer;

use filecat_client::CatalogClient;

/// Starts a mock server and returns a client pointed at it
pub async fn setup_mock() -> (MockServer, CatalogClient) {
    let server = MockServer::start().await;
    let client = CatalogClient::new(&server.uri()).expect("client for mock server");
    (server, client)
}

/// A flattened listing entry as the service serializes it
pub fn entry_json(id: i64, host: &str, full_name: &str, hash: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "host": host,
        "name": full_name.rsplit('/').next().unwrap(),
        "fullName": full_name,
        "hash": hash,
        "updated": "2024-06-01T10:00:00Z",
        "length": 100,
        "creationTimeUtc": "2024-06-01T09:00:00.123456789Z",
        "lastAccessTimeUtc": "2024-06-01T10:00:00Z",
        "lastWriteTimeUtc": "2024-06-01T09:30:00Z"
    })
}

/// A per-host entry inside a comparison
pub fn hash_json(host: &str, hash: &str) -> serde_json::Value {
    serde_json::json!({
        "host": host,
        "hash": hash,
        "updated": "2024-06-01T10:00:00Z",
        "length": 100,
        "creationTimeUtc": "2024-06-01T09:00:00Z",
        "lastAccessTimeUtc": "2024-06-01T10:00:00Z",
        "lastWriteTimeUtc": "2024-06-01T09:30:00Z"
    })
}
