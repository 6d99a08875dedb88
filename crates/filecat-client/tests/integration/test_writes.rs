//! Write operations: batch upsert and delete

use chrono::{TimeZone, Utc};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use filecat_core::domain::{DeleteOutcome, FileId, FileRecord};

use crate::common;

fn record(full_name: &str, hash: &str) -> FileRecord {
    let t = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
    FileRecord {
        host: "host1".to_string(),
        name: full_name.rsplit('/').next().unwrap().to_string(),
        full_name: full_name.to_string(),
        hash: hash.to_string(),
        updated: t,
        length: 42,
        creation_time_utc: t,
        last_access_time_utc: t,
        last_write_time_utc: t,
    }
}

#[tokio::test]
async fn test_upsert_posts_camel_case_array() {
    let (server, client) = common::setup_mock().await;

    Mock::given(method("POST"))
        .and(path("/catalogs/photos/files"))
        .and(body_json(serde_json::json!([{
            "host": "host1",
            "name": "img.jpg",
            "fullName": "2024/img.jpg",
            "hash": "aaaa",
            "updated": "2024-06-01T10:00:00Z",
            "length": 42,
            "creationTimeUtc": "2024-06-01T10:00:00Z",
            "lastAccessTimeUtc": "2024-06-01T10:00:00Z",
            "lastWriteTimeUtc": "2024-06-01T10:00:00Z"
        }])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client
        .upsert_files("photos", &[record("2024/img.jpg", "aaaa")])
        .await
        .expect("upsert_files failed");
}

#[tokio::test]
async fn test_upsert_rejection_is_an_error() {
    let (server, client) = common::setup_mock().await;

    Mock::given(method("POST"))
        .and(path("/catalogs/photos/files"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "error": "Invalid path: \"./\"" })),
        )
        .mount(&server)
        .await;

    let err = client
        .upsert_files("photos", &[record("./", "aaaa")])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("400"));
}

#[tokio::test]
async fn test_delete_found_and_not_found() {
    let (server, client) = common::setup_mock().await;

    Mock::given(method("DELETE"))
        .and(path("/catalogs/photos/files/5"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/catalogs/photos/files/6"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert_eq!(
        client.delete_file("photos", FileId::new(5)).await.unwrap(),
        DeleteOutcome::Deleted
    );
    assert_eq!(
        client.delete_file("photos", FileId::new(6)).await.unwrap(),
        DeleteOutcome::NotFound
    );
}

#[tokio::test]
async fn test_delete_server_error_propagates() {
    let (server, client) = common::setup_mock().await;

    Mock::given(method("DELETE"))
        .and(path("/catalogs/photos/files/5"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(client.delete_file("photos", FileId::new(5)).await.is_err());
}

#[tokio::test]
async fn test_unreachable_service_is_an_error() {
    let client = filecat_client::CatalogClient::new("http://127.0.0.1:9").unwrap();
    assert!(client.get_catalogs().await.is_err());
}
