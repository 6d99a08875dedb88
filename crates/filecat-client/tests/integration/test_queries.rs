//! Read operations: catalogs, listings and classification views

use chrono::{TimeZone, Timelike, Utc};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use filecat_core::domain::{CatalogName, FileId, RelativePath};
use filecat_core::ports::ICatalogApi;

use crate::common;

#[tokio::test]
async fn test_get_catalogs() {
    let (server, client) = common::setup_mock().await;

    Mock::given(method("GET"))
        .and(path("/catalogs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "name": "Photos" }, { "name": "music" }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let catalogs = client.get_catalogs().await.expect("get_catalogs failed");
    let names: Vec<_> = catalogs.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Photos", "music"]);
}

#[tokio::test]
async fn test_get_files_parses_entries() {
    let (server, client) = common::setup_mock().await;

    Mock::given(method("GET"))
        .and(path("/catalogs/photos/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            common::entry_json(1, "host1", "2024/img.jpg", "aaaa"),
            common::entry_json(1, "host2", "2024/img.jpg", "bbbb"),
        ])))
        .mount(&server)
        .await;

    let files = client.get_files("photos", None).await.expect("get_files failed");

    assert_eq!(files.len(), 2);
    assert_eq!(files[0].id, FileId::new(1));
    assert_eq!(files[0].full_name, "2024/img.jpg");
    assert_eq!(files[0].name, "img.jpg");
    assert_eq!(files[1].host, "host2");
    assert_eq!(
        files[0].updated,
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
    );
    assert_eq!(files[0].creation_time_utc.nanosecond(), 123_456_789);
}

#[tokio::test]
async fn test_get_files_sends_path_query() {
    let (server, client) = common::setup_mock().await;

    Mock::given(method("GET"))
        .and(path("/catalogs/photos/files"))
        .and(query_param("path", "2024/summer trip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let files = client
        .get_files("photos", Some("2024/summer trip"))
        .await
        .expect("get_files failed");
    assert!(files.is_empty());
}

#[tokio::test]
async fn test_catalog_name_is_percent_encoded() {
    let (server, client) = common::setup_mock().await;

    Mock::given(method("GET"))
        .and(path("/catalogs/my%20photos/files/singletons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let singletons = client
        .get_singletons("my photos")
        .await
        .expect("get_singletons failed");
    assert!(singletons.is_empty());
}

#[tokio::test]
async fn test_get_differences_and_duplicates() {
    let (server, client) = common::setup_mock().await;

    Mock::given(method("GET"))
        .and(path("/catalogs/c/files/differences"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "id": 7,
            "name": "report.pdf",
            "fullName": "docs/report.pdf",
            "hashes": [common::hash_json("h1", "aaaa"), common::hash_json("h2", "bbbb")]
        }])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/catalogs/c/files/duplicates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "id": 8,
            "name": "song.mp3",
            "fullName": "song.mp3",
            "hashes": [common::hash_json("h1", "cccc"), common::hash_json("h2", "cccc")]
        }])))
        .mount(&server)
        .await;

    let differences = client.get_differences("c").await.unwrap();
    assert_eq!(differences.len(), 1);
    assert_eq!(differences[0].id, FileId::new(7));
    assert_eq!(differences[0].hashes[1].hash, "bbbb");

    let duplicates = client.get_duplicates("c").await.unwrap();
    assert_eq!(duplicates[0].full_name, "song.mp3");
    assert!(duplicates[0].hashes.iter().all(|h| h.hash == "cccc"));
}

#[tokio::test]
async fn test_server_error_carries_status_and_body() {
    let (server, client) = common::setup_mock().await;

    Mock::given(method("GET"))
        .and(path("/catalogs"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database is locked"))
        .mount(&server)
        .await;

    let err = client.get_catalogs().await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("500"), "{message}");
    assert!(message.contains("database is locked"), "{message}");
}

#[tokio::test]
async fn test_find_files_through_port() {
    let (server, client) = common::setup_mock().await;

    Mock::given(method("GET"))
        .and(path("/catalogs/Photos/files"))
        .and(query_param("path", "a/b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            common::entry_json(3, "host1", "a/b", "aaaa"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let api: &dyn ICatalogApi = &client;
    let catalog = CatalogName::new(" Photos ").unwrap();
    let prefix = RelativePath::new(".\\a\\b").unwrap();
    let files = api.find_files(&catalog, Some(&prefix)).await.unwrap();
    assert_eq!(files.len(), 1);
}
