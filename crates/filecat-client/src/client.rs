//! Catalog service HTTP client
//!
//! Builds request URLs segment by segment so catalog names and ids are
//! percent-encoded, sends JSON, and turns non-success statuses into
//! [`ClientError::Status`] carrying the status and response body.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use filecat_core::domain::{
    CatalogName, CatalogSummary, DeleteOutcome, FileComparison, FileEntry, FileId, FileRecord,
    RelativePath,
};
use filecat_core::ports::ICatalogApi;

/// Default per-request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised by [`CatalogClient`] beyond transport failures
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The base URL cannot carry path segments (e.g. `mailto:`)
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The service answered with a non-success status
    #[error("{method} {path} returned {status}: {body}")]
    Status {
        method: Method,
        path: String,
        status: StatusCode,
        body: String,
    },
}

// ============================================================================
// CatalogClient
// ============================================================================

/// HTTP client for a catalog service
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: Url,
}

impl CatalogClient {
    /// Creates a client for the service at `base_url` with the default timeout
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom per-request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid catalog service URL: {base_url}"))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()).into());
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// The service base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `segments` to the base URL, encoding each one
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Sends `request` and fails on any non-success status
    async fn send(&self, method: Method, url: Url, request: RequestBuilder) -> Result<Response> {
        let path = url.path().to_string();
        debug!(%method, %path, "Sending catalog request");

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send {method} {path}"))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status {
            method,
            path,
            status,
            body,
        }
        .into())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let path = url.path().to_string();
        let request = self.request(Method::GET, url.clone());
        self.send(Method::GET, url, request)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse response of GET {path}"))
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// `GET /catalogs`
    pub async fn get_catalogs(&self) -> Result<Vec<CatalogSummary>> {
        self.get_json(self.url(&["catalogs"])?).await
    }

    /// `GET /catalogs/{catalog}/files[?path=prefix]`
    pub async fn get_files(&self, catalog: &str, prefix: Option<&str>) -> Result<Vec<FileEntry>> {
        let mut url = self.url(&["catalogs", catalog, "files"])?;
        if let Some(prefix) = prefix {
            url.query_pairs_mut().append_pair("path", prefix);
        }
        self.get_json(url).await
    }

    /// `GET /catalogs/{catalog}/files/differences`
    pub async fn get_differences(&self, catalog: &str) -> Result<Vec<FileComparison>> {
        self.get_json(self.url(&["catalogs", catalog, "files", "differences"])?)
            .await
    }

    /// `GET /catalogs/{catalog}/files/duplicates`
    pub async fn get_duplicates(&self, catalog: &str) -> Result<Vec<FileComparison>> {
        self.get_json(self.url(&["catalogs", catalog, "files", "duplicates"])?)
            .await
    }

    /// `GET /catalogs/{catalog}/files/singletons`
    pub async fn get_singletons(&self, catalog: &str) -> Result<Vec<FileEntry>> {
        self.get_json(self.url(&["catalogs", catalog, "files", "singletons"])?)
            .await
    }

    /// `POST /catalogs/{catalog}/files` with a JSON array of records
    pub async fn upsert_files(&self, catalog: &str, records: &[FileRecord]) -> Result<()> {
        let url = self.url(&["catalogs", catalog, "files"])?;
        let request = self.request(Method::POST, url.clone()).json(records);
        self.send(Method::POST, url, request).await?;

        info!(catalog, count = records.len(), "Uploaded file records");
        Ok(())
    }

    /// `DELETE /catalogs/{catalog}/files/{id}`
    ///
    /// A `404` answer is reported as [`DeleteOutcome::NotFound`].
    pub async fn delete_file(&self, catalog: &str, id: FileId) -> Result<DeleteOutcome> {
        let id = id.to_string();
        let url = self.url(&["catalogs", catalog, "files", &id])?;
        let request = self.request(Method::DELETE, url.clone());

        match self.send(Method::DELETE, url, request).await {
            Ok(_) => Ok(DeleteOutcome::Deleted),
            Err(err) => match err.downcast_ref::<ClientError>() {
                Some(ClientError::Status { status, .. }) if *status == StatusCode::NOT_FOUND => {
                    Ok(DeleteOutcome::NotFound)
                }
                _ => Err(err),
            },
        }
    }
}

// ============================================================================
// ICatalogApi implementation
// ============================================================================

#[async_trait::async_trait]
impl ICatalogApi for CatalogClient {
    async fn find_files(
        &self,
        catalog: &CatalogName,
        prefix: Option<&RelativePath>,
    ) -> Result<Vec<FileEntry>> {
        self.get_files(catalog.as_str(), prefix.map(RelativePath::as_str))
            .await
    }

    async fn upsert_files(&self, catalog: &CatalogName, records: &[FileRecord]) -> Result<()> {
        CatalogClient::upsert_files(self, catalog.as_str(), records).await
    }
}
