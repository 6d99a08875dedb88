//! HTTP server for the catalog service
//!
//! One task per connection; each request is routed and answered
//! independently through the shared [`CatalogService`].

use std::convert::Infallible;
use std::net::SocketAddr;

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Serialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use filecat_core::domain::{ClassificationKind, DeleteOutcome, FileRecord};
use filecat_core::usecases::CatalogService;

use crate::error::ApiError;
use crate::routes::Route;

/// Largest upsert body accepted by default
pub const DEFAULT_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// HTTP server exposing a [`CatalogService`]
pub struct CatalogServer {
    service: CatalogService,
    body_limit: usize,
}

impl CatalogServer {
    /// Creates a server around `service`
    pub fn new(service: CatalogService) -> Self {
        Self {
            service,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Caps request bodies at `bytes`; larger uploads get `413`
    #[must_use]
    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }

    /// Binds `addr` and serves until `shutdown` is cancelled
    pub async fn run(&self, addr: SocketAddr, shutdown: CancellationToken) -> anyhow::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener until `shutdown`
    /// is cancelled
    pub async fn serve(
        &self,
        listener: TcpListener,
        shutdown: CancellationToken,
    ) -> anyhow::Result<()> {
        info!(addr = %listener.local_addr()?, "Catalog server listening");

        loop {
            tokio::select! {
                result = listener.accept() => {
                    let (stream, peer) = match result {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            warn!(error = %e, "Failed to accept connection");
                            continue;
                        }
                    };
                    let io = TokioIo::new(stream);
                    let service = self.service.clone();
                    let body_limit = self.body_limit;

                    tokio::spawn(async move {
                        let svc = service_fn(move |req| {
                            let service = service.clone();
                            async move {
                                Ok::<_, Infallible>(handle_request(req, &service, body_limit).await)
                            }
                        });

                        if let Err(e) = http1::Builder::new().serve_connection(io, svc).await {
                            error!(error = %e, %peer, "Catalog HTTP connection error");
                        }
                    });
                }
                _ = shutdown.cancelled() => {
                    info!("Catalog server shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Routes one request and renders its outcome
async fn handle_request(
    req: Request<Incoming>,
    service: &CatalogService,
    body_limit: usize,
) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match dispatch(req, service, body_limit).await {
        Ok(response) => response,
        Err(err) => {
            match &err {
                ApiError::Internal(e) => error!(%method, %path, error = %format!("{e:#}"), "Request failed"),
                other => debug!(%method, %path, error = %other, "Request rejected"),
            }
            error_response(&err)
        }
    };

    debug!(%method, %path, status = response.status().as_u16(), "Request handled");
    response
}

async fn dispatch(
    req: Request<Incoming>,
    service: &CatalogService,
    body_limit: usize,
) -> Result<Response<Full<Bytes>>, ApiError> {
    let route = Route::resolve(req.method(), req.uri().path(), req.uri().query())?;

    match route {
        Route::Catalogs => json_response(&service.catalogs().await?),
        Route::ListFiles { catalog, prefix } => {
            json_response(&service.files(&catalog, prefix.as_deref()).await?)
        }
        Route::Classified { catalog, kind } => match kind {
            ClassificationKind::Difference => json_response(&service.differences(&catalog).await?),
            ClassificationKind::Duplicate => json_response(&service.duplicates(&catalog).await?),
            ClassificationKind::Singleton => json_response(&service.singletons(&catalog).await?),
        },
        Route::Upsert { catalog } => {
            let body = Limited::new(req.into_body(), body_limit)
                .collect()
                .await
                .map_err(|e| {
                    if e.downcast_ref::<LengthLimitError>().is_some() {
                        ApiError::PayloadTooLarge(body_limit)
                    } else {
                        ApiError::BadRequest(format!("Failed to read request body: {e}"))
                    }
                })?
                .to_bytes();
            let records: Vec<FileRecord> = serde_json::from_slice(&body)?;

            service.upsert_batch(&catalog, &records).await?;
            Ok(empty_response(StatusCode::OK))
        }
        Route::Delete { catalog, id } => match service.delete(&catalog, id).await? {
            DeleteOutcome::Deleted => Ok(empty_response(StatusCode::OK)),
            DeleteOutcome::NotFound => Err(ApiError::NotFound(format!(
                "File {id} not found in catalog {catalog:?}"
            ))),
        },
    }
}

// ============================================================================
// Response helpers
// ============================================================================

fn json_response<T: Serialize>(value: &T) -> Result<Response<Full<Bytes>>, ApiError> {
    let body = serde_json::to_vec(value).map_err(|e| ApiError::Internal(e.into()))?;
    let mut response = Response::new(Full::new(Bytes::from(body)));
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(response)
}

fn empty_response(status: StatusCode) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}

fn error_response(err: &ApiError) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "error": err.to_string() }).to_string();
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = err.status();
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
