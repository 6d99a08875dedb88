//! Request routing
//!
//! Paths are split on `/` and each segment is percent-decoded before
//! matching, so a catalog named `my photos` arrives as `my%20photos` and a
//! name containing `/` must be sent as `%2F`.

use std::borrow::Cow;

use hyper::Method;
use percent_encoding::percent_decode_str;

use filecat_core::domain::{ClassificationKind, FileId};

use crate::error::ApiError;

/// A resolved request target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `GET /catalogs`
    Catalogs,
    /// `GET /catalogs/{catalog}/files`
    ListFiles { catalog: String, prefix: Option<String> },
    /// `GET /catalogs/{catalog}/files/{differences|duplicates|singletons}`
    Classified {
        catalog: String,
        kind: ClassificationKind,
    },
    /// `POST /catalogs/{catalog}/files`
    Upsert { catalog: String },
    /// `DELETE /catalogs/{catalog}/files/{id}`
    Delete { catalog: String, id: FileId },
}

impl Route {
    /// Resolves `method` and the raw (still encoded) `path` and `query`
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown paths, `MethodNotAllowed` for a known path with
    /// an unsupported method, `BadRequest` for undecodable segments or a
    /// malformed file id.
    pub fn resolve(method: &Method, path: &str, query: Option<&str>) -> Result<Self, ApiError> {
        let segments = decode_segments(path)?;
        let segments: Vec<&str> = segments.iter().map(|s| s.as_ref()).collect();

        match segments.as_slice() {
            ["catalogs"] => match *method {
                Method::GET => Ok(Route::Catalogs),
                _ => Err(ApiError::MethodNotAllowed(method.clone())),
            },
            ["catalogs", catalog, "files"] => match *method {
                Method::GET => Ok(Route::ListFiles {
                    catalog: catalog.to_string(),
                    prefix: query.and_then(path_param),
                }),
                Method::POST => Ok(Route::Upsert {
                    catalog: catalog.to_string(),
                }),
                _ => Err(ApiError::MethodNotAllowed(method.clone())),
            },
            ["catalogs", catalog, "files", tail] => {
                let view = match *tail {
                    "differences" => Some(ClassificationKind::Difference),
                    "duplicates" => Some(ClassificationKind::Duplicate),
                    "singletons" => Some(ClassificationKind::Singleton),
                    _ => None,
                };

                match (method, view) {
                    (&Method::GET, Some(kind)) => Ok(Route::Classified {
                        catalog: catalog.to_string(),
                        kind,
                    }),
                    (&Method::DELETE, _) => {
                        let id = tail
                            .parse::<FileId>()
                            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                        Ok(Route::Delete {
                            catalog: catalog.to_string(),
                            id,
                        })
                    }
                    (&Method::GET, None) => Err(ApiError::NotFound(format!("No route for {path}"))),
                    _ => Err(ApiError::MethodNotAllowed(method.clone())),
                }
            }
            _ => Err(ApiError::NotFound(format!("No route for {path}"))),
        }
    }
}

/// Splits an absolute path and percent-decodes every segment
///
/// A single trailing slash is ignored.
fn decode_segments(path: &str) -> Result<Vec<Cow<'_, str>>, ApiError> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

    trimmed
        .split('/')
        .map(|segment| {
            percent_decode_str(segment)
                .decode_utf8()
                .map_err(|e| ApiError::BadRequest(format!("Invalid path segment {segment:?}: {e}")))
        })
        .collect()
}

/// Extracts the `path` query parameter (form-urlencoded)
fn path_param(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "path")
        .map(|(_, value)| value.into_owned())
}
