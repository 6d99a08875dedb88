//! Domain newtypes with validation
//!
//! Strongly-typed wrappers for catalog identities. Each newtype ensures
//! data validity (and normal form) at construction time.

use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// FileId
// ============================================================================

/// Identifier of a File row within the catalog store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(i64);

impl FileId {
    /// Create a FileId from a raw row id
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw row id
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl Display for FileId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FileId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(Self)
            .map_err(|e| DomainError::InvalidId(format!("Invalid FileId '{s}': {e}")))
    }
}

impl From<i64> for FileId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

// ============================================================================
// CatalogName
// ============================================================================

/// Name of a catalog, trimmed and compared case-insensitively
///
/// The trimmed spelling is kept for display; identity is the lowercased key,
/// so `catalog`, ` Catalog` and `CATALOG ` all name the same catalog.
#[derive(Debug, Clone)]
pub struct CatalogName {
    display: String,
    key: String,
}

impl CatalogName {
    /// Create a CatalogName
    ///
    /// # Errors
    /// Returns error if the name is empty after trimming
    pub fn new(name: &str) -> Result<Self, DomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidCatalogName(name.to_string()));
        }

        Ok(Self {
            display: trimmed.to_string(),
            key: trimmed.to_lowercase(),
        })
    }

    /// The trimmed name as written
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// The case-folded identity used for lookups
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for CatalogName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for CatalogName {}

impl Hash for CatalogName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Display for CatalogName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display)
    }
}

impl FromStr for CatalogName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ============================================================================
// RelativePath
// ============================================================================

/// Normalize a catalog-relative path
///
/// Backslashes become forward slashes, empty segments (duplicate, leading
/// or trailing slashes) are collapsed and `.` segments are dropped. A file
/// named `.hidden` keeps its leading dot: only whole `.` segments go.
///
/// ```
/// use filecat_core::domain::newtypes::normalize_path;
///
/// assert_eq!(normalize_path(".\\full\\name"), "full/name");
/// assert_eq!(normalize_path("./full//name"), "full/name");
/// assert_eq!(normalize_path(".hidden"), ".hidden");
/// ```
pub fn normalize_path(raw: &str) -> String {
    raw.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// A normalized, catalog-relative file path using forward slashes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelativePath(String);

impl RelativePath {
    /// Create a RelativePath from a raw path in any of the accepted spellings
    ///
    /// # Errors
    /// Returns error if nothing remains after normalization
    pub fn new(raw: &str) -> Result<Self, DomainError> {
        let normalized = normalize_path(raw);
        if normalized.is_empty() {
            return Err(DomainError::InvalidPath(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    /// Get the normalized path string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last segment of the path
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl Display for RelativePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RelativePath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RelativePath {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<RelativePath> for String {
    fn from(path: RelativePath) -> Self {
        path.0
    }
}

// ============================================================================
// PathPrefix
// ============================================================================

/// A listing filter over catalog paths
///
/// Normalized like a [`RelativePath`], except that a trailing separator is
/// kept: `full/` selects the contents of directory `full` and never the
/// sibling `fullish`, while `full` selects both. Matching is a literal,
/// case-sensitive string prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathPrefix(String);

impl PathPrefix {
    /// Create a prefix from a raw filter
    ///
    /// Returns `None` when nothing remains after normalization (`""`,
    /// `"./"`), meaning no filter.
    pub fn new(raw: &str) -> Option<Self> {
        let mut normalized = normalize_path(raw);
        if normalized.is_empty() {
            return None;
        }
        if raw.ends_with(['/', '\\']) {
            normalized.push('/');
        }
        Some(Self(normalized))
    }

    /// Get the normalized prefix string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `path` falls under this prefix
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.0)
    }
}

impl From<&RelativePath> for PathPrefix {
    fn from(path: &RelativePath) -> Self {
        Self(path.as_str().to_string())
    }
}

impl Display for PathPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ContentHash
// ============================================================================

/// Content digest of a file as reported by a host
///
/// The digest width is not fixed (older clients reported 128-bit digests,
/// current ones 256-bit); only non-empty, whitespace-free text is accepted.
/// Equality is exact byte equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash(String);

impl ContentHash {
    /// Create a new ContentHash
    ///
    /// # Errors
    /// Returns error if the hash is empty or contains whitespace
    pub fn new(hash: String) -> Result<Self, DomainError> {
        if hash.is_empty() || hash.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidHash(hash));
        }
        Ok(Self(hash))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentHash {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for ContentHash {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}
