use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub type RequestId = u64;

/// Wire shape of one `/v1/link/sites` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SiteRecord {
    pub name: String,
    pub url: String,
}

/// Wire shape of a successful `/v1/link/extract` response. Unknown fields
/// are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtractionRecord {
    pub title: String,
    pub download_url: String,
    pub file_format: String,
    pub file_name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExtractRequest<'a> {
    pub url: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub path: PathBuf,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    CatalogCompleted {
        result: Result<Vec<SiteRecord>, ApiError>,
    },
    ExtractCompleted {
        request_id: RequestId,
        result: Result<ExtractionRecord, ApiError>,
    },
    SaveCompleted {
        file_name: String,
        result: Result<SavedFile, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response body"),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}
