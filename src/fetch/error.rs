//! Error type for paginated fetches.

use std::path::PathBuf;

use thiserror::Error;

use crate::api::ApiError;
use crate::archive::ArchiveError;

/// Errors that abort a fetch. Nothing is retried; the first error wins.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A page request failed (status, transport or malformed body).
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Page length outside `1..=max`; checked before any request is sent.
    #[error("invalid page length {length}: must be between 1 and {max}")]
    InvalidPageLength { length: u64, max: u64 },

    /// A later page reported a different total than the first page, so the
    /// offsets computed from the first total no longer cover the result set.
    #[error("result total changed mid-fetch at offset {offset}: expected {expected}, got {observed}")]
    TotalChanged {
        offset: u64,
        expected: u64,
        observed: u64,
    },

    /// Writing the aggregate document failed.
    #[error("IO error writing to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Compressing the finished aggregate failed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

impl FetchError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// HTTP status code when the fetch failed on a status response.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Api(error) => error.status(),
            _ => None,
        }
    }
}
