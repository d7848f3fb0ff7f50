//! End-to-end archiving of one query: fetch every page, assemble the
//! aggregate document, then gzip it.
//!
//! # Example
//!
//! ```no_run
//! use eia_archiver_core::{ApiClient, Archiver, QueryOptions, new_output_dir, output_root_from_env};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::from_env()?;
//! let archiver = Archiver::new(client, new_output_dir(&output_root_from_env())?);
//! let summary = archiver.archive(&QueryOptions::default()).await?;
//! println!("{} pages -> {}", summary.pages, summary.archive_path.display());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use tracing::{info, instrument, warn};

use crate::aggregate::aggregate_to_file;
use crate::api::ApiClient;
use crate::archive;
use crate::fetch::{FetchError, PaginatedFetcher};
use crate::progress;
use crate::query::QueryOptions;
use crate::version::VersionOutcome;

/// Outcome of one archived query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    /// The compressed aggregate document.
    pub archive_path: PathBuf,
    /// Total rows reported by the API.
    pub total: u64,
    /// Requests computed from the total (zero for an empty result).
    pub request_count: u64,
    /// Pages actually written (at least one).
    pub pages: u64,
    /// Data rows written across all pages.
    pub rows: u64,
    /// Version check result from the first page.
    pub version: VersionOutcome,
}

impl FetchSummary {
    /// Whether the API version drifted enough to warrant a user warning.
    #[must_use]
    pub fn has_version_warning(&self) -> bool {
        match &self.version {
            VersionOutcome::Observed { severity, .. } => severity.is_warning(),
            VersionOutcome::Unavailable => true,
        }
    }
}

/// Archives queries into one run directory, reusing a single API session.
#[derive(Debug)]
pub struct Archiver {
    client: ApiClient,
    output_dir: PathBuf,
    show_progress: bool,
}

impl Archiver {
    /// Creates an archiver writing into `output_dir` (created on first use).
    #[must_use]
    pub fn new(client: ApiClient, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            output_dir: output_dir.into(),
            show_progress: false,
        }
    }

    /// Enables the terminal progress bar.
    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Archives `options` to `<output_dir>/<frequency>_<fields>_<start>.json.gz`.
    ///
    /// # Errors
    ///
    /// See [`archive_query`]; also [`FetchError::Io`] when the output
    /// directory cannot be created.
    pub async fn archive(&self, options: &QueryOptions) -> Result<FetchSummary, FetchError> {
        let out_path = self.output_dir.join(options.build().aggregate_file_name());
        self.archive_to(options, &out_path).await
    }

    /// Archives `options` to an explicit aggregate path (`.gz` is appended).
    ///
    /// # Errors
    ///
    /// See [`archive`](Self::archive).
    pub async fn archive_to(
        &self,
        options: &QueryOptions,
        out_path: &Path,
    ) -> Result<FetchSummary, FetchError> {
        if let Some(parent) = out_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FetchError::io(parent, e))?;
        }
        let bar = progress::page_progress_bar(self.show_progress);
        let result = archive_query(&self.client, options, out_path, &bar).await;
        bar.finish_and_clear();
        result
    }
}

/// Runs the whole pipeline for `options`, writing the aggregate to `out_path`
/// and compressing it to `out_path` + `.gz`.
///
/// The first failing page aborts the fetch. The partially written aggregate
/// is left at `out_path`, unclosed and uncompressed.
///
/// # Errors
///
/// Returns the first [`FetchError`] from fetching, writing or compressing.
#[instrument(skip(client, options, progress), fields(path = %out_path.display()))]
pub async fn archive_query(
    client: &ApiClient,
    options: &QueryOptions,
    out_path: &Path,
    progress: &ProgressBar,
) -> Result<FetchSummary, FetchError> {
    let spec = options.build();
    let mut pages = PaginatedFetcher::new(client).fetch(spec)?;

    let written = match aggregate_to_file(&mut pages, out_path, progress).await {
        Ok(written) => written,
        Err(error) => {
            warn!(
                path = %out_path.display(),
                pages = pages.pages_emitted(),
                error = %error,
                "fetch aborted; partial aggregate left uncompressed"
            );
            return Err(error);
        }
    };

    let archive_path = archive::finalize(out_path).await?;
    let summary = FetchSummary {
        archive_path,
        total: pages.total().unwrap_or(0),
        request_count: pages.request_count().unwrap_or(0),
        pages: written.pages,
        rows: written.rows,
        version: pages
            .version_outcome()
            .cloned()
            .unwrap_or(VersionOutcome::Unavailable),
    };

    info!(
        archive = %summary.archive_path.display(),
        total = summary.total,
        pages = summary.pages,
        "query archived"
    );
    Ok(summary)
}
