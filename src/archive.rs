//! Gzip compression of finished aggregate documents.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Suffix appended to the source file name.
pub const GZIP_SUFFIX: &str = ".gz";

#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Reading, writing or removing a file failed.
    #[error("IO error archiving {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The blocking compression task panicked or was cancelled.
    #[error("compression task for {path} did not complete: {reason}")]
    TaskFailed { path: PathBuf, reason: String },
}

impl ArchiveError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Path of the compressed sibling: `name.json` becomes `name.json.gz`.
#[must_use]
pub fn compressed_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(GZIP_SUFFIX);
    PathBuf::from(name)
}

/// Compresses `path` into its `.gz` sibling, optionally removing the source.
///
/// The source is streamed through the encoder block by block. It is removed
/// only after the compressed file has been finished and flushed; on any
/// error it stays in place.
///
/// # Errors
///
/// Returns [`ArchiveError::Io`] naming the file that failed.
pub fn gzip_file(path: &Path, delete_uncompressed: bool) -> Result<PathBuf, ArchiveError> {
    let target = compressed_path(path);

    let source = File::open(path).map_err(|e| ArchiveError::io(path, e))?;
    let output = File::create(&target).map_err(|e| ArchiveError::io(&target, e))?;

    let mut reader = BufReader::new(source);
    let mut encoder = GzEncoder::new(BufWriter::new(output), Compression::default());
    let bytes_in = io::copy(&mut reader, &mut encoder).map_err(|e| ArchiveError::io(path, e))?;
    let mut writer = encoder.finish().map_err(|e| ArchiveError::io(&target, e))?;
    writer.flush().map_err(|e| ArchiveError::io(&target, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| ArchiveError::io(&target, e))?;
    debug!(bytes_in, target = %target.display(), "compressed");

    if delete_uncompressed {
        std::fs::remove_file(path).map_err(|e| ArchiveError::io(path, e))?;
    }
    Ok(target)
}

/// Compresses the finished aggregate at `path` and deletes the original.
///
/// Runs the blocking copy on the blocking thread pool.
///
/// # Errors
///
/// See [`gzip_file`]; also [`ArchiveError::TaskFailed`] if the task dies.
#[instrument(fields(path = %path.display()))]
pub async fn finalize(path: &Path) -> Result<PathBuf, ArchiveError> {
    let owned = path.to_path_buf();
    let target = tokio::task::spawn_blocking(move || gzip_file(&owned, true))
        .await
        .map_err(|e| ArchiveError::TaskFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })??;
    info!(archive = %target.display(), "archive finalized");
    Ok(target)
}
