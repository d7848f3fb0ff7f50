//! Streaming assembly of page bodies into one JSON array document.
//!
//! Each page body is written verbatim as one array element, so every element
//! keeps the full request/response metadata of its page. Only the page being
//! written is held in memory.

use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};

use crate::fetch::{FetchError, PageSource};
use crate::progress;

const OPEN_MARKER: &[u8] = b"[";
const SEPARATOR: &[u8] = b",\n";
const CLOSE_MARKER: &[u8] = b"]";

/// What one aggregation wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateSummary {
    /// Array elements written (one per page).
    pub pages: u64,
    /// Data rows across all pages.
    pub rows: u64,
    /// Bytes written including markers and separators.
    pub bytes: u64,
}

/// Writes every page of `source` into `sink` as a JSON array.
///
/// On error the closing marker is not written: whatever was already written
/// is flushed and left as is, and the error is returned.
///
/// # Errors
///
/// Returns the first page error, or [`FetchError::Io`] (reported against
/// `sink_path`) when writing fails.
pub async fn aggregate<S, W>(
    source: &mut S,
    sink: &mut W,
    sink_path: &Path,
    progress: &ProgressBar,
) -> Result<AggregateSummary, FetchError>
where
    S: PageSource + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut summary = AggregateSummary::default();
    write_chunk(sink, OPEN_MARKER, sink_path, &mut summary).await?;

    while let Some(next) = source.next_page().await {
        let page = match next {
            Ok(page) => page,
            Err(error) => {
                // Leave the partial document readable for post-mortem.
                if let Err(flush_error) = sink.flush().await {
                    warn!(
                        path = %sink_path.display(),
                        error = %flush_error,
                        "failed to flush partial aggregate after fetch error"
                    );
                }
                return Err(error);
            }
        };

        if let Some(total) = source.total_hint() {
            progress::set_total(progress, total);
        }
        if summary.pages > 0 {
            write_chunk(sink, SEPARATOR, sink_path, &mut summary).await?;
        }
        write_chunk(sink, page.body().as_bytes(), sink_path, &mut summary).await?;

        summary.pages += 1;
        summary.rows += page.row_count();
        progress.inc(page.row_count());
        debug!(offset = page.offset(), rows = page.row_count(), "page appended");
    }

    write_chunk(sink, CLOSE_MARKER, sink_path, &mut summary).await?;
    sink.flush()
        .await
        .map_err(|e| FetchError::io(sink_path, e))?;
    Ok(summary)
}

/// Creates (or truncates) `path` and aggregates `source` into it.
///
/// # Errors
///
/// Same as [`aggregate`], plus [`FetchError::Io`] when the file cannot be created.
#[instrument(skip(source, progress), fields(path = %path.display()))]
pub async fn aggregate_to_file<S>(
    source: &mut S,
    path: &Path,
    progress: &ProgressBar,
) -> Result<AggregateSummary, FetchError>
where
    S: PageSource + ?Sized,
{
    let file = File::create(path)
        .await
        .map_err(|e| FetchError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    let summary = aggregate(source, &mut writer, path, progress).await?;
    writer
        .into_inner()
        .sync_all()
        .await
        .map_err(|e| FetchError::io(PathBuf::from(path), e))?;

    info!(
        pages = summary.pages,
        rows = summary.rows,
        bytes = summary.bytes,
        "aggregate document complete"
    );
    Ok(summary)
}

async fn write_chunk<W>(
    sink: &mut W,
    chunk: &[u8],
    sink_path: &Path,
    summary: &mut AggregateSummary,
) -> Result<(), FetchError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    sink.write_all(chunk)
        .await
        .map_err(|e| FetchError::io(sink_path, e))?;
    summary.bytes += chunk.len() as u64;
    Ok(())
}
