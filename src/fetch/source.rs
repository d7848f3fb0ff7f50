//! Pull-based page source consumed by the aggregator.

use async_trait::async_trait;

use super::FetchError;
use crate::api::PageResponse;

/// A finite, single-pass sequence of pages.
///
/// Each call produces at most one page; `None` means the sequence is
/// exhausted. Implementations never rewind.
#[async_trait]
pub trait PageSource: Send {
    /// Fetches and returns the next page.
    async fn next_page(&mut self) -> Option<Result<PageResponse, FetchError>>;

    /// Total rows the sequence will deliver, when known. Used for progress
    /// display only.
    fn total_hint(&self) -> Option<u64> {
        None
    }
}
