//! Lazy, strictly sequential page sequence for one query.

use async_trait::async_trait;
use tracing::{debug, info};

use super::FetchError;
use super::source::PageSource;
use crate::api::{ApiClient, PageResponse};
use crate::config::MAX_PAGE_LENGTH;
use crate::query::QuerySpec;
use crate::version::{VersionGuard, VersionOutcome};

/// Number of requests needed to cover `total` rows at `page_length` rows per
/// request, counting the first request. Zero when `total` is zero.
///
/// `page_length` must be non-zero.
#[must_use]
pub fn request_count(total: u64, page_length: u64) -> u64 {
    total.div_ceil(page_length)
}

/// Issues paginated fetches through a borrowed [`ApiClient`].
#[derive(Debug, Clone, Copy)]
pub struct PaginatedFetcher<'a> {
    client: &'a ApiClient,
}

impl<'a> PaginatedFetcher<'a> {
    #[must_use]
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Starts a fetch for `spec`. No request is sent until the first
    /// [`next_page`](PageSource::next_page) call.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidPageLength`] when the page length is zero
    /// or above the server maximum.
    pub fn fetch(&self, spec: QuerySpec) -> Result<Pages<'a>, FetchError> {
        let length = spec.length();
        if !(1..=MAX_PAGE_LENGTH).contains(&length) {
            return Err(FetchError::InvalidPageLength {
                length,
                max: MAX_PAGE_LENGTH,
            });
        }
        Ok(Pages {
            client: self.client,
            guard: VersionGuard::new(self.client.expected_version()),
            spec,
            plan: None,
            next_index: 0,
            finished: false,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PagePlan {
    total: u64,
    request_count: u64,
    version: VersionOutcome,
}

/// Single-pass page sequence. Page `k` (for `k >= 1`) is requested at offset
/// `k * length`, only after page `k - 1` has been handed out.
///
/// After an error the sequence is finished and yields `None`.
#[derive(Debug)]
pub struct Pages<'a> {
    client: &'a ApiClient,
    guard: VersionGuard,
    spec: QuerySpec,
    plan: Option<PagePlan>,
    next_index: u64,
    finished: bool,
}

impl Pages<'_> {
    /// The query being fetched.
    #[must_use]
    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// Total rows reported by the first page, once it has been fetched.
    #[must_use]
    pub fn total(&self) -> Option<u64> {
        self.plan.as_ref().map(|plan| plan.total)
    }

    /// Requests needed for the whole fetch, once the first page is in.
    #[must_use]
    pub fn request_count(&self) -> Option<u64> {
        self.plan.as_ref().map(|plan| plan.request_count)
    }

    /// Version check result from the first page.
    #[must_use]
    pub fn version_outcome(&self) -> Option<&VersionOutcome> {
        self.plan.as_ref().map(|plan| &plan.version)
    }

    /// Pages handed out so far.
    #[must_use]
    pub fn pages_emitted(&self) -> u64 {
        self.next_index
    }

    async fn first_page(&mut self) -> Result<PageResponse, FetchError> {
        let page = self.client.get_page(&self.spec).await?;
        let version = self.guard.inspect(page.api_version());

        debug!(params = %self.spec.to_params(), "params passed by user");
        if let Some(echoed) = page.echoed_params() {
            debug!(params = %echoed, "params interpreted by API");
        }

        let total = page.total();
        let request_count = request_count(total, self.spec.length());
        info!(
            total,
            requests = request_count,
            "downloading {total} points from EIA API via {request_count} requests"
        );

        self.plan = Some(PagePlan {
            total,
            request_count,
            version,
        });
        Ok(page)
    }

    async fn following_page(&mut self, expected_total: u64) -> Result<PageResponse, FetchError> {
        let offset = self.spec.length() * self.next_index;
        let page = self.client.get_page(&self.spec.with_offset(offset)).await?;
        if page.total() != expected_total {
            return Err(FetchError::TotalChanged {
                offset,
                expected: expected_total,
                observed: page.total(),
            });
        }
        debug!(offset, rows = page.row_count(), "page received");
        Ok(page)
    }
}

#[async_trait]
impl PageSource for Pages<'_> {
    async fn next_page(&mut self) -> Option<Result<PageResponse, FetchError>> {
        if self.finished {
            return None;
        }

        let planned = self
            .plan
            .as_ref()
            .map(|plan| (plan.total, plan.request_count));
        let result = match planned {
            // The probe page is emitted even when the total is zero.
            None => self.first_page().await,
            Some((_, request_count)) if self.next_index >= request_count => {
                self.finished = true;
                return None;
            }
            Some((total, _)) => self.following_page(total).await,
        };

        match result {
            Ok(page) => {
                self.next_index += 1;
                Some(Ok(page))
            }
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }

    fn total_hint(&self) -> Option<u64> {
        self.total()
    }
}
