//! Pagination state of one list view and the stale-response guard.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use eca_core::{AppError, AppResult};
use eca_domain::{DEFAULT_PAGE_SIZE, FilterSortConfiguration, PAGE_SIZE_OPTIONS, Page};

use crate::collection_fetcher::CollectionFetcher;

/// Monotonic sequence of issued requests.
///
/// Only the most recently issued request may update a view; responses to
/// earlier requests are stale even when they arrive last.
#[derive(Debug, Clone, Default)]
pub struct RequestSequence {
    latest: Arc<AtomicU64>,
}

impl RequestSequence {
    /// Creates a sequence with nothing issued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next sequence number.
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::AcqRel).saturating_add(1)
    }

    /// Returns whether `sequence` is the latest issued number.
    #[must_use]
    pub fn is_latest(&self, sequence: u64) -> bool {
        self.latest.load(Ordering::Acquire) == sequence
    }
}

/// Snapshot of the parameters of one issued page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    sequence: u64,
    limit: usize,
    offset: usize,
    filter_sort: FilterSortConfiguration,
}

impl RequestTicket {
    /// Returns the sequence number.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the requested page size.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the requested offset.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the filter configuration captured at issue time.
    #[must_use]
    pub fn filter_sort(&self) -> &FilterSortConfiguration {
        &self.filter_sort
    }
}

/// Limit, offset, filters and last accepted page of one list view.
#[derive(Debug, Clone)]
pub struct ListViewState<T> {
    limit: usize,
    offset: usize,
    filter_sort: FilterSortConfiguration,
    sequence: RequestSequence,
    page: Option<Page<T>>,
}

impl<T> ListViewState<T> {
    /// Creates a view on the first page with the default page size.
    #[must_use]
    pub fn new(filter_sort: FilterSortConfiguration) -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
            filter_sort,
            sequence: RequestSequence::new(),
            page: None,
        }
    }

    /// Returns the page size.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the offset of the current page.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the zero-based index of the current page.
    #[must_use]
    pub fn page_index(&self) -> usize {
        self.offset / self.limit
    }

    /// Returns the filter configuration.
    #[must_use]
    pub fn filter_sort(&self) -> &FilterSortConfiguration {
        &self.filter_sort
    }

    /// Returns the last accepted page.
    #[must_use]
    pub fn page(&self) -> Option<&Page<T>> {
        self.page.as_ref()
    }

    /// Changes the page size and returns to the first page.
    pub fn set_page_size(&mut self, limit: usize) -> AppResult<()> {
        if !PAGE_SIZE_OPTIONS.contains(&limit) {
            return Err(AppError::Validation(format!(
                "page size must be one of {PAGE_SIZE_OPTIONS:?}, got {limit}"
            )));
        }

        self.limit = limit;
        self.offset = 0;
        Ok(())
    }

    /// Moves to the page with zero-based `index`.
    pub fn set_page(&mut self, index: usize) {
        self.offset = index.saturating_mul(self.limit);
    }

    /// Edits the filter configuration and returns to the first page.
    pub fn update_filters(&mut self, edit: impl FnOnce(&mut FilterSortConfiguration)) {
        edit(&mut self.filter_sort);
        self.offset = 0;
    }

    /// Issues a ticket for the current parameters.
    pub fn issue(&self) -> RequestTicket {
        RequestTicket {
            sequence: self.sequence.issue(),
            limit: self.limit,
            offset: self.offset,
            filter_sort: self.filter_sort.clone(),
        }
    }

    /// Stores `page` when `ticket` is the latest issued; returns whether it was stored.
    pub fn accept(&mut self, ticket: &RequestTicket, page: Page<T>) -> bool {
        if !self.sequence.is_latest(ticket.sequence) {
            return false;
        }

        self.page = Some(page);
        true
    }
}

impl<T: Send + 'static> ListViewState<T> {
    /// Fetches the current page and stores it.
    pub async fn refresh(&mut self, fetcher: &CollectionFetcher<T>) -> AppResult<bool> {
        let ticket = self.issue();
        let page = fetcher
            .fetch_page(ticket.limit, ticket.offset, &ticket.filter_sort)
            .await?;
        Ok(self.accept(&ticket, page))
    }
}
