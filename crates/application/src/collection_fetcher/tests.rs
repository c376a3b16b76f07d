use std::sync::Arc;

use async_trait::async_trait;
use eca_core::{AppError, AppResult};
use eca_domain::{Collection, FilterSortConfiguration, Page, SortDirection, SortDirective};
use tokio::sync::Mutex;

use super::CollectionFetcher;
use crate::collection_ports::{CollectionQuery, CollectionSource};
use crate::filter_translator::FilterTranslator;

#[derive(Clone, Copy)]
enum PagingStyle {
    MorePages,
    TotalOnly,
    StuckCursor,
}

struct FakeCollectionSource {
    records: Vec<u32>,
    style: PagingStyle,
    calls: Mutex<Vec<CollectionQuery>>,
}

impl FakeCollectionSource {
    fn new(count: u32, style: PagingStyle) -> Self {
        Self {
            records: (1..=count).collect(),
            style,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CollectionSource<u32> for FakeCollectionSource {
    async fn fetch_page(&self, query: &CollectionQuery) -> AppResult<Page<u32>> {
        self.calls.lock().await.push(query.clone());

        let start = query.offset.min(self.records.len());
        let end = start.saturating_add(query.limit).min(self.records.len());
        let results = self.records[start..end].to_vec();

        let page = match self.style {
            PagingStyle::MorePages => Page {
                more_pages: Some(end < self.records.len()),
                next_offset: Some(end),
                results,
                total_records: self.records.len(),
            },
            PagingStyle::TotalOnly => Page {
                more_pages: None,
                next_offset: None,
                results,
                total_records: self.records.len(),
            },
            PagingStyle::StuckCursor => Page {
                more_pages: Some(true),
                next_offset: Some(query.offset),
                results,
                total_records: self.records.len(),
            },
        };
        Ok(page)
    }
}

struct FailingCollectionSource;

#[async_trait]
impl CollectionSource<u32> for FailingCollectionSource {
    async fn fetch_page(&self, _query: &CollectionQuery) -> AppResult<Page<u32>> {
        Err(AppError::Upstream {
            status: 503,
            message: "maintenance".to_owned(),
        })
    }
}

fn fetcher(source: Arc<dyn CollectionSource<u32>>) -> CollectionFetcher<u32> {
    match FilterTranslator::new(Collection::Users.columns(), "Europe/Stockholm") {
        Ok(translator) => CollectionFetcher::new(source, translator),
        Err(error) => panic!("translator should build: {error}"),
    }
}

#[tokio::test]
async fn fetch_all_walks_pages_of_one_hundred() {
    let source = Arc::new(FakeCollectionSource::new(250, PagingStyle::MorePages));
    let records = fetcher(source.clone()).fetch_all(None).await;

    assert_eq!(records.ok(), Some((1..=250).collect::<Vec<_>>()));

    let calls = source.calls.lock().await;
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls
            .iter()
            .map(|query| (query.limit, query.offset))
            .collect::<Vec<_>>(),
        vec![(100, 0), (100, 100), (100, 200)]
    );
}

#[tokio::test]
async fn fetch_all_stops_when_first_page_is_last() {
    let source = Arc::new(FakeCollectionSource::new(40, PagingStyle::MorePages));
    let records = fetcher(source.clone()).fetch_all(None).await;

    assert_eq!(records.map(|values| values.len()).ok(), Some(40));
    assert_eq!(source.calls.lock().await.len(), 1);
}

#[tokio::test]
async fn fetch_all_infers_more_pages_from_total() {
    let source = Arc::new(FakeCollectionSource::new(200, PagingStyle::TotalOnly));
    let records = fetcher(source.clone()).fetch_all(None).await;

    assert_eq!(records.map(|values| values.len()).ok(), Some(200));
    assert_eq!(source.calls.lock().await.len(), 2);
}

#[tokio::test]
async fn fetch_all_stops_on_non_advancing_cursor() {
    let source = Arc::new(FakeCollectionSource::new(300, PagingStyle::StuckCursor));
    let records = fetcher(source.clone()).fetch_all(None).await;

    assert_eq!(records.map(|values| values.len()).ok(), Some(100));
    assert_eq!(source.calls.lock().await.len(), 1);
}

#[tokio::test]
async fn fetch_all_passes_sort_to_every_page() {
    let source = Arc::new(FakeCollectionSource::new(150, PagingStyle::MorePages));
    let sort = SortDirective::new("signum", SortDirection::Desc).ok();
    let records = fetcher(source.clone()).fetch_all(sort).await;
    assert!(records.is_ok());

    let calls = source.calls.lock().await;
    assert!(
        calls
            .iter()
            .all(|query| query.sort.as_ref().map(ToString::to_string).as_deref()
                == Some("desc(signum)"))
    );
}

#[tokio::test]
async fn fetch_page_rejects_zero_limit_without_calling_backend() {
    let source = Arc::new(FakeCollectionSource::new(10, PagingStyle::MorePages));
    let result = fetcher(source.clone())
        .fetch_page(0, 0, &FilterSortConfiguration::new())
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(source.calls.lock().await.is_empty());
}

#[tokio::test]
async fn unmatched_enumerated_filter_yields_empty_page_without_backend_call() {
    let source = Arc::new(FakeCollectionSource::new(10, PagingStyle::MorePages));
    let mut filter_sort = FilterSortConfiguration::new();
    filter_sort.set_search_text("isSoftDeleted", "xyz");

    let page = fetcher(source.clone()).fetch_page(25, 0, &filter_sort).await;

    assert_eq!(
        page.map(|value| (value.results.len(), value.total_records)).ok(),
        Some((0, 0))
    );
    assert!(source.calls.lock().await.is_empty());
}

#[tokio::test]
async fn fetch_page_sends_translated_criteria() {
    let source = Arc::new(FakeCollectionSource::new(10, PagingStyle::MorePages));
    let mut filter_sort = FilterSortConfiguration::new();
    filter_sort.set_search_text("createdDate", "15/03/2024");
    filter_sort.set_sort("name", Some(SortDirection::Asc));

    let page = fetcher(source.clone()).fetch_page(25, 50, &filter_sort).await;
    assert!(page.is_ok());

    let calls = source.calls.lock().await;
    let Some(query) = calls.first() else {
        panic!("backend should be called once");
    };
    assert_eq!((query.limit, query.offset), (25, 50));
    assert!(
        query
            .query_pairs()
            .contains(&("createdDate".to_owned(), "2024-03-15".to_owned()))
    );
    assert_eq!(query.time_zone.as_deref(), Some("Europe/Stockholm"));
    assert_eq!(
        query.sort.as_ref().map(ToString::to_string).as_deref(),
        Some("asc(name)")
    );
}

#[tokio::test]
async fn identical_page_requests_return_identical_pages() {
    let source = Arc::new(FakeCollectionSource::new(60, PagingStyle::MorePages));
    let fetcher = fetcher(source);
    let mut filter_sort = FilterSortConfiguration::new();
    filter_sort.set_search_text("name", "a");

    let first = fetcher.fetch_page(25, 0, &filter_sort).await;
    let second = fetcher.fetch_page(25, 0, &filter_sort).await;

    assert!(first.is_ok());
    assert_eq!(first.ok(), second.ok());
}

#[tokio::test]
async fn upstream_failure_is_returned_unchanged() {
    let result = fetcher(Arc::new(FailingCollectionSource)).fetch_all(None).await;

    assert_eq!(
        result.err(),
        Some(AppError::Upstream {
            status: 503,
            message: "maintenance".to_owned(),
        })
    );
}
