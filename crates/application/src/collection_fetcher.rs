use std::sync::Arc;

use eca_core::{AppError, AppResult};
use eca_domain::{FETCH_ALL_PAGE_SIZE, FilterSortConfiguration, Page, SortDirective};

use crate::collection_ports::{CollectionQuery, CollectionSource};
use crate::filter_translator::FilterTranslator;

/// Application service for the uniform paginated list contract.
pub struct CollectionFetcher<T> {
    source: Arc<dyn CollectionSource<T>>,
    translator: FilterTranslator,
}

impl<T> Clone for CollectionFetcher<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            translator: self.translator.clone(),
        }
    }
}

impl<T: Send + 'static> CollectionFetcher<T> {
    /// Creates a fetcher over one collection source.
    #[must_use]
    pub fn new(source: Arc<dyn CollectionSource<T>>, translator: FilterTranslator) -> Self {
        Self { source, translator }
    }

    /// Returns the translator used for filter criteria.
    #[must_use]
    pub fn translator(&self) -> &FilterTranslator {
        &self.translator
    }

    /// Fetches one filtered, sorted page.
    ///
    /// Criteria that cannot match any record yield an empty page without a
    /// backend call.
    pub async fn fetch_page(
        &self,
        limit: usize,
        offset: usize,
        filter_sort: &FilterSortConfiguration,
    ) -> AppResult<Page<T>> {
        if limit == 0 {
            return Err(AppError::Validation(
                "page limit must be greater than zero".to_owned(),
            ));
        }

        let translation = self.translator.translate(filter_sort)?;
        if !translation.is_satisfiable() {
            return Ok(Page::empty());
        }

        self.source
            .fetch_page(&translation.into_query(limit, offset))
            .await
    }

    /// Fetches every record of the collection, unfiltered.
    pub async fn fetch_all(&self, sort: Option<SortDirective>) -> AppResult<Vec<T>> {
        let mut records = Vec::new();
        let mut offset = 0;

        loop {
            let mut query = CollectionQuery::page(FETCH_ALL_PAGE_SIZE, offset);
            query.sort = sort.clone();

            let page = self.source.fetch_page(&query).await?;
            let has_more = page.has_more_after(offset);
            let next_offset = page.following_offset(offset);
            let exhausted = page.results.is_empty();
            records.extend(page.results);

            if exhausted || !has_more || next_offset <= offset {
                return Ok(records);
            }
            offset = next_offset;
        }
    }
}

#[cfg(test)]
mod tests;
