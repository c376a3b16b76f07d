use async_trait::async_trait;
use eca_core::AppResult;
use eca_domain::{Page, SortDirective};
use serde_json::{Map, Value};

/// Backend value of one translated filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// Single value, such as trimmed free text or a normalized date.
    One(String),
    /// Several enumerated backend values.
    Many(Vec<String>),
}

impl FilterValue {
    /// Returns the query-string rendering; several values are comma-joined.
    #[must_use]
    pub fn to_query_value(&self) -> String {
        match self {
            Self::One(value) => value.clone(),
            Self::Many(values) => values.join(","),
        }
    }

    /// Returns the search-body rendering; several values become an array.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::One(value) => Value::String(value.clone()),
            Self::Many(values) => Value::Array(values.iter().cloned().map(Value::String).collect()),
        }
    }
}

/// One backend filter criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionFilter {
    /// Backend filter key.
    pub key: String,
    /// Translated value.
    pub value: FilterValue,
}

/// Fully translated request for one page of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionQuery {
    /// Maximum records returned.
    pub limit: usize,
    /// Records skipped before the page.
    pub offset: usize,
    /// Optional sort.
    pub sort: Option<SortDirective>,
    /// Filters in column-key order.
    pub filters: Vec<CollectionFilter>,
    /// IANA zone attached when a date filter is present.
    pub time_zone: Option<String>,
}

impl CollectionQuery {
    /// Creates an unfiltered, unsorted page query.
    #[must_use]
    pub fn page(limit: usize, offset: usize) -> Self {
        Self {
            limit,
            offset,
            sort: None,
            filters: Vec::new(),
            time_zone: None,
        }
    }

    /// Returns the pagination, sort and time-zone parameters.
    #[must_use]
    pub fn control_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("limit".to_owned(), self.limit.to_string()),
            ("offset".to_owned(), self.offset.to_string()),
        ];
        if let Some(sort) = &self.sort {
            pairs.push(("sort".to_owned(), sort.to_string()));
        }
        if let Some(time_zone) = &self.time_zone {
            pairs.push(("timeZone".to_owned(), time_zone.clone()));
        }
        pairs
    }

    /// Returns every parameter of a query-string request, filters included.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.control_pairs();
        pairs.extend(
            self.filters
                .iter()
                .map(|filter| (filter.key.clone(), filter.value.to_query_value())),
        );
        pairs
    }

    /// Returns the JSON body of a search request.
    #[must_use]
    pub fn search_body(&self) -> Value {
        let body: Map<String, Value> = self
            .filters
            .iter()
            .map(|filter| (filter.key.clone(), filter.value.to_json()))
            .collect();
        Value::Object(body)
    }
}

/// Port for retrieving one page of a collection.
#[async_trait]
pub trait CollectionSource<T>: Send + Sync {
    /// Fetches the page described by `query`.
    async fn fetch_page(&self, query: &CollectionQuery) -> AppResult<Page<T>>;
}
