//! Filter, sort and pagination state shared by every list view.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use eca_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Page sizes offered by list views.
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [10, 25, 50, 75, 100];

/// Page size used when a view is first opened.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Page size used when accumulating a whole collection.
pub const FETCH_ALL_PAGE_SIZE: usize = 100;

/// Sort direction for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Returns the stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Parses a UI sorting order where the empty string means "unsorted".
    pub fn parse_optional(value: &str) -> AppResult<Option<Self>> {
        match value.trim() {
            "" => Ok(None),
            other => Self::from_str(other).map(Some),
        }
    }
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(AppError::Validation(format!(
                "unknown sort direction '{value}'"
            ))),
        }
    }
}

/// A `sort=<direction>(<column>)` instruction sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDirective {
    column: NonEmptyString,
    direction: SortDirection,
}

impl SortDirective {
    /// Creates a validated sort directive.
    pub fn new(column: impl Into<String>, direction: SortDirection) -> AppResult<Self> {
        Ok(Self {
            column: NonEmptyString::new(column)?,
            direction,
        })
    }

    /// Returns the sorted column key.
    #[must_use]
    pub fn column(&self) -> &str {
        self.column.as_str()
    }

    /// Returns the sort direction.
    #[must_use]
    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}

impl Display for SortDirective {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}({})", self.direction.as_str(), self.column)
    }
}

impl FromStr for SortDirective {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            AppError::Validation(format!(
                "sort must look like 'asc(column)' or 'desc(column)', got '{value}'"
            ))
        };

        let trimmed = value.trim();
        let (direction, rest) = trimmed.split_once('(').ok_or_else(invalid)?;
        let column = rest.strip_suffix(')').ok_or_else(invalid)?;
        let direction = SortDirection::from_str(direction.trim()).map_err(|_| invalid())?;

        Self::new(column.trim(), direction).map_err(|_| invalid())
    }
}

/// UI filter and sort state of one column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnFilter {
    /// Column header shown to the user.
    pub column_name: String,
    /// Typed filter text; empty means "no filter".
    #[serde(default)]
    pub search_text: String,
    /// Active sort direction, serialized as `''`, `'asc'` or `'desc'`.
    #[serde(default, with = "sorting_order")]
    pub sorting_order: Option<SortDirection>,
    /// Position of the column among sortable columns.
    #[serde(default)]
    pub sorting_index: u32,
    /// Suggested values offered by the filter input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl ColumnFilter {
    /// Creates an unfiltered, unsorted column.
    #[must_use]
    pub fn new(column_name: impl Into<String>, sorting_index: u32) -> Self {
        Self {
            column_name: column_name.into(),
            sorting_index,
            ..Self::default()
        }
    }

    /// Returns the trimmed search text when the column is filtered.
    #[must_use]
    pub fn active_search_text(&self) -> Option<&str> {
        let trimmed = self.search_text.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Filter and sort state of a list view, keyed by column key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSortConfiguration {
    columns: BTreeMap<String, ColumnFilter>,
}

impl FilterSortConfiguration {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces one column.
    pub fn insert(&mut self, key: impl Into<String>, column: ColumnFilter) {
        self.columns.insert(key.into(), column);
    }

    /// Builder form of [`FilterSortConfiguration::insert`].
    #[must_use]
    pub fn with_column(mut self, key: impl Into<String>, column: ColumnFilter) -> Self {
        self.insert(key, column);
        self
    }

    /// Sets the search text of a column, creating the column when needed.
    pub fn set_search_text(&mut self, key: &str, search_text: impl Into<String>) {
        let next_index = self.next_sorting_index();
        self.columns
            .entry(key.to_owned())
            .or_insert_with(|| ColumnFilter::new(key, next_index))
            .search_text = search_text.into();
    }

    /// Sorts by one column and clears the sort order of every other column.
    pub fn set_sort(&mut self, key: &str, direction: Option<SortDirection>) {
        let next_index = self.next_sorting_index();
        for (column_key, column) in &mut self.columns {
            if column_key != key {
                column.sorting_order = None;
            }
        }

        self.columns
            .entry(key.to_owned())
            .or_insert_with(|| ColumnFilter::new(key, next_index))
            .sorting_order = direction;
    }

    /// Clears every search text, keeping the sort.
    pub fn clear_filters(&mut self) {
        for column in self.columns.values_mut() {
            column.search_text.clear();
        }
    }

    /// Returns one column.
    #[must_use]
    pub fn column(&self, key: &str) -> Option<&ColumnFilter> {
        self.columns.get(key)
    }

    /// Iterates over columns that carry a non-empty search text.
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().filter_map(|(key, column)| {
            column
                .active_search_text()
                .map(|search_text| (key.as_str(), search_text))
        })
    }

    /// Returns the active sort.
    ///
    /// When several columns carry a sort order the one with the lowest
    /// sorting index wins, ties broken by column key.
    #[must_use]
    pub fn active_sort(&self) -> Option<SortDirective> {
        self.columns
            .iter()
            .filter_map(|(key, column)| {
                column
                    .sorting_order
                    .map(|direction| (column.sorting_index, key, direction))
            })
            .min_by(|left, right| (left.0, left.1).cmp(&(right.0, right.1)))
            .and_then(|(_, key, direction)| SortDirective::new(key.as_str(), direction).ok())
    }

    fn next_sorting_index(&self) -> u32 {
        self.columns
            .values()
            .map(|column| column.sorting_index.saturating_add(1))
            .max()
            .unwrap_or(0)
    }
}

/// One page of a server-side collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Records in this page, in backend order.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    /// Total records matching the current filter.
    #[serde(default)]
    pub total_records: usize,
    /// Whether the backend has records after this page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub more_pages: Option<bool>,
    /// Offset of the next page, when the backend supplies a cursor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_offset: Option<usize>,
}

impl<T> Page<T> {
    /// Returns a page with no results and a zero total.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            total_records: 0,
            more_pages: Some(false),
            next_offset: None,
        }
    }

    /// Returns whether more records follow a page fetched at `offset`.
    ///
    /// Uses `morePages` when present, otherwise compares against the total.
    #[must_use]
    pub fn has_more_after(&self, offset: usize) -> bool {
        self.more_pages.unwrap_or_else(|| {
            offset.saturating_add(self.results.len()) < self.total_records
        })
    }

    /// Returns the offset of the following page.
    #[must_use]
    pub fn following_offset(&self, offset: usize) -> usize {
        self.next_offset
            .unwrap_or_else(|| offset.saturating_add(self.results.len()))
    }
}

mod sorting_order {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::SortDirection;

    pub(super) fn serialize<S: Serializer>(
        value: &Option<SortDirection>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.map(|direction| direction.as_str()).unwrap_or(""))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<SortDirection>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        SortDirection::parse_optional(value.as_str()).map_err(serde::de::Error::custom)
    }
}
