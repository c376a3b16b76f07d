//! Translation of UI filter and sort state into backend criteria.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use eca_core::{AppError, AppResult};
use eca_domain::{ColumnCatalog, ColumnKind, FilterSortConfiguration, SortDirective};

use crate::collection_ports::{CollectionFilter, CollectionQuery, FilterValue};

/// Longest accepted search text, in characters.
pub const MAX_SEARCH_TEXT_LENGTH: usize = 256;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// Backend criteria derived from one filter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterTranslation {
    /// Translated filters in column-key order.
    pub filters: Vec<CollectionFilter>,
    /// Winning sort, if any column is sorted.
    pub sort: Option<SortDirective>,
    /// Zone attached because a date filter is present.
    pub time_zone: Option<String>,
    /// First enumerated column whose search text matched no label.
    pub unmatched_column: Option<String>,
}

impl FilterTranslation {
    /// Returns whether the criteria can match any record.
    #[must_use]
    pub fn is_satisfiable(&self) -> bool {
        self.unmatched_column.is_none()
    }

    /// Builds the page query for these criteria.
    #[must_use]
    pub fn into_query(self, limit: usize, offset: usize) -> CollectionQuery {
        CollectionQuery {
            limit,
            offset,
            sort: self.sort,
            filters: self.filters,
            time_zone: self.time_zone,
        }
    }
}

/// Translates column search texts by column kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterTranslator {
    columns: ColumnCatalog,
    time_zone: String,
}

impl FilterTranslator {
    /// Creates a translator for one column catalog and IANA zone name.
    ///
    /// The zone is stored under its canonical database name.
    pub fn new(columns: ColumnCatalog, time_zone: impl Into<String>) -> AppResult<Self> {
        let time_zone = parse_time_zone(time_zone.into().as_str())?.name().to_owned();

        Ok(Self { columns, time_zone })
    }

    /// Returns the configured zone name.
    #[must_use]
    pub fn time_zone(&self) -> &str {
        self.time_zone.as_str()
    }

    /// Translates the active filters and sort of `configuration`.
    pub fn translate(&self, configuration: &FilterSortConfiguration) -> AppResult<FilterTranslation> {
        let mut translation = FilterTranslation {
            filters: Vec::new(),
            sort: configuration.active_sort(),
            time_zone: None,
            unmatched_column: None,
        };

        for (key, search_text) in configuration.active_filters() {
            if search_text.chars().count() > MAX_SEARCH_TEXT_LENGTH {
                return Err(AppError::Validation(format!(
                    "search text for column '{key}' exceeds {MAX_SEARCH_TEXT_LENGTH} characters"
                )));
            }

            let value = match self.columns.kind_of(key) {
                ColumnKind::Text => FilterValue::One(search_text.to_owned()),
                ColumnKind::Enumerated(labels) => {
                    let values = labels.matching_values(search_text);
                    if values.is_empty() {
                        if translation.unmatched_column.is_none() {
                            translation.unmatched_column = Some(key.to_owned());
                        }
                        continue;
                    }
                    FilterValue::Many(values.into_iter().map(str::to_owned).collect())
                }
                ColumnKind::Date => {
                    let date = parse_filter_date(search_text).map_err(|_| {
                        AppError::Validation(format!(
                            "column '{key}' expects a date such as 2024-03-15, got '{search_text}'"
                        ))
                    })?;
                    translation.time_zone = Some(self.time_zone.clone());
                    FilterValue::One(date.format("%Y-%m-%d").to_string())
                }
            };

            translation.filters.push(CollectionFilter {
                key: key.to_owned(),
                value,
            });
        }

        Ok(translation)
    }
}

/// Parses a date typed into a filter.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `DD/MM/YYYY` and RFC 3339 timestamps;
/// timestamps keep the calendar date of their own offset.
pub fn parse_filter_date(value: &str) -> AppResult<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
        .ok_or_else(|| AppError::Validation(format!("'{value}' is not a recognized date")))
}

/// Looks `value` up in the IANA time zone database.
pub fn parse_time_zone(value: &str) -> AppResult<Tz> {
    let value = value.trim();
    value.parse::<Tz>().map_err(|_| {
        AppError::Validation(format!("'{value}' is not an IANA time zone name"))
    })
}
