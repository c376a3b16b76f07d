use std::str::FromStr;
use std::time::Duration;

use eca_application::parse_time_zone;
use eca_core::{AppError, AppResult};
use eca_domain::{Collection, FilterSortConfiguration, PAGE_SIZE_OPTIONS, SortDirective};
use tracing::warn;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080/api";
const DEFAULT_SESSION_PATH: &str = "users/current";
const DEFAULT_COLLECTION: &str = "users";
const DEFAULT_TIME_ZONE: &str = "UTC";

#[derive(Clone)]
pub(crate) struct ConsoleConfig {
    pub(crate) api_base_url: String,
    pub(crate) access_token: String,
    pub(crate) session_path: String,
    pub(crate) collection: Collection,
    pub(crate) filter_sort: FilterSortConfiguration,
    pub(crate) sort: Option<SortDirective>,
    pub(crate) time_zone: String,
    pub(crate) http_timeout: Duration,
    pub(crate) page_size: usize,
}

impl ConsoleConfig {
    pub(crate) fn load() -> AppResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let optional = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let api_base_url = optional("ECA_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let access_token = optional("ECA_ACCESS_TOKEN")
            .ok_or_else(|| AppError::Validation("ECA_ACCESS_TOKEN is required".to_owned()))?;
        let session_path =
            optional("ECA_SESSION_PATH").unwrap_or_else(|| DEFAULT_SESSION_PATH.to_owned());

        let collection_name =
            optional("ECA_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_owned());
        let package_id = optional("ECA_PACKAGE_ID");
        let collection = Collection::parse(collection_name.as_str(), package_id.as_deref())?;

        let sort = optional("ECA_SORT")
            .map(|value| SortDirective::from_str(value.as_str()))
            .transpose()?;
        let mut filter_sort = optional("ECA_FILTERS")
            .map(|value| parse_filters(value.as_str()))
            .transpose()?
            .unwrap_or_default();
        if let Some(sort) = &sort {
            filter_sort.set_sort(sort.column(), Some(sort.direction()));
        }

        let time_zone = match optional("ECA_TIME_ZONE") {
            Some(value) => parse_time_zone(value.as_str())?.name().to_owned(),
            None => local_time_zone(optional("TZ").as_deref()),
        };

        let timeout_secs = parse_number(&optional, "ECA_HTTP_TIMEOUT_SECS", 15_u64)?;
        if timeout_secs == 0 {
            return Err(AppError::Validation(
                "ECA_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        let page_size = parse_number(&optional, "ECA_PAGE_SIZE", 25_usize)?;
        if !PAGE_SIZE_OPTIONS.contains(&page_size) {
            return Err(AppError::Validation(format!(
                "ECA_PAGE_SIZE must be one of {PAGE_SIZE_OPTIONS:?}, got {page_size}"
            )));
        }

        Ok(Self {
            api_base_url,
            access_token,
            session_path,
            collection,
            filter_sort,
            sort,
            time_zone,
            http_timeout: Duration::from_secs(timeout_secs),
            page_size,
        })
    }

    pub(crate) fn has_filters(&self) -> bool {
        self.filter_sort.active_filters().next().is_some()
    }
}

fn parse_number<T: FromStr>(
    optional: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> AppResult<T>
where
    T::Err: std::fmt::Display,
{
    match optional(name) {
        Some(value) => value.parse::<T>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}

/// Resolves the local zone from `TZ`, then the operating system, then UTC.
///
/// `TZ` may carry a leading `:` or a zoneinfo file path. POSIX rule strings
/// have no IANA name and fall through to the system zone.
fn local_time_zone(tz: Option<&str>) -> String {
    let from_env = tz.and_then(|value| {
        let name = value.trim_start_matches(':');
        let name = name.rsplit_once("zoneinfo/").map_or(name, |(_, zone)| zone);
        let zone = parse_time_zone(name).ok();
        if zone.is_none() {
            warn!(tz = value, "TZ is not an IANA time zone name, using the system zone");
        }
        zone
    });

    from_env
        .or_else(|| {
            iana_time_zone::get_timezone()
                .ok()
                .and_then(|name| parse_time_zone(name.as_str()).ok())
        })
        .map_or_else(|| DEFAULT_TIME_ZONE.to_owned(), |zone| zone.name().to_owned())
}

/// Parses `key=value;key=value` column search texts.
fn parse_filters(value: &str) -> AppResult<FilterSortConfiguration> {
    let mut configuration = FilterSortConfiguration::new();
    for entry in value.split(';').map(str::trim).filter(|entry| !entry.is_empty()) {
        let (key, search_text) = entry.split_once('=').ok_or_else(|| {
            AppError::Validation(format!(
                "ECA_FILTERS entries must look like 'column=text', got '{entry}'"
            ))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::Validation(format!(
                "ECA_FILTERS entry '{entry}' has no column"
            )));
        }
        configuration.set_search_text(key, search_text.trim());
    }
    Ok(configuration)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use eca_application::parse_time_zone;
    use eca_core::AppError;
    use eca_domain::Collection;

    use super::{ConsoleConfig, local_time_zone};

    fn load(values: &[(&str, &str)]) -> Result<ConsoleConfig, AppError> {
        let values: HashMap<String, String> = values
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        ConsoleConfig::from_lookup(|name| values.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_token_is_set() {
        let Ok(config) = load(&[("ECA_ACCESS_TOKEN", "token")]) else {
            panic!("config should load");
        };

        assert_eq!(config.api_base_url, "http://127.0.0.1:8080/api");
        assert_eq!(config.session_path, "users/current");
        assert_eq!(config.collection, Collection::Users);
        assert!(parse_time_zone(config.time_zone.as_str()).is_ok());
        assert_eq!(config.http_timeout, Duration::from_secs(15));
        assert_eq!(config.page_size, 25);
        assert!(!config.has_filters());
    }

    #[test]
    fn access_token_is_required() {
        assert!(matches!(load(&[]), Err(AppError::Validation(_))));
        assert!(load(&[("ECA_ACCESS_TOKEN", "  ")]).is_err());
    }

    #[test]
    fn filters_sort_and_zone_are_parsed() {
        let Ok(config) = load(&[
            ("ECA_ACCESS_TOKEN", "token"),
            ("ECA_API_BASE_URL", "https://eca.example.com/api/"),
            ("ECA_FILTERS", "isSoftDeleted=activ; createdDate=2024-03-15"),
            ("ECA_SORT", "desc(createdDate)"),
            ("TZ", "Europe/Stockholm"),
        ]) else {
            panic!("config should load");
        };

        assert_eq!(config.api_base_url, "https://eca.example.com/api");
        assert_eq!(config.time_zone, "Europe/Stockholm");
        assert_eq!(
            config.filter_sort.active_filters().collect::<Vec<_>>(),
            vec![("createdDate", "2024-03-15"), ("isSoftDeleted", "activ")]
        );
        assert_eq!(
            config.filter_sort.active_sort().map(|sort| sort.to_string()),
            Some("desc(createdDate)".to_owned())
        );
    }

    #[test]
    fn explicit_time_zone_must_be_known() {
        assert!(matches!(
            load(&[("ECA_ACCESS_TOKEN", "token"), ("ECA_TIME_ZONE", "Not/AZone")]),
            Err(AppError::Validation(_))
        ));

        let config = load(&[
            ("ECA_ACCESS_TOKEN", "token"),
            ("ECA_TIME_ZONE", "America/Sao_Paulo"),
            ("TZ", "Europe/Stockholm"),
        ]);
        assert_eq!(
            config.map(|value| value.time_zone).ok().as_deref(),
            Some("America/Sao_Paulo")
        );
    }

    #[test]
    fn tz_variable_is_resolved_to_an_iana_zone() {
        assert_eq!(local_time_zone(Some(":Europe/Stockholm")), "Europe/Stockholm");
        assert_eq!(
            local_time_zone(Some(":/usr/share/zoneinfo/Asia/Tokyo")),
            "Asia/Tokyo"
        );

        for value in [":/etc/localtime", "CET-1CEST,M3.5.0,M10.5.0/3", "Not/AZone"] {
            let zone = local_time_zone(Some(value));
            assert!(parse_time_zone(zone.as_str()).is_ok(), "{value} resolved to {zone}");
        }
        assert!(load(&[("ECA_ACCESS_TOKEN", "token"), ("TZ", "CET-1CEST,M3.5.0,M10.5.0/3")]).is_ok());
    }

    #[test]
    fn package_collections_need_package_id() {
        assert!(load(&[("ECA_ACCESS_TOKEN", "token"), ("ECA_COLLECTION", "evidences")]).is_err());

        let config = load(&[
            ("ECA_ACCESS_TOKEN", "token"),
            ("ECA_COLLECTION", "evidences"),
            ("ECA_PACKAGE_ID", "PKG-1"),
        ]);
        assert_eq!(
            config.map(|value| value.collection.path()).ok().as_deref(),
            Some("packages/PKG-1/evidences")
        );
    }

    #[test]
    fn rejects_invalid_numbers_and_page_sizes() {
        assert!(load(&[("ECA_ACCESS_TOKEN", "token"), ("ECA_PAGE_SIZE", "30")]).is_err());
        assert!(load(&[("ECA_ACCESS_TOKEN", "token"), ("ECA_PAGE_SIZE", "many")]).is_err());
        assert!(load(&[("ECA_ACCESS_TOKEN", "token"), ("ECA_HTTP_TIMEOUT_SECS", "0")]).is_err());
        assert!(load(&[("ECA_ACCESS_TOKEN", "token"), ("ECA_FILTERS", "novalue")]).is_err());
    }
}
