//! Application services and ports.

#![forbid(unsafe_code)]

mod collection_fetcher;
mod collection_ports;
mod filter_translator;
mod list_view;
mod permission_resolver;
mod session_service;

pub use collection_fetcher::CollectionFetcher;
pub use collection_ports::{CollectionFilter, CollectionQuery, CollectionSource, FilterValue};
pub use filter_translator::{
    FilterTranslation, FilterTranslator, MAX_SEARCH_TEXT_LENGTH, parse_filter_date,
    parse_time_zone,
};
pub use list_view::{ListViewState, RequestSequence, RequestTicket};
pub use permission_resolver::{PackagePermissionResolver, PermissionResolver};
pub use session_service::{SessionService, SessionSource, SessionStore};
