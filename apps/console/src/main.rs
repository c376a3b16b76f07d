//! ECA collection console: loads the signed-in session, checks access and
//! streams one collection as JSON lines.

#![forbid(unsafe_code)]

mod config;

use std::sync::Arc;

use eca_application::{
    CollectionFetcher, FilterTranslator, ListViewState, PackagePermissionResolver,
    PermissionResolver, SessionService, SessionStore,
};
use eca_core::{AppError, AppResult, SessionTokens, UserSession};
use eca_domain::{
    AppPermissionTable, Collection, ComponentActionPermission, PackageMember,
    PackagePermissionTable,
};
use eca_infrastructure::{EcaApiClient, HttpCollectionSource, HttpSessionSource};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ConsoleConfig;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;
    if let Err(error) = run(config).await {
        warn!(error = %error, "{}", error.user_message());
        return Err(error);
    }

    Ok(())
}

async fn run(config: ConsoleConfig) -> AppResult<()> {
    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
    let client = EcaApiClient::new(
        http_client,
        config.api_base_url.as_str(),
        Some(config.access_token.clone()),
    )?;

    let sessions = SessionStore::new();
    let session_service = SessionService::new(
        Arc::new(HttpSessionSource::new(
            client.clone(),
            config.session_path.as_str(),
        )),
        sessions.clone(),
    );
    let session = session_service
        .sign_in(SessionTokens::new(config.access_token.as_str(), None))
        .await?;

    let resolver = PermissionResolver::new(Arc::new(AppPermissionTable::standard()), sessions);
    info!(
        signum = %session.signum(),
        permissions = resolver.permissions_for(resolver.session_roles().as_slice()).len(),
        "session loaded"
    );
    resolver.require_session_permission(config.collection.required_permission())?;
    authorize_package_access(&client, &config, &session).await?;

    let translator = FilterTranslator::new(config.collection.columns(), config.time_zone.as_str())?;
    let fetcher = CollectionFetcher::<Value>::new(
        Arc::new(HttpCollectionSource::new(client, config.collection.clone())),
        translator,
    );

    let emitted = if config.has_filters() {
        stream_filtered_pages(&fetcher, &config).await?
    } else {
        let records = fetcher.fetch_all(config.sort.clone()).await?;
        records.iter().try_for_each(emit_record)?;
        records.len()
    };

    info!(
        collection = %config.collection.path(),
        records = emitted,
        "collection streamed"
    );
    Ok(())
}

async fn authorize_package_access(
    client: &EcaApiClient,
    config: &ConsoleConfig,
    session: &UserSession,
) -> AppResult<()> {
    let (Some(permission), Some(package_id)) = (
        config.collection.required_package_permission(),
        config.collection.package_id(),
    ) else {
        return Ok(());
    };

    let members_collection = Collection::package_members(package_id)?;
    let members = CollectionFetcher::<PackageMember>::new(
        Arc::new(HttpCollectionSource::new(
            client.clone(),
            members_collection.clone(),
        )),
        FilterTranslator::new(members_collection.columns(), config.time_zone.as_str())?,
    );

    let package_resolver =
        PackagePermissionResolver::new(Arc::new(PackagePermissionTable::standard()));
    let role = package_resolver
        .load_membership(&members, session.signum())
        .await?;
    info!(package_id, role = role.as_str(), "package membership loaded");

    require_package_permission(&package_resolver, permission, package_id, session.signum())
}

fn require_package_permission(
    resolver: &PackagePermissionResolver,
    permission: ComponentActionPermission,
    package_id: &str,
    signum: &str,
) -> AppResult<()> {
    if resolver.is_authorized(Some(permission)) {
        return Ok(());
    }

    Err(AppError::Forbidden(format!(
        "subject '{signum}' is missing package permission '{}' on '{package_id}'",
        permission.as_str()
    )))
}

async fn stream_filtered_pages(
    fetcher: &CollectionFetcher<Value>,
    config: &ConsoleConfig,
) -> AppResult<usize> {
    let mut view = ListViewState::new(config.filter_sort.clone());
    view.set_page_size(config.page_size)?;

    let mut emitted = 0_usize;
    loop {
        view.refresh(fetcher).await?;
        let Some(page) = view.page() else {
            return Ok(emitted);
        };

        page.results.iter().try_for_each(emit_record)?;
        emitted = emitted.saturating_add(page.results.len());

        if page.results.is_empty() || !page.has_more_after(view.offset()) {
            return Ok(emitted);
        }
        let next_page = view.page_index().saturating_add(1);
        view.set_page(next_page);
    }
}

fn emit_record(record: &Value) -> AppResult<()> {
    let line = serde_json::to_string(record)
        .map_err(|error| AppError::Internal(format!("failed to encode record: {error}")))?;
    println!("{line}");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
