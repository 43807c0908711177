//! `cache show` and `cache status` commands.

use modelsync_core::{adapt_catalog, CatalogSync, DataSource, FetchErrorKind, UtcDateTime};
use serde::Serialize;
use serde_json::json;

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct CacheStatus {
    cached: bool,
    last_remote_update: UtcDateTime,
    age_seconds: i64,
    fresh: bool,
    expiry_seconds: u64,
    provider_count: usize,
    allowed_provider_count: usize,
}

pub async fn show(sync: &CatalogSync) -> Result<CommandResult, CliError> {
    let snapshot = sync.cache().load_snapshot().await?;
    let providers = adapt_catalog(&snapshot.api_response, &sync.config().allowed_providers);

    Ok(CommandResult::ok(serde_json::to_value(providers)?)
        .with_source(DataSource::Cache, snapshot.metadata.last_remote_update))
}

pub async fn status(sync: &CatalogSync) -> Result<CommandResult, CliError> {
    let cache = sync.cache();
    let snapshot = match cache.load_snapshot().await {
        Ok(snapshot) => snapshot,
        Err(error) if error.kind() == FetchErrorKind::NoCache => {
            return Ok(CommandResult::ok(json!({ "cached": false })));
        }
        Err(error) => return Err(error.into()),
    };

    let now = UtcDateTime::now();
    let last_remote_update = snapshot.metadata.last_remote_update;
    let status = CacheStatus {
        cached: true,
        last_remote_update,
        age_seconds: last_remote_update.elapsed_until(now).whole_seconds(),
        fresh: cache.is_fresh_at(last_remote_update, now),
        expiry_seconds: cache.expiry().as_secs(),
        provider_count: snapshot.api_response.len(),
        allowed_provider_count: adapt_catalog(
            &snapshot.api_response,
            &sync.config().allowed_providers,
        )
        .len(),
    };

    let mut result = CommandResult::ok(serde_json::to_value(&status)?)
        .with_source(DataSource::Cache, last_remote_update);
    if !status.fresh {
        result = result.with_warning(format!(
            "cached catalog is stale (last remote update {last_remote_update})"
        ));
    }
    Ok(result)
}
