mod cache;
mod fetch;

use std::sync::Arc;

use modelsync_core::{CatalogSync, DataSource, ReqwestHttpClient, UtcDateTime};
use modelsync_store::JsonFileStore;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::{CacheCommand, Cli, Command};
use crate::error::CliError;
use crate::metadata::Metadata;
use crate::output::Envelope;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub source: Option<DataSource>,
    pub last_remote_update: Option<UtcDateTime>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            source: None,
            last_remote_update: None,
        }
    }

    pub fn with_source(mut self, source: DataSource, last_remote_update: UtcDateTime) -> Self {
        self.source = Some(source);
        self.last_remote_update = Some(last_remote_update);
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

pub async fn run(cli: &Cli, cancel: CancellationToken) -> Result<Envelope, CliError> {
    let config = cli.sync_config();
    debug!(
        endpoint = %config.endpoint,
        cache_file = %cli.cache_file.display(),
        providers = ?config.allowed_providers,
        "starting command"
    );

    let sync = CatalogSync::new(
        config,
        Arc::new(ReqwestHttpClient::new()),
        Arc::new(JsonFileStore::new(&cli.cache_file)),
    )?;

    let result = match &cli.command {
        Command::Fetch(args) => fetch::run_fetch(&sync, args, cancel).await?,
        Command::Sync => fetch::run_sync(&sync, cancel).await?,
        Command::Cache(args) => match args.command {
            CacheCommand::Show => cache::show(&sync).await?,
            CacheCommand::Status => cache::status(&sync).await?,
        },
    };

    let CommandResult {
        data,
        warnings,
        source,
        last_remote_update,
    } = result;

    let mut meta = Metadata::new(source, last_remote_update);
    for warning in warnings {
        meta.push_warning(warning);
    }

    Ok(Envelope { data, meta })
}
