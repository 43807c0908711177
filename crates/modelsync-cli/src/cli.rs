//! CLI argument definitions for modelsync.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fetch` | Return providers, using a fresh cache when one exists |
//! | `sync` | Always contact the remote catalog, falling back to the cache |
//! | `cache show` | Print cached providers through the current allow-list |
//! | `cache status` | Print cache age, freshness and size |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--endpoint` | `https://models.dev/api.json` | Catalog URL (`MODELSYNC_ENDPOINT`) |
//! | `--cache-file` | `remote-cache.json` | Cache document (`MODELSYNC_CACHE_FILE`) |
//! | `--timeout-ms` | `10000` | Deadline per attempt |
//! | `--max-retries` | `3` | Retries after the first attempt |
//! | `--retry-delay-ms` | `1000` | Base backoff delay |
//! | `--provider` | deepseek, moonshotai, zhipuai | Allow-list entry, repeatable |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//!
//! # Examples
//!
//! ```bash
//! modelsync fetch --pretty
//! modelsync sync --provider deepseek --provider openai
//! MODELSYNC_CACHE_FILE=/tmp/cache.json modelsync cache status
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use modelsync_core::SyncConfig;

/// Fetch and cache the remote model provider catalog.
#[derive(Debug, Parser)]
#[command(
    name = "modelsync",
    author,
    version,
    about = "Fetch and cache the remote model provider catalog"
)]
pub struct Cli {
    /// Catalog endpoint URL.
    #[arg(long, global = true, env = "MODELSYNC_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Path of the JSON cache document.
    #[arg(
        long,
        global = true,
        env = "MODELSYNC_CACHE_FILE",
        default_value = "remote-cache.json"
    )]
    pub cache_file: PathBuf,

    /// Deadline for a single attempt in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Retries after the first failed attempt.
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Base delay before the first retry in milliseconds; doubles per retry.
    #[arg(long, global = true)]
    pub retry_delay_ms: Option<u64>,

    /// Provider key to keep. Repeat to build the allow-list.
    #[arg(long = "provider", global = true, action = ArgAction::Append)]
    pub providers: Vec<String>,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings (stale data) as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Raise log verbosity (-v debug, -vv trace). `RUST_LOG` wins when set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Service configuration with flag overrides applied on top of defaults.
    pub fn sync_config(&self) -> SyncConfig {
        let mut config = SyncConfig::default();
        if let Some(endpoint) = &self.endpoint {
            config = config.with_endpoint(endpoint.clone());
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config = config.with_timeout(Duration::from_millis(timeout_ms));
        }
        if let Some(max_retries) = self.max_retries {
            config = config.with_max_retries(max_retries);
        }
        if let Some(delay_ms) = self.retry_delay_ms {
            config = config.with_retry_delay_base(Duration::from_millis(delay_ms));
        }
        if !self.providers.is_empty() {
            config = config.with_allowed_providers(self.providers.iter().cloned());
        }
        config
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Return providers, serving a fresh cache without a network call.
    Fetch(FetchArgs),
    /// Fetch from the remote catalog and update the cache.
    Sync,
    /// Inspect the local cache.
    Cache(CacheArgs),
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Ignore a fresh cache and go to the remote catalog.
    #[arg(long, default_value_t = false)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Print cached providers filtered by the current allow-list.
    Show,
    /// Print when the cache was written and whether it is still fresh.
    Status,
}
