use modelsync_core::{FetchError, SyncFailure};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] modelsync_core::ValidationError),

    #[error(transparent)]
    Sync(#[from] SyncFailure),

    #[error("cache unavailable: {0}")]
    Cache(#[from] FetchError),

    #[error("strict mode failed: warnings={warning_count}")]
    StrictModeViolation { warning_count: usize },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Sync(_) | Self::Cache(_) => 3,
            Self::Serialization(_) => 4,
            Self::StrictModeViolation { .. } => 5,
            Self::Io(_) => 10,
        }
    }

    /// Classified causes worth printing under the headline message.
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::Sync(failure) => vec![
                describe("remote", failure.remote_error()),
                describe("cache", failure.cache_error()),
            ],
            Self::Cache(error) => vec![describe("cache", error)],
            _ => Vec::new(),
        }
    }
}

fn describe(tier: &str, error: &FetchError) -> String {
    format!("{tier}: {} {}", error.code(), error.message())
}
