//! `fetch` and `sync` commands.

use modelsync_core::{CatalogSync, FetchOptions, SyncOutcome};
use tokio_util::sync::CancellationToken;

use crate::cli::FetchArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run_fetch(
    sync: &CatalogSync,
    args: &FetchArgs,
    cancel: CancellationToken,
) -> Result<CommandResult, CliError> {
    let options = FetchOptions::new().with_cancel(cancel);
    let outcome = if args.force {
        sync.refresh(options).await?
    } else {
        sync.load_or_fetch(options).await?
    };
    outcome_result(outcome)
}

pub async fn run_sync(
    sync: &CatalogSync,
    cancel: CancellationToken,
) -> Result<CommandResult, CliError> {
    let outcome = sync
        .fetch_and_sync(FetchOptions::new().with_cancel(cancel))
        .await?;
    outcome_result(outcome)
}

fn outcome_result(outcome: SyncOutcome) -> Result<CommandResult, CliError> {
    let mut result = CommandResult::ok(serde_json::to_value(&outcome.providers)?)
        .with_source(outcome.source(), outcome.last_remote_update());

    if let Some(error) = outcome.remote_error() {
        result = result.with_warning(stale_warning(error.code(), error.message(), &outcome));
    }

    Ok(result)
}

fn stale_warning(code: &str, message: &str, outcome: &SyncOutcome) -> String {
    format!(
        "remote catalog unavailable ({code}: {message}); serving cached data from {}",
        outcome.last_remote_update()
    )
}

#[cfg(test)]
mod tests {
    use modelsync_core::{FetchError, Freshness, ModelDetail, ProviderCatalogEntry, UtcDateTime};

    use super::*;

    fn entry() -> ProviderCatalogEntry {
        ProviderCatalogEntry {
            provider_key: String::from("zhipuai"),
            provider_name: String::from("Zhipu AI"),
            api_address: String::from("https://open.bigmodel.cn/api/paas/v4"),
            models: vec![ModelDetail {
                model_key: String::from("glm-4.5"),
                model_name: String::from("GLM-4.5"),
            }],
        }
    }

    #[test]
    fn degraded_outcome_carries_a_warning() {
        let at = UtcDateTime::parse("2024-07-01T00:00:00Z").expect("timestamp");
        let outcome = SyncOutcome {
            providers: vec![entry()],
            freshness: Freshness::Cached {
                last_remote_update: at,
                remote_error: Some(FetchError::server(502)),
            },
        };

        let result = outcome_result(outcome).expect("result");

        assert_eq!(result.data[0]["providerKey"], "zhipuai");
        assert_eq!(
            result.warnings,
            ["remote catalog unavailable (SERVER_ERROR: server responded with status 502); \
              serving cached data from 2024-07-01T00:00:00Z"]
        );
        assert_eq!(result.last_remote_update, Some(at));
    }

    #[test]
    fn fresh_outcome_has_no_warning() {
        let outcome = SyncOutcome {
            providers: vec![entry()],
            freshness: Freshness::Remote {
                last_remote_update: UtcDateTime::now(),
            },
        };

        let result = outcome_result(outcome).expect("result");

        assert!(result.warnings.is_empty());
        assert_eq!(result.source, Some(modelsync_core::DataSource::Remote));
    }
}
