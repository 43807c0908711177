use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::cache::DEFAULT_CACHE_EXPIRY;
use crate::error::ValidationError;
use crate::retry::RetryPolicy;

pub const DEFAULT_ENDPOINT: &str = "https://models.dev/api.json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_BASE: Duration = Duration::from_secs(1);
pub const DEFAULT_ALLOWED_PROVIDERS: [&str; 3] = ["deepseek", "moonshotai", "zhipuai"];

/// Service-level configuration for [`CatalogSync`](crate::CatalogSync).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub endpoint: String,
    /// Deadline for a single attempt.
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay_base: Duration,
    /// Provider keys kept by the adapter.
    pub allowed_providers: Vec<String>,
    pub cache_expiry: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from(DEFAULT_ENDPOINT),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_base: DEFAULT_RETRY_DELAY_BASE,
            allowed_providers: DEFAULT_ALLOWED_PROVIDERS
                .iter()
                .map(|key| (*key).to_owned())
                .collect(),
            cache_expiry: DEFAULT_CACHE_EXPIRY,
        }
    }
}

impl SyncConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay_base(mut self, delay: Duration) -> Self {
        self.retry_delay_base = delay;
        self
    }

    pub fn with_allowed_providers<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_providers = providers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cache_expiry(mut self, expiry: Duration) -> Self {
        self.cache_expiry = expiry;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(ValidationError::EmptyEndpoint);
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ValidationError::InvalidEndpoint {
                value: self.endpoint.clone(),
            });
        }
        if self.timeout.is_zero() {
            return Err(ValidationError::ZeroTimeout);
        }
        if self.allowed_providers.iter().all(|key| key.trim().is_empty()) {
            return Err(ValidationError::EmptyAllowList);
        }
        Ok(())
    }

    /// Retry policy after applying per-call overrides.
    pub fn retry_policy(&self, options: &FetchOptions) -> RetryPolicy {
        RetryPolicy::new(
            options.max_retries.unwrap_or(self.max_retries),
            self.retry_delay_base,
        )
    }

    /// Per-attempt deadline after applying per-call overrides.
    ///
    /// A zero override is ignored, the same way [`validate`](Self::validate)
    /// rejects a zero configured timeout.
    pub fn effective_timeout(&self, options: &FetchOptions) -> Duration {
        options
            .timeout
            .filter(|timeout| !timeout.is_zero())
            .unwrap_or(self.timeout)
    }
}

/// Per-call options for sync operations.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub timeout: Option<Duration>,
    pub max_retries: Option<u32>,
    /// Cancels the whole operation, including backoff sleeps.
    pub cancel: Option<CancellationToken>,
    /// Skip the fresh-cache shortcut and always go to the remote endpoint.
    pub force_refresh: bool,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }
}
