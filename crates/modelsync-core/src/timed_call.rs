//! Single cancellable HTTP GET bounded by a deadline.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::FetchError;
use crate::http_client::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Issues one GET against `url`, with no retries.
///
/// A per-call token, a child of `cancel` when one is given, is the merged
/// abort signal. The deadline cancels it as well, so after either source
/// fires the merged token stays cancelled. Caller cancellation always wins
/// over the deadline and is reported as [`FetchError::Aborted`].
///
/// Non-2xx responses are returned as [`FetchError::ServerError`].
pub async fn timed_get(
    client: &dyn HttpClient,
    url: &str,
    timeout: Duration,
    cancel: Option<&CancellationToken>,
) -> Result<HttpResponse, FetchError> {
    let merged = cancel
        .map(CancellationToken::child_token)
        .unwrap_or_default();

    if merged.is_cancelled() {
        return Err(FetchError::aborted());
    }

    let request = HttpRequest::get(url).with_header("accept", "application/json");
    let in_flight = client.execute(request);

    let result = tokio::select! {
        biased;
        _ = merged.cancelled() => return Err(FetchError::aborted()),
        _ = tokio::time::sleep(timeout) => {
            merged.cancel();
            debug!(url, timeout_ms = timeout.as_millis() as u64, "request deadline elapsed");
            return Err(FetchError::timeout(timeout));
        }
        result = in_flight => result,
    };

    let response = result.map_err(|error| transport_error(error, timeout))?;
    if !response.is_success() {
        return Err(FetchError::server(response.status));
    }

    Ok(response)
}

fn transport_error(error: HttpError, timeout: Duration) -> FetchError {
    if error.is_timeout() {
        FetchError::NetworkTimeout {
            message: error.message().to_owned(),
            timeout,
        }
    } else {
        FetchError::network_with_source(error.message().to_owned(), error)
    }
}
