//! Shared fakes and fixtures for behaviour tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use modelsync_core::{
    CatalogSync, HttpClient, HttpError, HttpRequest, HttpResponse, KeyValueStore, MemoryStore,
    RawCatalogResponse, SyncConfig, WireProvider,
};
use serde_json::{json, Value};
use tokio::time::Instant;

/// One scripted transport reaction.
#[derive(Debug, Clone)]
pub enum Step {
    Respond(u16, String),
    Fail(HttpError),
    /// Never completes; only a deadline or cancellation ends the attempt.
    Hang,
}

impl Step {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::Respond(200, body.into())
    }

    pub fn status(status: u16) -> Self {
        Self::Respond(status, String::from("{}"))
    }
}

/// Fake transport that replays a script and records every attempt.
///
/// When the script runs out, its last step repeats.
pub struct ScriptedHttpClient {
    script: Mutex<VecDeque<Step>>,
    last: Mutex<Option<Step>>,
    attempts: Mutex<Vec<(Instant, String)>>,
}

impl ScriptedHttpClient {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(steps.into_iter().collect()),
            last: Mutex::new(None),
            attempts: Mutex::new(Vec::new()),
        })
    }

    pub fn always(step: Step) -> Arc<Self> {
        Self::new([step])
    }

    pub fn attempts(&self) -> usize {
        self.attempts.lock().expect("attempt log").len()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.attempts
            .lock()
            .expect("attempt log")
            .iter()
            .map(|(_, url)| url.clone())
            .collect()
    }

    /// Time between consecutive attempts.
    pub fn gaps(&self) -> Vec<Duration> {
        let attempts = self.attempts.lock().expect("attempt log");
        attempts
            .windows(2)
            .map(|pair| pair[1].0.duration_since(pair[0].0))
            .collect()
    }

    fn next_step(&self) -> Step {
        let mut script = self.script.lock().expect("script");
        let mut last = self.last.lock().expect("last step");
        if let Some(step) = script.pop_front() {
            *last = Some(step.clone());
            return step;
        }
        last.clone()
            .unwrap_or_else(|| Step::Fail(HttpError::new("script is empty")))
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.attempts
            .lock()
            .expect("attempt log")
            .push((Instant::now(), request.url.clone()));
        let step = self.next_step();

        Box::pin(async move {
            match step {
                Step::Respond(status, body) => Ok(HttpResponse::with_status(status, body)),
                Step::Fail(error) => Err(error),
                Step::Hang => std::future::pending().await,
            }
        })
    }
}

pub const ENDPOINT: &str = "https://catalog.test/api.json";

/// Config pointing at the fake endpoint with short, test-friendly delays.
pub fn test_config() -> SyncConfig {
    SyncConfig::default()
        .with_endpoint(ENDPOINT)
        .with_retry_delay_base(Duration::from_millis(100))
        .with_timeout(Duration::from_secs(2))
}

pub fn build_sync(
    config: SyncConfig,
    client: Arc<ScriptedHttpClient>,
    store: Arc<dyn KeyValueStore>,
) -> CatalogSync {
    CatalogSync::new(config, client, store).expect("valid config")
}

pub fn memory_sync(
    config: SyncConfig,
    client: Arc<ScriptedHttpClient>,
) -> (CatalogSync, MemoryStore) {
    let store = MemoryStore::new();
    let sync = build_sync(config, client, Arc::new(store.clone()));
    (sync, store)
}

/// Catalog shaped like the public models.dev payload, trimmed.
pub fn catalog_payload() -> Value {
    json!({
        "deepseek": {
            "id": "deepseek",
            "env": ["DEEPSEEK_API_KEY"],
            "npm": "@ai-sdk/deepseek",
            "api": "https://api.deepseek.com",
            "name": "DeepSeek",
            "doc": "https://platform.deepseek.com/api-docs/pricing",
            "models": {
                "deepseek-chat": {
                    "id": "deepseek-chat",
                    "name": "DeepSeek Chat",
                    "tool_call": true,
                    "limit": { "context": 128000, "output": 8192 }
                },
                "deepseek-reasoner": {
                    "id": "deepseek-reasoner",
                    "name": "DeepSeek Reasoner",
                    "reasoning": true
                }
            }
        },
        "moonshotai": {
            "id": "moonshotai",
            "env": ["MOONSHOT_API_KEY"],
            "api": "https://api.moonshot.ai/v1",
            "name": "Moonshot AI",
            "models": {
                "kimi-k2-0711-preview": {
                    "id": "kimi-k2-0711-preview",
                    "name": "Kimi K2"
                }
            }
        },
        "openai": {
            "id": "openai",
            "env": ["OPENAI_API_KEY"],
            "name": "OpenAI",
            "models": {
                "gpt-4o": { "id": "gpt-4o", "name": "GPT-4o" }
            }
        }
    })
}

pub fn catalog_body() -> String {
    catalog_payload().to_string()
}

pub fn catalog_raw() -> RawCatalogResponse {
    serde_json::from_value(catalog_payload()).expect("fixture decodes")
}

/// Minimal two-provider catalog keyed `a` and `b`.
pub fn two_provider_raw() -> RawCatalogResponse {
    RawCatalogResponse::new()
        .with_provider(
            "a",
            WireProvider::new("a", "Provider A")
                .with_api("https://a.test/v1")
                .with_model("a-1", "A One"),
        )
        .with_provider(
            "b",
            WireProvider::new("b", "Provider B")
                .with_api("https://b.test/v1")
                .with_model("b-1", "B One")
                .with_model("b-2", "B Two"),
        )
}

pub fn provider_keys(entries: &[modelsync_core::ProviderCatalogEntry]) -> Vec<&str> {
    entries
        .iter()
        .map(|entry| entry.provider_key.as_str())
        .collect()
}
