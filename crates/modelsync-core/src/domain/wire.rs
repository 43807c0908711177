use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unmodified catalog payload keyed by provider identifier.
///
/// Fields the service does not read are kept in `extra` maps so the payload
/// can be cached verbatim and re-adapted later.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawCatalogResponse(BTreeMap<String, WireProvider>);

impl RawCatalogResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn with_provider(mut self, key: impl Into<String>, provider: WireProvider) -> Self {
        self.0.insert(key.into(), provider);
        self
    }

    pub fn get(&self, key: &str) -> Option<&WireProvider> {
        self.0.get(key)
    }

    pub fn providers(&self) -> impl Iterator<Item = (&str, &WireProvider)> {
        self.0.iter().map(|(key, provider)| (key.as_str(), provider))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, WireProvider)> for RawCatalogResponse {
    fn from_iter<I: IntoIterator<Item = (String, WireProvider)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Wire-format provider record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireProvider {
    pub id: String,
    #[serde(default)]
    pub env: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default)]
    pub models: BTreeMap<String, WireModel>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WireProvider {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            env: Vec::new(),
            npm: None,
            api: None,
            name: name.into(),
            doc: None,
            models: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    pub fn with_api(mut self, api: impl Into<String>) -> Self {
        self.api = Some(api.into());
        self
    }

    pub fn with_model(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        self.models.insert(id.clone(), WireModel::new(id, name));
        self
    }
}

/// Wire-format model record nested under a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireModel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WireModel {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_fields_survive_a_reserialization() {
        let payload = json!({
            "deepseek": {
                "id": "deepseek",
                "env": ["DEEPSEEK_API_KEY"],
                "npm": "@ai-sdk/deepseek",
                "api": "https://api.deepseek.com",
                "name": "DeepSeek",
                "doc": "https://api-docs.deepseek.com",
                "models": {
                    "deepseek-chat": {
                        "id": "deepseek-chat",
                        "name": "DeepSeek Chat",
                        "limit": { "context": 128000 }
                    }
                },
                "logo": "deepseek.svg"
            }
        });

        let raw: RawCatalogResponse = serde_json::from_value(payload.clone()).expect("decode");
        let provider = raw.get("deepseek").expect("provider");
        assert_eq!(provider.extra.get("logo"), Some(&json!("deepseek.svg")));

        let encoded = serde_json::to_value(&raw).expect("encode");
        assert_eq!(encoded, payload);
    }

    #[test]
    fn optional_wire_fields_default_when_missing() {
        let raw = RawCatalogResponse::from_json_slice(
            br#"{"local":{"id":"local","name":"Local","models":{"m":{"id":"m"}}}}"#,
        )
        .expect("decode");

        let provider = raw.get("local").expect("provider");
        assert!(provider.api.is_none());
        assert!(provider.env.is_empty());
        assert_eq!(provider.models["m"].name, "");
    }

    #[test]
    fn non_object_payload_fails_to_decode() {
        assert!(RawCatalogResponse::from_json_slice(b"[]").is_err());
        assert!(RawCatalogResponse::from_json_slice(br#"{"a":{"name":"x"}}"#).is_err());
    }
}
