use serde::{Deserialize, Serialize};

/// Normalized catalog entry for one allow-listed provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCatalogEntry {
    /// Stable provider identity, matched against the allow-list.
    pub provider_key: String,
    pub provider_name: String,
    /// API base address advertised by the catalog. Empty when the catalog has none.
    pub api_address: String,
    pub models: Vec<ModelDetail>,
}

impl ProviderCatalogEntry {
    pub fn model(&self, model_key: &str) -> Option<&ModelDetail> {
        self.models.iter().find(|model| model.model_key == model_key)
    }
}

/// Model exposed by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDetail {
    pub model_key: String,
    pub model_name: String,
}

/// Look up a provider entry by key.
pub fn find_provider<'a>(
    entries: &'a [ProviderCatalogEntry],
    provider_key: &str,
) -> Option<&'a ProviderCatalogEntry> {
    entries
        .iter()
        .find(|entry| entry.provider_key == provider_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> ProviderCatalogEntry {
        ProviderCatalogEntry {
            provider_key: String::from("deepseek"),
            provider_name: String::from("DeepSeek"),
            api_address: String::from("https://api.deepseek.com"),
            models: vec![ModelDetail {
                model_key: String::from("deepseek-chat"),
                model_name: String::from("DeepSeek Chat"),
            }],
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(entry()).expect("serialize");

        assert_eq!(value["providerKey"], "deepseek");
        assert_eq!(value["apiAddress"], "https://api.deepseek.com");
        assert_eq!(value["models"][0]["modelKey"], "deepseek-chat");
    }

    #[test]
    fn lookups_by_key() {
        let entries = vec![entry()];

        let provider = find_provider(&entries, "deepseek").expect("present");
        assert_eq!(
            provider.model("deepseek-chat").map(|m| m.model_name.as_str()),
            Some("DeepSeek Chat")
        );
        assert!(find_provider(&entries, "openai").is_none());
    }
}
