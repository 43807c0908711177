//! Mapping from the wire catalog to provider entries.

use crate::domain::{ModelDetail, ProviderCatalogEntry, RawCatalogResponse, WireProvider};

/// Converts the keyed wire catalog into normalized entries.
///
/// Only providers whose key appears in `allow_list` are kept. Output follows
/// the key order of `raw`; models follow their key order within a provider.
/// Pure and idempotent.
pub fn adapt_catalog<S: AsRef<str>>(
    raw: &RawCatalogResponse,
    allow_list: &[S],
) -> Vec<ProviderCatalogEntry> {
    raw.providers()
        .filter(|(key, _)| allow_list.iter().any(|allowed| allowed.as_ref() == *key))
        .map(|(key, provider)| adapt_provider(key, provider))
        .collect()
}

fn adapt_provider(key: &str, provider: &WireProvider) -> ProviderCatalogEntry {
    let models = provider
        .models
        .values()
        .map(|model| ModelDetail {
            model_key: model.id.clone(),
            // Some catalog models ship without a display name.
            model_name: if model.name.is_empty() {
                model.id.clone()
            } else {
                model.name.clone()
            },
        })
        .collect();

    ProviderCatalogEntry {
        provider_key: key.to_owned(),
        provider_name: provider.name.clone(),
        api_address: provider.api.clone().unwrap_or_default(),
        models,
    }
}
