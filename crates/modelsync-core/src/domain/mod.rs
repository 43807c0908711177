//! # Domain Models
//!
//! Catalog types on both sides of the adapter.
//!
//! | Type | Side | Description |
//! |------|------|-------------|
//! | [`RawCatalogResponse`] | wire | Unfiltered payload keyed by provider id |
//! | [`WireProvider`] / [`WireModel`] | wire | Records inside the payload |
//! | [`ProviderCatalogEntry`] | internal | Allow-listed provider with its models |
//! | [`ModelDetail`] | internal | Model nested under a provider |
//! | [`UtcDateTime`] | both | UTC timestamp used for cache metadata |

mod catalog;
mod timestamp;
mod wire;

pub use catalog::{find_provider, ModelDetail, ProviderCatalogEntry};
pub use timestamp::UtcDateTime;
pub use wire::{RawCatalogResponse, WireModel, WireProvider};
