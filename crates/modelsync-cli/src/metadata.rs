use std::fmt::{Display, Formatter};

use modelsync_core::{DataSource, UtcDateTime};
use serde::Serialize;
use uuid::Uuid;

/// Request identifier (UUID v4) for correlating output with logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Metadata attached to every rendered command result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub request_id: RequestId,
    /// `remote` or `cache`; absent for commands that only inspect the cache file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<DataSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_remote_update: Option<UtcDateTime>,
    pub warnings: Vec<String>,
}

impl Metadata {
    pub fn new(source: Option<DataSource>, last_remote_update: Option<UtcDateTime>) -> Self {
        Self {
            request_id: RequestId::new_v4(),
            source,
            last_remote_update,
            warnings: Vec::new(),
        }
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}
