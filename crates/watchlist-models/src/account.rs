use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::collection::ListCollection;

/// Opaque authenticated identity handed over by the auth layer
///
/// The value is trusted as-is; it only keys the per-identity collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Persisted record for one identity: its lists plus the account creation time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredAccount {
    pub identity: Identity,
    /// Used for the account age statistic; `None` when unknown
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lists: ListCollection,
}

impl StoredAccount {
    pub fn new(identity: Identity, created_at: DateTime<Utc>) -> Self {
        Self {
            identity,
            created_at: Some(created_at),
            lists: ListCollection::new(),
        }
    }
}
