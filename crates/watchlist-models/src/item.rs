use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical movie record stored in every category list
///
/// Every incoming payload (metadata lookup, client submission, persisted
/// record) is reduced to this shape before it reaches a list. Two records
/// with the same `imdb_id` refer to the same movie no matter which source
/// filled the other fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub imdb_id: String,
    pub title: String,
    #[serde(default)]
    pub poster: String,
    /// Free-form: a full date, a bare year, or empty
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub rating: Option<f64>,
    /// Free-form runtime ("148", "120 min", "2h 28m") or empty
    #[serde(default)]
    pub runtime: String,
    #[serde(default)]
    pub overview: String,
    /// Unknown for records stored before timestamps were kept
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
}

impl ItemRecord {
    pub fn new(imdb_id: impl Into<String>, title: impl Into<String>, added_at: DateTime<Utc>) -> Self {
        Self {
            imdb_id: imdb_id.into(),
            title: title.into(),
            poster: String::new(),
            release_date: String::new(),
            rating: None,
            runtime: String::new(),
            overview: String::new(),
            added_at: Some(added_at),
        }
    }

    pub fn has_runtime(&self) -> bool {
        !self.runtime.trim().is_empty()
    }

    pub fn same_item(&self, imdb_id: &str) -> bool {
        self.imdb_id == imdb_id
    }
}
