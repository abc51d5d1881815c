// Payload normalization: reduce every incoming movie shape to an ItemRecord
//
// Accepted shapes: OMDb lookups (imdbID, year, plot), TMDB-style objects
// (id, originalTitle, poster_path, release_date, vote_average),
// client submissions (imdbId, posterPath, runtimeMinutes) and the persisted
// record itself.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use watchlist_models::{Category, Identity, ItemRecord, ListCollection, StoredAccount};
use crate::error::{Result, WatchlistError};

pub const IDENTIFIER_FIELDS: &[&str] = &["imdbId", "imdbID", "id"];
pub const TITLE_FIELDS: &[&str] = &["title", "originalTitle", "name"];
pub const POSTER_FIELDS: &[&str] = &["poster", "poster_path", "posterPath"];
pub const RELEASE_FIELDS: &[&str] = &["releaseDate", "release_date", "year"];
pub const RATING_FIELDS: &[&str] = &["vote_average", "rating"];
pub const RUNTIME_FIELDS: &[&str] = &["runtime", "runtimeMinutes"];
pub const OVERVIEW_FIELDS: &[&str] = &["plot", "overview"];
pub const ADDED_AT_FIELDS: &[&str] = &["addedAt"];

pub const DEFAULT_TITLE: &str = "Untitled";

/// Normalize a payload, stamping it with the current time if it carries none
pub fn normalize_payload(payload: &Value) -> Result<ItemRecord> {
    normalize_payload_at(payload, Utc::now())
}

/// Normalize a payload using `now` as the fallback added timestamp
pub fn normalize_payload_at(payload: &Value, now: DateTime<Utc>) -> Result<ItemRecord> {
    normalize_fields(payload, Some(now))
}

fn normalize_fields(payload: &Value, added_fallback: Option<DateTime<Utc>>) -> Result<ItemRecord> {
    let fields = payload.as_object().ok_or(WatchlistError::MissingIdentifier)?;

    let imdb_id = first_text(fields, IDENTIFIER_FIELDS).ok_or(WatchlistError::MissingIdentifier)?;

    Ok(ItemRecord {
        imdb_id,
        title: first_text(fields, TITLE_FIELDS).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        poster: first_text(fields, POSTER_FIELDS).unwrap_or_default(),
        release_date: first_text(fields, RELEASE_FIELDS).unwrap_or_default(),
        rating: first_number(fields, RATING_FIELDS),
        runtime: first_text(fields, RUNTIME_FIELDS).unwrap_or_default(),
        overview: first_text(fields, OVERVIEW_FIELDS).unwrap_or_default(),
        added_at: first_timestamp(fields, ADDED_AT_FIELDS).or(added_fallback),
    })
}

/// First candidate holding a non-empty string or a number, rendered as text
fn first_text(fields: &Map<String, Value>, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|name| match fields.get(*name)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First candidate holding a JSON number; strings are never coerced
fn first_number(fields: &Map<String, Value>, candidates: &[&str]) -> Option<f64> {
    candidates
        .iter()
        .find_map(|name| fields.get(*name).and_then(Value::as_f64))
        .filter(|n| n.is_finite())
}

/// RFC 3339 strings or millisecond epoch numbers
fn first_timestamp(fields: &Map<String, Value>, candidates: &[&str]) -> Option<DateTime<Utc>> {
    candidates.iter().find_map(|name| match fields.get(*name)? {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    })
}

/// Rebuild a stored account from its JSON document
///
/// A list that is missing or not an array reads as empty. Anything that
/// cannot be trusted (not an object, a stored movie without an id, a record
/// filed under another identity) is reported as `InvalidCollection`.
pub fn normalize_stored_account(identity: &Identity, document: &Value) -> Result<StoredAccount> {
    let fields = document.as_object().ok_or_else(|| {
        WatchlistError::InvalidCollection(format!("record for {} is not an object", identity))
    })?;

    if let Some(stored) = fields.get("identity").and_then(Value::as_str) {
        if stored != identity.as_str() {
            return Err(WatchlistError::InvalidCollection(format!(
                "record for {} is filed under identity {}",
                identity, stored
            )));
        }
    }

    let created_at = first_timestamp(fields, &["createdAt"]);
    let lists = match fields.get("lists") {
        Some(Value::Object(lists)) => normalize_stored_lists(identity, lists)?,
        Some(other) => {
            warn!("Lists for {} have unexpected shape ({}), reading as empty", identity, kind_of(other));
            ListCollection::new()
        }
        None => {
            debug!("No lists stored for {}", identity);
            ListCollection::new()
        }
    };

    Ok(StoredAccount {
        identity: identity.clone(),
        created_at,
        lists,
    })
}

fn normalize_stored_lists(identity: &Identity, lists: &Map<String, Value>) -> Result<ListCollection> {
    let mut collection = ListCollection::new();

    for category in Category::ALL {
        let items = match lists.get(category.as_str()) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                warn!(
                    "List {} for {} is {} instead of an array, reading as empty",
                    category,
                    identity,
                    kind_of(other)
                );
                continue;
            }
            None => continue,
        };

        let target = collection.get_mut(category);
        for (position, raw) in items.iter().enumerate() {
            // Items stored without addedAt stay undated
            let item = normalize_fields(raw, None).map_err(|_| {
                WatchlistError::InvalidCollection(format!(
                    "{} item #{} for {} has no imdbId",
                    category, position, identity
                ))
            })?;
            target.push(item);
        }
    }

    Ok(collection)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_omdb_shape() {
        let payload = json!({
            "imdbID": "tt1375666",
            "title": "Inception",
            "poster": "https://img/inception.jpg",
            "year": "2010",
            "runtime": "148 min",
            "plot": "A thief who steals corporate secrets.",
            "rating": 8.8
        });

        let item = normalize_payload_at(&payload, fixed_now()).unwrap();
        assert_eq!(item.imdb_id, "tt1375666");
        assert_eq!(item.title, "Inception");
        assert_eq!(item.release_date, "2010");
        assert_eq!(item.runtime, "148 min");
        assert_eq!(item.overview, "A thief who steals corporate secrets.");
        assert_eq!(item.rating, Some(8.8));
        assert_eq!(item.added_at, Some(fixed_now()));
    }

    #[test]
    fn test_tmdb_shape() {
        let payload = json!({
            "id": 27205,
            "originalTitle": "Inception",
            "poster_path": "/9gk7adHYeDvHkCSEqAvQNLV5Uge.jpg",
            "release_date": "2010-07-15",
            "vote_average": 8.4,
            "runtimeMinutes": 148,
            "overview": "Cobb, a skilled thief."
        });

        let item = normalize_payload_at(&payload, fixed_now()).unwrap();
        assert_eq!(item.imdb_id, "27205");
        assert_eq!(item.title, "Inception");
        assert_eq!(item.poster, "/9gk7adHYeDvHkCSEqAvQNLV5Uge.jpg");
        assert_eq!(item.release_date, "2010-07-15");
        assert_eq!(item.rating, Some(8.4));
        assert_eq!(item.runtime, "148");
        assert_eq!(item.overview, "Cobb, a skilled thief.");
    }

    #[test]
    fn test_identifier_order() {
        let payload = json!({ "id": "tmdb-1", "imdbID": "tt0002", "imdbId": "tt0001" });
        assert_eq!(normalize_payload(&payload).unwrap().imdb_id, "tt0001");

        let payload = json!({ "id": "tmdb-1", "imdbID": "tt0002" });
        assert_eq!(normalize_payload(&payload).unwrap().imdb_id, "tt0002");
    }

    #[test]
    fn test_empty_candidates_fall_through() {
        let payload = json!({
            "imdbId": "  ",
            "imdbID": null,
            "id": "tt0003",
            "title": "",
            "name": "Fallback Name",
            "plot": "",
            "overview": "From overview"
        });

        let item = normalize_payload(&payload).unwrap();
        assert_eq!(item.imdb_id, "tt0003");
        assert_eq!(item.title, "Fallback Name");
        assert_eq!(item.overview, "From overview");
    }

    #[test]
    fn test_defaults() {
        let item = normalize_payload_at(&json!({ "imdbId": "tt0004" }), fixed_now()).unwrap();
        assert_eq!(item.title, DEFAULT_TITLE);
        assert_eq!(item.poster, "");
        assert_eq!(item.release_date, "");
        assert_eq!(item.rating, None);
        assert_eq!(item.runtime, "");
        assert_eq!(item.overview, "");
        assert_eq!(item.added_at, Some(fixed_now()));
    }

    #[test]
    fn test_missing_identifier() {
        let result = normalize_payload(&json!({ "title": "No Id" }));
        assert!(matches!(result, Err(WatchlistError::MissingIdentifier)));

        let result = normalize_payload(&json!({ "imdbId": "", "id": null }));
        assert!(matches!(result, Err(WatchlistError::MissingIdentifier)));

        let result = normalize_payload(&json!("tt0001"));
        assert!(matches!(result, Err(WatchlistError::MissingIdentifier)));
    }

    #[test]
    fn test_rating_is_never_coerced() {
        let item = normalize_payload(&json!({ "imdbId": "tt1", "vote_average": "8.1", "rating": 7.2 })).unwrap();
        assert_eq!(item.rating, Some(7.2));

        let item = normalize_payload(&json!({ "imdbId": "tt1", "rating": "N/A" })).unwrap();
        assert_eq!(item.rating, None);

        let item = normalize_payload(&json!({ "imdbId": "tt1", "rating": -3.5 })).unwrap();
        assert_eq!(item.rating, Some(-3.5));

        let item = normalize_payload(&json!({ "imdbId": "tt1", "rating": 0 })).unwrap();
        assert_eq!(item.rating, Some(0.0));
    }

    #[test]
    fn test_added_at_formats() {
        let item = normalize_payload_at(
            &json!({ "imdbId": "tt1", "addedAt": "2023-01-02T03:04:05Z" }),
            fixed_now(),
        )
        .unwrap();
        assert_eq!(item.added_at, Some(Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap()));

        let item = normalize_payload_at(&json!({ "imdbId": "tt1", "addedAt": 1_700_000_000_000i64 }), fixed_now()).unwrap();
        assert_eq!(item.added_at.map(|at| at.timestamp()), Some(1_700_000_000));

        let item = normalize_payload_at(&json!({ "imdbId": "tt1", "addedAt": "yesterday" }), fixed_now()).unwrap();
        assert_eq!(item.added_at, Some(fixed_now()));
    }

    #[test]
    fn test_deterministic() {
        let payload = json!({ "imdbID": "tt5", "title": "Same", "vote_average": 6.5, "year": 1999 });
        let first = normalize_payload_at(&payload, fixed_now()).unwrap();
        let second = normalize_payload_at(&payload, fixed_now()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_canonical_record_is_fixed_point() {
        let payload = json!({
            "imdbID": "tt6",
            "name": "Canonical",
            "posterPath": "/p.jpg",
            "release_date": "2001-05-01",
            "vote_average": 7.0,
            "runtime": "1h 40m",
            "plot": "Plot"
        });
        let first = normalize_payload_at(&payload, fixed_now()).unwrap();

        let stored = serde_json::to_value(&first).unwrap();
        let later = fixed_now() + chrono::Duration::days(30);
        let second = normalize_payload_at(&stored, later).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_stored_account_tolerates_missing_and_malformed_lists() {
        let identity = Identity::new("user-1");
        let document = json!({
            "identity": "user-1",
            "createdAt": "2024-01-01T00:00:00Z",
            "lists": {
                "watched": [{ "imdbId": "tt1", "title": "One", "addedAt": "2024-02-01T00:00:00Z" }],
                "watching": "oops",
                "planned": null
            }
        });

        let account = normalize_stored_account(&identity, &document).unwrap();
        assert_eq!(account.created_at, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(account.lists.watched.len(), 1);
        assert_eq!(account.lists.watched[0].added_at, Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()));
        assert!(account.lists.watching.is_empty());
        assert!(account.lists.planned.is_empty());
        assert!(account.lists.onhold.is_empty());
        assert!(account.lists.dropped.is_empty());
    }

    #[test]
    fn test_stored_item_without_added_date_stays_undated() {
        let identity = Identity::new("user-4");
        let document = json!({ "lists": { "planned": [{ "imdbId": "tt9", "title": "Old" }] } });

        let first = normalize_stored_account(&identity, &document).unwrap();
        assert_eq!(first.lists.planned[0].added_at, None);

        let reloaded = normalize_stored_account(&identity, &serde_json::to_value(&first).unwrap()).unwrap();
        assert_eq!(reloaded, first);
    }

    #[test]
    fn test_stored_account_without_lists() {
        let identity = Identity::new("user-2");
        let account = normalize_stored_account(&identity, &json!({ "identity": "user-2" })).unwrap();
        assert!(account.lists.is_empty());
        assert_eq!(account.created_at, None);
    }

    #[test]
    fn test_stored_account_rejects_corruption() {
        let identity = Identity::new("user-3");

        let result = normalize_stored_account(&identity, &json!([1, 2, 3]));
        assert!(matches!(result, Err(WatchlistError::InvalidCollection(_))));

        let result = normalize_stored_account(
            &identity,
            &json!({ "lists": { "dropped": [{ "title": "No id" }] } }),
        );
        assert!(matches!(result, Err(WatchlistError::InvalidCollection(_))));

        let result = normalize_stored_account(&identity, &json!({ "identity": "someone-else" }));
        assert!(matches!(result, Err(WatchlistError::InvalidCollection(_))));
    }
}
