//! Business functions behind `online_score` and `clients_interests`.

use crate::errors::{codes, ScoringError};
use crate::request::OnlineScoreRequest;
use crate::store::Store;
use log::{debug, warn};
use sha2::{Digest, Sha256};
use std::time::Duration;

/// How long a computed score stays cached.
pub const SCORE_TTL: Duration = Duration::from_secs(60 * 60);

/// Fixed score reported to the admin login.
pub const ADMIN_SCORE: u32 = 42;

fn score_key(request: &OnlineScoreRequest) -> String {
    let mut hasher = Sha256::new();
    hasher.update(request.first_name.as_deref().unwrap_or_default());
    hasher.update(request.last_name.as_deref().unwrap_or_default());
    hasher.update(request.phone.map(|phone| phone.to_string()).unwrap_or_default());
    hasher.update(
        request
            .birthday
            .map(|birthday| birthday.format("%Y%m%d").to_string())
            .unwrap_or_default(),
    );
    format!("uid:{}", hex::encode(hasher.finalize()))
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|text| !text.is_empty())
}

/// Score for the given client data, served from the cache when possible.
///
/// Cache failures degrade to recomputation; they never fail the call.
pub fn get_score(store: &dyn Store, request: &OnlineScoreRequest) -> f64 {
    let key = score_key(request);
    if let Some(raw) = store.cache_get(&key) {
        match raw.parse::<f64>() {
            Ok(cached) if cached > 0.0 => {
                debug!("score cache hit for {}", key);
                return cached;
            }
            Ok(_) => {}
            Err(err) => warn!("ignoring unreadable cached score under {}: {}", key, err),
        }
    }

    let mut score = 0.0;
    if request.phone.is_some() {
        score += 1.5;
    }
    if filled(&request.email) {
        score += 1.5;
    }
    // gender 0 is "unknown" and does not count
    if request.birthday.is_some() && request.gender.is_some_and(|gender| gender != 0) {
        score += 1.5;
    }
    if filled(&request.first_name) && filled(&request.last_name) {
        score += 0.5;
    }

    store.cache_set(&key, &score.to_string(), SCORE_TTL);
    score
}

/// Interests recorded for a client; absent records read as an empty list.
pub fn get_interests(store: &dyn Store, client_id: i64) -> Result<Vec<String>, ScoringError> {
    let key = format!("i:{}", client_id);
    match store.get(&key)? {
        None => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(&raw).map_err(|e| {
            ScoringError::store(
                codes::STORE_CORRUPT_VALUE,
                format!("value under {} is not a list of strings: {}", key, e),
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn request(arguments: serde_json::Value) -> OnlineScoreRequest {
        OnlineScoreRequest::from_value(&arguments).unwrap()
    }

    mod score_tests {
        use super::*;

        #[test]
        fn test_score_components() {
            let store = MemoryStore::new();
            let cases = [
                (json!({"phone": "79175002040", "email": "a@b.c"}), 3.0),
                (json!({"phone": 79175002040u64, "email": "a@b.c", "gender": 1, "birthday": "01.01.2000"}), 4.5),
                (json!({"gender": 0, "birthday": "01.01.2000", "first_name": "a", "last_name": "b"}), 0.5),
                (json!({"gender": 2, "birthday": "01.01.2000"}), 1.5),
                (json!({"first_name": "a", "last_name": "b"}), 0.5),
                (json!({"first_name": "", "last_name": ""}), 0.0),
            ];
            for (arguments, expected) in cases {
                let score = get_score(&store, &request(arguments.clone()));
                assert!((score - expected).abs() < f64::EPSILON, "{} -> {}", arguments, score);
            }
        }

        #[test]
        fn test_score_is_cached() {
            let store = MemoryStore::new();
            let req = request(json!({"phone": "79175002040", "email": "a@b.c"}));
            assert_eq!(get_score(&store, &req), 3.0);
            assert_eq!(store.len(), 1);

            store.set(&score_key(&req), "5", SCORE_TTL).unwrap();
            assert_eq!(get_score(&store, &req), 5.0);
        }

        #[test]
        fn test_unreadable_cached_score_is_recomputed() {
            let store = MemoryStore::new();
            let req = request(json!({"phone": "79175002040", "email": "a@b.c"}));
            store.set(&score_key(&req), "not-a-number", SCORE_TTL).unwrap();
            assert_eq!(get_score(&store, &req), 3.0);
            assert_eq!(store.get(&score_key(&req)).unwrap().as_deref(), Some("3"));
        }

        #[test]
        fn test_key_ignores_email_and_gender() {
            let a = request(json!({"phone": "79175002040", "email": "a@b.c"}));
            let b = request(json!({"phone": "79175002040", "email": "x@y.z", "gender": 1}));
            let c = request(json!({"phone": "79175002041", "email": "a@b.c"}));
            assert_eq!(score_key(&a), score_key(&b));
            assert_ne!(score_key(&a), score_key(&c));
            assert!(score_key(&a).starts_with("uid:"));
        }
    }

    mod interests_tests {
        use super::*;

        #[test]
        fn test_interests_from_store() {
            let store = MemoryStore::with_entries([("i:1", r#"["books", "hi-tech"]"#)]);
            assert_eq!(get_interests(&store, 1).unwrap(), vec!["books", "hi-tech"]);
        }

        #[test]
        fn test_missing_interests_are_empty() {
            let store = MemoryStore::new();
            assert!(get_interests(&store, 7).unwrap().is_empty());
        }

        #[test]
        fn test_corrupt_interests_are_an_error() {
            let store = MemoryStore::with_entries([("i:3", "{not json")]);
            let err = get_interests(&store, 3).unwrap_err();
            assert_eq!(err.status(), 500);
            assert!(err.to_string().contains(codes::STORE_CORRUPT_VALUE));
        }
    }
}
