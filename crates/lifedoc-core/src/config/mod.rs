//! Firebase project configuration.
//!
//! The web API key, project id, and storage bucket are public identifiers that
//! ship with any Firebase client; no secrets live here.

use std::env;

use serde::{Deserialize, Serialize};

use crate::util::normalize_text_option;
use crate::{Error, Result};

pub const ENV_API_KEY: &str = "FIREBASE_API_KEY";
pub const ENV_PROJECT_ID: &str = "FIREBASE_PROJECT_ID";
pub const ENV_STORAGE_BUCKET: &str = "FIREBASE_STORAGE_BUCKET";

/// Identifiers of the Firebase project backing auth, documents, and blobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub project_id: String,
    /// Bucket name without scheme, e.g. `my-app.appspot.com`.
    pub storage_bucket: String,
}

impl FirebaseConfig {
    /// Load configuration from `FIREBASE_*` environment variables.
    ///
    /// Returns `Ok(None)` when none are set and an error when only some are.
    pub fn from_env() -> Result<Option<Self>> {
        parse_config(|key| env::var(key).ok())
    }

    /// Merge explicit values (e.g. from a CLI profile) with the environment.
    ///
    /// Environment variables win over the explicit values.
    pub fn resolve(
        api_key: Option<String>,
        project_id: Option<String>,
        storage_bucket: Option<String>,
    ) -> Result<Option<Self>> {
        parse_config(|key| {
            let explicit = match key {
                ENV_API_KEY => api_key.clone(),
                ENV_PROJECT_ID => project_id.clone(),
                ENV_STORAGE_BUCKET => storage_bucket.clone(),
                _ => None,
            };
            normalize_text_option(env::var(key).ok()).or(explicit)
        })
    }
}

fn parse_config(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<FirebaseConfig>> {
    let api_key = normalize_text_option(lookup(ENV_API_KEY));
    let project_id = normalize_text_option(lookup(ENV_PROJECT_ID));
    let storage_bucket = normalize_text_option(lookup(ENV_STORAGE_BUCKET)).map(normalize_bucket);

    match (api_key, project_id, storage_bucket) {
        (None, None, None) => Ok(None),
        (Some(api_key), Some(project_id), Some(storage_bucket)) => Ok(Some(FirebaseConfig {
            api_key,
            project_id,
            storage_bucket,
        })),
        (api_key, project_id, storage_bucket) => {
            let missing = [
                (ENV_API_KEY, api_key.is_none()),
                (ENV_PROJECT_ID, project_id.is_none()),
                (ENV_STORAGE_BUCKET, storage_bucket.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, is_missing)| is_missing.then_some(name))
            .collect::<Vec<_>>();
            Err(Error::InvalidInput(format!(
                "Firebase configuration is incomplete. Missing: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Accept `gs://bucket/` as written in the Firebase console.
fn normalize_bucket(bucket: String) -> String {
    bucket
        .trim_start_matches("gs://")
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn parse_from_map(map: &HashMap<&str, &str>) -> Result<Option<FirebaseConfig>> {
        parse_config(|key| map.get(key).map(|value| (*value).to_string()))
    }

    #[test]
    fn parse_config_none_returns_none() {
        assert!(parse_from_map(&HashMap::new()).unwrap().is_none());
    }

    #[test]
    fn parse_config_reports_missing_values() {
        let map = HashMap::from([(ENV_API_KEY, "key")]);
        let err = parse_from_map(&map).unwrap_err();
        match err {
            Error::InvalidInput(message) => {
                assert!(message.contains(ENV_PROJECT_ID));
                assert!(message.contains(ENV_STORAGE_BUCKET));
                assert!(!message.contains(ENV_API_KEY));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_config_normalizes_bucket() {
        let map = HashMap::from([
            (ENV_API_KEY, " AIza-key "),
            (ENV_PROJECT_ID, "life-documentation"),
            (ENV_STORAGE_BUCKET, "gs://life-documentation.appspot.com/"),
        ]);
        let config = parse_from_map(&map).unwrap().unwrap();
        assert_eq!(config.api_key, "AIza-key");
        assert_eq!(config.storage_bucket, "life-documentation.appspot.com");
    }

    #[test]
    fn blank_values_count_as_missing() {
        let map = HashMap::from([
            (ENV_API_KEY, "key"),
            (ENV_PROJECT_ID, "  "),
            (ENV_STORAGE_BUCKET, "bucket"),
        ]);
        assert!(parse_from_map(&map).is_err());
    }
}
