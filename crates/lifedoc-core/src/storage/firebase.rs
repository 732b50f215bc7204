//! Cloud Storage for Firebase REST client.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;

use super::{normalize_object_path, BlobStore};
use crate::config::FirebaseConfig;
use crate::session::Session;
use crate::util::compact_text;
use crate::{Error, Result};

const STORAGE_BASE_URL: &str = "https://firebasestorage.googleapis.com/v0";

/// Firebase Storage bucket accessed as the signed-in user.
#[derive(Clone)]
pub struct FirebaseStorageClient {
    objects_url: String,
    id_token: String,
    client: Client,
}

impl FirebaseStorageClient {
    pub fn new(config: &FirebaseConfig, session: &Session) -> Result<Self> {
        Self::with_base_url(STORAGE_BASE_URL, config, session)
    }

    /// Point the client at another host, e.g. the Storage emulator.
    pub fn with_base_url(
        base_url: &str,
        config: &FirebaseConfig,
        session: &Session,
    ) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|error| Error::InvalidInput(format!("Failed to build HTTP client: {error}")))?;
        Ok(Self {
            objects_url: format!(
                "{}/b/{}/o",
                base_url.trim_end_matches('/'),
                config.storage_bucket
            ),
            id_token: session.id_token().to_string(),
            client,
        })
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/{}", self.objects_url, urlencoding::encode(path))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("Authorization", format!("Firebase {}", self.id_token))
    }
}

impl BlobStore for FirebaseStorageClient {
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let path = normalize_object_path(path)?;
        let size = bytes.len();
        let response = self
            .authorized(self.client.post(&self.objects_url))
            .query(&[("name", path.as_str())])
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|error| storage_error(Error::BlobUpload, "upload", &path, error))?;
        if !response.status().is_success() {
            let message = status_message(response).await;
            return Err(storage_error(Error::BlobUpload, "upload", &path, message));
        }

        tracing::debug!("Uploaded {} bytes to {}", size, path);
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let path = normalize_object_path(path)?;
        let response = self
            .authorized(self.client.delete(self.object_url(&path)))
            .send()
            .await
            .map_err(|error| storage_error(Error::BlobDelete, "delete", &path, error))?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("Blob {} was already gone", path);
            return Ok(());
        }
        if !response.status().is_success() {
            let message = status_message(response).await;
            return Err(storage_error(Error::BlobDelete, "delete", &path, message));
        }
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String> {
        let path = normalize_object_path(path)?;
        let object_url = self.object_url(&path);
        let response = self
            .authorized(self.client.get(&object_url))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|error| storage_error(Error::BlobUrlResolution, "metadata", &path, error))?;
        if !response.status().is_success() {
            let message = status_message(response).await;
            return Err(storage_error(
                Error::BlobUrlResolution,
                "metadata",
                &path,
                message,
            ));
        }

        let metadata = response
            .json::<ObjectMetadata>()
            .await
            .map_err(|error| storage_error(Error::BlobUrlResolution, "metadata", &path, error))?;
        let token = metadata.first_download_token().ok_or_else(|| {
            storage_error(
                Error::BlobUrlResolution,
                "metadata",
                &path,
                "object has no download token",
            )
        })?;

        Ok(format!("{object_url}?alt=media&token={token}"))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMetadata {
    #[serde(default)]
    download_tokens: Option<String>,
}

impl ObjectMetadata {
    /// `downloadTokens` is a comma-separated list; any of them works.
    fn first_download_token(&self) -> Option<&str> {
        self.download_tokens
            .as_deref()?
            .split(',')
            .map(str::trim)
            .find(|token| !token.is_empty())
    }
}

async fn status_message(response: reqwest::Response) -> String {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let body = compact_text(&body);
    if body.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {body}")
    }
}

fn storage_error(
    kind: fn(String) -> Error,
    operation: &str,
    path: &str,
    error: impl std::fmt::Display,
) -> Error {
    kind(format!("Firebase Storage {operation} failed for {path}: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> FirebaseStorageClient {
        let config = FirebaseConfig {
            api_key: "key".to_string(),
            project_id: "life-documentation".to_string(),
            storage_bucket: "life-documentation.appspot.com".to_string(),
        };
        let session = Session::new("uid-1", None, "token").unwrap();
        FirebaseStorageClient::new(&config, &session).unwrap()
    }

    #[test]
    fn object_url_encodes_path_separators() {
        assert_eq!(
            client().object_url("uid-1/diary/abc.jpg"),
            "https://firebasestorage.googleapis.com/v0/b/life-documentation.appspot.com/o/uid-1%2Fdiary%2Fabc.jpg"
        );
    }

    #[test]
    fn first_download_token_skips_blanks() {
        let metadata: ObjectMetadata =
            serde_json::from_str(r#"{"name":"a","downloadTokens":" ,tok-1,tok-2"}"#).unwrap();
        assert_eq!(metadata.first_download_token(), Some("tok-1"));

        let metadata: ObjectMetadata = serde_json::from_str(r#"{"name":"a"}"#).unwrap();
        assert_eq!(metadata.first_download_token(), None);
    }

    #[test]
    fn storage_error_uses_requested_kind() {
        let error = storage_error(Error::BlobUrlResolution, "metadata", "a/b", "boom");
        match error {
            Error::BlobUrlResolution(message) => {
                assert_eq!(message, "Firebase Storage metadata failed for a/b: boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
