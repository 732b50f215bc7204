//! Cloudflare R2 blob backend (S3-compatible API).

use std::env;

use aws_credential_types::Credentials;
use aws_sdk_s3::{primitives::ByteStream, Client};
use aws_types::region::Region;

use super::{normalize_object_path, BlobStore};
use crate::util::is_http_url;
use crate::{Error, Result};

const ENV_ACCOUNT_ID: &str = "R2_ACCOUNT_ID";
const ENV_BUCKET: &str = "R2_BUCKET";
const ENV_ACCESS_KEY_ID: &str = "R2_ACCESS_KEY_ID";
const ENV_SECRET_ACCESS_KEY: &str = "R2_SECRET_ACCESS_KEY";
const ENV_PUBLIC_BASE_URL: &str = "R2_PUBLIC_BASE_URL";

/// Cloudflare R2 configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct R2Config {
    /// Cloudflare account identifier.
    pub account_id: String,
    /// R2 bucket name.
    pub bucket: String,
    /// Access key id for S3-compatible auth.
    pub access_key_id: String,
    /// Secret access key for S3-compatible auth.
    pub secret_access_key: String,
    /// Public URL base serving the bucket. Download URLs are stored on
    /// documents, so they must not expire.
    pub public_base_url: String,
}

impl R2Config {
    /// Load R2 configuration from environment variables.
    ///
    /// Returns `Ok(None)` when no R2 variables are set.
    /// Returns an error when only a partial configuration is provided.
    pub fn from_env() -> Result<Option<Self>> {
        parse_config(|key| env::var(key).ok())
    }

    /// Cloudflare R2 S3-compatible endpoint URL.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        format!("https://{}.r2.cloudflarestorage.com", self.account_id)
    }
}

/// R2-backed blob store.
#[derive(Clone, Debug)]
pub struct R2Storage {
    config: R2Config,
    client: Client,
}

impl R2Storage {
    #[must_use]
    pub fn new(config: R2Config) -> Self {
        let client = build_s3_client(&config);
        Self { config, client }
    }

    #[must_use]
    pub const fn config(&self) -> &R2Config {
        &self.config
    }

    fn public_object_url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.public_base_url)
    }
}

impl BlobStore for R2Storage {
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let path = normalize_object_path(path)?;
        let mut request = self
            .client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&path)
            .body(ByteStream::from(bytes));
        if !content_type.trim().is_empty() {
            request = request.content_type(content_type.trim());
        }

        request.send().await.map_err(|error| {
            r2_error(
                Error::BlobUpload,
                "put_object",
                &self.config.bucket,
                &path,
                error,
            )
        })?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let path = normalize_object_path(path)?;
        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(&path)
            .send()
            .await
            .map_err(|error| {
                r2_error(
                    Error::BlobDelete,
                    "delete_object",
                    &self.config.bucket,
                    &path,
                    error,
                )
            })?;
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String> {
        let path = normalize_object_path(path)?;
        Ok(self.public_object_url(&path))
    }
}

fn parse_config(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<R2Config>> {
    let account_id = lookup(ENV_ACCOUNT_ID).map(|value| value.trim().to_string());
    let bucket = lookup(ENV_BUCKET).map(|value| value.trim().to_string());
    let access_key_id = lookup(ENV_ACCESS_KEY_ID).map(|value| value.trim().to_string());
    let secret_access_key = lookup(ENV_SECRET_ACCESS_KEY).map(|value| value.trim().to_string());
    let public_base_url = lookup(ENV_PUBLIC_BASE_URL).map(|value| value.trim().to_string());

    let any_present = account_id.is_some()
        || bucket.is_some()
        || access_key_id.is_some()
        || secret_access_key.is_some()
        || public_base_url.is_some();

    if !any_present {
        return Ok(None);
    }

    let required = [
        (ENV_ACCOUNT_ID, account_id),
        (ENV_BUCKET, bucket),
        (ENV_ACCESS_KEY_ID, access_key_id),
        (ENV_SECRET_ACCESS_KEY, secret_access_key),
        (ENV_PUBLIC_BASE_URL, public_base_url),
    ];
    let missing = required
        .iter()
        .filter(|(_, value)| value.as_ref().map_or(true, String::is_empty))
        .map(|(name, _)| *name)
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(Error::InvalidInput(format!(
            "R2 configuration is incomplete. Missing: {}",
            missing.join(", ")
        )));
    }

    let [account_id, bucket, access_key_id, secret_access_key, public_base_url] =
        required.map(|(_, value)| value.unwrap_or_default());

    Ok(Some(R2Config {
        account_id,
        bucket,
        access_key_id,
        secret_access_key,
        public_base_url: normalize_public_base_url(&public_base_url)?,
    }))
}

fn build_s3_client(config: &R2Config) -> Client {
    let credentials = Credentials::new(
        config.access_key_id.clone(),
        config.secret_access_key.clone(),
        None,
        None,
        "lifedoc-core-r2-storage",
    );

    let sdk_config = aws_sdk_s3::config::Builder::new()
        .region(Region::new("auto"))
        .credentials_provider(credentials)
        .endpoint_url(config.endpoint_url())
        .force_path_style(true)
        .build();

    Client::from_conf(sdk_config)
}

fn r2_error(
    kind: fn(String) -> Error,
    operation: &str,
    bucket: &str,
    path: &str,
    error: impl std::fmt::Display,
) -> Error {
    kind(format!("R2 {operation} failed for {bucket}/{path}: {error}"))
}

fn normalize_public_base_url(value: &str) -> Result<String> {
    if !is_http_url(value) {
        return Err(Error::InvalidInput(
            "R2_PUBLIC_BASE_URL must start with http:// or https://".to_string(),
        ));
    }
    Ok(value.trim_end_matches('/').to_string())
}
