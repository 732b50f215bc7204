//! Cloud Firestore REST client.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{split_document_path, Document, DocumentStore, Fields};
use crate::config::FirebaseConfig;
use crate::session::Session;
use crate::util::compact_text;
use crate::{Error, Result};

const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";
const LIST_PAGE_SIZE: u32 = 300;

/// Firestore document store authenticated as the signed-in user.
#[derive(Clone)]
pub struct FirestoreClient {
    documents_url: String,
    id_token: String,
    client: Client,
}

impl FirestoreClient {
    pub fn new(config: &FirebaseConfig, session: &Session) -> Result<Self> {
        Self::with_base_url(FIRESTORE_BASE_URL, config, session)
    }

    /// Point the client at another Firestore host, e.g. the local emulator.
    pub fn with_base_url(
        base_url: &str,
        config: &FirebaseConfig,
        session: &Session,
    ) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|error| Error::InvalidInput(format!("Failed to build HTTP client: {error}")))?;
        Ok(Self {
            documents_url: format!(
                "{}/projects/{}/databases/(default)/documents",
                base_url.trim_end_matches('/'),
                config.project_id
            ),
            id_token: session.id_token().to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.documents_url, path.trim_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.id_token)
            .header("Accept", "application/json")
    }
}

impl DocumentStore for FirestoreClient {
    async fn get_document(&self, path: &str) -> Result<Option<Document>> {
        let response = self
            .authorized(self.client.get(self.url(path)))
            .send()
            .await
            .map_err(|error| read_error("get", path, error))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(read_error("get", path, status_message(response).await));
        }

        let payload = response
            .json::<FirestoreDocument>()
            .await
            .map_err(|error| read_error("get", path, error))?;
        Ok(Some(payload.into_document()))
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(self.url(collection))
                .query(&[("pageSize", LIST_PAGE_SIZE.to_string())]);
            if let Some(token) = page_token.as_deref() {
                request = request.query(&[("pageToken", token)]);
            }

            let response = self
                .authorized(request)
                .send()
                .await
                .map_err(|error| read_error("list", collection, error))?;
            if !response.status().is_success() {
                return Err(read_error(
                    "list",
                    collection,
                    status_message(response).await,
                ));
            }

            let page = response
                .json::<ListDocumentsResponse>()
                .await
                .map_err(|error| read_error("list", collection, error))?;
            documents.extend(
                page.documents
                    .into_iter()
                    .map(FirestoreDocument::into_document),
            );

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!("Listed {} documents from {}", documents.len(), collection);
        Ok(documents)
    }

    async fn add_document(&self, collection: &str, fields: Fields) -> Result<String> {
        let response = self
            .authorized(self.client.post(self.url(collection)))
            .json(&encode_document(&fields))
            .send()
            .await
            .map_err(|error| write_error("add", collection, error))?;
        if !response.status().is_success() {
            return Err(write_error(
                "add",
                collection,
                status_message(response).await,
            ));
        }

        let created = response
            .json::<FirestoreDocument>()
            .await
            .map_err(|error| write_error("add", collection, error))?;
        let document = created.into_document();
        if document.id.is_empty() {
            return Err(write_error(
                "add",
                collection,
                "response did not include a document name",
            ));
        }
        Ok(document.id)
    }

    async fn set_document(&self, path: &str, fields: Fields) -> Result<()> {
        split_document_path(path)?;
        let response = self
            .authorized(self.client.patch(self.url(path)))
            .json(&encode_document(&fields))
            .send()
            .await
            .map_err(|error| write_error("set", path, error))?;
        if !response.status().is_success() {
            return Err(write_error("set", path, status_message(response).await));
        }
        Ok(())
    }

    async fn delete_document(&self, path: &str) -> Result<()> {
        split_document_path(path)?;
        let response = self
            .authorized(self.client.delete(self.url(path)))
            .send()
            .await
            .map_err(|error| write_error("delete", path, error))?;
        if !response.status().is_success() {
            return Err(write_error("delete", path, status_message(response).await));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    #[serde(default)]
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl FirestoreDocument {
    fn into_document(self) -> Document {
        let id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Document::new(id, decode_fields(self.fields))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

fn encode_document(fields: &Fields) -> Value {
    let encoded: Map<String, Value> = fields
        .iter()
        .map(|(key, value)| {
            (
                key.to_string(),
                serde_json::json!({ "stringValue": value }),
            )
        })
        .collect();
    serde_json::json!({ "fields": encoded })
}

/// Keep string-typed values; anything else is not part of this schema.
fn decode_fields(raw: Map<String, Value>) -> Fields {
    raw.into_iter()
        .filter_map(|(key, value)| {
            let text = value.get("stringValue")?.as_str()?.to_string();
            Some((key, text))
        })
        .collect()
}

async fn status_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    parse_api_error(status, &body)
}

#[derive(Debug, Deserialize)]
struct FirestoreErrorResponse {
    error: Option<FirestoreErrorBody>,
}

#[derive(Debug, Deserialize)]
struct FirestoreErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(FirestoreErrorResponse { error: Some(error) }) = serde_json::from_str(body) {
        if let Some(message) = error.message.or(error.status) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }
    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{trimmed} ({})", status.as_u16())
    }
}

fn read_error(operation: &str, path: &str, error: impl std::fmt::Display) -> Error {
    Error::StoreRead(format!("Firestore {operation} failed for {path}: {error}"))
}

fn write_error(operation: &str, path: &str, error: impl std::fmt::Display) -> Error {
    Error::StoreWrite(format!("Firestore {operation} failed for {path}: {error}"))
}
