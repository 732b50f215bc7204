//! Firebase Identity Toolkit client (email/password accounts).

use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::{
    validate_credentials, AuthError, AuthProvider, AuthResult, AuthSession, AuthUser,
    SessionPersistence,
};
use crate::config::FirebaseConfig;
use crate::util::{compact_text, unix_timestamp_now};

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1";

#[derive(Clone)]
pub struct FirebaseAuthClient<S: SessionPersistence> {
    api_key: String,
    identity_url: String,
    token_url: String,
    client: Client,
    store: S,
}

impl<S: SessionPersistence> FirebaseAuthClient<S> {
    pub fn new(config: &FirebaseConfig, store: S) -> AuthResult<Self> {
        Self::with_endpoints(config, IDENTITY_TOOLKIT_URL, SECURE_TOKEN_URL, store)
    }

    /// Use other endpoints, e.g. the Auth emulator.
    pub fn with_endpoints(
        config: &FirebaseConfig,
        identity_url: &str,
        token_url: &str,
        store: S,
    ) -> AuthResult<Self> {
        let api_key = config.api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "Firebase API key must not be empty",
            ));
        }

        Ok(Self {
            api_key,
            identity_url: identity_url.trim_end_matches('/').to_string(),
            token_url: token_url.trim_end_matches('/').to_string(),
            client: Client::builder().build()?,
            store,
        })
    }

    pub async fn refresh_session(&self, stale: &AuthSession) -> AuthResult<AuthSession> {
        if stale.refresh_token.trim().is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "Refresh token must not be empty",
            ));
        }

        let response = self
            .client
            .post(format!("{}/token", self.token_url))
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", stale.refresh_token.as_str()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let payload = response.json::<RefreshResponse>().await?;
        let session = payload.into_session(stale.user.email.clone())?;
        self.store.save_session(&session)?;
        Ok(session)
    }

    async fn password_request(
        &self,
        action: &str,
        email: &str,
        password: &str,
    ) -> AuthResult<AuthSession> {
        validate_credentials(email, password)?;

        let payload = serde_json::json!({
            "email": email.trim(),
            "password": password,
            "returnSecureToken": true,
        });
        let response = self
            .client
            .post(format!("{}/accounts:{action}", self.identity_url))
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let session = response.json::<PasswordAuthResponse>().await?.into_session()?;
        self.store.save_session(&session)?;
        Ok(session)
    }
}

impl<S: SessionPersistence> AuthProvider for FirebaseAuthClient<S> {
    async fn restore_session(&self) -> AuthResult<Option<AuthSession>> {
        let Some(stored_session) = self.store.load_session()? else {
            return Ok(None);
        };

        if !stored_session.is_expired() {
            return Ok(Some(stored_session));
        }

        match self.refresh_session(&stored_session).await {
            Ok(refreshed) => Ok(Some(refreshed)),
            Err(error) => {
                tracing::warn!("Failed to refresh persisted session: {}", error);
                self.store.clear_session()?;
                Ok(None)
            }
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        let session = self
            .password_request("signInWithPassword", email, password)
            .await?;
        tracing::info!("Signed in user {}", session.user.id);
        Ok(session)
    }

    async fn create_user(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        let session = self.password_request("signUp", email, password).await?;
        tracing::info!("Registered user {}", session.user.id);
        Ok(session)
    }

    async fn sign_out(&self) -> AuthResult<()> {
        self.store.clear_session()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordAuthResponse {
    id_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<String>,
    local_id: Option<String>,
    email: Option<String>,
}

impl PasswordAuthResponse {
    fn into_session(self) -> AuthResult<AuthSession> {
        build_session(
            self.id_token,
            self.refresh_token,
            self.expires_in.as_deref(),
            self.local_id,
            self.email,
        )
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<String>,
    user_id: Option<String>,
}

impl RefreshResponse {
    fn into_session(self, email: Option<String>) -> AuthResult<AuthSession> {
        build_session(
            self.id_token,
            self.refresh_token,
            self.expires_in.as_deref(),
            self.user_id,
            email,
        )
    }
}

fn build_session(
    id_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<&str>,
    user_id: Option<String>,
    email: Option<String>,
) -> AuthResult<AuthSession> {
    let expires_in = expires_in
        .and_then(|value| value.trim().parse::<i64>().ok())
        .ok_or_else(|| AuthError::Api("Auth response did not include expiresIn".to_string()))?;

    match (id_token, refresh_token, user_id) {
        (Some(id_token), Some(refresh_token), Some(id)) if !id.trim().is_empty() => {
            Ok(AuthSession {
                id_token,
                refresh_token,
                expires_at: unix_timestamp_now().saturating_add(expires_in),
                user: AuthUser { id, email },
            })
        }
        _ => Err(AuthError::Api(
            "Auth response did not include enough session fields".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
struct FirebaseErrorResponse {
    error: Option<FirebaseErrorBody>,
}

#[derive(Debug, Deserialize)]
struct FirebaseErrorBody {
    message: Option<String>,
}

async fn api_error(response: reqwest::Response) -> AuthError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    parse_api_error(status, &body)
}

/// Map Identity Toolkit error codes such as `EMAIL_EXISTS` to readable errors.
fn parse_api_error(status: StatusCode, body: &str) -> AuthError {
    let code = serde_json::from_str::<FirebaseErrorResponse>(body)
        .ok()
        .and_then(|payload| payload.error)
        .and_then(|error| error.message);

    let Some(code) = code else {
        let trimmed = compact_text(body);
        return AuthError::Api(if trimmed.is_empty() {
            format!("HTTP {}", status.as_u16())
        } else {
            format!("{trimmed} ({})", status.as_u16())
        });
    };

    // WEAK_PASSWORD comes as "WEAK_PASSWORD : Password should be at least 6 characters".
    let (head, detail) = code
        .split_once(" : ")
        .map_or((code.as_str(), None), |(head, detail)| (head, Some(detail)));

    let message = match head.trim() {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            return AuthError::InvalidCredentials;
        }
        "EMAIL_EXISTS" => "The email address is already in use by another account".to_string(),
        "INVALID_EMAIL" => "The email address is badly formatted".to_string(),
        "WEAK_PASSWORD" => detail
            .unwrap_or("Password should be at least 6 characters")
            .to_string(),
        "USER_DISABLED" => "This account has been disabled".to_string(),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts, try again later".to_string(),
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" => {
            "Session expired, please sign in again".to_string()
        }
        other => other.to_string(),
    };
    AuthError::Api(format!("{message} ({})", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_response_builds_session() {
        let payload = r#"{
            "kind": "identitytoolkit#VerifyPasswordResponse",
            "localId": "uid-123",
            "email": "labe@example.com",
            "idToken": "id-token",
            "refreshToken": "refresh-token",
            "expiresIn": "3600",
            "registered": true
        }"#;
        let session = serde_json::from_str::<PasswordAuthResponse>(payload)
            .unwrap()
            .into_session()
            .unwrap();

        assert_eq!(session.user.id, "uid-123");
        assert_eq!(session.user.email.as_deref(), Some("labe@example.com"));
        assert!(!session.is_expired());
    }

    #[test]
    fn refresh_response_keeps_known_email() {
        let payload = r#"{
            "expires_in": "3600",
            "token_type": "Bearer",
            "refresh_token": "new-refresh",
            "id_token": "new-id",
            "user_id": "uid-123",
            "project_id": "42"
        }"#;
        let session = serde_json::from_str::<RefreshResponse>(payload)
            .unwrap()
            .into_session(Some("labe@example.com".to_string()))
            .unwrap();
        assert_eq!(session.id_token, "new-id");
        assert_eq!(session.user.email.as_deref(), Some("labe@example.com"));
    }

    #[test]
    fn response_without_tokens_is_rejected() {
        let payload = r#"{"localId": "uid", "expiresIn": "3600"}"#;
        let result = serde_json::from_str::<PasswordAuthResponse>(payload)
            .unwrap()
            .into_session();
        assert!(matches!(result, Err(AuthError::Api(_))));
    }

    #[test]
    fn credential_errors_map_to_invalid_credentials() {
        for code in ["EMAIL_NOT_FOUND", "INVALID_PASSWORD", "INVALID_LOGIN_CREDENTIALS"] {
            let body = format!(r#"{{"error":{{"code":400,"message":"{code}"}}}}"#);
            assert!(matches!(
                parse_api_error(StatusCode::BAD_REQUEST, &body),
                AuthError::InvalidCredentials
            ));
        }
    }

    #[test]
    fn weak_password_keeps_detail() {
        let body = r#"{"error":{"code":400,"message":"WEAK_PASSWORD : Password should be at least 6 characters"}}"#;
        match parse_api_error(StatusCode::BAD_REQUEST, body) {
            AuthError::Api(message) => {
                assert_eq!(message, "Password should be at least 6 characters (400)");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_json_errors_fall_back_to_body() {
        match parse_api_error(StatusCode::SERVICE_UNAVAILABLE, "") {
            AuthError::Api(message) => assert_eq!(message, "HTTP 503"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
