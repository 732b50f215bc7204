//! In-process auth provider for tests and local demos.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use super::{validate_credentials, AuthError, AuthProvider, AuthResult, AuthSession, AuthUser};
use crate::util::unix_timestamp_now;

const MIN_PASSWORD_LEN: usize = 6;
const SESSION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug)]
struct Account {
    user_id: String,
    password: String,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<String, Account>,
    current: Option<AuthSession>,
}

/// Accounts and the current session held in memory, with the same password
/// rules as Firebase (at least six characters, unique email).
#[derive(Debug, Clone, Default)]
pub struct MemoryAuthProvider {
    state: Arc<Mutex<State>>,
}

impl MemoryAuthProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AuthResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }
}

fn issue_session(user_id: &str, email: &str) -> AuthSession {
    AuthSession {
        id_token: format!("memory-id-{}", Uuid::now_v7().simple()),
        refresh_token: format!("memory-refresh-{}", Uuid::now_v7().simple()),
        expires_at: unix_timestamp_now() + SESSION_LIFETIME_SECS,
        user: AuthUser {
            id: user_id.to_string(),
            email: Some(email.to_string()),
        },
    }
}

impl AuthProvider for MemoryAuthProvider {
    async fn restore_session(&self) -> AuthResult<Option<AuthSession>> {
        let mut state = self.lock()?;
        if let Some(session) = state.current.as_mut() {
            if session.is_expired() {
                session.expires_at = unix_timestamp_now() + SESSION_LIFETIME_SECS;
            }
        }
        Ok(state.current.clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        validate_credentials(email, password)?;
        let key = email.trim().to_lowercase();
        let mut state = self.lock()?;
        let user_id = match state.accounts.get(&key) {
            Some(account) if account.password == password => account.user_id.clone(),
            _ => return Err(AuthError::InvalidCredentials),
        };
        let session = issue_session(&user_id, &key);
        state.current = Some(session.clone());
        Ok(session)
    }

    async fn create_user(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        validate_credentials(email, password)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Api(
                "Password should be at least 6 characters".to_string(),
            ));
        }
        let key = email.trim().to_lowercase();
        let mut state = self.lock()?;
        if state.accounts.contains_key(&key) {
            return Err(AuthError::Api(
                "The email address is already in use by another account".to_string(),
            ));
        }

        let user_id = Uuid::now_v7().simple().to_string();
        state.accounts.insert(
            key.clone(),
            Account {
                user_id: user_id.clone(),
                password: password.to_string(),
            },
        );
        let session = issue_session(&user_id, &key);
        state.current = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> AuthResult<()> {
        self.lock()?.current = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_user_signs_in_and_sign_out_clears() {
        let auth = MemoryAuthProvider::new();
        let session = auth.create_user("Labe@Example.com", "secret1").await.unwrap();
        assert_eq!(
            auth.current_user_id().await.unwrap().as_deref(),
            Some(session.user.id.as_str())
        );

        auth.sign_out().await.unwrap();
        assert!(auth.current_user_id().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sign_in_checks_password() {
        let auth = MemoryAuthProvider::new();
        let created = auth.create_user("labe@example.com", "secret1").await.unwrap();

        assert!(matches!(
            auth.sign_in("labe@example.com", "wrong-pw").await,
            Err(AuthError::InvalidCredentials)
        ));
        let session = auth.sign_in(" LABE@example.com ", "secret1").await.unwrap();
        assert_eq!(session.user.id, created.user.id);
    }

    #[tokio::test]
    async fn create_user_rejects_duplicates_and_weak_passwords() {
        let auth = MemoryAuthProvider::new();
        assert!(matches!(
            auth.create_user("a@b.c", "123").await,
            Err(AuthError::Api(_))
        ));
        auth.create_user("a@b.c", "123456").await.unwrap();
        assert!(matches!(
            auth.create_user("A@B.C", "654321").await,
            Err(AuthError::Api(_))
        ));
    }
}
