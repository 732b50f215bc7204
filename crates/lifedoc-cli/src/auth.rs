//! Firebase sign-in for CLI profiles, with sessions kept in the OS keychain.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use lifedoc_core::account::AccountService;
use lifedoc_core::auth::{AuthError, AuthResult, AuthSession, FirebaseAuthClient, SessionPersistence};
use lifedoc_core::config::FirebaseConfig;

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "lifedoc-cli";

/// Account service backed by Firebase Auth for one profile.
pub type CliAccountService = AccountService<FirebaseAuthClient<SessionStore>>;

#[derive(Clone)]
pub struct SessionStore {
    username: String,
}

impl SessionStore {
    pub fn new(profile_name: &str) -> Self {
        Self {
            username: format!("firebase_session:{profile_name}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> AuthResult<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }
}

impl SessionPersistence for SessionStore {
    #[cfg(not(test))]
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        let store = Self::test_store();
        let guard = store
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        if let Some(raw) = guard.get(&self.username) {
            Ok(Some(serde_json::from_str(raw)?))
        } else {
            Ok(None)
        }
    }

    #[cfg(not(test))]
    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let raw = serde_json::to_string(session)?;
        self.entry()?
            .set_password(&raw)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        Ok(())
    }

    #[cfg(test)]
    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let raw = serde_json::to_string(session)?;
        let store = Self::test_store();
        let mut guard = store
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard.insert(self.username.clone(), raw);
        Ok(())
    }

    #[cfg(not(test))]
    fn clear_session(&self) -> AuthResult<()> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear_session(&self) -> AuthResult<()> {
        let store = Self::test_store();
        let mut guard = store
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}

pub fn account_service(profile_name: &str, config: &FirebaseConfig) -> AuthResult<CliAccountService> {
    let client = FirebaseAuthClient::new(config, SessionStore::new(profile_name))?;
    Ok(AccountService::new(client))
}

pub fn load_stored_session(profile_name: &str) -> AuthResult<Option<AuthSession>> {
    SessionStore::new(profile_name).load_session()
}

pub fn clear_stored_session(profile_name: &str) -> AuthResult<()> {
    SessionStore::new(profile_name).clear_session()
}

#[cfg(test)]
mod tests {
    use lifedoc_core::auth::AuthUser;

    use super::*;

    fn session(user_id: &str) -> AuthSession {
        AuthSession {
            id_token: "id-token".to_string(),
            refresh_token: "refresh-token".to_string(),
            expires_at: 1_700_000_000,
            user: AuthUser {
                id: user_id.to_string(),
                email: Some("ana@example.com".to_string()),
            },
        }
    }

    #[test]
    fn session_store_is_scoped_per_profile() {
        let work = SessionStore::new("auth-test-work");
        let home = SessionStore::new("auth-test-home");
        work.save_session(&session("work-user")).unwrap();

        assert_eq!(
            load_stored_session("auth-test-work")
                .unwrap()
                .map(|stored| stored.user.id),
            Some("work-user".to_string())
        );
        assert!(home.load_session().unwrap().is_none());

        clear_stored_session("auth-test-work").unwrap();
        assert!(load_stored_session("auth-test-work").unwrap().is_none());
    }

    #[test]
    fn account_service_builds_for_complete_config() {
        let config = FirebaseConfig {
            api_key: "key".to_string(),
            project_id: "life-documentation".to_string(),
            storage_bucket: "life-documentation.appspot.com".to_string(),
        };
        assert!(account_service("auth-test-build", &config).is_ok());
    }
}
