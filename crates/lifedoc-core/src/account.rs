//! Registration, sign-in, and session lifecycle.

use crate::auth::{validate_credentials, AuthProvider};
use crate::session::Session;
use crate::{Error, Result};

/// Everything collected by the sign-up form.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// Source bytes of the profile picture, any decodable format.
    pub profile_image: Option<Vec<u8>>,
}

impl Registration {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("Name is required".to_string()));
        }
        validate_credentials(&self.email, &self.password)?;
        if self.password != self.confirm_password {
            return Err(Error::InvalidInput("Passwords do not match".to_string()));
        }
        if self.profile_image.as_ref().map_or(true, Vec::is_empty) {
            return Err(Error::InvalidInput(
                "A profile picture is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Turns auth provider results into [`Session`]s.
///
/// Profile creation is left to [`crate::repository::ProfileRepository`], which
/// needs the new session to reach the backend.
pub struct AccountService<A> {
    auth: A,
}

impl<A: AuthProvider> AccountService<A> {
    pub const fn new(auth: A) -> Self {
        Self { auth }
    }

    pub const fn auth(&self) -> &A {
        &self.auth
    }

    /// Validate the form and create the account.
    pub async fn register(&self, registration: &Registration) -> Result<Session> {
        registration.validate()?;
        let auth_session = self
            .auth
            .create_user(registration.email.trim(), &registration.password)
            .await?;
        Session::from_auth(&auth_session)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        validate_credentials(email, password)?;
        let auth_session = self.auth.sign_in(email.trim(), password).await?;
        Session::from_auth(&auth_session)
    }

    /// The persisted session from an earlier run, refreshed if needed.
    pub async fn restore(&self) -> Result<Option<Session>> {
        match self.auth.restore_session().await? {
            Some(auth_session) => Ok(Some(Session::from_auth(&auth_session)?)),
            None => Ok(None),
        }
    }

    pub async fn sign_out(&self, session: Session) -> Result<()> {
        self.auth.sign_out().await?;
        tracing::info!("Signed out {}", session.user_id());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthError, MemoryAuthProvider};
    use crate::test_support::sample_png;

    fn registration() -> Registration {
        Registration {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "secret-pw".to_string(),
            confirm_password: "secret-pw".to_string(),
            profile_image: Some(sample_png(20)),
        }
    }

    #[test]
    fn validate_accepts_complete_form() {
        assert!(registration().validate().is_ok());
    }

    #[test]
    fn validate_rejects_mismatched_passwords() {
        let form = Registration {
            confirm_password: "other-pw".to_string(),
            ..registration()
        };
        match form.validate().unwrap_err() {
            Error::InvalidInput(message) => assert_eq!(message, "Passwords do not match"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn validate_requires_picture_name_and_email() {
        let no_picture = Registration {
            profile_image: None,
            ..registration()
        };
        assert!(no_picture.validate().is_err());

        let no_name = Registration {
            name: " ".to_string(),
            ..registration()
        };
        assert!(no_name.validate().is_err());

        let no_email = Registration {
            email: String::new(),
            ..registration()
        };
        assert!(matches!(no_email.validate(), Err(Error::Auth(_))));
    }

    #[tokio::test]
    async fn register_sign_out_sign_in_restore() {
        let service = AccountService::new(MemoryAuthProvider::new());

        let session = service.register(&registration()).await.unwrap();
        assert!(!session.user_id().is_empty());
        let user_id = session.user_id().to_string();

        service.sign_out(session).await.unwrap();
        assert!(service.restore().await.unwrap().is_none());

        let session = service
            .sign_in("ana@example.com", "secret-pw")
            .await
            .unwrap();
        assert_eq!(session.user_id(), user_id);
        let restored = service.restore().await.unwrap().unwrap();
        assert_eq!(restored.user_id(), user_id);
    }

    #[tokio::test]
    async fn sign_in_with_wrong_password_fails() {
        let service = AccountService::new(MemoryAuthProvider::new());
        service.register(&registration()).await.unwrap();

        assert!(matches!(
            service.sign_in("ana@example.com", "wrong-pw").await,
            Err(Error::Auth(AuthError::InvalidCredentials))
        ));
    }

    #[tokio::test]
    async fn sign_in_rejects_empty_fields_before_calling_provider() {
        let service = AccountService::new(MemoryAuthProvider::new());
        assert!(service.sign_in("", "pw").await.is_err());
        assert!(service.sign_in("ana@example.com", "").await.is_err());
    }
}
