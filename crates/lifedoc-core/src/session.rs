//! The signed-in user, handed to repositories and presenters at construction.

use std::fmt;

use crate::auth::AuthSession;
use crate::{Error, Result};

/// An authenticated user.
///
/// Created by [`crate::account::AccountService`] on sign-in, registration, or
/// restore and consumed by `sign_out`. The user id is never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    user_id: String,
    email: Option<String>,
    id_token: String,
}

impl Session {
    pub fn new(
        user_id: impl Into<String>,
        email: Option<String>,
        id_token: impl Into<String>,
    ) -> Result<Self> {
        let user_id = user_id.into().trim().to_string();
        if user_id.is_empty() {
            return Err(Error::NotSignedIn);
        }
        Ok(Self {
            user_id,
            email,
            id_token: id_token.into(),
        })
    }

    pub fn from_auth(session: &AuthSession) -> Result<Self> {
        Self::new(
            session.user.id.clone(),
            session.user.email.clone(),
            session.id_token.clone(),
        )
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Bearer token for the document and blob backends.
    #[must_use]
    pub fn id_token(&self) -> &str {
        &self.id_token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("id_token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_user_id_is_not_a_session() {
        assert!(matches!(
            Session::new("  ", None, "token"),
            Err(Error::NotSignedIn)
        ));
    }

    #[test]
    fn debug_redacts_token() {
        let session = Session::new("uid-1", None, "secret-id-token").unwrap();
        let rendered = format!("{session:?}");
        assert!(rendered.contains("uid-1"));
        assert!(!rendered.contains("secret-id-token"));
    }
}
