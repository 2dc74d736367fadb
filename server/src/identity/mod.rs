mod events;
mod firebase;
mod memory;

use jiff::{SignedDuration, Timestamp};
use secrecy::SecretString;
use std::future::Future;
use types::UserSession;
use types::auth::AuthErrorCode;

pub use events::{AuthEvent, AuthEvents, Subscription};
pub use firebase::FirebaseIdentity;
pub use memory::MemoryIdentity;

/// A successful sign-in or sign-up.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub id_token: SecretString,
    pub expires_in: SignedDuration,
}

impl AuthUser {
    pub fn into_session(self, now: Timestamp) -> UserSession {
        UserSession {
            user_id: self.user_id,
            email: self.email,
            display_name: self.display_name,
            id_token: self.id_token,
            expires_at: now.checked_add(self.expires_in).unwrap_or(Timestamp::MAX),
        }
    }
}

#[derive(Debug)]
pub enum AuthError {
    /// The provider refused the credentials or the new account.
    Rejected(AuthErrorCode),
    Unavailable,
    Transport(anyhow::Error),
}

impl AuthError {
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Rejected(code) => code.user_message(),
            AuthError::Unavailable => types::BACKEND_UNAVAILABLE.to_string(),
            AuthError::Transport(_) => "Could not reach the sign-in service. Try again.".into(),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Transport(error) => write!(f, "{error:#}"),
            other => write!(f, "{}", other.user_message()),
        }
    }
}

impl std::error::Error for AuthError {}

pub type AuthResult<T> = Result<T, AuthError>;

/// Email and password authentication against an external provider.
pub trait IdentityProvider {
    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = AuthResult<AuthUser>> + Send;

    fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = AuthResult<AuthUser>> + Send;

    fn sign_out(&self, session: &UserSession) -> impl Future<Output = AuthResult<()>> + Send;

    fn subscribe_auth_state<F>(&self, listener: F) -> Subscription
    where
        F: Fn(AuthEvent) + Send + 'static;
}

/// The identity provider selected by configuration.
#[derive(Clone)]
pub enum Identity {
    Firebase(FirebaseIdentity),
    Memory(MemoryIdentity),
    Unavailable(AuthEvents),
}

impl IdentityProvider for Identity {
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthUser> {
        match self {
            Identity::Firebase(identity) => identity.sign_in(email, password).await,
            Identity::Memory(identity) => identity.sign_in(email, password).await,
            Identity::Unavailable(_) => Err(AuthError::Unavailable),
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<AuthUser> {
        match self {
            Identity::Firebase(identity) => identity.sign_up(email, password).await,
            Identity::Memory(identity) => identity.sign_up(email, password).await,
            Identity::Unavailable(_) => Err(AuthError::Unavailable),
        }
    }

    async fn sign_out(&self, session: &UserSession) -> AuthResult<()> {
        match self {
            Identity::Firebase(identity) => identity.sign_out(session).await,
            Identity::Memory(identity) => identity.sign_out(session).await,
            Identity::Unavailable(_) => Ok(()),
        }
    }

    fn subscribe_auth_state<F>(&self, listener: F) -> Subscription
    where
        F: Fn(AuthEvent) + Send + 'static,
    {
        match self {
            Identity::Firebase(identity) => identity.subscribe_auth_state(listener),
            Identity::Memory(identity) => identity.subscribe_auth_state(listener),
            Identity::Unavailable(events) => events.subscribe(listener),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_identity() {
        let identity = Identity::Unavailable(AuthEvents::default());
        let err = identity.sign_in("a@example.com", "secret").await.unwrap_err();
        assert!(matches!(err, AuthError::Unavailable));
        assert_eq!(err.user_message(), types::BACKEND_UNAVAILABLE);
    }

    #[test]
    fn test_session_expiry_from_token_lifetime() {
        let user = AuthUser {
            user_id: "u1".into(),
            email: "a@example.com".into(),
            display_name: None,
            id_token: "t".to_string().into(),
            expires_in: SignedDuration::from_secs(3600),
        };
        let now = Timestamp::from_second(1_700_000_000).unwrap();
        let session = user.into_session(now);
        assert_eq!(session.expires_at.as_second(), 1_700_003_600);
    }
}
