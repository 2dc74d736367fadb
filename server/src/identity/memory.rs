use base64::prelude::*;
use jiff::SignedDuration;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use types::UserSession;
use types::auth::{AuthErrorCode, MIN_PASSWORD_LEN};
use uuid::Uuid;

use super::{AuthError, AuthEvent, AuthEvents, AuthResult, AuthUser, IdentityProvider, Subscription};

const TOKEN_LIFETIME: SignedDuration = SignedDuration::from_hours(1);

struct Account {
    user_id: String,
    salt: String,
    password_hash: String,
}

/// Accounts held in process memory, for local development and tests.
#[derive(Clone, Default)]
pub struct MemoryIdentity {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
    events: AuthEvents,
}

fn hash_password(salt: &str, password: &str) -> String {
    let digest = Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(password.as_bytes())
        .finalize();
    BASE64_STANDARD_NO_PAD.encode(digest)
}

impl MemoryIdentity {
    pub fn new(events: AuthEvents) -> Self {
        Self {
            accounts: Arc::default(),
            events,
        }
    }

    fn signed_in(&self, user_id: &str, email: &str) -> AuthUser {
        self.events.publish(AuthEvent::SignedIn {
            user_id: user_id.to_string(),
            email: email.to_string(),
        });

        AuthUser {
            user_id: user_id.to_string(),
            email: email.to_string(),
            display_name: None,
            id_token: Uuid::new_v4().to_string().into(),
            expires_in: TOKEN_LIFETIME,
        }
    }
}

impl IdentityProvider for MemoryIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthUser> {
        let accounts = self.accounts.read().await;
        let account = accounts
            .get(email)
            .ok_or(AuthError::Rejected(AuthErrorCode::UserNotFound))?;

        if account.password_hash != hash_password(&account.salt, password) {
            return Err(AuthError::Rejected(AuthErrorCode::InvalidCredential));
        }

        Ok(self.signed_in(&account.user_id, email))
    }

    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<AuthUser> {
        let email = email.trim();
        let well_formed = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !well_formed {
            return Err(AuthError::Rejected(AuthErrorCode::InvalidEmail));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Rejected(AuthErrorCode::WeakPassword));
        }

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(email) {
            return Err(AuthError::Rejected(AuthErrorCode::EmailInUse));
        }

        let user_id = Uuid::now_v7().simple().to_string();
        let salt = Uuid::new_v4().simple().to_string();
        accounts.insert(
            email.to_string(),
            Account {
                user_id: user_id.clone(),
                password_hash: hash_password(&salt, password),
                salt,
            },
        );
        tracing::info!(email, "registered account");

        Ok(self.signed_in(&user_id, email))
    }

    async fn sign_out(&self, session: &UserSession) -> AuthResult<()> {
        self.events.publish(AuthEvent::SignedOut {
            user_id: session.user_id.clone(),
        });
        Ok(())
    }

    fn subscribe_auth_state<F>(&self, listener: F) -> Subscription
    where
        F: Fn(AuthEvent) + Send + 'static,
    {
        self.events.subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(result: AuthResult<AuthUser>) -> AuthErrorCode {
        match result {
            Err(AuthError::Rejected(code)) => code,
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let identity = MemoryIdentity::default();
        let created = identity.sign_up("ana@example.com", "secret").await.unwrap();
        let signed_in = identity.sign_in("ana@example.com", "secret").await.unwrap();
        assert_eq!(created.user_id, signed_in.user_id);
        assert_eq!(signed_in.email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_same_password_hashes_differently() {
        let identity = MemoryIdentity::default();
        identity.sign_up("ana@example.com", "secret").await.unwrap();
        identity.sign_up("bo@example.com", "secret").await.unwrap();

        let accounts = identity.accounts.read().await;
        let ana = &accounts["ana@example.com"];
        let bo = &accounts["bo@example.com"];
        assert_ne!(ana.salt, bo.salt);
        assert_ne!(ana.password_hash, bo.password_hash);
        assert_ne!(ana.password_hash, hash_password("", "secret"));
    }

    #[tokio::test]
    async fn test_sign_in_failures() {
        let identity = MemoryIdentity::default();
        identity.sign_up("ana@example.com", "secret").await.unwrap();

        assert_eq!(
            rejected(identity.sign_in("ana@example.com", "wrong!").await),
            AuthErrorCode::InvalidCredential
        );
        assert_eq!(
            rejected(identity.sign_in("bo@example.com", "secret").await),
            AuthErrorCode::UserNotFound
        );
    }

    #[tokio::test]
    async fn test_sign_up_failures() {
        let identity = MemoryIdentity::default();
        identity.sign_up("ana@example.com", "secret").await.unwrap();

        assert_eq!(
            rejected(identity.sign_up("ana@example.com", "another").await),
            AuthErrorCode::EmailInUse
        );
        assert_eq!(
            rejected(identity.sign_up("not-an-email", "secret").await),
            AuthErrorCode::InvalidEmail
        );
        assert_eq!(
            rejected(identity.sign_up("bo@example.com", "abc").await),
            AuthErrorCode::WeakPassword
        );
    }

    #[tokio::test]
    async fn test_events_published() {
        let events = AuthEvents::default();
        let identity = MemoryIdentity::new(events.clone());
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _subscription = identity.subscribe_auth_state(move |e| sink.lock().unwrap().push(e));

        let user = identity.sign_up("ana@example.com", "secret").await.unwrap();
        let session = user.clone().into_session(jiff::Timestamp::now());
        identity.sign_out(&session).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                AuthEvent::SignedIn {
                    user_id: user.user_id.clone(),
                    email: "ana@example.com".into(),
                },
                AuthEvent::SignedOut {
                    user_id: user.user_id,
                },
            ]
        );
    }
}
