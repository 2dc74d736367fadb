use jiff::SignedDuration;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use types::UserSession;
use types::auth::AuthErrorCode;

use super::{AuthError, AuthEvent, AuthEvents, AuthResult, AuthUser, IdentityProvider, Subscription};
use crate::rest::{ReqwestExt, RestError};

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1/";
const DEFAULT_TOKEN_LIFETIME: SignedDuration = SignedDuration::from_hours(1);

/// Firebase Authentication email/password accounts via the Identity
/// Toolkit REST API.
#[derive(Clone)]
pub struct FirebaseIdentity {
    client: Client,
    base_url: Url,
    api_key: SecretString,
    events: AuthEvents,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    email: String,
    display_name: Option<String>,
    id_token: SecretString,
    expires_in: Option<String>,
}

impl From<TokenResponse> for AuthUser {
    fn from(response: TokenResponse) -> Self {
        let expires_in = response
            .expires_in
            .and_then(|s| s.parse::<i64>().ok())
            .map(SignedDuration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_LIFETIME);

        AuthUser {
            user_id: response.local_id,
            email: response.email,
            display_name: response.display_name.filter(|n| !n.is_empty()),
            id_token: response.id_token,
            expires_in,
        }
    }
}

impl FirebaseIdentity {
    pub fn new(api_key: SecretString, events: AuthEvents) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::new(),
            base_url: Url::parse(IDENTITY_TOOLKIT_URL)?,
            api_key,
            events,
        })
    }

    async fn password_request(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
    ) -> AuthResult<AuthUser> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| AuthError::Transport(e.into()))?;

        let response: TokenResponse = self
            .client
            .post(url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .try_send()
            .await
            .map_err(classify)?;

        let user = AuthUser::from(response);
        self.events.publish(AuthEvent::SignedIn {
            user_id: user.user_id.clone(),
            email: user.email.clone(),
        });

        Ok(user)
    }
}

/// Provider error codes arrive as the message of a 400 response.
fn classify(error: anyhow::Error) -> AuthError {
    match error.downcast_ref::<RestError>() {
        Some(rest) if rest.status.is_client_error() => {
            AuthError::Rejected(AuthErrorCode::parse(&rest.message))
        }
        _ => AuthError::Transport(error),
    }
}

impl IdentityProvider for FirebaseIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthUser> {
        self.password_request("accounts:signInWithPassword", email, password)
            .await
    }

    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<AuthUser> {
        self.password_request("accounts:signUp", email, password)
            .await
    }

    /// ID tokens are stateless; ending the session only needs to be
    /// announced.
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
