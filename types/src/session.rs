use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jiff::Timestamp;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

pub const SESSION_COOKIE_NAME: &str = "dashboard_session";

/// Server-side view of a signed-in user, stored in the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
    #[serde(with = "secret_string")]
    pub id_token: SecretString,
    pub expires_at: Timestamp,
}

impl UserSession {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }

    /// The part of the session that is safe to hand to the browser.
    pub fn current_user(&self) -> CurrentUser {
        CurrentUser {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

/// The signed-in identity as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl CurrentUser {
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.email)
    }
}

mod secret_string {
    use secrecy::SecretString;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use secrecy::ExposeSecret;
        serializer.serialize_str(secret.expose_secret())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.into())
    }
}

pub fn encode_session(session: &UserSession) -> Result<String> {
    let json = serde_json::to_string(session).context("failed to serialize session")?;
    Ok(URL_SAFE_NO_PAD.encode(json.as_bytes()))
}

pub fn decode_session(encoded: &str) -> Result<UserSession> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded)
        .context("failed to decode base64")?;
    let json = String::from_utf8(bytes).context("invalid UTF-8 in session")?;
    serde_json::from_str(&json).context("failed to parse session JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn session() -> UserSession {
        UserSession {
            user_id: "uid-1".into(),
            email: "ana@example.com".into(),
            display_name: None,
            id_token: "token".to_string().into(),
            expires_at: Timestamp::from_second(1_800_000_000).unwrap(),
        }
    }

    #[test]
    fn test_session_survives_cookie_encoding() {
        let decoded = decode_session(&encode_session(&session()).unwrap()).unwrap();
        assert_eq!(decoded.user_id, "uid-1");
        assert_eq!(decoded.id_token.expose_secret(), "token");
        assert_eq!(decoded.expires_at, session().expires_at);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_session("not base64 !!").is_err());
    }

    #[test]
    fn test_label_falls_back_to_email() {
        let mut user = session().current_user();
        assert_eq!(user.label(), "ana@example.com");
        user.display_name = Some("Ana".into());
        assert_eq!(user.label(), "Ana");
    }

    #[test]
    fn test_expiry() {
        let s = session();
        assert!(!s.is_expired(Timestamp::from_second(1_700_000_000).unwrap()));
        assert!(s.is_expired(s.expires_at));
    }
}
