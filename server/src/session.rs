use anyhow::{Context, Result, anyhow, bail};
use axum::http::HeaderMap;
use base64::prelude::*;
use cookie::Cookie;
use hmac::{Hmac, Mac};
use jiff::Timestamp;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use types::{SESSION_COOKIE_NAME, UserSession, decode_session, encode_session};

type HmacSha256 = Hmac<Sha256>;

/// Signs session cookies so the browser cannot alter them.
///
/// A token is `<base64 session>.<base64 hmac>`.
#[derive(Clone)]
pub struct SessionSigner {
    key: SecretString,
    secure_cookies: bool,
}

impl SessionSigner {
    pub fn new(key: SecretString, secure_cookies: bool) -> Self {
        Self {
            key,
            secure_cookies,
        }
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(self.key.expose_secret().as_bytes())
            .map_err(|e| anyhow!("invalid session key: {e}"))
    }

    pub fn sign(&self, session: &UserSession) -> Result<String> {
        let payload = encode_session(session)?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = BASE64_URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{payload}.{signature}"))
    }

    pub fn verify(&self, token: &str, now: Timestamp) -> Result<UserSession> {
        let (payload, signature) = token
            .rsplit_once('.')
            .context("invalid session token format")?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = BASE64_URL_SAFE_NO_PAD
            .decode(signature)
            .context("invalid session signature encoding")?;
        mac.verify_slice(&signature)
            .map_err(|_| anyhow!("session signature mismatch"))?;

        let session = decode_session(payload)?;
        if session.is_expired(now) {
            bail!("session expired");
        }

        Ok(session)
    }

    /// Reads and verifies the session cookie from request headers.
    pub fn session_from_headers(&self, headers: &HeaderMap) -> Result<UserSession> {
        let cookie_header = headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .context("no cookies in request")?;

        let token = Cookie::split_parse(cookie_header)
            .filter_map(|c| c.ok())
            .find(|c| c.name() == SESSION_COOKIE_NAME)
            .context("session cookie not found")?;

        self.verify(token.value(), Timestamp::now())
    }

    pub fn session_cookie(&self, token: String, session: &UserSession) -> Cookie<'static> {
        let max_age = session
            .expires_at
            .duration_since(Timestamp::now())
            .as_secs()
            .max(0);

        Cookie::build((SESSION_COOKIE_NAME, token))
            .path("/")
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(cookie::SameSite::Lax)
            .max_age(cookie::time::Duration::seconds(max_age))
            .build()
    }

    pub fn clear_cookie(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, ""))
            .path("/")
            .http_only(true)
            .secure(self.secure_cookies)
            .max_age(cookie::time::Duration::ZERO)
            .build()
    }
}
