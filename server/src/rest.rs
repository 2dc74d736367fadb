use anyhow::Result;
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// A non-success response from a Google REST API.
#[derive(Debug)]
pub struct RestError {
    pub status: StatusCode,
    pub message: String,
}

impl std::fmt::Display for RestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.status)
    }
}

impl std::error::Error for RestError {}

impl RestError {
    fn from_body(status: StatusCode, body: &[u8]) -> Self {
        #[derive(Deserialize)]
        struct Envelope {
            error: Inner,
        }

        #[derive(Deserialize)]
        struct Inner {
            message: String,
        }

        let message = serde_json::from_slice::<Envelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        Self { status, message }
    }
}

pub trait ReqwestExt {
    async fn try_send<T: DeserializeOwned>(self) -> Result<T>;

    /// Like `try_send`, but a 404 becomes `None`.
    async fn try_send_optional<T: DeserializeOwned>(self) -> Result<Option<T>>;

    /// Sends and discards the response body.
    async fn try_send_empty(self) -> Result<()>;
}

impl ReqwestExt for RequestBuilder {
    async fn try_send<T: DeserializeOwned>(self) -> Result<T> {
        let response = self.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(RestError::from_body(status, &body).into());
        }

        match serde_json::from_slice(&body) {
            Ok(r) => Ok(r),
            Err(error) => {
                tracing::debug!(?error, %status, "failed to parse response");
                Err(error.into())
            }
        }
    }

    async fn try_send_optional<T: DeserializeOwned>(self) -> Result<Option<T>> {
        match self.try_send().await {
            Ok(value) => Ok(Some(value)),
            Err(error)
                if error
                    .downcast_ref::<RestError>()
                    .is_some_and(|e| e.status == StatusCode::NOT_FOUND) =>
            {
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    async fn try_send_empty(self) -> Result<()> {
        let response = self.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.bytes().await?;
            return Err(RestError::from_body(status, &body).into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_google_envelope() {
        let err = RestError::from_body(
            StatusCode::BAD_REQUEST,
            br#"{"error": {"code": 400, "message": "EMAIL_EXISTS", "errors": []}}"#,
        );
        assert_eq!(err.message, "EMAIL_EXISTS");
        assert_eq!(err.to_string(), "EMAIL_EXISTS (400 Bad Request)");
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        let err = RestError::from_body(StatusCode::BAD_GATEWAY, b"<html>");
        assert_eq!(err.message, "Bad Gateway");
    }
}
