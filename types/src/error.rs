use serde::{Deserialize, Serialize};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A serializable error for client rendering.
///
/// Screens show `message` inline; nothing else about the failure is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Error {
    pub message: String,
}

impl Error {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The external backend was never configured for this deployment.
    pub fn backend_unavailable() -> Self {
        Self::new(BACKEND_UNAVAILABLE)
    }

    pub fn is_backend_unavailable(&self) -> bool {
        self.message == BACKEND_UNAVAILABLE
    }
}

pub const BACKEND_UNAVAILABLE: &str =
    "The backend is not configured. Check the dashboard configuration.";

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl From<anyhow::Error> for Error {
    fn from(report: anyhow::Error) -> Self {
        // Alternate Display joins the context chain with ": "
        Self {
            message: format!("{report:#}"),
        }
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self {
            message: s.to_string(),
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self { message: s }
    }
}
