pub mod auth;
pub mod document;
mod error;
mod session;
pub mod user;

pub use error::{BACKEND_UNAVAILABLE, Error, Result};
pub use session::{
    CurrentUser, SESSION_COOKIE_NAME, UserSession, decode_session, encode_session,
};
pub use user::{UserDraft, UserRecord};
