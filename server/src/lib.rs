mod auth_routes;
mod backend;
mod config;
pub mod identity;
mod rest;
mod session;
pub mod store;
mod users;

use anyhow::{Context, Result};
use axum::http::HeaderMap;
use axum::{Extension, Router};
use dioxus::fullstack::FullstackContext;
use types::UserSession;

use crate::auth_routes::auth_router;
pub use crate::backend::Backend;
pub use crate::config::{BackendKind, Config};
use crate::identity::IdentityProvider;
pub use crate::session::SessionSigner;
pub use crate::users::{
    account_profile, create_user, current_user, delete_user, get_user, list_users, update_user,
};

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();
}

/// Builds the backend from configuration and wires it into `app`: the
/// `/auth/*` routes get it as state, server functions through a request
/// extension.
pub fn init(app: Router) -> Result<Router> {
    let config = Config::load()?;
    let backend = Backend::from_config(&config)?;

    // Lives for the whole process.
    let _auth_log = backend.identity().subscribe_auth_state(|event| {
        tracing::info!(?event, "auth state changed");
    });

    Ok(app
        .merge(auth_router(backend.clone()))
        .layer(Extension(backend)))
}

/// The backend attached to the current request.
pub async fn backend() -> Result<Backend> {
    let Extension(backend) = FullstackContext::extract::<Extension<Backend>, _>()
        .await
        .context("backend not attached to request")?;
    Ok(backend)
}

/// The verified session of the current request, if any.
pub async fn get_session() -> Result<UserSession> {
    let backend = backend().await?;
    let headers: HeaderMap = FullstackContext::extract().await?;
    backend.signer().session_from_headers(&headers)
}

/// Require a signed-in user, returning the backend and their session.
pub async fn require_session() -> Result<(Backend, UserSession)> {
    let backend = backend().await?;
    let headers: HeaderMap = FullstackContext::extract().await?;
    let session = backend
        .signer()
        .session_from_headers(&headers)
        .context("Your session has expired. Sign in again.")?;
    Ok((backend, session))
}
