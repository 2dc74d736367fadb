use dioxus::prelude::*;
use types::{CurrentUser, UserDraft, UserRecord};

#[cfg(feature = "server")]
async fn signed_in() -> ServerFnResult<(server::Backend, types::UserSession)> {
    server::require_session()
        .await
        .map_err(|error| ServerFnError::ServerError {
            message: error.to_string(),
            code: 401,
            details: None,
        })
}

/// `Some(message)` when the deployment has no usable backend.
#[post("/api/backend-status")]
pub async fn backend_status() -> ServerFnResult<Option<String>> {
    let backend = server::backend().await?;
    Ok((!backend.is_available()).then(|| types::BACKEND_UNAVAILABLE.to_string()))
}

#[post("/api/current-user")]
pub async fn get_current_user() -> ServerFnResult<Option<CurrentUser>> {
    let Ok(session) = server::get_session().await else {
        return Ok(None);
    };
    let backend = server::backend().await?;
    Ok(Some(server::current_user(&backend, &session).await))
}

#[post("/api/account")]
pub async fn get_account_profile() -> ServerFnResult<UserRecord> {
    let (backend, session) = signed_in().await?;
    Ok(server::account_profile(&backend, &session).await?)
}

#[post("/api/users")]
pub async fn list_users() -> ServerFnResult<Vec<UserRecord>> {
    let (backend, session) = signed_in().await?;
    Ok(server::list_users(&backend, &session).await?)
}

#[post("/api/users/get")]
pub async fn get_user(user_id: String) -> ServerFnResult<Option<UserRecord>> {
    let (backend, session) = signed_in().await?;
    Ok(server::get_user(&backend, &session, &user_id).await?)
}

#[post("/api/users/create")]
pub async fn create_user(draft: UserDraft) -> ServerFnResult<String> {
    let (backend, session) = signed_in().await?;
    Ok(server::create_user(&backend, &session, draft).await?)
}

#[post("/api/users/update")]
pub async fn update_user(user_id: String, draft: UserDraft) -> ServerFnResult<()> {
    let (backend, session) = signed_in().await?;
    server::update_user(&backend, &session, &user_id, draft).await?;
    Ok(())
}

#[post("/api/users/delete")]
pub async fn delete_user(user_id: String) -> ServerFnResult<()> {
    let (backend, session) = signed_in().await?;
    server::delete_user(&backend, &session, &user_id).await?;
    Ok(())
}
