use dioxus::prelude::*;
use types::{UserDraft, UserRecord};
use ui::screen::UserService;

use crate::Route;

/// Converts a server function failure into the message shown inline. An
/// expired session sends the user back to the login page instead.
pub fn to_error(error: ServerFnError) -> types::Error {
    match error {
        ServerFnError::ServerError { message, code: 401, .. } => {
            navigator().push(Route::login_with_error(message.clone()));
            types::Error::new(message)
        }
        ServerFnError::ServerError { message, .. } => types::Error::new(message),
        other => types::Error::new(other.to_string()),
    }
}

/// The users collection reached through the server functions.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApiUsers;

impl UserService for ApiUsers {
    async fn list(&self) -> types::Result<Vec<UserRecord>> {
        api::list_users().await.map_err(to_error)
    }

    async fn get(&self, user_id: &str) -> types::Result<Option<UserRecord>> {
        api::get_user(user_id.to_string()).await.map_err(to_error)
    }

    async fn create(&self, draft: UserDraft) -> types::Result<String> {
        api::create_user(draft).await.map_err(to_error)
    }

    async fn update(&self, user_id: &str, draft: UserDraft) -> types::Result<()> {
        api::update_user(user_id.to_string(), draft)
            .await
            .map_err(to_error)
    }

    async fn delete(&self, user_id: &str) -> types::Result<()> {
        api::delete_user(user_id.to_string())
            .await
            .map_err(to_error)
    }
}
