use anyhow::{Result, bail};
use types::document::FieldValue;
use types::user::EMAIL_FIELD;
use types::{CurrentUser, UserDraft, UserRecord, UserSession};

use crate::Backend;
use crate::store::DocumentStore;

fn require_email(draft: &UserDraft) -> Result<()> {
    if draft.email.trim().is_empty() {
        bail!("Email is required.");
    }
    Ok(())
}

pub async fn list_users(backend: &Backend, session: &UserSession) -> Result<Vec<UserRecord>> {
    let documents = backend
        .store()
        .authorized(session)
        .list_all(backend.users_collection())
        .await?;

    Ok(documents.into_iter().map(UserRecord::from).collect())
}

pub async fn get_user(
    backend: &Backend,
    session: &UserSession,
    user_id: &str,
) -> Result<Option<UserRecord>> {
    let document = backend
        .store()
        .authorized(session)
        .get_by_id(backend.users_collection(), user_id)
        .await?;

    Ok(document.map(UserRecord::from))
}

pub async fn create_user(
    backend: &Backend,
    session: &UserSession,
    draft: UserDraft,
) -> Result<String> {
    require_email(&draft)?;

    let id = backend
        .store()
        .authorized(session)
        .create(backend.users_collection(), draft.into_fields())
        .await?;

    tracing::info!(user_id = id, by = session.email, "created user");
    Ok(id)
}

pub async fn update_user(
    backend: &Backend,
    session: &UserSession,
    user_id: &str,
    draft: UserDraft,
) -> Result<()> {
    require_email(&draft)?;

    backend
        .store()
        .authorized(session)
        .update(backend.users_collection(), user_id, draft.into_fields())
        .await?;

    tracing::info!(user_id, by = session.email, "updated user");
    Ok(())
}

pub async fn delete_user(backend: &Backend, session: &UserSession, user_id: &str) -> Result<()> {
    backend
        .store()
        .authorized(session)
        .delete(backend.users_collection(), user_id)
        .await?;

    tracing::info!(user_id, by = session.email, "deleted user");
    Ok(())
}

/// The signed-in user's profile record, matched by email. Falls back to the
/// identity provider's view when no record exists.
pub async fn account_profile(backend: &Backend, session: &UserSession) -> Result<UserRecord> {
    let matches = backend
        .store()
        .authorized(session)
        .query_by_field(
            backend.users_collection(),
            EMAIL_FIELD,
            &FieldValue::from(session.email.as_str()),
        )
        .await?;

    Ok(match matches.into_iter().next() {
        Some(document) => UserRecord::from(document),
        None => UserRecord {
            id: session.user_id.clone(),
            display_name: session.display_name.clone(),
            email: session.email.clone(),
            role: Vec::new(),
        },
    })
}

/// The session's user with the display name taken from their profile
/// record when one is set.
pub async fn current_user(backend: &Backend, session: &UserSession) -> CurrentUser {
    let mut user = session.current_user();

    match account_profile(backend, session).await {
        Ok(profile) => {
            if let Some(name) = profile.display_name.filter(|n| !n.trim().is_empty()) {
                user.display_name = Some(name);
            }
        }
        Err(error) => tracing::warn!(?error, "failed to load profile for header"),
    }

    user
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::memory_backend;
    use jiff::Timestamp;

    fn session() -> UserSession {
        UserSession {
            user_id: "uid-1".into(),
            email: "ana@example.com".into(),
            display_name: None,
            id_token: "token".to_string().into(),
            expires_at: Timestamp::MAX,
        }
    }

    #[tokio::test]
    async fn test_crud_through_backend() {
        let backend = memory_backend();
        let session = session();

        let id = create_user(
            &backend,
            &session,
            UserDraft::from_input("Bo", "bo@example.com", "editor"),
        )
        .await
        .unwrap();

        let users = list_users(&backend, &session).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].display_name.as_deref(), Some("Bo"));

        update_user(
            &backend,
            &session,
            &id,
            UserDraft::from_input("", "bo@example.com", "editor, admin"),
        )
        .await
        .unwrap();

        let user = get_user(&backend, &session, &id).await.unwrap().unwrap();
        assert_eq!(user.display_name, None);
        assert_eq!(user.role, vec!["editor", "admin"]);

        delete_user(&backend, &session, &id).await.unwrap();
        assert_eq!(get_user(&backend, &session, &id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_blank_email_rejected() {
        let backend = memory_backend();
        let err = create_user(&backend, &session(), UserDraft::from_input("Bo", "  ", ""))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Email is required.");
    }

    #[tokio::test]
    async fn test_account_profile_prefers_record() {
        let backend = memory_backend();
        let session = session();

        let fallback = account_profile(&backend, &session).await.unwrap();
        assert_eq!(fallback.id, "uid-1");
        assert!(fallback.role.is_empty());

        create_user(
            &backend,
            &session,
            UserDraft::from_input("Ana", "ana@example.com", "admin"),
        )
        .await
        .unwrap();

        let profile = account_profile(&backend, &session).await.unwrap();
        assert_eq!(profile.display_name.as_deref(), Some("Ana"));
        assert_eq!(profile.role, vec!["admin"]);
        assert_eq!(current_user(&backend, &session).await.label(), "Ana");
    }
}
