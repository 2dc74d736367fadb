use axum::{
    Form, Router,
    extract::State,
    http::{HeaderMap, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use jiff::Timestamp;
use serde::Deserialize;
use types::auth::validate_registration;

use crate::Backend;
use crate::identity::{AuthError, AuthUser, IdentityProvider};

pub fn auth_router(backend: Backend) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", get(logout))
        .with_state(backend)
}

#[derive(Deserialize)]
struct LoginForm {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct RegisterForm {
    email: String,
    password: String,
    confirm_password: String,
}

async fn login(State(backend): State<Backend>, Form(form): Form<LoginForm>) -> Response {
    match backend
        .identity()
        .sign_in(form.email.trim(), &form.password)
        .await
    {
        Ok(user) => signed_in(&backend, user),
        Err(error) => auth_failed("/login", &form.email, &error),
    }
}

async fn register(State(backend): State<Backend>, Form(form): Form<RegisterForm>) -> Response {
    if let Err(message) = validate_registration(&form.password, &form.confirm_password) {
        return redirect_with_error("/login/register", message);
    }

    match backend
        .identity()
        .sign_up(form.email.trim(), &form.password)
        .await
    {
        Ok(user) => signed_in(&backend, user),
        Err(error) => auth_failed("/login/register", &form.email, &error),
    }
}

async fn logout(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    if let Ok(session) = backend.signer().session_from_headers(&headers)
        && let Err(error) = backend.identity().sign_out(&session).await
    {
        tracing::warn!(%error, "sign out failed");
    }

    let cookie = backend.signer().clear_cookie();
    ([(SET_COOKIE, cookie.to_string())], Redirect::to("/login")).into_response()
}

fn signed_in(backend: &Backend, user: AuthUser) -> Response {
    let session = user.into_session(Timestamp::now());

    let token = match backend.signer().sign(&session) {
        Ok(token) => token,
        Err(error) => {
            tracing::error!(?error, "failed to sign session");
            return redirect_with_error("/login", "Could not start a session. Try again.");
        }
    };

    tracing::info!(email = session.email, "signed in");
    let cookie = backend.signer().session_cookie(token, &session);
    ([(SET_COOKIE, cookie.to_string())], Redirect::to("/home")).into_response()
}

fn auth_failed(page: &str, email: &str, error: &AuthError) -> Response {
    match error {
        AuthError::Transport(_) => tracing::error!(%error, email, "identity provider request failed"),
        _ => tracing::info!(%error, email, "authentication rejected"),
    }
    redirect_with_error(page, &error.user_message())
}

fn redirect_with_error(page: &str, message: &str) -> Response {
    let query: String = url::form_urlencoded::byte_serialize(message.as_bytes()).collect();
    // Spaces as %20 so the router's query decoding restores them.
    let query = query.replace('+', "%20");
    Redirect::to(&format!("{page}?error={query}")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::memory_backend;
    use axum::http::{StatusCode, header};

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    fn set_cookie(response: &Response) -> &str {
        response.headers()[SET_COOKIE].to_str().unwrap()
    }

    fn register_form(password: &str, confirm_password: &str) -> Form<RegisterForm> {
        Form(RegisterForm {
            email: "ana@example.com".into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        })
    }

    #[test]
    fn test_error_redirect_encodes_message() {
        let response = redirect_with_error("/login", "Incorrect email or password.");
        assert_eq!(
            location(&response),
            "/login?error=Incorrect%20email%20or%20password."
        );
    }

    #[tokio::test]
    async fn test_register_then_login_sets_cookie() {
        let backend = memory_backend();

        let response = register(State(backend.clone()), register_form("secret", "secret")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/home");
        assert!(set_cookie(&response).starts_with(types::SESSION_COOKIE_NAME));

        let response = login(
            State(backend.clone()),
            Form(LoginForm {
                email: " ana@example.com ".into(),
                password: "secret".into(),
            }),
        )
        .await;
        assert_eq!(location(&response), "/home");

        let response = login(
            State(backend),
            Form(LoginForm {
                email: "ana@example.com".into(),
                password: "wrong!".into(),
            }),
        )
        .await;
        assert_eq!(
            location(&response),
            "/login?error=Incorrect%20email%20or%20password."
        );
    }

    #[tokio::test]
    async fn test_register_validates_passwords() {
        let response = register(State(memory_backend()), register_form("secret", "secreT")).await;
        assert_eq!(
            location(&response),
            "/login/register?error=Passwords%20do%20not%20match."
        );

        let response = register(State(memory_backend()), register_form("abc", "abc")).await;
        assert_eq!(
            location(&response),
            "/login/register?error=Password%20must%20be%20at%20least%206%20characters."
        );
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let backend = memory_backend();
        let register_response =
            register(State(backend.clone()), register_form("secret", "secret")).await;
        let session_cookie = set_cookie(&register_response).split(';').next().unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, session_cookie.parse().unwrap());

        let response = logout(State(backend), headers).await;
        assert_eq!(location(&response), "/login");
        assert!(set_cookie(&response).contains("Max-Age=0"));
    }
}
