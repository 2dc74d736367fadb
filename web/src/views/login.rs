use dioxus::prelude::*;
use types::auth::validate_registration;

use crate::{APP_TITLE, ErrorBanner, Route};

/// Message to show instead of the form when the backend is not configured.
fn use_unavailable() -> Result<Option<String>, RenderError> {
    let status = use_server_future(api::backend_status)?;
    let message = status
        .read()
        .as_ref()
        .and_then(|result| result.as_ref().ok().cloned().flatten());
    Ok(message)
}

#[component]
pub fn Login(error: Option<String>) -> Element {
    let unavailable = use_unavailable()?;

    rsx! {
        div { class: "login-page",
            div { class: "login-card",
                div { class: "login-header",
                    h1 { class: "login-title", "{APP_TITLE}" }
                    p { class: "login-subtitle", "Sign in to continue" }
                }
                if let Some(message) = unavailable {
                    ErrorBanner { message }
                } else {
                    if let Some(message) = error {
                        ErrorBanner { message }
                    }
                    form { class: "login-form", action: "/auth/login", method: "post",
                        div { class: "form-group",
                            label { class: "form-label", r#for: "email", "Email" }
                            input {
                                id: "email",
                                name: "email",
                                class: "form-input",
                                r#type: "email",
                                placeholder: "email@example.com",
                                required: true,
                            }
                        }
                        div { class: "form-group",
                            label { class: "form-label", r#for: "password", "Password" }
                            input {
                                id: "password",
                                name: "password",
                                class: "form-input",
                                r#type: "password",
                                required: true,
                            }
                        }
                        button {
                            r#type: "submit",
                            class: "btn btn-primary login-btn",
                            "Sign in"
                        }
                    }
                    p { class: "login-footer",
                        "No account yet? "
                        Link { to: Route::Register { error: None }, "Register" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn Register(error: Option<String>) -> Element {
    let mut password = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let unavailable = use_unavailable()?;

    let check = validate_registration(&password.read(), &confirm.read());
    // Complain only once both fields have been typed into.
    let hint = match check {
        Err(message) if !confirm.read().is_empty() => Some(message),
        _ => None,
    };

    rsx! {
        div { class: "login-page",
            div { class: "login-card",
                div { class: "login-header",
                    h1 { class: "login-title", "{APP_TITLE}" }
                    p { class: "login-subtitle", "Create an account" }
                }
                if let Some(message) = unavailable {
                    ErrorBanner { message }
                } else {
                    if let Some(message) = error {
                        ErrorBanner { message }
                    }
                    form { class: "login-form", action: "/auth/register", method: "post",
                        div { class: "form-group",
                            label { class: "form-label", r#for: "email", "Email" }
                            input {
                                id: "email",
                                name: "email",
                                class: "form-input",
                                r#type: "email",
                                placeholder: "email@example.com",
                                required: true,
                            }
                        }
                        div { class: "form-group",
                            label { class: "form-label", r#for: "password", "Password" }
                            input {
                                id: "password",
                                name: "password",
                                class: "form-input",
                                r#type: "password",
                                value: "{password}",
                                oninput: move |e| password.set(e.value()),
                                required: true,
                            }
                        }
                        div { class: "form-group",
                            label { class: "form-label", r#for: "confirm_password", "Confirm password" }
                            input {
                                id: "confirm_password",
                                name: "confirm_password",
                                class: "form-input",
                                r#type: "password",
                                value: "{confirm}",
                                oninput: move |e| confirm.set(e.value()),
                                required: true,
                            }
                        }
                        if let Some(hint) = hint {
                            p { class: "form-hint error", "{hint}" }
                        }
                        button {
                            r#type: "submit",
                            class: "btn btn-primary login-btn",
                            disabled: check.is_err(),
                            "Register"
                        }
                    }
                    p { class: "login-footer",
                        "Already registered? "
                        Link { to: Route::Login { error: None }, "Sign in" }
                    }
                }
            }
        }
    }
}
