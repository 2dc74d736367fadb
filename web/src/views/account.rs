use dioxus::prelude::*;

use crate::ErrorBanner;
use crate::services::to_error;

#[component]
pub fn Account() -> Element {
    let profile = use_server_future(api::get_account_profile)?;

    let body = match &*profile.read() {
        Some(Ok(user)) => {
            let name = user.display_name.clone().unwrap_or_default();
            let roles = if user.role.is_empty() {
                "None".to_string()
            } else {
                user.roles_text()
            };
            rsx! {
                div { class: "card",
                    dl { class: "detail-list",
                        dt { "Name" }
                        dd { "{name}" }
                        dt { "Email" }
                        dd { "{user.email}" }
                        dt { "Roles" }
                        dd { "{roles}" }
                        dt { "Id" }
                        dd { class: "text-muted", "{user.id}" }
                    }
                }
            }
        }
        Some(Err(e)) => {
            let message = to_error(e.clone()).message;
            rsx! { ErrorBanner { message } }
        }
        None => rsx! {
            div { class: "loading", "Loading account..." }
        },
    };

    rsx! {
        div {
            div { class: "page-header",
                div { class: "page-header-content",
                    h1 { class: "page-title", "Account" }
                    p { class: "page-subtitle", "Your profile in the users collection." }
                }
            }
            {body}
        }
    }
}
