use dioxus::prelude::*;

#[component]
pub fn Roles() -> Element {
    rsx! {
        div {
            div { class: "page-header",
                div { class: "page-header-content",
                    h1 { class: "page-title", "Roles" }
                }
            }
            div { class: "card",
                p { class: "text-muted", "Roles screen under construction." }
            }
        }
    }
}
