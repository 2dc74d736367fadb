use dioxus::prelude::*;
use types::UserRecord;
use ui::DataGrid;
use ui::grid::GridState;
use ui::screen::user_columns;

use crate::ErrorBanner;
use crate::services::to_error;

/// Landing page: a read-only look at the users collection.
#[component]
pub fn Home() -> Element {
    let mut grid = use_signal(|| GridState::<UserRecord>::new(user_columns()).with_page_sizes(&[5]));
    let mut error = use_signal(|| None::<String>);

    use_effect(move || {
        spawn(async move {
            grid.write().set_loading(true);
            match api::list_users().await {
                Ok(users) => grid.write().set_datasource(users),
                Err(e) => {
                    grid.write().clear_datasource();
                    error.set(Some(to_error(e).message));
                }
            }
            grid.write().set_loading(false);
        });
    });

    rsx! {
        div {
            div { class: "page-header",
                div { class: "page-header-content",
                    h1 { class: "page-title", "Home" }
                    p { class: "page-subtitle", "Overview of the users collection." }
                }
            }
            if let Some(message) = error() {
                ErrorBanner { message, on_close: move |_| error.set(None) }
            }
            div { class: "card",
                div { class: "card-header",
                    h2 { class: "card-title", "Users" }
                }
                DataGrid::<UserRecord> {
                    state: grid,
                    empty_message: "No users in the \"users\" collection.",
                }
            }
        }
    }
}
