use dioxus::prelude::*;
use ui::Sidebar;
use ui::menu::{MenuSection, MenuState, home_link, menu_sections, parse_menu};

mod services;
mod views;

use views::{Account, AddUser, EditUser, Home, Login, Register, Roles, SystemUsers, UsersScreen};

pub const APP_TITLE: &str = "Admin Dashboard";

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/login?:error")]
    Login { error: Option<String> },
    #[route("/login/register?:error")]
    Register { error: Option<String> },
    #[layout(AuthenticatedLayout)]
        #[redirect("/", || Route::Home {})]
        #[route("/home")]
        Home {},
        #[route("/account")]
        Account {},
        #[nest("/system")]
            #[layout(UsersScreen)]
                #[route("/users")]
                SystemUsers {},
                #[route("/users/add")]
                AddUser {},
                #[route("/users/edit/:user_id")]
                EditUser { user_id: String },
            #[end_layout]
            #[route("/roles")]
            Roles {},
}

impl Route {
    pub fn users() -> Self {
        Route::SystemUsers {}
    }

    pub fn login_with_error(message: impl Into<String>) -> Self {
        Route::Login {
            error: Some(message.into()),
        }
    }

    /// The menu link this route highlights. The users modals keep the users
    /// entry active.
    fn menu_path(&self) -> String {
        match self {
            Route::AddUser {} | Route::EditUser { .. } => Route::users().to_string(),
            other => other.to_string(),
        }
    }
}

fn main() {
    #[cfg(feature = "server")]
    {
        server::init_tracing();
        dioxus::serve(|| async move { server::init(dioxus::server::router(App)) });
    }

    #[cfg(all(feature = "web", not(feature = "server")))]
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "{APP_TITLE}" }
        document::Link { rel: "icon", href: asset!("/assets/favicon.svg") }
        document::Link { rel: "stylesheet", href: asset!("/assets/main.css") }

        Router::<Route> {}
    }
}

fn load_menu() -> Vec<MenuSection> {
    match parse_menu(include_str!("menu.json")) {
        Ok(entries) => menu_sections(&entries),
        Err(error) => {
            tracing::error!(%error, "invalid menu definition");
            Vec::new()
        }
    }
}

/// Dismissable inline error.
#[component]
pub fn ErrorBanner(message: String, on_close: Option<EventHandler<()>>) -> Element {
    rsx! {
        div { class: "error-banner",
            div { class: "error-banner-content",
                span { class: "error-banner-message", "{message}" }
                if let Some(on_close) = on_close {
                    button {
                        class: "error-banner-close",
                        onclick: move |_| on_close.call(()),
                        "×"
                    }
                }
            }
        }
    }
}

#[component]
fn AuthenticatedLayout() -> Element {
    let mut menu = use_signal(MenuState::default);
    let sections = use_hook(load_menu);
    let route: Route = use_route();
    let user = use_server_future(api::get_current_user)?;

    match &*user.read() {
        Some(Ok(Some(person))) => {
            let label = person.label().to_string();
            let collapsed = menu.read().is_collapsed();
            let home = home_link(&sections)
                .map_or_else(|| Route::Home {}.to_string(), str::to_string);

            rsx! {
                div { class: if collapsed { "app-layout collapsed" } else { "app-layout" },
                    header { class: "app-header",
                        button {
                            class: "header-toggle",
                            title: "Toggle sidebar",
                            onclick: move |_| menu.write().toggle_sidebar(),
                            "☰"
                        }
                        Link { class: "header-title", to: home, "{APP_TITLE}" }
                        div { class: "header-user",
                            span { class: "header-user-name", "{label}" }
                            a { href: "/auth/logout", rel: "external", class: "header-logout", "Sign out" }
                        }
                    }
                    aside { class: "sidebar",
                        Sidebar { sections, current_path: route.menu_path(), menu }
                    }
                    main { class: "main-content",
                        Outlet::<Route> {}
                    }
                }
            }
        }
        Some(Ok(None)) | Some(Err(_)) => {
            let nav = navigator();
            nav.push(Route::Login { error: None });
            rsx! {
                div { class: "loading", "Redirecting to login..." }
            }
        }
        None => {
            rsx! {
                div { class: "loading", "Loading..." }
            }
        }
    }
}
