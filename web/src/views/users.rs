use dioxus::prelude::*;
use types::UserRecord;
use types::user::DISPLAY_NAME_FIELD;
use ui::DataGrid;
use ui::grid::GridState;
use ui::screen::{LoadState, UsersController, delete_selected, load_edit, refresh, save};

use crate::services::ApiUsers;
use crate::{ErrorBanner, Route};

fn use_screen() -> Signal<UsersController> {
    use_context::<Signal<UsersController>>()
}

/// Layout for `/system/users` and its modal routes. Owns the controller so
/// the list survives opening and closing the add/edit forms.
#[component]
pub fn UsersScreen() -> Element {
    let mut screen = use_context_provider(|| Signal::new(UsersController::default()));
    let grid: WriteSignal<GridState<UserRecord>> =
        use_hook(|| screen.map_mut(|c| &c.grid, |c| &mut c.grid).into());

    // Fetch users on mount
    use_effect(move || {
        spawn(async move {
            refresh(&screen, &ApiUsers).await;
        });
    });

    let controller = screen.read();
    let loading = controller.load == LoadState::Loading;
    let can_delete = controller.can_delete();
    let selected = controller.grid.selection().len();
    let error = controller.error.clone();

    let open_edit = move |user: UserRecord| {
        navigator().push(Route::EditUser { user_id: user.id });
    };

    rsx! {
        div {
            div { class: "page-header",
                div { class: "page-header-content",
                    h1 { class: "page-title", "Users" }
                    p { class: "page-subtitle", "Records of the users collection." }
                }
                div { class: "page-header-actions",
                    button {
                        class: "btn btn-secondary",
                        title: "Refresh",
                        disabled: loading,
                        onclick: move |_| {
                            spawn(async move {
                                refresh(&screen, &ApiUsers).await;
                            });
                        },
                        "⟳"
                    }
                    button {
                        class: "btn btn-danger",
                        disabled: !can_delete,
                        onclick: move |_| {
                            spawn(async move {
                                delete_selected(&screen, &ApiUsers).await;
                            });
                        },
                        if selected > 0 { "Delete ({selected})" } else { "Delete" }
                    }
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| {
                            navigator().push(Route::AddUser {});
                        },
                        "Add"
                    }
                }
            }

            if let Some(message) = error {
                ErrorBanner { message, on_close: move |_| screen.write().error = None }
            }

            div { class: "card",
                DataGrid::<UserRecord> {
                    state: grid,
                    selectable: true,
                    link_column: DISPLAY_NAME_FIELD.to_string(),
                    on_detail: open_edit,
                    on_edit: open_edit,
                    empty_message: "No users in the \"users\" collection.",
                }
            }

            Outlet::<Route> {}
        }
    }
}

#[component]
pub fn SystemUsers() -> Element {
    let mut screen = use_screen();

    // Back navigation out of a modal route leaves no stale form behind.
    use_effect(move || {
        screen.write().close_modal();
    });

    rsx! {}
}

#[component]
pub fn AddUser() -> Element {
    let mut screen = use_screen();

    use_effect(move || screen.write().open_add());

    rsx! { UserModal {} }
}

#[component]
pub fn EditUser(user_id: ReadSignal<String>) -> Element {
    let screen = use_screen();

    use_effect(move || {
        let user_id = user_id();
        spawn(async move {
            load_edit(&screen, &ApiUsers, &user_id).await;
        });
    });

    rsx! { UserModal {} }
}

#[component]
fn UserModal() -> Element {
    let mut screen = use_screen();

    let controller = screen.read();
    let Some(modal) = controller.modal.clone() else {
        return rsx! {};
    };
    let saving = controller.saving;
    let can_save = controller.can_save();
    let title = modal.title();

    let close = move |_: MouseEvent| {
        if screen.write().close_modal() {
            navigator().push(Route::users());
        }
    };

    rsx! {
        div { class: "modal-overlay",
            onclick: close,
            div { class: "modal",
                onclick: move |e| e.stop_propagation(),
                div { class: "modal-header",
                    h2 { class: "modal-title", "{title}" }
                    button {
                        class: "modal-close",
                        onclick: close,
                        "×"
                    }
                }
                div { class: "modal-body",
                    if let Some(error) = &modal.error {
                        div { class: "form-error", "{error}" }
                    }
                    if modal.loading {
                        div { class: "loading", "Loading user..." }
                    } else {
                        div { class: "form-group",
                            label { class: "form-label", r#for: "display_name", "Name" }
                            input {
                                id: "display_name",
                                class: "form-input",
                                r#type: "text",
                                placeholder: "Display name",
                                value: "{modal.form.display_name}",
                                oninput: move |e| {
                                    if let Some(form) = screen.write().form_mut() {
                                        form.display_name = e.value();
                                    }
                                },
                            }
                        }
                        div { class: "form-group",
                            label { class: "form-label", r#for: "email", "Email *" }
                            input {
                                id: "email",
                                class: "form-input",
                                r#type: "email",
                                placeholder: "email@example.com",
                                value: "{modal.form.email}",
                                oninput: move |e| {
                                    if let Some(form) = screen.write().form_mut() {
                                        form.email = e.value();
                                    }
                                },
                            }
                        }
                        div { class: "form-group",
                            label { class: "form-label", r#for: "roles", "Roles (comma separated)" }
                            input {
                                id: "roles",
                                class: "form-input",
                                r#type: "text",
                                placeholder: "admin, editor",
                                value: "{modal.form.roles}",
                                oninput: move |e| {
                                    if let Some(form) = screen.write().form_mut() {
                                        form.roles = e.value();
                                    }
                                },
                            }
                        }
                    }
                }
                div { class: "modal-footer",
                    button {
                        class: "btn btn-secondary",
                        disabled: saving,
                        onclick: close,
                        "Cancel"
                    }
                    button {
                        class: "btn btn-primary",
                        disabled: !can_save,
                        onclick: move |_| {
                            spawn(async move {
                                if save(&screen, &ApiUsers).await {
                                    navigator().push(Route::users());
                                }
                            });
                        },
                        if saving { "Saving…" } else { "Save" }
                    }
                }
            }
        }
    }
}
