//! Controller for the users CRUD screen.
//!
//! State changes are plain methods on [`UsersController`] so they can be
//! tested without a renderer. The async flows (`refresh`, `save`,
//! `delete_selected`, `load_edit`) interleave those methods with calls to a
//! [`UserService`], writing through a [`ScreenHandle`] between awaits.

use dioxus::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use types::{UserDraft, UserRecord};

use crate::grid::{ColumnDef, GridState};

pub const USER_NOT_FOUND: &str = "User not found.";

/// The users collection as seen by the screen.
#[allow(async_fn_in_trait)]
pub trait UserService {
    async fn list(&self) -> types::Result<Vec<UserRecord>>;

    async fn get(&self, user_id: &str) -> types::Result<Option<UserRecord>>;

    async fn create(&self, draft: UserDraft) -> types::Result<String>;

    async fn update(&self, user_id: &str, draft: UserDraft) -> types::Result<()>;

    async fn delete(&self, user_id: &str) -> types::Result<()>;
}

/// Columns of the users grid.
pub fn user_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("Name", "displayName", 1),
        ColumnDef::new("Email", "email", 2),
        ColumnDef::new("Roles", "role", 3),
    ]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// Raw text of the add/edit form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserForm {
    pub display_name: String,
    pub email: String,
    pub roles: String,
}

impl UserForm {
    pub fn from_record(user: &UserRecord) -> Self {
        Self {
            display_name: user.display_name.clone().unwrap_or_default(),
            email: user.email.clone(),
            roles: user.roles_text(),
        }
    }

    pub fn has_email(&self) -> bool {
        !self.email.trim().is_empty()
    }

    pub fn to_draft(&self) -> UserDraft {
        UserDraft::from_input(&self.display_name, &self.email, &self.roles)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit { user_id: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormModal {
    pub mode: FormMode,
    pub form: UserForm,
    /// The edit target is being fetched by id.
    pub loading: bool,
    pub error: Option<String>,
}

impl FormModal {
    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Add => "Add user",
            FormMode::Edit { .. } => "Edit user",
        }
    }
}

/// What `begin_save` asks the service to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveRequest {
    Create(UserDraft),
    Update { user_id: String, draft: UserDraft },
}

#[derive(Clone, Debug, PartialEq)]
pub struct UsersController {
    pub grid: GridState<UserRecord>,
    pub load: LoadState,
    /// Screen-level failure: fetch or bulk delete.
    pub error: Option<String>,
    /// A save or delete is in flight.
    pub saving: bool,
    pub modal: Option<FormModal>,
}

impl Default for UsersController {
    fn default() -> Self {
        Self {
            grid: GridState::new(user_columns()),
            load: LoadState::Idle,
            error: None,
            saving: false,
            modal: None,
        }
    }
}

impl UsersController {
    pub fn begin_fetch(&mut self) {
        self.load = LoadState::Loading;
        self.error = None;
        self.grid.set_loading(true);
    }

    pub fn finish_fetch(&mut self, result: types::Result<Vec<UserRecord>>) {
        match result {
            Ok(users) => {
                self.grid.set_datasource(users);
                self.load = LoadState::Loaded;
            }
            Err(error) => {
                self.grid.clear_datasource();
                self.error = Some(error.message);
                self.load = LoadState::Errored;
            }
        }
        self.grid.set_loading(false);
    }

    pub fn open_add(&mut self) {
        self.modal = Some(FormModal {
            mode: FormMode::Add,
            form: UserForm::default(),
            loading: false,
            error: None,
        });
    }

    pub fn open_edit(&mut self, user: &UserRecord) {
        self.modal = Some(FormModal {
            mode: FormMode::Edit {
                user_id: user.id.clone(),
            },
            form: UserForm::from_record(user),
            loading: false,
            error: None,
        });
    }

    /// Opens the edit form for `user_id`, pre-filled from the loaded rows.
    /// Returns `true` when the row is not loaded and must be fetched.
    pub fn open_edit_by_id(&mut self, user_id: &str) -> bool {
        let loaded = self
            .grid
            .rows()
            .iter()
            .find(|u| u.id == user_id)
            .cloned();

        match loaded {
            Some(user) => {
                self.open_edit(&user);
                false
            }
            None => {
                self.modal = Some(FormModal {
                    mode: FormMode::Edit {
                        user_id: user_id.to_string(),
                    },
                    form: UserForm::default(),
                    loading: true,
                    error: None,
                });
                true
            }
        }
    }

    pub fn finish_edit_lookup(&mut self, user_id: &str, result: types::Result<Option<UserRecord>>) {
        let Some(modal) = self.modal.as_mut() else {
            return;
        };
        // The route may have moved on while the lookup was in flight.
        if modal.mode != (FormMode::Edit { user_id: user_id.to_string() }) {
            return;
        }

        modal.loading = false;
        match result {
            Ok(Some(user)) => modal.form = UserForm::from_record(&user),
            Ok(None) => modal.error = Some(USER_NOT_FOUND.to_string()),
            Err(error) => modal.error = Some(error.message),
        }
    }

    /// The open form, unless it is still loading its user.
    pub fn form_mut(&mut self) -> Option<&mut UserForm> {
        self.modal
            .as_mut()
            .filter(|m| !m.loading)
            .map(|m| &mut m.form)
    }

    pub fn can_save(&self) -> bool {
        !self.saving
            && self
                .modal
                .as_ref()
                .is_some_and(|m| !m.loading && m.form.has_email())
    }

    /// Closing is refused while a save is in flight.
    pub fn close_modal(&mut self) -> bool {
        if self.saving {
            return false;
        }
        self.modal = None;
        true
    }

    pub fn begin_save(&mut self) -> Option<SaveRequest> {
        if !self.can_save() {
            return None;
        }
        let modal = self.modal.as_mut()?;

        self.saving = true;
        modal.error = None;

        let draft = modal.form.to_draft();
        Some(match &modal.mode {
            FormMode::Add => SaveRequest::Create(draft),
            FormMode::Edit { user_id } => SaveRequest::Update {
                user_id: user_id.clone(),
                draft,
            },
        })
    }

    /// Returns `true` when the save succeeded and the list must be
    /// re-fetched. On failure the modal stays open with its input.
    pub fn finish_save(&mut self, result: types::Result<()>) -> bool {
        self.saving = false;
        match result {
            Ok(()) => {
                self.modal = None;
                true
            }
            Err(error) => {
                if let Some(modal) = self.modal.as_mut() {
                    modal.error = Some(error.message);
                }
                false
            }
        }
    }

    pub fn can_delete(&self) -> bool {
        !self.saving && !self.grid.selection().is_empty()
    }

    /// Ids to delete, in datasource order. Empty when nothing should happen.
    pub fn begin_delete(&mut self) -> Vec<String> {
        if !self.can_delete() {
            return Vec::new();
        }
        self.saving = true;
        self.error = None;
        self.grid
            .selected_rows()
            .into_iter()
            .map(|u| u.id)
            .collect()
    }

    /// Every attempted delete is reported; the last failure is surfaced and
    /// returned so it can outlive the re-fetch.
    pub fn finish_delete(&mut self, failures: Vec<(String, types::Error)>) -> Option<String> {
        self.saving = false;
        self.grid.clear_selection();
        let message = failures.into_iter().last().map(|(_, error)| error.message);
        self.error.clone_from(&message);
        message
    }

    /// Re-surfaces an earlier failure. A fetch error takes precedence.
    pub fn restore_error(&mut self, message: String) {
        if self.error.is_none() {
            self.error = Some(message);
        }
    }
}

/// Shared, mutable access to a controller from async flows.
pub trait ScreenHandle {
    fn update<T>(&self, f: impl FnOnce(&mut UsersController) -> T) -> T;
}

impl ScreenHandle for Signal<UsersController> {
    fn update<T>(&self, f: impl FnOnce(&mut UsersController) -> T) -> T {
        let mut signal = *self;
        let mut controller = signal.write();
        f(&mut controller)
    }
}

impl ScreenHandle for Rc<RefCell<UsersController>> {
    fn update<T>(&self, f: impl FnOnce(&mut UsersController) -> T) -> T {
        f(&mut self.borrow_mut())
    }
}

pub async fn refresh(screen: &impl ScreenHandle, service: &impl UserService) {
    screen.update(UsersController::begin_fetch);
    let result = service.list().await;
    if let Err(error) = &result {
        tracing::warn!(%error, "failed to load users");
    }
    screen.update(|c| c.finish_fetch(result));
}

/// Saves the open form. Returns `true` on success, after the list has been
/// re-fetched.
pub async fn save(screen: &impl ScreenHandle, service: &impl UserService) -> bool {
    let Some(request) = screen.update(UsersController::begin_save) else {
        return false;
    };

    let result = match request {
        SaveRequest::Create(draft) => service.create(draft).await.map(|_| ()),
        SaveRequest::Update { user_id, draft } => service.update(&user_id, draft).await,
    };
    if let Err(error) = &result {
        tracing::warn!(%error, "failed to save user");
    }

    let saved = screen.update(|c| c.finish_save(result));
    if saved {
        refresh(screen, service).await;
    }
    saved
}

/// Deletes the selected users one at a time. A failure does not stop the
/// remaining deletes; the selection is cleared and the list re-fetched
/// either way.
pub async fn delete_selected(screen: &impl ScreenHandle, service: &impl UserService) {
    let ids = screen.update(UsersController::begin_delete);
    if ids.is_empty() {
        return;
    }

    let mut failures = Vec::new();
    for id in ids {
        if let Err(error) = service.delete(&id).await {
            tracing::warn!(user_id = id.as_str(), %error, "failed to delete user");
            failures.push((id, error));
        }
    }

    let failure = screen.update(|c| c.finish_delete(failures));
    refresh(screen, service).await;
    if let Some(message) = failure {
        screen.update(|c| c.restore_error(message));
    }
}

/// Opens the edit form for a routed user id, fetching the user when the
/// grid has not loaded it.
pub async fn load_edit(screen: &impl ScreenHandle, service: &impl UserService, user_id: &str) {
    if !screen.update(|c| c.open_edit_by_id(user_id)) {
        return;
    }
    let result = service.get(user_id).await;
    screen.update(|c| c.finish_edit_lookup(user_id, result));
}
