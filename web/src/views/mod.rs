mod login;
pub use login::{Login, Register};

mod home;
pub use home::Home;

mod users;
pub use users::{AddUser, EditUser, SystemUsers, UsersScreen};

mod account;
pub use account::Account;

mod roles;
pub use roles::Roles;
