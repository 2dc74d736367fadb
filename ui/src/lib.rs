//! Reusable dashboard building blocks: the data grid model, the users CRUD
//! controller, the sidebar menu model, and the components that render them.

mod components;
pub mod grid;
pub mod menu;
pub mod screen;

pub use components::{DataGrid, Sidebar};
