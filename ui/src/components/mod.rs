mod data_grid;
mod sidebar;

pub use data_grid::DataGrid;
pub use sidebar::Sidebar;
