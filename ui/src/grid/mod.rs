//! Client-side filtering, pagination and row selection over a loaded set
//! of rows.

mod cell;
mod column;
mod page;
mod selection;
mod state;

pub use cell::{EMPTY_CELL, GridRow, cell_text};
pub use column::{ColumnDef, filter_fields, visible_columns};
pub use page::{PAGE_SIZES, PageView, matches_filter, total_pages, visible_page};
pub use selection::Selection;
pub use state::{EmptyState, GridState};
