use super::{ColumnDef, GridRow, PAGE_SIZES, PageView, Selection, filter_fields, visible_columns};
use super::page::{total_pages, visible_page};

/// Why the grid has nothing to show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyState {
    NoRows,
    NoMatches,
}

/// Everything the grid displays, owned by the hosting screen.
///
/// The screen loads rows with [`GridState::set_datasource`] and reads the
/// selection back for bulk actions; the [`DataGrid`](crate::DataGrid)
/// component drives filter, paging and selection from user input.
#[derive(Clone, Debug, PartialEq)]
pub struct GridState<R> {
    columns: Vec<ColumnDef>,
    rows: Vec<R>,
    loading: bool,
    filter: String,
    page_index: usize,
    page_size: usize,
    page_sizes: Vec<usize>,
    selection: Selection,
}

impl<R: GridRow> GridState<R> {
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            loading: false,
            filter: String::new(),
            page_index: 0,
            page_size: PAGE_SIZES[0],
            page_sizes: PAGE_SIZES.to_vec(),
            selection: Selection::default(),
        }
    }

    /// Replaces the offered page sizes. The first becomes the current size.
    pub fn with_page_sizes(mut self, sizes: &[usize]) -> Self {
        let sizes: Vec<usize> = sizes.iter().copied().filter(|s| *s > 0).collect();
        if let Some(first) = sizes.first() {
            self.page_size = *first;
            self.page_sizes = sizes;
            self.page_index = 0;
        }
        self
    }

    /// Replaces all rows. The selection is cleared; the filter is kept and
    /// the page index is clamped into the new range.
    pub fn set_datasource(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.selection.clear();
        self.clamp_page();
    }

    pub fn clear_datasource(&mut self) {
        self.rows.clear();
        self.selection.clear();
        self.page_index = 0;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
        self.page_index = 0;
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_sizes(&self) -> &[usize] {
        &self.page_sizes
    }

    pub fn set_page_size(&mut self, size: usize) {
        if size > 0 {
            self.page_size = size;
            self.page_index = 0;
        }
    }

    pub fn set_page(&mut self, index: usize) {
        self.page_index = index.min(self.total_pages() - 1);
    }

    pub fn total_pages(&self) -> usize {
        let fields = self.filter_fields();
        let needle = self.filter.trim().to_lowercase();
        let count = self
            .rows
            .iter()
            .filter(|row| super::matches_filter(*row, &needle, &fields))
            .count();
        total_pages(count, self.page_size)
    }

    fn clamp_page(&mut self) {
        self.set_page(self.page_index);
    }

    pub fn columns(&self) -> Vec<ColumnDef> {
        visible_columns(&self.columns)
    }

    pub fn filter_fields(&self) -> Vec<String> {
        filter_fields(&self.columns)
    }

    /// Whether a filter input should be offered at all.
    pub fn is_filterable(&self) -> bool {
        !self.filter_fields().is_empty()
    }

    pub fn view(&self) -> PageView<R> {
        visible_page(
            &self.rows,
            &self.filter,
            self.page_index,
            self.page_size,
            &self.filter_fields(),
        )
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.loading || self.view().total_filtered > 0 {
            None
        } else if self.filter.trim().is_empty() {
            Some(EmptyState::NoRows)
        } else {
            Some(EmptyState::NoMatches)
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn toggle_row(&mut self, id: &str) {
        self.selection.toggle(id);
    }

    /// Select-all control: acts on the rows of the current page only.
    pub fn toggle_page(&mut self) {
        let view = self.view();
        self.selection
            .toggle_all(view.rows.iter().map(GridRow::row_id));
    }

    pub fn page_fully_selected(&self) -> bool {
        let view = self.view();
        !view.rows.is_empty() && self.selection.all_selected(view.rows.iter().map(GridRow::row_id))
    }

    /// Selected rows in datasource order.
    pub fn selected_rows(&self) -> Vec<R> {
        self.rows
            .iter()
            .filter(|row| self.selection.contains(row.row_id()))
            .cloned()
            .collect()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::UserRecord;

    fn user(id: &str, name: &str, role: &str) -> UserRecord {
        UserRecord {
            id: id.into(),
            display_name: Some(name.into()),
            email: format!("{id}@example.com"),
            role: vec![role.into()],
        }
    }

    fn grid() -> GridState<UserRecord> {
        GridState::new(vec![
            ColumnDef::new("Name", "displayName", 1),
            ColumnDef::new("Email", "email", 2),
            ColumnDef::new("Roles", "role", 3),
        ])
    }

    fn users(n: usize) -> Vec<UserRecord> {
        (0..n)
            .map(|i| user(&format!("u{i}"), &format!("User {i}"), if i % 2 == 0 { "admin" } else { "editor" }))
            .collect()
    }

    #[test]
    fn test_replacing_datasource_clears_selection() {
        let mut grid = grid();
        grid.set_datasource(users(3));
        grid.toggle_row("u1");
        grid.toggle_page();
        assert_eq!(grid.selection().len(), 3);

        grid.set_datasource(users(3));
        assert!(grid.selection().is_empty());
    }

    #[test]
    fn test_datasource_keeps_filter_and_clamps_page() {
        let mut grid = grid();
        grid.set_datasource(users(12));
        grid.set_filter("user");
        grid.set_page(2);
        assert_eq!(grid.page_index(), 2);

        grid.set_datasource(users(6));
        assert_eq!(grid.filter(), "user");
        assert_eq!(grid.page_index(), 1);
    }

    #[test]
    fn test_filter_and_page_size_reset_page() {
        let mut grid = grid();
        grid.set_datasource(users(12));
        grid.set_page(1);
        grid.set_filter("admin");
        assert_eq!(grid.page_index(), 0);
        assert_eq!(grid.view().total_filtered, 6);

        grid.set_page(1);
        grid.set_page_size(10);
        assert_eq!(grid.page_index(), 0);
        assert_eq!(grid.view().rows.len(), 6);
    }

    #[test]
    fn test_set_page_clamps() {
        let mut grid = grid();
        grid.set_datasource(users(7));
        grid.set_page(9);
        assert_eq!(grid.page_index(), 1);
    }

    #[test]
    fn test_selection_survives_filter_and_paging() {
        let mut grid = grid();
        grid.set_datasource(users(7));
        grid.toggle_row("u6");
        grid.set_filter("editor");
        grid.set_page(1);
        assert!(grid.selection().contains("u6"));

        let selected: Vec<_> = grid.selected_rows().into_iter().map(|u| u.id).collect();
        assert_eq!(selected, vec!["u6"]);
    }

    #[test]
    fn test_select_all_is_page_scoped() {
        let mut grid = grid();
        grid.set_datasource(users(7));
        grid.toggle_page();
        assert_eq!(grid.selection().len(), 5);
        assert!(grid.page_fully_selected());

        grid.set_page(1);
        assert!(!grid.page_fully_selected());
        grid.toggle_page();
        assert_eq!(grid.selection().len(), 7);
    }

    #[test]
    fn test_empty_states() {
        let mut grid = grid();
        assert_eq!(grid.empty_state(), Some(EmptyState::NoRows));

        grid.set_loading(true);
        assert_eq!(grid.empty_state(), None);
        grid.set_loading(false);

        grid.set_datasource(users(2));
        assert_eq!(grid.empty_state(), None);

        grid.set_filter("nobody");
        assert_eq!(grid.empty_state(), Some(EmptyState::NoMatches));
    }

    #[test]
    fn test_clear_datasource() {
        let mut grid = grid();
        grid.set_datasource(users(2));
        grid.toggle_row("u0");
        grid.clear_datasource();
        assert!(grid.rows().is_empty());
        assert!(grid.selected_rows().is_empty());
    }

    #[test]
    fn test_custom_page_sizes() {
        let grid: GridState<UserRecord> = grid().with_page_sizes(&[5]);
        assert_eq!(grid.page_sizes(), &[5]);

        let grid: GridState<UserRecord> = GridState::new(vec![]).with_page_sizes(&[]);
        assert_eq!(grid.page_size(), 5);
        assert!(!grid.is_filterable());
    }
}
