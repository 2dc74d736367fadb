use std::collections::BTreeSet;

/// Selected row ids. Survives filtering and paging; only an explicit
/// `clear` or a datasource replacement empties it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    /// Deselects `page_ids` if all of them are selected, otherwise selects
    /// all of them. Ids outside the page are untouched.
    pub fn toggle_all<'a>(&mut self, page_ids: impl IntoIterator<Item = &'a str> + Clone) {
        if self.all_selected(page_ids.clone()) {
            for id in page_ids {
                self.ids.remove(id);
            }
        } else {
            self.ids.extend(page_ids.into_iter().map(str::to_string));
        }
    }

    pub fn all_selected<'a>(&self, page_ids: impl IntoIterator<Item = &'a str>) -> bool {
        page_ids.into_iter().all(|id| self.ids.contains(id))
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn get(&self) -> &BTreeSet<String> {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_one_id() {
        let mut selection = Selection::default();
        selection.toggle("a");
        assert!(selection.contains("a"));
        selection.toggle("a");
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_all_twice_restores_selection() {
        let mut selection = Selection::default();
        selection.toggle("z");
        let before = selection.clone();

        let page = ["a", "b", "c"];
        selection.toggle_all(page);
        assert!(selection.all_selected(page));
        assert!(selection.contains("z"));

        selection.toggle_all(page);
        assert_eq!(selection, before);
    }

    #[test]
    fn test_toggle_all_with_partial_page_selects_rest() {
        let mut selection = Selection::default();
        selection.toggle("b");

        selection.toggle_all(["a", "b", "c"]);
        assert_eq!(selection.len(), 3);
    }

    #[test]
    fn test_toggle_all_from_fully_selected_page() {
        let mut selection = Selection::default();
        selection.toggle_all(["a", "b"]);
        let before = selection.clone();

        selection.toggle_all(["a", "b"]);
        selection.toggle_all(["a", "b"]);
        assert_eq!(selection, before);
    }
}
