/// How one field of a row is presented.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnDef {
    pub header: String,
    pub field: String,
    /// Lower weights render further left.
    pub order: i32,
    pub display: bool,
    /// Whether the column takes part in the free-text filter.
    pub filter: bool,
}

impl ColumnDef {
    pub fn new(header: impl Into<String>, field: impl Into<String>, order: i32) -> Self {
        Self {
            header: header.into(),
            field: field.into(),
            order,
            display: true,
            filter: true,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.display = false;
        self
    }

    pub fn without_filter(mut self) -> Self {
        self.filter = false;
        self
    }
}

/// Displayed columns in weight order. Equal weights keep definition order.
pub fn visible_columns(columns: &[ColumnDef]) -> Vec<ColumnDef> {
    let mut visible: Vec<_> = columns.iter().filter(|c| c.display).cloned().collect();
    visible.sort_by_key(|c| c.order);
    visible
}

/// Fields searched by the filter: displayed columns that opt in.
pub fn filter_fields(columns: &[ColumnDef]) -> Vec<String> {
    visible_columns(columns)
        .into_iter()
        .filter(|c| c.filter)
        .map(|c| c.field)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_columns_sorted_by_order() {
        let columns = vec![
            ColumnDef::new("Roles", "role", 3),
            ColumnDef::new("Id", "id", 0).hidden(),
            ColumnDef::new("Name", "displayName", 1),
            ColumnDef::new("Email", "email", 2).without_filter(),
        ];

        let headers: Vec<_> = visible_columns(&columns)
            .into_iter()
            .map(|c| c.header)
            .collect();
        assert_eq!(headers, vec!["Name", "Email", "Roles"]);

        assert_eq!(filter_fields(&columns), vec!["displayName", "role"]);
    }
}
