use types::UserRecord;
use types::document::{Document, FieldValue};
use types::user::{DISPLAY_NAME_FIELD, EMAIL_FIELD, ROLE_FIELD};

/// Rendered for a missing or null field.
pub const EMPTY_CELL: &str = "—";

/// A row the grid can display: a stable id plus named fields.
pub trait GridRow: Clone + PartialEq + 'static {
    fn row_id(&self) -> &str;

    fn field(&self, name: &str) -> Option<FieldValue>;

    fn cell_text(&self, name: &str) -> String {
        cell_text(self.field(name).as_ref())
    }
}

/// The string form used both for display and for filtering. Arrays are
/// joined with `", "`.
pub fn cell_text(value: Option<&FieldValue>) -> String {
    match value {
        None | Some(FieldValue::Null) => EMPTY_CELL.to_string(),
        Some(FieldValue::Array(values)) => values
            .iter()
            .map(scalar_text)
            .collect::<Vec<_>>()
            .join(", "),
        Some(value) => scalar_text(value),
    }
}

fn scalar_text(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => String::new(),
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Integer(i) => i.to_string(),
        FieldValue::Double(d) => d.to_string(),
        FieldValue::String(s) => s.clone(),
        FieldValue::Array(values) => values
            .iter()
            .map(scalar_text)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

impl GridRow for UserRecord {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::from(self.id.as_str())),
            DISPLAY_NAME_FIELD => Some(FieldValue::from(self.display_name.clone())),
            EMAIL_FIELD => Some(FieldValue::from(self.email.as_str())),
            ROLE_FIELD => Some(FieldValue::from(self.role.clone())),
            _ => None,
        }
    }
}

impl GridRow for Document {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        self.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(display_name: Option<&str>, role: &[&str]) -> UserRecord {
        UserRecord {
            id: "u1".into(),
            display_name: display_name.map(str::to_string),
            email: "ana@example.com".into(),
            role: role.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_arrays_are_comma_joined() {
        assert_eq!(user(None, &["admin", "editor"]).cell_text("role"), "admin, editor");
        assert_eq!(user(None, &[]).cell_text("role"), "");
    }

    #[test]
    fn test_null_and_missing_render_as_dash() {
        let row = user(None, &[]);
        assert_eq!(row.cell_text("displayName"), EMPTY_CELL);
        assert_eq!(row.cell_text("phone"), EMPTY_CELL);
        assert_eq!(user(Some("Ana"), &[]).cell_text("displayName"), "Ana");
    }

    #[test]
    fn test_scalars() {
        assert_eq!(cell_text(Some(&FieldValue::Integer(3))), "3");
        assert_eq!(cell_text(Some(&FieldValue::Bool(true))), "true");
    }
}
