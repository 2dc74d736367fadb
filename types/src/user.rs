use serde::{Deserialize, Serialize};

use crate::document::{Document, FieldValue, Fields};

pub const USERS_COLLECTION: &str = "users";

pub const DISPLAY_NAME_FIELD: &str = "displayName";
pub const EMAIL_FIELD: &str = "email";
pub const ROLE_FIELD: &str = "role";

/// One record of the `users` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub display_name: Option<String>,
    pub email: String,
    pub role: Vec<String>,
}

impl UserRecord {
    /// Roles as the comma-separated text shown in the edit form.
    pub fn roles_text(&self) -> String {
        self.role.join(", ")
    }
}

impl From<Document> for UserRecord {
    fn from(doc: Document) -> Self {
        Self {
            display_name: doc.get_str(DISPLAY_NAME_FIELD).map(str::to_string),
            email: doc.get_str(EMAIL_FIELD).unwrap_or_default().to_string(),
            role: doc
                .get(ROLE_FIELD)
                .and_then(FieldValue::as_string_list)
                .unwrap_or_default(),
            id: doc.id,
        }
    }
}

/// Normalized input for creating or updating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub display_name: Option<String>,
    pub email: String,
    pub role: Vec<String>,
}

impl UserDraft {
    /// Builds a draft from raw form text. A blank display name becomes
    /// `None`; roles are split on commas, trimmed, and empties dropped.
    pub fn from_input(display_name: &str, email: &str, roles: &str) -> Self {
        let display_name = display_name.trim();
        Self {
            display_name: (!display_name.is_empty()).then(|| display_name.to_string()),
            email: email.trim().to_string(),
            role: parse_roles(roles),
        }
    }

    pub fn into_fields(self) -> Fields {
        Fields::from([
            (
                DISPLAY_NAME_FIELD.to_string(),
                FieldValue::from(self.display_name),
            ),
            (EMAIL_FIELD.to_string(), FieldValue::from(self.email)),
            (ROLE_FIELD.to_string(), FieldValue::from(self.role)),
        ])
    }
}

pub fn parse_roles(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roles_drops_empty_segments() {
        assert_eq!(parse_roles("admin, editor, "), vec!["admin", "editor"]);
        assert_eq!(parse_roles(" , ,"), Vec::<String>::new());
        assert_eq!(parse_roles(""), Vec::<String>::new());
    }

    #[test]
    fn test_draft_normalizes_input() {
        let draft = UserDraft::from_input("   ", "  ana@example.com ", "admin,,viewer");
        assert_eq!(draft.display_name, None);
        assert_eq!(draft.email, "ana@example.com");
        assert_eq!(draft.role, vec!["admin", "viewer"]);

        let fields = draft.into_fields();
        assert_eq!(fields[DISPLAY_NAME_FIELD], FieldValue::Null);
        assert_eq!(
            fields[ROLE_FIELD],
            FieldValue::from(vec!["admin".to_string(), "viewer".to_string()])
        );
    }

    #[test]
    fn test_record_from_sparse_document() {
        let doc = Document::new(
            "u1",
            Fields::from([(ROLE_FIELD.to_string(), FieldValue::from("admin"))]),
        );
        let user = UserRecord::from(doc);
        assert_eq!(user.id, "u1");
        assert_eq!(user.display_name, None);
        assert_eq!(user.email, "");
        // a non-array role is ignored rather than coerced
        assert!(user.role.is_empty());
    }
}
