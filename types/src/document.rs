use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field map of a schemaless document.
pub type Fields = BTreeMap<String, FieldValue>;

/// A primitive or list value stored in a document field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Array(Vec<FieldValue>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// String members of an array value. Non-string members are skipped.
    pub fn as_string_list(&self) -> Option<Vec<String>> {
        match self {
            FieldValue::Array(values) => Some(
                values
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::String)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::Array(values.into_iter().map(FieldValue::String).collect())
    }
}

/// A document as returned by the store: its id within the collection plus
/// its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field)?.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_json_shape() {
        let fields: Fields = serde_json::from_str(
            r#"{"displayName": null, "email": "ana@example.com", "role": ["admin"], "age": 31}"#,
        )
        .unwrap();

        assert_eq!(fields["displayName"], FieldValue::Null);
        assert_eq!(fields["email"].as_str(), Some("ana@example.com"));
        assert_eq!(
            fields["role"].as_string_list(),
            Some(vec!["admin".to_string()])
        );
        assert_eq!(fields["age"], FieldValue::Integer(31));
    }

    #[test]
    fn test_string_list_skips_non_strings() {
        let value = FieldValue::Array(vec![
            FieldValue::from("a"),
            FieldValue::Integer(1),
            FieldValue::from("b"),
        ]);
        assert_eq!(
            value.as_string_list(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(FieldValue::from("a").as_string_list(), None);
    }
}
