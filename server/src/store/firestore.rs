//! Cloud Firestore over its REST API.
//!
//! Values travel in Firestore's typed JSON form (`{"stringValue": "..."}`)
//! and are converted to [`FieldValue`] at this boundary.

use anyhow::{Context, Result, anyhow, ensure};
use reqwest::{Client, Method, RequestBuilder, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use types::document::{Document, FieldValue, Fields};

use super::DocumentStore;
use crate::rest::ReqwestExt;

const FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";
const PAGE_SIZE: &str = "300";

#[derive(Clone)]
pub struct FirestoreStore {
    client: Client,
    documents_url: Url,
    query_url: Url,
    api_key: SecretString,
    token: Option<SecretString>,
}

#[derive(Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: BTreeMap<String, Value>,
}

impl RawDocument {
    fn into_document(self) -> Document {
        let id = self.name.rsplit('/').next().unwrap_or_default().to_string();
        let fields = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), decode_value(value)))
            .collect();

        Document::new(id, fields)
    }
}

impl FirestoreStore {
    pub fn new(project_id: &str, database: &str, api_key: SecretString) -> Result<Self> {
        let root = format!("{FIRESTORE_URL}/projects/{project_id}/databases/{database}/documents");

        Ok(Self {
            client: Client::new(),
            documents_url: Url::parse(&format!("{root}/"))
                .context("invalid firestore project or database")?,
            query_url: Url::parse(&format!("{root}:runQuery"))?,
            api_key,
            token: None,
        })
    }

    /// Requests made through the returned handle carry the user's ID token,
    /// so security rules see the signed-in user.
    pub fn with_token(&self, token: SecretString) -> Self {
        Self {
            token: Some(token),
            ..self.clone()
        }
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .query(&[("key", self.api_key.expose_secret())]);

        match &self.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Each segment is percent-encoded, so an id can never leave its
    /// collection.
    fn document_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.documents_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("firestore url cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn document_request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.document_url(segments)?;
        Ok(self.request(method, url))
    }
}

fn check_document_id(id: &str) -> Result<&str> {
    ensure!(
        !id.is_empty() && id != "." && id != ".." && !id.contains('/'),
        "invalid document id: {id:?}"
    );
    Ok(id)
}

impl DocumentStore for FirestoreStore {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct ListResponse {
            #[serde(default)]
            documents: Vec<RawDocument>,
            next_page_token: Option<String>,
        }

        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .document_request(Method::GET, &[collection])?
                .query(&[("pageSize", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let page: ListResponse = request.try_send().await?;
            documents.extend(page.documents.into_iter().map(RawDocument::into_document));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(collection, count = documents.len(), "listed documents");
        Ok(documents)
    }

    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &FieldValue,
    ) -> Result<Vec<Document>> {
        #[derive(Deserialize)]
        struct QueryRow {
            document: Option<RawDocument>,
        }

        let rows: Vec<QueryRow> = self
            .request(Method::POST, self.query_url.clone())
            .json(&json!({
                "structuredQuery": {
                    "from": [{ "collectionId": collection }],
                    "where": {
                        "fieldFilter": {
                            "field": { "fieldPath": field },
                            "op": "EQUAL",
                            "value": encode_value(value),
                        }
                    }
                }
            }))
            .try_send()
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.document)
            .map(RawDocument::into_document)
            .collect())
    }

    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let raw: Option<RawDocument> = self
            .document_request(Method::GET, &[collection, check_document_id(id)?])?
            .try_send_optional()
            .await?;

        Ok(raw.map(RawDocument::into_document))
    }

    async fn create(&self, collection: &str, fields: Fields) -> Result<String> {
        let raw: RawDocument = self
            .document_request(Method::POST, &[collection])?
            .json(&json!({ "fields": encode_fields(&fields) }))
            .try_send()
            .await?;

        Ok(raw.into_document().id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        let mut request = self
            .document_request(Method::PATCH, &[collection, check_document_id(id)?])?
            .query(&[("currentDocument.exists", "true")]);
        for name in fields.keys() {
            request = request.query(&[("updateMask.fieldPaths", name)]);
        }

        request
            .json(&json!({ "fields": encode_fields(&fields) }))
            .try_send_empty()
            .await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        self.document_request(Method::DELETE, &[collection, check_document_id(id)?])?
            .try_send_empty()
            .await
    }
}

fn encode_fields(fields: &Fields) -> Map<String, Value> {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), encode_value(value)))
        .collect()
}

fn encode_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => json!({ "nullValue": null }),
        FieldValue::Bool(b) => json!({ "booleanValue": b }),
        // int64 is carried as a string in the JSON mapping
        FieldValue::Integer(i) => json!({ "integerValue": i.to_string() }),
        FieldValue::Double(d) => json!({ "doubleValue": d }),
        FieldValue::String(s) => json!({ "stringValue": s }),
        FieldValue::Array(values) => json!({
            "arrayValue": { "values": values.iter().map(encode_value).collect::<Vec<_>>() }
        }),
    }
}

/// Types without a [`FieldValue`] counterpart (maps, bytes, geo points)
/// decode as null.
fn decode_value(value: &Value) -> FieldValue {
    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return FieldValue::Null;
    };

    match kind.as_str() {
        "booleanValue" => inner.as_bool().map_or(FieldValue::Null, FieldValue::Bool),
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse().ok())
            .or_else(|| inner.as_i64())
            .map_or(FieldValue::Null, FieldValue::Integer),
        "doubleValue" => inner.as_f64().map_or(FieldValue::Null, FieldValue::Double),
        "stringValue" | "timestampValue" | "referenceValue" => inner
            .as_str()
            .map_or(FieldValue::Null, |s| FieldValue::String(s.to_string())),
        "arrayValue" => FieldValue::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        _ => FieldValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_firestore_document() {
        let raw: RawDocument = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/users/abc123",
            "fields": {
                "email": { "stringValue": "ana@example.com" },
                "displayName": { "nullValue": null },
                "role": { "arrayValue": { "values": [{ "stringValue": "admin" }] } },
                "logins": { "integerValue": "42" },
                "emptyList": { "arrayValue": {} },
                "address": { "mapValue": { "fields": {} } }
            },
            "createTime": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        let doc = raw.into_document();
        assert_eq!(doc.id, "abc123");
        assert_eq!(doc.get_str("email"), Some("ana@example.com"));
        assert_eq!(doc.get("displayName"), Some(&FieldValue::Null));
        assert_eq!(
            doc.get("role").and_then(FieldValue::as_string_list),
            Some(vec!["admin".to_string()])
        );
        assert_eq!(doc.get("logins"), Some(&FieldValue::Integer(42)));
        assert_eq!(doc.get("emptyList"), Some(&FieldValue::Array(vec![])));
        assert_eq!(doc.get("address"), Some(&FieldValue::Null));
    }

    #[test]
    fn test_document_without_fields() {
        let raw: RawDocument =
            serde_json::from_value(json!({ "name": "projects/p/databases/d/documents/users/x" }))
                .unwrap();
        let doc = raw.into_document();
        assert_eq!(doc.id, "x");
        assert!(doc.fields.is_empty());
    }

    #[test]
    fn test_encode_values() {
        assert_eq!(
            encode_value(&FieldValue::Integer(7)),
            json!({ "integerValue": "7" })
        );
        assert_eq!(
            encode_value(&FieldValue::from(vec!["a".to_string()])),
            json!({ "arrayValue": { "values": [{ "stringValue": "a" }] } })
        );
        assert_eq!(
            encode_value(&FieldValue::Null),
            json!({ "nullValue": null })
        );
    }

    #[test]
    fn test_urls() {
        let store = FirestoreStore::new("demo", "(default)", "key".to_string().into()).unwrap();
        assert_eq!(
            store.document_url(&["users", "abc"]).unwrap().as_str(),
            "https://firestore.googleapis.com/v1/projects/demo/databases/(default)/documents/users/abc"
        );
        assert_eq!(
            store.query_url.as_str(),
            "https://firestore.googleapis.com/v1/projects/demo/databases/(default)/documents:runQuery"
        );
    }

    #[test]
    fn test_ids_stay_inside_collection() {
        let store = FirestoreStore::new("demo", "(default)", "key".to_string().into()).unwrap();
        let url = store.document_url(&["users", "a?b#c"]).unwrap();
        assert_eq!(
            url.path(),
            "/v1/projects/demo/databases/(default)/documents/users/a%3Fb%23c"
        );
        assert_eq!(url.query(), None);

        for id in ["../admins/root", "admins/root", "..", ".", ""] {
            assert!(check_document_id(id).is_err(), "{id:?} accepted");
        }
        assert_eq!(check_document_id("abc123").unwrap(), "abc123");
    }
}
