//! Read access to the mobile-facing Firestore document store.
//!
//! Documents have no fixed schema: every field may be missing or carry an
//! unexpected type. [`SourceDocument`] keeps them as loosely-typed
//! [`FieldValue`]s and leaves interpretation to [`crate::normalize`].

mod client;
mod error;
mod value;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use client::FirestoreClient;
pub use error::FirestoreError;
pub use value::FieldValue;

pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";
pub const DEFAULT_DATABASE: &str = "(default)";

/// A document read from a collection, tagged with its store-assigned id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceDocument {
    pub id: String,
    pub fields: BTreeMap<String, FieldValue>,
}

impl SourceDocument {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }
}

/// A collection-based document store that can be scanned and counted.
#[allow(async_fn_in_trait)]
pub trait DocumentSource {
    /// Returns every document of `collection`, in the order the store sends them.
    async fn list_documents(&self, collection: &str)
        -> Result<Vec<SourceDocument>, FirestoreError>;

    /// Returns the number of documents in `collection`.
    async fn count_documents(&self, collection: &str) -> Result<u64, FirestoreError>;
}

/// Firestore connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirestoreSettings {
    /// Firebase project id (e.g. "auth-notif-ef20f")
    pub project_id: Option<String>,
    /// Web API key, sent as the `key` query parameter
    pub api_key: Option<String>,
    /// Firebase Auth ID token, sent as a bearer token when rules require auth
    pub id_token: Option<String>,
    /// Database id
    #[serde(default = "default_database")]
    pub database: String,
    /// REST endpoint root
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for FirestoreSettings {
    fn default() -> Self {
        Self {
            project_id: None,
            api_key: None,
            id_token: None,
            database: default_database(),
            base_url: default_base_url(),
        }
    }
}

impl FirestoreSettings {
    /// Returns true if a project id is set
    pub fn is_configured(&self) -> bool {
        self.project_id.is_some()
    }
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_builder() {
        let doc = SourceDocument::new("abc")
            .with_field("titre", "Trou")
            .with_field("latitude", -18.9);

        assert_eq!(doc.id, "abc");
        assert_eq!(doc.get("titre").and_then(FieldValue::as_str), Some("Trou"));
        assert_eq!(doc.get("latitude").and_then(FieldValue::as_f64), Some(-18.9));
        assert!(doc.get("budget").is_none());
    }

    #[test]
    fn test_settings_defaults_from_partial_config() {
        let settings: FirestoreSettings =
            serde_json::from_str(r#"{"project_id": "demo"}"#).unwrap();
        assert!(settings.is_configured());
        assert_eq!(settings.database, "(default)");
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert!(!FirestoreSettings::default().is_configured());
    }
}
