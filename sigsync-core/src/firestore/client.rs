//! Firestore REST client.
//!
//! Only the two read operations the importer needs are implemented: a paged
//! collection scan and a `COUNT` aggregation query.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::json;

use super::{DocumentSource, FieldValue, FirestoreError, FirestoreSettings, SourceDocument};

/// Documents requested per page when scanning a collection.
const PAGE_SIZE: u32 = 300;

/// Client for the Firestore REST v1 API.
#[derive(Debug, Clone)]
pub struct FirestoreClient {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    database: String,
    api_key: Option<String>,
    id_token: Option<String>,
}

impl FirestoreClient {
    /// Creates a client for `project_id` on the default database.
    pub fn new(base_url: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            project_id: project_id.into(),
            database: super::DEFAULT_DATABASE.to_string(),
            api_key: None,
            id_token: None,
        }
    }

    /// Creates a client from settings.
    ///
    /// Returns an error if no project id is configured.
    pub fn from_settings(settings: &FirestoreSettings) -> Result<Self, FirestoreError> {
        let project_id = settings
            .project_id
            .clone()
            .ok_or(FirestoreError::NotConfigured)?;

        Ok(Self::new(settings.base_url.clone(), project_id)
            .with_database(settings.database.clone())
            .with_api_key(settings.api_key.clone())
            .with_id_token(settings.id_token.clone()))
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_id_token(mut self, id_token: Option<String>) -> Self {
        self.id_token = id_token;
        self
    }

    /// Root of the document tree: `.../projects/{p}/databases/{db}/documents`.
    fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.project_id,
            self.database
        )
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/{}",
            self.documents_url(),
            urlencoding::encode(collection)
        )
    }

    fn authorize(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }
        if let Some(token) = &self.id_token {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn fetch_page(
        &self,
        collection: &str,
        page_token: Option<&str>,
    ) -> Result<ListDocumentsResponse, FirestoreError> {
        let mut request = self
            .http
            .get(self.collection_url(collection))
            .query(&[("pageSize", PAGE_SIZE.to_string())]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| FirestoreError::Http(e.to_string()))?;
        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| FirestoreError::Decode(e.to_string()))
    }
}

impl DocumentSource for FirestoreClient {
    async fn list_documents(
        &self,
        collection: &str,
    ) -> Result<Vec<SourceDocument>, FirestoreError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.fetch_page(collection, page_token.as_deref()).await?;
            documents.extend(page.documents.into_iter().map(WireDocument::into_source));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(collection, count = documents.len(), "Scanned collection");
        Ok(documents)
    }

    async fn count_documents(&self, collection: &str) -> Result<u64, FirestoreError> {
        let url = format!("{}:runAggregationQuery", self.documents_url());
        let body = json!({
            "structuredAggregationQuery": {
                "structuredQuery": { "from": [{ "collectionId": collection }] },
                "aggregations": [{ "alias": "count", "count": {} }]
            }
        });

        let response = self
            .authorize(self.http.post(&url).json(&body))
            .send()
            .await
            .map_err(|e| FirestoreError::Http(e.to_string()))?;
        let response = check_status(response).await?;

        let results: Vec<AggregationResponse> = response
            .json()
            .await
            .map_err(|e| FirestoreError::Decode(e.to_string()))?;

        let count = results
            .into_iter()
            .find_map(|r| r.result)
            .and_then(|r| r.aggregate_fields.get("count").and_then(FieldValue::as_i64))
            .unwrap_or(0);

        Ok(count.max(0) as u64)
    }
}

/// Maps a non-success response to an error, keeping permission denials distinct.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, FirestoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error)
        .unwrap_or_default();
    let message = if detail.message.is_empty() {
        status.to_string()
    } else {
        detail.message
    };

    if status == reqwest::StatusCode::FORBIDDEN || detail.status == "PERMISSION_DENIED" {
        Err(FirestoreError::PermissionDenied(message))
    } else {
        Err(FirestoreError::Status {
            code: status.as_u16(),
            message,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<WireDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireDocument {
    name: String,
    #[serde(default)]
    fields: BTreeMap<String, FieldValue>,
}

impl WireDocument {
    /// The document id is the last segment of its resource name.
    fn into_source(self) -> SourceDocument {
        let id = self.name.rsplit('/').next().unwrap_or_default().to_string();
        SourceDocument {
            id,
            fields: self.fields,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AggregationResponse {
    result: Option<AggregationResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregationResult {
    #[serde(default)]
    aggregate_fields: BTreeMap<String, FieldValue>,
}

#[derive(Debug, Deserialize, Default)]
struct ErrorEnvelope {
    #[serde(default)]
    error: ErrorDetail,
}

#[derive(Debug, Deserialize, Default)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::serve;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use std::collections::HashMap;

    #[test]
    fn test_collection_url() {
        let client = FirestoreClient::new("https://firestore.googleapis.com/v1/", "demo");
        assert_eq!(
            client.collection_url("signalements"),
            "https://firestore.googleapis.com/v1/projects/demo/databases/(default)/documents/signalements"
        );
    }

    #[test]
    fn test_from_settings_requires_project() {
        let settings = FirestoreSettings::default();
        assert!(matches!(
            FirestoreClient::from_settings(&settings),
            Err(FirestoreError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_list_documents_follows_pages() {
        let app = Router::new().route(
            "/projects/demo/databases/{db}/documents/signalements",
            get(
                |Path(_db): Path<String>, Query(params): Query<HashMap<String, String>>| async move {
                    let body = match params.get("pageToken").map(String::as_str) {
                        None => json!({
                            "documents": [{
                                "name": "projects/demo/databases/(default)/documents/signalements/a1",
                                "fields": {
                                    "titre": {"stringValue": "Nid de poule"},
                                    "latitude": {"doubleValue": -18.8792},
                                    "userId": {"stringValue": "4"}
                                }
                            }],
                            "nextPageToken": "p2"
                        }),
                        Some("p2") => json!({
                            "documents": [{
                                "name": "projects/demo/databases/(default)/documents/signalements/b2",
                                "fields": {"titre": {"stringValue": "Fissure"}}
                            }]
                        }),
                        Some(_) => json!({}),
                    };
                    Json(body)
                },
            ),
        );
        let base = serve(app).await;

        let client = FirestoreClient::new(base, "demo");
        let docs = client.list_documents("signalements").await.unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "a1");
        assert_eq!(docs[0].get("latitude"), Some(&FieldValue::Double(-18.8792)));
        assert_eq!(docs[1].id, "b2");
    }

    #[tokio::test]
    async fn test_odd_field_values_keep_the_page() {
        let app = Router::new().route(
            "/projects/demo/databases/{db}/documents/signalements",
            get(|| async {
                Json(json!({
                    "documents": [
                        {
                            "name": "projects/demo/databases/(default)/documents/signalements/a1",
                            "fields": {"titre": {"stringValue": "Nid de poule"}}
                        },
                        {
                            "name": "projects/demo/databases/(default)/documents/signalements/b2",
                            "fields": {
                                "titre": {"stringValue": "Affaissement"},
                                "budget": {"doubleValue": "NaN"},
                                "surfaceM2": {"doubleValue": "Infinity"},
                                "photo": {"unknownValue": {"x": 1}}
                            }
                        },
                        {
                            "name": "projects/demo/databases/(default)/documents/signalements/c3",
                            "fields": {"titre": {"stringValue": "Fissure"}}
                        }
                    ]
                }))
            }),
        );
        let base = serve(app).await;

        let docs = FirestoreClient::new(base, "demo")
            .list_documents("signalements")
            .await
            .unwrap();

        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["a1", "b2", "c3"]);
        assert!(matches!(docs[1].get("budget"), Some(FieldValue::Double(d)) if d.is_nan()));
        assert_eq!(docs[1].get("photo"), Some(&FieldValue::Null));

        let record = crate::normalize::normalize_for_import(&docs[1], chrono::Utc::now());
        assert_eq!(record.request.titre, "Affaissement");
        assert_eq!(record.request.budget, 0.0);
        assert_eq!(record.request.surface_m2, 0.0);
    }

    #[tokio::test]
    async fn test_empty_collection() {
        let app = Router::new().route(
            "/projects/demo/databases/{db}/documents/users",
            get(|| async { Json(json!({})) }),
        );
        let base = serve(app).await;

        let docs = FirestoreClient::new(base, "demo")
            .list_documents("users")
            .await
            .unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_permission_denied_is_distinct() {
        let app = Router::new().route(
            "/projects/demo/databases/{db}/documents/signalements",
            get(|| async {
                (
                    StatusCode::FORBIDDEN,
                    Json(json!({"error": {
                        "code": 403,
                        "message": "Missing or insufficient permissions.",
                        "status": "PERMISSION_DENIED"
                    }})),
                )
            }),
        );
        let base = serve(app).await;

        let err = FirestoreClient::new(base, "demo")
            .list_documents("signalements")
            .await
            .unwrap_err();
        assert!(err.is_permission_denied());
        assert!(err.to_string().contains("insufficient permissions"));
    }

    #[tokio::test]
    async fn test_other_status_is_not_permission_denied() {
        let app = Router::new().route(
            "/projects/demo/databases/{db}/documents/signalements",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let base = serve(app).await;

        let err = FirestoreClient::new(base, "demo")
            .list_documents("signalements")
            .await
            .unwrap_err();
        assert!(matches!(err, FirestoreError::Status { code: 503, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let base = crate::testing::closed_port_url();
        let err = FirestoreClient::new(base, "demo")
            .list_documents("signalements")
            .await
            .unwrap_err();
        assert!(matches!(err, FirestoreError::Http(_)));
    }

    #[tokio::test]
    async fn test_count_documents() {
        let app = Router::new().route(
            "/projects/demo/databases/{db}/documents:runAggregationQuery",
            post(|Json(body): Json<serde_json::Value>| async move {
                let collection = body["structuredAggregationQuery"]["structuredQuery"]["from"][0]
                    ["collectionId"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string();
                let count = if collection == "users" { "3" } else { "12" };
                Json(json!([{
                    "result": {"aggregateFields": {"count": {"integerValue": count}}},
                    "readTime": "2024-01-01T00:00:00Z"
                }]))
            }),
        );
        let base = serve(app).await;

        let client = FirestoreClient::new(base, "demo");
        assert_eq!(client.count_documents("users").await.unwrap(), 3);
        assert_eq!(client.count_documents("signalements").await.unwrap(), 12);
    }

    #[tokio::test]
    async fn test_api_key_and_id_token_are_sent() {
        let app = Router::new().route(
            "/projects/demo/databases/{db}/documents/users",
            get(
                |Query(params): Query<HashMap<String, String>>,
                 headers: axum::http::HeaderMap| async move {
                    let key_ok = params.get("key").map(String::as_str) == Some("web-key");
                    let auth_ok = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        == Some("Bearer id-token");
                    if key_ok && auth_ok {
                        (StatusCode::OK, Json(json!({})))
                    } else {
                        (StatusCode::UNAUTHORIZED, Json(json!({})))
                    }
                },
            ),
        );
        let base = serve(app).await;

        let client = FirestoreClient::new(base, "demo")
            .with_api_key(Some("web-key".to_string()))
            .with_id_token(Some("id-token".to_string()));
        assert!(client.list_documents("users").await.is_ok());
    }
}
