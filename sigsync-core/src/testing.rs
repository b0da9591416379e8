//! Test fixtures: a local HTTP server and in-memory fakes for the import seams.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::api::ApiError;
use crate::auth::BearerToken;
use crate::firestore::{DocumentSource, FirestoreError, SourceDocument};
use crate::models::SignalementRequest;
use crate::sync::SignalementSink;

/// Serves `app` on an ephemeral localhost port and returns its base URL.
pub async fn serve(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A localhost URL nothing is listening on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// In-memory document store with per-collection canned results.
#[derive(Default)]
pub struct FakeSource {
    collections: HashMap<String, Result<Vec<SourceDocument>, FirestoreError>>,
    counts: HashMap<String, Result<u64, FirestoreError>>,
    gate: Option<Arc<Notify>>,
    pub list_calls: AtomicUsize,
    pub count_calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(mut self, collection: &str, docs: Vec<SourceDocument>) -> Self {
        self.collections.insert(collection.to_string(), Ok(docs));
        self
    }

    pub fn with_list_error(mut self, collection: &str, err: FirestoreError) -> Self {
        self.collections.insert(collection.to_string(), Err(err));
        self
    }

    pub fn with_count(mut self, collection: &str, count: u64) -> Self {
        self.counts.insert(collection.to_string(), Ok(count));
        self
    }

    pub fn with_count_error(mut self, collection: &str, err: FirestoreError) -> Self {
        self.counts.insert(collection.to_string(), Err(err));
        self
    }

    /// Makes `list_documents` wait until the gate is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst) + self.count_calls.load(Ordering::SeqCst)
    }
}

impl DocumentSource for FakeSource {
    async fn list_documents(
        &self,
        collection: &str,
    ) -> Result<Vec<SourceDocument>, FirestoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.collections
            .get(collection)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn count_documents(&self, collection: &str) -> Result<u64, FirestoreError> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.counts.get(collection).cloned().unwrap_or(Ok(0))
    }
}

/// Records every creation request; fails requests whose titre is listed.
#[derive(Default)]
pub struct FakeSink {
    reject_titles: Vec<String>,
    unreachable_titles: Vec<String>,
    pub received: Mutex<Vec<SignalementRequest>>,
    pub tokens: Mutex<Vec<String>>,
}

impl FakeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(titles: &[&str]) -> Self {
        Self {
            reject_titles: titles.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Fails the listed titles as if the connection dropped.
    pub fn unreachable_for(mut self, titles: &[&str]) -> Self {
        self.unreachable_titles = titles.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn calls(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

impl SignalementSink for FakeSink {
    async fn create(
        &self,
        token: &BearerToken,
        request: &SignalementRequest,
    ) -> Result<(), ApiError> {
        self.received.lock().unwrap().push(request.clone());
        self.tokens.lock().unwrap().push(token.as_str().to_string());

        if self.unreachable_titles.contains(&request.titre) {
            return Err(ApiError::Http("connection reset by peer".to_string()));
        }
        if self.reject_titles.contains(&request.titre) {
            return Err(ApiError::Server {
                status: 400,
                message: "Validation failed".to_string(),
                body: r#"{"message":"Validation failed"}"#.to_string(),
            });
        }
        Ok(())
    }
}
