//! Sequential batch import into the relational API.

use chrono::Utc;
use futures::stream::{self, StreamExt};

use crate::api::ApiError;
use crate::auth::BearerToken;
use crate::firestore::SourceDocument;
use crate::models::{ImportOutcome, SignalementRequest};
use crate::normalize::normalize_for_import;

/// Destination of imported signalements.
#[allow(async_fn_in_trait)]
pub trait SignalementSink {
    /// Submits one creation request authenticated with `token`.
    async fn create(&self, token: &BearerToken, request: &SignalementRequest)
        -> Result<(), ApiError>;
}

/// Replays source documents as creation requests, one at a time.
pub struct BatchImporter<S> {
    sink: S,
}

impl<S: SignalementSink> BatchImporter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Imports `documents` in order and counts accepted and failed records.
    ///
    /// Each request completes before the next starts so failures can be
    /// attributed to a document. A failed record is logged and counted; it
    /// never stops the batch. An empty batch makes no request.
    pub async fn import(&self, documents: &[SourceDocument], token: &BearerToken) -> ImportOutcome {
        if documents.is_empty() {
            return ImportOutcome::default();
        }

        let now = Utc::now();
        let outcome = stream::iter(documents)
            .fold(ImportOutcome::default(), |outcome, document| async move {
                let record = normalize_for_import(document, now);
                tracing::debug!(
                    id = %record.source_id,
                    reported_at = %record.reported_at,
                    "Importing signalement"
                );

                match self.sink.create(token, &record.request).await {
                    Ok(()) => outcome.with_success(),
                    Err(ApiError::Server { status, body, .. }) => {
                        tracing::error!(
                            id = %record.source_id,
                            status,
                            body = %body,
                            "Signalement import rejected"
                        );
                        outcome.with_error()
                    }
                    Err(e) => {
                        tracing::error!(id = %record.source_id, error = %e, "Signalement import failed");
                        outcome.with_error()
                    }
                }
            })
            .await;

        tracing::info!(
            success = outcome.success,
            errors = outcome.errors,
            "Signalement import finished"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSink;

    fn titled(titles: &[&str]) -> Vec<SourceDocument> {
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| SourceDocument::new(format!("doc{}", i)).with_field("titre", *t))
            .collect()
    }

    fn token() -> BearerToken {
        BearerToken::new("jwt").unwrap()
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_request() {
        let importer = BatchImporter::new(FakeSink::new());

        let outcome = importer.import(&[], &token()).await;

        assert_eq!(outcome, ImportOutcome::default());
        assert_eq!(importer.sink().calls(), 0);
    }

    #[tokio::test]
    async fn test_partial_failure_attempts_every_record() {
        let sink = FakeSink::rejecting(&["b"]).unreachable_for(&["d"]);
        let importer = BatchImporter::new(sink);

        let outcome = importer
            .import(&titled(&["a", "b", "c", "d", "e"]), &token())
            .await;

        assert_eq!(
            outcome,
            ImportOutcome {
                success: 3,
                errors: 2
            }
        );
        assert_eq!(importer.sink().calls(), 5);
    }

    #[tokio::test]
    async fn test_requests_sent_in_source_order_with_token() {
        let importer = BatchImporter::new(FakeSink::new());

        importer.import(&titled(&["z", "y", "x"]), &token()).await;

        let sink = importer.sink();
        let titles: Vec<String> = sink
            .received
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.titre.clone())
            .collect();
        assert_eq!(titles, ["z", "y", "x"]);
        assert!(sink.tokens.lock().unwrap().iter().all(|t| t == "jwt"));
    }

    #[tokio::test]
    async fn test_documents_are_normalized_before_sending() {
        let importer = BatchImporter::new(FakeSink::new());
        let doc = SourceDocument::new("raw").with_field("userId", "not-a-number");

        let outcome = importer.import(&[doc], &token()).await;

        assert_eq!(outcome.success, 1);
        let received = importer.sink().received.lock().unwrap();
        assert_eq!(received[0].titre, "Sans titre");
        assert_eq!(received[0].id_utilisateur, 1);
        assert_eq!(received[0].id_entreprise, None);
    }
}
