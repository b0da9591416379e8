//! Collection reads with permission-denied tolerance.

use std::cmp::Reverse;

use crate::firestore::{DocumentSource, FirestoreError, SourceDocument};
use crate::models::{FirebaseUserView, SignalementView};
use crate::normalize::{signalement_view, user_view};

use super::{SIGNALEMENTS_COLLECTION, USERS_COLLECTION};

/// Reads every document of `collection`.
///
/// A permission denial is logged and yields an empty list: restrictive read
/// rules must not look like a failure. Any other error is returned.
pub async fn read_collection<S: DocumentSource>(
    source: &S,
    collection: &str,
) -> Result<Vec<SourceDocument>, FirestoreError> {
    match source.list_documents(collection).await {
        Ok(documents) => Ok(documents),
        Err(FirestoreError::PermissionDenied(message)) => {
            tracing::warn!(
                collection,
                "Insufficient Firestore permissions, check the security rules: {}",
                message
            );
            Ok(Vec::new())
        }
        Err(e) => {
            tracing::error!(collection, error = %e, "Failed to read Firestore collection");
            Err(e)
        }
    }
}

/// Preview of the `signalements` collection, newest first.
///
/// Undated documents sort last. `statut` keeps only matching documents.
pub async fn read_signalement_views<S: DocumentSource>(
    source: &S,
    statut: Option<&str>,
) -> Result<Vec<SignalementView>, FirestoreError> {
    let documents = read_collection(source, SIGNALEMENTS_COLLECTION).await?;

    let mut views: Vec<SignalementView> = documents
        .iter()
        .map(signalement_view)
        .filter(|v| statut.map_or(true, |s| v.statut == s))
        .collect();

    // ISO-8601 UTC strings with fixed precision order chronologically.
    views.sort_by_key(|v| Reverse(v.date_signalement.clone()));
    Ok(views)
}

/// Preview of the `users` collection.
pub async fn read_user_views<S: DocumentSource>(
    source: &S,
) -> Result<Vec<FirebaseUserView>, FirestoreError> {
    let documents = read_collection(source, USERS_COLLECTION).await?;
    Ok(documents.iter().map(user_view).collect())
}
