//! Best-effort document counts for previewing an import.

use crate::firestore::DocumentSource;
use crate::models::StatsSnapshot;

use super::{SIGNALEMENTS_COLLECTION, USERS_COLLECTION};

/// Counts the `users` and `signalements` collections.
///
/// Never fails: a collection that cannot be counted reports 0, independently
/// of the other one.
pub async fn probe_stats<S: DocumentSource>(source: &S) -> StatsSnapshot {
    StatsSnapshot {
        users_count: count_or_zero(source, USERS_COLLECTION).await,
        signalements_count: count_or_zero(source, SIGNALEMENTS_COLLECTION).await,
    }
}

async fn count_or_zero<S: DocumentSource>(source: &S, collection: &str) -> u64 {
    match source.count_documents(collection).await {
        Ok(count) => count,
        Err(e) if e.is_permission_denied() => {
            tracing::warn!(collection, "Insufficient Firestore permissions to read stats");
            0
        }
        Err(e) => {
            tracing::error!(collection, error = %e, "Failed to count Firestore collection");
            0
        }
    }
}
