//! sigsync core library
//!
//! Reads road-defect reports ("signalements") from the mobile-facing
//! Firestore document store and imports them into the relational REST API
//! used by the administration tools.

pub mod api;
pub mod auth;
pub mod firestore;
pub mod models;
pub mod normalize;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiClient, ApiError};
pub use auth::{mask_secret, BearerToken};
pub use firestore::{
    DocumentSource, FieldValue, FirestoreClient, FirestoreError, FirestoreSettings, SourceDocument,
};
pub use models::{
    AuthResponse, FirebaseUserView, ImportOutcome, LoginRequest, MessageResponse, RegisterRequest,
    Signalement, SignalementRequest, SignalementView, StatsSnapshot, Statut, SyncReport,
    UpdateUserRequest, User,
};
pub use sync::{
    probe_stats, read_collection, read_signalement_views, read_user_views, BatchImporter,
    SignalementSink, SyncError, SyncOrchestrator, SIGNALEMENTS_COLLECTION, USERS_COLLECTION,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
