//! Sync error types.

use thiserror::Error;

use crate::firestore::FirestoreError;

/// Errors that abort a whole sync run.
///
/// Per-record failures are not errors at this level; they are counted in
/// the run's [`crate::ImportOutcome`].
#[derive(Debug, Error)]
pub enum SyncError {
    /// No bearer credential was supplied
    #[error("Veuillez vous connecter pour importer les données")]
    NotAuthenticated,
    /// Another run on the same orchestrator has not finished
    #[error("A sync is already in progress")]
    AlreadyRunning,
    /// Reading the source collection failed for a reason other than permissions
    #[error("Failed to read from Firestore: {0}")]
    Read(#[from] FirestoreError),
}
