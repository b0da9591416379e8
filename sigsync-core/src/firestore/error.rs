//! Firestore error types.

use thiserror::Error;

/// Errors that can occur while reading from Firestore.
#[derive(Debug, Clone, Error)]
pub enum FirestoreError {
    /// Firestore is not configured (no project id)
    #[error("Firestore not configured. Add firestore.project_id to config.")]
    NotConfigured,
    /// Security rules rejected the read
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    /// Transport-level failure (DNS, connection refused, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(String),
    /// Firestore answered with a non-success status
    #[error("Firestore returned status {code}: {message}")]
    Status { code: u16, message: String },
    /// Response body did not match the expected shape
    #[error("Failed to decode Firestore response: {0}")]
    Decode(String),
}

impl FirestoreError {
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, FirestoreError::PermissionDenied(_))
    }
}
