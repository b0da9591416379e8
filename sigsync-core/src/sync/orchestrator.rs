//! Entry point of a Firestore → relational API sync run.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::auth::BearerToken;
use crate::firestore::DocumentSource;
use crate::models::SyncReport;

use super::importer::{BatchImporter, SignalementSink};
use super::reader::read_collection;
use super::{SyncError, SIGNALEMENTS_COLLECTION};

/// Composes the reader and the importer into a single sync operation.
///
/// Holds no state besides an in-progress flag: overlapping calls to
/// [`SyncOrchestrator::run`] are rejected rather than importing twice.
pub struct SyncOrchestrator<R, S> {
    source: R,
    importer: BatchImporter<S>,
    running: AtomicBool,
}

impl<R: DocumentSource, S: SignalementSink> SyncOrchestrator<R, S> {
    pub fn new(source: R, sink: S) -> Self {
        Self {
            source,
            importer: BatchImporter::new(sink),
            running: AtomicBool::new(false),
        }
    }

    pub fn source(&self) -> &R {
        &self.source
    }

    pub fn sink(&self) -> &S {
        self.importer.sink()
    }

    /// Imports every Firestore signalement using `credential`.
    ///
    /// Fails before any request if `credential` is missing or blank, or if
    /// another run is in progress. Read failures other than a permission
    /// denial abort the run; per-record failures only show up in the report.
    pub async fn run(&self, credential: Option<&str>) -> Result<SyncReport, SyncError> {
        let token = BearerToken::from_optional(credential)?;
        let _guard = RunGuard::acquire(&self.running)?;

        let documents = read_collection(&self.source, SIGNALEMENTS_COLLECTION).await?;
        tracing::info!(count = documents.len(), "Read signalements from Firestore");

        let outcome = self.importer.import(&documents, &token).await;
        Ok(SyncReport::from(outcome))
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Clears the in-progress flag when dropped, whatever way the run ends.
struct RunGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, SyncError> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| SyncError::AlreadyRunning)?;
        Ok(Self { flag })
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
