//! One-way import of Firestore signalements into the relational API.
//!
//! # Flow
//!
//! ```text
//! SyncOrchestrator::run(credential)
//!   -> read_collection("signalements")      (permission denied => empty)
//!   -> normalize_for_import, per document
//!   -> BatchImporter::import                 (sequential POST /signalements)
//!   -> SyncReport { signalements, total }
//! ```
//!
//! Every run re-creates every source record; nothing deduplicates against
//! earlier runs.

mod error;
mod importer;
mod orchestrator;
mod reader;
mod stats;

pub use error::SyncError;
pub use importer::{BatchImporter, SignalementSink};
pub use orchestrator::SyncOrchestrator;
pub use reader::{read_collection, read_signalement_views, read_user_views};
pub use stats::probe_stats;

pub const SIGNALEMENTS_COLLECTION: &str = "signalements";
pub const USERS_COLLECTION: &str = "users";
