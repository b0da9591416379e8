//! Import of Firestore signalements into the relational API.

use clap::Args;
use sigsync_core::{
    probe_stats, ApiClient, BearerToken, FirestoreError, SyncError, SyncOrchestrator,
};
use std::io;

use super::confirm;
use crate::config::Config;

/// Import every Firestore signalement into the API
#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Skip confirmation prompt
    #[arg(long)]
    force: bool,
}

impl SyncCommand {
    pub fn run(&self, config: &Config) -> Result<(), SyncCommandError> {
        let rt = super::runtime()?;
        rt.block_on(self.sync(config))
    }

    async fn sync(&self, config: &Config) -> Result<(), SyncCommandError> {
        let token = config.token_store().load()?;
        let credential =
            BearerToken::from_optional(token.as_deref()).map_err(SyncCommandError::Import)?;
        let firestore = config.firestore_client()?;

        if !self.force {
            let stats = probe_stats(&firestore).await;
            println!(
                "Firebase: {} signalement(s), {} user(s)",
                stats.signalements_count, stats.users_count
            );
            if !confirm("Import all signalements into the API?")? {
                println!("Import cancelled.");
                return Ok(());
            }
        }

        let orchestrator =
            SyncOrchestrator::new(firestore, ApiClient::new(config.api_url.value.clone()));

        println!("Importing signalements from Firebase...");
        let report = orchestrator
            .run(Some(credential.as_str()))
            .await
            .map_err(SyncCommandError::Import)?;

        println!("Import terminé: {}", report.signalements);
        Ok(())
    }
}

#[derive(Debug)]
pub enum SyncCommandError {
    Io(io::Error),
    NotConfigured,
    Import(SyncError),
}

impl std::fmt::Display for SyncCommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncCommandError::Io(e) => write!(f, "I/O error: {}", e),
            SyncCommandError::NotConfigured => write!(
                f,
                "Firestore not configured. Set firestore.project_id in config or SIGSYNC_FIRESTORE_PROJECT."
            ),
            SyncCommandError::Import(e) => {
                write!(f, "Échec de l'import depuis Firebase: {}", e)
            }
        }
    }
}

impl std::error::Error for SyncCommandError {}

impl From<io::Error> for SyncCommandError {
    fn from(e: io::Error) -> Self {
        SyncCommandError::Io(e)
    }
}

impl From<FirestoreError> for SyncCommandError {
    fn from(e: FirestoreError) -> Self {
        match e {
            FirestoreError::NotConfigured => SyncCommandError::NotConfigured,
            other => SyncCommandError::Import(SyncError::Read(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    /// Config with no Firestore project and its data dir under `data_dir`.
    fn unconfigured(data_dir: &Path) -> Config {
        let data_dir = data_dir.display().to_string();
        Config::load_with_env(Some(PathBuf::from("/nonexistent/sigsync.yaml")), |key| {
            (key == "SIGSYNC_DATA_DIR").then(|| data_dir.clone())
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_missing_token_reported_before_missing_config() {
        let dir = tempdir().unwrap();
        let config = unconfigured(dir.path());

        let err = SyncCommand { force: true }.sync(&config).await.unwrap_err();
        assert!(matches!(
            err,
            SyncCommandError::Import(SyncError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_logged_in_without_project_is_not_configured() {
        let dir = tempdir().unwrap();
        let config = unconfigured(dir.path());
        config.token_store().save("jwt").unwrap();

        let err = SyncCommand { force: true }.sync(&config).await.unwrap_err();
        assert!(matches!(err, SyncCommandError::NotConfigured));
    }

    #[test]
    fn test_import_failure_message() {
        let err = SyncCommandError::Import(SyncError::NotAuthenticated);
        assert_eq!(
            err.to_string(),
            "Échec de l'import depuis Firebase: Veuillez vous connecter pour importer les données"
        );
    }

    #[test]
    fn test_missing_project_is_not_configured() {
        let err = SyncCommandError::from(FirestoreError::NotConfigured);
        assert!(matches!(err, SyncCommandError::NotConfigured));
    }
}
