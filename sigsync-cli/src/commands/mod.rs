mod auth;
mod config_cmd;
mod firebase;
mod signalements;
mod sync_cmd;
mod users;

pub use auth::AuthCommand;
pub use config_cmd::ConfigCommand;
pub use firebase::FirebaseCommand;
pub use signalements::SignalementsCommand;
pub use sync_cmd::SyncCommand;
pub use users::UsersCommand;

use clap::ValueEnum;
use sigsync_core::{ApiError, FirestoreError};
use std::io::{self, Write};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Errors shared by the commands that talk to the API or Firestore
#[derive(Debug)]
pub enum CommandError {
    Io(io::Error),
    Api(ApiError),
    Firestore(FirestoreError),
    Json(serde_json::Error),
    Usage(String),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Io(e) => write!(f, "I/O error: {}", e),
            CommandError::Api(e) => write!(f, "{}", e),
            CommandError::Firestore(FirestoreError::NotConfigured) => write!(
                f,
                "Firestore not configured. Set firestore.project_id in config or SIGSYNC_FIRESTORE_PROJECT."
            ),
            CommandError::Firestore(e) => write!(f, "{}", e),
            CommandError::Json(e) => write!(f, "JSON error: {}", e),
            CommandError::Usage(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<io::Error> for CommandError {
    fn from(e: io::Error) -> Self {
        CommandError::Io(e)
    }
}

impl From<ApiError> for CommandError {
    fn from(e: ApiError) -> Self {
        CommandError::Api(e)
    }
}

impl From<FirestoreError> for CommandError {
    fn from(e: FirestoreError) -> Self {
        CommandError::Firestore(e)
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(e: serde_json::Error) -> Self {
        CommandError::Json(e)
    }
}

/// Asks a yes/no question on stdin; anything but "y" is a no.
pub(crate) fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Reads one trimmed line from stdin after printing `prompt`.
pub(crate) fn prompt_line(prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Shortens `text` to `max` characters for table columns.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

pub(crate) fn runtime() -> io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("Nid de poule", 30), "Nid de poule");
        assert_eq!(truncate("Trottoir dégradé près du marché", 12), "Trottoir ...");
        assert_eq!(truncate("éééééé", 5), "éé...");
    }

    #[test]
    fn test_not_configured_message() {
        let err = CommandError::from(FirestoreError::NotConfigured);
        assert!(err.to_string().contains("SIGSYNC_FIRESTORE_PROJECT"));
    }

    #[test]
    fn test_api_error_passes_through() {
        let err = CommandError::from(ApiError::Server {
            status: 404,
            message: "Signalement introuvable".into(),
            body: String::new(),
        });
        assert_eq!(err.to_string(), "Signalement introuvable (HTTP 404)");
    }
}
