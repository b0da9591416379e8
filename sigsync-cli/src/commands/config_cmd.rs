use clap::{Args, Subcommand};
use std::fs;
use std::io::Write;

use super::OutputFormat;
use crate::config::Config;
use sigsync_core::mask_secret;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

const DEFAULT_CONFIG: &str = r#"# sigsync configuration

# Relational API base URL
api_url: http://localhost:3333/api

# Where the session token is kept (default: platform data dir)
# data_dir: ~/.local/share/sigsync

firestore:
  # Firebase project id
  # project_id: my-project
  # Web API key
  # api_key: AIza...
  # Firebase Auth ID token, if the security rules require an authenticated reader
  # id_token: eyJ...
  database: "(default)"
"#;

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("api_url: {}", config.api_url.value);
                        println!("  source: {}", config.api_url.source);
                        println!();

                        println!("data_dir: {}", config.data_dir.value.display());
                        println!("  source: {}", config.data_dir.source);
                        println!();

                        let firestore = &config.firestore;
                        println!("firestore:");
                        println!(
                            "  project_id: {}",
                            firestore.project_id.as_deref().unwrap_or("(not set)")
                        );
                        println!(
                            "  api_key: {}",
                            firestore
                                .api_key
                                .as_deref()
                                .map(mask_secret)
                                .unwrap_or_else(|| "(not set)".to_string())
                        );
                        println!(
                            "  id_token: {}",
                            if firestore.id_token.is_some() {
                                "(set)"
                            } else {
                                "(not set)"
                            }
                        );
                        println!("  database: {}", firestore.database);
                        println!("  base_url: {}", firestore.base_url);
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = Config::default_config_path();

                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'sigsync config show' to view current configuration.");
                    return Ok(());
                }

                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = fs::File::create(&config_path)?;
                file.write_all(DEFAULT_CONFIG.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to set your Firestore project.");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, DEFAULT_CONFIG).unwrap();

        let config = Config::load_with_env(Some(path), |_| None).unwrap();
        assert_eq!(config.api_url.value, "http://localhost:3333/api");
        assert_eq!(config.firestore.database, "(default)");
        assert!(!config.firestore.is_configured());
    }
}
