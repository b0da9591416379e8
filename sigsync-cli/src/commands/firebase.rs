//! Read-only previews of the Firestore collections.

use clap::{Args, Subcommand};
use sigsync_core::{probe_stats, read_signalement_views, read_user_views, Statut};

use super::{truncate, CommandError, OutputFormat};
use crate::config::Config;

/// Inspect the Firestore data before importing it
#[derive(Args)]
pub struct FirebaseCommand {
    #[command(subcommand)]
    command: FirebaseSubcommand,
}

#[derive(Subcommand)]
enum FirebaseSubcommand {
    /// Count users and signalements in Firestore
    Stats {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List Firestore signalements, newest first
    List {
        /// Only show this statut (EN_ATTENTE, EN_COURS, RESOLU)
        #[arg(long, short)]
        status: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List Firestore users
    Users {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl FirebaseCommand {
    pub fn run(&self, config: &Config) -> Result<(), CommandError> {
        let rt = super::runtime()?;
        rt.block_on(self.execute(config))
    }

    async fn execute(&self, config: &Config) -> Result<(), CommandError> {
        let firestore = config.firestore_client()?;

        match &self.command {
            FirebaseSubcommand::Stats { format } => {
                let stats = probe_stats(&firestore).await;
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                    OutputFormat::Text => {
                        println!("Firebase");
                        println!("========\n");
                        println!("Users:        {}", stats.users_count);
                        println!("Signalements: {}", stats.signalements_count);
                    }
                }
                Ok(())
            }

            FirebaseSubcommand::List { status, format } => {
                let views = read_signalement_views(&firestore, status.as_deref()).await?;

                if views.is_empty() {
                    println!("No signalements found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&views)?),
                    OutputFormat::Text => {
                        println!(
                            "{:<20}  {:<26}  {:<12}  {:<24}  POSITION",
                            "DOCUMENT", "TITRE", "STATUT", "DATE"
                        );
                        println!("{}", "-".repeat(100));
                        for v in &views {
                            println!(
                                "{:<20}  {:<26}  {:<12}  {:<24}  {}, {}",
                                truncate(&v.document_id, 20),
                                truncate(&v.titre, 26),
                                Statut::label_for(&v.statut),
                                v.date_signalement.as_deref().unwrap_or("-"),
                                v.latitude,
                                v.longitude
                            );
                        }
                        println!("\nTotal: {} signalement(s)", views.len());
                    }
                }
                Ok(())
            }

            FirebaseSubcommand::Users { format } => {
                let users = read_user_views(&firestore).await?;

                if users.is_empty() {
                    println!("No users found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&users)?),
                    OutputFormat::Text => {
                        println!(
                            "{:<20}  {:<20}  {:<28}  {:<8}  STATUS",
                            "DOCUMENT", "USERNAME", "EMAIL", "ROLE"
                        );
                        println!("{}", "-".repeat(90));
                        for u in &users {
                            let status = if u.locked {
                                "locked"
                            } else if u.enabled {
                                "enabled"
                            } else {
                                "disabled"
                            };
                            println!(
                                "{:<20}  {:<20}  {:<28}  {:<8}  {}",
                                truncate(&u.id, 20),
                                truncate(&u.username, 20),
                                truncate(&u.email, 28),
                                u.role,
                                status
                            );
                        }
                        println!("\nTotal: {} user(s)", users.len());
                    }
                }
                Ok(())
            }
        }
    }
}
