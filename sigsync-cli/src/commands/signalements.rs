use clap::{Args, Subcommand};
use sigsync_core::{Signalement, Statut};
use std::collections::BTreeMap;

use super::{confirm, truncate, CommandError, OutputFormat};
use crate::config::Config;

/// Manage signalements stored in the relational API
#[derive(Args)]
pub struct SignalementsCommand {
    #[command(subcommand)]
    command: SignalementsSubcommand,
}

#[derive(Subcommand)]
enum SignalementsSubcommand {
    /// List signalements
    List {
        /// Only show this statut (EN_ATTENTE, EN_COURS, RESOLU)
        #[arg(long, short)]
        status: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a signalement by id
    Show {
        id: i64,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete a signalement
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

impl SignalementsCommand {
    pub fn run(&self, config: &Config) -> Result<(), CommandError> {
        let rt = super::runtime()?;
        rt.block_on(self.execute(config))
    }

    async fn execute(&self, config: &Config) -> Result<(), CommandError> {
        let api = config.api_client(config.token_store().bearer()?);

        match &self.command {
            SignalementsSubcommand::List { status, format } => {
                let signalements: Vec<Signalement> = api
                    .list_signalements()
                    .await?
                    .into_iter()
                    .filter(|s| status.as_deref().map_or(true, |code| s.statut == code))
                    .collect();

                if signalements.is_empty() {
                    println!("No signalements found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&signalements)?);
                    }
                    OutputFormat::Text => {
                        print_table(&signalements);
                        println!();
                        for (code, count) in count_by_statut(&signalements) {
                            println!("  {:<12} {}", Statut::label_for(code), count);
                        }
                    }
                }
                Ok(())
            }

            SignalementsSubcommand::Show { id, format } => {
                let signalement = api.get_signalement(*id).await?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&signalement)?)
                    }
                    OutputFormat::Text => print!("{}", signalement),
                }
                Ok(())
            }

            SignalementsSubcommand::Delete { id, force } => {
                let signalement = api.get_signalement(*id).await?;

                if !force
                    && !confirm(&format!("Delete signalement '{}'?", signalement.titre))?
                {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                api.delete_signalement(signalement.id_signalement).await?;
                println!("Deleted signalement: {}", signalement.titre);
                Ok(())
            }
        }
    }
}

fn print_table(signalements: &[Signalement]) {
    println!(
        "{:<6}  {:<30}  {:<12}  {:<16}  DATE",
        "ID", "TITRE", "STATUT", "ENTREPRISE"
    );
    println!("{}", "-".repeat(80));
    for s in signalements {
        println!(
            "{:<6}  {:<30}  {:<12}  {:<16}  {}",
            s.id_signalement,
            truncate(&s.titre, 30),
            Statut::label_for(&s.statut),
            truncate(s.nom_entreprise.as_deref().unwrap_or("-"), 16),
            s.date_signalement.as_deref().unwrap_or("-")
        );
    }
    println!("\nTotal: {} signalement(s)", signalements.len());
}

/// Number of signalements per statut code, in code order.
fn count_by_statut(signalements: &[Signalement]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for s in signalements {
        *counts.entry(s.statut.as_str()).or_insert(0) += 1;
    }
    counts
}
