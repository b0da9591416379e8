use clap::{Args, Subcommand};
use sigsync_core::{UpdateUserRequest, User};

use super::{confirm, truncate, CommandError, OutputFormat};
use crate::config::Config;

/// Manage user accounts of the relational API
#[derive(Args)]
pub struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand)]
enum UsersSubcommand {
    /// List all users
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a user by id
    Show {
        id: i64,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Update a user's profile or status
    Update {
        id: i64,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        password: Option<String>,

        /// Enable the account
        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        /// Disable the account
        #[arg(long)]
        disable: bool,
    },

    /// Delete a user
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

impl UsersCommand {
    pub fn run(&self, config: &Config) -> Result<(), CommandError> {
        let rt = super::runtime()?;
        rt.block_on(self.execute(config))
    }

    async fn execute(&self, config: &Config) -> Result<(), CommandError> {
        let api = config.api_client(config.token_store().bearer()?);

        match &self.command {
            UsersSubcommand::List { format } => {
                let users = api.list_users().await?;

                if users.is_empty() {
                    println!("No users found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&users)?);
                    }
                    OutputFormat::Text => print_table(&users),
                }
                Ok(())
            }

            UsersSubcommand::Show { id, format } => {
                let user = api.get_user(*id).await?;
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&user)?),
                    OutputFormat::Text => print!("{}", user),
                }
                Ok(())
            }

            UsersSubcommand::Update {
                id,
                email,
                first_name,
                last_name,
                password,
                enable,
                disable,
            } => {
                let update = UpdateUserRequest {
                    email: email.clone(),
                    first_name: first_name.clone(),
                    last_name: last_name.clone(),
                    password: password.clone(),
                    enabled: match (*enable, *disable) {
                        (true, _) => Some(true),
                        (_, true) => Some(false),
                        _ => None,
                    },
                };

                if update.is_empty() {
                    return Err(CommandError::Usage(
                        "Nothing to update. Pass at least one of --email, --first-name, --last-name, --password, --enable, --disable.".to_string(),
                    ));
                }

                let user = api.update_user(*id, &update).await?;
                println!("Updated user: {}", user.username);
                Ok(())
            }

            UsersSubcommand::Delete { id, force } => {
                let user = api.get_user(*id).await?;

                if !force && !confirm(&format!("Delete user '{}'?", user.username))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                api.delete_user(user.id).await?;
                println!("Deleted user: {}", user.username);
                Ok(())
            }
        }
    }
}

fn print_table(users: &[User]) {
    println!(
        "{:<6}  {:<20}  {:<30}  {:<10}  STATUS",
        "ID", "USERNAME", "EMAIL", "ROLE"
    );
    println!("{}", "-".repeat(80));
    for user in users {
        let status = match (user.enabled, user.locked) {
            (_, true) => "locked",
            (true, false) => "enabled",
            (false, false) => "disabled",
        };
        println!(
            "{:<6}  {:<20}  {:<30}  {:<10}  {}",
            user.id,
            truncate(&user.username, 20),
            truncate(&user.email, 30),
            user.role,
            status
        );
    }
    println!("\nTotal: {} user(s)", users.len());
}
