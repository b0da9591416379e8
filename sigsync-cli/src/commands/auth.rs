//! Authentication commands for the sigsync CLI.
//!
//! Login stores the API's session token in the data directory; every other
//! command reads it from there.

use clap::{Args, Subcommand};
use sigsync_core::{mask_secret, ApiError, AuthResponse, RegisterRequest};
use std::io;

use super::prompt_line;
use crate::config::Config;

/// Authentication commands
#[derive(Args)]
pub struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Subcommand)]
enum AuthSubcommand {
    /// Log in to the API and store the session token
    Login {
        /// Username (prompted if omitted)
        #[arg(long, short)]
        username: Option<String>,

        /// Password (prompted if omitted)
        #[arg(long, short)]
        password: Option<String>,
    },

    /// Create an account (the stored session is left unchanged)
    Register {
        /// Username
        username: String,

        /// Email address
        #[arg(long, short)]
        email: String,

        /// First name
        #[arg(long)]
        first_name: Option<String>,

        /// Last name
        #[arg(long)]
        last_name: Option<String>,

        /// Password (prompted if omitted)
        #[arg(long, short)]
        password: Option<String>,
    },

    /// Forget the stored session token
    Logout,

    /// Show authentication status
    Status,

    /// Unlock an account locked after failed login attempts
    Unlock {
        /// Username of the locked account
        username: String,
    },
}

impl AuthCommand {
    pub fn run(&self, config: &Config) -> Result<(), AuthError> {
        let rt = super::runtime()?;

        match &self.command {
            AuthSubcommand::Login { username, password } => {
                rt.block_on(login(config, username.as_deref(), password.as_deref()))
            }
            AuthSubcommand::Register {
                username,
                email,
                first_name,
                last_name,
                password,
            } => {
                let password = match password {
                    Some(p) => p.clone(),
                    None => required(prompt_line("Password: ")?, "Password")?,
                };
                let request = RegisterRequest {
                    username: username.clone(),
                    email: email.clone(),
                    password,
                    first_name: first_name.clone(),
                    last_name: last_name.clone(),
                };
                rt.block_on(register(config, &request))
            }
            AuthSubcommand::Logout => logout(config),
            AuthSubcommand::Status => status(config),
            AuthSubcommand::Unlock { username } => rt.block_on(unlock(config, username)),
        }
    }
}

/// Errors that can occur during authentication
#[derive(Debug)]
pub enum AuthError {
    /// I/O error
    IoError(io::Error),
    /// The API refused the request or could not be reached
    ApiError(ApiError),
    /// Missing interactive input
    InvalidInput(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::IoError(e) => write!(f, "I/O error: {}", e),
            AuthError::ApiError(e) => write!(f, "{}", e),
            AuthError::InvalidInput(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<io::Error> for AuthError {
    fn from(e: io::Error) -> Self {
        AuthError::IoError(e)
    }
}

impl From<ApiError> for AuthError {
    fn from(e: ApiError) -> Self {
        AuthError::ApiError(e)
    }
}

fn required(value: String, name: &str) -> Result<String, AuthError> {
    if value.is_empty() {
        return Err(AuthError::InvalidInput(format!("{} cannot be empty", name)));
    }
    Ok(value)
}

async fn login(
    config: &Config,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<(), AuthError> {
    let username = match username {
        Some(u) => u.to_string(),
        None => required(prompt_line("Username: ")?, "Username")?,
    };
    let password = match password {
        Some(p) => p.to_string(),
        None => required(prompt_line("Password: ")?, "Password")?,
    };

    let response = config
        .api_client(None)
        .login(&username, &password)
        .await?;
    store_session(config, &response)
}

/// Creates an account without touching the stored session: whoever is
/// logged in stays logged in.
async fn register(config: &Config, request: &RegisterRequest) -> Result<(), AuthError> {
    let created = config.api_client(None).register(request).await?;
    println!(
        "Created account {} (#{}, {})",
        created.username, created.id, created.role
    );
    println!("Run 'sigsync auth login -u {}' to use it.", created.username);
    Ok(())
}

fn store_session(config: &Config, response: &AuthResponse) -> Result<(), AuthError> {
    let store = config.token_store();
    store.save(&response.token)?;
    tracing::debug!(path = %store.path().display(), "Stored session token");

    println!("Logged in as {} ({})", response.username, response.role);
    Ok(())
}

fn logout(config: &Config) -> Result<(), AuthError> {
    if config.token_store().clear()? {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

fn status(config: &Config) -> Result<(), AuthError> {
    println!("Authentication Status");
    println!("=====================");
    println!();
    println!("API: {}", config.api_url.value);

    match config.token_store().load()? {
        Some(token) => {
            println!("Status: Logged in");
            println!("Token: {}", mask_secret(&token));
        }
        None => {
            println!("Status: Not logged in");
            println!();
            println!("Run 'sigsync auth login' to authenticate.");
        }
    }
    Ok(())
}

async fn unlock(config: &Config, username: &str) -> Result<(), AuthError> {
    let token = config.token_store().bearer()?;
    let response = config.api_client(token).unlock_user(username).await?;
    println!("{}", response.message);
    Ok(())
}
