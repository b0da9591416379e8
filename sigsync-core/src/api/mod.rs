//! Client for the relational REST API (`/auth`, `/users`, `/signalements`).

mod client;
mod error;

pub use client::ApiClient;
pub use error::ApiError;

pub const DEFAULT_API_URL: &str = "http://localhost:3333/api";
