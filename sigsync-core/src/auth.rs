//! Bearer credential for the relational API.

use std::fmt;

use crate::sync::SyncError;

/// A non-empty bearer token.
///
/// Holding one is the precondition for importing; constructing it is where a
/// missing credential is rejected, before any request is made.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(raw: impl Into<String>) -> Result<Self, SyncError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SyncError::NotAuthenticated);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Accepts the caller's optional credential, failing when it is absent.
    pub fn from_optional(raw: Option<&str>) -> Result<Self, SyncError> {
        raw.map(Self::new).unwrap_or(Err(SyncError::NotAuthenticated))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form safe to print, see [`mask_secret`].
    pub fn masked(&self) -> String {
        mask_secret(&self.0)
    }
}

/// Masks a secret for display, keeping its first and last four characters.
///
/// Secrets of eight characters or fewer are fully hidden.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BearerToken({})", self.masked())
    }
}
