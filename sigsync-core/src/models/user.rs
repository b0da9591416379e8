use serde::{Deserialize, Serialize};
use std::fmt;

/// A user account as returned by the relational API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl User {
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "User #{}: {}", self.id, self.username)?;
        writeln!(f, "  Email:   {}", self.email)?;
        if let Some(name) = self.full_name() {
            writeln!(f, "  Name:    {}", name)?;
        }
        writeln!(f, "  Role:    {}", self.role)?;
        writeln!(
            f,
            "  Status:  {}{}",
            if self.enabled { "enabled" } else { "disabled" },
            if self.locked { ", locked" } else { "" }
        )?;
        if let Some(created) = &self.created_at {
            writeln!(f, "  Created: {}", created)?;
        }
        Ok(())
    }
}

/// Partial update payload for `PUT /users/:id`; unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Display projection of a Firestore `users` document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseUserView {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub role: String,
    pub enabled: bool,
    pub locked: bool,
    pub failed_login_attempts: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_omits_unset_fields() {
        let req = UpdateUserRequest {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"email":"new@example.com"}"#);
        assert!(!req.is_empty());
        assert!(UpdateUserRequest::default().is_empty());
    }

    #[test]
    fn test_user_from_api() {
        let json = r#"{
            "id": 4,
            "username": "admin",
            "email": "admin@example.com",
            "firstName": "Hery",
            "lastName": null,
            "role": "ADMIN",
            "enabled": true,
            "locked": false,
            "createdAt": "2024-01-10T12:00:00",
            "updatedAt": "2024-01-10T12:00:00"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.full_name().as_deref(), Some("Hery"));
        assert!(user.to_string().contains("Status:  enabled"));
    }
}
