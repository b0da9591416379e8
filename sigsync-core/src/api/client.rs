//! HTTP client for the relational API.
//!
//! All endpoints speak JSON. Failures come back as a non-2xx status with a
//! `{message}` body, which is surfaced through [`ApiError::Server`].

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use super::ApiError;
use crate::auth::BearerToken;
use crate::models::{
    AuthResponse, LoginRequest, MessageResponse, RegisterRequest, Signalement,
    SignalementRequest, UpdateUserRequest, User,
};
use crate::sync::SignalementSink;

/// Client for the relational REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<BearerToken>,
}

impl ApiClient {
    /// Creates an unauthenticated client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Attaches a bearer token to every subsequent request.
    pub fn with_token(mut self, token: Option<BearerToken>) -> Self {
        self.token = token;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.as_str()),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response_body(status.as_u16(), body, fallback));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    // ===================== Auth =====================

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let request = self.http.post(self.url("/auth/login")).json(&body);
        self.send(request, "Login failed").await
    }

    pub async fn register(&self, data: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let request = self.http.post(self.url("/auth/register")).json(data);
        self.send(request, "Registration failed").await
    }

    pub async fn unlock_user(&self, username: &str) -> Result<MessageResponse, ApiError> {
        let path = format!("/auth/unlock/{}", urlencoding::encode(username));
        let request = self.http.post(self.url(&path));
        self.send(request, "Unlock failed").await
    }

    // ===================== Users =====================

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let request = self.authorized(self.http.get(self.url("/users")));
        self.send(request, "Failed to fetch users").await
    }

    pub async fn get_user(&self, id: i64) -> Result<User, ApiError> {
        let request = self.authorized(self.http.get(self.url(&format!("/users/{}", id))));
        self.send(request, "Failed to fetch user").await
    }

    pub async fn update_user(&self, id: i64, data: &UpdateUserRequest) -> Result<User, ApiError> {
        let request = self
            .authorized(self.http.put(self.url(&format!("/users/{}", id))))
            .json(data);
        self.send(request, "Update failed").await
    }

    pub async fn delete_user(&self, id: i64) -> Result<MessageResponse, ApiError> {
        let request = self.authorized(self.http.delete(self.url(&format!("/users/{}", id))));
        self.send(request, "Delete failed").await
    }

    // ===================== Signalements =====================

    pub async fn list_signalements(&self) -> Result<Vec<Signalement>, ApiError> {
        let request = self.authorized(self.http.get(self.url("/signalements")));
        self.send(request, "Failed to fetch signalements").await
    }

    pub async fn get_signalement(&self, id: i64) -> Result<Signalement, ApiError> {
        let request =
            self.authorized(self.http.get(self.url(&format!("/signalements/{}", id))));
        self.send(request, "Failed to fetch signalement").await
    }

    pub async fn delete_signalement(&self, id: i64) -> Result<MessageResponse, ApiError> {
        let request =
            self.authorized(self.http.delete(self.url(&format!("/signalements/{}", id))));
        self.send(request, "Delete failed").await
    }
}

impl SignalementSink for ApiClient {
    /// Any 2xx counts as accepted; the created resource is not decoded.
    async fn create(
        &self,
        token: &BearerToken,
        request: &SignalementRequest,
    ) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url("/signalements"))
            .bearer_auth(token.as_str())
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_response_body(
            status.as_u16(),
            body,
            "Create failed",
        ))
    }
}
