//! Client for the REST data backend (profile, logs, weight, plan, auth).

use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::config::ApiConfig;
use crate::metrics::{add_log, MergeOutcome};
use crate::models::{UserProfile, WorkoutLog, WorkoutPlan};

mod error;

pub use error::ApiError;

/// Credentials for `/auth/login` and `/auth/register`
#[derive(Debug, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Token returned by the auth endpoints
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Body of `POST /weight`
#[derive(Debug, Serialize)]
pub struct WeightEntry {
    pub weight: f64,
}

/// Bearer-token client for the data backend.
///
/// A 401 or 403 from any call drops the held token, so the caller must
/// authenticate again before the next request.
pub struct BackendClient {
    client: Client,
    base_url: String,
    token: Mutex<Option<String>>,
}

impl BackendClient {
    /// Create a new client without a session
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: Mutex::new(None),
        })
    }

    /// Resume a session with a saved token
    pub fn with_token(self, token: impl Into<String>) -> Self {
        let token = token.into();
        if !token.is_empty() {
            *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
        }
        self
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn clear_token(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Login and hold the returned token
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        tracing::debug!("Logging in as {}", username);
        let token = self.authenticate("/auth/login", username, password).await?;
        tracing::info!("Successfully logged in as {}", username);
        Ok(token)
    }

    /// Create an account and hold the returned token
    pub async fn register(&self, username: &str, password: &str) -> Result<String, ApiError> {
        tracing::debug!("Registering {}", username);
        let token = self.authenticate("/auth/register", username, password).await?;
        tracing::info!("Registered account {}", username);
        Ok(token)
    }

    async fn authenticate(
        &self,
        path: &str,
        username: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        let request = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self.client.post(self.url(path)).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ApiError::AuthenticationFailed(error_text)
                }
                _ => ApiError::from_status(status, error_text),
            });
        }

        let body: TokenResponse = response.json().await?;
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(body.token.clone());
        Ok(body.token)
    }

    /// Fetch the profile; `None` when the user has not created one yet
    pub async fn get_profile(&self) -> Result<Option<UserProfile>, ApiError> {
        self.get_optional("/profile").await
    }

    pub async fn save_profile(&self, profile: &UserProfile) -> Result<(), ApiError> {
        self.post("/profile", profile).await?;
        tracing::info!("Saved profile for {}", profile.name);
        Ok(())
    }

    pub async fn get_logs(&self) -> Result<Vec<WorkoutLog>, ApiError> {
        let response = self.get("/logs").await?;
        let mut logs: Vec<WorkoutLog> = response.json().await?;
        logs.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(logs)
    }

    pub async fn add_log(&self, log: &WorkoutLog) -> Result<(), ApiError> {
        self.post("/logs", log).await?;
        tracing::debug!("Posted workout log {}", log.id);
        Ok(())
    }

    /// Post `incoming` as entered and mirror the server's same-day merge
    /// into `logs`. The merged entry never goes over the wire.
    pub async fn record_log(
        &self,
        logs: &mut Vec<WorkoutLog>,
        incoming: WorkoutLog,
    ) -> Result<MergeOutcome, ApiError> {
        self.add_log(&incoming).await?;
        Ok(add_log(logs, incoming))
    }

    /// Append a weight sample to the profile's history
    pub async fn add_weight(&self, weight: f64) -> Result<(), ApiError> {
        self.post("/weight", &WeightEntry { weight }).await?;
        tracing::debug!("Recorded weight {:.1}kg", weight);
        Ok(())
    }

    pub async fn get_plan(&self) -> Result<Option<WorkoutPlan>, ApiError> {
        self.get_optional("/plan").await
    }

    pub async fn save_plan(&self, plan: &WorkoutPlan) -> Result<(), ApiError> {
        self.post("/plan", plan).await?;
        tracing::info!("Saved plan {}", plan.title);
        Ok(())
    }

    fn bearer(&self) -> Result<String, ApiError> {
        self.token()
            .map(|token| format!("Bearer {}", token))
            .ok_or(ApiError::NotAuthenticated)
    }

    async fn get(&self, path: &str) -> Result<Response, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .header("Authorization", self.bearer()?)
            .send()
            .await?;

        self.check(response).await
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .header("Authorization", self.bearer()?)
            .json(body)
            .send()
            .await?;

        self.check(response).await
    }

    async fn get_optional<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, ApiError> {
        match self.get(path).await {
            Ok(response) => Ok(Some(response.json().await?)),
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Map non-success statuses, dropping the token on auth failures
    async fn check(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        let error = ApiError::from_status(status, error_text);

        if error.is_auth_failure() {
            tracing::warn!("Backend rejected the session ({}), clearing token", status);
            self.clear_token();
        }

        Err(error)
    }
}
