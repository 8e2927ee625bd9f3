//! HTTP client for the remote fitness API.
//!
//! Thin typed wrapper over the consumed REST contract. Authenticated
//! routes carry `Authorization: Bearer <token>`; a 401 maps to
//! [`RemoteError::Unauthorized`] and is the sole trigger for forced
//! session invalidation upstream. Timeouts belong to the transport and
//! are configured on the underlying `reqwest` client.

use crate::{ContactMessage, HistoryRecord, ProgressEntry, UserProfile};
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;

/// Errors surfaced by the remote client
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// 401: credential rejected
    #[error("unauthorized")]
    Unauthorized,

    /// Transport-level failure (connection refused, DNS, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// Non-success status other than 401
    #[error("bad response: {0}")]
    BadResponse(String),

    /// Body did not match the expected shape
    #[error("parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Deserialize)]
struct DashboardResponse {
    #[serde(default)]
    progress: Vec<ProgressEntry>,
}

#[derive(Debug, Deserialize)]
struct NutritionGoalsResponse {
    #[serde(rename = "nutritionGoals", default)]
    nutrition_goals: Vec<HistoryRecord>,
}

/// Typed client for the fitness backend
pub struct RemoteApi {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteApi {
    /// Build a client for the given base URL (e.g. `http://host:5000/api`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.header("Authorization", format!("Bearer {}", token))
    }

    async fn expect_success(
        resp: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<reqwest::Response, RemoteError> {
        let resp = resp.map_err(|e| RemoteError::Network(e.to_string()))?;
        match resp.status() {
            StatusCode::UNAUTHORIZED => Err(RemoteError::Unauthorized),
            status if status.is_success() => Ok(resp),
            status => Err(RemoteError::BadResponse(format!(
                "server returned {}",
                status
            ))),
        }
    }

    async fn json_body<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, RemoteError> {
        resp.json::<T>()
            .await
            .map_err(|e| RemoteError::Parse(e.to_string()))
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, RemoteError> {
        let resp = self
            .client
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await;
        Self::json_body(Self::expect_success(resp).await?).await
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, RemoteError> {
        let resp = self
            .client
            .post(self.url("/auth/register"))
            .json(&serde_json::json!({ "name": name, "email": email, "password": password }))
            .send()
            .await;
        Self::json_body(Self::expect_success(resp).await?).await
    }

    // ------------------------------------------------------------------
    // Progress
    // ------------------------------------------------------------------

    /// GET /dashboard: the authoritative progress collection
    pub async fn fetch_progress(&self, token: &str) -> Result<Vec<ProgressEntry>, RemoteError> {
        let resp = self
            .bearer(self.client.get(self.url("/dashboard")), token)
            .send()
            .await;
        let body: DashboardResponse = Self::json_body(Self::expect_success(resp).await?).await?;
        Ok(body.progress)
    }

    /// POST /progress: returns the full updated collection, not the new
    /// entry, so callers can replace their view wholesale
    pub async fn push_progress(
        &self,
        token: &str,
        entry: &ProgressEntry,
    ) -> Result<Vec<ProgressEntry>, RemoteError> {
        let resp = self
            .bearer(self.client.post(self.url("/progress")), token)
            .json(entry)
            .send()
            .await;
        let body: DashboardResponse = Self::json_body(Self::expect_success(resp).await?).await?;
        Ok(body.progress)
    }

    // ------------------------------------------------------------------
    // Nutrition goals
    // ------------------------------------------------------------------

    pub async fn fetch_nutrition_goals(
        &self,
        token: &str,
    ) -> Result<Vec<HistoryRecord>, RemoteError> {
        let resp = self
            .bearer(self.client.get(self.url("/nutrition/goals")), token)
            .send()
            .await;
        let body: NutritionGoalsResponse =
            Self::json_body(Self::expect_success(resp).await?).await?;
        Ok(body.nutrition_goals)
    }

    /// POST /nutrition/goals: returns the created record
    pub async fn push_nutrition_goal(
        &self,
        token: &str,
        record: &HistoryRecord,
    ) -> Result<HistoryRecord, RemoteError> {
        let resp = self
            .bearer(self.client.post(self.url("/nutrition/goals")), token)
            .json(record)
            .send()
            .await;
        Self::json_body(Self::expect_success(resp).await?).await
    }

    pub async fn delete_nutrition_goal(&self, token: &str, id: &str) -> Result<(), RemoteError> {
        let resp = self
            .bearer(
                self.client
                    .delete(self.url(&format!("/nutrition/goals/{}", id))),
                token,
            )
            .send()
            .await;
        Self::expect_success(resp).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Contact
    // ------------------------------------------------------------------

    /// POST /contact: unauthenticated submission
    pub async fn send_contact(&self, message: &ContactMessage) -> Result<(), RemoteError> {
        let resp = self
            .client
            .post(self.url("/contact"))
            .json(message)
            .send()
            .await;
        Self::expect_success(resp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_login_parses_user_and_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "user": { "name": "Dana", "email": "dana@example.com" },
                "token": "tok-abc"
            })))
            .mount(&server)
            .await;

        let api = RemoteApi::new(server.uri());
        let auth = api.login("dana@example.com", "hunter2").await.unwrap();
        assert_eq!(auth.user.name, "Dana");
        assert_eq!(auth.token, "tok-abc");
    }

    #[tokio::test]
    async fn test_dashboard_sends_bearer_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dashboard"))
            .and(header("Authorization", "Bearer tok-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "progress": [{
                    "date": "2026-08-29", "caloriesIn": 2000.0,
                    "caloriesOut": 2500.0, "weight": 82.0, "targetWeight": 78.0
                }]
            })))
            .mount(&server)
            .await;

        let api = RemoteApi::new(server.uri());
        let progress = api.fetch_progress("tok-abc").await.unwrap();
        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].weight_kg, 82.0);
    }

    #[tokio::test]
    async fn test_401_maps_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dashboard"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let api = RemoteApi::new(server.uri());
        let err = api.fetch_progress("stale").await.unwrap_err();
        assert!(matches!(err, RemoteError::Unauthorized));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_bad_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contact"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let api = RemoteApi::new(server.uri());
        let msg = ContactMessage {
            name: "Dana".into(),
            email: "dana@example.com".into(),
            message: "hello".into(),
        };
        let err = api.send_contact(&msg).await.unwrap_err();
        assert!(matches!(err, RemoteError::BadResponse(_)));
    }
}
