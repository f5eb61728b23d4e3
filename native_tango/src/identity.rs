//! HTTP client for the player identity service.

use serde::Serialize;
use tango_shared::{
    ApiError, ClaimChipsRequest, CreatePlayerRequest, PlayerRecord, SetUsernameRequest,
};
use tracing::debug;

use crate::error::IdentityError;

#[derive(Clone, Debug)]
pub struct IdentityClient {
    http: reqwest::Client,
    base: String,
}

impl IdentityClient {
    /// `base` is the service root, e.g. `http://localhost:5000`.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        IdentityClient {
            http: reqwest::Client::new(),
            base,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Fetch the player bound to `session_id`, or create a new one.
    pub async fn create_or_fetch(
        &self,
        session_id: Option<&str>,
        username: Option<&str>,
    ) -> Result<PlayerRecord, IdentityError> {
        let body = CreatePlayerRequest {
            session_id: session_id.map(str::to_string),
            username: username.map(str::to_string),
        };
        self.post("/api/player", &body).await
    }

    pub async fn set_username(
        &self,
        session_id: &str,
        username: &str,
    ) -> Result<PlayerRecord, IdentityError> {
        let body = SetUsernameRequest {
            session_id: session_id.to_string(),
            username: username.to_string(),
        };
        self.post("/api/player/username", &body).await
    }

    /// Claim the free chip top-up. The service refuses when the balance is
    /// already high enough or the cooldown has not passed.
    pub async fn claim_chips(&self, session_id: &str) -> Result<PlayerRecord, IdentityError> {
        let body = ClaimChipsRequest {
            session_id: session_id.to_string(),
        };
        self.post("/api/player/chips", &body).await
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<PlayerRecord, IdentityError> {
        let url = format!("{}{}", self.base, path);
        debug!(%url, "identity request");
        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<PlayerRecord>().await?);
        }
        let text = response.text().await?;
        let message = serde_json::from_str::<ApiError>(&text)
            .map(|e| e.error)
            .unwrap_or_else(|_| format!("identity service answered {}", status));
        Err(IdentityError::Rejected(message))
    }
}
