//! Authentication and identity
//!
//! Sign-in goes to the hosted auth endpoint; the resulting [`Session`]
//! carries the user id, access token and profile. Booking code only reads
//! the session.

use http::StatusCode;
use reqwest::Client;
use serde::Deserialize;
use shared::{Profile, TableQuery};
use uuid::Uuid;

use crate::backend::{self, TableClient};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Signed-in user
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub access_token: String,
    pub profile: Option<Profile>,
}

impl Session {
    pub fn new(user_id: Uuid, access_token: impl Into<String>) -> Self {
        Self {
            user_id,
            email: None,
            access_token: access_token.into(),
            profile: None,
        }
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn is_admin(&self) -> bool {
        self.profile.as_ref().is_some_and(Profile::is_admin)
    }

    /// First name for the navigation bar, "Profile" when unknown
    pub fn short_name(&self) -> &str {
        self.profile
            .as_ref()
            .and_then(|p| p.first_name.as_deref())
            .filter(|n| !n.is_empty())
            .unwrap_or("Profile")
    }

    /// Full name for greetings
    pub fn display_name(&self) -> String {
        self.profile
            .as_ref()
            .map(Profile::full_name)
            .filter(|n| !n.is_empty())
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| "Profile".to_string())
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Deserialize)]
struct AuthUser {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct AuthErrorResponse {
    #[serde(default, alias = "error_description", alias = "msg")]
    message: Option<String>,
}

/// Client for the hosted auth endpoint
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl AuthClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            anon_key: config.anon_key.clone(),
        })
    }

    /// Email + password sign-in
    pub async fn sign_in(&self, email: &str, password: &str) -> ClientResult<Session> {
        let url = format!("{}/auth/v1/token", self.base_url);
        let response = self
            .client
            .post(&url)
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            let message = serde_json::from_str::<AuthErrorResponse>(&text)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or(text);
            return Err(match status {
                StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                    ClientError::Unauthorized(message)
                }
                _ => ClientError::Internal(format!("{status}: {message}")),
            });
        }

        let token: TokenResponse = response.json().await?;
        tracing::info!(user_id = %token.user.id, "Signed in");
        Ok(Session {
            user_id: token.user.id,
            email: token.user.email,
            access_token: token.access_token,
            profile: None,
        })
    }

    /// End the session on the auth server
    pub async fn sign_out(&self, session: &Session) -> ClientResult<()> {
        let url = format!("{}/auth/v1/logout", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await?;
            return Err(ClientError::Internal(text));
        }
        tracing::info!(user_id = %session.user_id, "Signed out");
        Ok(())
    }
}

/// Read the profile row of a user; `None` when the user has none
pub async fn load_profile(
    backend: &dyn TableClient,
    user_id: Uuid,
) -> ClientResult<Option<Profile>> {
    let query = TableQuery::all("profiles").eq("id", user_id);
    match backend::select_single::<Profile>(backend, &query).await {
        Ok(profile) => Ok(Some(profile)),
        Err(ClientError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
