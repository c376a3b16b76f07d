use async_trait::async_trait;
use eca_application::SessionSource;
use eca_core::{AppResult, SessionTokens, UserSession};
use serde::Deserialize;
use tracing::info;

use crate::eca_api_client::EcaApiClient;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentUserResponse {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    signum: String,
    #[serde(default)]
    user_type: String,
    #[serde(default, alias = "userRoles")]
    roles: Vec<String>,
}

/// Session source reading the current user profile over HTTP.
#[derive(Clone)]
pub struct HttpSessionSource {
    client: EcaApiClient,
    session_path: String,
}

impl HttpSessionSource {
    /// Creates a source reading the profile from `session_path`.
    #[must_use]
    pub fn new(client: EcaApiClient, session_path: impl Into<String>) -> Self {
        Self {
            client,
            session_path: session_path.into(),
        }
    }
}

#[async_trait]
impl SessionSource for HttpSessionSource {
    async fn fetch_current_session(&self, tokens: &SessionTokens) -> AppResult<UserSession> {
        let client = self.client.with_access_token(tokens.access_token());
        let url = client.endpoint(self.session_path.as_str())?;
        let profile: CurrentUserResponse = client.get_json(url).await?;

        info!(
            signum = %profile.signum,
            roles = profile.roles.len(),
            "loaded current user session"
        );

        Ok(UserSession::new(
            profile.name,
            profile.email,
            profile.signum,
            profile.user_type,
            profile.roles,
            tokens.clone(),
        ))
    }
}
