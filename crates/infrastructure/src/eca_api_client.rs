use eca_core::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

/// Thin JSON client for the ECA backend.
#[derive(Clone)]
pub struct EcaApiClient {
    http_client: reqwest::Client,
    base_url: Url,
    access_token: Option<String>,
}

impl EcaApiClient {
    /// Creates a client rooted at `base_url`.
    ///
    /// The base URL is treated as a directory, so relative paths append to it.
    pub fn new(
        http_client: reqwest::Client,
        base_url: &str,
        access_token: Option<String>,
    ) -> AppResult<Self> {
        let trimmed = base_url.trim();
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_owned()
        } else {
            format!("{trimmed}/")
        };
        let base_url = Url::parse(normalized.as_str()).map_err(|error| {
            AppError::Validation(format!("invalid ECA API base URL '{trimmed}': {error}"))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "ECA API base URL must use http or https, got '{trimmed}'"
            )));
        }

        Ok(Self {
            http_client,
            base_url,
            access_token: access_token.filter(|token| !token.trim().is_empty()),
        })
    }

    /// Returns a copy of this client that authenticates with `access_token`.
    #[must_use]
    pub fn with_access_token(&self, access_token: &str) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            access_token: Some(access_token.to_owned()).filter(|token| !token.trim().is_empty()),
        }
    }

    /// Returns the normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` against the base URL.
    pub fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|error| AppError::Internal(format!("invalid endpoint path '{path}': {error}")))
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    pub fn endpoint_segments(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        let cannot_take_path = || {
            AppError::Internal(format!("ECA API base URL '{}' cannot take a path", self.base_url))
        };
        url.path_segments_mut()
            .map_err(|()| cannot_take_path())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends `GET url` and decodes the JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> AppResult<T> {
        let request = self.authorize(self.http_client.get(url.clone()));
        self.execute(request, &url).await
    }

    /// Sends `POST url` with a JSON body and decodes the JSON response.
    pub async fn post_json<T: DeserializeOwned>(&self, url: Url, body: &Value) -> AppResult<T> {
        let request = self.authorize(self.http_client.post(url.clone()).json(body));
        self.execute(request, &url).await
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> AppResult<T> {
        let response = request.send().await.map_err(|error| {
            warn!(path = url.path(), error = %error, "ECA API request failed in transport");
            AppError::Unavailable(format!("ECA API request to '{}' failed: {error}", url.path()))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<response body unavailable>".to_owned());
            warn!(
                path = url.path(),
                status = status.as_u16(),
                "ECA API request returned an error status"
            );
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message: error_message(body.as_str(), status),
            });
        }

        let bytes = response.bytes().await.map_err(|error| {
            AppError::Unavailable(format!(
                "failed to read ECA API response from '{}': {error}",
                url.path()
            ))
        })?;
        debug!(path = url.path(), bytes = bytes.len(), "ECA API request succeeded");

        serde_json::from_slice(&bytes).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode ECA API response from '{}': {error}",
                url.path()
            ))
        })
    }
}

/// Prefers the backend's `message` field over the raw body.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.trim().to_owned());

    if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_owned()
    } else {
        message
    }
}
