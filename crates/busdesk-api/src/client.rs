//! HTTP client for the busdesk REST API.
//!
//! Wraps `reqwest` with bearer-token handling and envelope checking. Every
//! response is read as JSON; a non-2xx status or `"success": false` becomes
//! [`ApiError::Api`] carrying the server's own message. There is no retry:
//! a failed call is reported and the user re-triggers it.

use std::sync::RwLock;
use std::time::Duration;

use busdesk_core::{AppConfig, PendingFile};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};

use crate::error::ApiError;
use crate::types::{extract_message, AgencyMe};

const GENERIC_FAILURE: &str = "An unexpected error occurred";

/// Client for the busdesk REST API.
///
/// The bearer token sits behind a lock because a successful agency creation
/// replaces it while the client is shared by reference.
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token().map(|_| "[redacted]"))
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the `reqwest::Client` cannot be built or
    /// [`ApiError::InvalidUrl`] if the base URL does not parse.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let client = Self::with_base_url(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        if let Some(token) = &config.api_token {
            client.set_token(Some(token.clone()));
        }
        Ok(client)
    }

    /// Creates a client with an explicit base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the `reqwest::Client` cannot be built or
    /// [`ApiError::InvalidUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so relative joins append to the path
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            token: RwLock::new(None),
        })
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .map_or_else(|poisoned| poisoned.into_inner().clone(), |t| t.clone())
    }

    pub fn set_token(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut slot) => *slot = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl {
                url: path.to_string(),
                reason: e.to_string(),
            })
    }

    pub(crate) fn request(&self, method: reqwest::Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and returns the envelope's `data` (or `null`).
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure or timeout.
    /// - [`ApiError::Api`] on a non-2xx status or `"success": false`, with the
    ///   message taken from `error`, then `message`, then a generic fallback.
    /// - [`ApiError::Deserialize`] if a 2xx body is not JSON.
    pub(crate) async fn send(
        &self,
        builder: RequestBuilder,
        context: &str,
    ) -> Result<serde_json::Value, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        tracing::debug!(%status, context, "api response");

        if !status.is_success() {
            let body: serde_json::Value =
                serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);
            let message = extract_message(&body, GENERIC_FAILURE);
            tracing::warn!(%status, context, %message, "api call failed");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        let body: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| ApiError::Deserialize {
                context: context.to_string(),
                source: e,
            })?;
        if body.get("success").and_then(serde_json::Value::as_bool) == Some(false) {
            let message = extract_message(&body, GENERIC_FAILURE);
            tracing::warn!(%status, context, %message, "api reported failure");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(body.get("data").cloned().unwrap_or(serde_json::Value::Null))
    }

    /// Fetches the signed-in user's agency with its completion flags.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Api`] / [`ApiError::Http`] as for any call.
    /// - [`ApiError::Deserialize`] if `data` does not match [`AgencyMe`].
    pub async fn get_my_agency(&self) -> Result<AgencyMe, ApiError> {
        let url = self.endpoint("agency/me")?;
        let data = self
            .send(self.request(reqwest::Method::GET, url), "GET /agency/me")
            .await?;
        serde_json::from_value(data).map_err(|e| ApiError::Deserialize {
            context: "GET /agency/me".to_string(),
            source: e,
        })
    }

    /// Publishes an agency once every requirement is completed.
    ///
    /// # Errors
    ///
    /// [`ApiError::Api`] / [`ApiError::Http`] as for any call.
    pub async fn publish_agency(&self, agency_id: &str) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint(&format!("agency/{agency_id}/publish"))?;
        tracing::info!(agency_id, "publishing agency");
        self.send(self.request(reqwest::Method::PUT, url), "PUT /agency/:id/publish")
            .await
    }

    /// Uploads a bus import file that already passed local validation.
    ///
    /// # Errors
    ///
    /// [`ApiError::Api`] / [`ApiError::Http`] as for any call.
    pub async fn import_buses(&self, file: &PendingFile) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint("buses/import")?;
        let form = Form::new().part("file", file_part(file)?);
        tracing::info!(file = %file.file_name, bytes = file.len(), "uploading bus import");
        self.send(
            self.request(reqwest::Method::POST, url).multipart(form),
            "POST /buses/import",
        )
        .await
    }
}

/// Multipart part for an in-memory file.
pub(crate) fn file_part(file: &PendingFile) -> Result<Part, ApiError> {
    Ok(Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(&file.content_type)?)
}
