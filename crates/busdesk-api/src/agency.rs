//! Agency creation, profile update and publication.

use async_trait::async_trait;
use busdesk_core::{AgencyDraft, CompletionStatus};
use busdesk_wizard::{RemoteSync, SubmitReceipt, SyncResult};
use reqwest::multipart::Form;
use reqwest::Method;

use crate::client::{file_part, ApiClient};
use crate::error::ApiError;
use crate::types::extract_id;

/// Multipart variant of the agency body, used when a logo is attached.
fn agency_form(draft: &AgencyDraft) -> Result<Form, ApiError> {
    let value = serde_json::to_value(draft).map_err(|e| ApiError::Encode {
        context: "agency draft".to_string(),
        source: e,
    })?;
    let mut form = Form::new();
    if let serde_json::Value::Object(fields) = value {
        for (key, field) in fields {
            let text = match field {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            form = form.text(key, text);
        }
    }
    for image in &draft.images {
        form = form.part("logo", file_part(image)?);
    }
    Ok(form)
}

impl ApiClient {
    /// Creates the signed-in user's agency.
    ///
    /// The first creation logs the user in as an agency owner: when the
    /// response carries `data.token` it replaces the client's bearer token.
    ///
    /// # Errors
    ///
    /// [`ApiError::Api`] / [`ApiError::Http`] as for any call.
    pub async fn create_agency(&self, draft: &AgencyDraft) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint("agency")?;
        let builder = if draft.images.is_empty() {
            self.request(Method::POST, url).json(draft)
        } else {
            self.request(Method::POST, url).multipart(agency_form(draft)?)
        };
        let data = self.send(builder, "POST /agency").await?;

        if let Some(token) = data.get("token").and_then(serde_json::Value::as_str) {
            tracing::info!("agency created; bearer token replaced");
            self.set_token(Some(token.to_string()));
        }
        Ok(data)
    }

    /// Updates the existing agency profile.
    ///
    /// # Errors
    ///
    /// [`ApiError::Api`] / [`ApiError::Http`] as for any call.
    pub async fn update_profile(&self, draft: &AgencyDraft) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint("profile")?;
        self.send(self.request(Method::PUT, url).json(draft), "PUT /profile")
            .await
    }
}

#[async_trait]
impl RemoteSync<AgencyDraft> for ApiClient {
    async fn submit(&self, draft: &AgencyDraft) -> SyncResult<SubmitReceipt> {
        let data = self.create_agency(draft).await?;
        Ok(SubmitReceipt {
            entity_id: extract_id(&data),
            token: data
                .get("token")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
            data,
        })
    }

    /// The agency already exists server-side, so its profile is updated.
    async fn update(&self, draft: &AgencyDraft) -> SyncResult<SubmitReceipt> {
        let data = self.update_profile(draft).await?;
        Ok(SubmitReceipt {
            entity_id: extract_id(&data),
            token: None,
            data,
        })
    }

    async fn fetch_status(&self) -> SyncResult<CompletionStatus> {
        Ok(self.get_my_agency().await?.completion_steps)
    }
}
