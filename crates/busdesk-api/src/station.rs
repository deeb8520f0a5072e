//! Station creation against `POST /stations` and manager assignment.

use async_trait::async_trait;
use busdesk_core::{CompletionStatus, StationDraft};
use busdesk_wizard::{RemoteSync, SubmitReceipt, SyncError, SyncResult};
use reqwest::multipart::Form;
use reqwest::Method;

use crate::client::{file_part, ApiClient};
use crate::error::ApiError;
use crate::types::extract_id;

fn json_field<T: serde::Serialize + ?Sized>(name: &str, value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Encode {
        context: format!("station field {name}"),
        source: e,
    })
}

/// Multipart body for `POST /stations`.
///
/// Scalars go as plain text, structured values as JSON strings, and every
/// pending image as a repeated `images` file part.
pub(crate) fn station_form(draft: &StationDraft) -> Result<Form, ApiError> {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    let mut form = Form::new()
        .text("name", text(&draft.name))
        .text("neighborhood", text(&draft.neighborhood))
        .text("baseTown", text(&draft.base_town))
        .text("address", text(&draft.address))
        .text("destinations", json_field("destinations", &draft.destinations)?)
        .text("paymentMethods", json_field("paymentMethods", &draft.payment_methods)?)
        .text("contactInfo", json_field("contactInfo", &draft.contacts)?);

    if let Some(description) = &draft.description {
        form = form.text("description", description.clone());
    }
    if let Some(coordinates) = &draft.coordinates {
        form = form.text("coordinates", json_field("coordinates", coordinates)?);
    }
    for image in &draft.images {
        form = form.part("images", file_part(image)?);
    }
    Ok(form)
}

impl ApiClient {
    /// Creates a station from a complete draft.
    ///
    /// # Errors
    ///
    /// [`ApiError::Api`] / [`ApiError::Http`] as for any call.
    pub async fn create_station(&self, draft: &StationDraft) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint("stations")?;
        let form = station_form(draft)?;
        tracing::info!(
            name = draft.name.as_deref().unwrap_or(""),
            images = draft.images.len(),
            "creating station"
        );
        self.send(self.request(Method::POST, url).multipart(form), "POST /stations")
            .await
    }

    /// Assigns a manager, by email, to an existing station.
    ///
    /// # Errors
    ///
    /// [`ApiError::Api`] / [`ApiError::Http`] as for any call.
    pub async fn assign_station_manager(
        &self,
        station_id: &str,
        email: &str,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint(&format!("stations/{station_id}/manager"))?;
        let body = serde_json::json!({ "email": email.trim() });
        self.send(
            self.request(Method::PUT, url).json(&body),
            "PUT /stations/:id/manager",
        )
        .await
    }
}

#[async_trait]
impl RemoteSync<StationDraft> for ApiClient {
    async fn submit(&self, draft: &StationDraft) -> SyncResult<SubmitReceipt> {
        let data = self.create_station(draft).await?;
        Ok(SubmitReceipt {
            entity_id: extract_id(&data),
            token: None,
            data,
        })
    }

    async fn fetch_status(&self) -> SyncResult<CompletionStatus> {
        Ok(self.get_my_agency().await?.completion_steps)
    }

    async fn finalize(&self, receipt: &SubmitReceipt, draft: &StationDraft) -> SyncResult<()> {
        let Some(email) = draft.manager_email.as_deref() else {
            return Ok(());
        };
        let station_id = receipt
            .entity_id
            .as_deref()
            .ok_or_else(|| SyncError::new("The server did not return the new station's id"))?;
        self.assign_station_manager(station_id, email).await?;
        tracing::info!(station_id, "station manager assigned");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use busdesk_core::{ContactEntry, ContactKind, Coordinates, PendingFile};

    use super::*;

    #[test]
    fn form_builds_with_images_and_coordinates() {
        let draft = StationDraft {
            name: Some("Mvan".into()),
            base_town: Some("Yaoundé".into()),
            coordinates: Some(Coordinates::new(3.82, 11.52)),
            contacts: vec![ContactEntry::new(ContactKind::Tel, "677000000")],
            images: vec![PendingFile::new("front.png", vec![1, 2, 3])],
            ..StationDraft::default()
        };
        let form = station_form(&draft).unwrap();
        assert!(!form.boundary().is_empty());
    }

    #[test]
    fn json_field_encodes_arrays() {
        let encoded = json_field("destinations", &vec!["Douala".to_string()]).unwrap();
        assert_eq!(encoded, r#"["Douala"]"#);
    }
}
