use serde::{Deserialize, Deserializer, Serialize};

use crate::contact::{ContactEntry, Coordinates};

/// The agency record as returned by `GET /agency/me`.
///
/// This is also the snapshot persisted in the `myAgency` cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyProfile {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub head_address: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub towns: Vec<String>,
    #[serde(default)]
    pub contact_info: Vec<ContactEntry>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Accept both numeric and string primary keys.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}
