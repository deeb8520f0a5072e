//! Wire types for the busdesk REST API.
//!
//! Every endpoint answers with a `{"success": bool, "data": ..., "message": ...}`
//! envelope; failures may carry `error` and/or `message`.

use busdesk_core::{AgencyProfile, CompletionStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload of `GET /agency/me`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyMe {
    pub agency: AgencyProfile,
    #[serde(default)]
    pub completion_steps: CompletionStatus,
    #[serde(default)]
    pub is_publishable: bool,
}

/// Snapshot stored under the `myAgency` cache key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedProfile {
    pub agency: AgencyProfile,
    pub fetched_at: DateTime<Utc>,
}

/// Pull the first usable message out of an error body: `error`, then
/// `message`, then `fallback`.
#[must_use]
pub fn extract_message(body: &serde_json::Value, fallback: &str) -> String {
    let as_text = |v: &serde_json::Value| -> Option<String> {
        match v {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Object(map) => map
                .get("message")
                .and_then(serde_json::Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string),
            _ => None,
        }
    };
    body.get("error")
        .and_then(as_text)
        .or_else(|| body.get("message").and_then(as_text))
        .unwrap_or_else(|| fallback.to_string())
}

/// Pull an entity id out of a `data` payload (`id`, `_id`, or nested `agency.id`/`station.id`).
#[must_use]
pub fn extract_id(data: &serde_json::Value) -> Option<String> {
    let id_of = |v: &serde_json::Value| -> Option<String> {
        let raw = v.get("id").or_else(|| v.get("_id"))?;
        match raw {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    };
    id_of(data)
        .or_else(|| data.get("agency").and_then(id_of))
        .or_else(|| data.get("station").and_then(id_of))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn error_field_wins_over_message() {
        let body = json!({"success": false, "error": "Invalid token", "message": "Unauthorized"});
        assert_eq!(extract_message(&body, "fallback"), "Invalid token");
    }

    #[test]
    fn message_used_when_error_missing() {
        let body = json!({"success": false, "message": "Station exists"});
        assert_eq!(extract_message(&body, "fallback"), "Station exists");
    }

    #[test]
    fn nested_error_object_message() {
        let body = json!({"error": {"message": "Bad coordinates"}});
        assert_eq!(extract_message(&body, "fallback"), "Bad coordinates");
    }

    #[test]
    fn fallback_when_nothing_usable() {
        assert_eq!(extract_message(&json!({"error": ""}), "fallback"), "fallback");
        assert_eq!(extract_message(&json!(null), "fallback"), "fallback");
    }

    #[test]
    fn extract_id_variants() {
        assert_eq!(extract_id(&json!({"id": 7})).as_deref(), Some("7"));
        assert_eq!(extract_id(&json!({"_id": "abc"})).as_deref(), Some("abc"));
        assert_eq!(
            extract_id(&json!({"agency": {"id": "ag-1"}, "token": "t"})).as_deref(),
            Some("ag-1")
        );
        assert_eq!(extract_id(&json!({"ok": true})), None);
    }

    #[test]
    fn agency_me_defaults_missing_flags() {
        let me: AgencyMe =
            serde_json::from_value(json!({"agency": {"id": 1, "name": "Acme"}})).unwrap();
        assert!(me.completion_steps.is_empty());
        assert!(!me.is_publishable);
    }
}
