//! Workflow records and payload sanitization
//!
//! A [`Workflow`] wraps the free-form JSON document n8n uses for workflow
//! definitions. Only the minimal shape is validated (name, nodes,
//! connections); everything else is carried through untouched so exported
//! workflows round-trip without the client needing to understand every field.

mod files;

pub use files::{list_workflow_files, read_workflow_file};

use eyre::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields the n8n API rejects on workflow creation.
const IMPORT_DROPPED_FIELDS: [&str; 6] = ["id", "active", "pinData", "meta", "tags", "versionId"];

/// Fields the n8n API rejects on workflow update. The `id` stays.
const UPDATE_DROPPED_FIELDS: [&str; 5] = ["active", "pinData", "meta", "tags", "versionId"];

/// A single n8n workflow definition.
///
/// Holds the full JSON object as parsed, with key order preserved. The
/// constructor enforces the minimal shape this client relies on:
/// - `name` is a string
/// - `nodes` is an array
/// - `connections` is an object
/// - `id`, when present, is a string
///
/// Deeper structural problems (dangling connection targets, unknown node
/// types) are the server's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Workflow {
    fields: Map<String, Value>,
}

impl Workflow {
    /// Remote-assigned workflow ID, if the record has one.
    ///
    /// Workflows exported from n8n may not carry an ID.
    pub fn id(&self) -> Option<&str> {
        self.fields.get("id").and_then(Value::as_str)
    }

    /// Workflow name. Guaranteed present by construction.
    pub fn name(&self) -> &str {
        self.fields
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Activation flag, if the record has one.
    pub fn active(&self) -> Option<bool> {
        self.fields.get("active").and_then(Value::as_bool)
    }

    /// Payload for `POST /api/v1/workflows`.
    ///
    /// Drops the fields the create endpoint rejects: `id`, `active`,
    /// `pinData`, `meta`, `tags` and `versionId`. The source record is
    /// left untouched.
    pub fn sanitized_for_import(&self) -> Value {
        self.sanitized_without(&IMPORT_DROPPED_FIELDS)
    }

    /// Payload for `PUT /api/v1/workflows/{id}`.
    ///
    /// Same field set as [`Self::sanitized_for_import`] except `id`,
    /// which the update endpoint accepts.
    pub fn sanitized_for_update(&self) -> Value {
        self.sanitized_without(&UPDATE_DROPPED_FIELDS)
    }

    fn sanitized_without(&self, dropped: &[&str]) -> Value {
        let mut fields = self.fields.clone();
        for key in dropped {
            // shift_remove keeps the remaining keys in document order
            fields.shift_remove(*key);
        }
        Value::Object(fields)
    }

    /// Consume the record, returning the underlying JSON document.
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl TryFrom<Value> for Workflow {
    type Error = eyre::Report;

    fn try_from(value: Value) -> Result<Self> {
        let Value::Object(fields) = value else {
            eyre::bail!("workflow must be a JSON object");
        };

        if !matches!(fields.get("name"), Some(Value::String(_))) {
            eyre::bail!("workflow 'name' must be a string");
        }
        if !matches!(fields.get("nodes"), Some(Value::Array(_))) {
            eyre::bail!("workflow 'nodes' must be an array");
        }
        if !matches!(fields.get("connections"), Some(Value::Object(_))) {
            eyre::bail!("workflow 'connections' must be an object");
        }
        match fields.get("id") {
            None | Some(Value::String(_)) => {}
            Some(_) => eyre::bail!("workflow 'id' must be a string"),
        }

        Ok(Self { fields })
    }
}

impl From<Workflow> for Value {
    fn from(workflow: Workflow) -> Self {
        workflow.into_value()
    }
}

impl std::fmt::Display for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.id() {
            Some(id) => write!(f, "{} (id: {})", self.name(), id),
            None => write!(f, "{}", self.name()),
        }
    }
}

/// Reject empty or whitespace-only identifiers before they hit the API.
pub fn ensure_non_blank(value: &str, label: &str) -> Result<()> {
    if value.trim().is_empty() {
        eyre::bail!("{} must be a non-empty string", label);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_workflow() -> Value {
        json!({
            "id": "wf-123",
            "name": "Text Summarizer",
            "active": true,
            "nodes": [
                {
                    "id": "node-1",
                    "name": "Webhook",
                    "type": "n8n-nodes-base.webhook",
                    "typeVersion": 2,
                    "position": [260, 300],
                    "parameters": { "path": "summarize" }
                }
            ],
            "connections": {
                "Webhook": { "main": [[{ "node": "Respond", "type": "main", "index": 0 }]] }
            },
            "settings": { "executionOrder": "v1" },
            "pinData": { "Webhook": [] },
            "meta": { "instanceId": "abc" },
            "tags": [{ "name": "demo" }],
            "versionId": "v-1"
        })
    }

    #[test]
    fn test_valid_workflow_shape() {
        let workflow = Workflow::try_from(sample_workflow()).unwrap();
        assert_eq!(workflow.id(), Some("wf-123"));
        assert_eq!(workflow.name(), "Text Summarizer");
        assert_eq!(workflow.active(), Some(true));
    }

    #[test]
    fn test_id_is_optional() {
        let mut value = sample_workflow();
        value.as_object_mut().unwrap().remove("id");
        let workflow = Workflow::try_from(value).unwrap();
        assert_eq!(workflow.id(), None);
    }

    #[test]
    fn test_rejects_missing_name() {
        let mut value = sample_workflow();
        value.as_object_mut().unwrap().remove("name");
        let err = Workflow::try_from(value).unwrap_err();
        assert!(err.to_string().contains("'name'"));
    }

    #[test]
    fn test_rejects_non_array_nodes() {
        let mut value = sample_workflow();
        value["nodes"] = json!("not-an-array");
        assert!(Workflow::try_from(value).is_err());
    }

    #[test]
    fn test_rejects_non_object_connections() {
        let mut value = sample_workflow();
        value["connections"] = json!([]);
        assert!(Workflow::try_from(value).is_err());
    }

    #[test]
    fn test_rejects_non_string_id() {
        let mut value = sample_workflow();
        value["id"] = json!(42);
        assert!(Workflow::try_from(value).is_err());
    }

    #[test]
    fn test_sanitized_for_import_drops_server_fields() {
        let workflow = Workflow::try_from(sample_workflow()).unwrap();
        let payload = workflow.sanitized_for_import();
        let payload = payload.as_object().unwrap();

        for key in IMPORT_DROPPED_FIELDS {
            assert!(!payload.contains_key(key), "import payload kept '{}'", key);
        }
        assert_eq!(payload["name"], "Text Summarizer");
        assert!(payload.contains_key("nodes"));
        assert!(payload.contains_key("connections"));
        assert!(payload.contains_key("settings"));
    }

    #[test]
    fn test_sanitized_for_update_keeps_id() {
        let workflow = Workflow::try_from(sample_workflow()).unwrap();
        let payload = workflow.sanitized_for_update();
        let payload = payload.as_object().unwrap();

        for key in UPDATE_DROPPED_FIELDS {
            assert!(!payload.contains_key(key), "update payload kept '{}'", key);
        }
        assert_eq!(payload["id"], "wf-123");
    }

    #[test]
    fn test_sanitizers_do_not_mutate_source() {
        let workflow = Workflow::try_from(sample_workflow()).unwrap();
        let _ = workflow.sanitized_for_import();
        let _ = workflow.sanitized_for_update();
        assert_eq!(workflow.into_value(), sample_workflow());
    }

    #[test]
    fn test_round_trip_preserves_unknown_fields() {
        let mut value = sample_workflow();
        value["staticData"] = json!({ "lastRun": "2024-01-01" });
        value["customVendorField"] = json!({ "nested": [1, 2, 3] });

        let workflow = Workflow::try_from(value.clone()).unwrap();
        assert_eq!(workflow.into_value(), value);
    }

    #[test]
    fn test_ensure_non_blank() {
        assert!(ensure_non_blank("wf-123", "Workflow ID").is_ok());
        let err = ensure_non_blank("   ", "Workflow ID").unwrap_err();
        assert!(err.to_string().contains("Workflow ID"));
        assert!(ensure_non_blank("", "Workflow name").is_err());
    }
}
