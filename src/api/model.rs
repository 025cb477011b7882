//! Wire models shared by every polymorphic resource family.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fields::Field;

/// The common wrapper every polymorphic server resource shares.
///
/// Family-specific flat flags (enable, priority, onGrab, …) and anything
/// the server adds in future versions land in the flattened `flags` map
/// and round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Envelope {
    /// Server-assigned id; 0 means unsaved.
    pub id: i64,
    /// User-unique label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Variant tag, server-defined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation: Option<String>,
    /// Settings-schema tag, server-defined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_contract: Option<String>,
    /// Download protocol, where the family has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Tag resource ids.
    pub tags: Vec<i64>,
    /// Variant-specific settings.
    pub fields: Vec<Field>,
    /// Family-level flat flags, camelCase keys.
    #[serde(flatten)]
    pub flags: Map<String, Value>,
}

/// A custom format: a named bundle of condition specifications.
///
/// Each specification is itself an envelope-shaped object: an
/// implementation tag, a fields list, and flat flags (negate, required).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomFormat {
    /// Server-assigned id; 0 means unsaved.
    pub id: i64,
    /// Unique format name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Apply the format name during renames.
    pub include_custom_format_when_renaming: bool,
    /// The condition specifications making up this format.
    pub specifications: Vec<Envelope>,
}

/// The tag resource the envelope's `tags` attribute references.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Tag {
    /// Server-assigned id; 0 means unsaved.
    #[serde(default)]
    pub id: i64,
    /// Unique label.
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_round_trips_flat_flags() {
        let wire = json!({
            "id": 7,
            "name": "c1",
            "implementation": "Aria2",
            "configContract": "Aria2Settings",
            "protocol": "torrent",
            "tags": [1, 2],
            "enable": true,
            "priority": 1,
            "fields": [{"name": "host", "value": "h"}]
        });
        let envelope: Envelope = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(envelope.id, 7);
        assert_eq!(envelope.config_contract.as_deref(), Some("Aria2Settings"));
        assert_eq!(envelope.flags.get("enable"), Some(&json!(true)));
        assert_eq!(envelope.flags.get("priority"), Some(&json!(1)));
        assert_eq!(serde_json::to_value(&envelope).unwrap(), wire);
    }

    #[test]
    fn test_envelope_tolerates_missing_optional_slots() {
        let envelope: Envelope = serde_json::from_value(json!({"id": 3})).unwrap();
        assert_eq!(envelope.protocol, None);
        assert!(envelope.tags.is_empty());
        assert!(envelope.fields.is_empty());
    }
}
