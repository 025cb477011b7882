//! The envelope adapter: records to and from the common wrapper object.
//!
//! Gathers the envelope-level slots (id, name, variant tags, tags,
//! family flat flags) and delegates the settings list to the field codec.
//! The server's variant tags are round-tripped unchanged; upper layers
//! stamp them from the variant descriptor before encoding.

use serde_json::Value;

use crate::api::model::Envelope;
use crate::fields::{self, snake_case};
use crate::plugin::schema::Diagnostic;
use crate::value::{AttrValue, Kind, Record};
use crate::variants::FamilySpec;

/// Gather a record into a wire envelope.
///
/// A nonzero `id` on the record is preserved (the Update path); an unset
/// or zero id leaves the envelope unsaved and the server assigns one on
/// Create. Unset and null attributes are omitted throughout.
pub fn to_wire(record: &Record, family: &FamilySpec) -> Envelope {
    let mut envelope = Envelope::default();
    if let Some(id) = record.get("id").and_then(AttrValue::as_int) {
        envelope.id = id;
    }
    envelope.name = record.get("name").and_then(AttrValue::as_str).map(String::from);
    envelope.implementation = record
        .get("implementation")
        .and_then(AttrValue::as_str)
        .map(String::from);
    envelope.config_contract = record
        .get("config_contract")
        .and_then(AttrValue::as_str)
        .map(String::from);
    envelope.protocol = record
        .get("protocol")
        .and_then(AttrValue::as_str)
        .map(String::from);
    envelope.tags = record
        .get("tags")
        .and_then(AttrValue::as_int_set)
        .map(<[i64]>::to_vec)
        .unwrap_or_default();

    for &wire in family.flat_bools {
        if let Some(AttrValue::Bool(b)) = record.get(&snake_case(wire)) {
            envelope.flags.insert(wire.to_string(), Value::Bool(*b));
        }
    }
    for &wire in family.flat_ints {
        if let Some(AttrValue::Int(i)) = record.get(&snake_case(wire)) {
            envelope.flags.insert(wire.to_string(), Value::from(*i));
        }
    }

    envelope.fields = fields::encode(record, &family.fields);
    envelope
}

/// Scatter a wire envelope onto a record.
///
/// The server's `implementation` and `configContract` are trusted and
/// echoed back unchanged so the orchestrator sees them as known after
/// apply. `tags` always materializes, so an empty tag set stays an empty
/// set rather than going unset.
pub fn from_wire(envelope: &Envelope, family: &FamilySpec) -> (Record, Vec<Diagnostic>) {
    let mut record = Record::new();
    let mut diagnostics = Vec::new();

    record.set("id", AttrValue::Int(envelope.id));
    if let Some(name) = &envelope.name {
        record.set("name", AttrValue::Str(name.clone()));
    }
    if let Some(implementation) = &envelope.implementation {
        record.set("implementation", AttrValue::Str(implementation.clone()));
    }
    if let Some(contract) = &envelope.config_contract {
        record.set("config_contract", AttrValue::Str(contract.clone()));
    }
    if let Some(protocol) = &envelope.protocol {
        record.set("protocol", AttrValue::Str(protocol.clone()));
    }
    record.set("tags", AttrValue::int_set(envelope.tags.clone()));

    for (kind, names) in [
        (Kind::Bool, family.flat_bools),
        (Kind::Int, family.flat_ints),
    ] {
        for &wire in names {
            let Some(raw) = envelope.flags.get(wire) else { continue };
            if raw.is_null() {
                continue;
            }
            match AttrValue::from_wire(kind, raw) {
                Ok(value) => record.set(snake_case(wire), value),
                Err(cause) => diagnostics.push(
                    Diagnostic::warning(format!("Ignored envelope flag '{}'", wire))
                        .with_detail(cause)
                        .with_attribute(snake_case(wire)),
                ),
            }
        }
    }

    diagnostics.extend(fields::decode(&envelope.fields, &family.fields, &mut record));
    (record, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variants::Family;
    use serde_json::json;

    fn client_record() -> Record {
        let mut record = Record::new();
        record.set("name", AttrValue::Str("c1".into()));
        record.set("implementation", AttrValue::Str("Aria2".into()));
        record.set("config_contract", AttrValue::Str("Aria2Settings".into()));
        record.set("protocol", AttrValue::Str("torrent".into()));
        record.set("enable", AttrValue::Bool(true));
        record.set("priority", AttrValue::Int(1));
        record.set("host", AttrValue::Str("h".into()));
        record.set("port", AttrValue::Int(6800));
        record
    }

    #[test]
    fn test_to_wire_unsaved_record_has_zero_id() {
        let envelope = to_wire(&client_record(), Family::DownloadClient.spec());
        assert_eq!(envelope.id, 0);
        assert_eq!(envelope.implementation.as_deref(), Some("Aria2"));
        assert_eq!(envelope.flags.get("enable"), Some(&json!(true)));
        assert_eq!(envelope.flags.get("priority"), Some(&json!(1)));
        assert!(envelope.fields.iter().any(|f| f.name == "host"));
    }

    #[test]
    fn test_to_wire_preserves_existing_id() {
        let mut record = client_record();
        record.set("id", AttrValue::Int(7));
        let envelope = to_wire(&record, Family::DownloadClient.spec());
        assert_eq!(envelope.id, 7);
    }

    #[test]
    fn test_tags_live_on_envelope_not_in_fields() {
        let mut record = client_record();
        record.set("tags", AttrValue::int_set(vec![3, 1]));
        let envelope = to_wire(&record, Family::DownloadClient.spec());
        assert_eq!(envelope.tags, vec![1, 3]);
        assert!(!envelope.fields.iter().any(|f| f.name == "tags"));
    }

    #[test]
    fn test_from_wire_round_trip_and_empty_tags() {
        let mut record = client_record();
        record.set("id", AttrValue::Int(7));
        let family = Family::DownloadClient.spec();
        let (back, diagnostics) = from_wire(&to_wire(&record, family), family);
        assert!(diagnostics.is_empty());
        assert_eq!(back.get("host"), record.get("host"));
        assert_eq!(back.get("enable"), record.get("enable"));
        assert_eq!(back.get("implementation"), record.get("implementation"));
        // an absent tag list decodes as the empty set, not as unset
        assert_eq!(back.get("tags"), Some(&AttrValue::IntSet(vec![])));
    }

    #[test]
    fn test_from_wire_bad_flag_is_diagnostic() {
        let family = Family::DownloadClient.spec();
        let mut envelope = to_wire(&client_record(), family);
        envelope
            .flags
            .insert("priority".into(), json!("not a number"));
        let (record, diagnostics) = from_wire(&envelope, family);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("priority"));
        assert!(!record.is_set("priority"));
        assert!(record.is_set("host"));
    }
}
