//! Tri-state attribute values and typed records.
//!
//! The plugin protocol distinguishes "the user did not say" from "the user
//! said none". A [`Record`] models that directly: an attribute that is
//! absent from the map is unset, [`AttrValue::Null`] is an explicit null,
//! and everything else is a known value of one of the five wire kinds.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// The wire kind of a typed attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Boolean.
    Bool,
    /// 64-bit integer.
    Int,
    /// String.
    Str,
    /// Set of strings.
    StrSet,
    /// Set of 64-bit integers.
    IntSet,
}

impl Kind {
    /// Human-readable name, used in decode diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Str => "string",
            Kind::StrSet => "set of string",
            Kind::IntSet => "set of int",
        }
    }
}

/// A known-or-null attribute value.
///
/// Sets are normalized (sorted, deduplicated) on construction so record
/// equality is insensitive to wire ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Explicit null.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A string.
    Str(String),
    /// A set of integers, kept sorted.
    IntSet(Vec<i64>),
    /// A set of strings, kept sorted.
    StrSet(Vec<String>),
}

impl AttrValue {
    /// Build a normalized integer set.
    pub fn int_set(mut items: Vec<i64>) -> Self {
        items.sort_unstable();
        items.dedup();
        AttrValue::IntSet(items)
    }

    /// Build a normalized string set.
    pub fn str_set(mut items: Vec<String>) -> Self {
        items.sort();
        items.dedup();
        AttrValue::StrSet(items)
    }

    /// The kind of this value, or `None` for null.
    pub fn kind(&self) -> Option<Kind> {
        match self {
            AttrValue::Null => None,
            AttrValue::Bool(_) => Some(Kind::Bool),
            AttrValue::Int(_) => Some(Kind::Int),
            AttrValue::Str(_) => Some(Kind::Str),
            AttrValue::IntSet(_) => Some(Kind::IntSet),
            AttrValue::StrSet(_) => Some(Kind::StrSet),
        }
    }

    /// The value as a bool, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value as an i64, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The value as a string slice, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The value as an integer set, if it is one.
    pub fn as_int_set(&self) -> Option<&[i64]> {
        match self {
            AttrValue::IntSet(v) => Some(v),
            _ => None,
        }
    }

    /// Convert to the JSON representation used in state and on the wire.
    pub fn to_json(&self) -> Value {
        match self {
            AttrValue::Null => Value::Null,
            AttrValue::Bool(b) => Value::Bool(*b),
            AttrValue::Int(i) => Value::from(*i),
            AttrValue::Str(s) => Value::String(s.clone()),
            AttrValue::IntSet(v) => Value::Array(v.iter().map(|i| Value::from(*i)).collect()),
            AttrValue::StrSet(v) => {
                Value::Array(v.iter().map(|s| Value::String(s.clone())).collect())
            }
        }
    }

    /// Coerce a wire value to the declared kind.
    ///
    /// The declaration is trusted, the wire value is validated: integers
    /// are accepted both as JSON numbers and as stringified numbers, and
    /// int-set elements get the same treatment. Anything else that does
    /// not match the declared kind is a coercion error.
    pub fn from_wire(kind: Kind, raw: &Value) -> Result<Self, String> {
        match kind {
            Kind::Bool => raw
                .as_bool()
                .map(AttrValue::Bool)
                .ok_or_else(|| mismatch(kind, raw)),
            Kind::Int => coerce_int(raw)
                .map(AttrValue::Int)
                .ok_or_else(|| mismatch(kind, raw)),
            Kind::Str => raw
                .as_str()
                .map(|s| AttrValue::Str(s.to_string()))
                .ok_or_else(|| mismatch(kind, raw)),
            Kind::IntSet => {
                let arr = raw.as_array().ok_or_else(|| mismatch(kind, raw))?;
                let mut items = Vec::with_capacity(arr.len());
                for elem in arr {
                    items.push(coerce_int(elem).ok_or_else(|| mismatch(kind, elem))?);
                }
                Ok(AttrValue::int_set(items))
            }
            Kind::StrSet => {
                let arr = raw.as_array().ok_or_else(|| mismatch(kind, raw))?;
                let mut items = Vec::with_capacity(arr.len());
                for elem in arr {
                    let s = elem.as_str().ok_or_else(|| mismatch(kind, elem))?;
                    items.push(s.to_string());
                }
                Ok(AttrValue::str_set(items))
            }
        }
    }
}

fn coerce_int(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn mismatch(kind: Kind, raw: &Value) -> String {
    let got = match raw {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    format!("expected {}, got {}", kind.name(), got)
}

/// A typed attribute record: attribute name (snake_case) to value.
///
/// Absence of a key means the attribute is unset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    attrs: BTreeMap<String, AttrValue>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an attribute. `None` means unset.
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    /// Assign an attribute.
    pub fn set(&mut self, name: impl Into<String>, value: AttrValue) {
        self.attrs.insert(name.into(), value);
    }

    /// Remove an attribute, returning it to the unset state.
    pub fn unset(&mut self, name: &str) -> Option<AttrValue> {
        self.attrs.remove(name)
    }

    /// Whether the attribute has a value (including explicit null).
    pub fn is_set(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Iterate attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keep only attributes for which the predicate holds.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.attrs.retain(|name, _| keep(name));
    }

    /// Build a record from a JSON state object.
    ///
    /// `kind_of` maps a snake_case attribute name to its declared kind;
    /// attributes the lookup does not know (for example nested blocks that
    /// are handled separately) are skipped, as are values that do not
    /// coerce. JSON null becomes an explicit null.
    pub fn from_object(obj: &Map<String, Value>, kind_of: impl Fn(&str) -> Option<Kind>) -> Self {
        let mut record = Record::new();
        for (name, raw) in obj {
            let Some(kind) = kind_of(name) else { continue };
            if raw.is_null() {
                record.set(name.clone(), AttrValue::Null);
                continue;
            }
            if let Ok(value) = AttrValue::from_wire(kind, raw) {
                record.set(name.clone(), value);
            }
        }
        record
    }

    /// Build a record from a flat wire object with camelCase keys.
    ///
    /// `kind_of` maps a wire name to its declared kind; record entries are
    /// stored under the snake_case attribute name. Unknown and uncoercible
    /// slots are skipped, and JSON null leaves the slot unset (the wire
    /// has no unset/null distinction to preserve).
    pub fn from_object_wire(
        obj: &Map<String, Value>,
        kind_of: impl Fn(&str) -> Option<Kind>,
    ) -> Self {
        let mut record = Record::new();
        for (wire, raw) in obj {
            let Some(kind) = kind_of(wire) else { continue };
            if raw.is_null() {
                continue;
            }
            if let Ok(value) = AttrValue::from_wire(kind, raw) {
                record.set(crate::fields::snake_case(wire), value);
            }
        }
        record
    }

    /// Convert to the JSON state object handed back to the orchestrator.
    pub fn to_state(&self) -> Value {
        let mut obj = Map::new();
        for (name, value) in &self.attrs {
            obj.insert(name.clone(), value.to_json());
        }
        Value::Object(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sets_normalize() {
        let a = AttrValue::int_set(vec![3, 1, 2, 1]);
        let b = AttrValue::int_set(vec![1, 2, 3]);
        assert_eq!(a, b);

        let a = AttrValue::str_set(vec!["b".into(), "a".into(), "b".into()]);
        assert_eq!(a, AttrValue::str_set(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_int_coercion_accepts_strings() {
        assert_eq!(
            AttrValue::from_wire(Kind::Int, &json!(6800)),
            Ok(AttrValue::Int(6800))
        );
        assert_eq!(
            AttrValue::from_wire(Kind::Int, &json!("6800")),
            Ok(AttrValue::Int(6800))
        );
        assert!(AttrValue::from_wire(Kind::Int, &json!("port")).is_err());
    }

    #[test]
    fn test_int_set_coercion_accepts_mixed_arrays() {
        let got = AttrValue::from_wire(Kind::IntSet, &json!([2000, "2010", 2000])).unwrap();
        assert_eq!(got, AttrValue::IntSet(vec![2000, 2010]));
    }

    #[test]
    fn test_kind_mismatch_messages() {
        let err = AttrValue::from_wire(Kind::Bool, &json!("true")).unwrap_err();
        assert!(err.contains("expected bool"));
        assert!(err.contains("got string"));
    }

    #[test]
    fn test_unset_vs_null() {
        let mut record = Record::new();
        assert!(!record.is_set("url_base"));
        record.set("url_base", AttrValue::Null);
        assert!(record.is_set("url_base"));
        assert_eq!(record.get("url_base"), Some(&AttrValue::Null));
        record.unset("url_base");
        assert!(!record.is_set("url_base"));
    }

    #[test]
    fn test_from_object_skips_unknown_and_keeps_null() {
        let obj = json!({
            "host": "nas",
            "port": 6800,
            "specifications": [{"name": "x"}],
            "password": null
        });
        let record = Record::from_object(obj.as_object().unwrap(), |name| match name {
            "host" | "password" => Some(Kind::Str),
            "port" => Some(Kind::Int),
            _ => None,
        });
        assert_eq!(record.get("host"), Some(&AttrValue::Str("nas".into())));
        assert_eq!(record.get("port"), Some(&AttrValue::Int(6800)));
        assert_eq!(record.get("password"), Some(&AttrValue::Null));
        assert!(!record.is_set("specifications"));
    }

    #[test]
    fn test_to_state_round_trip() {
        let mut record = Record::new();
        record.set("enable", AttrValue::Bool(true));
        record.set("priority", AttrValue::Int(1));
        record.set("name", AttrValue::Str("c1".into()));
        record.set("tags", AttrValue::int_set(vec![2, 1]));
        let state = record.to_state();
        assert_eq!(
            state,
            json!({"enable": true, "priority": 1, "name": "c1", "tags": [1, 2]})
        );
    }
}
