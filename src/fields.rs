//! The field codec: typed records to and from polymorphic field lists.
//!
//! Every polymorphic server resource carries its variant-specific settings
//! as a heterogeneous list of `{name, value}` entries. A [`FieldSpec`]
//! declares once per family which wire names hold which kind; the codec
//! gathers a [`Record`] into that list and scatters a received list back,
//! ignoring anything the declaration does not know about.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::plugin::schema::Diagnostic;
use crate::value::{AttrValue, Kind, Record};

/// A single `{name, value}` entry inside a resource envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Wire name, camelCase.
    pub name: String,
    /// Wire value; the server omits it for unset settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Field {
    /// Convenience constructor used by the encoder and in tests.
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
        }
    }
}

/// Static declaration of a family's field kinds.
///
/// The five name buckets are pairwise disjoint. Names listed in
/// `string_sets_reserved` address envelope-level slots (for example
/// `tags`) and are never read or written as fields.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Wire names encoded as booleans.
    pub bools: &'static [&'static str],
    /// Wire names encoded as 64-bit integers.
    pub ints: &'static [&'static str],
    /// Wire names encoded as strings.
    pub strings: &'static [&'static str],
    /// Wire names encoded as sets of string.
    pub string_sets: &'static [&'static str],
    /// String-set names that live on the envelope, not in the field list.
    pub string_sets_reserved: &'static [&'static str],
    /// Wire names encoded as sets of int.
    pub int_sets: &'static [&'static str],
}

/// An empty declaration, for families without settings fields.
pub const NO_FIELDS: FieldSpec = FieldSpec {
    bools: &[],
    ints: &[],
    strings: &[],
    string_sets: &[],
    string_sets_reserved: &[],
    int_sets: &[],
};

impl FieldSpec {
    /// Kind buckets in the fixed encode order.
    pub fn buckets(&self) -> [(Kind, &'static [&'static str]); 5] {
        [
            (Kind::Bool, self.bools),
            (Kind::Int, self.ints),
            (Kind::Str, self.strings),
            (Kind::StrSet, self.string_sets),
            (Kind::IntSet, self.int_sets),
        ]
    }

    /// Locate a wire name in its kind bucket.
    ///
    /// Reserved names resolve to `None`: the envelope adapter owns them.
    pub fn kind_of(&self, wire_name: &str) -> Option<Kind> {
        if self.string_sets_reserved.contains(&wire_name) {
            return None;
        }
        self.buckets()
            .into_iter()
            .find(|(_, names)| names.contains(&wire_name))
            .map(|(kind, _)| kind)
    }

    /// Kind lookup by snake_case attribute name, for decoding plan state.
    pub fn kind_of_attr(&self, attr_name: &str) -> Option<Kind> {
        self.kind_of(&camel_case(attr_name))
    }

    /// Iterate every declared wire name (reserved names excluded).
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.buckets()
            .into_iter()
            .flat_map(|(_, names)| names.iter().copied())
    }
}

/// Gather a record into a field list.
///
/// Walks the declaration bucket by bucket (bools, ints, strings,
/// string-sets, int-sets) so the output order is deterministic; unset and
/// explicitly-null attributes are omitted. The server is order-insensitive
/// but stable output keeps request diffs readable.
pub fn encode(record: &Record, spec: &FieldSpec) -> Vec<Field> {
    let mut out = Vec::new();
    for (_, names) in spec.buckets() {
        for &wire in names {
            match record.get(&snake_case(wire)) {
                None | Some(AttrValue::Null) => {}
                Some(value) => out.push(Field::new(wire, value.to_json())),
            }
        }
    }
    out
}

/// Scatter a field list onto a record.
///
/// Unknown names are skipped with a debug log; a value that does not
/// coerce to its declared kind produces a warning diagnostic and decoding
/// continues; a duplicate name on the wire wins with its last occurrence.
/// Fields missing from the list leave the corresponding slot unset.
pub fn decode(fields: &[Field], spec: &FieldSpec, record: &mut Record) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for field in fields {
        let Some(kind) = spec.kind_of(&field.name) else {
            debug!(field = %field.name, "ignoring undeclared field");
            continue;
        };
        let Some(raw) = &field.value else { continue };
        if raw.is_null() {
            continue;
        }
        let attr = snake_case(&field.name);
        match AttrValue::from_wire(kind, raw) {
            Ok(value) => record.set(attr, value),
            Err(cause) => diagnostics.push(
                Diagnostic::warning(format!("Ignored field '{}'", field.name))
                    .with_detail(cause)
                    .with_attribute(attr),
            ),
        }
    }
    diagnostics
}

/// camelCase wire name to snake_case attribute name.
///
/// Pure and reversible with [`camel_case`] for names drawn from
/// `[a-zA-Z0-9]`.
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// snake_case attribute name back to its camelCase wire name.
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
