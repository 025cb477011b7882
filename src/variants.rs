//! Static variant descriptors.
//!
//! Each provider-visible resource type is a narrow projection of one
//! wire family. The family owns the endpoint and the full settings
//! dictionary; the variant contributes the implementation key, the
//! config contract, an attribute mask, and per-attribute extras
//! (sensitivity, value validators). Adding a resource type means adding
//! a row here, not writing new marshalling code.

use crate::api::model::Envelope;
use crate::envelope;
use crate::fields::{camel_case, FieldSpec};
use crate::plugin::schema::{Diagnostic, Validator};
use crate::value::{AttrValue, Kind, Record};

/// A wire family: one polymorphic server collection.
pub struct FamilySpec {
    /// API collection path under `/api/v3/`.
    pub endpoint: &'static str,
    /// Boolean slots living flat on the envelope rather than in fields.
    pub flat_bools: &'static [&'static str],
    /// Integer slots living flat on the envelope.
    pub flat_ints: &'static [&'static str],
    /// The union settings dictionary carried in the fields list.
    pub fields: FieldSpec,
}

impl FamilySpec {
    /// Kind of an envelope-common attribute, shared by every family.
    fn common_kind(attr: &str) -> Option<Kind> {
        match attr {
            "id" => Some(Kind::Int),
            "name" | "implementation" | "config_contract" | "protocol" => Some(Kind::Str),
            "tags" => Some(Kind::IntSet),
            _ => None,
        }
    }

    fn flat_kind(&self, wire: &str) -> Option<Kind> {
        if self.flat_bools.contains(&wire) {
            Some(Kind::Bool)
        } else if self.flat_ints.contains(&wire) {
            Some(Kind::Int)
        } else {
            None
        }
    }

    /// Kind of a snake-case attribute anywhere in the family, mask aside.
    pub fn kind_of_attr(&self, attr: &str) -> Option<Kind> {
        if let Some(kind) = Self::common_kind(attr) {
            return Some(kind);
        }
        let wire = camel_case(attr);
        self.flat_kind(&wire).or_else(|| self.fields.kind_of(&wire))
    }

    /// Rebuild a record from a stored state object, family-wide.
    ///
    /// Used by data sources, which read whole collections and cannot
    /// assume any particular variant's mask.
    pub fn record_from_state(&self, state: &serde_json::Value) -> Record {
        match state.as_object() {
            Some(object) => Record::from_object(object, |attr| self.kind_of_attr(attr)),
            None => Record::new(),
        }
    }

    /// Decode a wire envelope without narrowing to a variant.
    pub fn decode(&self, envelope: &Envelope) -> (Record, Vec<Diagnostic>) {
        envelope::from_wire(envelope, self)
    }
}

/// The wire families this provider speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Download clients, `downloadclient` collection.
    DownloadClient,
    /// Indexers, `indexer` collection.
    Indexer,
    /// Notification connections, `notification` collection.
    Notification,
    /// Condition objects nested inside custom formats. Not a collection
    /// of its own; reached through the custom format endpoint.
    Specification,
}

impl Family {
    /// The family's static descriptor.
    pub fn spec(self) -> &'static FamilySpec {
        match self {
            Family::DownloadClient => &DOWNLOAD_CLIENT,
            Family::Indexer => &INDEXER,
            Family::Notification => &NOTIFICATION,
            Family::Specification => &SPECIFICATION,
        }
    }
}

/// A value validator attached to one attribute of a variant.
#[derive(Debug, Clone, Copy)]
pub enum AttrValidator {
    /// The integer must be one of the listed values.
    IntOneOf(&'static [i64]),
    /// The integer must fall in the inclusive range.
    IntBetween(i64, i64),
    /// The string must be one of the listed values.
    StringOneOf(&'static [&'static str]),
}

impl AttrValidator {
    /// Convert to the owned validator carried in a schema attribute.
    pub fn to_schema(self) -> Validator {
        match self {
            AttrValidator::IntOneOf(allowed) => Validator::IntOneOf(allowed.to_vec()),
            AttrValidator::IntBetween(min, max) => Validator::IntBetween { min, max },
            AttrValidator::StringOneOf(allowed) => {
                Validator::StringOneOf(allowed.iter().map(|s| s.to_string()).collect())
            }
        }
    }
}

/// One provider resource type: a masked view of a family.
pub struct VariantSpec {
    /// Resource type name as the orchestrator sees it.
    pub resource: &'static str,
    /// The wire family this variant belongs to.
    pub family: Family,
    /// Server-side implementation key stamped on every outgoing envelope.
    pub implementation: &'static str,
    /// Settings contract key; empty when the server infers it.
    pub config_contract: &'static str,
    /// Fixed protocol, where the family distinguishes one.
    pub protocol: Option<&'static str>,
    /// Wire names of the family fields this variant exposes.
    pub attrs: &'static [&'static str],
    /// Wire names of attrs the server masks on read-back.
    pub sensitive: &'static [&'static str],
    /// Attribute validators, by wire name.
    pub validators: &'static [(&'static str, AttrValidator)],
}

impl VariantSpec {
    /// The family this variant projects.
    pub fn family_spec(&self) -> &'static FamilySpec {
        self.family.spec()
    }

    fn is_masked_wire(&self, wire: &str) -> bool {
        self.attrs.contains(&wire)
    }

    /// Kind of a snake-case attribute within this variant's mask.
    pub fn kind_of_attr(&self, attr: &str) -> Option<Kind> {
        if let Some(kind) = FamilySpec::common_kind(attr) {
            return Some(kind);
        }
        let family = self.family_spec();
        let wire = camel_case(attr);
        if let Some(kind) = family.flat_kind(&wire) {
            return Some(kind);
        }
        if self.is_masked_wire(&wire) {
            family.fields.kind_of(&wire)
        } else {
            None
        }
    }

    /// Snake-case names of the sensitive attributes.
    pub fn sensitive_attrs(&self) -> Vec<String> {
        self.sensitive.iter().map(|w| crate::fields::snake_case(w)).collect()
    }

    /// Widen a variant record to the family shape, stamping the variant
    /// tags the wire requires.
    pub fn to_generic(&self, record: &Record) -> Record {
        let mut generic = record.clone();
        generic.set(
            "implementation",
            AttrValue::Str(self.implementation.to_string()),
        );
        if !self.config_contract.is_empty() {
            generic.set(
                "config_contract",
                AttrValue::Str(self.config_contract.to_string()),
            );
        }
        if let Some(protocol) = self.protocol {
            generic.set("protocol", AttrValue::Str(protocol.to_string()));
        }
        generic
    }

    /// Narrow a family record back down to this variant's attributes.
    pub fn from_generic(&self, generic: &Record) -> Record {
        let mut narrow = generic.clone();
        narrow.retain(|attr| self.kind_of_attr(attr).is_some());
        narrow
    }

    /// Encode a variant record for the wire.
    pub fn to_wire(&self, record: &Record) -> Envelope {
        envelope::to_wire(&self.to_generic(record), self.family_spec())
    }

    /// Decode a wire envelope into this variant's shape.
    pub fn from_wire(&self, envelope: &Envelope) -> (Record, Vec<Diagnostic>) {
        let (generic, diagnostics) = envelope::from_wire(envelope, self.family_spec());
        (self.from_generic(&generic), diagnostics)
    }

    /// Rebuild a record from a stored state object.
    pub fn record_from_state(&self, state: &serde_json::Value) -> Record {
        match state.as_object() {
            Some(object) => Record::from_object(object, |attr| self.kind_of_attr(attr)),
            None => Record::new(),
        }
    }
}

/// The download client family.
pub static DOWNLOAD_CLIENT: FamilySpec = FamilySpec {
    endpoint: "downloadclient",
    flat_bools: &["enable", "removeCompletedDownloads", "removeFailedDownloads"],
    flat_ints: &["priority"],
    fields: FieldSpec {
        bools: &["useSsl", "addPaused", "addStopped"],
        ints: &["port", "recentMoviePriority", "olderMoviePriority"],
        strings: &[
            "host",
            "rpcPath",
            "urlBase",
            "secretToken",
            "password",
            "movieCategory",
            "movieDirectory",
            "apiUrl",
            "appId",
            "appToken",
            "destinationDirectory",
            "category",
        ],
        string_sets: &[],
        string_sets_reserved: &["tags"],
        int_sets: &[],
    },
};

/// The indexer family.
pub static INDEXER: FamilySpec = FamilySpec {
    endpoint: "indexer",
    flat_bools: &["enableRss", "enableAutomaticSearch", "enableInteractiveSearch"],
    flat_ints: &["priority", "downloadClientId"],
    fields: FieldSpec {
        bools: &[],
        ints: &[],
        strings: &["baseUrl", "apiPath", "apiKey", "additionalParameters"],
        string_sets: &[],
        string_sets_reserved: &["tags"],
        int_sets: &["categories"],
    },
};

/// The notification connection family.
pub static NOTIFICATION: FamilySpec = FamilySpec {
    endpoint: "notification",
    flat_bools: &[
        "onGrab",
        "onDownload",
        "onUpgrade",
        "onRename",
        "onHealthIssue",
        "includeHealthWarnings",
    ],
    flat_ints: &[],
    fields: FieldSpec {
        bools: &["notify", "updateLibrary", "cleanLibrary", "alwaysUpdate", "useSsl"],
        ints: &["port", "displayTime"],
        strings: &["host", "username", "password", "path", "arguments"],
        string_sets: &[],
        string_sets_reserved: &["tags"],
        int_sets: &[],
    },
};

/// The custom format condition family.
pub static SPECIFICATION: FamilySpec = FamilySpec {
    endpoint: "customformat",
    flat_bools: &["negate", "required"],
    flat_ints: &[],
    fields: FieldSpec {
        bools: &[],
        ints: &["min", "max"],
        strings: &["value"],
        string_sets: &[],
        string_sets_reserved: &[],
        int_sets: &[],
    },
};

const TORRENT_PRIORITIES: &[i64] = &[0, 1];
const RTORRENT_PRIORITIES: &[i64] = &[0, 1, 2, 3];

/// Every managed resource type, one row per variant.
pub static VARIANTS: &[VariantSpec] = &[
    VariantSpec {
        resource: "radarr_download_client_aria2",
        family: Family::DownloadClient,
        implementation: "Aria2",
        config_contract: "Aria2Settings",
        protocol: Some("torrent"),
        attrs: &["host", "port", "rpcPath", "secretToken", "useSsl"],
        sensitive: &["secretToken"],
        validators: &[],
    },
    VariantSpec {
        resource: "radarr_download_client_deluge",
        family: Family::DownloadClient,
        implementation: "Deluge",
        config_contract: "DelugeSettings",
        protocol: Some("torrent"),
        attrs: &[
            "host",
            "port",
            "urlBase",
            "password",
            "movieCategory",
            "recentMoviePriority",
            "olderMoviePriority",
            "addPaused",
            "useSsl",
        ],
        sensitive: &["password"],
        validators: &[
            ("recentMoviePriority", AttrValidator::IntOneOf(TORRENT_PRIORITIES)),
            ("olderMoviePriority", AttrValidator::IntOneOf(TORRENT_PRIORITIES)),
        ],
    },
    VariantSpec {
        resource: "radarr_download_client_freebox",
        family: Family::DownloadClient,
        implementation: "Freebox",
        config_contract: "FreeboxDownloadSettings",
        protocol: Some("torrent"),
        attrs: &[
            "host",
            "port",
            "apiUrl",
            "appId",
            "appToken",
            "destinationDirectory",
            "category",
            "addPaused",
            "useSsl",
        ],
        sensitive: &["appToken"],
        validators: &[("port", AttrValidator::IntBetween(1, 65535))],
    },
    VariantSpec {
        resource: "radarr_download_client_rtorrent",
        family: Family::DownloadClient,
        implementation: "RTorrent",
        config_contract: "RTorrentSettings",
        protocol: Some("torrent"),
        attrs: &[
            "host",
            "port",
            "urlBase",
            "movieCategory",
            "movieDirectory",
            "recentMoviePriority",
            "olderMoviePriority",
            "addStopped",
            "useSsl",
        ],
        sensitive: &[],
        validators: &[
            ("recentMoviePriority", AttrValidator::IntOneOf(RTORRENT_PRIORITIES)),
            ("olderMoviePriority", AttrValidator::IntOneOf(RTORRENT_PRIORITIES)),
        ],
    },
    VariantSpec {
        resource: "radarr_indexer_newznab",
        family: Family::Indexer,
        implementation: "Newznab",
        config_contract: "NewznabSettings",
        protocol: Some("usenet"),
        attrs: &["baseUrl", "apiPath", "apiKey", "categories", "additionalParameters"],
        sensitive: &["apiKey"],
        validators: &[],
    },
    VariantSpec {
        resource: "radarr_notification_kodi",
        family: Family::Notification,
        implementation: "Xbmc",
        config_contract: "XbmcSettings",
        protocol: None,
        attrs: &[
            "host",
            "port",
            "username",
            "password",
            "displayTime",
            "notify",
            "updateLibrary",
            "cleanLibrary",
            "alwaysUpdate",
            "useSsl",
        ],
        sensitive: &["password"],
        validators: &[("displayTime", AttrValidator::IntBetween(0, 300))],
    },
    VariantSpec {
        resource: "radarr_notification_custom_script",
        family: Family::Notification,
        implementation: "CustomScript",
        config_contract: "CustomScriptSettings",
        protocol: None,
        attrs: &["path", "arguments"],
        sensitive: &[],
        validators: &[],
    },
];

/// Condition variants usable inside a custom format's specification set.
pub static SPECIFICATIONS: &[VariantSpec] = &[
    VariantSpec {
        resource: "release_title",
        family: Family::Specification,
        implementation: "ReleaseTitleSpecification",
        config_contract: "",
        protocol: None,
        attrs: &["value"],
        sensitive: &[],
        validators: &[],
    },
    VariantSpec {
        resource: "size",
        family: Family::Specification,
        implementation: "SizeSpecification",
        config_contract: "",
        protocol: None,
        attrs: &["min", "max"],
        sensitive: &[],
        validators: &[],
    },
    VariantSpec {
        resource: "year",
        family: Family::Specification,
        implementation: "YearSpecification",
        config_contract: "",
        protocol: None,
        attrs: &["min", "max"],
        sensitive: &[],
        validators: &[],
    },
    VariantSpec {
        resource: "genre",
        family: Family::Specification,
        implementation: "GenreSpecification",
        config_contract: "",
        protocol: None,
        attrs: &["value"],
        sensitive: &[],
        validators: &[],
    },
];

/// Look up a managed variant by resource type name.
pub fn variant_for(resource: &str) -> Option<&'static VariantSpec> {
    VARIANTS.iter().find(|v| v.resource == resource)
}

/// Look up a specification condition by its block name.
pub fn specification_for(block: &str) -> Option<&'static VariantSpec> {
    SPECIFICATIONS.iter().find(|v| v.resource == block)
}

/// Look up a specification condition by server implementation key.
pub fn specification_for_implementation(implementation: &str) -> Option<&'static VariantSpec> {
    SPECIFICATIONS.iter().find(|v| v.implementation == implementation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_every_masked_attr_resolves_in_its_family() {
        for variant in VARIANTS.iter().chain(SPECIFICATIONS) {
            let family = variant.family_spec();
            for wire in variant.attrs {
                assert!(
                    family.fields.kind_of(wire).is_some(),
                    "{}: '{}' missing from family dictionary",
                    variant.resource,
                    wire
                );
            }
        }
    }

    #[test]
    fn test_sensitive_and_validated_attrs_are_masked() {
        for variant in VARIANTS.iter().chain(SPECIFICATIONS) {
            for wire in variant.sensitive {
                assert!(variant.attrs.contains(wire), "{}: '{}'", variant.resource, wire);
            }
            for (wire, _) in variant.validators {
                assert!(variant.attrs.contains(wire), "{}: '{}'", variant.resource, wire);
            }
        }
    }

    #[test]
    fn test_resource_names_are_unique() {
        let names: BTreeSet<_> = VARIANTS.iter().map(|v| v.resource).collect();
        assert_eq!(names.len(), VARIANTS.len());
    }

    #[test]
    fn test_family_buckets_are_disjoint() {
        for family in [&DOWNLOAD_CLIENT, &INDEXER, &NOTIFICATION, &SPECIFICATION] {
            let mut seen = BTreeSet::new();
            let all = family
                .flat_bools
                .iter()
                .chain(family.flat_ints)
                .copied()
                .chain(family.fields.names());
            for name in all {
                assert!(seen.insert(name), "duplicate wire name '{}'", name);
            }
        }
    }

    #[test]
    fn test_narrow_round_trip_is_identity() {
        let variant = variant_for("radarr_download_client_deluge").unwrap();
        let mut record = Record::new();
        record.set("name", AttrValue::Str("d".into()));
        record.set("host", AttrValue::Str("nas".into()));
        record.set("port", AttrValue::Int(8112));
        record.set("recent_movie_priority", AttrValue::Int(1));
        record.set("add_paused", AttrValue::Bool(false));
        let narrowed = variant.from_generic(&variant.to_generic(&record));
        for (attr, value) in record.iter() {
            assert_eq!(narrowed.get(attr), Some(value), "{}", attr);
        }
    }

    #[test]
    fn test_from_generic_drops_foreign_family_attrs() {
        let variant = variant_for("radarr_download_client_aria2").unwrap();
        let mut generic = Record::new();
        generic.set("host", AttrValue::Str("h".into()));
        // Deluge-only attribute, outside the Aria2 mask
        generic.set("password", AttrValue::Str("pw".into()));
        let narrow = variant.from_generic(&generic);
        assert!(narrow.is_set("host"));
        assert!(!narrow.is_set("password"));
    }

    #[test]
    fn test_wire_round_trip_stamps_variant_tags() {
        let variant = variant_for("radarr_indexer_newznab").unwrap();
        let mut record = Record::new();
        record.set("name", AttrValue::Str("nzb".into()));
        record.set("base_url", AttrValue::Str("https://indexer".into()));
        record.set("categories", AttrValue::int_set(vec![2030, 2040]));
        let envelope = variant.to_wire(&record);
        assert_eq!(envelope.implementation.as_deref(), Some("Newznab"));
        assert_eq!(envelope.config_contract.as_deref(), Some("NewznabSettings"));
        assert_eq!(envelope.protocol.as_deref(), Some("usenet"));
        let (back, diagnostics) = variant.from_wire(&envelope);
        assert!(diagnostics.is_empty());
        assert_eq!(back.get("base_url"), record.get("base_url"));
        assert_eq!(back.get("categories"), record.get("categories"));
    }

    #[test]
    fn test_kind_lookup_respects_mask() {
        let variant = variant_for("radarr_notification_custom_script").unwrap();
        assert_eq!(variant.kind_of_attr("path"), Some(Kind::Str));
        assert_eq!(variant.kind_of_attr("on_grab"), Some(Kind::Bool));
        // masked out for this variant even though the family knows it
        assert_eq!(variant.kind_of_attr("display_time"), None);
        assert_eq!(variant.family_spec().kind_of_attr("display_time"), Some(Kind::Int));
    }
}
