//! Singleton server configuration resources.
//!
//! Host, naming, and media-management settings are not collections: the
//! server holds exactly one instance of each, always addressable as id 1.
//! They carry no implementation key and no fields list, so the object is
//! a plain flat map of typed slots. Create and Update are both a PUT of
//! the full object; Delete only forgets state.

use serde_json::{Map, Value};

use crate::fields::camel_case;
use crate::value::{Kind, Record};

/// Descriptor for one singleton configuration resource.
pub struct SingletonSpec {
    /// Resource type name as the orchestrator sees it.
    pub resource: &'static str,
    /// API path under `/api/v3/`.
    pub endpoint: &'static str,
    /// Boolean slots, wire (camelCase) names.
    pub bools: &'static [&'static str],
    /// Integer slots.
    pub ints: &'static [&'static str],
    /// String slots.
    pub strings: &'static [&'static str],
}

impl SingletonSpec {
    /// Kind of a wire slot.
    pub fn kind_of(&self, wire: &str) -> Option<Kind> {
        if self.bools.contains(&wire) {
            Some(Kind::Bool)
        } else if self.ints.contains(&wire) {
            Some(Kind::Int)
        } else if self.strings.contains(&wire) {
            Some(Kind::Str)
        } else {
            None
        }
    }

    /// Kind of a snake_case attribute, `id` included.
    pub fn kind_of_attr(&self, attr: &str) -> Option<Kind> {
        if attr == "id" {
            return Some(Kind::Int);
        }
        self.kind_of(&camel_case(attr))
    }

    /// Slot names in declaration order (bools, ints, strings).
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.bools
            .iter()
            .chain(self.ints)
            .chain(self.strings)
            .copied()
    }

    /// Encode a record as the flat wire object, id forced to 1.
    ///
    /// The server rejects updates whose id does not match the singleton's,
    /// so the id is pinned here rather than taken from the record.
    pub fn to_wire(&self, record: &Record) -> Value {
        let mut obj = Map::new();
        obj.insert("id".to_string(), Value::from(1));
        for wire in self.names() {
            if let Some(value) = record.get(&crate::fields::snake_case(wire)) {
                let json = value.to_json();
                if !json.is_null() {
                    obj.insert(wire.to_string(), json);
                }
            }
        }
        Value::Object(obj)
    }

    /// Decode the flat wire object into a record.
    ///
    /// Unknown slots are skipped; the server's id is kept as-is.
    pub fn from_wire(&self, body: &Value) -> Record {
        match body.as_object() {
            Some(object) => Record::from_object_wire(object, |wire| {
                if wire == "id" {
                    Some(Kind::Int)
                } else {
                    self.kind_of(wire)
                }
            }),
            None => Record::new(),
        }
    }

    /// Rebuild a record from a stored state object.
    pub fn record_from_state(&self, state: &Value) -> Record {
        match state.as_object() {
            Some(object) => Record::from_object(object, |attr| self.kind_of_attr(attr)),
            None => Record::new(),
        }
    }
}

/// The host configuration object, `config/host`.
pub static HOST: SingletonSpec = SingletonSpec {
    resource: "radarr_host",
    endpoint: "config/host",
    bools: &["launchBrowser", "enableSsl", "analyticsEnabled"],
    ints: &["port", "sslPort", "logSizeLimit"],
    strings: &[
        "bindAddress",
        "urlBase",
        "instanceName",
        "applicationUrl",
        "authenticationMethod",
        "authenticationRequired",
        "username",
        "password",
        "logLevel",
    ],
};

/// The naming configuration object, `config/naming`.
pub static NAMING: SingletonSpec = SingletonSpec {
    resource: "radarr_naming",
    endpoint: "config/naming",
    bools: &["renameMovies", "replaceIllegalCharacters"],
    ints: &["colonReplacementFormat"],
    strings: &["standardMovieFormat", "movieFolderFormat"],
};

/// The media management configuration object, `config/mediamanagement`.
pub static MEDIA_MANAGEMENT: SingletonSpec = SingletonSpec {
    resource: "radarr_media_management",
    endpoint: "config/mediamanagement",
    bools: &[
        "autoUnmonitorPreviouslyDownloadedMovies",
        "createEmptyMovieFolders",
        "deleteEmptyFolders",
        "autoRenameFolders",
        "setPermissionsLinux",
        "skipFreeSpaceCheckWhenImporting",
        "copyUsingHardlinks",
        "importExtraFiles",
        "enableMediaInfo",
    ],
    ints: &["minimumFreeSpaceWhenImporting"],
    strings: &[
        "recycleBin",
        "chmodFolder",
        "chownGroup",
        "extraFileExtensions",
        "fileDate",
        "rescanAfterRefresh",
        "downloadPropersAndRepacks",
    ],
};

/// Every singleton resource type.
pub static SINGLETONS: &[&SingletonSpec] = &[&HOST, &NAMING, &MEDIA_MANAGEMENT];

/// Look up a singleton by resource type name.
pub fn singleton_for(resource: &str) -> Option<&'static SingletonSpec> {
    SINGLETONS.iter().find(|s| s.resource == resource).copied()
}
