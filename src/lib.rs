//! Hemmer provider for the Radarr media-management server.
//!
//! The provider manages Radarr's REST resources declaratively: download
//! clients, indexers, notifications, custom formats, tags, and the
//! singleton configuration objects (host, naming, media management).
//!
//! # Architecture
//!
//! Radarr models its pluggable resources as polymorphic envelopes: a
//! common wrapper (`id`, `name`, `implementation`, `configContract`,
//! `tags`) around a flat list of `fields`, each a name/value pair whose
//! type is only known from out-of-band schema knowledge. The crate turns
//! that into typed provider attributes in layers:
//!
//! - [`value`]: tri-state attribute values and the [`value::Record`]
//!   they live in
//! - [`fields`]: the field codec, declarative kind buckets mapping wire
//!   names to typed values in both directions
//! - [`envelope`]: the wrapper adapter around the field codec
//! - [`variants`]: data-driven resource tables, one row per managed
//!   implementation
//! - [`singleton`]: the flat-object codec for the `config/*` endpoints
//! - [`secrets`]: read-back reconciliation for server-masked values
//! - [`api`]: the HTTP client and wire models
//! - [`provider`]: the [`provider::RadarrProvider`] tying it all to the
//!   plugin protocol
//! - [`plugin`]: the gRPC plugin protocol layer (schema types, server,
//!   validation, test harness)
//!
//! # Handshake Protocol
//!
//! When the provider starts via [`plugin::serve`], it prints a handshake
//! line to stdout so the orchestrator can connect:
//!
//! ```text
//! HEMMER_PROVIDER|1|127.0.0.1:50051
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod envelope;
pub mod error;
pub mod fields;
pub mod logging;
pub mod plugin;
pub mod provider;
pub mod secrets;
pub mod singleton;
pub mod value;
pub mod variants;

#[allow(missing_docs)]
#[allow(clippy::all)]
pub mod generated;

// Re-export main types at crate root
pub use error::ProviderError;
pub use logging::{init_logging, try_init_logging};
pub use plugin::{
    serve, serve_with_options, Diagnostic, DiagnosticSeverity, PlanResult, ProviderSchema,
    ProviderService, ServeOptions,
};
pub use provider::RadarrProvider;
