//! The Hemmer plugin protocol layer.
//!
//! Everything a provider binary needs to speak to the Hemmer core: schema
//! description types, the [`ProviderService`] trait, the gRPC server with
//! the stdout handshake, config validation, and an in-process test harness.

pub mod schema;
pub mod server;
pub mod service;
pub mod testing;
pub mod validation;

pub use schema::{Diagnostic, DiagnosticSeverity, ProviderSchema};
pub use server::{serve, serve_with_options, ServeOptions};
pub use service::{
    AttributeChange, ImportedResource, PlanResult, ProviderMetadata, ProviderService,
    ServerCapabilities, HANDSHAKE_PREFIX, PROTOCOL_VERSION,
};
pub use validation::validate;
