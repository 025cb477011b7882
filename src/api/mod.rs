//! Typed access to the server's REST API.

pub mod client;
pub mod model;

pub use client::{ApiError, RadarrClient};
pub use model::{CustomFormat, Envelope, Tag};
