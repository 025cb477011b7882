//! Error types for the Radarr provider.

use thiserror::Error;

use crate::api::ApiError;

/// Errors surfaced by provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// An API call against the Radarr server failed.
    #[error("{operation} failed for {resource}: {source}")]
    Client {
        /// The provider operation being performed (create, read, ...).
        operation: &'static str,
        /// The resource type involved.
        resource: String,
        /// The underlying HTTP failure.
        source: ApiError,
    },

    /// The provider was used before a successful Configure.
    #[error("provider is not configured: url and api_key must be set")]
    NotConfigured,

    /// A configuration error occurred.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A validation error occurred.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The requested resource type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// The requested resource was not found on the server.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// An import identifier that is not a numeric id.
    #[error("invalid import identifier '{0}': expected a numeric id")]
    ImportIdentifier(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProviderError {
    /// Wrap an API failure with the operation and resource it belongs to.
    pub fn client(operation: &'static str, resource: impl Into<String>, source: ApiError) -> Self {
        Self::Client {
            operation,
            resource: resource.into(),
            source,
        }
    }
}

impl From<ProviderError> for tonic::Status {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Client { .. } => tonic::Status::unavailable(err.to_string()),
            ProviderError::NotConfigured => tonic::Status::failed_precondition(err.to_string()),
            ProviderError::Configuration(msg) => tonic::Status::failed_precondition(msg),
            ProviderError::Validation(msg) => tonic::Status::invalid_argument(msg),
            ProviderError::UnknownResource(msg) => tonic::Status::not_found(msg),
            ProviderError::NotFound(msg) => tonic::Status::not_found(msg),
            ProviderError::ImportIdentifier(_) => tonic::Status::invalid_argument(err.to_string()),
            ProviderError::Serialization(e) => {
                tonic::Status::invalid_argument(format!("Serialization error: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_error_display() {
        let err = ProviderError::client(
            "create",
            "radarr_download_client_aria2",
            ApiError::Status {
                status: StatusCode::BAD_REQUEST,
                body: "invalid host".into(),
            },
        );
        let message = format!("{}", err);
        assert!(message.contains("create failed for radarr_download_client_aria2"));
        assert!(message.contains("400"));

        let err = ProviderError::ImportIdentifier("not-a-number".into());
        assert!(format!("{}", err).contains("not-a-number"));
    }

    #[test]
    fn test_error_to_status() {
        let status: tonic::Status = ProviderError::NotConfigured.into();
        assert_eq!(status.code(), tonic::Code::FailedPrecondition);

        let status: tonic::Status = ProviderError::Validation("bad".into()).into();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);

        let status: tonic::Status = ProviderError::UnknownResource("x".into()).into();
        assert_eq!(status.code(), tonic::Code::NotFound);

        let status: tonic::Status = ProviderError::ImportIdentifier("x".into()).into();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }
}
