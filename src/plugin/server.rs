//! gRPC server glue and the process handshake.
//!
//! Wraps a [`ProviderService`] in the generated gRPC service, binds an
//! ephemeral port, prints the `HEMMER_PROVIDER|<version>|<address>`
//! handshake on stdout, and shuts down cleanly on SIGTERM/SIGINT. All
//! logging goes to stderr; stdout belongs to the handshake.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tonic::transport::Server;
use tracing::{debug, error, info, instrument, warn};

use crate::error::ProviderError;
use crate::plugin::schema::{Diagnostic, DiagnosticSeverity};
use crate::plugin::service::{ProviderService, HANDSHAKE_PREFIX, PROTOCOL_VERSION};

struct ProviderGrpcService<P: ProviderService> {
    provider: Arc<P>,
}

impl<P: ProviderService> ProviderGrpcService<P> {
    fn diagnostics_to_proto(&self, diagnostics: Vec<Diagnostic>) -> Vec<crate::generated::Diagnostic> {
        diagnostics
            .into_iter()
            .map(|d| crate::generated::Diagnostic {
                severity: match d.severity {
                    DiagnosticSeverity::Error => crate::generated::diagnostic::Severity::Error as i32,
                    DiagnosticSeverity::Warning => {
                        crate::generated::diagnostic::Severity::Warning as i32
                    }
                },
                summary: d.summary,
                detail: d.detail.unwrap_or_default(),
                attribute: d.attribute.unwrap_or_default(),
            })
            .collect()
    }

    fn error_to_diagnostics(&self, err: ProviderError) -> Vec<crate::generated::Diagnostic> {
        vec![crate::generated::Diagnostic {
            severity: crate::generated::diagnostic::Severity::Error as i32,
            summary: err.to_string(),
            detail: String::new(),
            attribute: String::new(),
        }]
    }

    fn schema_to_proto(&self, schema: &crate::plugin::schema::Schema) -> crate::generated::Schema {
        crate::generated::Schema {
            version: schema.version as i64,
            block: Some(block_to_proto(&schema.block)),
        }
    }
}

fn block_to_proto(block: &crate::plugin::schema::Block) -> crate::generated::Block {
    crate::generated::Block {
        attributes: block
            .attributes
            .iter()
            .map(|(name, attr)| crate::generated::Attribute {
                name: name.clone(),
                r#type: serde_json::to_vec(&attr.attr_type).unwrap_or_default(),
                required: attr.flags.required,
                optional: attr.flags.optional,
                computed: attr.flags.computed,
                sensitive: attr.flags.sensitive,
                description: attr.description.clone().unwrap_or_default(),
                force_new: attr.force_new,
                default_value: attr
                    .default
                    .as_ref()
                    .map(|v| serde_json::to_vec(v).unwrap_or_default())
                    .unwrap_or_default(),
            })
            .collect(),
        block_types: block
            .blocks
            .iter()
            .map(|(name, nested)| crate::generated::NestedBlock {
                type_name: name.clone(),
                block: Some(block_to_proto(&nested.block)),
                nesting_mode: match nested.nesting_mode {
                    crate::plugin::schema::BlockNestingMode::Single => {
                        crate::generated::nested_block::NestingMode::Single as i32
                    }
                    crate::plugin::schema::BlockNestingMode::List => {
                        crate::generated::nested_block::NestingMode::List as i32
                    }
                    crate::plugin::schema::BlockNestingMode::Set => {
                        crate::generated::nested_block::NestingMode::Set as i32
                    }
                },
                min_items: nested.min_items as i32,
                max_items: nested.max_items as i32,
            })
            .collect(),
        description: block.description.clone().unwrap_or_default(),
    }
}

#[tonic::async_trait]
impl<P: ProviderService> crate::generated::provider_server::Provider for ProviderGrpcService<P> {
    #[instrument(skip(self, _request), name = "grpc.get_metadata")]
    async fn get_metadata(
        &self,
        _request: tonic::Request<crate::generated::GetMetadataRequest>,
    ) -> Result<tonic::Response<crate::generated::GetMetadataResponse>, tonic::Status> {
        let metadata = self.provider.metadata();
        debug!(
            resources = metadata.resources.len(),
            data_sources = metadata.data_sources.len(),
            "GetMetadata completed"
        );
        Ok(tonic::Response::new(crate::generated::GetMetadataResponse {
            server_capabilities: Some(crate::generated::ServerCapabilities {
                plan_destroy: metadata.capabilities.plan_destroy,
            }),
            resources: metadata.resources,
            data_sources: metadata.data_sources,
            diagnostics: vec![],
        }))
    }

    #[instrument(skip(self, _request), name = "grpc.get_schema")]
    async fn get_schema(
        &self,
        _request: tonic::Request<crate::generated::GetSchemaRequest>,
    ) -> Result<tonic::Response<crate::generated::GetSchemaResponse>, tonic::Status> {
        let schema = self.provider.schema();
        info!(
            resources = schema.resources.len(),
            data_sources = schema.data_sources.len(),
            "GetSchema completed"
        );
        Ok(tonic::Response::new(crate::generated::GetSchemaResponse {
            provider: Some(self.schema_to_proto(&schema.provider)),
            resources: schema
                .resources
                .iter()
                .map(|(k, v)| (k.clone(), self.schema_to_proto(v)))
                .collect(),
            data_sources: schema
                .data_sources
                .iter()
                .map(|(k, v)| (k.clone(), self.schema_to_proto(v)))
                .collect(),
            diagnostics: vec![],
        }))
    }

    #[instrument(skip(self, request), name = "grpc.validate_provider_config")]
    async fn validate_provider_config(
        &self,
        request: tonic::Request<crate::generated::ValidateProviderConfigRequest>,
    ) -> Result<tonic::Response<crate::generated::ValidateProviderConfigResponse>, tonic::Status>
    {
        let req = request.into_inner();
        let config = serde_json::from_slice(&req.config).unwrap_or(serde_json::Value::Null);

        match self.provider.validate_provider_config(config).await {
            Ok(diagnostics) => Ok(tonic::Response::new(
                crate::generated::ValidateProviderConfigResponse {
                    diagnostics: self.diagnostics_to_proto(diagnostics),
                },
            )),
            Err(e) => {
                error!(error = %e, "ValidateProviderConfig failed");
                Ok(tonic::Response::new(
                    crate::generated::ValidateProviderConfigResponse {
                        diagnostics: self.error_to_diagnostics(e),
                    },
                ))
            }
        }
    }

    #[instrument(skip(self, request), name = "grpc.configure")]
    async fn configure(
        &self,
        request: tonic::Request<crate::generated::ConfigureRequest>,
    ) -> Result<tonic::Response<crate::generated::ConfigureResponse>, tonic::Status> {
        let req = request.into_inner();
        let config = serde_json::from_slice(&req.config).unwrap_or(serde_json::Value::Null);

        match self.provider.configure(config).await {
            Ok(diagnostics) => {
                let has_errors = diagnostics
                    .iter()
                    .any(|d| matches!(d.severity, DiagnosticSeverity::Error));
                if has_errors {
                    warn!(diagnostics = diagnostics.len(), "Configure completed with errors");
                } else {
                    info!("Configure completed");
                }
                Ok(tonic::Response::new(crate::generated::ConfigureResponse {
                    diagnostics: self.diagnostics_to_proto(diagnostics),
                }))
            }
            Err(e) => {
                error!(error = %e, "Configure failed");
                Ok(tonic::Response::new(crate::generated::ConfigureResponse {
                    diagnostics: self.error_to_diagnostics(e),
                }))
            }
        }
    }

    #[instrument(skip(self, _request), name = "grpc.stop")]
    async fn stop(
        &self,
        _request: tonic::Request<crate::generated::StopRequest>,
    ) -> Result<tonic::Response<crate::generated::StopResponse>, tonic::Status> {
        info!("Stop called");
        match self.provider.stop().await {
            Ok(()) => Ok(tonic::Response::new(crate::generated::StopResponse {
                error: String::new(),
            })),
            Err(e) => {
                error!(error = %e, "Stop failed");
                Ok(tonic::Response::new(crate::generated::StopResponse {
                    error: e.to_string(),
                }))
            }
        }
    }

    #[instrument(skip(self, request), name = "grpc.validate_resource_config")]
    async fn validate_resource_config(
        &self,
        request: tonic::Request<crate::generated::ValidateResourceConfigRequest>,
    ) -> Result<tonic::Response<crate::generated::ValidateResourceConfigResponse>, tonic::Status>
    {
        let req = request.into_inner();
        debug!(resource_type = %req.resource_type, "ValidateResourceConfig called");
        let config = serde_json::from_slice(&req.config).unwrap_or(serde_json::Value::Null);

        match self
            .provider
            .validate_resource_config(&req.resource_type, config)
            .await
        {
            Ok(diagnostics) => Ok(tonic::Response::new(
                crate::generated::ValidateResourceConfigResponse {
                    diagnostics: self.diagnostics_to_proto(diagnostics),
                },
            )),
            Err(e) => {
                error!(resource_type = %req.resource_type, error = %e, "ValidateResourceConfig failed");
                Ok(tonic::Response::new(
                    crate::generated::ValidateResourceConfigResponse {
                        diagnostics: self.error_to_diagnostics(e),
                    },
                ))
            }
        }
    }

    #[instrument(skip(self, request), name = "grpc.upgrade_resource_state")]
    async fn upgrade_resource_state(
        &self,
        request: tonic::Request<crate::generated::UpgradeResourceStateRequest>,
    ) -> Result<tonic::Response<crate::generated::UpgradeResourceStateResponse>, tonic::Status>
    {
        let req = request.into_inner();
        debug!(resource_type = %req.resource_type, version = req.version, "UpgradeResourceState called");
        let state = serde_json::from_slice(&req.raw_state).unwrap_or(serde_json::Value::Null);

        match self
            .provider
            .upgrade_resource_state(&req.resource_type, req.version, state)
            .await
        {
            Ok(upgraded) => Ok(tonic::Response::new(
                crate::generated::UpgradeResourceStateResponse {
                    upgraded_state: serde_json::to_vec(&upgraded).unwrap_or_default(),
                    diagnostics: vec![],
                },
            )),
            Err(e) => {
                error!(resource_type = %req.resource_type, error = %e, "UpgradeResourceState failed");
                Ok(tonic::Response::new(
                    crate::generated::UpgradeResourceStateResponse {
                        upgraded_state: vec![],
                        diagnostics: self.error_to_diagnostics(e),
                    },
                ))
            }
        }
    }

    #[instrument(skip(self, request), name = "grpc.plan")]
    async fn plan(
        &self,
        request: tonic::Request<crate::generated::PlanRequest>,
    ) -> Result<tonic::Response<crate::generated::PlanResponse>, tonic::Status> {
        let req = request.into_inner();
        debug!(resource_type = %req.resource_type, is_create = req.prior_state.is_empty(), "Plan called");

        let prior_state = if req.prior_state.is_empty() {
            None
        } else {
            serde_json::from_slice(&req.prior_state).ok()
        };
        let proposed_state =
            serde_json::from_slice(&req.proposed_state).unwrap_or(serde_json::Value::Null);
        let config = serde_json::from_slice(&req.config).unwrap_or(serde_json::Value::Null);

        match self
            .provider
            .plan(&req.resource_type, prior_state, proposed_state, config)
            .await
        {
            Ok(result) => {
                info!(
                    resource_type = %req.resource_type,
                    changes = result.changes.len(),
                    requires_replace = result.requires_replace,
                    "Plan completed"
                );
                Ok(tonic::Response::new(crate::generated::PlanResponse {
                    planned_state: serde_json::to_vec(&result.planned_state).unwrap_or_default(),
                    changes: result.changes.into_iter().map(Into::into).collect(),
                    requires_replace: result.requires_replace,
                    diagnostics: vec![],
                }))
            }
            Err(e) => {
                error!(resource_type = %req.resource_type, error = %e, "Plan failed");
                Ok(tonic::Response::new(crate::generated::PlanResponse {
                    planned_state: vec![],
                    changes: vec![],
                    requires_replace: false,
                    diagnostics: self.error_to_diagnostics(e),
                }))
            }
        }
    }

    #[instrument(skip(self, request), name = "grpc.create")]
    async fn create(
        &self,
        request: tonic::Request<crate::generated::CreateRequest>,
    ) -> Result<tonic::Response<crate::generated::CreateResponse>, tonic::Status> {
        let req = request.into_inner();
        info!(resource_type = %req.resource_type, "Create called");
        let planned_state =
            serde_json::from_slice(&req.planned_state).unwrap_or(serde_json::Value::Null);

        match self.provider.create(&req.resource_type, planned_state).await {
            Ok((state, diagnostics)) => Ok(tonic::Response::new(crate::generated::CreateResponse {
                state: serde_json::to_vec(&state).unwrap_or_default(),
                diagnostics: self.diagnostics_to_proto(diagnostics),
            })),
            Err(e) => {
                error!(resource_type = %req.resource_type, error = %e, "Create failed");
                Ok(tonic::Response::new(crate::generated::CreateResponse {
                    state: vec![],
                    diagnostics: self.error_to_diagnostics(e),
                }))
            }
        }
    }

    #[instrument(skip(self, request), name = "grpc.read")]
    async fn read(
        &self,
        request: tonic::Request<crate::generated::ReadRequest>,
    ) -> Result<tonic::Response<crate::generated::ReadResponse>, tonic::Status> {
        let req = request.into_inner();
        debug!(resource_type = %req.resource_type, "Read called");
        let current_state =
            serde_json::from_slice(&req.current_state).unwrap_or(serde_json::Value::Null);

        match self.provider.read(&req.resource_type, current_state).await {
            Ok((state, diagnostics)) => Ok(tonic::Response::new(crate::generated::ReadResponse {
                state: serde_json::to_vec(&state).unwrap_or_default(),
                diagnostics: self.diagnostics_to_proto(diagnostics),
            })),
            Err(e) => {
                error!(resource_type = %req.resource_type, error = %e, "Read failed");
                Ok(tonic::Response::new(crate::generated::ReadResponse {
                    state: vec![],
                    diagnostics: self.error_to_diagnostics(e),
                }))
            }
        }
    }

    #[instrument(skip(self, request), name = "grpc.update")]
    async fn update(
        &self,
        request: tonic::Request<crate::generated::UpdateRequest>,
    ) -> Result<tonic::Response<crate::generated::UpdateResponse>, tonic::Status> {
        let req = request.into_inner();
        info!(resource_type = %req.resource_type, "Update called");
        let prior_state =
            serde_json::from_slice(&req.prior_state).unwrap_or(serde_json::Value::Null);
        let planned_state =
            serde_json::from_slice(&req.planned_state).unwrap_or(serde_json::Value::Null);

        match self
            .provider
            .update(&req.resource_type, prior_state, planned_state)
            .await
        {
            Ok((state, diagnostics)) => Ok(tonic::Response::new(crate::generated::UpdateResponse {
                state: serde_json::to_vec(&state).unwrap_or_default(),
                diagnostics: self.diagnostics_to_proto(diagnostics),
            })),
            Err(e) => {
                error!(resource_type = %req.resource_type, error = %e, "Update failed");
                Ok(tonic::Response::new(crate::generated::UpdateResponse {
                    state: vec![],
                    diagnostics: self.error_to_diagnostics(e),
                }))
            }
        }
    }

    #[instrument(skip(self, request), name = "grpc.delete")]
    async fn delete(
        &self,
        request: tonic::Request<crate::generated::DeleteRequest>,
    ) -> Result<tonic::Response<crate::generated::DeleteResponse>, tonic::Status> {
        let req = request.into_inner();
        info!(resource_type = %req.resource_type, "Delete called");
        let current_state =
            serde_json::from_slice(&req.current_state).unwrap_or(serde_json::Value::Null);

        match self.provider.delete(&req.resource_type, current_state).await {
            Ok(()) => Ok(tonic::Response::new(crate::generated::DeleteResponse {
                diagnostics: vec![],
            })),
            Err(e) => {
                error!(resource_type = %req.resource_type, error = %e, "Delete failed");
                Ok(tonic::Response::new(crate::generated::DeleteResponse {
                    diagnostics: self.error_to_diagnostics(e),
                }))
            }
        }
    }

    #[instrument(skip(self, request), name = "grpc.import_resource_state")]
    async fn import_resource_state(
        &self,
        request: tonic::Request<crate::generated::ImportResourceStateRequest>,
    ) -> Result<tonic::Response<crate::generated::ImportResourceStateResponse>, tonic::Status> {
        let req = request.into_inner();
        info!(resource_type = %req.resource_type, id = %req.id, "ImportResourceState called");

        match self.provider.import_resource(&req.resource_type, &req.id).await {
            Ok((imported, diagnostics)) => Ok(tonic::Response::new(
                crate::generated::ImportResourceStateResponse {
                    imported: imported
                        .into_iter()
                        .map(|r| crate::generated::ImportedResource {
                            resource_type: r.resource_type,
                            state: serde_json::to_vec(&r.state).unwrap_or_default(),
                        })
                        .collect(),
                    diagnostics: self.diagnostics_to_proto(diagnostics),
                },
            )),
            Err(e) => {
                error!(resource_type = %req.resource_type, id = %req.id, error = %e, "ImportResourceState failed");
                Ok(tonic::Response::new(
                    crate::generated::ImportResourceStateResponse {
                        imported: vec![],
                        diagnostics: self.error_to_diagnostics(e),
                    },
                ))
            }
        }
    }

    #[instrument(skip(self, request), name = "grpc.validate_data_source_config")]
    async fn validate_data_source_config(
        &self,
        request: tonic::Request<crate::generated::ValidateDataSourceConfigRequest>,
    ) -> Result<tonic::Response<crate::generated::ValidateDataSourceConfigResponse>, tonic::Status>
    {
        let req = request.into_inner();
        let config = serde_json::from_slice(&req.config).unwrap_or(serde_json::Value::Null);

        match self
            .provider
            .validate_data_source_config(&req.data_source_type, config)
            .await
        {
            Ok(diagnostics) => Ok(tonic::Response::new(
                crate::generated::ValidateDataSourceConfigResponse {
                    diagnostics: self.diagnostics_to_proto(diagnostics),
                },
            )),
            Err(e) => {
                error!(data_source_type = %req.data_source_type, error = %e, "ValidateDataSourceConfig failed");
                Ok(tonic::Response::new(
                    crate::generated::ValidateDataSourceConfigResponse {
                        diagnostics: self.error_to_diagnostics(e),
                    },
                ))
            }
        }
    }

    #[instrument(skip(self, request), name = "grpc.read_data_source")]
    async fn read_data_source(
        &self,
        request: tonic::Request<crate::generated::ReadDataSourceRequest>,
    ) -> Result<tonic::Response<crate::generated::ReadDataSourceResponse>, tonic::Status> {
        let req = request.into_inner();
        debug!(data_source_type = %req.data_source_type, "ReadDataSource called");
        let config = serde_json::from_slice(&req.config).unwrap_or(serde_json::Value::Null);

        match self
            .provider
            .read_data_source(&req.data_source_type, config)
            .await
        {
            Ok((state, diagnostics)) => Ok(tonic::Response::new(
                crate::generated::ReadDataSourceResponse {
                    state: serde_json::to_vec(&state).unwrap_or_default(),
                    diagnostics: self.diagnostics_to_proto(diagnostics),
                },
            )),
            Err(e) => {
                error!(data_source_type = %req.data_source_type, error = %e, "ReadDataSource failed");
                Ok(tonic::Response::new(
                    crate::generated::ReadDataSourceResponse {
                        state: vec![],
                        diagnostics: self.error_to_diagnostics(e),
                    },
                ))
            }
        }
    }
}

/// Options for configuring the provider server.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// How long to wait for in-flight requests after a shutdown signal.
    pub shutdown_timeout: Duration,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl ServeOptions {
    /// Create new serve options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shutdown timeout.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");
        let mut sigint = signal(SignalKind::interrupt()).expect("Failed to install SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {
                eprintln!("Received SIGTERM, initiating graceful shutdown...");
            }
            _ = sigint.recv() => {
                eprintln!("Received SIGINT, initiating graceful shutdown...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C handler");
        eprintln!("Received CTRL+C, initiating graceful shutdown...");
    }
}

/// Serve a provider implementation as a gRPC plugin.
///
/// Binds an ephemeral local port, prints the handshake
/// `HEMMER_PROVIDER|<version>|<address>` to stdout, and runs until a
/// shutdown signal arrives.
pub async fn serve<P: ProviderService>(provider: P) -> Result<(), Box<dyn std::error::Error>> {
    serve_with_options(provider, ServeOptions::default()).await
}

/// Serve a provider with custom shutdown options.
pub async fn serve_with_options<P: ProviderService>(
    provider: P,
    options: ServeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    serve_on_listener(provider, listener, addr, options, wait_for_shutdown_signal()).await
}

async fn serve_on_listener<P: ProviderService>(
    provider: P,
    listener: TcpListener,
    addr: SocketAddr,
    options: ServeOptions,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}|{}|{}", HANDSHAKE_PREFIX, PROTOCOL_VERSION, addr);

    info!(address = %addr, "Provider server starting");

    let provider = Arc::new(provider);
    let provider_for_shutdown = Arc::clone(&provider);

    let grpc_service = ProviderGrpcService { provider };
    let server = crate::generated::provider_server::ProviderServer::new(grpc_service);

    // The drain channel fires once the shutdown signal has been observed;
    // only the drain of in-flight calls runs against the timeout, never
    // the server's normal uptime.
    let (drain_tx, drain_rx) = tokio::sync::oneshot::channel::<()>();
    let server_future = Server::builder().add_service(server).serve_with_incoming_shutdown(
        tokio_stream::wrappers::TcpListenerStream::new(listener),
        async move {
            shutdown.await;
            let _ = drain_tx.send(());
        },
    );
    tokio::pin!(server_future);

    tokio::select! {
        result = &mut server_future => match result {
            Ok(()) => info!("Server shutdown complete"),
            Err(e) => {
                error!(error = %e, "Server error");
                return Err(e.into());
            }
        },
        _ = drain_rx => {
            match tokio::time::timeout(options.shutdown_timeout, &mut server_future).await {
                Ok(Ok(())) => info!("Server shutdown complete"),
                Ok(Err(e)) => {
                    error!(error = %e, "Server error during shutdown");
                    return Err(e.into());
                }
                Err(_) => {
                    warn!(timeout = ?options.shutdown_timeout, "Shutdown timeout exceeded, forcing shutdown");
                }
            }
        }
    }

    if let Err(e) = provider_for_shutdown.stop().await {
        warn!(error = %e, "Provider stop() returned error");
    }

    info!("Provider shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    use crate::plugin::schema::ProviderSchema;
    use crate::plugin::service::PlanResult;

    struct NullProvider;

    #[async_trait::async_trait]
    impl ProviderService for NullProvider {
        fn schema(&self) -> ProviderSchema {
            ProviderSchema::new()
        }

        async fn configure(&self, _config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
            Ok(vec![])
        }

        async fn plan(
            &self,
            _resource_type: &str,
            _prior_state: Option<Value>,
            proposed_state: Value,
            _config: Value,
        ) -> Result<PlanResult, ProviderError> {
            Ok(PlanResult::no_change(proposed_state))
        }

        async fn create(
            &self,
            _resource_type: &str,
            planned_state: Value,
        ) -> Result<(Value, Vec<Diagnostic>), ProviderError> {
            Ok((planned_state, vec![]))
        }

        async fn read(
            &self,
            _resource_type: &str,
            current_state: Value,
        ) -> Result<(Value, Vec<Diagnostic>), ProviderError> {
            Ok((current_state, vec![]))
        }

        async fn update(
            &self,
            _resource_type: &str,
            _prior_state: Value,
            planned_state: Value,
        ) -> Result<(Value, Vec<Diagnostic>), ProviderError> {
            Ok((planned_state, vec![]))
        }

        async fn delete(&self, _resource_type: &str, _current_state: Value) -> Result<(), ProviderError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_shutdown_timeout_only_bounds_the_drain() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let options = ServeOptions::new().with_shutdown_timeout(Duration::from_millis(10));

        // A timeout far shorter than the server's lifetime must not cut
        // the server down before the shutdown future resolves.
        let started = std::time::Instant::now();
        serve_on_listener(NullProvider, listener, addr, options, async {
            tokio::time::sleep(Duration::from_millis(200)).await;
        })
        .await
        .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(200));
    }
}
