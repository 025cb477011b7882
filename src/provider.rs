//! The Radarr provider: schemas, lifecycle, and resource dispatch.
//!
//! Every managed resource flows through one of four shapes: a variant of
//! a polymorphic family (download clients, indexers, notifications), the
//! custom format with its nested specification set, the tag, or a
//! singleton configuration object. The dispatch here is thin; the
//! marshalling lives in the codec modules.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::api::{CustomFormat, Envelope, RadarrClient, Tag};
use crate::error::ProviderError;
use crate::fields::snake_case;
use crate::plugin::schema::{
    Attribute, AttributeFlags, AttributeType, Block, Diagnostic, DiagnosticSeverity, NestedBlock,
    ProviderSchema, Schema,
};
use crate::plugin::service::{AttributeChange, ImportedResource, PlanResult, ProviderService};
use crate::plugin::validation;
use crate::secrets;
use crate::singleton::{self, SingletonSpec};
use crate::value::{AttrValue, Kind};
use crate::variants::{self, Family, VariantSpec};

/// Environment fallback for the provider `url` attribute.
pub const ENV_URL: &str = "RADARR_URL";
/// Environment fallback for the provider `api_key` attribute.
pub const ENV_API_KEY: &str = "RADARR_API_KEY";

const TAG_RESOURCE: &str = "radarr_tag";
const CUSTOM_FORMAT_RESOURCE: &str = "radarr_custom_format";
const CUSTOM_FORMAT_ENDPOINT: &str = "customformat";
const TAG_ENDPOINT: &str = "tag";

/// The provider implementation served over the plugin protocol.
pub struct RadarrProvider {
    client: RwLock<Option<Arc<RadarrClient>>>,
}

impl RadarrProvider {
    /// Create an unconfigured provider.
    pub fn new() -> Self {
        Self {
            client: RwLock::new(None),
        }
    }

    async fn client(&self) -> Result<Arc<RadarrClient>, ProviderError> {
        self.client
            .read()
            .await
            .clone()
            .ok_or(ProviderError::NotConfigured)
    }

    async fn put_singleton(
        &self,
        spec: &'static SingletonSpec,
        state: &Value,
    ) -> Result<Value, ProviderError> {
        let client = self.client().await?;
        let record = spec.record_from_state(state);
        let observed: Value = client
            .put(spec.endpoint, &spec.to_wire(&record))
            .await
            .map_err(|e| ProviderError::client("update", spec.resource, e))?;
        Ok(spec.from_wire(&observed).to_state())
    }
}

impl Default for RadarrProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn kind_to_type(kind: Kind) -> AttributeType {
    match kind {
        Kind::Bool => AttributeType::Bool,
        Kind::Int => AttributeType::Int64,
        Kind::Str => AttributeType::String,
        Kind::IntSet => AttributeType::set(AttributeType::Int64),
        Kind::StrSet => AttributeType::set(AttributeType::String),
    }
}

fn variant_schema(variant: &VariantSpec) -> Schema {
    let family = variant.family_spec();
    let mut schema = Schema::v0()
        .with_attribute("id", Attribute::computed_int64())
        .with_attribute("name", Attribute::required_string())
        .with_attribute("implementation", Attribute::computed_string())
        .with_attribute("config_contract", Attribute::computed_string())
        .with_attribute(
            "tags",
            Attribute::new(
                AttributeType::set(AttributeType::Int64),
                AttributeFlags::optional_computed(),
            ),
        );
    if variant.protocol.is_some() {
        schema = schema.with_attribute("protocol", Attribute::computed_string());
    }
    // flat flags come back on every server read, so plain optional would
    // report them as churn on the next plan
    for &wire in family.flat_bools {
        schema = schema.with_attribute(
            snake_case(wire),
            Attribute::new(AttributeType::Bool, AttributeFlags::optional_computed()),
        );
    }
    for &wire in family.flat_ints {
        schema = schema.with_attribute(
            snake_case(wire),
            Attribute::new(AttributeType::Int64, AttributeFlags::optional_computed()),
        );
    }
    for &wire in variant.attrs {
        let Some(kind) = family.fields.kind_of(wire) else { continue };
        let mut attr = Attribute::new(kind_to_type(kind), AttributeFlags::optional());
        if variant.sensitive.contains(&wire) {
            attr = attr.sensitive();
        }
        for (name, validator) in variant.validators {
            if *name == wire {
                attr = attr.with_validator(validator.to_schema());
            }
        }
        schema = schema.with_attribute(snake_case(wire), attr);
    }
    schema
}

fn family_data_source_schema(family: Family) -> Schema {
    let spec = family.spec();
    // a field is redacted in data source output whenever any variant of
    // the family treats it as a secret
    let sensitive: BTreeSet<&str> = variants::VARIANTS
        .iter()
        .filter(|v| v.family == family)
        .flat_map(|v| v.sensitive.iter().copied())
        .collect();
    let mut schema = Schema::v0()
        .with_attribute("name", Attribute::required_string())
        .with_attribute("id", Attribute::computed_int64())
        .with_attribute("implementation", Attribute::computed_string())
        .with_attribute("config_contract", Attribute::computed_string())
        .with_attribute("protocol", Attribute::computed_string())
        .with_attribute(
            "tags",
            Attribute::new(
                AttributeType::set(AttributeType::Int64),
                AttributeFlags::computed(),
            ),
        );
    for &wire in spec.flat_bools {
        schema = schema.with_attribute(
            snake_case(wire),
            Attribute::new(AttributeType::Bool, AttributeFlags::computed()),
        );
    }
    for &wire in spec.flat_ints {
        schema = schema.with_attribute(snake_case(wire), Attribute::computed_int64());
    }
    for (kind, names) in spec.fields.buckets() {
        for &wire in names {
            let mut attr = Attribute::new(kind_to_type(kind), AttributeFlags::computed());
            if sensitive.contains(wire) {
                attr = attr.sensitive();
            }
            schema = schema.with_attribute(snake_case(wire), attr);
        }
    }
    schema
}

fn custom_format_schema() -> Schema {
    let implementations: Vec<String> = variants::SPECIFICATIONS
        .iter()
        .map(|s| s.implementation.to_string())
        .collect();
    let specification = Block::new()
        .with_attribute("name", Attribute::required_string())
        .with_attribute(
            "implementation",
            Attribute::required_string().with_validator(
                crate::plugin::schema::Validator::StringOneOf(implementations),
            ),
        )
        .with_attribute("negate", Attribute::optional_bool().with_default(json!(false)))
        .with_attribute("required", Attribute::optional_bool().with_default(json!(false)))
        .with_attribute("value", Attribute::optional_string())
        .with_attribute("min", Attribute::optional_int64())
        .with_attribute("max", Attribute::optional_int64());

    Schema::v0()
        .with_attribute("id", Attribute::computed_int64())
        .with_attribute("name", Attribute::required_string())
        .with_attribute(
            "include_custom_format_when_renaming",
            Attribute::optional_bool().with_default(json!(false)),
        )
        .with_block(
            "specification",
            NestedBlock::set(specification).with_min_items(1),
        )
}

fn singleton_schema(spec: &SingletonSpec) -> Schema {
    let mut schema = Schema::v0().with_attribute("id", Attribute::computed_int64());
    for &wire in spec.bools {
        schema = schema.with_attribute(snake_case(wire), Attribute::optional_bool());
    }
    for &wire in spec.ints {
        schema = schema.with_attribute(snake_case(wire), Attribute::optional_int64());
    }
    for &wire in spec.strings {
        schema = schema.with_attribute(snake_case(wire), Attribute::optional_string());
    }
    schema
}

fn family_for_data_source(data_source_type: &str) -> Option<Family> {
    match data_source_type {
        "radarr_download_client" => Some(Family::DownloadClient),
        "radarr_indexer" => Some(Family::Indexer),
        "radarr_notification" => Some(Family::Notification),
        _ => None,
    }
}

/// Top-level diff between a prior state object and the planned one.
fn diff_objects(prior: Option<&Value>, planned: &Value) -> Vec<AttributeChange> {
    let empty = Map::new();
    let before = prior.and_then(Value::as_object).unwrap_or(&empty);
    let after = planned.as_object().unwrap_or(&empty);

    let keys: BTreeSet<&String> = before.keys().chain(after.keys()).collect();
    let mut changes = Vec::new();
    for key in keys {
        match (before.get(key), after.get(key)) {
            (Some(b), Some(a)) if b == a => {}
            (Some(b), Some(a)) => changes.push(AttributeChange::modified(key, b.clone(), a.clone())),
            (Some(b), None) => changes.push(AttributeChange::removed(key, b.clone())),
            (None, Some(a)) => changes.push(AttributeChange::added(key, a.clone())),
            (None, None) => {}
        }
    }
    changes
}

fn state_id(state: &Value) -> Result<i64, ProviderError> {
    state
        .get("id")
        .and_then(Value::as_i64)
        .filter(|id| *id > 0)
        .ok_or_else(|| ProviderError::Validation("state carries no server-assigned id".into()))
}

fn log_diagnostics(resource: &str, diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        warn!(
            resource,
            attribute = diag.attribute.as_deref().unwrap_or(""),
            "{}",
            diag.summary
        );
    }
}

fn string_or_env(config: &Value, attr: &str, env: &str) -> Option<String> {
    config
        .get(attr)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .or_else(|| std::env::var(env).ok().filter(|s| !s.is_empty()))
}

/// Encode a custom format state object into its wire form.
fn custom_format_to_wire(state: &Value) -> Result<CustomFormat, ProviderError> {
    let obj = state
        .as_object()
        .ok_or_else(|| ProviderError::Validation("custom format config must be an object".into()))?;

    let mut format = CustomFormat {
        id: obj.get("id").and_then(Value::as_i64).unwrap_or(0),
        name: obj.get("name").and_then(Value::as_str).map(String::from),
        include_custom_format_when_renaming: obj
            .get("include_custom_format_when_renaming")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        specifications: Vec::new(),
    };

    if let Some(blocks) = obj.get("specification").and_then(Value::as_array) {
        for block in blocks {
            let implementation = block
                .get("implementation")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    ProviderError::Validation("specification block requires 'implementation'".into())
                })?;
            let spec = variants::specification_for_implementation(implementation).ok_or_else(|| {
                ProviderError::Validation(format!(
                    "unknown specification implementation '{}'",
                    implementation
                ))
            })?;
            let record = spec.record_from_state(block);
            format.specifications.push(spec.to_wire(&record));
        }
    }
    Ok(format)
}

/// Decode a wire custom format into the state shape plus any decode
/// diagnostics from the specification blocks.
fn custom_format_from_wire(format: &CustomFormat) -> (Value, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let mut obj = Map::new();
    obj.insert("id".to_string(), json!(format.id));
    if let Some(name) = &format.name {
        obj.insert("name".to_string(), json!(name));
    }
    obj.insert(
        "include_custom_format_when_renaming".to_string(),
        json!(format.include_custom_format_when_renaming),
    );

    let mut blocks = Vec::new();
    for envelope in &format.specifications {
        let Some(implementation) = envelope.implementation.as_deref() else { continue };
        let Some(spec) = variants::specification_for_implementation(implementation) else {
            diagnostics.push(
                Diagnostic::warning("Skipped unknown specification implementation")
                    .with_detail(implementation.to_string()),
            );
            continue;
        };
        let (record, block_diagnostics) = spec.from_wire(envelope);
        diagnostics.extend(block_diagnostics);
        let mut block = record.to_state();
        if let Some(b) = block.as_object_mut() {
            // envelope-common slots the specification block does not carry
            b.remove("id");
            b.remove("tags");
            b.remove("config_contract");
            b.remove("protocol");
        }
        blocks.push(block);
    }
    obj.insert("specification".to_string(), Value::Array(blocks));
    (Value::Object(obj), diagnostics)
}

#[async_trait::async_trait]
impl ProviderService for RadarrProvider {
    fn schema(&self) -> ProviderSchema {
        let mut schema = ProviderSchema::new().with_provider_config(
            Schema::v0()
                .with_attribute(
                    "url",
                    Attribute::optional_string()
                        .with_description("Base URL of the Radarr server; falls back to RADARR_URL"),
                )
                .with_attribute(
                    "api_key",
                    Attribute::optional_string()
                        .sensitive()
                        .with_description("API key; falls back to RADARR_API_KEY"),
                ),
        );

        for variant in variants::VARIANTS {
            schema = schema.with_resource(variant.resource, variant_schema(variant));
        }
        schema = schema.with_resource(CUSTOM_FORMAT_RESOURCE, custom_format_schema());
        schema = schema.with_resource(
            TAG_RESOURCE,
            Schema::v0()
                .with_attribute("id", Attribute::computed_int64())
                .with_attribute("label", Attribute::required_string()),
        );
        for singleton_spec in singleton::SINGLETONS {
            schema = schema.with_resource(singleton_spec.resource, singleton_schema(singleton_spec));
        }

        schema = schema
            .with_data_source(
                "radarr_download_client",
                family_data_source_schema(Family::DownloadClient),
            )
            .with_data_source("radarr_indexer", family_data_source_schema(Family::Indexer))
            .with_data_source(
                "radarr_notification",
                family_data_source_schema(Family::Notification),
            )
            .with_data_source(
                TAG_RESOURCE,
                Schema::v0()
                    .with_attribute("label", Attribute::required_string())
                    .with_attribute("id", Attribute::computed_int64()),
            );
        schema
    }

    async fn validate_provider_config(
        &self,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        Ok(validation::validate(&self.schema().provider, &config))
    }

    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let url = string_or_env(&config, "url", ENV_URL);
        let api_key = string_or_env(&config, "api_key", ENV_API_KEY);

        let (Some(url), Some(api_key)) = (url, api_key) else {
            return Ok(vec![Diagnostic::error("Missing provider configuration")
                .with_detail(
                    "Both url and api_key are required, either in the provider block \
                     or via RADARR_URL / RADARR_API_KEY",
                )]);
        };

        let client = RadarrClient::new(&url, &api_key)
            .map_err(|e| ProviderError::Configuration(e.to_string()))?;
        *self.client.write().await = Some(Arc::new(client));
        info!(url = %url, "provider configured");
        Ok(vec![])
    }

    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let schemas = self.schema();
        let schema = schemas
            .resources
            .get(resource_type)
            .ok_or_else(|| ProviderError::UnknownResource(resource_type.to_string()))?;
        Ok(validation::validate(schema, &config))
    }

    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
        _config: Value,
    ) -> Result<PlanResult, ProviderError> {
        if proposed_state.is_null() {
            // destroy plan
            let changes = diff_objects(prior_state.as_ref(), &Value::Null);
            return Ok(PlanResult::with_changes(Value::Null, changes, false));
        }

        let diagnostics = self
            .validate_resource_config(resource_type, proposed_state.clone())
            .await?;
        let errors: Vec<String> = diagnostics
            .iter()
            .filter(|d| matches!(d.severity, DiagnosticSeverity::Error))
            .map(|d| d.summary.clone())
            .collect();
        if !errors.is_empty() {
            return Err(ProviderError::Validation(errors.join("; ")));
        }

        let mut planned = proposed_state;
        if let Some(obj) = planned.as_object_mut() {
            if let Some(id) = prior_state.as_ref().and_then(|p| p.get("id")).cloned() {
                obj.insert("id".to_string(), id);
            }
            if let Some(variant) = variants::variant_for(resource_type) {
                obj.insert("implementation".to_string(), json!(variant.implementation));
                obj.insert("config_contract".to_string(), json!(variant.config_contract));
                if let Some(protocol) = variant.protocol {
                    obj.insert("protocol".to_string(), json!(protocol));
                }
            }
            if singleton::singleton_for(resource_type).is_some() {
                obj.insert("id".to_string(), json!(1));
            }
        }

        let changes = diff_objects(prior_state.as_ref(), &planned);
        Ok(PlanResult::with_changes(planned, changes, false))
    }

    async fn create(
        &self,
        resource_type: &str,
        planned_state: Value,
    ) -> Result<(Value, Vec<Diagnostic>), ProviderError> {
        if let Some(variant) = variants::variant_for(resource_type) {
            let client = self.client().await?;
            let planned = variant.record_from_state(&planned_state);
            let observed: Envelope = client
                .post(variant.family_spec().endpoint, &variant.to_wire(&planned))
                .await
                .map_err(|e| ProviderError::client("create", resource_type, e))?;
            let (mut record, diagnostics) = variant.from_wire(&observed);
            log_diagnostics(resource_type, &diagnostics);
            secrets::reconcile(&mut record, &planned, &variant.sensitive_attrs());
            return Ok((record.to_state(), diagnostics));
        }
        if let Some(spec) = singleton::singleton_for(resource_type) {
            // singletons always exist server-side; create is a full PUT
            let state = self.put_singleton(spec, &planned_state).await?;
            return Ok((state, vec![]));
        }
        match resource_type {
            TAG_RESOURCE => {
                let client = self.client().await?;
                let label = planned_state
                    .get("label")
                    .and_then(Value::as_str)
                    .ok_or_else(|| ProviderError::Validation("tag requires 'label'".into()))?;
                let created: Tag = client
                    .post(
                        TAG_ENDPOINT,
                        &Tag {
                            id: 0,
                            label: label.to_string(),
                        },
                    )
                    .await
                    .map_err(|e| ProviderError::client("create", resource_type, e))?;
                Ok((json!({"id": created.id, "label": created.label}), vec![]))
            }
            CUSTOM_FORMAT_RESOURCE => {
                let client = self.client().await?;
                let payload = custom_format_to_wire(&planned_state)?;
                let created: CustomFormat = client
                    .post(CUSTOM_FORMAT_ENDPOINT, &payload)
                    .await
                    .map_err(|e| ProviderError::client("create", resource_type, e))?;
                let (state, diagnostics) = custom_format_from_wire(&created);
                log_diagnostics(resource_type, &diagnostics);
                Ok((state, diagnostics))
            }
            _ => Err(ProviderError::UnknownResource(resource_type.to_string())),
        }
    }

    async fn read(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<(Value, Vec<Diagnostic>), ProviderError> {
        if let Some(variant) = variants::variant_for(resource_type) {
            let client = self.client().await?;
            let id = state_id(&current_state)?;
            let path = format!("{}/{}", variant.family_spec().endpoint, id);
            let observed: Envelope = match client.get(&path).await {
                Ok(envelope) => envelope,
                Err(e) if e.is_not_found() => return Ok((Value::Null, vec![])),
                Err(e) => return Err(ProviderError::client("read", resource_type, e)),
            };
            let prior = variant.record_from_state(&current_state);
            let (mut record, diagnostics) = variant.from_wire(&observed);
            log_diagnostics(resource_type, &diagnostics);
            secrets::reconcile(&mut record, &prior, &variant.sensitive_attrs());
            return Ok((record.to_state(), diagnostics));
        }
        if let Some(spec) = singleton::singleton_for(resource_type) {
            let client = self.client().await?;
            let observed: Value = client
                .get(spec.endpoint)
                .await
                .map_err(|e| ProviderError::client("read", resource_type, e))?;
            return Ok((spec.from_wire(&observed).to_state(), vec![]));
        }
        match resource_type {
            TAG_RESOURCE => {
                let client = self.client().await?;
                let id = state_id(&current_state)?;
                let observed: Tag = match client.get(&format!("{}/{}", TAG_ENDPOINT, id)).await {
                    Ok(tag) => tag,
                    Err(e) if e.is_not_found() => return Ok((Value::Null, vec![])),
                    Err(e) => return Err(ProviderError::client("read", resource_type, e)),
                };
                Ok((json!({"id": observed.id, "label": observed.label}), vec![]))
            }
            CUSTOM_FORMAT_RESOURCE => {
                let client = self.client().await?;
                let id = state_id(&current_state)?;
                let observed: CustomFormat =
                    match client.get(&format!("{}/{}", CUSTOM_FORMAT_ENDPOINT, id)).await {
                        Ok(format) => format,
                        Err(e) if e.is_not_found() => return Ok((Value::Null, vec![])),
                        Err(e) => return Err(ProviderError::client("read", resource_type, e)),
                    };
                let (state, diagnostics) = custom_format_from_wire(&observed);
                log_diagnostics(resource_type, &diagnostics);
                Ok((state, diagnostics))
            }
            _ => Err(ProviderError::UnknownResource(resource_type.to_string())),
        }
    }

    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<(Value, Vec<Diagnostic>), ProviderError> {
        if let Some(variant) = variants::variant_for(resource_type) {
            let client = self.client().await?;
            let id = state_id(&planned_state).or_else(|_| state_id(&prior_state))?;
            let mut planned = variant.record_from_state(&planned_state);
            planned.set("id", AttrValue::Int(id));
            let path = format!("{}/{}", variant.family_spec().endpoint, id);
            let observed: Envelope = client
                .put(&path, &variant.to_wire(&planned))
                .await
                .map_err(|e| ProviderError::client("update", resource_type, e))?;
            let (mut record, diagnostics) = variant.from_wire(&observed);
            log_diagnostics(resource_type, &diagnostics);
            secrets::reconcile(&mut record, &planned, &variant.sensitive_attrs());
            return Ok((record.to_state(), diagnostics));
        }
        if let Some(spec) = singleton::singleton_for(resource_type) {
            let state = self.put_singleton(spec, &planned_state).await?;
            return Ok((state, vec![]));
        }
        match resource_type {
            TAG_RESOURCE => {
                let client = self.client().await?;
                let id = state_id(&planned_state).or_else(|_| state_id(&prior_state))?;
                let label = planned_state
                    .get("label")
                    .and_then(Value::as_str)
                    .ok_or_else(|| ProviderError::Validation("tag requires 'label'".into()))?;
                let updated: Tag = client
                    .put(
                        &format!("{}/{}", TAG_ENDPOINT, id),
                        &Tag {
                            id,
                            label: label.to_string(),
                        },
                    )
                    .await
                    .map_err(|e| ProviderError::client("update", resource_type, e))?;
                Ok((json!({"id": updated.id, "label": updated.label}), vec![]))
            }
            CUSTOM_FORMAT_RESOURCE => {
                let client = self.client().await?;
                let id = state_id(&planned_state).or_else(|_| state_id(&prior_state))?;
                let mut payload = custom_format_to_wire(&planned_state)?;
                payload.id = id;
                let updated: CustomFormat = client
                    .put(&format!("{}/{}", CUSTOM_FORMAT_ENDPOINT, id), &payload)
                    .await
                    .map_err(|e| ProviderError::client("update", resource_type, e))?;
                let (state, diagnostics) = custom_format_from_wire(&updated);
                log_diagnostics(resource_type, &diagnostics);
                Ok((state, diagnostics))
            }
            _ => Err(ProviderError::UnknownResource(resource_type.to_string())),
        }
    }

    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError> {
        if singleton::singleton_for(resource_type).is_some() {
            // singletons cannot be deleted server-side; forgetting state is enough
            info!(resource_type, "singleton removed from state only");
            return Ok(());
        }
        let endpoint = if let Some(variant) = variants::variant_for(resource_type) {
            variant.family_spec().endpoint
        } else {
            match resource_type {
                TAG_RESOURCE => TAG_ENDPOINT,
                CUSTOM_FORMAT_RESOURCE => CUSTOM_FORMAT_ENDPOINT,
                _ => return Err(ProviderError::UnknownResource(resource_type.to_string())),
            }
        };
        let client = self.client().await?;
        let id = state_id(&current_state)?;
        match client.delete(&format!("{}/{}", endpoint, id)).await {
            Ok(()) => Ok(()),
            // already gone, which is what we wanted
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(ProviderError::client("delete", resource_type, e)),
        }
    }

    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<(Vec<ImportedResource>, Vec<Diagnostic>), ProviderError> {
        if singleton::singleton_for(resource_type).is_some() {
            // the server holds one instance regardless of the identifier
            // given, so any import-id maps onto id 1
            let (mut state, diagnostics) = self.read(resource_type, json!({"id": 1})).await?;
            if let Some(obj) = state.as_object_mut() {
                obj.insert("id".to_string(), json!(1));
            }
            return Ok((vec![ImportedResource::new(resource_type, state)], diagnostics));
        }
        let numeric: i64 = id
            .trim()
            .parse()
            .map_err(|_| ProviderError::ImportIdentifier(id.to_string()))?;
        let (state, diagnostics) = self.read(resource_type, json!({"id": numeric})).await?;
        if state.is_null() {
            return Err(ProviderError::NotFound(format!(
                "{} with id {}",
                resource_type, numeric
            )));
        }
        Ok((vec![ImportedResource::new(resource_type, state)], diagnostics))
    }

    async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let schemas = self.schema();
        let schema = schemas
            .data_sources
            .get(data_source_type)
            .ok_or_else(|| ProviderError::UnknownResource(data_source_type.to_string()))?;
        Ok(validation::validate(schema, &config))
    }

    async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<(Value, Vec<Diagnostic>), ProviderError> {
        if let Some(family) = family_for_data_source(data_source_type) {
            let client = self.client().await?;
            let name = config
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| ProviderError::Validation("data source requires 'name'".into()))?;
            let list: Vec<Envelope> = client
                .get(family.spec().endpoint)
                .await
                .map_err(|e| ProviderError::client("read", data_source_type, e))?;
            let envelope = list
                .iter()
                .find(|e| e.name.as_deref() == Some(name))
                .ok_or_else(|| {
                    ProviderError::NotFound(format!("{} named '{}'", data_source_type, name))
                })?;
            let (record, diagnostics) = family.spec().decode(envelope);
            log_diagnostics(data_source_type, &diagnostics);
            return Ok((record.to_state(), diagnostics));
        }
        match data_source_type {
            TAG_RESOURCE => {
                let client = self.client().await?;
                let label = config
                    .get("label")
                    .and_then(Value::as_str)
                    .ok_or_else(|| ProviderError::Validation("data source requires 'label'".into()))?;
                let tags: Vec<Tag> = client
                    .get(TAG_ENDPOINT)
                    .await
                    .map_err(|e| ProviderError::client("read", data_source_type, e))?;
                let tag = tags.iter().find(|t| t.label == label).ok_or_else(|| {
                    ProviderError::NotFound(format!("tag labelled '{}'", label))
                })?;
                Ok((json!({"id": tag.id, "label": tag.label}), vec![]))
            }
            _ => Err(ProviderError::UnknownResource(data_source_type.to_string())),
        }
    }
}
