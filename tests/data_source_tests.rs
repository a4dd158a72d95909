//! Data Source Read Tests
//!
//! Drives the `schemaregistry_schema` data source through the provider with an
//! in-memory registry standing in for the HTTP client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;

use schemaregistry_provider::{
    format_schema_version_id, Provider, ProviderError, RegistryReference, RegistrySchema,
    SchemaDataSource, SchemaRegistryClient, SubjectConfig, SCHEMA_DATA_SOURCE,
};

#[derive(Default)]
struct FakeRegistry {
    latest: HashMap<String, RegistrySchema>,
    calls: AtomicUsize,
}

impl FakeRegistry {
    fn with_schema(mut self, schema: RegistrySchema) -> Self {
        self.latest.insert(schema.subject.clone(), schema);
        self
    }
}

impl SchemaRegistryClient for FakeRegistry {
    fn get_latest_schema(&self, subject: &str) -> schemaregistry_provider::Result<RegistrySchema> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.latest.get(subject).cloned().ok_or_else(|| ProviderError::Registry {
            status: 404,
            error_code: ProviderError::SUBJECT_NOT_FOUND,
            message: format!("Subject '{}' not found.", subject),
        })
    }
}

fn reference(name: &str, subject: &str, version: i64) -> RegistryReference {
    RegistryReference {
        name: name.to_string(),
        subject: subject.to_string(),
        version,
    }
}

fn orders_value() -> RegistrySchema {
    RegistrySchema {
        subject: "orders-value".to_string(),
        version: 3,
        id: 42,
        schema: r#"{"type":"record","name":"Order","fields":[]}"#.to_string(),
        references: vec![reference("common.Money", "common-money", 1)],
    }
}

fn customer_value() -> RegistrySchema {
    RegistrySchema {
        subject: "customer-value".to_string(),
        version: 1,
        id: 7,
        schema: r#""string""#.to_string(),
        references: vec![],
    }
}

fn provider(registry: FakeRegistry) -> (Provider, Arc<FakeRegistry>) {
    let registry = Arc::new(registry);
    (Provider::with_client(registry.clone()), registry)
}

// =============================================================================
// Successful reads
// =============================================================================

#[test]
fn test_orders_value_example() {
    let (provider, _) = provider(FakeRegistry::default().with_schema(orders_value()));

    let response = provider.read_data_source(SCHEMA_DATA_SOURCE, &json!({ "subject": "orders-value" }));

    assert!(response.is_success(), "diagnostics: {:?}", response.diagnostics);
    assert_eq!(
        response.state.unwrap(),
        json!({
            "id": "orders-value",
            "subject": "orders-value",
            "version": 3,
            "schema_id": 42,
            "schema": r#"{"type":"record","name":"Order","fields":[]}"#,
            "references": [
                { "name": "common.Money", "subject": "common-money", "version": 1 }
            ]
        })
    );
}

#[test]
fn test_zero_references_yield_empty_list() {
    let (provider, _) = provider(FakeRegistry::default().with_schema(customer_value()));

    let state = provider
        .read_data_source(SCHEMA_DATA_SOURCE, &json!({ "subject": "customer-value" }))
        .state
        .unwrap();

    assert_eq!(state["references"], json!([]));
    assert_eq!(state["version"], json!(1));
    assert_eq!(state["schema_id"], json!(7));
    assert_eq!(state["schema"], json!(r#""string""#));
}

#[test]
fn test_references_keep_count_and_order() {
    let mut schema = orders_value();
    schema.references = vec![
        reference("common.Money", "common-money", 1),
        reference("common.Address", "common-address", 4),
        reference("common.Currency", "common-currency", 2),
    ];
    let ds = SchemaDataSource::new(FakeRegistry::default().with_schema(schema.clone()));

    let state = ds.read(&SubjectConfig::new("orders-value").unwrap()).unwrap();

    assert_eq!(state.references.len(), schema.references.len());
    for (out, src) in state.references.iter().zip(&schema.references) {
        assert_eq!(out.name, src.name);
        assert_eq!(out.subject, src.subject);
        assert_eq!(out.version, src.version);
    }
}

#[test]
fn test_reads_are_idempotent() {
    let (provider, registry) = provider(FakeRegistry::default().with_schema(orders_value()));
    let config = json!({ "subject": "orders-value" });

    let first = provider.read_data_source(SCHEMA_DATA_SOURCE, &config);
    let second = provider.read_data_source(SCHEMA_DATA_SOURCE, &config);

    assert_eq!(first, second);
    assert_eq!(registry.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_id_depends_only_on_subject() {
    let (provider, _) = provider(FakeRegistry::default().with_schema(orders_value()));

    let state = provider
        .read_data_source(SCHEMA_DATA_SOURCE, &json!({ "subject": "orders-value" }))
        .state
        .unwrap();

    assert_eq!(state["id"], json!(format_schema_version_id("orders-value")));
    assert_eq!(
        format_schema_version_id("orders-value"),
        format_schema_version_id("orders-value")
    );
    assert_ne!(
        format_schema_version_id("orders-value"),
        format_schema_version_id("orders-key")
    );
}

#[test]
fn test_full_object_shape_with_null_id_is_accepted() {
    let (provider, _) = provider(FakeRegistry::default().with_schema(orders_value()));

    let config = json!({
        "id": null,
        "subject": "orders-value",
        "version": null,
        "schema_id": null,
        "schema": null,
        "references": null
    });
    let response = provider.read_data_source(SCHEMA_DATA_SOURCE, &config);

    assert!(response.is_success(), "diagnostics: {:?}", response.diagnostics);
    let state = response.state.unwrap();

    // Every key the read emits is declared by the data source schema
    let schema = provider.data_source_schema(SCHEMA_DATA_SOURCE).unwrap();
    for key in state.as_object().unwrap().keys() {
        assert!(schema.attribute(key).is_some(), "undeclared state key {}", key);
    }
}

// =============================================================================
// Failed reads
// =============================================================================

#[test]
fn test_unknown_subject_returns_diagnostics_without_state() {
    let (provider, registry) = provider(FakeRegistry::default().with_schema(orders_value()));

    let response = provider.read_data_source(SCHEMA_DATA_SOURCE, &json!({ "subject": "missing-value" }));

    assert!(response.state.is_none());
    assert!(response.diagnostics.has_errors());
    let summary = &response.diagnostics.iter().next().unwrap().summary;
    assert!(summary.contains("Subject 'missing-value' not found."), "got {}", summary);
    assert_eq!(registry.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_typed_read_surfaces_client_error() {
    let ds = SchemaDataSource::new(FakeRegistry::default());
    let err = ds.read(&SubjectConfig::new("missing-value").unwrap()).unwrap_err();
    assert!(err.is_subject_not_found());
}

#[test]
fn test_shape_errors_stop_before_registry_call() {
    let (provider, registry) = provider(FakeRegistry::default().with_schema(orders_value()));

    for config in [
        json!({}),
        json!({ "subject": null }),
        json!({ "subject": 42 }),
        json!({ "subject": "" }),
        json!({ "subject": "orders-value", "schema": "override" }),
    ] {
        let response = provider.read_data_source(SCHEMA_DATA_SOURCE, &config);
        assert!(response.state.is_none(), "config {} should fail", config);
        assert!(response.diagnostics.has_errors());
    }

    assert_eq!(registry.calls.load(Ordering::SeqCst), 0);
}
