//! The `schemaregistry_schema` data source
//!
//! Reads the latest schema registered under a subject and exposes it as
//! computed attributes. A read has exactly two outcomes: the full state, or
//! diagnostics with no state (and therefore no id).

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::client::{RegistryReference, RegistrySchema, SchemaRegistryClient};
use crate::diagnostics::Diagnostics;
use crate::error::{ProviderError, Result};
use crate::schema::{data_source_schema, Block};

/// Identifier recorded for a subject.
///
/// Stored ids must stay stable across releases, so this stays the subject verbatim.
pub fn format_schema_version_id(subject: &str) -> String {
    subject.to_string()
}

/// Validated data source configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectConfig {
    subject: String,
}

impl SubjectConfig {
    /// Create a config; the subject must be a non-empty string
    pub fn new(subject: impl Into<String>) -> Result<Self> {
        let subject = subject.into();
        if subject.is_empty() {
            return Err(ProviderError::InvalidAttribute {
                name: "subject".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(Self { subject })
    }

    /// Extract the config from the host's loosely typed value
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        match value.get("subject") {
            None | Some(serde_json::Value::Null) => {
                Err(ProviderError::MissingAttribute("subject".to_string()))
            }
            Some(serde_json::Value::String(s)) => Self::new(s.as_str()),
            Some(_) => Err(ProviderError::InvalidAttribute {
                name: "subject".to_string(),
                reason: "must be a string".to_string(),
            }),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

/// One entry of the `references` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceState {
    pub name: String,
    pub subject: String,
    pub version: i64,
}

impl From<RegistryReference> for ReferenceState {
    fn from(reference: RegistryReference) -> Self {
        Self {
            name: reference.name,
            subject: reference.subject,
            version: reference.version,
        }
    }
}

/// Full state of a successful read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaState {
    pub id: String,
    pub subject: String,
    pub version: i64,
    pub schema_id: i64,
    pub schema: String,
    /// Always present; empty when the schema has no references
    pub references: Vec<ReferenceState>,
}

impl SchemaState {
    fn from_registry(subject: &str, record: RegistrySchema) -> Self {
        Self {
            id: format_schema_version_id(subject),
            subject: subject.to_string(),
            version: record.version,
            schema_id: record.id,
            schema: record.schema,
            references: record.references.into_iter().map(ReferenceState::from).collect(),
        }
    }

    /// Convert into the object shape the host stores
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Outcome of a host-facing read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadResponse {
    /// Populated state, `None` whenever diagnostics contain an error
    pub state: Option<serde_json::Value>,
    pub diagnostics: Diagnostics,
}

impl ReadResponse {
    pub fn success(state: serde_json::Value) -> Self {
        Self {
            state: Some(state),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn failure(diagnostics: impl Into<Diagnostics>) -> Self {
        Self {
            state: None,
            diagnostics: diagnostics.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.state.is_some() && !self.diagnostics.has_errors()
    }
}

/// Read handler bound to an injected registry client
pub struct SchemaDataSource<C> {
    client: C,
}

impl<C: SchemaRegistryClient> SchemaDataSource<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Attribute declaration of this data source
    pub fn schema(&self) -> Block {
        data_source_schema()
    }

    /// Fetch the latest schema for the configured subject.
    ///
    /// Single attempt; any client error is returned unchanged.
    pub fn read(&self, config: &SubjectConfig) -> Result<SchemaState> {
        let subject = config.subject();
        let record = self.client.get_latest_schema(subject).map_err(|e| {
            warn!(subject, error = %e, "schema read failed");
            e
        })?;

        let state = SchemaState::from_registry(subject, record);
        info!(
            subject,
            version = state.version,
            schema_id = state.schema_id,
            references = state.references.len(),
            "read schema"
        );
        Ok(state)
    }

    /// Host boundary: validate, read and convert, reporting failures as diagnostics
    pub fn read_data_source(&self, config: &serde_json::Value) -> ReadResponse {
        let diags = self.schema().validate_config(config);
        if diags.has_errors() {
            return ReadResponse::failure(diags);
        }

        let result = SubjectConfig::from_value(config)
            .and_then(|config| self.read(&config))
            .and_then(|state| state.to_value());

        match result {
            Ok(state) => ReadResponse::success(state),
            Err(e) => ReadResponse::failure(e),
        }
    }
}
