//! Provider facade
//!
//! Owns the shared registry client and dispatches data source reads by type
//! name. The client is injected once and shared read-only by every read.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{HttpRegistryClient, SchemaRegistryClient};
use crate::config::ProviderConfig;
use crate::data_source::{ReadResponse, SchemaDataSource};
use crate::diagnostics::Diagnostics;
use crate::error::{ProviderError, Result};
use crate::schema::{data_source_schema, provider_schema, Block, SCHEMA_DATA_SOURCE};

/// Full schema document handed to a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSchemaDoc {
    pub provider: Block,
    pub data_sources: Vec<DataSourceDoc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceDoc {
    pub name: String,
    pub schema: Block,
}

/// A configured provider
pub struct Provider {
    schema_source: SchemaDataSource<Arc<dyn SchemaRegistryClient>>,
}

impl Provider {
    /// Build a provider backed by the HTTP registry client
    pub fn configure(config: &ProviderConfig) -> Result<Self> {
        let client = HttpRegistryClient::new(config)?;
        debug!(url = %config.registry.url, "configured schema registry provider");
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Build a provider from the host's provider block.
    ///
    /// Fields left unset fall back to the `SCHEMA_REGISTRY_*` environment variables.
    pub fn configure_from_value(block: &serde_json::Value) -> std::result::Result<Self, Diagnostics> {
        Self::configure_from_value_with(block, |key| std::env::var(key).ok())
    }

    /// Same as [`Provider::configure_from_value`] with an explicit variable lookup
    pub fn configure_from_value_with(
        block: &serde_json::Value,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> std::result::Result<Self, Diagnostics> {
        let diags = provider_schema().validate_config(block);
        if diags.has_errors() {
            return Err(diags);
        }

        let mut config = ProviderConfig::from_provider_block(block)?;
        config.apply_env_fallbacks(lookup);
        Ok(Self::configure(&config)?)
    }

    /// Build a provider around an existing client
    pub fn with_client(client: Arc<dyn SchemaRegistryClient>) -> Self {
        Self {
            schema_source: SchemaDataSource::new(client),
        }
    }

    pub fn data_source_names(&self) -> Vec<&'static str> {
        vec![SCHEMA_DATA_SOURCE]
    }

    pub fn data_source_schema(&self, name: &str) -> Result<Block> {
        match name {
            SCHEMA_DATA_SOURCE => Ok(self.schema_source.schema()),
            other => Err(ProviderError::UnknownDataSource(other.to_string())),
        }
    }

    /// The `schemaregistry_schema` handler
    pub fn schema_data_source(&self) -> &SchemaDataSource<Arc<dyn SchemaRegistryClient>> {
        &self.schema_source
    }

    /// Read a data source by type name
    pub fn read_data_source(&self, name: &str, config: &serde_json::Value) -> ReadResponse {
        match name {
            SCHEMA_DATA_SOURCE => self.schema_source.read_data_source(config),
            other => ReadResponse::failure(ProviderError::UnknownDataSource(other.to_string())),
        }
    }

    pub fn schema(&self) -> ProviderSchemaDoc {
        schema_document()
    }
}

/// Schema document for the provider and every data source it serves
pub fn schema_document() -> ProviderSchemaDoc {
    ProviderSchemaDoc {
        provider: provider_schema(),
        data_sources: vec![DataSourceDoc {
            name: SCHEMA_DATA_SOURCE.to_string(),
            schema: data_source_schema(),
        }],
    }
}
