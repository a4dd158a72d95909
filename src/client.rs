//! Schema registry client
//!
//! The data source only needs one registry operation: fetch the latest
//! version registered under a subject. [`SchemaRegistryClient`] is the seam
//! the read handler depends on; [`HttpRegistryClient`] implements it against
//! the Confluent-compatible REST API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::Url;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::{ProviderError, Result};

const REGISTRY_CONTENT_TYPE: &str = "application/vnd.schemaregistry.v1+json";

/// A reference from one schema to another registered schema
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistryReference {
    /// Logical name used by the referencing schema (e.g. "common.Money")
    pub name: String,
    /// Subject of the referenced schema
    pub subject: String,
    /// Version of the referenced schema
    pub version: i64,
}

/// A schema record as returned by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySchema {
    pub subject: String,
    pub version: i64,
    /// Registry-assigned schema ID
    pub id: i64,
    /// Schema body (Avro, Protobuf or JSON Schema text)
    pub schema: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub references: Vec<RegistryReference>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<RegistryReference>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<RegistryReference>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read access to a schema registry
pub trait SchemaRegistryClient: Send + Sync {
    /// Fetch the latest schema registered under `subject`
    fn get_latest_schema(&self, subject: &str) -> Result<RegistrySchema>;
}

impl<T: SchemaRegistryClient + ?Sized> SchemaRegistryClient for Arc<T> {
    fn get_latest_schema(&self, subject: &str) -> Result<RegistrySchema> {
        (**self).get_latest_schema(subject)
    }
}

impl<T: SchemaRegistryClient + ?Sized> SchemaRegistryClient for &T {
    fn get_latest_schema(&self, subject: &str) -> Result<RegistrySchema> {
        (**self).get_latest_schema(subject)
    }
}

/// Error body the registry sends with non-2xx responses
#[derive(Debug, Deserialize)]
struct RegistryErrorBody {
    error_code: i64,
    message: String,
}

/// Blocking HTTP client for a Confluent-compatible registry.
///
/// Single attempt per call: no retries, no cache.
pub struct HttpRegistryClient {
    base_url: Url,
    username: Option<String>,
    password: Option<String>,
    http: Client,
}

impl HttpRegistryClient {
    /// Build a client from provider configuration
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;
        let registry = &config.registry;

        let base_url = Url::parse(registry.url.trim()).map_err(|e| {
            ProviderError::InvalidConfig(format!("invalid registry url {}: {}", registry.url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::InvalidConfig(format!(
                "registry url cannot be used as a base: {}",
                registry.url
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(registry.timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            username: registry.username.clone(),
            password: registry.password.clone(),
            http,
        })
    }

    /// URL of the latest version of `subject`; the subject is encoded as one path segment
    pub fn latest_version_url(&self, subject: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::InvalidConfig(format!("invalid registry url {}", self.base_url)))?
            .pop_if_empty()
            .extend(["subjects", subject, "versions", "latest"]);
        Ok(url)
    }
}

impl SchemaRegistryClient for HttpRegistryClient {
    fn get_latest_schema(&self, subject: &str) -> Result<RegistrySchema> {
        let url = self.latest_version_url(subject)?;
        debug!(%url, subject, "fetching latest schema");

        let mut request = self.http.get(url).header(ACCEPT, REGISTRY_CONTENT_TYPE);
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_ref());
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(match serde_json::from_str::<RegistryErrorBody>(&text) {
                Ok(body) => ProviderError::Registry {
                    status: status.as_u16(),
                    error_code: body.error_code,
                    message: body.message,
                },
                Err(_) => ProviderError::Registry {
                    status: status.as_u16(),
                    error_code: i64::from(status.as_u16()),
                    message: if text.is_empty() {
                        status.canonical_reason().unwrap_or("request failed").to_string()
                    } else {
                        text
                    },
                },
            });
        }

        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}
