//! Schema Registry Provider
//!
//! A read-only data source, `schemaregistry_schema`, that exposes the latest
//! schema registered under a subject to infrastructure-as-code tooling.
//!
//! ## Attributes
//!
//! ```text
//! subject     (required)  string
//! version     (computed)  number
//! schema_id   (computed)  number
//! schema      (computed)  string
//! references  (computed)  list of { name, subject, version }
//! ```
//!
//! ## Flow
//!
//! ```text
//! host config ──validate──> SubjectConfig ──> SchemaRegistryClient::get_latest_schema
//!                                                  │
//!            ReadResponse { state | diagnostics } <┘
//! ```
//!
//! The registry is never written to. Reads are single-shot: no retries and
//! no caching.

pub mod client;
pub mod config;
pub mod data_source;
pub mod diagnostics;
pub mod error;
pub mod provider;
pub mod schema;

pub use client::{HttpRegistryClient, RegistryReference, RegistrySchema, SchemaRegistryClient};
pub use config::{ProviderConfig, RegistryConfig};
pub use data_source::{
    format_schema_version_id, ReadResponse, ReferenceState, SchemaDataSource, SchemaState,
    SubjectConfig,
};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{ProviderError, Result};
pub use provider::Provider;
pub use schema::{data_source_schema, provider_schema, Attribute, AttributeType, Block, SCHEMA_DATA_SOURCE};
