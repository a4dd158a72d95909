//! Attribute schema declarations for the provider and its data source

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, Diagnostics};

/// Type name of the only data source this provider exposes
pub const SCHEMA_DATA_SOURCE: &str = "schemaregistry_schema";

/// Type of an attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Int,
    /// Ordered list of nested objects
    List(Block),
}

impl AttributeType {
    /// Human readable type name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Int => "number",
            AttributeType::List(_) => "list of objects",
        }
    }

    fn accepts(&self, value: &serde_json::Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Int => value.is_i64() || value.is_u64(),
            AttributeType::List(_) => value.is_array(),
        }
    }
}

/// A single attribute declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub computed: bool,
    #[serde(default)]
    pub sensitive: bool,
    pub description: String,
}

impl Attribute {
    fn new(name: impl Into<String>, attr_type: AttributeType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attr_type,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            description: description.into(),
        }
    }

    pub fn required_string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            required: true,
            ..Self::new(name, AttributeType::String, description)
        }
    }

    pub fn optional_string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            optional: true,
            ..Self::new(name, AttributeType::String, description)
        }
    }

    pub fn optional_int(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            optional: true,
            ..Self::new(name, AttributeType::Int, description)
        }
    }

    pub fn computed_string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            computed: true,
            ..Self::new(name, AttributeType::String, description)
        }
    }

    pub fn computed_int(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            computed: true,
            ..Self::new(name, AttributeType::Int, description)
        }
    }

    pub fn computed_list(name: impl Into<String>, element: Block, description: impl Into<String>) -> Self {
        Self {
            computed: true,
            ..Self::new(name, AttributeType::List(element), description)
        }
    }

    /// Mark the attribute as sensitive (redacted by hosts)
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Whether callers may supply a value for this attribute
    pub fn is_settable(&self) -> bool {
        self.required || self.optional
    }
}

/// A set of attributes, used both at the top level and for nested list elements
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub attributes: Vec<Attribute>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Check a configuration value against this block before any read runs.
    ///
    /// Computed-only attributes may appear as `null` (hosts send the full
    /// object shape) but never with a value.
    pub fn validate_config(&self, config: &serde_json::Value) -> Diagnostics {
        let mut diags = Diagnostics::new();

        let Some(object) = config.as_object() else {
            diags.push(Diagnostic::error(format!(
                "Configuration must be an object, got {}",
                json_kind(config)
            )));
            return diags;
        };

        for key in object.keys() {
            if self.attribute(key).is_none() {
                diags.push(
                    Diagnostic::error(format!("Unsupported attribute \"{}\"", key))
                        .with_attribute(key.clone()),
                );
            }
        }

        for attr in &self.attributes {
            let value = object.get(&attr.name).filter(|v| !v.is_null());
            match value {
                None if attr.required => {
                    diags.push(
                        Diagnostic::error(format!("Missing required attribute \"{}\"", attr.name))
                            .with_attribute(attr.name.clone()),
                    );
                }
                None => {}
                Some(_) if !attr.is_settable() => {
                    diags.push(
                        Diagnostic::error(format!(
                            "Attribute \"{}\" is computed and cannot be set",
                            attr.name
                        ))
                        .with_attribute(attr.name.clone()),
                    );
                }
                Some(v) if !attr.attr_type.accepts(v) => {
                    diags.push(
                        Diagnostic::error(format!(
                            "Attribute \"{}\" must be a {}, got {}",
                            attr.name,
                            attr.attr_type.type_name(),
                            json_kind(v)
                        ))
                        .with_attribute(attr.name.clone()),
                    );
                }
                Some(_) => {}
            }
        }

        diags
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "list",
        serde_json::Value::Object(_) => "object",
    }
}

/// Declaration of the `schemaregistry_schema` data source
pub fn data_source_schema() -> Block {
    let reference = Block::new()
        .with_attribute(Attribute::computed_string("name", "The referenced schema name"))
        .with_attribute(Attribute::computed_string("subject", "The subject related to the schema"))
        .with_attribute(Attribute::computed_int("version", "The version of the schema"));

    Block::new()
        .with_attribute(Attribute::computed_string("id", "Identifier of the data source, derived from the subject"))
        .with_attribute(Attribute::required_string("subject", "The subject related to the schema"))
        .with_attribute(Attribute::computed_int("version", "The version of the schema"))
        .with_attribute(Attribute::computed_int("schema_id", "The schema ID"))
        .with_attribute(Attribute::computed_string("schema", "The schema string"))
        .with_attribute(Attribute::computed_list(
            "references",
            reference,
            "The referenced schema names list",
        ))
}

/// Declaration of the provider configuration block
pub fn provider_schema() -> Block {
    Block::new()
        .with_attribute(Attribute::optional_string(
            "schema_registry_url",
            "The schema registry base URL",
        ))
        .with_attribute(Attribute::optional_string(
            "username",
            "Username for basic authentication against the registry",
        ))
        .with_attribute(
            Attribute::optional_string("password", "Password for basic authentication against the registry")
                .sensitive(),
        )
        .with_attribute(Attribute::optional_int(
            "timeout_secs",
            "Request timeout in seconds",
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_source_declares_subject_as_only_input() {
        let schema = data_source_schema();
        let settable: Vec<_> = schema
            .attributes
            .iter()
            .filter(|a| a.is_settable())
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(settable, vec!["subject"]);

        let subject = schema.attribute("subject").unwrap();
        assert!(subject.required);
        assert_eq!(subject.attr_type, AttributeType::String);

        for name in ["id", "version", "schema_id", "schema", "references"] {
            assert!(schema.attribute(name).unwrap().computed, "{} should be computed", name);
        }
    }

    #[test]
    fn test_references_element_shape() {
        let schema = data_source_schema();
        let AttributeType::List(element) = &schema.attribute("references").unwrap().attr_type else {
            panic!("references should be a list");
        };
        assert_eq!(element.attribute("name").unwrap().attr_type, AttributeType::String);
        assert_eq!(element.attribute("subject").unwrap().attr_type, AttributeType::String);
        assert_eq!(element.attribute("version").unwrap().attr_type, AttributeType::Int);
    }

    #[test]
    fn test_validate_accepts_host_shaped_config() {
        let config = json!({
            "id": null,
            "subject": "orders-value",
            "version": null,
            "schema_id": null,
            "schema": null,
            "references": null
        });
        assert!(data_source_schema().validate_config(&config).is_empty());
    }

    #[test]
    fn test_declares_every_state_key() {
        let schema = data_source_schema();
        let mut declared: Vec<_> = schema.attributes.iter().map(|a| a.name.as_str()).collect();
        declared.sort_unstable();
        assert_eq!(
            declared,
            vec!["id", "references", "schema", "schema_id", "subject", "version"]
        );
    }

    #[test]
    fn test_validate_rejects_missing_subject() {
        let diags = data_source_schema().validate_config(&json!({ "subject": null }));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.iter().next().unwrap().attribute.as_deref(), Some("subject"));
    }

    #[test]
    fn test_validate_rejects_wrong_type_and_computed_values() {
        let diags = data_source_schema().validate_config(&json!({
            "subject": 7,
            "version": 3,
            "bogus": true
        }));
        let attrs: Vec<_> = diags.iter().filter_map(|d| d.attribute.as_deref()).collect();
        assert_eq!(diags.len(), 3);
        assert!(attrs.contains(&"subject"));
        assert!(attrs.contains(&"version"));
        assert!(attrs.contains(&"bogus"));
    }

    #[test]
    fn test_validate_rejects_non_object() {
        let diags = data_source_schema().validate_config(&json!("orders-value"));
        assert!(diags.has_errors());
    }

    #[test]
    fn test_provider_password_is_sensitive() {
        let schema = provider_schema();
        assert!(schema.attribute("password").unwrap().sensitive);
        assert!(!schema.attribute("username").unwrap().sensitive);
    }
}
