//! Core schema type definitions for mapped SCIM schemas.
//!
//! This module contains the data structures that pair SCIM attribute
//! definitions (RFC 7643) with the mapping that tells the engine where each
//! attribute's value comes from.

use super::mapping::AttributeMapping;
use serde::{Deserialize, Serialize};
use std::fmt;

/// SCIM attribute data types.
///
/// Represents the valid data types for SCIM attributes as defined in RFC 7643.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScimAttributeType {
    /// String value
    #[default]
    String,
    /// Boolean value
    Boolean,
    /// Decimal number
    Decimal,
    /// Integer number
    Integer,
    /// DateTime in RFC3339 format
    #[serde(rename = "DATETIME")]
    DateTime,
    /// Binary data (base64 encoded)
    Binary,
    /// URI reference
    Reference,
    /// Complex attribute with sub-attributes
    Complex,
}

impl ScimAttributeType {
    /// Name used in configuration files and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Boolean => "BOOLEAN",
            Self::Decimal => "DECIMAL",
            Self::Integer => "INTEGER",
            Self::DateTime => "DATETIME",
            Self::Binary => "BINARY",
            Self::Reference => "REFERENCE",
            Self::Complex => "COMPLEX",
        }
    }
}

impl fmt::Display for ScimAttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Definition of a SCIM attribute as exposed by an endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    /// Attribute name
    pub name: String,
    /// Data type of the attribute
    #[serde(rename = "type")]
    pub data_type: ScimAttributeType,
    /// Whether this attribute can have multiple values
    #[serde(default)]
    pub multi_valued: bool,
    /// Attribute description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Sub-attributes, only for complex types
    #[serde(rename = "subAttributesWithMapping", default)]
    pub sub_attributes: Vec<AttributeDefinitionWithMapping>,
}

impl AttributeDefinition {
    /// Create a single-valued attribute definition without sub-attributes.
    pub fn new(name: impl Into<String>, data_type: ScimAttributeType) -> Self {
        Self {
            name: name.into(),
            data_type,
            multi_valued: false,
            description: String::new(),
            sub_attributes: Vec::new(),
        }
    }

    /// Mark the attribute as multi-valued.
    pub fn multi_valued(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a sub-attribute.
    pub fn with_sub_attribute(mut self, sub_attribute: AttributeDefinitionWithMapping) -> Self {
        self.sub_attributes.push(sub_attribute);
        self
    }

    /// Replace all sub-attributes.
    pub fn with_sub_attributes(
        mut self,
        sub_attributes: Vec<AttributeDefinitionWithMapping>,
    ) -> Self {
        self.sub_attributes = sub_attributes;
        self
    }
}

/// One attribute definition together with its mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinitionWithMapping {
    pub attribute_definition: AttributeDefinition,
    pub attribute_mapping: AttributeMapping,
}

impl AttributeDefinitionWithMapping {
    pub fn new(
        attribute_definition: AttributeDefinition,
        attribute_mapping: AttributeMapping,
    ) -> Self {
        Self {
            attribute_definition,
            attribute_mapping,
        }
    }

    /// Name of the defined attribute.
    pub fn name(&self) -> &str {
        &self.attribute_definition.name
    }
}

/// Kind of resource a schema describes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaType {
    /// The RFC 7643 core User schema
    UserCore,
    /// A User extension schema
    User,
    /// The RFC 7643 core Group schema
    GroupCore,
    /// A Group extension schema
    Group,
}

impl SchemaType {
    /// Whether the schema applies to User resources.
    pub fn is_user(&self) -> bool {
        matches!(self, Self::UserCore | Self::User)
    }

    /// Whether attributes of this schema live at the top level of a resource.
    pub fn is_core(&self) -> bool {
        matches!(self, Self::UserCore | Self::GroupCore)
    }
}

/// A schema whose attributes carry mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaWithMapping {
    /// Unique schema identifier (URI)
    pub id: String,
    /// Kind of resource the schema applies to
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    /// Human-readable schema name
    #[serde(default)]
    pub name: String,
    /// Schema description
    #[serde(default)]
    pub description: String,
    /// Disabled schemas are skipped entirely
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Top-level attributes with their mappings
    #[serde(rename = "attributesWithMapping", default)]
    pub attributes: Vec<AttributeDefinitionWithMapping>,
}

fn default_enabled() -> bool {
    true
}

impl SchemaWithMapping {
    pub fn new(id: impl Into<String>, schema_type: SchemaType) -> Self {
        Self {
            id: id.into(),
            schema_type,
            name: String::new(),
            description: String::new(),
            enabled: true,
            attributes: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeDefinitionWithMapping) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_attributes(mut self, attributes: Vec<AttributeDefinitionWithMapping>) -> Self {
        self.attributes = attributes;
        self
    }
}
