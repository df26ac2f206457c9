//! Per-endpoint configuration of the SCIM mapping engine.
//!
//! A [`ScimEndpointDescription`] names the endpoint's public base location,
//! the group subtree it exposes, the attributes that carry membership data and
//! the mapped schemas. Descriptions are usually loaded from JSON and validated
//! once against the evaluator registry before the first request is served.
//!
//! # Example Usage
//!
//! ```rust
//! use scim_mapping::config::ScimEndpointDescription;
//!
//! let endpoint = ScimEndpointDescription::from_json_str(r#"{
//!     "baseLocation": "https://localhost:2443/scim/",
//!     "rootGroup": "/scim",
//!     "membershipGroups": ["/scim/Members"],
//!     "schemas": []
//! }"#)?;
//!
//! assert_eq!(endpoint.base_location(), "https://localhost:2443/scim");
//! assert_eq!(endpoint.membership_attributes(), ["groups".to_string()]);
//! # Ok::<(), scim_mapping::MappingError>(())
//! ```

pub mod validation;

use crate::error::MappingResult;
use crate::evaluation::MappingEvaluatorRegistry;
use crate::schema::{SchemaWithMapping, default_membership_attributes};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use validation::{MAX_MAPPING_DEPTH, MappingValidator, ValidationIssue};

/// Static configuration of one SCIM endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimEndpointDescription {
    base_location: String,
    root_group: String,
    #[serde(default)]
    membership_groups: Vec<String>,
    #[serde(default = "default_membership_attributes")]
    membership_attributes: Vec<String>,
    #[serde(default)]
    schemas: Vec<SchemaWithMapping>,
}

impl ScimEndpointDescription {
    /// Start building a description for the given base location and root group.
    pub fn builder(
        base_location: impl Into<String>,
        root_group: impl Into<String>,
    ) -> ScimEndpointDescriptionBuilder {
        ScimEndpointDescriptionBuilder::new(base_location.into(), root_group.into())
    }

    /// Parse a description from JSON.
    pub fn from_json_str(json: &str) -> MappingResult<Self> {
        let endpoint: Self = serde_json::from_str(json)?;
        debug!(
            "Loaded endpoint description for '{}' with {} schema(s)",
            endpoint.base_location(),
            endpoint.schemas.len()
        );
        Ok(endpoint)
    }

    /// Read and parse a description from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> MappingResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Base location without a trailing slash.
    pub fn base_location(&self) -> &str {
        self.base_location.trim_end_matches('/')
    }

    pub fn root_group(&self) -> &str {
        &self.root_group
    }

    pub fn membership_groups(&self) -> &[String] {
        &self.membership_groups
    }

    /// Names of top-level attributes that expose group membership.
    pub fn membership_attributes(&self) -> &[String] {
        &self.membership_attributes
    }

    pub fn is_membership_attribute(&self, name: &str) -> bool {
        self.membership_attributes.iter().any(|attribute| attribute == name)
    }

    pub fn schemas(&self) -> &[SchemaWithMapping] {
        &self.schemas
    }

    /// Enabled schemas that apply to User resources.
    pub fn enabled_user_schemas(&self) -> impl Iterator<Item = &SchemaWithMapping> + '_ {
        self.schemas
            .iter()
            .filter(|schema| schema.enabled && schema.schema_type.is_user())
    }

    /// Validate the description against the evaluators of `registry`.
    ///
    /// All problems are collected. A single problem is returned as is, several
    /// are combined into one `InvalidConfiguration` error.
    pub fn validate(&self, registry: &MappingEvaluatorRegistry) -> MappingResult<()> {
        let issues = MappingValidator::new(registry).validate_endpoint(self);
        validation::into_result(issues)
    }
}

/// Builder for [`ScimEndpointDescription`].
#[derive(Debug, Clone)]
pub struct ScimEndpointDescriptionBuilder {
    base_location: String,
    root_group: String,
    membership_groups: Vec<String>,
    membership_attributes: Vec<String>,
    schemas: Vec<SchemaWithMapping>,
}

impl ScimEndpointDescriptionBuilder {
    fn new(base_location: String, root_group: String) -> Self {
        Self {
            base_location,
            root_group,
            membership_groups: Vec::new(),
            membership_attributes: default_membership_attributes(),
            schemas: Vec::new(),
        }
    }

    pub fn with_membership_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.membership_groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the default membership attribute names.
    pub fn with_membership_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.membership_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_schema(mut self, schema: SchemaWithMapping) -> Self {
        self.schemas.push(schema);
        self
    }

    pub fn with_schemas(mut self, schemas: impl IntoIterator<Item = SchemaWithMapping>) -> Self {
        self.schemas.extend(schemas);
        self
    }

    pub fn build(self) -> ScimEndpointDescription {
        ScimEndpointDescription {
            base_location: self.base_location,
            root_group: self.root_group,
            membership_groups: self.membership_groups,
            membership_attributes: self.membership_attributes,
            schemas: self.schemas,
        }
    }
}
