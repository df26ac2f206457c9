//! Load-time validation of mapping configurations.
//!
//! Evaluation trusts its configuration: a broken mapping surfaces as an error
//! for every user evaluated with it. The [`MappingValidator`] walks the whole
//! mapping tree once and reports every problem it finds, so a deployment can
//! be rejected before serving requests.

use super::ScimEndpointDescription;
use crate::error::{MappingError, MappingResult};
use crate::evaluation::MappingEvaluatorRegistry;
use crate::schema::{
    AttributeDefinitionWithMapping, AttributeMapping, DataArray, DataArrayType, DataValue,
    DataValueType, ScimAttributeType, SchemaWithMapping,
};
use std::collections::HashSet;
use std::fmt;

/// Maximum nesting depth of complex attributes.
pub const MAX_MAPPING_DEPTH: usize = 8;

/// One problem found in a mapping configuration.
#[derive(Debug)]
pub struct ValidationIssue {
    /// Location of the problem, e.g. `urn:...:User:emails.value`
    pub location: String,
    pub error: MappingError,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.error)
    }
}

/// Validates endpoint descriptions and schemas against a registry.
pub struct MappingValidator<'r> {
    registry: &'r MappingEvaluatorRegistry,
}

impl<'r> MappingValidator<'r> {
    pub fn new(registry: &'r MappingEvaluatorRegistry) -> Self {
        Self { registry }
    }

    /// Validate the endpoint settings and every schema of the endpoint.
    pub fn validate_endpoint(&self, endpoint: &ScimEndpointDescription) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if !is_absolute_uri(endpoint.base_location()) {
            issues.push(issue(
                "baseLocation",
                MappingError::invalid_configuration(format!(
                    "'{}' is not an absolute URI",
                    endpoint.base_location()
                )),
            ));
        }
        if !endpoint.root_group().starts_with('/') {
            issues.push(issue(
                "rootGroup",
                MappingError::invalid_configuration(format!(
                    "'{}' is not an absolute group path",
                    endpoint.root_group()
                )),
            ));
        }

        let mut schema_ids = HashSet::new();
        for schema in endpoint.schemas() {
            if !schema_ids.insert(schema.id.as_str()) {
                issues.push(issue(
                    &schema.id,
                    MappingError::invalid_configuration("duplicate schema id"),
                ));
            }
            issues.extend(self.validate_schema(schema));
        }
        issues
    }

    /// Validate the mapping tree of one schema.
    pub fn validate_schema(&self, schema: &SchemaWithMapping) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if schema.id.trim().is_empty() {
            issues.push(issue("schema", MappingError::invalid_configuration("empty schema id")));
        }
        self.validate_attributes(&schema.id, &schema.attributes, 1, false, &mut issues);
        issues
    }

    fn validate_attributes(
        &self,
        location: &str,
        attributes: &[AttributeDefinitionWithMapping],
        depth: usize,
        in_array_scope: bool,
        issues: &mut Vec<ValidationIssue>,
    ) {
        if depth > MAX_MAPPING_DEPTH {
            issues.push(issue(
                location,
                MappingError::invalid_configuration(format!(
                    "mapping nesting exceeds {} levels",
                    MAX_MAPPING_DEPTH
                )),
            ));
            return;
        }

        let mut names = HashSet::new();
        for attribute in attributes {
            let name = attribute.name();
            let attribute_location = if depth == 1 {
                format!("{}:{}", location, name)
            } else {
                format!("{}.{}", location, name)
            };

            if name.trim().is_empty() {
                issues.push(issue(
                    &attribute_location,
                    MappingError::invalid_configuration("empty attribute name"),
                ));
            } else if !names.insert(name) {
                issues.push(issue(
                    &attribute_location,
                    MappingError::invalid_configuration("duplicate attribute name"),
                ));
            }

            self.validate_attribute(&attribute_location, attribute, depth, in_array_scope, issues);
        }
    }

    fn validate_attribute(
        &self,
        location: &str,
        attribute: &AttributeDefinitionWithMapping,
        depth: usize,
        in_array_scope: bool,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let definition = &attribute.attribute_definition;
        let mapping = &attribute.attribute_mapping;

        if !self.registry.contains(mapping.id()) {
            issues.push(issue(location, MappingError::unknown_mapping_type(mapping.id())));
        }

        if definition.multi_valued && mapping.data_array().is_none() {
            issues.push(issue(
                location,
                MappingError::MultiValuedWithoutDataArray {
                    attribute: definition.name.clone(),
                },
            ));
        }
        if let Some(data_array) = mapping.data_array() {
            if !definition.multi_valued {
                issues.push(issue(
                    location,
                    MappingError::invalid_configuration("data array on a single-valued attribute"),
                ));
            }
            check_data_array(location, data_array, issues);
        }

        let is_complex_type = definition.data_type == ScimAttributeType::Complex;
        match mapping {
            AttributeMapping::Complex(_) if !is_complex_type => issues.push(issue(
                location,
                MappingError::invalid_configuration(format!(
                    "complex mapping on {} attribute",
                    definition.data_type
                )),
            )),
            AttributeMapping::Simple(_) | AttributeMapping::Reference(_) if is_complex_type => {
                issues.push(issue(
                    location,
                    MappingError::invalid_configuration(format!(
                        "{} mapping on COMPLEX attribute",
                        mapping.id()
                    )),
                ))
            }
            _ => {}
        }
        if !is_complex_type && !definition.sub_attributes.is_empty() {
            issues.push(issue(
                location,
                MappingError::invalid_configuration(format!(
                    "sub-attributes on {} attribute",
                    definition.data_type
                )),
            ));
        }

        let array_scope = in_array_scope || definition.multi_valued;
        match mapping {
            AttributeMapping::Simple(simple) => {
                check_data_value(location, &simple.data_value, array_scope, issues)
            }
            AttributeMapping::Reference(reference) => {
                if definition.data_type != ScimAttributeType::Reference {
                    issues.push(issue(
                        location,
                        MappingError::invalid_configuration(format!(
                            "reference mapping on {} attribute",
                            definition.data_type
                        )),
                    ));
                }
                if reference.expression.trim().is_empty() {
                    issues.push(issue(
                        location,
                        MappingError::invalid_configuration("empty reference expression"),
                    ));
                }
            }
            AttributeMapping::Complex(_) => {}
        }

        if is_complex_type {
            self.validate_attributes(
                location,
                &definition.sub_attributes,
                depth + 1,
                array_scope,
                issues,
            );
        }
    }
}

fn check_data_value(
    location: &str,
    data_value: &DataValue,
    in_array_scope: bool,
    issues: &mut Vec<ValidationIssue>,
) {
    match data_value.value_type {
        DataValueType::Attribute | DataValueType::Identity | DataValueType::Mvel
            if data_value.value_str().trim().is_empty() =>
        {
            issues.push(issue(
                location,
                MappingError::invalid_configuration(format!(
                    "{:?} data value without a selector",
                    data_value.value_type
                )),
            ));
        }
        DataValueType::Array if !in_array_scope => issues.push(issue(
            location,
            MappingError::invalid_configuration(
                "ARRAY data value outside a multi-valued attribute",
            ),
        )),
        _ => {}
    }
}

fn check_data_array(location: &str, data_array: &DataArray, issues: &mut Vec<ValidationIssue>) {
    let needs_selector = matches!(
        data_array.array_type,
        DataArrayType::Attribute | DataArrayType::Identity
    );
    if needs_selector && data_array.value_str().trim().is_empty() {
        issues.push(issue(
            location,
            MappingError::invalid_configuration(format!(
                "{:?} data array without a selector",
                data_array.array_type
            )),
        ));
    }
}

fn issue(location: &str, error: MappingError) -> ValidationIssue {
    ValidationIssue {
        location: location.to_string(),
        error,
    }
}

/// `scheme://rest` with an RFC 3986 scheme and a non-empty remainder.
fn is_absolute_uri(value: &str) -> bool {
    match value.split_once("://") {
        Some((scheme, rest)) => {
            !rest.is_empty()
                && scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Turn collected issues into a result.
pub(crate) fn into_result(mut issues: Vec<ValidationIssue>) -> MappingResult<()> {
    match issues.len() {
        0 => Ok(()),
        1 => Err(issues.remove(0).error),
        count => Err(MappingError::invalid_configuration(format!(
            "{} problems found: {}",
            count,
            issues
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        ))),
    }
}
