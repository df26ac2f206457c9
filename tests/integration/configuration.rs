//! Endpoint descriptions loaded from JSON and validated at load time.

use crate::common::builders::{bjensen, groups, standard_registry};
use crate::common::fixtures::{fixture_path, load_fixture, load_fixture_text};
use scim_mapping::config::MappingValidator;
use scim_mapping::schema::{AttributeMapping, ReferenceType, SchemaType};
use scim_mapping::{InvocationContext, MappingError, ScimEndpointDescription, UserSchemaEvaluator};
use serde_json::json;
use std::sync::Arc;

#[test]
fn test_loads_endpoint_from_file() {
    let endpoint = ScimEndpointDescription::from_json_file(fixture_path("endpoint.json")).unwrap();

    assert_eq!(endpoint.base_location(), "https://localhost:2443/scim");
    assert_eq!(endpoint.root_group(), "/scim");
    assert_eq!(endpoint.membership_groups(), ["/scim/Members".to_string()]);
    assert_eq!(endpoint.schemas().len(), 2);
    assert_eq!(endpoint.schemas()[1].schema_type, SchemaType::User);

    let groups_attribute = &endpoint.schemas()[0].attributes[3];
    assert!(groups_attribute.attribute_definition.multi_valued);
    match &groups_attribute.attribute_definition.sub_attributes[1].attribute_mapping {
        AttributeMapping::Reference(reference) => {
            assert_eq!(reference.reference_type, ReferenceType::Group)
        }
        other => panic!("Expected reference mapping, got {:?}", other),
    }
}

#[test]
fn test_fixture_validates_against_standard_registry() {
    let endpoint =
        ScimEndpointDescription::from_json_str(&load_fixture_text("endpoint.json")).unwrap();
    assert!(endpoint.validate(&standard_registry()).is_ok());
}

#[test]
fn test_fixture_evaluates_core_and_extension() {
    let endpoint = ScimEndpointDescription::from_json_file(fixture_path("endpoint.json")).unwrap();
    let evaluator = UserSchemaEvaluator::new(Arc::new(endpoint), Arc::new(standard_registry()));

    let document = evaluator
        .eval_user(&bjensen(), &groups(), &InvocationContext::direct())
        .unwrap();

    assert_eq!(document["id"], "2819c223-7f76-453a-919d-413861904646");
    assert_eq!(document["name"], json!({"familyName": "Jensen", "givenName": "Barbara"}));
    assert_eq!(
        document["groups"][1],
        json!({
            "value": "/scim/Members/Guides",
            "$ref": "https://localhost:2443/scim/Groups/Guides",
            "display": "Tour Guides"
        })
    );
    assert_eq!(
        document["urn:ietf:params:scim:schemas:extension:enterprise:2.0:User"],
        json!({"employeeNumber": "701984"})
    );
    assert_eq!(document["schemas"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_unknown_mapping_type_is_rejected_when_parsing() {
    let mut fixture = load_fixture("endpoint.json");
    let mapping = &mut fixture["schemas"][0]["attributesWithMapping"][0]["attributeMapping"];
    mapping["mappingType"] = json!("Scripted");

    let result = ScimEndpointDescription::from_json_str(&fixture.to_string());
    crate::assert_mapping_error!(result, MappingError::Json(_));
}

#[test]
fn test_validation_reports_all_problems() {
    let mut fixture = load_fixture("endpoint.json");
    // groups loses its data array, userName gets an empty selector
    let attributes = &mut fixture["schemas"][0]["attributesWithMapping"];
    attributes[3]["attributeMapping"] = json!({"mappingType": "Complex"});
    attributes[1]["attributeMapping"]["dataValue"]["value"] = json!("");
    let endpoint = ScimEndpointDescription::from_json_str(&fixture.to_string()).unwrap();

    let issues = MappingValidator::new(&standard_registry()).validate_endpoint(&endpoint);
    let locations: Vec<&str> = issues.iter().map(|issue| issue.location.as_str()).collect();

    assert_eq!(
        locations,
        vec![
            "urn:ietf:params:scim:schemas:core:2.0:User:userName",
            "urn:ietf:params:scim:schemas:core:2.0:User:groups",
        ]
    );
    crate::assert_error_message_contains!(
        endpoint.validate(&standard_registry()),
        "2 problems found"
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let result = ScimEndpointDescription::from_json_file(fixture_path("missing.json"));
    crate::assert_mapping_error!(result, MappingError::Io(_));
}
