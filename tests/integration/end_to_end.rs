//! Users evaluated into complete SCIM documents.

use crate::common::builders::{self, BASE_LOCATION, bjensen, default_evaluator, groups};
use scim_mapping::evaluation::EvaluationPolicy;
use scim_mapping::model::{GroupProvider, User, UserAttribute};
use scim_mapping::schema::{
    AttributeDefinition, AttributeDefinitionWithMapping, ComplexAttributeMapping,
    DEFAULT_USER_SCHEMA_ID, DataArray, DataValue, ReferenceAttributeMapping, ReferenceType,
    ScimAttributeType, SchemaType, SchemaWithMapping, SimpleAttributeMapping,
};
use scim_mapping::{InvocationContext, MappingError};
use serde_json::{Value, json};

#[test]
fn test_default_schema_for_bjensen() {
    let document = default_evaluator()
        .eval_user(&bjensen(), &groups(), &InvocationContext::direct())
        .unwrap();

    assert_eq!(
        Value::Object(document),
        json!({
            "schemas": [DEFAULT_USER_SCHEMA_ID],
            "userName": "bjensen",
            "name": {
                "formatted": "Ms. Barbara J Jensen, III",
                "familyName": "Jensen",
                "givenName": "Barbara"
            },
            "displayName": "Ms. Barbara J Jensen, III",
            "title": "Tour Guide",
            "active": true,
            "emails": [
                {"value": "bjensen@example.com", "type": "work"},
                {"value": "babs@jensen.org", "type": "work"}
            ],
            "groups": [
                {
                    "value": "Members",
                    "$ref": format!("{}/Groups/Members", BASE_LOCATION),
                    "display": "Members",
                    "type": "direct"
                },
                {
                    "value": "Guides",
                    "$ref": format!("{}/Groups/Guides", BASE_LOCATION),
                    "display": "Tour Guides",
                    "type": "direct"
                }
            ]
        })
    );
}

#[test]
fn test_user_without_data_keeps_empty_lists() {
    let user = User::builder(1).build();

    let document = default_evaluator()
        .eval_user(&user, &GroupProvider::empty(), &InvocationContext::direct())
        .unwrap();

    assert_eq!(document["emails"], json!([]));
    assert_eq!(document["groups"], json!([]));
    assert!(!document.contains_key("userName"));
    assert!(!document.contains_key("name"));
}

#[test]
fn test_unresolvable_groups_are_left_out() {
    let user = User::builder(1).with_groups(["/scim/Members", "/deleted"]).build();

    let document = default_evaluator()
        .eval_user(&user, &groups(), &InvocationContext::direct())
        .unwrap();

    let values: Vec<&str> = document["groups"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|group| group["value"].as_str())
        .collect();
    assert_eq!(values, vec!["Members"]);
}

fn manager_schema() -> SchemaWithMapping {
    SchemaWithMapping::new("urn:example:manager", SchemaType::User).with_attribute(
        AttributeDefinitionWithMapping::new(
            AttributeDefinition::new("manager", ScimAttributeType::Complex)
                .with_sub_attributes(vec![
                    AttributeDefinitionWithMapping::new(
                        AttributeDefinition::new("value", ScimAttributeType::String),
                        SimpleAttributeMapping::new(DataValue::attribute("manager")).into(),
                    ),
                    AttributeDefinitionWithMapping::new(
                        AttributeDefinition::new("$ref", ScimAttributeType::Reference),
                        ReferenceAttributeMapping::new(ReferenceType::User, "attr['manager']")
                            .into(),
                    ),
                ]),
            ComplexAttributeMapping::new().into(),
        ),
    )
}

#[test]
fn test_extension_with_user_reference() {
    let user = User::builder(1)
        .with_attribute(UserAttribute::string(
            "manager",
            &["26118915-6090-4610-87e4-49d8ca9f808d"],
        ))
        .build();

    let document = builders::evaluator(vec![manager_schema()])
        .eval_user(&user, &GroupProvider::empty(), &InvocationContext::direct())
        .unwrap();

    assert_eq!(
        document["urn:example:manager"],
        json!({
            "manager": {
                "value": "26118915-6090-4610-87e4-49d8ca9f808d",
                "$ref": format!("{}/Users/26118915-6090-4610-87e4-49d8ca9f808d", BASE_LOCATION)
            }
        })
    );
}

#[test]
fn test_nested_multi_valued_complex_sees_innermost_element() {
    // Each group element carries a list of its ancestor paths.
    let schema = SchemaWithMapping::new("urn:example:core", SchemaType::UserCore).with_attribute(
        AttributeDefinitionWithMapping::new(
            AttributeDefinition::new("memberships", ScimAttributeType::Complex)
                .multi_valued()
                .with_sub_attributes(vec![
                    AttributeDefinitionWithMapping::new(
                        AttributeDefinition::new("group", ScimAttributeType::String),
                        SimpleAttributeMapping::new(DataValue::mvel("arrayObj.path")).into(),
                    ),
                    AttributeDefinitionWithMapping::new(
                        AttributeDefinition::new("emails", ScimAttributeType::String)
                            .multi_valued(),
                        SimpleAttributeMapping::new(DataValue::array())
                            .with_data_array(DataArray::identity("email"))
                            .into(),
                    ),
                ]),
            ComplexAttributeMapping::new()
                .with_data_array(DataArray::membership())
                .into(),
        ),
    );
    let user = User::builder(1)
        .with_identity("email", "a@example.com")
        .with_group("/scim")
        .build();

    let document = builders::evaluator(vec![schema])
        .eval_user(&user, &groups(), &InvocationContext::direct())
        .unwrap();

    assert_eq!(
        document["memberships"],
        json!([{"group": "/scim", "emails": ["a@example.com"]}])
    );
}

#[test]
fn test_isolation_policy_on_broken_expression() {
    crate::common::init_logging();
    let schema = SchemaWithMapping::new("urn:example:core", SchemaType::UserCore)
        .with_attribute(AttributeDefinitionWithMapping::new(
            AttributeDefinition::new("userName", ScimAttributeType::String),
            SimpleAttributeMapping::new(DataValue::identity("userName")).into(),
        ))
        .with_attribute(AttributeDefinitionWithMapping::new(
            AttributeDefinition::new("nickName", ScimAttributeType::String),
            SimpleAttributeMapping::new(DataValue::mvel("unknownVariable.name")).into(),
        ));

    let isolated = builders::evaluator(vec![schema.clone()])
        .eval_user(&bjensen(), &groups(), &InvocationContext::direct())
        .unwrap();
    assert_eq!(isolated["userName"], "bjensen");
    assert!(!isolated.contains_key("nickName"));

    let fail_fast = builders::evaluator(vec![schema])
        .with_policy(EvaluationPolicy::FailFast)
        .eval_user(&bjensen(), &groups(), &InvocationContext::direct());
    crate::assert_mapping_error!(fail_fast, MappingError::Expression { .. });
}

#[test]
fn test_undeclared_conversion_is_fatal() {
    let schema = SchemaWithMapping::new("urn:example:core", SchemaType::UserCore).with_attribute(
        AttributeDefinitionWithMapping::new(
            AttributeDefinition::new("active", ScimAttributeType::Boolean),
            SimpleAttributeMapping::new(DataValue::attribute("employeeNumber")).into(),
        ),
    );

    let result = builders::evaluator(vec![schema]).eval_user(
        &bjensen(),
        &groups(),
        &InvocationContext::direct(),
    );

    crate::assert_error_message_contains!(&result, "integer");
    crate::assert_mapping_error!(result, MappingError::UnsupportedConversion { .. });
}
