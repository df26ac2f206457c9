//! Property-based tests for multi-valued evaluation.
//!
//! Element order and count of the source collection must survive evaluation
//! for every mapping kind.

use crate::common::builders::{self, BASE_LOCATION};
use proptest::prelude::*;
use scim_mapping::InvocationContext;
use scim_mapping::model::{Group, GroupProvider, User, UserAttribute};
use scim_mapping::schema::{
    AttributeDefinition, AttributeDefinitionWithMapping, ComplexAttributeMapping, DataArray,
    DataValue, ReferenceAttributeMapping, ReferenceType, ScimAttributeType, SchemaType,
    SchemaWithMapping, SimpleAttributeMapping,
};
use serde_json::{Value, json};

prop_compose! {
    fn attribute_values()
        (values in prop::collection::vec("[a-z][a-z0-9]{0,11}", 0..12))
        -> Vec<String> {
        values
    }
}

fn core_schema(attribute: AttributeDefinitionWithMapping) -> SchemaWithMapping {
    SchemaWithMapping::new("urn:example:core", SchemaType::UserCore).with_attribute(attribute)
}

fn evaluate(
    schema: SchemaWithMapping,
    user: &User,
    groups: &GroupProvider,
) -> serde_json::Map<String, Value> {
    builders::evaluator(vec![schema])
        .eval_user(user, groups, &InvocationContext::direct())
        .unwrap()
}

fn user_with(values: &[String]) -> User {
    let values: Vec<&str> = values.iter().map(String::as_str).collect();
    User::builder(1)
        .with_attribute(UserAttribute::string("nicknames", &values))
        .build()
}

proptest! {
    #[test]
    fn simple_array_preserves_source_order(values in attribute_values()) {
        let schema = core_schema(AttributeDefinitionWithMapping::new(
            AttributeDefinition::new("nickNames", ScimAttributeType::String).multi_valued(),
            SimpleAttributeMapping::new(DataValue::array())
                .with_data_array(DataArray::attribute("nicknames"))
                .into(),
        ));

        let document = evaluate(schema, &user_with(&values), &GroupProvider::empty());

        prop_assert_eq!(&document["nickNames"], &json!(values));
    }

    #[test]
    fn complex_yields_one_object_per_element(values in attribute_values()) {
        let schema = core_schema(AttributeDefinitionWithMapping::new(
            AttributeDefinition::new("aliases", ScimAttributeType::Complex)
                .multi_valued()
                .with_sub_attribute(AttributeDefinitionWithMapping::new(
                    AttributeDefinition::new("value", ScimAttributeType::String),
                    SimpleAttributeMapping::new(DataValue::mvel("'alias:' + arrayObj")).into(),
                )),
            ComplexAttributeMapping::new()
                .with_data_array(DataArray::attribute("nicknames"))
                .into(),
        ));

        let document = evaluate(schema, &user_with(&values), &GroupProvider::empty());

        let expected: Vec<Value> = values
            .iter()
            .map(|value| json!({"value": format!("alias:{}", value)}))
            .collect();
        prop_assert_eq!(&document["aliases"], &Value::Array(expected));
    }

    #[test]
    fn group_references_cover_every_resolvable_membership(
        names in prop::collection::btree_set("[a-z]{1,8}", 0..8)
    ) {
        let paths: Vec<String> = names.iter().map(|name| format!("/{}", name)).collect();
        let user = User::builder(1).with_groups(paths.clone()).build();
        let groups = GroupProvider::from_groups(paths.iter().map(Group::new));
        let schema = core_schema(AttributeDefinitionWithMapping::new(
            AttributeDefinition::new("groupRefs", ScimAttributeType::Reference).multi_valued(),
            ReferenceAttributeMapping::new(ReferenceType::Group, "arrayObj.name")
                .with_data_array(DataArray::membership())
                .into(),
        ));

        let document = evaluate(schema, &user, &groups);

        let references = document["groupRefs"].as_array().cloned().unwrap_or_default();
        prop_assert_eq!(references.len(), names.len());
        for name in &names {
            let expected = json!(format!("{}/Groups/{}", BASE_LOCATION, name));
            prop_assert!(references.contains(&expected));
        }
    }
}
