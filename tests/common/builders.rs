//! Builders for registries, endpoints, users and groups used across tests.

use scim_mapping::config::ScimEndpointDescription;
use scim_mapping::evaluation::{
    MappingEvaluatorRegistry, PathExpressionEvaluator, SyntaxValueConverter, UserSchemaEvaluator,
};
use scim_mapping::model::{Group, GroupProvider, User, UserAttribute};
use scim_mapping::schema::{SchemaWithMapping, default_user_schema};
use std::sync::Arc;

pub const BASE_LOCATION: &str = "https://localhost:2443/scim";

/// Registry with the bundled expression and value converters.
pub fn standard_registry() -> MappingEvaluatorRegistry {
    let values = Arc::new(SyntaxValueConverter::new());
    let expressions = Arc::new(PathExpressionEvaluator::new(values.clone()));
    MappingEvaluatorRegistry::standard(expressions, values)
}

/// Endpoint exposing the given schemas under [`BASE_LOCATION`].
pub fn endpoint(schemas: Vec<SchemaWithMapping>) -> ScimEndpointDescription {
    ScimEndpointDescription::builder(BASE_LOCATION, "/scim")
        .with_membership_groups(["/scim/Members"])
        .with_schemas(schemas)
        .build()
}

pub fn evaluator(schemas: Vec<SchemaWithMapping>) -> UserSchemaEvaluator {
    UserSchemaEvaluator::new(Arc::new(endpoint(schemas)), Arc::new(standard_registry()))
}

pub fn default_evaluator() -> UserSchemaEvaluator {
    evaluator(vec![default_user_schema()])
}

/// Barbara Jensen, member of two groups below `/scim`.
pub fn bjensen() -> User {
    User::builder(42)
        .with_identity("userName", "bjensen")
        .with_identity("persistent", "2819c223-7f76-453a-919d-413861904646")
        .with_identity("email", "bjensen@example.com")
        .with_identity("email", "babs@jensen.org")
        .with_attribute(UserAttribute::string("name", &["Ms. Barbara J Jensen, III"]))
        .with_attribute(UserAttribute::string("firstname", &["Barbara"]))
        .with_attribute(UserAttribute::string("surname", &["Jensen"]))
        .with_attribute(UserAttribute::string("title", &["Tour Guide"]))
        .with_attribute(UserAttribute::new(
            "employeeNumber",
            "integer",
            "/",
            vec!["701984".to_string()],
        ))
        .with_groups(["/scim/Members", "/scim/Members/Guides"])
        .build()
}

/// Groups known to the identity store.
pub fn groups() -> GroupProvider {
    GroupProvider::from_groups(vec![
        Group::new("/scim").with_displayed_name("SCIM"),
        Group::new("/scim/Members").with_displayed_name("Members"),
        Group::new("/scim/Members/Guides").with_displayed_name("Tour Guides"),
    ])
}
