//! The RFC 7643 core User schema with a ready-to-use mapping.
//!
//! Attribute sources follow common identity-store naming: `name`, `firstname`,
//! `surname` and `email` attributes, `userName` and `email` identities, and
//! group membership for `groups`. Deployments with other attribute names
//! supply their own [`SchemaWithMapping`] instead.

use super::mapping::{
    AttributeMapping, ComplexAttributeMapping, DataArray, DataValue, ReferenceAttributeMapping,
    ReferenceType, SimpleAttributeMapping,
};
use super::types::{
    AttributeDefinition, AttributeDefinitionWithMapping, ScimAttributeType, SchemaType,
    SchemaWithMapping,
};
use crate::model::{EMAIL_IDENTITY, USER_NAME_IDENTITY};

/// Identifier of the core User schema.
pub const DEFAULT_USER_SCHEMA_ID: &str = "urn:ietf:params:scim:schemas:core:2.0:User";

/// Identifier of the core Group schema.
pub const DEFAULT_GROUP_SCHEMA_ID: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";

/// Names of the core User attributes that expose group membership.
pub fn default_membership_attributes() -> Vec<String> {
    vec!["groups".to_string()]
}

fn mapped(
    definition: AttributeDefinition,
    mapping: impl Into<AttributeMapping>,
) -> AttributeDefinitionWithMapping {
    AttributeDefinitionWithMapping::new(definition, mapping.into())
}

fn string_from_attribute(
    name: &str,
    source: &str,
    description: &str,
) -> AttributeDefinitionWithMapping {
    mapped(
        AttributeDefinition::new(name, ScimAttributeType::String).with_description(description),
        SimpleAttributeMapping::new(DataValue::attribute(source)),
    )
}

fn string_from_expression(
    name: &str,
    expression: &str,
    description: &str,
) -> AttributeDefinitionWithMapping {
    mapped(
        AttributeDefinition::new(name, ScimAttributeType::String).with_description(description),
        SimpleAttributeMapping::new(DataValue::mvel(expression)),
    )
}

fn name_attribute() -> AttributeDefinitionWithMapping {
    mapped(
        AttributeDefinition::new("name", ScimAttributeType::Complex)
            .with_description("The components of the user's real name.")
            .with_sub_attributes(vec![
                string_from_attribute(
                    "formatted",
                    "name",
                    "The full name, including all middle names, titles, \
                     and suffixes as appropriate.",
                ),
                string_from_attribute("familyName", "surname", "The family name of the User."),
                string_from_attribute("givenName", "firstname", "The given name of the User."),
                string_from_attribute(
                    "middleName",
                    "middleName",
                    "The middle name(s) of the User.",
                ),
                string_from_attribute(
                    "honorificPrefix",
                    "honorificPrefix",
                    "The honorific prefix(es) of the User.",
                ),
                string_from_attribute(
                    "honorificSuffix",
                    "honorificSuffix",
                    "The honorific suffix(es) of the User.",
                ),
            ]),
        ComplexAttributeMapping::new(),
    )
}

fn emails_attribute() -> AttributeDefinitionWithMapping {
    mapped(
        AttributeDefinition::new("emails", ScimAttributeType::Complex)
            .multi_valued()
            .with_description("Email addresses for the user.")
            .with_sub_attributes(vec![
                mapped(
                    AttributeDefinition::new("value", ScimAttributeType::String)
                        .with_description("Email address for the user."),
                    SimpleAttributeMapping::new(DataValue::array()),
                ),
                string_from_expression(
                    "type",
                    "'work'",
                    "A label indicating the attribute's function, e.g., 'work' or 'home'.",
                ),
            ]),
        ComplexAttributeMapping::new().with_data_array(DataArray::identity(EMAIL_IDENTITY)),
    )
}

fn groups_attribute() -> AttributeDefinitionWithMapping {
    mapped(
        AttributeDefinition::new("groups", ScimAttributeType::Complex)
            .multi_valued()
            .with_description("A list of groups to which the user belongs.")
            .with_sub_attributes(vec![
                string_from_expression(
                    "value",
                    "arrayObj.name",
                    "The identifier of the User's group.",
                ),
                mapped(
                    AttributeDefinition::new("$ref", ScimAttributeType::Reference).with_description(
                        "The URI of the corresponding 'Group' resource to which the user belongs.",
                    ),
                    ReferenceAttributeMapping::new(ReferenceType::Group, "arrayObj.name"),
                ),
                string_from_expression(
                    "display",
                    "arrayObj.displayedName",
                    "A human-readable name, primarily used for display purposes.",
                ),
                string_from_expression(
                    "type",
                    "'direct'",
                    "A label indicating the attribute's function, e.g., 'direct' or 'indirect'.",
                ),
            ]),
        ComplexAttributeMapping::new().with_data_array(DataArray::membership()),
    )
}

/// The core User schema mapped onto the default identity-store layout.
pub fn default_user_schema() -> SchemaWithMapping {
    SchemaWithMapping::new(DEFAULT_USER_SCHEMA_ID, SchemaType::UserCore)
        .with_name("User")
        .with_description("User Schema")
        .with_attributes(vec![
            mapped(
                AttributeDefinition::new("userName", ScimAttributeType::String).with_description(
                    "Unique identifier for the User, typically used to authenticate.",
                ),
                SimpleAttributeMapping::new(DataValue::identity(USER_NAME_IDENTITY)),
            ),
            name_attribute(),
            string_from_attribute(
                "displayName",
                "name",
                "The name of the User, suitable for display to end-users.",
            ),
            string_from_attribute(
                "nickName",
                "nickName",
                "The casual way to address the user in real life.",
            ),
            string_from_attribute("title", "title", "The user's title, such as 'Vice President'."),
            string_from_attribute(
                "preferredLanguage",
                "preferredLanguage",
                "Indicates the User's preferred written or spoken language.",
            ),
            string_from_attribute(
                "locale",
                "locale",
                "The User's default location for localization.",
            ),
            string_from_attribute(
                "timezone",
                "timezone",
                "The User's time zone in the 'Olson' format.",
            ),
            mapped(
                AttributeDefinition::new("active", ScimAttributeType::Boolean).with_description(
                    "A Boolean value indicating the User's administrative status.",
                ),
                SimpleAttributeMapping::new(DataValue::mvel("true")),
            ),
            emails_attribute(),
            groups_attribute(),
        ])
}
