//! OAuth scope filtering applied to whole documents.

use crate::common::builders::{bjensen, default_evaluator, endpoint, groups};
use scim_mapping::InvocationContext;
use scim_mapping::auth::ScimScope;
use scim_mapping::evaluation::{AttributeFilter, AttributeFilterService};
use scim_mapping::schema::default_user_schema;
use std::collections::BTreeSet;

fn members(invocation: &InvocationContext) -> BTreeSet<String> {
    default_evaluator()
        .eval_user(&bjensen(), &groups(), invocation)
        .unwrap()
        .into_iter()
        .map(|(name, _)| name)
        .filter(|name| name != "schemas")
        .collect()
}

#[test]
fn test_direct_invocation_sees_membership_and_profile() {
    let members = members(&InvocationContext::direct());
    assert!(members.contains("groups"));
    assert!(members.contains("userName"));
}

#[test]
fn test_read_memberships_only() {
    let invocation = InvocationContext::oauth_delegation([ScimScope::ReadMemberships.as_str()]);
    assert_eq!(members(&invocation), BTreeSet::from(["groups".to_string()]));
}

#[test]
fn test_read_profile_only() {
    let invocation = InvocationContext::oauth_delegation([ScimScope::ReadProfile.as_str()]);
    let members = members(&invocation);
    assert!(!members.contains("groups"));
    assert!(members.contains("userName"));
    assert!(members.contains("emails"));
}

#[test]
fn test_both_scopes_match_direct_invocation() {
    let invocation = InvocationContext::oauth_delegation([
        ScimScope::ReadProfile.as_str(),
        ScimScope::ReadMemberships.as_str(),
    ]);
    assert_eq!(members(&invocation), members(&InvocationContext::direct()));
}

#[test]
fn test_delegation_without_scim_scopes_yields_only_schemas() {
    let invocation = InvocationContext::oauth_delegation(["openid", "profile"]);

    let document = default_evaluator()
        .eval_user(&bjensen(), &groups(), &invocation)
        .unwrap();

    assert_eq!(document.len(), 1);
    assert!(document.contains_key("schemas"));
}

#[test]
fn test_filter_applies_to_top_level_attributes_only() {
    // "value" is both a membership attribute name and a sub-attribute of groups
    let endpoint = scim_mapping::ScimEndpointDescription::builder("https://localhost", "/")
        .with_membership_attributes(["groups", "value"])
        .with_schema(default_user_schema())
        .build();
    let invocation = InvocationContext::oauth_delegation([ScimScope::ReadMemberships.as_str()]);
    let filter = AttributeFilterService::filter(&endpoint, &invocation);

    let admitted: Vec<&str> = endpoint.schemas()[0]
        .attributes
        .iter()
        .filter(filter.as_predicate())
        .map(|attribute| attribute.name())
        .collect();

    assert_eq!(admitted, vec!["groups"]);
    assert!(matches!(filter, AttributeFilter::OnlyMembership(_)));
}

#[test]
fn test_default_endpoint_membership_attributes() {
    let endpoint = endpoint(vec![default_user_schema()]);
    assert!(endpoint.is_membership_attribute("groups"));
    assert!(!endpoint.is_membership_attribute("emails"));
}
