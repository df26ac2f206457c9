//! Scope-based filtering of top-level attributes.

use crate::auth::{InvocationContext, ScimScope};
use crate::config::ScimEndpointDescription;
use crate::schema::AttributeDefinitionWithMapping;
use log::debug;
use std::collections::HashSet;

/// Attribute admission rule for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeFilter {
    /// Every attribute is admitted
    AcceptAll,
    /// Only attributes named in the set are admitted
    OnlyMembership(HashSet<String>),
    /// Only attributes not named in the set are admitted
    ExcludeMembership(HashSet<String>),
    /// No attribute is admitted
    RejectAll,
}

impl AttributeFilter {
    pub fn accepts(&self, attribute: &AttributeDefinitionWithMapping) -> bool {
        match self {
            Self::AcceptAll => true,
            Self::OnlyMembership(names) => names.contains(attribute.name()),
            Self::ExcludeMembership(names) => !names.contains(attribute.name()),
            Self::RejectAll => false,
        }
    }

    /// The filter as a closure, for use with iterator adapters.
    pub fn as_predicate(&self) -> impl Fn(&&AttributeDefinitionWithMapping) -> bool + '_ {
        move |attribute: &&AttributeDefinitionWithMapping| self.accepts(attribute)
    }
}

/// Derives the [`AttributeFilter`] of a request from its invocation material.
///
/// Direct invocations see everything. OAuth-delegated invocations see
/// membership attributes with `sys:scim:read_memberships`, the remaining
/// attributes with `sys:scim:read_profile`, and nothing without either scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeFilterService;

impl AttributeFilterService {
    pub fn filter(
        endpoint: &ScimEndpointDescription,
        invocation: &InvocationContext,
    ) -> AttributeFilter {
        if !invocation.is_oauth_delegated() {
            return AttributeFilter::AcceptAll;
        }

        let profile = invocation.has_scope(ScimScope::ReadProfile);
        let memberships = invocation.has_scope(ScimScope::ReadMemberships);
        let membership_attributes = || -> HashSet<String> {
            endpoint.membership_attributes().iter().cloned().collect()
        };

        let filter = match (profile, memberships) {
            (true, true) => AttributeFilter::AcceptAll,
            (false, true) => AttributeFilter::OnlyMembership(membership_attributes()),
            (true, false) => AttributeFilter::ExcludeMembership(membership_attributes()),
            (false, false) => AttributeFilter::RejectAll,
        };
        debug!("OAuth-delegated invocation filtered with {:?}", filter);
        filter
    }
}
