//! Immutable evaluation environment.

use crate::config::ScimEndpointDescription;
use crate::model::{DataObject, GroupProvider, User};

/// Environment passed to every evaluator and expression.
///
/// The context is a value: iterating over a data array derives a new context
/// per element with [`with_array_obj`](Self::with_array_obj), so sibling
/// iterations never observe each other's current element.
#[derive(Debug, Clone)]
pub struct EvaluatorContext<'a> {
    user: &'a User,
    endpoint: &'a ScimEndpointDescription,
    group_provider: &'a GroupProvider,
    array_obj: Option<DataObject>,
}

impl<'a> EvaluatorContext<'a> {
    pub fn new(
        user: &'a User,
        endpoint: &'a ScimEndpointDescription,
        group_provider: &'a GroupProvider,
    ) -> Self {
        Self {
            user,
            endpoint,
            group_provider,
            array_obj: None,
        }
    }

    /// Derive a context whose current array element is `array_obj`.
    pub fn with_array_obj(&self, array_obj: DataObject) -> Self {
        Self {
            user: self.user,
            endpoint: self.endpoint,
            group_provider: self.group_provider,
            array_obj: Some(array_obj),
        }
    }

    pub fn user(&self) -> &'a User {
        self.user
    }

    pub fn endpoint(&self) -> &'a ScimEndpointDescription {
        self.endpoint
    }

    pub fn group_provider(&self) -> &'a GroupProvider {
        self.group_provider
    }

    /// Current element of the enclosing data array, if any.
    pub fn array_obj(&self) -> Option<&DataObject> {
        self.array_obj.as_ref()
    }
}

/// Variables exposed to mapping expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKey {
    IdsByType,
    Attr,
    Attrs,
    AttrObj,
    Groups,
    GroupsObj,
    ArrayObj,
}

impl ContextKey {
    pub const ALL: [ContextKey; 7] = [
        Self::IdsByType,
        Self::Attr,
        Self::Attrs,
        Self::AttrObj,
        Self::Groups,
        Self::GroupsObj,
        Self::ArrayObj,
    ];

    /// Variable name as used in expressions.
    pub fn name(&self) -> &'static str {
        match self {
            Self::IdsByType => "idsByType",
            Self::Attr => "attr",
            Self::Attrs => "attrs",
            Self::AttrObj => "attrObj",
            Self::Groups => "groups",
            Self::GroupsObj => "groupsObj",
            Self::ArrayObj => "arrayObj",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::IdsByType => "Map of identity type to the list of identity values of that type",
            Self::Attr => "Map of attribute name to its first value in internal form",
            Self::Attrs => "Map of attribute name to all its values in internal form",
            Self::AttrObj => "Map of attribute name to all its values as typed objects",
            Self::Groups => "List of paths of the groups the user is a member of",
            Self::GroupsObj => "Map of group path to group object for every membership",
            Self::ArrayObj => "Current element of the data array of a multi-valued attribute",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }

    /// Variables available to an expression of a single-valued attribute.
    pub fn for_single() -> Vec<ContextKey> {
        Self::ALL
            .into_iter()
            .filter(|key| *key != Self::ArrayObj)
            .collect()
    }

    /// Variables available inside a data-array iteration.
    pub fn for_multi() -> Vec<ContextKey> {
        Self::ALL.to_vec()
    }
}
