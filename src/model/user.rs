//! Read-only snapshot of an internal identity record.

use super::group::absolute_path;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identity type of the user name identity.
pub const USER_NAME_IDENTITY: &str = "userName";
/// Identity type of the persistent (immutable) identifier.
pub const PERSISTENT_IDENTITY: &str = "persistent";
/// Identity type of e-mail identities.
pub const EMAIL_IDENTITY: &str = "email";
/// Identity type of free-form identifiers.
pub const IDENTIFIER_IDENTITY: &str = "identifier";

/// Attribute of a user as stored internally.
///
/// Values are kept in their internal syntax encoding; an
/// [`AttributeValueConverter`](crate::evaluation::AttributeValueConverter)
/// turns them into [`DataObject`](super::DataObject)s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAttribute {
    pub name: String,
    pub syntax_id: String,
    pub group_path: String,
    pub values: Vec<String>,
}

impl UserAttribute {
    pub fn new(
        name: impl Into<String>,
        syntax_id: impl Into<String>,
        group_path: impl Into<String>,
        values: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            syntax_id: syntax_id.into(),
            group_path: group_path.into(),
            values,
        }
    }

    /// String-syntax attribute in the root group.
    pub fn string(name: impl Into<String>, values: &[&str]) -> Self {
        Self::new(
            name,
            "string",
            "/",
            values.iter().map(|v| v.to_string()).collect(),
        )
    }
}

/// Identity of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub type_id: String,
    pub value: String,
    pub entity_id: i64,
}

impl Identity {
    pub fn new(type_id: impl Into<String>, value: impl Into<String>, entity_id: i64) -> Self {
        Self {
            type_id: type_id.into(),
            value: value.into(),
            entity_id,
        }
    }
}

/// Snapshot of a user for one evaluation; never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub entity_id: i64,
    #[serde(default)]
    pub attributes: Vec<UserAttribute>,
    #[serde(default)]
    pub identities: Vec<Identity>,
    /// Paths of the groups the user is a member of
    #[serde(default)]
    pub groups: BTreeSet<String>,
}

impl User {
    pub fn builder(entity_id: i64) -> UserBuilder {
        UserBuilder {
            user: User {
                entity_id,
                ..Default::default()
            },
        }
    }

    /// First attribute with the given name.
    pub fn attribute(&self, name: &str) -> Option<&UserAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// All identities of the given type, in stored order.
    pub fn identities_of_type<'a, 'b>(
        &'a self,
        type_id: &'b str,
    ) -> impl Iterator<Item = &'a Identity> + use<'a, 'b> {
        self.identities.iter().filter(move |i| i.type_id == type_id)
    }

    /// First identity of the given type.
    pub fn identity(&self, type_id: &str) -> Option<&Identity> {
        self.identities.iter().find(|i| i.type_id == type_id)
    }

    /// Group paths normalized to absolute form.
    pub fn group_paths(&self) -> impl Iterator<Item = String> + '_ {
        self.groups.iter().map(|g| absolute_path(g))
    }
}

/// Fluent builder for [`User`] snapshots.
#[derive(Debug, Clone)]
pub struct UserBuilder {
    user: User,
}

impl UserBuilder {
    pub fn with_attribute(mut self, attribute: UserAttribute) -> Self {
        self.user.attributes.push(attribute);
        self
    }

    pub fn with_identity(mut self, type_id: impl Into<String>, value: impl Into<String>) -> Self {
        let entity_id = self.user.entity_id;
        self.user
            .identities
            .push(Identity::new(type_id, value, entity_id));
        self
    }

    pub fn with_group(mut self, path: impl Into<String>) -> Self {
        self.user.groups.insert(path.into());
        self
    }

    pub fn with_groups<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.user.groups.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> User {
        self.user
    }
}
