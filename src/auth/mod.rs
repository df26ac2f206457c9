//! Invocation context supplied by the authentication layer.
//!
//! A SCIM read is either invoked directly by an authenticated client or on
//! behalf of a user through OAuth delegation. Delegated invocations carry the
//! granted scopes, which restrict the attributes the caller may read.
//!
//! # Example Usage
//!
//! ```rust
//! use scim_mapping::auth::{InvocationContext, ScimScope};
//!
//! let direct = InvocationContext::direct();
//! assert!(!direct.is_oauth_delegated());
//!
//! let delegated = InvocationContext::oauth_delegation(["sys:scim:read_profile"]);
//! assert!(delegated.has_scope(ScimScope::ReadProfile));
//! assert!(!delegated.has_scope(ScimScope::ReadMemberships));
//! ```

use std::collections::HashSet;
use std::fmt;

/// OAuth scopes understood by the SCIM endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScimScope {
    /// Read profile (non-membership) attributes
    ReadProfile,
    /// Read membership attributes
    ReadMemberships,
}

impl ScimScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadProfile => "sys:scim:read_profile",
            Self::ReadMemberships => "sys:scim:read_memberships",
        }
    }
}

impl fmt::Display for ScimScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the current request was authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationMaterial {
    /// Client authenticated on its own behalf
    Direct,
    /// Access token issued to a client on behalf of a user
    OAuthDelegation { scopes: HashSet<String> },
}

/// Security context of a single SCIM invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    pub material: InvocationMaterial,
}

impl InvocationContext {
    pub fn direct() -> Self {
        Self {
            material: InvocationMaterial::Direct,
        }
    }

    pub fn oauth_delegation<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            material: InvocationMaterial::OAuthDelegation {
                scopes: scopes.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn is_oauth_delegated(&self) -> bool {
        matches!(self.material, InvocationMaterial::OAuthDelegation { .. })
    }

    /// Whether the scope was granted; always false for direct invocations.
    pub fn has_scope(&self, scope: ScimScope) -> bool {
        match &self.material {
            InvocationMaterial::Direct => false,
            InvocationMaterial::OAuthDelegation { scopes } => scopes.contains(scope.as_str()),
        }
    }
}

impl Default for InvocationContext {
    fn default() -> Self {
        Self::direct()
    }
}
