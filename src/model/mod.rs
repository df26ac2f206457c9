//! Internal identity data consumed by the mapping engine.
//!
//! # Key Types
//!
//! - [`User`] - Read-only snapshot of attributes, identities and memberships
//! - [`Group`] / [`GroupProvider`] - Group objects and per-request lookup
//! - [`DataObject`] - Generic value passed between evaluators and expressions

pub mod group;
pub mod user;
pub mod value;

pub use group::{Group, GroupProvider, GroupResolver, absolute_path};
pub use user::{
    EMAIL_IDENTITY, IDENTIFIER_IDENTITY, Identity, PERSISTENT_IDENTITY, USER_NAME_IDENTITY, User,
    UserAttribute, UserBuilder,
};
pub use value::DataObject;
