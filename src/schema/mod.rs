//! Schema definitions carrying attribute mappings.
//!
//! This module provides the data structures that describe which SCIM schemas
//! an endpoint exposes and how every attribute is produced from internal user
//! data.
//!
//! # Key Types
//!
//! - [`SchemaWithMapping`] - SCIM schema with its mapped top-level attributes
//! - [`AttributeDefinitionWithMapping`] - Attribute definition paired with its mapping
//! - [`AttributeMapping`] - Simple, complex or reference mapping
//!
//! # Examples
//!
//! ```rust
//! use scim_mapping::schema::{AttributeMapping, defaults};
//!
//! let schema = defaults::default_user_schema();
//! let user_name = &schema.attributes[0];
//! assert_eq!(user_name.name(), "userName");
//! assert!(matches!(user_name.attribute_mapping, AttributeMapping::Simple(_)));
//! ```

pub mod defaults;
pub mod mapping;
pub mod types;

pub use defaults::{DEFAULT_USER_SCHEMA_ID, default_membership_attributes, default_user_schema};
pub use mapping::{
    AttributeMapping, ComplexAttributeMapping, DataArray, DataArrayType, DataValue, DataValueType,
    ReferenceAttributeMapping, ReferenceType, SimpleAttributeMapping,
};
pub use types::{
    AttributeDefinition, AttributeDefinitionWithMapping, ScimAttributeType, SchemaType,
    SchemaWithMapping,
};
