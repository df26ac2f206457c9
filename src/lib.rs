//! SCIM 2.0 user-schema mapping engine for Rust.
//!
//! Turns internal identity records into SCIM User documents following a
//! declarative, per-endpoint mapping configuration, with scope-based
//! filtering of the attributes an OAuth-delegated caller may read.
//!
//! # Core Components
//!
//! - [`UserSchemaEvaluator`] - Builds the SCIM document of one user
//! - [`MappingEvaluatorRegistry`] - Dispatches attributes by mapping kind
//! - [`ScimEndpointDescription`] - Endpoint configuration with mapped schemas
//! - [`AttributeFilterService`] - Scope-based attribute admission
//!
//! # Quick Start
//!
//! ```rust
//! use scim_mapping::{
//!     InvocationContext, MappingEvaluatorRegistry, ScimEndpointDescription, UserSchemaEvaluator,
//! };
//! use scim_mapping::evaluation::{PathExpressionEvaluator, SyntaxValueConverter};
//! use scim_mapping::model::{Group, GroupProvider, User};
//! use scim_mapping::schema::default_user_schema;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let values = Arc::new(SyntaxValueConverter::new());
//! let registry = MappingEvaluatorRegistry::standard(
//!     Arc::new(PathExpressionEvaluator::new(values.clone())),
//!     values,
//! );
//! let endpoint = ScimEndpointDescription::builder("https://localhost/scim", "/")
//!     .with_schema(default_user_schema())
//!     .build();
//! endpoint.validate(&registry)?;
//!
//! let evaluator = UserSchemaEvaluator::new(Arc::new(endpoint), Arc::new(registry));
//! let user = User::builder(1)
//!     .with_identity("userName", "bjensen")
//!     .with_group("/staff")
//!     .build();
//! let groups = GroupProvider::from_groups(vec![Group::new("/staff")]);
//!
//! let document = evaluator.eval_user(&user, &groups, &InvocationContext::direct())?;
//! assert_eq!(document["groups"][0]["$ref"], "https://localhost/scim/Groups/staff");
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod model;
pub mod schema;

// Re-export commonly used types for convenience
pub use auth::{InvocationContext, ScimScope};
pub use config::ScimEndpointDescription;
pub use error::{ExpressionError, MappingError, MappingResult};
pub use evaluation::{
    AttributeFilterService, EvaluationPolicy, EvaluatorContext, MappingEvaluator,
    MappingEvaluatorRegistry, UserSchemaEvaluator,
};
pub use model::{DataObject, Group, GroupProvider, User};
pub use schema::{AttributeMapping, SchemaWithMapping};
