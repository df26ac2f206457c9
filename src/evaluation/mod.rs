//! The mapping evaluation engine.
//!
//! Evaluation turns one [`User`](crate::model::User) and a set of mapped
//! schemas into a SCIM document. Every top-level attribute admitted by the
//! request's [`AttributeFilter`] is dispatched by its mapping kind through the
//! [`MappingEvaluatorRegistry`]:
//!
//! - [`SimpleMappingEvaluator`] produces scalars and scalar lists
//! - [`ComplexMappingEvaluator`] produces objects by evaluating sub-attributes
//! - [`ReferenceMappingEvaluator`] produces resource URIs
//!
//! Multi-valued attributes iterate over the elements produced by the
//! [`DataArrayResolver`], each element evaluated in its own derived
//! [`EvaluatorContext`]. All evaluators are immutable after construction and
//! can be shared between threads.

pub mod array_resolver;
pub mod complex;
pub mod context;
pub mod converter;
pub mod expression;
pub mod filter;
pub mod reference;
pub mod registry;
pub mod simple;
pub mod user_schema;

pub use array_resolver::DataArrayResolver;
pub use complex::ComplexMappingEvaluator;
pub use context::{ContextKey, EvaluatorContext};
pub use converter::{AttributeValueConverter, SyntaxValueConverter, UnityToScimDataConverter};
pub use expression::{ExpressionEvaluator, PathExpressionEvaluator, context_variables};
pub use filter::{AttributeFilter, AttributeFilterService};
pub use reference::ReferenceMappingEvaluator;
pub use registry::{EvaluationResult, MappingEvaluator, MappingEvaluatorRegistry};
pub use simple::SimpleMappingEvaluator;
pub use user_schema::{EvaluationPolicy, UserSchemaEvaluator};
