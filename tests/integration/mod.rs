//! Integration tests for the mapping engine.
//!
//! Every test drives the public API: endpoint descriptions are built or
//! loaded, a [`UserSchemaEvaluator`](scim_mapping::UserSchemaEvaluator) is
//! constructed over the standard registry and whole SCIM documents are
//! compared.

pub mod configuration;
pub mod end_to_end;
pub mod filtering;
pub mod properties;
