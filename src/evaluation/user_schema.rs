//! Assembly of the SCIM User document from mapped schemas.

use super::context::EvaluatorContext;
use super::filter::AttributeFilterService;
use super::registry::{EvaluationResult, MappingEvaluatorRegistry};
use crate::auth::InvocationContext;
use crate::config::ScimEndpointDescription;
use crate::error::MappingResult;
use crate::model::{GroupProvider, User};
use crate::schema::{AttributeDefinitionWithMapping, SchemaWithMapping};
use log::{debug, trace, warn};
use serde_json::{Map, Value};
use std::sync::Arc;

/// How failures of individual attributes affect the whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvaluationPolicy {
    /// Data errors of one top-level attribute omit that attribute.
    /// Configuration errors still fail the evaluation.
    #[default]
    IsolateAttributeFailures,
    /// Any error fails the evaluation
    FailFast,
}

/// Evaluates a user against the mapped schemas of an endpoint.
///
/// Attributes of core schemas are placed at the top level of the document,
/// attributes of extension schemas in an object keyed by the schema id. The
/// `schemas` member lists the ids of all evaluated schemas.
///
/// # Example Usage
///
/// ```rust
/// use scim_mapping::auth::InvocationContext;
/// use scim_mapping::config::ScimEndpointDescription;
/// use scim_mapping::evaluation::{
///     MappingEvaluatorRegistry, PathExpressionEvaluator, SyntaxValueConverter,
///     UserSchemaEvaluator,
/// };
/// use scim_mapping::model::{GroupProvider, User};
/// use scim_mapping::schema::default_user_schema;
/// use std::sync::Arc;
///
/// let values = Arc::new(SyntaxValueConverter::new());
/// let registry = MappingEvaluatorRegistry::standard(
///     Arc::new(PathExpressionEvaluator::new(values.clone())),
///     values,
/// );
/// let endpoint = ScimEndpointDescription::builder("https://localhost/scim", "/")
///     .with_schema(default_user_schema())
///     .build();
/// let evaluator = UserSchemaEvaluator::new(Arc::new(endpoint), Arc::new(registry));
///
/// let user = User::builder(7).with_identity("userName", "bjensen").build();
/// let document =
///     evaluator.eval_user(&user, &GroupProvider::empty(), &InvocationContext::direct())?;
/// assert_eq!(document["userName"], "bjensen");
/// # Ok::<(), scim_mapping::MappingError>(())
/// ```
#[derive(Debug, Clone)]
pub struct UserSchemaEvaluator {
    endpoint: Arc<ScimEndpointDescription>,
    registry: Arc<MappingEvaluatorRegistry>,
    policy: EvaluationPolicy,
}

impl UserSchemaEvaluator {
    pub fn new(
        endpoint: Arc<ScimEndpointDescription>,
        registry: Arc<MappingEvaluatorRegistry>,
    ) -> Self {
        Self {
            endpoint,
            registry,
            policy: EvaluationPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: EvaluationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn endpoint(&self) -> &ScimEndpointDescription {
        &self.endpoint
    }

    pub fn policy(&self) -> EvaluationPolicy {
        self.policy
    }

    /// Evaluate `user` against the schemas configured on the endpoint.
    pub fn eval_user(
        &self,
        user: &User,
        group_provider: &GroupProvider,
        invocation: &InvocationContext,
    ) -> MappingResult<Map<String, Value>> {
        self.eval_user_schema(user, self.endpoint.schemas(), group_provider, invocation)
    }

    /// Evaluate `user` against `schemas`.
    ///
    /// Disabled schemas and schemas that do not apply to users are skipped.
    /// Top-level attributes rejected by the request's
    /// [`AttributeFilter`](super::AttributeFilter) are not evaluated.
    pub fn eval_user_schema(
        &self,
        user: &User,
        schemas: &[SchemaWithMapping],
        group_provider: &GroupProvider,
        invocation: &InvocationContext,
    ) -> MappingResult<Map<String, Value>> {
        let context = EvaluatorContext::new(user, &self.endpoint, group_provider);
        let filter = AttributeFilterService::filter(&self.endpoint, invocation);

        let mut document = Map::new();
        let mut schema_ids = Vec::new();

        for schema in schemas {
            if !schema.enabled || !schema.schema_type.is_user() {
                debug!(
                    "Skipping schema '{}' (enabled: {}, type: {:?})",
                    schema.id, schema.enabled, schema.schema_type
                );
                continue;
            }
            trace!("Evaluating schema '{}' for user {}", schema.id, user.entity_id);

            let mut section = Map::new();
            for attribute in schema.attributes.iter().filter(filter.as_predicate()) {
                if let Some(result) = self.eval_attribute(attribute, &context)? {
                    if let Some(value) = result.value {
                        section.insert(result.attribute_name, value.to_json()?);
                    }
                }
            }

            if schema.schema_type.is_core() {
                document.extend(section);
            } else if !section.is_empty() {
                document.insert(schema.id.clone(), Value::Object(section));
            }
            schema_ids.push(Value::String(schema.id.clone()));
        }

        document.insert("schemas".to_string(), Value::Array(schema_ids));
        debug!("Evaluated {} member(s) for user {}", document.len() - 1, user.entity_id);
        Ok(document)
    }

    fn eval_attribute(
        &self,
        attribute: &AttributeDefinitionWithMapping,
        context: &EvaluatorContext<'_>,
    ) -> MappingResult<Option<EvaluationResult>> {
        match self.registry.evaluate(attribute, context) {
            Ok(result) => Ok(Some(result)),
            Err(error)
                if self.policy == EvaluationPolicy::IsolateAttributeFailures
                    && !error.is_configuration_error() =>
            {
                warn!("Omitting attribute '{}': {}", attribute.name(), error);
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }
}
