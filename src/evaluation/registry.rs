//! Dispatch from mapping kind to evaluator.

use super::array_resolver::DataArrayResolver;
use super::complex::ComplexMappingEvaluator;
use super::context::EvaluatorContext;
use super::converter::{AttributeValueConverter, UnityToScimDataConverter};
use super::expression::ExpressionEvaluator;
use super::reference::ReferenceMappingEvaluator;
use super::simple::SimpleMappingEvaluator;
use crate::error::{MappingError, MappingResult};
use crate::model::DataObject;
use crate::schema::AttributeDefinitionWithMapping;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Outcome of evaluating one attribute.
///
/// A `None` value means the attribute is omitted from the output.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub attribute_name: String,
    pub value: Option<DataObject>,
}

impl EvaluationResult {
    pub fn new(attribute_name: impl Into<String>, value: Option<DataObject>) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            value,
        }
    }

    pub fn present(attribute_name: impl Into<String>, value: DataObject) -> Self {
        Self::new(attribute_name, Some(value))
    }

    pub fn absent(attribute_name: impl Into<String>) -> Self {
        Self::new(attribute_name, None)
    }
}

/// Evaluator for one kind of [`AttributeMapping`](crate::schema::AttributeMapping).
///
/// Evaluators are stateless after construction and shared between requests.
pub trait MappingEvaluator: Send + Sync {
    /// Mapping kind this evaluator handles.
    fn id(&self) -> &'static str;

    fn eval(
        &self,
        attribute: &AttributeDefinitionWithMapping,
        context: &EvaluatorContext<'_>,
        registry: &MappingEvaluatorRegistry,
    ) -> MappingResult<EvaluationResult>;
}

/// Registry of mapping evaluators keyed by mapping kind.
#[derive(Clone)]
pub struct MappingEvaluatorRegistry {
    evaluators: HashMap<&'static str, Arc<dyn MappingEvaluator>>,
}

impl MappingEvaluatorRegistry {
    pub fn new(evaluators: Vec<Arc<dyn MappingEvaluator>>) -> Self {
        Self {
            evaluators: evaluators
                .into_iter()
                .map(|evaluator| (evaluator.id(), evaluator))
                .collect(),
        }
    }

    /// Registry with the simple, complex and reference evaluators.
    pub fn standard(
        expressions: Arc<dyn ExpressionEvaluator>,
        value_converter: Arc<dyn AttributeValueConverter>,
    ) -> Self {
        let resolver = Arc::new(DataArrayResolver::new(value_converter.clone()));
        let converter = Arc::new(UnityToScimDataConverter::new(value_converter));

        Self::new(vec![
            Arc::new(SimpleMappingEvaluator::new(
                resolver.clone(),
                converter,
                expressions.clone(),
            )),
            Arc::new(ComplexMappingEvaluator::new(resolver.clone())),
            Arc::new(ReferenceMappingEvaluator::new(resolver, expressions)),
        ])
    }

    /// Evaluator registered for `id`.
    pub fn for_id(&self, id: &str) -> MappingResult<&dyn MappingEvaluator> {
        self.evaluators
            .get(id)
            .map(|evaluator| evaluator.as_ref())
            .ok_or_else(|| MappingError::unknown_mapping_type(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.evaluators.contains_key(id)
    }

    /// Registered mapping kinds, sorted.
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = self.evaluators.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Evaluate an attribute with the evaluator selected by its mapping kind.
    pub fn evaluate(
        &self,
        attribute: &AttributeDefinitionWithMapping,
        context: &EvaluatorContext<'_>,
    ) -> MappingResult<EvaluationResult> {
        self.for_id(attribute.attribute_mapping.id())?
            .eval(attribute, context, self)
    }
}

impl fmt::Debug for MappingEvaluatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingEvaluatorRegistry")
            .field("evaluators", &self.ids())
            .finish()
    }
}
