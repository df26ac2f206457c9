//! Evaluation of reference attributes into resource URIs.

use super::array_resolver::{DataArrayResolver, required_data_array};
use super::context::EvaluatorContext;
use super::expression::{ExpressionEvaluator, evaluate_for_attribute};
use super::registry::{EvaluationResult, MappingEvaluator, MappingEvaluatorRegistry};
use crate::error::{MappingError, MappingResult};
use crate::model::DataObject;
use crate::schema::{
    AttributeDefinitionWithMapping, AttributeMapping, ReferenceAttributeMapping, ReferenceType,
};
use log::trace;
use std::sync::Arc;

/// Evaluator for [`ReferenceAttributeMapping`]s.
///
/// The expression yields a raw identifier. `GROUP` and `USER` references are
/// expanded to `{baseLocation}/Groups/{id}` and `{baseLocation}/Users/{id}`;
/// `GENERIC` references are emitted as produced.
pub struct ReferenceMappingEvaluator {
    resolver: Arc<DataArrayResolver>,
    expressions: Arc<dyn ExpressionEvaluator>,
}

impl ReferenceMappingEvaluator {
    pub fn new(
        resolver: Arc<DataArrayResolver>,
        expressions: Arc<dyn ExpressionEvaluator>,
    ) -> Self {
        Self {
            resolver,
            expressions,
        }
    }

    fn eval_reference(
        &self,
        attribute: &AttributeDefinitionWithMapping,
        mapping: &ReferenceAttributeMapping,
        context: &EvaluatorContext<'_>,
    ) -> MappingResult<Option<DataObject>> {
        let raw = evaluate_for_attribute(
            self.expressions.as_ref(),
            attribute.name(),
            &mapping.expression,
            context,
        )?
        .and_then(|value| value.to_text())
        .filter(|value| !value.is_empty());

        Ok(raw.map(|value| {
            DataObject::String(build_reference(
                mapping.reference_type,
                context.endpoint().base_location(),
                &value,
            ))
        }))
    }
}

fn build_reference(reference_type: ReferenceType, base_location: &str, value: &str) -> String {
    match reference_type {
        ReferenceType::Generic => value.to_string(),
        ReferenceType::Group => format!("{}/Groups/{}", base_location, value),
        ReferenceType::User => format!("{}/Users/{}", base_location, value),
    }
}

impl MappingEvaluator for ReferenceMappingEvaluator {
    fn id(&self) -> &'static str {
        ReferenceAttributeMapping::ID
    }

    fn eval(
        &self,
        attribute: &AttributeDefinitionWithMapping,
        context: &EvaluatorContext<'_>,
        _registry: &MappingEvaluatorRegistry,
    ) -> MappingResult<EvaluationResult> {
        let AttributeMapping::Reference(mapping) = &attribute.attribute_mapping else {
            return Err(MappingError::MappingTypeMismatch {
                attribute: attribute.name().to_string(),
                expected: ReferenceAttributeMapping::ID,
                actual: attribute.attribute_mapping.id(),
            });
        };

        if !attribute.attribute_definition.multi_valued {
            let value = self.eval_reference(attribute, mapping, context)?;
            return Ok(EvaluationResult::new(attribute.name(), value));
        }

        let data_array = required_data_array(attribute, mapping.data_array.as_ref())?;
        let elements = self.resolver.resolve(data_array, context)?;
        let mut references = Vec::with_capacity(elements.len());
        for element in elements {
            let element_context = context.with_array_obj(element);
            match self.eval_reference(attribute, mapping, &element_context)? {
                Some(reference) => references.push(reference),
                None => trace!(
                    "Element of '{}' has no reference value, skipping",
                    attribute.name()
                ),
            }
        }
        Ok(EvaluationResult::present(attribute.name(), DataObject::List(references)))
    }
}
