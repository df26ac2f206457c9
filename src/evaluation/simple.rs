//! Evaluation of scalar and scalar-array attributes.

use super::array_resolver::{DataArrayResolver, required_data_array};
use super::context::EvaluatorContext;
use super::converter::UnityToScimDataConverter;
use super::expression::{ExpressionEvaluator, evaluate_for_attribute};
use super::registry::{EvaluationResult, MappingEvaluator, MappingEvaluatorRegistry};
use crate::error::{MappingError, MappingResult};
use crate::model::DataObject;
use crate::schema::{
    AttributeDefinition, AttributeDefinitionWithMapping, AttributeMapping, DataValue,
    DataValueType, SimpleAttributeMapping,
};
use log::trace;
use std::sync::Arc;

/// Evaluator for [`SimpleAttributeMapping`]s.
pub struct SimpleMappingEvaluator {
    resolver: Arc<DataArrayResolver>,
    converter: Arc<UnityToScimDataConverter>,
    expressions: Arc<dyn ExpressionEvaluator>,
}

impl SimpleMappingEvaluator {
    pub fn new(
        resolver: Arc<DataArrayResolver>,
        converter: Arc<UnityToScimDataConverter>,
        expressions: Arc<dyn ExpressionEvaluator>,
    ) -> Self {
        Self {
            resolver,
            converter,
            expressions,
        }
    }

    fn eval_data_value(
        &self,
        definition: &AttributeDefinition,
        data_value: &DataValue,
        context: &EvaluatorContext<'_>,
    ) -> MappingResult<Option<DataObject>> {
        match data_value.value_type {
            DataValueType::Mvel => evaluate_for_attribute(
                self.expressions.as_ref(),
                &definition.name,
                data_value.value_str(),
                context,
            ),
            DataValueType::Attribute => self.converter.convert_user_attribute_to_type(
                context.user(),
                data_value.value_str(),
                definition.data_type,
            ),
            DataValueType::Identity => self.converter.convert_user_identity_to_type(
                context.user(),
                data_value.value_str(),
                definition.data_type,
            ),
            DataValueType::Array => context
                .array_obj()
                .cloned()
                .map(|element| {
                    UnityToScimDataConverter::convert_to_type(element, definition.data_type)
                })
                .transpose(),
        }
    }
}

impl MappingEvaluator for SimpleMappingEvaluator {
    fn id(&self) -> &'static str {
        SimpleAttributeMapping::ID
    }

    fn eval(
        &self,
        attribute: &AttributeDefinitionWithMapping,
        context: &EvaluatorContext<'_>,
        _registry: &MappingEvaluatorRegistry,
    ) -> MappingResult<EvaluationResult> {
        let AttributeMapping::Simple(mapping) = &attribute.attribute_mapping else {
            return Err(MappingError::MappingTypeMismatch {
                attribute: attribute.name().to_string(),
                expected: SimpleAttributeMapping::ID,
                actual: attribute.attribute_mapping.id(),
            });
        };
        let definition = &attribute.attribute_definition;

        if !definition.multi_valued {
            let value = self.eval_data_value(definition, &mapping.data_value, context)?;
            return Ok(EvaluationResult::new(&definition.name, value));
        }

        let data_array = required_data_array(attribute, mapping.data_array.as_ref())?;
        let elements = self.resolver.resolve(data_array, context)?;
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            let element_context = context.with_array_obj(element);
            match self.eval_data_value(definition, &mapping.data_value, &element_context)? {
                Some(value) => values.push(value),
                None => trace!("Element of '{}' evaluated to no value, skipping", definition.name),
            }
        }
        Ok(EvaluationResult::present(&definition.name, DataObject::List(values)))
    }
}
