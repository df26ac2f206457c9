//! Recursive evaluation of complex attributes.

use super::array_resolver::{DataArrayResolver, required_data_array};
use super::context::EvaluatorContext;
use super::registry::{EvaluationResult, MappingEvaluator, MappingEvaluatorRegistry};
use crate::error::{MappingError, MappingResult};
use crate::model::DataObject;
use crate::schema::{
    AttributeDefinition, AttributeDefinitionWithMapping, AttributeMapping, ComplexAttributeMapping,
};
use log::trace;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Evaluator for [`ComplexAttributeMapping`]s.
///
/// Sub-attributes are dispatched through the registry, so they may be of any
/// mapping kind, including complex.
///
/// A single-valued attribute whose sub-attributes all evaluate to nothing is
/// omitted. For a multi-valued attribute, elements whose sub-attributes all
/// evaluate to nothing are skipped, so the resulting list can be shorter than
/// the data array it was built from. An empty data array yields an empty list.
pub struct ComplexMappingEvaluator {
    resolver: Arc<DataArrayResolver>,
}

impl ComplexMappingEvaluator {
    pub fn new(resolver: Arc<DataArrayResolver>) -> Self {
        Self { resolver }
    }

    fn eval_sub_attributes(
        &self,
        definition: &AttributeDefinition,
        context: &EvaluatorContext<'_>,
        registry: &MappingEvaluatorRegistry,
    ) -> MappingResult<BTreeMap<String, DataObject>> {
        let mut entries = BTreeMap::new();
        for sub_attribute in &definition.sub_attributes {
            let result = registry.evaluate(sub_attribute, context)?;
            if let Some(value) = result.value {
                entries.insert(result.attribute_name, value);
            }
        }
        Ok(entries)
    }
}

impl MappingEvaluator for ComplexMappingEvaluator {
    fn id(&self) -> &'static str {
        ComplexAttributeMapping::ID
    }

    fn eval(
        &self,
        attribute: &AttributeDefinitionWithMapping,
        context: &EvaluatorContext<'_>,
        registry: &MappingEvaluatorRegistry,
    ) -> MappingResult<EvaluationResult> {
        let AttributeMapping::Complex(mapping) = &attribute.attribute_mapping else {
            return Err(MappingError::MappingTypeMismatch {
                attribute: attribute.name().to_string(),
                expected: ComplexAttributeMapping::ID,
                actual: attribute.attribute_mapping.id(),
            });
        };
        let definition = &attribute.attribute_definition;

        if !definition.multi_valued {
            let entries = self.eval_sub_attributes(definition, context, registry)?;
            let value = (!entries.is_empty()).then_some(DataObject::Map(entries));
            return Ok(EvaluationResult::new(&definition.name, value));
        }

        let data_array = required_data_array(attribute, mapping.data_array.as_ref())?;
        let elements = self.resolver.resolve(data_array, context)?;
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            let element_context = context.with_array_obj(element);
            let entries = self.eval_sub_attributes(definition, &element_context, registry)?;
            if entries.is_empty() {
                trace!("Element of '{}' has no sub-attribute values, skipping", definition.name);
                continue;
            }
            values.push(DataObject::Map(entries));
        }
        Ok(EvaluationResult::present(&definition.name, DataObject::List(values)))
    }
}
