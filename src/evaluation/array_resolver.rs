//! Source collections of multi-valued attributes.

use super::context::EvaluatorContext;
use super::converter::AttributeValueConverter;
use crate::error::{MappingError, MappingResult};
use crate::model::DataObject;
use crate::schema::{AttributeDefinitionWithMapping, DataArray, DataArrayType};
use log::{debug, trace};
use std::sync::Arc;

/// Produces the elements a multi-valued attribute iterates over.
#[derive(Clone)]
pub struct DataArrayResolver {
    value_converter: Arc<dyn AttributeValueConverter>,
}

impl DataArrayResolver {
    pub fn new(value_converter: Arc<dyn AttributeValueConverter>) -> Self {
        Self { value_converter }
    }

    /// Resolve the elements selected by `data_array` for the context's user.
    ///
    /// Missing attributes, missing identities and unresolvable groups yield no
    /// elements rather than errors.
    pub fn resolve(
        &self,
        data_array: &DataArray,
        context: &EvaluatorContext<'_>,
    ) -> MappingResult<Vec<DataObject>> {
        let user = context.user();
        let elements = match data_array.array_type {
            DataArrayType::Attribute => match user.attribute(data_array.value_str()) {
                Some(attribute) => self.value_converter.internal_values_to_objects(attribute)?,
                None => Vec::new(),
            },
            DataArrayType::Identity => user
                .identities_of_type(data_array.value_str())
                .map(|identity| DataObject::String(identity.value.clone()))
                .collect(),
            DataArrayType::Membership => user
                .group_paths()
                .filter_map(|path| {
                    let group = context.group_provider().get(&path);
                    if group.is_none() {
                        debug!("Skipping membership in unresolvable group '{}'", path);
                    }
                    group.map(DataObject::Group)
                })
                .collect(),
        };

        trace!(
            "Resolved {} element(s) for {:?} data array '{}'",
            elements.len(),
            data_array.array_type,
            data_array.value_str()
        );
        Ok(elements)
    }
}

impl std::fmt::Debug for DataArrayResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataArrayResolver").finish_non_exhaustive()
    }
}

/// Data array of a multi-valued attribute, which every such mapping must have.
pub(crate) fn required_data_array<'m>(
    attribute: &AttributeDefinitionWithMapping,
    data_array: Option<&'m DataArray>,
) -> MappingResult<&'m DataArray> {
    data_array.ok_or_else(|| MappingError::MultiValuedWithoutDataArray {
        attribute: attribute.name().to_string(),
    })
}
