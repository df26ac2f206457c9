//! Declarative attribute mappings.
//!
//! A mapping tells the evaluation engine where the value of a SCIM attribute
//! comes from: a user attribute, an identity, an expression, or (for
//! multi-valued attributes) the current element of a [`DataArray`].

use serde::{Deserialize, Serialize};

/// Source of a single value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataValueType {
    /// Value of the user attribute named by `value`
    Attribute,
    /// Value of the first identity whose type is `value`
    Identity,
    /// Result of evaluating `value` as an expression
    Mvel,
    /// The current element of the enclosing data array
    Array,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataValue {
    #[serde(rename = "type")]
    pub value_type: DataValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl DataValue {
    pub fn attribute(name: impl Into<String>) -> Self {
        Self {
            value_type: DataValueType::Attribute,
            value: Some(name.into()),
        }
    }

    pub fn identity(type_id: impl Into<String>) -> Self {
        Self {
            value_type: DataValueType::Identity,
            value: Some(type_id.into()),
        }
    }

    pub fn mvel(expression: impl Into<String>) -> Self {
        Self {
            value_type: DataValueType::Mvel,
            value: Some(expression.into()),
        }
    }

    pub fn array() -> Self {
        Self {
            value_type: DataValueType::Array,
            value: None,
        }
    }

    /// The selector or expression; empty when not set.
    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}

/// Source collection kind of a multi-valued attribute.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataArrayType {
    /// All values of the user attribute named by `value`
    Attribute,
    /// Values of all identities of type `value`
    Identity,
    /// All groups the user is a member of
    Membership,
}

/// Declarative selector for the elements of a multi-valued attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataArray {
    #[serde(rename = "type")]
    pub array_type: DataArrayType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl DataArray {
    pub fn attribute(name: impl Into<String>) -> Self {
        Self {
            array_type: DataArrayType::Attribute,
            value: Some(name.into()),
        }
    }

    pub fn identity(type_id: impl Into<String>) -> Self {
        Self {
            array_type: DataArrayType::Identity,
            value: Some(type_id.into()),
        }
    }

    pub fn membership() -> Self {
        Self {
            array_type: DataArrayType::Membership,
            value: None,
        }
    }

    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}

/// Mapping of a scalar (or scalar array) attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleAttributeMapping {
    pub data_value: DataValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_array: Option<DataArray>,
}

impl SimpleAttributeMapping {
    pub const ID: &'static str = "Simple";

    pub fn new(data_value: DataValue) -> Self {
        Self {
            data_value,
            data_array: None,
        }
    }

    pub fn with_data_array(mut self, data_array: DataArray) -> Self {
        self.data_array = Some(data_array);
        self
    }
}

/// Mapping of a complex attribute; sub-attribute mappings live on the sub-attributes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexAttributeMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_array: Option<DataArray>,
}

impl ComplexAttributeMapping {
    pub const ID: &'static str = "Complex";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_array(mut self, data_array: DataArray) -> Self {
        self.data_array = Some(data_array);
        self
    }
}

/// What a reference attribute points to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceType {
    /// Arbitrary URI produced by the expression
    #[default]
    Generic,
    /// A Group resource of this endpoint
    Group,
    /// A User resource of this endpoint
    User,
}

/// Mapping of a reference attribute to a URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceAttributeMapping {
    #[serde(rename = "type")]
    pub reference_type: ReferenceType,
    pub expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_array: Option<DataArray>,
}

impl ReferenceAttributeMapping {
    pub const ID: &'static str = "Reference";

    pub fn new(reference_type: ReferenceType, expression: impl Into<String>) -> Self {
        Self {
            reference_type,
            expression: expression.into(),
            data_array: None,
        }
    }

    pub fn with_data_array(mut self, data_array: DataArray) -> Self {
        self.data_array = Some(data_array);
        self
    }
}

/// Mapping attached to an attribute definition.
///
/// Each variant has a stable [`id`](AttributeMapping::id) used to select the
/// evaluator from a [`MappingEvaluatorRegistry`](crate::evaluation::MappingEvaluatorRegistry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mappingType")]
pub enum AttributeMapping {
    Simple(SimpleAttributeMapping),
    Complex(ComplexAttributeMapping),
    Reference(ReferenceAttributeMapping),
}

impl AttributeMapping {
    /// Stable identifier of the mapping kind.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Simple(_) => SimpleAttributeMapping::ID,
            Self::Complex(_) => ComplexAttributeMapping::ID,
            Self::Reference(_) => ReferenceAttributeMapping::ID,
        }
    }

    /// Data array of the mapping, whatever its kind.
    pub fn data_array(&self) -> Option<&DataArray> {
        match self {
            Self::Simple(mapping) => mapping.data_array.as_ref(),
            Self::Complex(mapping) => mapping.data_array.as_ref(),
            Self::Reference(mapping) => mapping.data_array.as_ref(),
        }
    }
}

impl From<SimpleAttributeMapping> for AttributeMapping {
    fn from(mapping: SimpleAttributeMapping) -> Self {
        Self::Simple(mapping)
    }
}

impl From<ComplexAttributeMapping> for AttributeMapping {
    fn from(mapping: ComplexAttributeMapping) -> Self {
        Self::Complex(mapping)
    }
}

impl From<ReferenceAttributeMapping> for AttributeMapping {
    fn from(mapping: ReferenceAttributeMapping) -> Self {
        Self::Reference(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mapping_ids_are_stable() {
        let simple = SimpleAttributeMapping::new(DataValue::array());
        let reference =
            ReferenceAttributeMapping::new(ReferenceType::User, "idsByType['persistent'][0]");
        assert_eq!(AttributeMapping::from(simple).id(), "Simple");
        assert_eq!(AttributeMapping::from(ComplexAttributeMapping::new()).id(), "Complex");
        assert_eq!(AttributeMapping::from(reference).id(), "Reference");
    }

    #[test]
    fn test_mapping_deserializes_from_tagged_json() {
        let mapping: AttributeMapping = serde_json::from_value(json!({
            "mappingType": "Simple",
            "dataValue": { "type": "MVEL", "value": "arrayObj" },
            "dataArray": { "type": "IDENTITY", "value": "email" }
        }))
        .expect("valid mapping");

        assert_eq!(
            mapping,
            AttributeMapping::Simple(
                SimpleAttributeMapping::new(DataValue::mvel("arrayObj"))
                    .with_data_array(DataArray::identity("email"))
            )
        );
    }

    #[test]
    fn test_reference_mapping_deserializes() {
        let mapping: AttributeMapping = serde_json::from_value(json!({
            "mappingType": "Reference",
            "type": "GROUP",
            "expression": "arrayObj.path",
            "dataArray": { "type": "MEMBERSHIP" }
        }))
        .expect("valid mapping");

        match mapping {
            AttributeMapping::Reference(reference) => {
                assert_eq!(reference.reference_type, ReferenceType::Group);
                assert_eq!(reference.data_array, Some(DataArray::membership()));
            }
            other => panic!("Expected reference mapping, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_mapping_type_is_rejected() {
        let result = serde_json::from_value::<AttributeMapping>(json!({
            "mappingType": "Scripted",
            "script": "x"
        }));
        assert!(result.is_err());
    }
}
