//! Error types for SCIM mapping evaluation.
//!
//! Errors fall into two classes. Configuration errors describe a broken mapping
//! deployment (unknown mapping kind, undeclared type conversion, multi-valued
//! attribute without a data array) and never go away by retrying. Data errors
//! come from the evaluated user or from expressions and are scoped to a single
//! attribute. Absent data is not an error at all: it results in an omitted field.

use crate::schema::ScimAttributeType;

/// Main error type for mapping evaluation and mapping configuration.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// No evaluator is registered for a mapping kind found in a live mapping
    #[error("No mapping evaluator registered for mapping type '{mapping_type}'")]
    UnknownMappingType { mapping_type: String },

    /// An evaluator was handed a mapping of a kind it does not handle
    #[error("Attribute '{attribute}' has mapping type '{actual}', evaluator expects '{expected}'")]
    MappingTypeMismatch {
        attribute: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Multi-valued attribute whose mapping has no data array
    #[error("Multi-valued attribute '{attribute}' has no data array in its mapping")]
    MultiValuedWithoutDataArray { attribute: String },

    /// Source/target pair outside the declared conversion matrix
    #[error("Conversion of {source_type} value to SCIM type {target} is not supported")]
    UnsupportedConversion {
        source_type: &'static str,
        target: ScimAttributeType,
    },

    /// Declared conversion pair, but the input cannot be converted
    #[error("Value '{value}' cannot be converted to SCIM type {target}: {reason}")]
    InvalidValue {
        value: String,
        target: ScimAttributeType,
        reason: String,
    },

    /// Expression evaluation failed for an attribute
    #[error("Evaluation of expression '{expression}' for attribute '{attribute}' failed: {source}")]
    Expression {
        attribute: String,
        expression: String,
        #[source]
        source: ExpressionError,
    },

    /// Internal attribute values could not be turned into generic objects
    #[error("Values of attribute '{attribute}' cannot be converted: {message}")]
    AttributeValueConversion { attribute: String, message: String },

    /// Mapping configuration rejected at load time
    #[error("Invalid mapping configuration: {message}")]
    InvalidConfiguration { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MappingError {
    /// Create an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create an unknown mapping type error.
    pub fn unknown_mapping_type(mapping_type: impl Into<String>) -> Self {
        Self::UnknownMappingType {
            mapping_type: mapping_type.into(),
        }
    }

    /// Whether the error indicates a bad mapping deployment rather than bad data.
    ///
    /// Configuration errors are fatal for every user evaluated with the same
    /// mapping and must never be swallowed by per-attribute isolation.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownMappingType { .. }
                | Self::MappingTypeMismatch { .. }
                | Self::MultiValuedWithoutDataArray { .. }
                | Self::UnsupportedConversion { .. }
                | Self::InvalidConfiguration { .. }
                | Self::Json(_)
                | Self::Io(_)
        )
    }
}

/// Errors raised by an [`ExpressionEvaluator`](crate::evaluation::ExpressionEvaluator).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExpressionError {
    /// The expression could not be parsed
    #[error("Syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    /// The expression refers to a variable that is not in the context
    #[error("Unknown variable '{0}'")]
    UnknownVariable(String),

    /// A member or index access was applied to a value that does not support it
    #[error("Cannot access '{member}' on {value_type} value")]
    InvalidAccess {
        member: String,
        value_type: &'static str,
    },

    /// Evaluation failed for another reason
    #[error("{0}")]
    Evaluation(String),
}

/// Result type alias for mapping operations.
pub type MappingResult<T> = Result<T, MappingError>;
