//! Type coercion between internal values and SCIM attribute types.
//!
//! The conversion matrix is closed: every source/target pair that is not
//! listed in [`UnityToScimDataConverter::convert_to_type`] fails with
//! [`MappingError::UnsupportedConversion`] instead of a best-effort cast.

use crate::error::{MappingError, MappingResult};
use crate::model::{DataObject, User, UserAttribute};
use crate::schema::ScimAttributeType;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::sync::Arc;

/// Converts internal, syntax-encoded attribute values to generic objects.
pub trait AttributeValueConverter: Send + Sync {
    fn internal_values_to_objects(
        &self,
        attribute: &UserAttribute,
    ) -> MappingResult<Vec<DataObject>>;
}

/// Converter keyed by the attribute's syntax id.
///
/// Unknown syntaxes are passed through as strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxValueConverter;

impl SyntaxValueConverter {
    pub fn new() -> Self {
        Self
    }

    fn convert_value(&self, attribute: &UserAttribute, raw: &str) -> MappingResult<DataObject> {
        let failed = |message: String| MappingError::AttributeValueConversion {
            attribute: attribute.name.clone(),
            message,
        };

        match attribute.syntax_id.as_str() {
            "integer" => raw
                .trim()
                .parse::<i64>()
                .map(DataObject::Integer)
                .map_err(|e| failed(format!("'{}' is not an integer: {}", raw, e))),
            "floatingPoint" => raw
                .trim()
                .parse::<f64>()
                .map(DataObject::Decimal)
                .map_err(|e| failed(format!("'{}' is not a number: {}", raw, e))),
            "dateTime" | "timestamp" => parse_internal_datetime(raw)
                .map(DataObject::DateTime)
                .ok_or_else(|| failed(format!("'{}' is not a date-time", raw))),
            "date" => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|midnight| DataObject::DateTime(midnight.and_utc()))
                .ok_or_else(|| failed(format!("'{}' is not a date", raw))),
            "jpegImage" | "image" => BASE64
                .decode(raw.trim())
                .map(DataObject::Binary)
                .map_err(|e| failed(format!("image value is not base64: {}", e))),
            _ => Ok(DataObject::String(raw.to_string())),
        }
    }
}

fn parse_internal_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    raw.parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}

impl AttributeValueConverter for SyntaxValueConverter {
    fn internal_values_to_objects(
        &self,
        attribute: &UserAttribute,
    ) -> MappingResult<Vec<DataObject>> {
        attribute
            .values
            .iter()
            .map(|raw| self.convert_value(attribute, raw))
            .collect()
    }
}

/// Converts user data to values of declared SCIM attribute types.
#[derive(Clone)]
pub struct UnityToScimDataConverter {
    value_converter: Arc<dyn AttributeValueConverter>,
}

impl UnityToScimDataConverter {
    pub fn new(value_converter: Arc<dyn AttributeValueConverter>) -> Self {
        Self { value_converter }
    }

    /// First value of the named user attribute, converted to `scim_type`.
    ///
    /// `None` when the attribute is absent or has no values.
    pub fn convert_user_attribute_to_type(
        &self,
        user: &User,
        attribute_name: &str,
        scim_type: ScimAttributeType,
    ) -> MappingResult<Option<DataObject>> {
        let Some(attribute) = user.attribute(attribute_name) else {
            return Ok(None);
        };
        let first = self
            .value_converter
            .internal_values_to_objects(attribute)?
            .into_iter()
            .next();
        first.map(|value| Self::convert_to_type(value, scim_type)).transpose()
    }

    /// Value of the first identity of the given type, converted to `scim_type`.
    pub fn convert_user_identity_to_type(
        &self,
        user: &User,
        identity_type: &str,
        scim_type: ScimAttributeType,
    ) -> MappingResult<Option<DataObject>> {
        let Some(identity) = user.identity(identity_type) else {
            return Ok(None);
        };
        let raw = DataObject::String(identity.value.clone());
        if scim_type == ScimAttributeType::String {
            return Ok(Some(raw));
        }
        Self::convert_to_type(raw, scim_type).map(Some)
    }

    /// Coerce a value to the given SCIM type.
    pub fn convert_to_type(
        value: DataObject,
        scim_type: ScimAttributeType,
    ) -> MappingResult<DataObject> {
        use DataObject as D;
        use ScimAttributeType as T;

        match (scim_type, value) {
            (T::String, D::String(s)) => Ok(D::String(s)),
            (
                T::String,
                value @ (D::Boolean(_)
                | D::Integer(_)
                | D::Decimal(_)
                | D::DateTime(_)
                | D::Group(_)),
            ) => Ok(D::String(value.to_text().unwrap_or_default())),

            (T::Boolean, D::Boolean(b)) => Ok(D::Boolean(b)),
            (T::Boolean, D::String(s)) => match s.as_str() {
                "true" => Ok(D::Boolean(true)),
                "false" => Ok(D::Boolean(false)),
                _ => Err(invalid(s, T::Boolean, "expected 'true' or 'false'")),
            },

            (T::Integer, D::Integer(i)) => Ok(D::Integer(i)),
            (T::Integer, D::String(s)) => match s.trim().parse::<i64>() {
                Ok(i) => Ok(D::Integer(i)),
                Err(e) => Err(invalid(s, T::Integer, e.to_string())),
            },

            (T::Decimal, D::Decimal(d)) => Ok(D::Decimal(d)),
            (T::Decimal, D::Integer(i)) => Ok(D::Decimal(i as f64)),
            (T::Decimal, D::String(s)) => match s.trim().parse::<f64>() {
                Ok(d) => Ok(D::Decimal(d)),
                Err(e) => Err(invalid(s, T::Decimal, e.to_string())),
            },

            (T::DateTime, D::DateTime(dt)) => Ok(D::DateTime(dt)),
            (T::DateTime, D::String(s)) => match DateTime::parse_from_rfc3339(s.trim()) {
                Ok(parsed) => Ok(D::DateTime(parsed.with_timezone(&Utc))),
                Err(e) => Err(invalid(s, T::DateTime, e.to_string())),
            },

            (T::Binary, D::Binary(bytes)) => Ok(D::String(BASE64.encode(bytes))),
            (T::Binary, D::String(s)) => Ok(D::String(s)),

            (T::Reference, D::String(s)) => Ok(D::String(s)),

            (T::Complex, D::Map(entries)) => Ok(D::Map(entries)),

            (target, value) => Err(MappingError::UnsupportedConversion {
                source_type: value.type_name(),
                target,
            }),
        }
    }
}

fn invalid(value: String, target: ScimAttributeType, reason: impl Into<String>) -> MappingError {
    MappingError::InvalidValue {
        value,
        target,
        reason: reason.into(),
    }
}

impl std::fmt::Debug for UnityToScimDataConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnityToScimDataConverter").finish_non_exhaustive()
    }
}
