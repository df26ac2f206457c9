//! Generic values flowing through the mapping engine.
//!
//! Internal attribute values, identity values, group objects, expression
//! results and SCIM output values are all represented as [`DataObject`].

use super::group::Group;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataObject {
    String(String),
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    /// Point in time, serialized as RFC 3339
    DateTime(DateTime<Utc>),
    /// Raw bytes, serialized as base64
    #[serde(serialize_with = "serialize_base64")]
    Binary(Vec<u8>),
    Group(Group),
    List(Vec<DataObject>),
    Map(BTreeMap<String, DataObject>),
}

#[allow(clippy::ptr_arg)]
fn serialize_base64<S: Serializer>(bytes: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&BASE64.encode(bytes))
}

impl DataObject {
    /// Type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Decimal(_) => "decimal",
            Self::DateTime(_) => "datetime",
            Self::Binary(_) => "binary",
            Self::Group(_) => "group",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[DataObject]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, DataObject>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Text form of a scalar value; `None` for lists and maps.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::String(value) => Some(value.clone()),
            Self::Boolean(value) => Some(value.to_string()),
            Self::Integer(value) => Some(value.to_string()),
            Self::Decimal(value) => Some(value.to_string()),
            Self::DateTime(value) => Some(value.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::Binary(bytes) => Some(BASE64.encode(bytes)),
            Self::Group(group) => Some(group.path.clone()),
            Self::List(_) | Self::Map(_) => None,
        }
    }

    /// Convert into a JSON value for the SCIM document.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl fmt::Display for DataObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Some(text) => f.write_str(&text),
            None => match self.to_json() {
                Ok(json) => write!(f, "{}", json),
                Err(_) => f.write_str(self.type_name()),
            },
        }
    }
}

impl From<&str> for DataObject {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for DataObject {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for DataObject {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for DataObject {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for DataObject {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<DateTime<Utc>> for DataObject {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<Group> for DataObject {
    fn from(value: Group) -> Self {
        Self::Group(value)
    }
}

impl From<Vec<DataObject>> for DataObject {
    fn from(values: Vec<DataObject>) -> Self {
        Self::List(values)
    }
}

impl From<BTreeMap<String, DataObject>> for DataObject {
    fn from(entries: BTreeMap<String, DataObject>) -> Self {
        Self::Map(entries)
    }
}
