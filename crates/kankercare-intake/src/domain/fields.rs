//! Typed field access for form records
//!
//! Each record shape has its own field enum, so rule sets and wizard edits
//! name fields at compile time instead of by string key. `path()` gives the
//! dot-joined key used in error maps (`labResults.ca125`).

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of one field within a record shape
pub trait FieldKey: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Dot-joined path of the field
    fn path(&self) -> &'static str;
}

/// Borrowed view of a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef<'a> {
    Text(&'a str),
    List(&'a [String]),
    Flag(bool),
}

impl FieldRef<'_> {
    pub fn to_value(self) -> FieldValue {
        match self {
            FieldRef::Text(s) => FieldValue::Text(s.to_string()),
            FieldRef::List(items) => FieldValue::List(items.to_vec()),
            FieldRef::Flag(b) => FieldValue::Flag(b),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            FieldRef::Text(_) => ValueKind::Text,
            FieldRef::List(_) => ValueKind::List,
            FieldRef::Flag(_) => ValueKind::Flag,
        }
    }
}

/// Owned field value, as produced by an edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Flag(bool),
}

impl FieldValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Text(_) => ValueKind::Text,
            FieldValue::List(_) => ValueKind::List,
            FieldValue::Flag(_) => ValueKind::Flag,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    List,
    Flag,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Text => write!(f, "text"),
            ValueKind::List => write!(f, "list"),
            ValueKind::Flag => write!(f, "flag"),
        }
    }
}

/// An edit supplied a value of the wrong kind for its field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field {path} expects {expected}, got {actual}")]
pub struct FieldKindMismatch {
    pub path: &'static str,
    pub expected: ValueKind,
    pub actual: ValueKind,
}

/// A form record whose fields can be read by key
pub trait Record {
    type Field: FieldKey;

    fn field(&self, field: Self::Field) -> FieldRef<'_>;
}
