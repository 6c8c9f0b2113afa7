use crate::types::Timestamp;
use candid::CandidType;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{cmp::Ordering, fmt};

///
/// Value
///
/// Dynamic field value used by filter predicates. Entities project their
/// fields into `Value` through `EntityKind::field_value`.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Text(String),
    Uint(u64),
    Timestamp(Timestamp),
}

impl Value {
    #[must_use]
    pub const fn kind(&self) -> Option<ValueKind> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(ValueKind::Bool),
            Self::Text(_) => Some(ValueKind::Text),
            Self::Uint(_) => Some(ValueKind::Uint),
            Self::Timestamp(_) => Some(ValueKind::Timestamp),
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Strict same-kind ordering; `None` for mixed kinds or nulls.
    #[must_use]
    pub fn strict_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Uint(a), Self::Uint(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Uint(value)
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Self::Timestamp(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

///
/// ValueKind
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ValueKind {
    Bool,
    Text,
    Uint,
    Timestamp,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Bool => "bool",
            Self::Text => "text",
            Self::Uint => "uint",
            Self::Timestamp => "timestamp",
        };
        write!(f, "{label}")
    }
}

/// Feed one value into a fingerprint hash stream with a kind tag.
pub(crate) fn hash_value(hasher: &mut Sha256, value: &Value) {
    match value {
        Value::Null => hasher.update([0x01]),
        Value::Bool(v) => {
            hasher.update([0x02]);
            hasher.update([u8::from(*v)]);
        }
        Value::Text(v) => {
            hasher.update([0x03]);
            hasher.update(u32::try_from(v.len()).unwrap_or(u32::MAX).to_be_bytes());
            hasher.update(v.as_bytes());
        }
        Value::Uint(v) => {
            hasher.update([0x04]);
            hasher.update(v.to_be_bytes());
        }
        Value::Timestamp(v) => {
            hasher.update([0x05]);
            hasher.update(v.as_millis().to_be_bytes());
        }
    }
}
