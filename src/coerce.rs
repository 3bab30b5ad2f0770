//! String-to-value coercion for binding slots.

use std::fmt;
use thiserror::Error;

/// Errors that can occur when coercing a raw token into a typed value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoerceError {
    #[error("'{raw}' is not a valid {target} literal")]
    InvalidLiteral { raw: String, target: SlotType },

    #[error("boolean bindings are set with +key/-key tags, not values")]
    BooleanValue,
}

/// The semantic type a binding slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotType {
    String,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
}

impl SlotType {
    /// Whether a slot of this type can take a value of the given kind.
    ///
    /// Every kind matches itself only: boolean slots accept boolean
    /// values exclusively, and no numeric kind widens into another.
    pub fn accepts(self, kind: SlotType) -> bool {
        self == kind
    }

    /// Whether this slot is set by the `+key`/`-key` tag convention.
    pub fn is_boolean(self) -> bool {
        self == SlotType::Bool
    }
}

impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotType::String => "string",
            SlotType::Bool => "bool",
            SlotType::Int8 => "int8",
            SlotType::Int16 => "int16",
            SlotType::Int32 => "int32",
            SlotType::Int64 => "int64",
            SlotType::Float32 => "float32",
            SlotType::Float64 => "float64",
        };
        f.write_str(name)
    }
}

/// A coerced value, one variant per slot type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
}

impl Value {
    /// The slot type this value satisfies.
    pub fn kind(&self) -> SlotType {
        match self {
            Value::String(_) => SlotType::String,
            Value::Bool(_) => SlotType::Bool,
            Value::Int8(_) => SlotType::Int8,
            Value::Int16(_) => SlotType::Int16,
            Value::Int32(_) => SlotType::Int32,
            Value::Int64(_) => SlotType::Int64,
            Value::Float32(_) => SlotType::Float32,
            Value::Float64(_) => SlotType::Float64,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(v) => f.write_str(v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int8(v) => write!(f, "{}", v),
            Value::Int16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Float32(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
        }
    }
}

/// Coerce a raw token into a value of the requested slot type.
///
/// String slots take the token unchanged (tokens are trimmed during
/// tokenization, not here). Numeric slots must parse as a base-10
/// literal of that exact kind; nothing is truncated or rounded across
/// kinds. Boolean slots always fail: they are driven by the `+`/`-`
/// prefix mechanism and never by a key/value pair.
pub fn coerce(raw: &str, target: SlotType) -> Result<Value, CoerceError> {
    let invalid = || CoerceError::InvalidLiteral {
        raw: raw.to_string(),
        target,
    };

    match target {
        SlotType::String => Ok(Value::String(raw.to_string())),
        SlotType::Bool => Err(CoerceError::BooleanValue),
        SlotType::Int8 => raw.parse().map(Value::Int8).map_err(|_| invalid()),
        SlotType::Int16 => raw.parse().map(Value::Int16).map_err(|_| invalid()),
        SlotType::Int32 => raw.parse().map(Value::Int32).map_err(|_| invalid()),
        SlotType::Int64 => raw.parse().map(Value::Int64).map_err(|_| invalid()),
        SlotType::Float32 => raw.parse().map(Value::Float32).map_err(|_| invalid()),
        SlotType::Float64 => raw.parse().map(Value::Float64).map_err(|_| invalid()),
    }
}
