//! Host value representation
//!
//! This module defines [`HostValue`], the closed set of value shapes the
//! embedding runtime reports for every object it hands over. Values never
//! contain other values directly: containers hold [`ObjectId`]s, so shared
//! references and cycles are expressed the same way the runtime sees them.
//!
//! # Value Shapes
//!
//! - Scalars: [`HostValue::Int`], [`HostValue::Float`], [`HostValue::Str`]
//! - Singletons: [`HostValue::Bool`], [`HostValue::None`]
//! - Ordered: [`HostValue::List`] (mutable), [`HostValue::Tuple`] (immutable)
//! - Keyed: [`HostValue::Dict`]
//! - Unordered: [`HostValue::Set`]
//! - Numeric arrays: [`HostValue::Array`]
//! - Callables: [`HostValue::Function`], [`HostValue::Class`]
//! - Everything else: [`HostValue::Object`]

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity token assigned by the runtime.
///
/// Two references denote the same object iff their ids are equal; equal
/// contents under different ids are distinct objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shape and element metadata of an n-dimensional numeric array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayData {
    pub shape: Vec<usize>,
    pub dtype: String,
    /// Row-major formatted element values; may be empty for large arrays
    #[serde(default)]
    pub elements: Vec<String>,
    /// Backing array when this array is a view
    #[serde(default)]
    pub base: Option<ObjectId>,
}

impl ArrayData {
    /// Total number of elements described by the shape
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runtime values as reported by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostValue {
    Int { value: i64 },
    Float { value: f64 },
    Str { value: String },
    Bool { value: bool },
    None,
    List { items: Vec<ObjectId> },
    Tuple { items: Vec<ObjectId> },
    Dict { entries: Vec<(String, ObjectId)> }, // Key text -> value, insertion order
    Set { items: Vec<ObjectId> },
    Array(ArrayData),
    Function { name: String },
    Class { name: String },
    Object,
}

impl HostValue {
    /// Type name used when the producer did not supply one
    pub fn default_type_name(&self) -> &'static str {
        match self {
            HostValue::Int { .. } => "int",
            HostValue::Float { .. } => "float",
            HostValue::Str { .. } => "str",
            HostValue::Bool { .. } => "bool",
            HostValue::None => "NoneType",
            HostValue::List { .. } => "list",
            HostValue::Tuple { .. } => "tuple",
            HostValue::Dict { .. } => "dict",
            HostValue::Set { .. } => "set",
            HostValue::Array(_) => "ndarray",
            HostValue::Function { .. } => "function",
            HostValue::Class { .. } => "type",
            HostValue::Object => "object",
        }
    }

    /// Check if this value is a function or a class
    pub fn is_callable(&self) -> bool {
        matches!(self, HostValue::Function { .. } | HostValue::Class { .. })
    }
}

/// Format a float the way the host prints it (`1.0`, not `1`; `1e+16`,
/// `1e-05` outside `[1e-4, 1e16)`)
pub fn format_float(value: f64) -> String {
    let magnitude = value.abs();
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "inf" } else { "-inf" };
        text.to_string()
    } else if magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-4) {
        exponent_form(value)
    } else if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Shortest mantissa with a signed, at least two-digit exponent
fn exponent_form(value: f64) -> String {
    let text = format!("{:e}", value);
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return text;
    };
    match exponent.parse::<i32>() {
        Ok(exp) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        Err(_) => text,
    }
}
