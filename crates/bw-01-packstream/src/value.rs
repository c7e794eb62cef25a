//! # Packstream Value Model
//!
//! A tagged union of everything the format can carry. The struct payload is
//! a type parameter: the codec itself materialises structs as raw
//! [`StructValue`]s, while higher layers plug in their own typed structs
//! (dates, points, ...) and read them through the same value reader.

use crate::map::OrderedMap;
use crate::marker::Type;
use bytes::Bytes;

/// Map of values keyed by string.
pub type ValueMap<S = StructValue> = OrderedMap<Value<S>>;

/// Untyped struct: a tag byte plus its fields.
#[derive(Clone, Debug, PartialEq)]
pub struct StructValue {
    pub tag: u8,
    pub fields: Vec<Value>,
}

impl StructValue {
    pub fn new(tag: u8, fields: Vec<Value>) -> Self {
        Self { tag, fields }
    }
}

/// A self-describing Packstream value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value<S = StructValue> {
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    Bytes(Bytes),
    String(String),
    List(Vec<Value<S>>),
    Map(OrderedMap<Value<S>>),
    Struct(S),
}

impl<S> Value<S> {
    /// Type of the marker this value is encoded with.
    pub fn type_(&self) -> Type {
        match self {
            Self::Null => Type::None,
            Self::Boolean(_) => Type::Boolean,
            Self::Int(_) => Type::Int,
            Self::Float(_) => Type::Float,
            Self::Bytes(_) => Type::Bytes,
            Self::String(_) => Type::String,
            Self::List(_) => Type::List,
            Self::Map(_) => Type::Map,
            Self::Struct(_) => Type::Struct,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value<S>]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&OrderedMap<Value<S>>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&S> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }
}

impl<S> From<bool> for Value<S> {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl<S> From<i64> for Value<S> {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl<S> From<i32> for Value<S> {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl<S> From<f64> for Value<S> {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<S> From<&str> for Value<S> {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl<S> From<String> for Value<S> {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<S> From<Bytes> for Value<S> {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl<S> From<Vec<Value<S>>> for Value<S> {
    fn from(value: Vec<Value<S>>) -> Self {
        Self::List(value)
    }
}

impl<S> From<OrderedMap<Value<S>>> for Value<S> {
    fn from(value: OrderedMap<Value<S>>) -> Self {
        Self::Map(value)
    }
}

impl<S, T: Into<Value<S>>> From<Option<T>> for Value<S> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<StructValue> for Value {
    fn from(value: StructValue) -> Self {
        Self::Struct(value)
    }
}
