//! Request payloads.
//!
//! A [`Payload`] is decided once when a call is made. The query merger and the
//! body encoder then match over its variants instead of inspecting values at
//! runtime.

use std::collections::{BTreeMap, HashMap};

use bytes::Bytes;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;

/// Data supplied with a request, sent either as query parameters or as a body.
#[derive(Debug, Default)]
pub enum Payload {
    /// Nothing to send.
    #[default]
    Empty,
    /// Text, sent verbatim (or appended as a pre-formatted query fragment).
    Text(String),
    /// Raw bytes, sent verbatim.
    Bytes(Bytes),
    /// Fixed-width integer, sent big-endian.
    Integer(Integer),
    /// A pre-built body, passed through untouched.
    Stream(reqwest::Body),
    /// Any structured value.
    Value(Value),
}

impl Payload {
    /// Convert a serializable value into a structured payload.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Payload::Value(serde_json::to_value(value)?))
    }

    /// Wrap a byte stream as a pre-built body.
    pub fn stream<S>(stream: S) -> Self
    where
        S: futures_util::TryStream + Send + Sync + 'static,
        S::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
        Bytes: From<S::Ok>,
    {
        Payload::Stream(reqwest::Body::wrap_stream(stream))
    }

    /// Whether this payload carries no data. `null` counts as empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty | Payload::Value(Value::Null))
    }

    /// Short name of the payload kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Empty => "empty",
            Payload::Text(_) => "text",
            Payload::Bytes(_) => "bytes",
            Payload::Integer(_) => "integer",
            Payload::Stream(_) => "stream",
            Payload::Value(v) => value_kind(v),
        }
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Renders map entries as `key=value` pairs.
///
/// String values are used verbatim, everything else is JSON-encoded.
pub(crate) fn map_pairs(map: &Map<String, Value>) -> Result<Vec<String>> {
    map.iter()
        .map(|(key, value)| -> Result<String> {
            match value {
                Value::String(s) => Ok(format!("{}={}", key, s)),
                other => Ok(format!("{}={}", key, serde_json::to_string(other)?)),
            }
        })
        .collect()
}

/// A fixed-width integer payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Integer {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
}

impl Integer {
    /// Big-endian bytes at the integer's native width.
    pub fn to_be_bytes(self) -> Vec<u8> {
        match self {
            Integer::I8(v) => v.to_be_bytes().to_vec(),
            Integer::I16(v) => v.to_be_bytes().to_vec(),
            Integer::I32(v) => v.to_be_bytes().to_vec(),
            Integer::I64(v) => v.to_be_bytes().to_vec(),
            Integer::U8(v) => v.to_be_bytes().to_vec(),
            Integer::U16(v) => v.to_be_bytes().to_vec(),
            Integer::U32(v) => v.to_be_bytes().to_vec(),
            Integer::U64(v) => v.to_be_bytes().to_vec(),
        }
    }

    /// Width in bytes.
    pub fn width(self) -> usize {
        match self {
            Integer::I8(_) | Integer::U8(_) => 1,
            Integer::I16(_) | Integer::U16(_) => 2,
            Integer::I32(_) | Integer::U32(_) => 4,
            Integer::I64(_) | Integer::U64(_) => 8,
        }
    }
}

macro_rules! integer_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Integer {
                fn from(v: $ty) -> Self {
                    Integer::$variant(v)
                }
            }

            impl From<$ty> for Payload {
                fn from(v: $ty) -> Self {
                    Payload::Integer(Integer::$variant(v))
                }
            }
        )*
    };
}

integer_from! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
}

// Pointer-sized integers are always promoted to 64 bits.
impl From<isize> for Payload {
    fn from(v: isize) -> Self {
        Payload::Integer(Integer::I64(v as i64))
    }
}

impl From<usize> for Payload {
    fn from(v: usize) -> Self {
        Payload::Integer(Integer::U64(v as u64))
    }
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Payload::Empty
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Text(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Text(s)
    }
}

impl From<&[u8]> for Payload {
    fn from(b: &[u8]) -> Self {
        Payload::Bytes(Bytes::copy_from_slice(b))
    }
}

impl From<Vec<u8>> for Payload {
    fn from(b: Vec<u8>) -> Self {
        Payload::Bytes(Bytes::from(b))
    }
}

impl From<Bytes> for Payload {
    fn from(b: Bytes) -> Self {
        Payload::Bytes(b)
    }
}

impl From<reqwest::Body> for Payload {
    fn from(body: reqwest::Body) -> Self {
        Payload::Stream(body)
    }
}

impl From<Value> for Payload {
    fn from(v: Value) -> Self {
        Payload::Value(v)
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Payload::Value(Value::Object(map))
    }
}

impl<V: Into<Value>> From<HashMap<String, V>> for Payload {
    fn from(map: HashMap<String, V>) -> Self {
        Payload::Value(Value::Object(
            map.into_iter().map(|(k, v)| (k, v.into())).collect(),
        ))
    }
}

impl<V: Into<Value>> From<BTreeMap<String, V>> for Payload {
    fn from(map: BTreeMap<String, V>) -> Self {
        Payload::Value(Value::Object(
            map.into_iter().map(|(k, v)| (k, v.into())).collect(),
        ))
    }
}

impl<T: Into<Payload>> From<Option<T>> for Payload {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or_default()
    }
}
