//! Request body encoding for methods other than GET and DELETE.

use bytes::Bytes;
use serde_json::Value;

use crate::error::{HttpError, Result};
use crate::payload::{map_pairs, value_kind, Payload};

/// An encoded request body.
#[derive(Debug)]
pub enum RequestBody {
    /// Fully buffered bytes.
    Buffered(Bytes),
    /// A caller-supplied body, passed through untouched.
    Streamed(reqwest::Body),
}

impl RequestBody {
    /// The buffered bytes, if this body is not a stream.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RequestBody::Buffered(bytes) => Some(&bytes[..]),
            RequestBody::Streamed(_) => None,
        }
    }
}

impl From<RequestBody> for reqwest::Body {
    fn from(body: RequestBody) -> Self {
        match body {
            RequestBody::Buffered(bytes) => reqwest::Body::from(bytes),
            RequestBody::Streamed(body) => body,
        }
    }
}

/// Encode a payload into a request body.
///
/// Strings are always sent verbatim. Other structured values are JSON-encoded
/// when `json` is set and otherwise form-encoded; only objects can be
/// form-encoded.
pub fn encode_body(payload: Payload, json: bool) -> Result<Option<RequestBody>> {
    let bytes = match payload {
        Payload::Empty | Payload::Value(Value::Null) => return Ok(None),
        Payload::Stream(body) => return Ok(Some(RequestBody::Streamed(body))),
        Payload::Text(text) | Payload::Value(Value::String(text)) => Bytes::from(text),
        Payload::Bytes(bytes) => bytes,
        Payload::Integer(int) => Bytes::from(int.to_be_bytes()),
        Payload::Value(value) if json => Bytes::from(serde_json::to_vec(&value)?),
        Payload::Value(Value::Object(map)) => Bytes::from(map_pairs(&map)?.join("&")),
        Payload::Value(other) => return Err(HttpError::UnsupportedType(value_kind(&other))),
    };

    Ok(Some(RequestBody::Buffered(bytes)))
}
