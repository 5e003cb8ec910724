//! Per-call request context.

use reqwest::header::{HeaderMap, HeaderValue, CONNECTION, CONTENT_TYPE, COOKIE};
use reqwest::Method;

use crate::body::{encode_body, RequestBody};
use crate::error::{HttpError, Result};
use crate::payload::Payload;
use crate::query::merge_query;

/// Common HTTP header values.
pub mod headers {
    pub const CONTENT_TYPE_JSON: &str = "application/json";
    pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";
}

/// Whether a method carries its payload in the query string.
pub fn uses_query(method: &Method) -> bool {
    *method == Method::GET || *method == Method::DELETE
}

/// Whether any header value declares JSON content.
pub fn declares_json(map: &HeaderMap) -> bool {
    map.values().any(|v| {
        v.to_str()
            .map(|s| s.to_ascii_lowercase().contains(headers::CONTENT_TYPE_JSON))
            .unwrap_or(false)
    })
}

/// Everything needed to send one request, derived from the client settings
/// and the call arguments.
#[derive(Debug)]
pub struct RequestContext {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
}

impl RequestContext {
    /// Validate the call arguments and encode the payload.
    ///
    /// `configured` are the client's headers; `cookie` is the pre-rendered
    /// `Cookie` header value, if any cookies are configured.
    pub fn prepare(
        method: &str,
        url: &str,
        payload: Payload,
        configured: &HeaderMap,
        cookie: Option<&HeaderValue>,
        keep_alive: bool,
    ) -> Result<Self> {
        if method.is_empty() {
            return Err(HttpError::invalid("method is required"));
        }
        if url.is_empty() {
            return Err(HttpError::invalid("url is required"));
        }

        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .map_err(|_| HttpError::invalid(format!("invalid method {:?}", method)))?;

        let (url, body) = if uses_query(&method) {
            (merge_query(url, &payload)?, None)
        } else {
            (url.to_string(), encode_body(payload, declares_json(configured))?)
        };

        let mut merged = configured.clone();
        if !merged.contains_key(CONTENT_TYPE) {
            merged.insert(CONTENT_TYPE, HeaderValue::from_static(headers::CONTENT_TYPE_FORM));
        }
        if let Some(cookie) = cookie {
            merged.insert(COOKIE, cookie.clone());
        }
        if !keep_alive {
            merged.insert(CONNECTION, HeaderValue::from_static("close"));
        }

        Ok(Self {
            method,
            url,
            headers: merged,
            body,
        })
    }
}
