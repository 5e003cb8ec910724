//! HTTP response wrapper.

use std::time::Duration;

use bytes::Bytes;
use cookie::Cookie;
use reqwest::header::{HeaderMap, SET_COOKIE};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{HttpError, Result};

/// A completed call.
///
/// Status, headers and cookies are captured when the response arrives. The
/// body is read on first access, cached, and the underlying stream released.
#[derive(Debug, Default)]
pub struct Response {
    url: String,
    elapsed: Duration,
    status: Option<u16>,
    headers: HeaderMap,
    cookies: Vec<Cookie<'static>>,
    inner: Option<reqwest::Response>,
    body: Option<Bytes>,
}

impl Response {
    pub(crate) fn new(url: String, inner: reqwest::Response, elapsed: Duration) -> Self {
        let headers = inner.headers().clone();
        let cookies = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| Cookie::parse(v.to_string()).ok())
            .collect();

        Self {
            url,
            elapsed,
            status: Some(inner.status().as_u16()),
            headers,
            cookies,
            inner: Some(inner),
            body: None,
        }
    }

    /// HTTP status code, or 0 when no response was received.
    pub fn status_code(&self) -> u16 {
        self.status.unwrap_or(0)
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code())
    }

    /// Whether the status is 4xx.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Whether the status is 5xx.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code())
    }

    /// The URL the request was sent to, including any merged query.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Time from dispatch to response headers.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// [`Response::elapsed`] in milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }

    /// Response headers; repeated names keep every value.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Cookies set by the response, in header order.
    pub fn cookies(&self) -> &[Cookie<'static>] {
        &self.cookies
    }

    /// The response body.
    ///
    /// The first call reads the whole stream; later calls return the cached
    /// bytes.
    pub async fn body(&mut self) -> Result<&Bytes> {
        if self.body.is_none() {
            let inner = self.inner.take().ok_or(HttpError::BodyUnavailable)?;
            let bytes = inner.bytes().await.map_err(HttpError::TransportFailure)?;
            tracing::debug!("read {} byte body from {}", bytes.len(), self.url);
            self.body = Some(bytes);
        }

        self.body.as_ref().ok_or(HttpError::BodyUnavailable)
    }

    /// The body as text. Invalid UTF-8 is replaced.
    pub async fn text(&mut self) -> Result<String> {
        let body = self.body().await?;
        Ok(String::from_utf8_lossy(body).into_owned())
    }

    /// The body decoded as a JSON object.
    pub async fn json_map(&mut self) -> Result<Map<String, Value>> {
        self.json().await
    }

    /// The body decoded as JSON into `T`.
    pub async fn json<T: DeserializeOwned>(&mut self) -> Result<T> {
        let body = self.body().await?;
        Ok(serde_json::from_slice(body)?)
    }

    /// Release the underlying stream. A cached body stays readable.
    pub fn close(&mut self) {
        if self.inner.take().is_some() {
            tracing::debug!("closed response stream for {}", self.url);
        }
    }
}
