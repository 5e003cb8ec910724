//! HTTP client and its builder.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use cookie::Cookie;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::config::HttpConfig;
use crate::error::{HttpError, Result};
use crate::payload::Payload;
use crate::request::RequestContext;
use crate::response::Response;

/// Build a reqwest client from configuration and an optional proxy.
pub fn build_client(config: &HttpConfig, proxy: Option<reqwest::Proxy>) -> Result<reqwest::Client> {
    let mut builder = reqwest::ClientBuilder::new()
        .connect_timeout(config.connect_timeout)
        .timeout(config.timeout)
        .user_agent(&config.user_agent)
        .gzip(config.gzip);

    builder = if config.disable_keep_alive {
        builder.pool_max_idle_per_host(0)
    } else {
        builder.pool_max_idle_per_host(config.pool_max_idle_per_host)
    };

    if let Some(proxy) = proxy {
        builder = builder.proxy(proxy);
    }

    builder.build().map_err(HttpError::ClientBuild)
}

/// Collects client settings. Finalize with [`ClientBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    config: HttpConfig,
    headers: Vec<(String, String)>,
    cookies: BTreeMap<String, String>,
    proxy: Option<reqwest::Proxy>,
    transport: Option<reqwest::Client>,
}

impl ClientBuilder {
    /// Create a builder with default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from an existing config.
    pub fn from_config(config: HttpConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Create a builder from `COURIER_HTTP_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(HttpConfig::from_env()?))
    }

    /// Set the total request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Merge headers. Existing names are overwritten (case-insensitively),
    /// others kept.
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add a single header.
    pub fn header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers([(name, value)])
    }

    /// Merge cookies. Existing names are overwritten, others kept.
    pub fn cookies<I, K, V>(mut self, cookies: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.cookies
            .extend(cookies.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add a single cookie.
    pub fn cookie(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies([(name, value)])
    }

    /// Route requests through the proxy returned by `resolver`; `None` means
    /// connect directly.
    pub fn proxy<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&Url) -> Option<Url> + Send + Sync + 'static,
    {
        self.proxy = Some(reqwest::Proxy::custom(resolver));
        self
    }

    /// Route all requests through a single proxy URL.
    pub fn proxy_url(mut self, url: &str) -> Result<Self> {
        self.proxy = Some(reqwest::Proxy::all(url).map_err(HttpError::ClientBuild)?);
        Ok(self)
    }

    /// Use a pre-built reqwest client as transport.
    ///
    /// Connection-level settings (proxy, pool, keep-alive, user agent) come
    /// from the supplied client. The timeout is still applied per request.
    pub fn transport(mut self, client: reqwest::Client) -> Self {
        self.transport = Some(client);
        self
    }

    /// Close connections after every request.
    pub fn disable_keep_alive(mut self, disable: bool) -> Self {
        self.config.disable_keep_alive = disable;
        self
    }

    /// Validate the settings and construct the client.
    pub fn build(self) -> Result<Client> {
        // Replayed in call order so a later name wins over an earlier one.
        let mut headers = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| HttpError::invalid(format!("invalid header name {:?}", name)))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| HttpError::invalid(format!("invalid value for header {:?}", name)))?;
            headers.insert(header_name, header_value);
        }

        for (name, value) in &self.cookies {
            validate_cookie(name, value)?;
        }

        let cookie = if self.cookies.is_empty() {
            None
        } else {
            let rendered = self
                .cookies
                .iter()
                .map(|(name, value)| Cookie::new(name.as_str(), value.as_str()).to_string())
                .collect::<Vec<_>>()
                .join("; ");
            Some(
                HeaderValue::from_str(&rendered)
                    .map_err(|_| HttpError::invalid("invalid cookie value"))?,
            )
        };

        let inner = match self.transport {
            Some(client) => {
                if self.proxy.is_some() {
                    tracing::debug!("transport override set, ignoring configured proxy");
                }
                client
            }
            None => build_client(&self.config, self.proxy)?,
        };

        Ok(Client {
            inner,
            headers,
            cookie,
            timeout: self.config.timeout,
            keep_alive: !self.config.disable_keep_alive,
        })
    }
}

/// Reject cookie pairs that would split or inject entries in the `Cookie` header.
fn validate_cookie(name: &str, value: &str) -> Result<()> {
    if name.is_empty()
        || name
            .chars()
            .any(|c| c == '=' || c == ';' || c == ',' || c.is_whitespace())
    {
        return Err(HttpError::invalid(format!("invalid cookie name {:?}", name)));
    }
    if value.contains(';') {
        return Err(HttpError::invalid(format!("invalid value for cookie {:?}", name)));
    }
    Ok(())
}

/// An immutable HTTP client. Cheap to clone and safe to share between tasks.
#[derive(Debug, Clone)]
pub struct Client {
    inner: reqwest::Client,
    headers: HeaderMap,
    cookie: Option<HeaderValue>,
    timeout: Duration,
    keep_alive: bool,
}

impl Client {
    /// Create a client with default config.
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    /// Start configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the inner reqwest client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }

    /// Headers sent with every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Send a request.
    ///
    /// `method` is case-insensitive. For GET and DELETE the payload is merged
    /// into the query string; for every other method it becomes the body.
    pub async fn request(
        &self,
        method: &str,
        url: &str,
        payload: impl Into<Payload>,
    ) -> Result<Response> {
        let start = Instant::now();
        let RequestContext {
            method,
            url,
            headers,
            body,
        } = RequestContext::prepare(
            method,
            url,
            payload.into(),
            &self.headers,
            self.cookie.as_ref(),
            self.keep_alive,
        )?;

        tracing::debug!("Making {} request to: {}", method, url);
        let mut request = self
            .inner
            .request(method.clone(), url.as_str())
            .headers(headers)
            .timeout(self.timeout);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(HttpError::TransportFailure)?;
        let elapsed = start.elapsed();
        tracing::debug!(
            "{} response: {} {} ({} ms)",
            method,
            response.status(),
            url,
            elapsed.as_millis()
        );

        Ok(Response::new(url, response, elapsed))
    }

    /// Make a GET request; the payload becomes query parameters.
    pub async fn get(&self, url: &str, payload: impl Into<Payload>) -> Result<Response> {
        self.request("GET", url, payload).await
    }

    /// Make a POST request; the payload becomes the body.
    pub async fn post(&self, url: &str, payload: impl Into<Payload>) -> Result<Response> {
        self.request("POST", url, payload).await
    }

    /// Make a PUT request.
    pub async fn put(&self, url: &str, payload: impl Into<Payload>) -> Result<Response> {
        self.request("PUT", url, payload).await
    }

    /// Make a PATCH request.
    pub async fn patch(&self, url: &str, payload: impl Into<Payload>) -> Result<Response> {
        self.request("PATCH", url, payload).await
    }

    /// Make a DELETE request; the payload becomes query parameters.
    pub async fn delete(&self, url: &str, payload: impl Into<Payload>) -> Result<Response> {
        self.request("DELETE", url, payload).await
    }
}
