use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;
use wxwork_domain::constants::DEFAULT_TIMEOUT_SECS;
use wxwork_domain::{Result, WxWorkError};

use crate::errors::InfraError;

const USER_AGENT: &str = concat!("wxwork-client/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP transport with a bounded per-request timeout.
///
/// Cloning is cheap and clones share one connection pool. Requests are sent
/// once; nothing here retries.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Wrap a caller-supplied reqwest client as-is (its own timeout applies).
    pub fn from_reqwest(client: ReqwestClient) -> Self {
        Self { client }
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the request and return the raw response, whatever its status.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build().map_err(|err| WxWorkError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, %path, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, %path, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %path, error = %err, "HTTP request failed");
                Err(InfraError::from(err).into())
            }
        }
    }

    /// Execute the request and decode a 2xx JSON body.
    ///
    /// A non-2xx status is a transport error: the body is read to the end and
    /// discarded without looking at it.
    pub async fn send_for_json(&self, builder: RequestBuilder) -> Result<Value> {
        let response = self.send(builder).await?;
        let status = response.status();

        if !status.is_success() {
            // Drain so the connection can go back to the pool.
            let _ = response.bytes().await;
            return Err(WxWorkError::HttpStatus { status: status.as_u16() });
        }

        let bytes = response.bytes().await.map_err(|err| WxWorkError::from(InfraError::from(err)))?;
        serde_json::from_slice(&bytes).map_err(|err| WxWorkError::Parse(err.to_string()))
    }
}

/// Builder for [`HttpClient`].
///
/// Proxies come from the environment (`HTTP_PROXY`, `HTTPS_PROXY`,
/// `NO_PROXY`) unless [`HttpClientBuilder::no_proxy`] is called.
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
    use_env_proxy: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
            default_headers: None,
            use_env_proxy: true,
        }
    }
}

impl HttpClientBuilder {
    /// Per-request timeout covering connect, send and body read.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Connect directly, ignoring proxy settings in the environment.
    pub fn no_proxy(mut self) -> Self {
        self.use_env_proxy = false;
        self
    }

    /// Build the client. Reads proxy settings from the environment unless disabled.
    pub fn build(self) -> Result<HttpClient> {
        let agent = self.user_agent.unwrap_or_else(|| USER_AGENT.to_string());
        let mut builder = ReqwestClient::builder().timeout(self.timeout).user_agent(agent);

        if !self.use_env_proxy {
            builder = builder.no_proxy();
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| WxWorkError::from(InfraError::from(err)))?;

        Ok(HttpClient { client })
    }
}
