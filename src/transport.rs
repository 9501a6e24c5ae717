//! HTTP transport and its decorators.
//!
//! A [`Transport`] sends a fully built request and returns the response. The raw
//! transport is a `reqwest::Client`; decorators wrap another transport to add
//! cross-cutting behavior without changing the semantics of the exchange.

use std::time::Instant;

use futures::future::BoxFuture;
use reqwest::header::{HeaderValue, InvalidHeaderValue, USER_AGENT};
use reqwest::{Request, Response};
use tracing::debug;

/// Sends a request and returns the response
pub trait Transport: Send + Sync {
    fn send(&self, request: Request) -> BoxFuture<'_, Result<Response, reqwest::Error>>;
}

impl Transport for reqwest::Client {
    fn send(&self, request: Request) -> BoxFuture<'_, Result<Response, reqwest::Error>> {
        Box::pin(self.execute(request))
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: Request) -> BoxFuture<'_, Result<Response, reqwest::Error>> {
        (**self).send(request)
    }
}

/// Name and version the program identifies itself with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramIdentity {
    name: String,
    version: String,
}

impl ProgramIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Identity of this build, taken from the package metadata
    pub fn from_package() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// `<name>/<version>`
    pub fn user_agent(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

impl Default for ProgramIdentity {
    fn default() -> Self {
        Self::from_package()
    }
}

/// Appends the program's `User-Agent` header to every request
pub struct UserAgentTransport<T> {
    inner: T,
    user_agent: HeaderValue,
}

impl<T: Transport> UserAgentTransport<T> {
    pub fn new(inner: T, identity: &ProgramIdentity) -> Result<Self, InvalidHeaderValue> {
        let user_agent = HeaderValue::from_str(&identity.user_agent())?;
        Ok(Self { inner, user_agent })
    }
}

impl<T: Transport> Transport for UserAgentTransport<T> {
    fn send(&self, mut request: Request) -> BoxFuture<'_, Result<Response, reqwest::Error>> {
        request
            .headers_mut()
            .append(USER_AGENT, self.user_agent.clone());
        self.inner.send(request)
    }
}

/// Logs outgoing requests and incoming responses at debug level
pub struct LoggingTransport<T> {
    inner: T,
}

impl<T: Transport> LoggingTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T: Transport> Transport for LoggingTransport<T> {
    fn send(&self, request: Request) -> BoxFuture<'_, Result<Response, reqwest::Error>> {
        Box::pin(async move {
            debug!("Outgoing request {} {}", request.method(), request.url());
            let start = Instant::now();
            let response = self.inner.send(request).await?;
            debug!(
                "Incoming response {}, took {:.2}s",
                response.status().as_u16(),
                start.elapsed().as_secs_f64()
            );
            Ok(response)
        })
    }
}
