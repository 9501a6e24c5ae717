//! API client shared by every command.
//!
//! The client owns the resolved configuration, the decorated transport and the
//! session store. Commands build their requests with [`ApiClient::http`] and
//! send them with [`ApiClient::exchange`], which applies the status code
//! translation every binding must follow.

use std::sync::Arc;

use reqwest::{redirect, Request, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};
use url::Url;

use crate::{
    configuration::Configuration,
    error::CommandError,
    session::{SessionError, SessionStore},
    transport::{LoggingTransport, ProgramIdentity, Transport, UserAgentTransport},
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to load session: {0}")]
    Session(#[from] SessionError),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid program identity: {0}")]
    UserAgent(#[from] reqwest::header::InvalidHeaderValue),
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// A response that passed status translation
#[derive(Debug)]
pub struct Exchange {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

pub struct ApiClient {
    configuration: Configuration,
    http: reqwest::Client,
    transport: Box<dyn Transport>,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Create a client with the default transport chain: user agent, then logging, then reqwest
    pub fn new(configuration: Configuration, identity: &ProgramIdentity) -> Result<Self, ClientError> {
        let session = Arc::new(SessionStore::load(configuration.session_path())?);
        let http = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(configuration.timeout())
            .cookie_provider(session.clone())
            .build()?;
        let transport = UserAgentTransport::new(LoggingTransport::new(http.clone()), identity)?;

        Ok(Self {
            configuration,
            http,
            transport: Box::new(transport),
            session,
        })
    }

    /// Create a client that sends its requests through `transport`
    pub fn with_transport(
        configuration: Configuration,
        session: Arc<SessionStore>,
        transport: Box<dyn Transport>,
    ) -> Self {
        Self {
            configuration,
            http: reqwest::Client::new(),
            transport,
            session,
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Request builder factory; requests are sent with [`ApiClient::exchange`]
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// URL below the API root, one percent-encoded path segment per element
    pub fn url<S: AsRef<str>>(&self, segments: &[S]) -> Url {
        let mut url = self.configuration.base_url().clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            for segment in segments {
                path.push(segment.as_ref());
            }
        }
        url
    }

    /// Send a request and translate the response status.
    ///
    /// - transport failure: system failure
    /// - unreadable body: system failure
    /// - 401: unauthorized
    /// - any status not in `accepted`: business logic error carrying the body
    pub async fn exchange(&self, request: Request, accepted: &[StatusCode]) -> Result<Exchange, CommandError> {
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| CommandError::system("Failed requesting server", e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| CommandError::system("Failed receiving server response", e))?
            .to_vec();
        trace!("Response body: {}", String::from_utf8_lossy(&body));

        if status == StatusCode::UNAUTHORIZED {
            return Err(CommandError::unauthorized(describe(status, &body)));
        }
        if !accepted.contains(&status) {
            return Err(CommandError::business(describe(status, &body)));
        }
        Ok(Exchange { status, body })
    }

    /// Log in with the configured credentials and persist the session cookie
    pub async fn login(&self) -> Result<(), CommandError> {
        let endpoint = self.url(&["login"]);
        debug!("Logging in as {} at {}", self.configuration.username(), endpoint);

        let request = self
            .http
            .post(endpoint)
            .json(&LoginRequest {
                username: self.configuration.username(),
                password: self.configuration.password(),
            })
            .build()
            .map_err(|e| CommandError::system("Failed creating login request", e))?;

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| CommandError::system("Failed requesting server", e))?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .bytes()
                .await
                .map_err(|e| CommandError::system("Failed receiving server response", e))?;
            return Err(match status {
                StatusCode::UNAUTHORIZED => CommandError::unauthorized(describe(status, &body)),
                _ => CommandError::business(describe(status, &body)),
            });
        }

        self.session
            .save()
            .map_err(|e| CommandError::system("Failed saving session", e))?;
        debug!("Logged in, session saved to {:?}", self.session.path());
        Ok(())
    }
}

/// Message for a rejected response: the body when there is one, the status line otherwise
fn describe(status: StatusCode, body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        status.to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    fn client(server: &MockServer, dir: &TempDir) -> ApiClient {
        let configuration = Configuration::new(
            Url::parse(&server.base_url()).unwrap(),
            "alice",
            "secret",
            dir.path().join("cookies.json"),
        );
        ApiClient::new(configuration, &ProgramIdentity::new("hs-cli", "0.0.1")).unwrap()
    }

    #[test]
    fn test_url_encodes_segments() {
        let dir = TempDir::new().unwrap();
        let configuration = Configuration::new(
            Url::parse("https://api.example.com/v1/").unwrap(),
            "alice",
            "secret",
            dir.path().join("cookies.json"),
        );
        let client = ApiClient::new(configuration, &ProgramIdentity::default()).unwrap();

        assert_eq!(client.url(&["members"]).as_str(), "https://api.example.com/v1/members");
        assert_eq!(
            client.url(&["members", "john doe", "projects"]).as_str(),
            "https://api.example.com/v1/members/john%20doe/projects"
        );
        assert_eq!(
            client.url(&["members", "../login"]).as_str(),
            "https://api.example.com/v1/members/..%2Flogin"
        );
    }

    #[test]
    fn test_describe_prefers_body() {
        assert_eq!(describe(StatusCode::NOT_FOUND, b"member not found\n"), "member not found");
        assert_eq!(describe(StatusCode::NOT_FOUND, b""), "404 Not Found");
    }

    #[tokio::test]
    async fn test_login_posts_credentials_and_saves_session() {
        let server = MockServer::start();
        let dir = TempDir::new().unwrap();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/login")
                .header("content-type", "application/json")
                .header("user-agent", "hs-cli/0.0.1")
                .json_body(serde_json::json!({"username": "alice", "password": "secret"}));
            then.status(200).header("set-cookie", "session=abc; Path=/");
        });

        let client = client(&server, &dir);
        client.login().await.unwrap();

        mock.assert();
        assert!(dir.path().join("cookies.json").exists());
        assert_eq!(client.session().len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_login_can_be_repeated() {
        let server = MockServer::start();
        let dir = TempDir::new().unwrap();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(204);
        });

        let client = client(&server, &dir);
        client.login().await.unwrap();
        client.login().await.unwrap();

        mock.assert_hits(2);
    }

    #[tokio::test]
    async fn test_login_rejected_credentials_is_unauthorized() {
        let server = MockServer::start();
        let dir = TempDir::new().unwrap();
        server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(401).body("Unauthorized!");
        });

        let error = client(&server, &dir).login().await.unwrap_err();
        assert!(error.is_unauthorized());
        assert_eq!(error.message(), "Unauthorized!");
    }

    #[tokio::test]
    async fn test_login_server_error_is_business_logic() {
        let server = MockServer::start();
        let dir = TempDir::new().unwrap();
        server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(500);
        });

        let error = client(&server, &dir).login().await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BusinessLogic);
        assert_eq!(error.message(), "500 Internal Server Error");
    }

    #[tokio::test]
    async fn test_login_without_server_is_system_failure() {
        let dir = TempDir::new().unwrap();
        let configuration = Configuration::new(
            Url::parse("http://127.0.0.1:9").unwrap(),
            "alice",
            "secret",
            dir.path().join("cookies.json"),
        );
        let client = ApiClient::new(configuration, &ProgramIdentity::default()).unwrap();

        let error = client.login().await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::SystemFailure);
        assert_eq!(error.message(), "Failed requesting server");
        assert!(error.cause().is_some());
    }

    #[tokio::test]
    async fn test_login_truncated_rejection_is_system_failure() {
        use std::io::{Read, Write};
        use std::net::TcpListener;

        // announces a longer body than it sends, then hangs up
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request);
            stream
                .write_all(b"HTTP/1.1 401 Unauthorized\r\nContent-Length: 100\r\n\r\nshort")
                .unwrap();
        });

        let dir = TempDir::new().unwrap();
        let configuration = Configuration::new(
            Url::parse(&format!("http://{}", address)).unwrap(),
            "alice",
            "secret",
            dir.path().join("cookies.json"),
        );
        let client = ApiClient::new(configuration, &ProgramIdentity::default()).unwrap();

        let error = client.login().await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::SystemFailure);
        assert_eq!(error.message(), "Failed receiving server response");
        server.join().unwrap();
    }

    #[tokio::test]
    async fn test_exchange_translates_statuses() {
        let server = MockServer::start();
        let dir = TempDir::new().unwrap();
        server.mock(|when, then| {
            when.method(GET).path("/members");
            then.status(200).body("[]");
        });
        server.mock(|when, then| {
            when.method(GET).path("/members/ghost");
            then.status(404).body("member not found");
        });
        server.mock(|when, then| {
            when.method(GET).path("/projects");
            then.status(401).body("session expired");
        });

        let client = client(&server, &dir);
        let ok = client.http().get(client.url(&["members"])).build().unwrap();
        let exchange = client.exchange(ok, &[StatusCode::OK]).await.unwrap();
        assert_eq!(exchange.body, b"[]");

        let missing = client.http().get(client.url(&["members", "ghost"])).build().unwrap();
        let error = client.exchange(missing, &[StatusCode::OK]).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BusinessLogic);
        assert_eq!(error.message(), "member not found");

        let expired = client.http().get(client.url(&["projects"])).build().unwrap();
        let error = client.exchange(expired, &[StatusCode::OK]).await.unwrap_err();
        assert!(error.is_unauthorized());
    }
}
