//! The command abstraction and its middleware.
//!
//! A [`Command`] performs one domain operation against the API and returns the
//! response payload. Middleware are commands wrapping another command; they are
//! composed by wrapping at the call site:
//!
//! ```ignore
//! let command = members::CREATE.with_stdin_default().with_login_retry();
//! ```

use std::borrow::Cow;
use std::fs::File;
use std::path::Path;

use tracing::debug;

use crate::{
    client::ApiClient,
    error::{CommandError, CommandResult},
};

/// Argument telling a payload-accepting command to read its payload from standard input
pub const STDIN_SENTINEL: &str = "-";

/// A single domain operation bound to one HTTP exchange
#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self, client: &ApiClient, args: &[String]) -> CommandResult;
}

impl<C: Command + ?Sized> Command for &C {
    async fn execute(&self, client: &ApiClient, args: &[String]) -> CommandResult {
        (**self).execute(client, args).await
    }
}

/// Combinators wrapping a command in middleware
pub trait CommandExt: Command + Sized {
    /// Log in again and retry once when the command reports an unauthorized session
    fn with_login_retry(self) -> WithLoginRetry<Self> {
        WithLoginRetry::new(self)
    }

    /// Read the payload from standard input unless the last argument is a file
    fn with_stdin_default(self) -> WithStdinDefault<Self> {
        WithStdinDefault::new(self)
    }
}

impl<C: Command> CommandExt for C {}

/// Re-authenticates and retries the inner command exactly once on an unauthorized error
pub struct WithLoginRetry<C> {
    inner: C,
}

impl<C: Command> WithLoginRetry<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C: Command> Command for WithLoginRetry<C> {
    async fn execute(&self, client: &ApiClient, args: &[String]) -> CommandResult {
        match self.inner.execute(client, args).await {
            Err(error) if error.is_unauthorized() => {
                debug!("Retrying command with login ({})", error);
                if let Err(login_error) = client.login().await {
                    return Err(CommandError::new(
                        "Failed to log in",
                        Some(Box::new(login_error)),
                    ));
                }
                self.inner.execute(client, args).await
            }
            result => result,
        }
    }
}

/// Appends [`STDIN_SENTINEL`] unless the last argument is a readable file
pub struct WithStdinDefault<C> {
    inner: C,
}

impl<C: Command> WithStdinDefault<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C: Command> Command for WithStdinDefault<C> {
    async fn execute(&self, client: &ApiClient, args: &[String]) -> CommandResult {
        let args = default_last_to_stdin(args);
        self.inner.execute(client, &args).await
    }
}

/// Argument vector with the stdin sentinel appended when the last argument is not a readable file
pub fn default_last_to_stdin(args: &[String]) -> Cow<'_, [String]> {
    match args.last() {
        Some(last) if is_readable_file(Path::new(last)) => Cow::Borrowed(args),
        _ => {
            let mut args = args.to_vec();
            args.push(STDIN_SENTINEL.to_string());
            Cow::Owned(args)
        }
    }
}

fn is_readable_file(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        configuration::Configuration, error::ErrorKind, session::SessionStore,
        transport::ProgramIdentity,
    };
    use httpmock::prelude::*;
    use std::collections::VecDeque;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tempfile::{NamedTempFile, TempDir};
    use url::Url;

    /// Returns scripted results and records the arguments of every call
    struct ScriptedCommand {
        results: Mutex<VecDeque<CommandResult>>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedCommand {
        fn new(results: Vec<CommandResult>) -> Self {
            Self {
                results: Mutex::new(results.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Command for ScriptedCommand {
        async fn execute(&self, _client: &ApiClient, args: &[String]) -> CommandResult {
            self.calls.lock().unwrap().push(args.to_vec());
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(CommandError::business("no scripted result left")))
        }
    }

    fn unauthorized() -> CommandResult {
        Err(CommandError::new(
            "session expired",
            Some(Box::new(CommandError::unauthorized("Unauthorized!"))),
        ))
    }

    fn client(server: &MockServer, dir: &TempDir) -> ApiClient {
        let configuration = Configuration::new(
            Url::parse(&server.base_url()).unwrap(),
            "alice",
            "secret",
            dir.path().join("cookies.json"),
        );
        ApiClient::new(configuration, &ProgramIdentity::default()).unwrap()
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_success_does_not_login() {
        let server = MockServer::start();
        let dir = TempDir::new().unwrap();
        let login = server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(200);
        });

        let inner = ScriptedCommand::new(vec![Ok(b"payload".to_vec())]);
        let result = (&inner).with_login_retry().execute(&client(&server, &dir), &args(&["alice"])).await;

        assert_eq!(result.unwrap(), b"payload");
        assert_eq!(inner.calls().len(), 1);
        login.assert_hits(0);
    }

    #[tokio::test]
    async fn test_other_errors_pass_through() {
        let server = MockServer::start();
        let dir = TempDir::new().unwrap();
        let login = server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(200);
        });

        let inner = ScriptedCommand::new(vec![Err(CommandError::business("404 Not Found"))]);
        let error = (&inner)
            .with_login_retry()
            .execute(&client(&server, &dir), &[])
            .await
            .unwrap_err();

        assert_eq!(error.message(), "404 Not Found");
        assert_eq!(inner.calls().len(), 1);
        login.assert_hits(0);
    }

    #[tokio::test]
    async fn test_unauthorized_logs_in_and_retries_once() {
        let server = MockServer::start();
        let dir = TempDir::new().unwrap();
        let login = server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(200);
        });

        let inner = ScriptedCommand::new(vec![unauthorized(), Ok(b"payload".to_vec())]);
        let result = (&inner)
            .with_login_retry()
            .execute(&client(&server, &dir), &args(&["42"]))
            .await;

        assert_eq!(result.unwrap(), b"payload");
        assert_eq!(inner.calls(), vec![args(&["42"]), args(&["42"])]);
        login.assert_hits(1);
    }

    #[tokio::test]
    async fn test_persistent_unauthorized_is_not_retried_twice() {
        let server = MockServer::start();
        let dir = TempDir::new().unwrap();
        let login = server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(200);
        });

        let inner = ScriptedCommand::new(vec![unauthorized(), unauthorized(), unauthorized()]);
        let error = (&inner)
            .with_login_retry()
            .execute(&client(&server, &dir), &[])
            .await
            .unwrap_err();

        assert!(error.is_unauthorized());
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
        assert_eq!(inner.calls().len(), 2);
        login.assert_hits(1);
    }

    #[tokio::test]
    async fn test_failed_login_is_wrapped_and_not_retried() {
        let server = MockServer::start();
        let dir = TempDir::new().unwrap();
        let login = server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(503).body("maintenance");
        });

        let inner = ScriptedCommand::new(vec![unauthorized(), Ok(b"never".to_vec())]);
        let error = (&inner)
            .with_login_retry()
            .execute(&client(&server, &dir), &[])
            .await
            .unwrap_err();

        assert_eq!(error.message(), "Failed to log in");
        assert_eq!(error.kind(), ErrorKind::SystemFailure);
        assert_eq!(error.cause().map(|c| c.to_string()), Some("maintenance".to_string()));
        assert_eq!(inner.calls().len(), 1);
        login.assert_hits(1);
    }

    #[tokio::test]
    async fn test_rejected_credentials_stay_unauthorized() {
        let server = MockServer::start();
        let dir = TempDir::new().unwrap();
        server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(401).body("bad credentials");
        });

        let inner = ScriptedCommand::new(vec![unauthorized()]);
        let error = (&inner)
            .with_login_retry()
            .execute(&client(&server, &dir), &[])
            .await
            .unwrap_err();

        assert!(error.is_unauthorized());
        assert_eq!(error.exit_code(), crate::exit_codes::CliExitCode::BusinessLogic);
        assert_eq!(inner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_every_execution_gets_its_own_retry() {
        let server = MockServer::start();
        let dir = TempDir::new().unwrap();
        let login = server.mock(|when, then| {
            when.method(POST).path("/login");
            then.status(200);
        });

        let inner = ScriptedCommand::new(vec![
            unauthorized(),
            Ok(b"first".to_vec()),
            unauthorized(),
            Ok(b"second".to_vec()),
        ]);
        let command = (&inner).with_login_retry();
        let client = client(&server, &dir);

        assert_eq!(command.execute(&client, &[]).await.unwrap(), b"first");
        assert_eq!(command.execute(&client, &[]).await.unwrap(), b"second");
        login.assert_hits(2);
    }

    #[test]
    fn test_no_arguments_defaults_to_stdin() {
        assert_eq!(default_last_to_stdin(&[]).into_owned(), args(&["-"]));
    }

    #[test]
    fn test_missing_path_appends_stdin() {
        let original = args(&["alice", "/definitely/not/here.json"]);
        let result = default_last_to_stdin(&original);
        assert_eq!(
            result.into_owned(),
            args(&["alice", "/definitely/not/here.json", "-"])
        );
    }

    #[test]
    fn test_directory_is_not_a_payload_file() {
        let dir = TempDir::new().unwrap();
        let directory = dir.path().to_string_lossy().to_string();
        let original = args(&["alice", &directory]);
        let result = default_last_to_stdin(&original);
        assert_eq!(result.last().map(String::as_str), Some(STDIN_SENTINEL));
    }

    #[test]
    fn test_existing_file_passes_through() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().to_string();
        let original = args(&["alice", &path]);

        let result = default_last_to_stdin(&original);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result.into_owned(), original);
    }

    #[tokio::test]
    async fn test_stdin_default_middleware_rewrites_arguments() {
        let dir = TempDir::new().unwrap();
        let configuration = Configuration::new(
            Url::parse("http://127.0.0.1:9").unwrap(),
            "alice",
            "secret",
            dir.path().join("cookies.json"),
        );
        let session = Arc::new(SessionStore::load(configuration.session_path()).unwrap());
        let client = ApiClient::with_transport(configuration, session, Box::new(reqwest::Client::new()));

        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().to_string();
        let inner = ScriptedCommand::new(vec![Ok(vec![]), Ok(vec![]), Ok(vec![])]);
        let command = (&inner).with_stdin_default();

        command.execute(&client, &[]).await.unwrap();
        command.execute(&client, &args(&["bob"])).await.unwrap();
        command.execute(&client, &args(&["bob", &path])).await.unwrap();

        assert_eq!(
            inner.calls(),
            vec![args(&["-"]), args(&["bob", "-"]), args(&["bob", &path])]
        );
    }

    #[test]
    fn test_login_error_io_cause_is_system_failure() {
        let error = CommandError::new(
            "Failed to log in",
            Some(Box::new(CommandError::system("Failed requesting server", io::Error::other("dns error")))),
        );
        assert_eq!(error.kind(), ErrorKind::SystemFailure);
    }
}
