//! Endpoint bindings.
//!
//! Every resource operation is one HTTP verb on one URL pattern. Operations are
//! described declaratively by an [`Endpoint`], which implements [`Command`] and
//! follows the status translation contract of [`ApiClient::exchange`].

use std::io;
use std::path::Path;

use reqwest::{header::CONTENT_TYPE, multipart, Method, StatusCode};
use tokio::io::AsyncReadExt;
use tokio::sync::OnceCell;
use tracing::{debug, trace};

use crate::{
    client::ApiClient,
    command::{Command, STDIN_SENTINEL},
    error::{CommandError, CommandResult},
};

pub mod members;
pub mod projects;

const OK: &[StatusCode] = &[StatusCode::OK];
const OK_OR_CREATED: &[StatusCode] = &[StatusCode::OK, StatusCode::CREATED];

static STDIN_PAYLOAD: OnceCell<Vec<u8>> = OnceCell::const_new();

/// What an endpoint sends as request body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// No body
    None,
    /// JSON document read from a file, or from standard input for [`STDIN_SENTINEL`]
    Json,
    /// Image file sent as the `file` part of a multipart form
    Image,
}

/// One resource operation: verb, path template and payload kind.
///
/// `{}` placeholders in the path are filled in order from the command
/// arguments; a payload argument follows the path arguments.
#[derive(Debug, Clone)]
pub struct Endpoint {
    method: Method,
    path: &'static str,
    payload: Payload,
    accepted: &'static [StatusCode],
}

impl Endpoint {
    pub const fn new(
        method: Method,
        path: &'static str,
        payload: Payload,
        accepted: &'static [StatusCode],
    ) -> Self {
        Self {
            method,
            path,
            payload,
            accepted,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn payload(&self) -> Payload {
        self.payload
    }

    /// Number of arguments the endpoint expects
    pub fn arity(&self) -> usize {
        let payload = match self.payload {
            Payload::None => 0,
            Payload::Json | Payload::Image => 1,
        };
        self.path_arity() + payload
    }

    fn path_arity(&self) -> usize {
        self.path.split('/').filter(|s| *s == "{}").count()
    }

    fn segments<'a>(&'a self, path_args: &'a [String]) -> Vec<&'a str> {
        let mut values = path_args.iter();
        self.path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment {
                "{}" => values.next().map(String::as_str).unwrap_or_default(),
                literal => literal,
            })
            .collect()
    }
}

impl Command for Endpoint {
    async fn execute(&self, client: &ApiClient, args: &[String]) -> CommandResult {
        if args.len() != self.arity() {
            return Err(CommandError::business(format!(
                "Wrong number of arguments, expected {} got {}",
                self.arity(),
                args.len()
            )));
        }

        let (path_args, payload_args) = args.split_at(self.path_arity());
        let url = client.url(&self.segments(path_args));
        let mut builder = client.http().request(self.method.clone(), url);

        match (self.payload, payload_args.first()) {
            (Payload::Json, Some(source)) => {
                let body = read_payload(source).await?;
                builder = builder.header(CONTENT_TYPE, "application/json").body(body);
            }
            (Payload::Image, Some(source)) => {
                builder = builder.multipart(image_form(source).await?);
            }
            _ => {}
        }

        let request = builder
            .build()
            .map_err(|e| CommandError::system("Failed creating server request", e))?;
        let exchange = client.exchange(request, self.accepted).await?;
        trace!("{} {} answered {}", self.method, self.path, exchange.status);
        Ok(exchange.body)
    }
}

/// Payload from the file at `source`, or from standard input for the sentinel
async fn read_payload(source: &str) -> Result<Vec<u8>, CommandError> {
    if source == STDIN_SENTINEL {
        debug!("Reading payload from standard input");
        return stdin_payload()
            .await
            .map_err(|e| CommandError::system("Failed reading standard input", e));
    }

    tokio::fs::read(source)
        .await
        .map_err(|e| CommandError::system("Failed opening file", e))
}

/// Standard input can only be consumed once, so a retried command reuses the first read
async fn stdin_payload() -> io::Result<Vec<u8>> {
    STDIN_PAYLOAD
        .get_or_try_init(|| async {
            let mut buffer = Vec::new();
            tokio::io::stdin().read_to_end(&mut buffer).await?;
            Ok::<_, io::Error>(buffer)
        })
        .await
        .cloned()
}

async fn image_form(source: &str) -> Result<multipart::Form, CommandError> {
    let path = Path::new(source);
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| CommandError::system("Failed opening file", e))?;

    let mime_type = mime_guess::from_path(path)
        .first()
        .unwrap_or(mime::APPLICATION_OCTET_STREAM);
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string());

    let part = multipart::Part::bytes(data)
        .file_name(file_name)
        .mime_str(mime_type.essence_str())
        .map_err(|e| CommandError::system("Failed creating multipart form", e))?;
    Ok(multipart::Form::new().part("file", part))
}

/// Logs in with the configured credentials
#[derive(Debug, Clone, Copy, Default)]
pub struct Login;

impl Command for Login {
    async fn execute(&self, client: &ApiClient, _args: &[String]) -> CommandResult {
        client.login().await?;
        Ok(b"Logged in successfully!".to_vec())
    }
}

/// Forgets the stored session
#[derive(Debug, Clone, Copy, Default)]
pub struct Logout;

impl Command for Logout {
    async fn execute(&self, client: &ApiClient, _args: &[String]) -> CommandResult {
        client
            .session()
            .clear()
            .map_err(|e| CommandError::system("Failed clearing session", e))?;
        Ok(b"Logged out".to_vec())
    }
}
