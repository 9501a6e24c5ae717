//! Error taxonomy for command execution.
//!
//! Every command reports failures as a [`CommandError`]. The error carries a
//! user-facing message, an [`ErrorKind`] tag and an optional underlying cause:
//!
//! - `BusinessLogic`: bad arguments, rejected requests, missing resources. No
//!   cause, the message is always safe to show.
//! - `Unauthorized`: the API rejected the session. Detected through any number
//!   of wrapping layers so the login retry middleware can react to it.
//! - `SystemFailure`: network, encoding or local I/O problems. The cause is only
//!   surfaced in the debug log.

use std::error::Error as StdError;

use crate::exit_codes::CliExitCode;

/// Boxed cause carried by a [`CommandError`]
pub type Cause = Box<dyn StdError + Send + Sync + 'static>;

/// Result returned by every command
pub type CommandResult = Result<Vec<u8>, CommandError>;

/// Classification of a [`CommandError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Failure meaningful to the user, not caused by infrastructure
    BusinessLogic,
    /// The API rejected the session
    Unauthorized,
    /// Failure caused by infrastructure (network, disk, encoding)
    SystemFailure,
}

impl ErrorKind {
    /// Exit code the runner uses for this kind of failure
    pub fn exit_code(&self) -> CliExitCode {
        match self {
            ErrorKind::BusinessLogic | ErrorKind::Unauthorized => CliExitCode::BusinessLogic,
            ErrorKind::SystemFailure => CliExitCode::SystemFailure,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CommandError {
    message: String,
    kind: ErrorKind,
    #[source]
    cause: Option<Cause>,
}

impl CommandError {
    /// Create an error from a display message and an optional cause.
    ///
    /// Without a cause the error is a business-logic error. With a cause it is a
    /// system failure, unless the cause chain contains an unauthorized error, in
    /// which case the unauthorized classification is kept.
    pub fn new(message: impl Into<String>, cause: Option<Cause>) -> Self {
        let kind = match &cause {
            None => ErrorKind::BusinessLogic,
            Some(cause) if chain_is_unauthorized(Some(cause.as_ref() as &(dyn StdError + 'static))) => {
                ErrorKind::Unauthorized
            }
            Some(_) => ErrorKind::SystemFailure,
        };

        Self {
            message: message.into(),
            kind,
            cause,
        }
    }

    pub fn business(message: impl Into<String>) -> Self {
        Self::new(message, None)
    }

    pub fn system(message: impl Into<String>, cause: impl Into<Cause>) -> Self {
        Self::new(message, Some(cause.into()))
    }

    /// The "session rejected" sentinel
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ErrorKind::Unauthorized,
            cause: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The underlying cause, if any
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Whether this error, or anything in its cause chain, is unauthorized
    pub fn is_unauthorized(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
            || chain_is_unauthorized(self.cause.as_deref().map(|c| c as &(dyn StdError + 'static)))
    }

    pub fn is_system_failure(&self) -> bool {
        self.kind == ErrorKind::SystemFailure
    }

    pub fn exit_code(&self) -> CliExitCode {
        self.kind.exit_code()
    }
}

fn chain_is_unauthorized(mut current: Option<&(dyn StdError + 'static)>) -> bool {
    while let Some(error) = current {
        if let Some(command_error) = error.downcast_ref::<CommandError>() {
            if command_error.kind == ErrorKind::Unauthorized {
                return true;
            }
        }
        current = error.source();
    }
    false
}
