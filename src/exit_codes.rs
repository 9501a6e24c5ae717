//! Exit codes for the hs-cli application
//!
//! The pipeline codes (0, 1, 2) are load-bearing for scripting: 0 is success,
//! 1 is a domain-level rejection and 2 is an infrastructure failure. Front-end
//! failures that happen before any command runs follow the BSD sysexits.h
//! conventions.

/// Exit codes for hs-cli
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliExitCode {
    /// Success (0) - Command completed successfully
    Success = 0,

    /// Business logic error (1) - Bad input, resource not found, authentication rejected
    BusinessLogic = 1,

    /// System failure (2) - No connectivity, I/O or encoding errors
    SystemFailure = 2,

    /// Command line usage error (64) - User input error
    UsageError = exitcode::USAGE as isize,

    /// Configuration error (78) - Application configuration issue
    ConfigError = exitcode::CONFIG as isize,
}

impl CliExitCode {
    /// Convert to numeric exit code
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Get descriptive message for the exit code
    pub fn message(&self) -> &'static str {
        match self {
            CliExitCode::Success => "Success",
            CliExitCode::BusinessLogic => "Request rejected",
            CliExitCode::SystemFailure => "System failure",
            CliExitCode::UsageError => "Command line usage error",
            CliExitCode::ConfigError => "Configuration error",
        }
    }
}

impl From<CliExitCode> for i32 {
    fn from(code: CliExitCode) -> Self {
        code.code()
    }
}
