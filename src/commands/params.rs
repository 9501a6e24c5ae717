//! Shared command parameters for all CLI commands.
//!
//! Parameter names and the builders for arguments used by more than one command.

use clap::{Arg, ArgAction};
use std::path::PathBuf;

// CRUD operations
pub const COMMAND_LIST: &str = "list";
pub const COMMAND_GET: &str = "get";
pub const COMMAND_CREATE: &str = "create";
pub const COMMAND_UPDATE: &str = "update";
pub const COMMAND_DELETE: &str = "delete";

// Member commands
pub const COMMAND_MEMBER: &str = "member";
pub const COMMAND_PROJECTS: &str = "projects";
pub const COMMAND_ADD_PROJECT: &str = "add-project";
pub const COMMAND_LOGO: &str = "logo";
pub const COMMAND_SET_LOGO: &str = "set-logo";
pub const COMMAND_TAGS: &str = "tags";
pub const COMMAND_ADD_TAG: &str = "add-tag";
pub const COMMAND_REMOVE_TAG: &str = "remove-tag";

// Project commands
pub const COMMAND_PROJECT: &str = "project";
pub const COMMAND_MEMBERS: &str = "members";

// Session commands
pub const COMMAND_LOGIN: &str = "login";
pub const COMMAND_LOGOUT: &str = "logout";

// Config commands
pub const COMMAND_CONFIG: &str = "config";
pub const COMMAND_PATH: &str = "path";
pub const COMMAND_SHOW: &str = "show";

// Global parameter names
pub const PARAMETER_VERBOSE: &str = "verbose";
pub const PARAMETER_CONFIG: &str = "config";
pub const PARAMETER_ROOT: &str = "root";
pub const PARAMETER_USER: &str = "user";
pub const PARAMETER_PASSWORD: &str = "password";
pub const PARAMETER_COOKIE_JAR: &str = "cookie-jar";
pub const PARAMETER_TIMEOUT: &str = "timeout";

// Command parameter names
pub const PARAMETER_USERNAME: &str = "username";
pub const PARAMETER_ID: &str = "id";
pub const PARAMETER_PROJECT_ID: &str = "project-id";
pub const PARAMETER_FILE: &str = "file";
pub const PARAMETER_IMAGE: &str = "image";

// Environment variables
pub const ENV_ROOT: &str = "HS_ROOT";
pub const ENV_USER: &str = "HS_USER";
pub const ENV_PASSWORD: &str = "HS_PASSWORD";
pub const ENV_COOKIE_JAR: &str = "HS_COOKIEJAR";
pub const ENV_TIMEOUT: &str = "HS_TIMEOUT";

/// Global flag forcing debug logging.
pub fn verbose_parameter() -> Arg {
    Arg::new(PARAMETER_VERBOSE)
        .short('v')
        .long(PARAMETER_VERBOSE)
        .short_alias('d')
        .alias("debug")
        .action(ArgAction::SetTrue)
        .global(true)
        .help("Enable verbose output for debugging")
}

/// Global configuration file location.
pub fn config_parameter() -> Arg {
    Arg::new(PARAMETER_CONFIG)
        .short('f')
        .long(PARAMETER_CONFIG)
        .num_args(1)
        .required(false)
        .global(true)
        .help("Configuration file path")
        .value_parser(clap::value_parser!(PathBuf))
}

pub fn root_parameter() -> Arg {
    Arg::new(PARAMETER_ROOT)
        .short('r')
        .long(PARAMETER_ROOT)
        .num_args(1)
        .required(false)
        .global(true)
        .env(ENV_ROOT)
        .help("Root URL of the API")
}

pub fn user_parameter() -> Arg {
    Arg::new(PARAMETER_USER)
        .short('u')
        .long(PARAMETER_USER)
        .num_args(1)
        .required(false)
        .global(true)
        .env(ENV_USER)
        .help("User name to log in with")
}

pub fn password_parameter() -> Arg {
    Arg::new(PARAMETER_PASSWORD)
        .short('p')
        .long(PARAMETER_PASSWORD)
        .num_args(1)
        .required(false)
        .global(true)
        .env(ENV_PASSWORD)
        .hide_env_values(true)
        .help("Password to log in with")
}

pub fn cookie_jar_parameter() -> Arg {
    Arg::new(PARAMETER_COOKIE_JAR)
        .short('c')
        .long(PARAMETER_COOKIE_JAR)
        .num_args(1)
        .required(false)
        .global(true)
        .env(ENV_COOKIE_JAR)
        .help("File keeping the session cookies")
        .value_parser(clap::value_parser!(PathBuf))
}

/// Per-request timeout in seconds.
pub fn timeout_parameter() -> Arg {
    Arg::new(PARAMETER_TIMEOUT)
        .long(PARAMETER_TIMEOUT)
        .num_args(1)
        .required(false)
        .global(true)
        .env(ENV_TIMEOUT)
        .help("Request timeout in seconds")
        .value_parser(clap::value_parser!(u64).range(1..))
}

pub fn username_parameter() -> Arg {
    Arg::new(PARAMETER_USERNAME)
        .required(true)
        .help("Username of the member")
}

pub fn id_parameter() -> Arg {
    Arg::new(PARAMETER_ID)
        .required(true)
        .help("Project ID")
}

pub fn project_id_parameter() -> Arg {
    Arg::new(PARAMETER_PROJECT_ID)
        .required(true)
        .help("Project ID")
}

/// Optional JSON payload file; standard input is read when it is omitted or `-`.
pub fn file_parameter() -> Arg {
    Arg::new(PARAMETER_FILE)
        .required(false)
        .help("JSON payload file, read from standard input when omitted or '-'")
}

pub fn image_parameter() -> Arg {
    Arg::new(PARAMETER_IMAGE)
        .required(true)
        .help("Image file to upload")
}
