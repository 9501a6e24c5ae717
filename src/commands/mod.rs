//! CLI command definitions and argument parsing.
//!
//! This module defines all the CLI commands and their arguments using the clap crate.
//! Command groups live in their own files; shared names and argument builders are in
//! [`params`].

use clap::Command;

pub mod auth;
pub mod config;
pub mod member;
pub mod params;
pub mod project;

pub use params::{
    COMMAND_ADD_PROJECT, COMMAND_ADD_TAG, COMMAND_CONFIG, COMMAND_CREATE, COMMAND_DELETE,
    COMMAND_GET, COMMAND_LIST, COMMAND_LOGIN, COMMAND_LOGO, COMMAND_LOGOUT, COMMAND_MEMBER,
    COMMAND_MEMBERS, COMMAND_PATH, COMMAND_PROJECT, COMMAND_PROJECTS, COMMAND_REMOVE_TAG,
    COMMAND_SET_LOGO, COMMAND_SHOW, COMMAND_TAGS, COMMAND_UPDATE, PARAMETER_CONFIG,
    PARAMETER_COOKIE_JAR, PARAMETER_FILE, PARAMETER_ID, PARAMETER_IMAGE, PARAMETER_PASSWORD,
    PARAMETER_PROJECT_ID, PARAMETER_ROOT, PARAMETER_TIMEOUT, PARAMETER_USER, PARAMETER_USERNAME,
    PARAMETER_VERBOSE,
};

/// Build the complete command-line interface.
pub fn build_cli() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .propagate_version(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(params::verbose_parameter())
        .arg(params::config_parameter())
        .arg(params::root_parameter())
        .arg(params::user_parameter())
        .arg(params::password_parameter())
        .arg(params::cookie_jar_parameter())
        .arg(params::timeout_parameter())
        .subcommand(member::member_command())
        .subcommand(project::project_command())
        .subcommand(auth::login_command())
        .subcommand(auth::logout_command())
        .subcommand(config::config_command())
}
