//! Session command definitions.

use crate::commands::params::{COMMAND_LOGIN, COMMAND_LOGOUT};
use clap::Command;

pub fn login_command() -> Command {
    Command::new(COMMAND_LOGIN).about("Log in with the configured credentials and keep the session")
}

pub fn logout_command() -> Command {
    Command::new(COMMAND_LOGOUT).about("Forget the stored session")
}
