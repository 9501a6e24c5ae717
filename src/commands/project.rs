//! Project command definitions.

use crate::commands::params::{
    file_parameter, id_parameter, COMMAND_CREATE, COMMAND_DELETE, COMMAND_GET, COMMAND_LIST,
    COMMAND_LOGO, COMMAND_MEMBERS, COMMAND_PROJECT, COMMAND_UPDATE,
};
use clap::Command;

/// Create the project command with all its subcommands.
pub fn project_command() -> Command {
    Command::new(COMMAND_PROJECT)
        .about("Project operations")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List all projects")
                .visible_alias("ls"),
        )
        .subcommand(Command::new(COMMAND_GET).about("Get a project").arg(id_parameter()))
        .subcommand(
            Command::new(COMMAND_CREATE)
                .about("Create a project from a JSON document")
                .arg(file_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_UPDATE)
                .about("Update a project from a JSON document")
                .arg(id_parameter())
                .arg(file_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_DELETE)
                .about("Delete a project")
                .arg(id_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_MEMBERS)
                .about("List the members of a project")
                .arg(id_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_LOGO)
                .about("Download the logo of a project")
                .arg(id_parameter()),
        )
}
