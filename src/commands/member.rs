//! Member command definitions.

use crate::commands::params::{
    file_parameter, image_parameter, project_id_parameter, username_parameter, COMMAND_ADD_PROJECT,
    COMMAND_ADD_TAG, COMMAND_CREATE, COMMAND_DELETE, COMMAND_GET, COMMAND_LIST, COMMAND_LOGO,
    COMMAND_MEMBER, COMMAND_PROJECTS, COMMAND_REMOVE_TAG, COMMAND_SET_LOGO, COMMAND_TAGS,
    COMMAND_UPDATE,
};
use clap::Command;

/// Create the member command with all its subcommands.
pub fn member_command() -> Command {
    Command::new(COMMAND_MEMBER)
        .about("Member operations")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List all members")
                .visible_alias("ls"),
        )
        .subcommand(
            Command::new(COMMAND_GET)
                .about("Get a member")
                .arg(username_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_CREATE)
                .about("Create a member from a JSON document")
                .arg(file_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_UPDATE)
                .about("Update a member from a JSON document")
                .arg(username_parameter())
                .arg(file_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_DELETE)
                .about("Delete a member")
                .arg(username_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_PROJECTS)
                .about("List the projects of a member")
                .arg(username_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_ADD_PROJECT)
                .about("Add a member to a project")
                .arg(username_parameter())
                .arg(project_id_parameter())
                .arg(file_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_LOGO)
                .about("Download the logo of a member")
                .arg(username_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_SET_LOGO)
                .about("Upload a new logo for a member")
                .arg(username_parameter())
                .arg(image_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_TAGS)
                .about("List the tags of a member")
                .arg(username_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_ADD_TAG)
                .about("Add a tag to a member")
                .arg(username_parameter())
                .arg(file_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_REMOVE_TAG)
                .about("Remove a tag from a member")
                .arg(username_parameter())
                .arg(file_parameter()),
        )
}
