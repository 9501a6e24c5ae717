use clap::ArgMatches;
use hs_cli::client::{ApiClient, ClientError};
use hs_cli::command::{CommandExt, STDIN_SENTINEL};
use hs_cli::commands::{
    COMMAND_ADD_PROJECT, COMMAND_ADD_TAG, COMMAND_CONFIG, COMMAND_CREATE, COMMAND_DELETE,
    COMMAND_GET, COMMAND_LIST, COMMAND_LOGIN, COMMAND_LOGO, COMMAND_LOGOUT, COMMAND_MEMBER,
    COMMAND_MEMBERS, COMMAND_PATH, COMMAND_PROJECT, COMMAND_PROJECTS, COMMAND_REMOVE_TAG,
    COMMAND_SET_LOGO, COMMAND_SHOW, COMMAND_TAGS, COMMAND_UPDATE, PARAMETER_CONFIG,
    PARAMETER_COOKIE_JAR, PARAMETER_FILE, PARAMETER_ID, PARAMETER_IMAGE, PARAMETER_PASSWORD,
    PARAMETER_PROJECT_ID, PARAMETER_ROOT, PARAMETER_TIMEOUT, PARAMETER_USER, PARAMETER_USERNAME,
};
use hs_cli::configuration::{Configuration, ConfigurationError, ConfigurationSource};
use hs_cli::endpoints::{members, projects, Endpoint, Login, Logout, Payload};
use hs_cli::exit_codes::CliExitCode;
use hs_cli::runner::run;
use hs_cli::transport::ProgramIdentity;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Undefined or unsupported subcommand {0:?}")]
    UnsupportedSubcommand(String),
    #[error(transparent)]
    ConfigurationError(#[from] ConfigurationError),
    #[error(transparent)]
    ClientError(#[from] ClientError),
    #[error("Input/Output error: {0}")]
    InputOutputError(#[from] io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> CliExitCode {
        match self {
            CliError::UnsupportedSubcommand(_) => CliExitCode::UsageError,
            CliError::ConfigurationError(_) => CliExitCode::ConfigError,
            CliError::ClientError(_) | CliError::InputOutputError(_) => CliExitCode::SystemFailure,
        }
    }
}

fn extract_subcommand_name(sub_matches: &ArgMatches) -> String {
    let message = match sub_matches.subcommand() {
        Some(m) => m.0,
        None => "unknown",
    };

    message.to_string()
}

/// Values given on the command line or through the environment
fn configuration_overrides(matches: &ArgMatches) -> ConfigurationSource {
    ConfigurationSource {
        root: matches.get_one::<String>(PARAMETER_ROOT).cloned(),
        user: matches.get_one::<String>(PARAMETER_USER).cloned(),
        password: matches.get_one::<String>(PARAMETER_PASSWORD).cloned(),
        cookie_jar: matches.get_one::<PathBuf>(PARAMETER_COOKIE_JAR).cloned(),
        timeout: matches.get_one::<u64>(PARAMETER_TIMEOUT).copied(),
    }
}

fn load_configuration(matches: &ArgMatches) -> Result<Configuration, CliError> {
    let path = matches.get_one::<PathBuf>(PARAMETER_CONFIG);
    Ok(Configuration::load(
        configuration_overrides(matches),
        path.map(PathBuf::as_path),
    )?)
}

fn create_client(matches: &ArgMatches) -> Result<ApiClient, CliError> {
    let configuration = load_configuration(matches)?;
    debug!(
        "Using API root {} as {}",
        configuration.base_url(),
        configuration.username()
    );
    Ok(ApiClient::new(configuration, &ProgramIdentity::from_package())?)
}

/// Positional arguments in endpoint order. An explicit `-` payload is left for the stdin middleware.
fn positional_arguments(matches: &ArgMatches, names: &[&str]) -> Vec<String> {
    names
        .iter()
        .filter_map(|name| matches.get_one::<String>(name).map(|value| (*name, value)))
        .filter(|(name, value)| !(*name == PARAMETER_FILE && value.as_str() == STDIN_SENTINEL))
        .map(|(_, value)| value.clone())
        .collect()
}

async fn run_endpoint(client: &ApiClient, endpoint: Endpoint, args: Vec<String>) -> CliExitCode {
    match endpoint.payload() {
        Payload::Json => run(client, &endpoint.with_stdin_default().with_login_retry(), &args).await,
        Payload::None | Payload::Image => run(client, &endpoint.with_login_retry(), &args).await,
    }
}

fn member_endpoint(name: &str) -> Option<(Endpoint, &'static [&'static str])> {
    let binding: (Endpoint, &'static [&'static str]) = match name {
        COMMAND_LIST => (members::LIST, &[]),
        COMMAND_GET => (members::GET, &[PARAMETER_USERNAME]),
        COMMAND_CREATE => (members::CREATE, &[PARAMETER_FILE]),
        COMMAND_UPDATE => (members::UPDATE, &[PARAMETER_USERNAME, PARAMETER_FILE]),
        COMMAND_DELETE => (members::DELETE, &[PARAMETER_USERNAME]),
        COMMAND_PROJECTS => (members::PROJECTS, &[PARAMETER_USERNAME]),
        COMMAND_ADD_PROJECT => (
            members::ADD_PROJECT,
            &[PARAMETER_USERNAME, PARAMETER_PROJECT_ID, PARAMETER_FILE],
        ),
        COMMAND_LOGO => (members::LOGO, &[PARAMETER_USERNAME]),
        COMMAND_SET_LOGO => (members::SET_LOGO, &[PARAMETER_USERNAME, PARAMETER_IMAGE]),
        COMMAND_TAGS => (members::TAGS, &[PARAMETER_USERNAME]),
        COMMAND_ADD_TAG => (members::ADD_TAG, &[PARAMETER_USERNAME, PARAMETER_FILE]),
        COMMAND_REMOVE_TAG => (members::REMOVE_TAG, &[PARAMETER_USERNAME, PARAMETER_FILE]),
        _ => return None,
    };
    Some(binding)
}

fn project_endpoint(name: &str) -> Option<(Endpoint, &'static [&'static str])> {
    let binding: (Endpoint, &'static [&'static str]) = match name {
        COMMAND_LIST => (projects::LIST, &[]),
        COMMAND_GET => (projects::GET, &[PARAMETER_ID]),
        COMMAND_CREATE => (projects::CREATE, &[PARAMETER_FILE]),
        COMMAND_UPDATE => (projects::UPDATE, &[PARAMETER_ID, PARAMETER_FILE]),
        COMMAND_DELETE => (projects::DELETE, &[PARAMETER_ID]),
        COMMAND_MEMBERS => (projects::MEMBERS, &[PARAMETER_ID]),
        COMMAND_LOGO => (projects::LOGO, &[PARAMETER_ID]),
        _ => return None,
    };
    Some(binding)
}

async fn execute_resource_command(
    matches: &ArgMatches,
    sub_matches: &ArgMatches,
    lookup: fn(&str) -> Option<(Endpoint, &'static [&'static str])>,
) -> Result<CliExitCode, CliError> {
    let (name, command_matches) = sub_matches
        .subcommand()
        .ok_or_else(|| CliError::UnsupportedSubcommand(extract_subcommand_name(sub_matches)))?;
    let (endpoint, parameters) =
        lookup(name).ok_or_else(|| CliError::UnsupportedSubcommand(name.to_string()))?;

    let args = positional_arguments(command_matches, parameters);
    let client = create_client(matches)?;
    Ok(run_endpoint(&client, endpoint, args).await)
}

fn execute_config_command(matches: &ArgMatches, sub_matches: &ArgMatches) -> Result<CliExitCode, CliError> {
    let mut stdout = io::stdout().lock();
    match sub_matches.subcommand() {
        Some((COMMAND_PATH, _)) => {
            let path = match matches.get_one::<PathBuf>(PARAMETER_CONFIG) {
                Some(path) => path.clone(),
                None => Configuration::get_default_configuration_file_path()?,
            };
            writeln!(stdout, "{}", path.display())?;
            Ok(CliExitCode::Success)
        }
        Some((COMMAND_SHOW, _)) => {
            let configuration = load_configuration(matches)?;
            write!(stdout, "{}", configuration.to_masked_yaml()?)?;
            Ok(CliExitCode::Success)
        }
        _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(sub_matches))),
    }
}

pub async fn execute_command(matches: &ArgMatches) -> Result<CliExitCode, CliError> {
    match matches.subcommand() {
        Some((COMMAND_MEMBER, sub_matches)) => {
            execute_resource_command(matches, sub_matches, member_endpoint).await
        }
        Some((COMMAND_PROJECT, sub_matches)) => {
            execute_resource_command(matches, sub_matches, project_endpoint).await
        }
        Some((COMMAND_LOGIN, _)) => {
            let client = create_client(matches)?;
            Ok(run(&client, &Login, &[]).await)
        }
        Some((COMMAND_LOGOUT, _)) => {
            let client = create_client(matches)?;
            Ok(run(&client, &Logout, &[]).await)
        }
        Some((COMMAND_CONFIG, sub_matches)) => execute_config_command(matches, sub_matches),
        _ => Err(CliError::UnsupportedSubcommand(extract_subcommand_name(matches))),
    }
}
