use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;
use url::Url;

pub const DEFAULT_APPLICATION_ID: &str = "hs-cli";
pub const DEFAULT_CONFIGURATION_FILE_NAME: &str = "config.yml";
pub const DEFAULT_SESSION_FILE_NAME: &str = "cookies.json";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 100;
pub const CONFIGURATION_DIRECTORY_VARIABLE: &str = "HS_CONFIG_DIR";

const MASKED_PASSWORD: &str = "********";

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("failed to resolve the configuration directory")]
    FailedToFindConfigurationDirectory,
    #[error("failed to load configuration data from {path:?}, because of: {cause}")]
    FailedToLoadData {
        path: PathBuf,
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("failed to format configuration data, because of: {cause}")]
    FailedToWriteData { cause: serde_yaml::Error },
    #[error("missing value for property {name:?}")]
    MissingRequiredPropertyValue { name: String },
    #[error("invalid API root url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Configuration values from one source (file, environment or flags).
///
/// Every value is optional; sources are merged with [`ConfigurationSource::or`]
/// and the result is validated by [`ConfigurationSource::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, rename = "cookiejar", skip_serializing_if = "Option::is_none")]
    pub cookie_jar: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl ConfigurationSource {
    /// Read a YAML configuration file. A file that does not exist is an empty source.
    pub fn load_from_file(path: &Path) -> Result<ConfigurationSource, ConfigurationError> {
        match fs::read_to_string(path) {
            Ok(contents) if contents.trim().is_empty() => Ok(ConfigurationSource::default()),
            Ok(contents) => {
                serde_yaml::from_str(&contents).map_err(|cause| ConfigurationError::FailedToLoadData {
                    path: path.to_path_buf(),
                    cause: Box::new(cause),
                })
            }
            Err(cause) if cause.kind() == std::io::ErrorKind::NotFound => {
                debug!("No configuration file at {:?}", path);
                Ok(ConfigurationSource::default())
            }
            Err(cause) => Err(ConfigurationError::FailedToLoadData {
                path: path.to_path_buf(),
                cause: Box::new(cause),
            }),
        }
    }

    /// Values from `self` take precedence, missing ones are taken from `fallback`
    pub fn or(self, fallback: ConfigurationSource) -> ConfigurationSource {
        ConfigurationSource {
            root: non_empty(self.root).or(non_empty(fallback.root)),
            user: non_empty(self.user).or(non_empty(fallback.user)),
            password: non_empty(self.password).or(non_empty(fallback.password)),
            cookie_jar: self.cookie_jar.or(fallback.cookie_jar),
            timeout: self.timeout.or(fallback.timeout),
        }
    }

    /// Validate the merged values and fill in defaults
    pub fn resolve(self) -> Result<Configuration, ConfigurationError> {
        let root = required(self.root, "root")?;
        let username = required(self.user, "user")?;
        let password = required(self.password, "password")?;

        let session_path = match self.cookie_jar {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => Configuration::get_default_configuration_directory()?.join(DEFAULT_SESSION_FILE_NAME),
        };

        let base_url = parse_base_url(&root)?;
        let timeout = Duration::from_secs(self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECONDS));

        Ok(Configuration {
            base_url,
            username,
            password,
            session_path,
            timeout,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &str) -> Result<String, ConfigurationError> {
    non_empty(value).ok_or_else(|| ConfigurationError::MissingRequiredPropertyValue {
        name: name.to_string(),
    })
}

fn parse_base_url(root: &str) -> Result<Url, ConfigurationError> {
    let url = Url::parse(root).map_err(|e| ConfigurationError::InvalidBaseUrl {
        url: root.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigurationError::InvalidBaseUrl {
            url: root.to_string(),
            reason: "not a hierarchical url".to_string(),
        });
    }
    Ok(url)
}

/// Resolved configuration, immutable for the lifetime of the process
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    base_url: Url,
    username: String,
    password: String,
    session_path: PathBuf,
    timeout: Duration,
}

impl Configuration {
    pub fn new(
        base_url: Url,
        username: impl Into<String>,
        password: impl Into<String>,
        session_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            base_url,
            username: username.into(),
            password: password.into(),
            session_path: session_path.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn session_path(&self) -> &Path {
        &self.session_path
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn get_default_configuration_directory() -> Result<PathBuf, ConfigurationError> {
        // HS_CONFIG_DIR wins over the platform configuration directory
        if let Ok(config_dir_str) = std::env::var(CONFIGURATION_DIRECTORY_VARIABLE) {
            return Ok(PathBuf::from(config_dir_str));
        }

        match config_dir() {
            Some(mut directory) => {
                directory.push(DEFAULT_APPLICATION_ID);
                Ok(directory)
            }
            None => Err(ConfigurationError::FailedToFindConfigurationDirectory),
        }
    }

    pub fn get_default_configuration_file_path() -> Result<PathBuf, ConfigurationError> {
        Ok(Self::get_default_configuration_directory()?.join(DEFAULT_CONFIGURATION_FILE_NAME))
    }

    /// Resolve the configuration from command line/environment values and the file at `path`
    pub fn load(
        overrides: ConfigurationSource,
        path: Option<&Path>,
    ) -> Result<Configuration, ConfigurationError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::get_default_configuration_file_path()?,
        };
        debug!("Attempting to load configuration from file {:?}", path);
        let file = ConfigurationSource::load_from_file(&path)?;
        overrides.or(file).resolve()
    }

    /// YAML rendering of the configuration with the password masked
    pub fn to_masked_yaml(&self) -> Result<String, ConfigurationError> {
        let source = ConfigurationSource {
            root: Some(self.base_url.to_string()),
            user: Some(self.username.clone()),
            password: Some(MASKED_PASSWORD.to_string()),
            cookie_jar: Some(self.session_path.clone()),
            timeout: Some(self.timeout.as_secs()),
        };
        serde_yaml::to_string(&source).map_err(|cause| ConfigurationError::FailedToWriteData { cause })
    }
}
