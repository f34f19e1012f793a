//! Runtime settings: built-in defaults, then an optional TOML file, then
//! `CADASTRO_*` environment variables. The result is validated as a whole.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["cadastro.toml", "config/cadastro.toml"];

/// Every setting by dotted path, with the environment variables that
/// override it in priority order.
pub const ENV_BINDINGS: &[(&str, &[&str])] = &[
    ("database.url", &["CADASTRO_DATABASE_URL"]),
    ("database.max_connections", &["CADASTRO_DATABASE_MAX_CONNECTIONS"]),
    ("database.timeout_secs", &["CADASTRO_DATABASE_TIMEOUT_SECS"]),
    ("server.bind_address", &["CADASTRO_SERVER_BIND_ADDRESS"]),
    ("server.port", &["CADASTRO_SERVER_PORT"]),
    ("server.graceful_shutdown_secs", &["CADASTRO_SERVER_GRACEFUL_SHUTDOWN_SECS"]),
    ("logging.level", &["CADASTRO_LOGGING_LEVEL", "CADASTRO_LOG_LEVEL"]),
    ("logging.format", &["CADASTRO_LOGGING_FORMAT", "CADASTRO_LOG_FORMAT"]),
];

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://cadastro.db?mode=rwc".to_string(),
            max_connections: 5,
            timeout_secs: 30,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_address: "127.0.0.1".to_string(), port: 8081, graceful_shutdown_secs: 15 }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        })
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unsupported log format `{other}`")),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    /// Explicit file to read instead of searching `CONFIG_FILE_CANDIDATES`.
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read `{path}`: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("`{path}` is not a valid config file: {source}")]
    Toml { path: PathBuf, source: toml::de::Error },
    #[error("config file `{0}` does not exist")]
    NotFound(PathBuf),
    #[error("`${{{var}}}` is referenced in the config file but not set")]
    UndefinedVariable { var: String },
    #[error("`${{` without a closing `}}` in the config file")]
    UnclosedPlaceholder,
    #[error("`{var}` has an unusable value `{value}`")]
    BadEnvValue { var: String, value: String },
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = match resolve_config_path(options.config_path.as_deref()) {
            Some(path) => Self::from_file(&path)?,
            None if options.require_file => {
                let expected = options
                    .config_path
                    .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_CANDIDATES[0]));
                return Err(ConfigError::NotFound(expected));
            }
            None => Self::default(),
        };

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        toml::from_str(&expand_placeholders(&raw)?)
            .map_err(|source| ConfigError::Toml { path: path.to_path_buf(), source })
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        for (setting, vars) in ENV_BINDINGS {
            let found = vars.iter().find_map(|var| {
                let value = env::var(var).ok().filter(|value| !value.trim().is_empty())?;
                Some((var, value))
            });
            let Some((var, value)) = found else {
                continue;
            };
            if self.assign(setting, &value).is_none() {
                return Err(ConfigError::BadEnvValue { var: var.to_string(), value });
            }
        }
        Ok(())
    }

    /// Sets one setting from its textual form. `None` when the text does not parse.
    fn assign(&mut self, setting: &str, raw: &str) -> Option<()> {
        match setting {
            "database.url" => self.database.url = raw.to_string(),
            "database.max_connections" => self.database.max_connections = raw.parse().ok()?,
            "database.timeout_secs" => self.database.timeout_secs = raw.parse().ok()?,
            "server.bind_address" => self.server.bind_address = raw.to_string(),
            "server.port" => self.server.port = raw.parse().ok()?,
            "server.graceful_shutdown_secs" => {
                self.server.graceful_shutdown_secs = raw.parse().ok()?
            }
            "logging.level" => self.logging.level = raw.trim().to_ascii_lowercase(),
            "logging.format" => self.logging.format = raw.parse().ok()?,
            _ => return None,
        }
        Some(())
    }

    /// Current value of a setting named by its dotted path.
    pub fn setting(&self, setting: &str) -> Option<String> {
        let value = match setting {
            "database.url" => self.database.url.clone(),
            "database.max_connections" => self.database.max_connections.to_string(),
            "database.timeout_secs" => self.database.timeout_secs.to_string(),
            "server.bind_address" => self.server.bind_address.clone(),
            "server.port" => self.server.port.to_string(),
            "server.graceful_shutdown_secs" => self.server.graceful_shutdown_secs.to_string(),
            "logging.level" => self.logging.level.clone(),
            "logging.format" => self.logging.format.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Address the HTTP listener binds to, e.g. `127.0.0.1:8081`.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }

    /// Reports every problem at once rather than the first one found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        let url = self.database.url.trim();
        if !(url.starts_with("sqlite:") || url == ":memory:") {
            problems.push("database.url must be a sqlite URL".to_string());
        }
        if self.database.max_connections == 0 {
            problems.push("database.max_connections must be at least 1".to_string());
        }
        if !(1..=300).contains(&self.database.timeout_secs) {
            problems.push("database.timeout_secs must be within 1..=300".to_string());
        }
        if self.server.bind_address.trim().is_empty() {
            problems.push("server.bind_address must not be empty".to_string());
        }
        if self.server.port == 0 {
            problems.push("server.port must not be 0".to_string());
        }
        if self.server.graceful_shutdown_secs == 0 {
            problems.push("server.graceful_shutdown_secs must be at least 1".to_string());
        }
        let level = self.logging.level.trim().to_ascii_lowercase();
        if !matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
            problems.push("logging.level must be one of trace|debug|info|warn|error".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }
}

/// The config file in use: `explicit_path` if it exists, otherwise the first
/// existing candidate.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    match explicit_path {
        Some(path) => path.exists().then(|| path.to_path_buf()),
        None => CONFIG_FILE_CANDIDATES.into_iter().map(PathBuf::from).find(|path| path.exists()),
    }
}

/// Replaces `${VAR}` with the value of the environment variable `VAR`.
fn expand_placeholders(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or(ConfigError::UnclosedPlaceholder)?;
        let var = &after[..end];
        let value = env::var(var)
            .map_err(|_| ConfigError::UndefinedVariable { var: var.to_string() })?;
        output.push_str(&value);
        rest = &after[end + 1..];
    }

    output.push_str(rest);
    Ok(output)
}
