use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Config file read when no explicit path is given (optional).
pub const DEFAULT_CONFIG_FILE: &str = "agri.toml";

/// Prefix for environment overrides, e.g. `AGRI_SERVER__BIND_ADDR`.
pub const ENV_PREFIX: &str = "AGRI";

/// Database environment variables, in the order they are reported.
pub const DB_ENV_VARS: [&str; 5] = [
    "DB_HOST",
    "DB_PORT",
    "DB_DATABASE",
    "DB_USERNAME",
    "DB_PASSWORD",
];

pub const DEFAULT_CONNECTION_STRING: &str =
    "postgres://${DB_USERNAME}:${DB_PASSWORD}@${DB_HOST}:${DB_PORT}/${DB_DATABASE}";

pub const DEFAULT_JOKE_BASE_URL: &str = "https://api.chucknorris.io";

/// Simulated network latency before each joke request.
pub const DEFAULT_JOKE_DELAY_MS: u64 = 2000;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a single-line message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Application configuration, built once at startup and passed by reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub forecast_api: ForecastApiConfig,
    pub jokes: JokeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the forecast API listens on
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL template. `${DB_*}` placeholders are filled from the
    /// environment at startup.
    pub connection_string: String,

    pub max_connections: u32,

    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connection_string: DEFAULT_CONNECTION_STRING.to_string(),
            max_connections: 5,
            acquire_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastApiConfig {
    /// Root of the forecast API, e.g. `http://localhost:8080/api`
    pub base_url: Option<String>,

    /// Skip TLS certificate validation (DEVELOPMENT ONLY)
    ///
    /// WARNING: This is a security risk. Only enable for local development
    /// with self-signed certificates. Never enable in production.
    ///
    /// This setting only takes effect in debug builds.
    pub insecure_skip_tls_verify: bool,

    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JokeConfig {
    pub base_url: String,

    /// Artificial delay before each request, in milliseconds
    pub delay_ms: u64,
}

impl Default for JokeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_JOKE_BASE_URL.to_string(),
            delay_ms: DEFAULT_JOKE_DELAY_MS,
        }
    }
}

impl JokeConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Config {
    /// Load configuration from defaults, an optional TOML file and `AGRI_*`
    /// environment variables (later sources win).
    ///
    /// With `path == None` the file `agri.toml` in the working directory is
    /// read if it exists. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Same as [`Config::load`], but reads overrides from `env` instead of the
    /// process environment when given.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => ::config::File::from(p).required(true),
            None => ::config::File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };

        let settings = ::config::Config::builder()
            .add_source(file)
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        tracing::debug!("Configuration loaded");
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; errors fail the load.
    pub fn load_validated(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(config)
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.server.bind_addr.parse::<SocketAddr>().is_err() {
            result.add_error(
                "server.bind_addr",
                format!("Not a socket address: {}", self.server.bind_addr),
            );
        }

        if self.database.connection_string.trim().is_empty() {
            result.add_error("database.connection_string", "Connection string is empty");
        }
        if self.database.max_connections == 0 {
            result.add_error(
                "database.max_connections",
                "Pool size must be greater than 0",
            );
        }
        if self.database.acquire_timeout_secs == 0 {
            result.add_error(
                "database.acquire_timeout_secs",
                "Acquire timeout must be greater than 0",
            );
        }

        match &self.forecast_api.base_url {
            Some(url) => validate_url(url, "forecast_api.base_url", &mut result),
            None => result.add_warning(
                "forecast_api.base_url",
                "Not set - the forecast API client is unavailable",
            ),
        }
        if self.forecast_api.insecure_skip_tls_verify {
            result.add_warning(
                "forecast_api.insecure_skip_tls_verify",
                "TLS certificate validation is disabled for the forecast API client",
            );
        }

        validate_url(&self.jokes.base_url, "jokes.base_url", &mut result);
        if self.jokes.delay_ms > 60_000 {
            result.add_warning("jokes.delay_ms", "Joke delay is more than a minute");
        }

        result
    }
}

/// Validate an http(s) URL field
fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }
            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}

/// Database coordinates read from `DB_*` environment variables.
#[derive(Clone)]
pub struct DbEnv {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    password: String,
}

impl DbEnv {
    /// Read all `DB_*` variables from the process environment.
    ///
    /// Fails if any of them is unset or empty, naming every missing one.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut found = Vec::with_capacity(DB_ENV_VARS.len());
        let mut missing = Vec::new();

        for key in DB_ENV_VARS {
            match lookup(key).filter(|v| !v.trim().is_empty()) {
                Some(value) => found.push(value),
                None => missing.push(key.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(ConfigError::MissingEnvVars(missing));
        }

        let [host, port, database, username, password]: [String; 5] = found
            .try_into()
            .map_err(|_| ConfigError::Invalid("unexpected database variable count".into()))?;

        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::Invalid(format!("DB_PORT is not a port number: {}", port)))?;

        Ok(Self {
            host,
            port,
            database,
            username,
            password,
        })
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// `host:port/database`, safe to log.
    pub fn target(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.database)
    }
}

impl fmt::Debug for DbEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbEnv")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

/// Resolved database settings, ready to open a pool.
#[derive(Clone)]
pub struct DatabaseSettings {
    connection_string: String,
    target: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseSettings {
    /// Fill the connection string template from `env`.
    ///
    /// Database name, username and password are percent-encoded since the
    /// template is a URL.
    pub fn resolve(config: &DatabaseConfig, env: &DbEnv) -> Result<Self, ConfigError> {
        let template = config.connection_string.trim();
        if template.is_empty() {
            return Err(ConfigError::MissingSetting(
                "database.connection_string".into(),
            ));
        }

        let port = env.port.to_string();
        let connection_string = template
            .replace("${DB_HOST}", &env.host)
            .replace("${DB_PORT}", &port)
            .replace("${DB_DATABASE}", &urlencoding::encode(&env.database))
            .replace("${DB_USERNAME}", &urlencoding::encode(&env.username))
            .replace("${DB_PASSWORD}", &urlencoding::encode(env.password()));

        if let Some(start) = connection_string.find("${") {
            let placeholder: String = connection_string[start..]
                .chars()
                .take_while(|c| *c != '}')
                .chain(std::iter::once('}'))
                .collect();
            return Err(ConfigError::Invalid(format!(
                "Unknown placeholder in database.connection_string: {}",
                placeholder
            )));
        }

        Ok(Self {
            connection_string,
            target: env.target(),
            max_connections: config.max_connections,
            acquire_timeout: Duration::from_secs(config.acquire_timeout_secs),
        })
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// `host:port/database`, safe to log.
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("target", &self.target)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish_non_exhaustive()
    }
}
