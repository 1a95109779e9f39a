//! TOML configuration: where the terminal connects, which application the
//! session manager should start, and the credentials to log on with.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, path::Path};

use crate::error::ConfigError;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimbankConfig {
    pub terminal: TerminalConfig,
    pub application: ApplicationConfig,
    pub credentials: CredentialsConfig,
    pub navigation: NavigationConfig,
}

/// Where and how the 3270 session connects
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub host: String,
    pub port: u16,
    pub tls: bool,
    /// Executable used by the s3270 backend
    pub s3270_path: String,
    /// Limit for every remote action, including waiting for the keyboard
    pub timeout_secs: u64,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 2023,
            tls: false,
            s3270_path: "s3270".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Logical application name and the literal strings the session manager
/// menu expects for it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    pub name: String,
    pub default: Option<String>,
    pub names: HashMap<String, String>,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: "BANK".to_string(),
            default: Some("BANKTEST".to_string()),
            names: HashMap::new(),
        }
    }
}

impl ApplicationConfig {
    /// Literal string to type into the session manager for `name`.
    pub fn resolve(&self) -> Result<String, ConfigError> {
        self.names
            .get(&self.name)
            .or(self.default.as_ref())
            .cloned()
            .ok_or_else(|| ConfigError::UnknownApplication(self.name.clone()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Environment variable holding the password when `password` is unset
    pub password_env: Option<String>,
}

impl CredentialsConfig {
    pub fn resolve(&self) -> Result<Credentials, ConfigError> {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Resolve using `lookup` in place of the process environment.
    pub fn resolve_with<F>(&self, lookup: F) -> Result<Credentials, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = self
            .username
            .clone()
            .ok_or_else(|| ConfigError::MissingCredential("credentials.username".to_string()))?;

        let password = match (&self.password, &self.password_env) {
            (Some(password), _) => password.clone(),
            (None, Some(var)) => lookup(var).ok_or_else(|| {
                ConfigError::MissingCredential(format!("environment variable {var}"))
            })?,
            (None, None) => {
                return Err(ConfigError::MissingCredential(
                    "credentials.password or credentials.password_env".to_string(),
                ))
            }
        };

        Ok(Credentials::new(username, password))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Reconnects allowed in a row, without a recognised screen in between,
    /// before giving up
    pub max_recoveries: u32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            max_recoveries: crate::navigation::DEFAULT_MAX_RECOVERIES,
        }
    }
}

/// Username/password pair used on the logon screen.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

impl SimbankConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }
}
