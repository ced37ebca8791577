//! Configuration for the recipe service.
//!
//! Database credentials and server settings are read once at startup into explicit structs
//! and handed to whatever needs them. Nothing reads the process environment after that.

use std::fmt;

/// Default port the HTTP server binds to.
pub const DEFAULT_PORT: u16 = 3000;
/// Default cap on request bodies (25 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 25 * 1024 * 1024;
/// Default port of the PostgreSQL server.
pub const DEFAULT_DB_PORT: u16 = 5432;
/// Default upper bound on pooled sessions.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Errors produced while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required variable was not set or was empty.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    /// A variable was set but could not be parsed.
    #[error("invalid value {value:?} for environment variable {name}")]
    Invalid {
        /// The variable name.
        name: &'static str,
        /// The offending value.
        value: String,
    },
}

/// Connection settings for the recipes database.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Database server host name.
    pub host: String,
    /// Database server port.
    pub port: u16,
    /// User to authenticate as.
    pub user: String,
    /// Password for `user`.
    pub password: String,
    /// Name of the database (schema) holding the `recetas` table.
    pub schema: String,
    /// Maximum number of sessions kept in the pool.
    pub max_connections: u32,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("schema", &self.schema)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl DatabaseConfig {
    /// Reads the configuration from the process environment.
    ///
    /// Variables: `DB_HOST` (default `localhost`), `DB_PORT` (default 5432), `DB_USER`,
    /// `DB_PASS`, `DB_SCHEMA`, `DB_MAX_CONNECTIONS` (default 10).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &'static str| lookup(name).filter(|v| !v.is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let port = match get("DB_PORT") {
            Some(value) => match value.parse() {
                Ok(port) => port,
                Err(_) => {
                    return Err(ConfigError::Invalid {
                        name: "DB_PORT",
                        value,
                    });
                }
            },
            None => DEFAULT_DB_PORT,
        };
        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(value) => match value.parse() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "DB_MAX_CONNECTIONS",
                        value,
                    });
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            host: get("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            port,
            user: require("DB_USER")?,
            // An empty password is legitimate for trust-authenticated local servers.
            password: lookup("DB_PASS").unwrap_or_default(),
            schema: require("DB_SCHEMA")?,
            max_connections,
        })
    }
}

/// Settings for the HTTP listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Largest accepted request body, in bytes.
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl ServerConfig {
    /// The `host:port` string to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
