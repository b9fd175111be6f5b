//! Connection settings shared by the introspection adapters.
//!
//! Only non-secret parameters live here. Passwords stay inside the
//! connection string handed to the driver and never reach this struct, its
//! `Display` output, or the logs.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::SchemaScanError;

/// Upper bound on pooled connections for a metadata scan.
pub const MAX_POOL_CONNECTIONS: u32 = 100;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Pool and session parameters for one adapter.
///
/// # Example
/// ```rust
/// use schemascan_core::adapters::ConnectionConfig;
/// use std::time::Duration;
///
/// let config = ConnectionConfig::new("db.internal")
///     .with_port(5432)
///     .with_database("shop")
///     .with_query_timeout(Duration::from_secs(10));
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.to_string(), "ConnectionConfig(db.internal:5432/shop)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Server host; `localhost` for SQLite
    pub host: String,
    /// Server port; `None` for SQLite
    pub port: Option<u16>,
    /// Database name, or the file name for SQLite
    pub database: Option<String>,
    /// Role name; the password is never stored
    pub username: Option<String>,
    /// How long to wait for a pooled connection
    pub connect_timeout: Duration,
    /// Per-statement limit applied to catalog queries
    pub query_timeout: Duration,
    /// Pool size, 1..=[`MAX_POOL_CONNECTIONS`]
    pub max_connections: u32,
    /// Open sessions read-only; schema scans never write
    pub read_only: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::new("localhost")
    }
}

impl std::fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConnectionConfig({})", self.endpoint())
    }
}

impl ConnectionConfig {
    /// Creates a read-only config for `host` with default timeouts.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            database: None,
            username: None,
            connect_timeout: DEFAULT_TIMEOUT,
            query_timeout: DEFAULT_TIMEOUT,
            max_connections: 4,
            read_only: true,
        }
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the database name.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Sets the role name.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets how long to wait for a pooled connection.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the per-statement limit.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Sets the pool size.
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// `host[:port][/database]`, without the username.
    pub fn endpoint(&self) -> String {
        let mut endpoint = self.host.clone();
        if let Some(port) = self.port {
            endpoint.push_str(&format!(":{}", port));
        }
        if let Some(database) = &self.database {
            endpoint.push('/');
            endpoint.push_str(database);
        }
        endpoint
    }

    /// Checks that the pool can be built from these settings.
    ///
    /// # Errors
    /// Returns a configuration error naming the first invalid setting
    pub fn validate(&self) -> crate::Result<()> {
        let problem = if self.host.trim().is_empty() {
            Some("host cannot be empty".to_string())
        } else if self.port == Some(0) {
            Some("port must be greater than 0".to_string())
        } else if !(1..=MAX_POOL_CONNECTIONS).contains(&self.max_connections) {
            Some(format!(
                "max_connections must be between 1 and {}",
                MAX_POOL_CONNECTIONS
            ))
        } else if self.connect_timeout.is_zero() {
            Some("connect_timeout must be greater than 0".to_string())
        } else if self.query_timeout.is_zero() {
            Some("query_timeout must be greater than 0".to_string())
        } else {
            None
        };

        match problem {
            Some(message) => Err(SchemaScanError::configuration(message)),
            None => Ok(()),
        }
    }
}
