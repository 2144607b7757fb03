//! Plugin configuration
//!
//! Every option is a command-line flag that can also be supplied through a
//! `HEADROOM_*` environment variable. Flag names follow the ones the
//! monitoring agent's plugin configuration already uses (`--host`,
//! `--username`, `--tempfile`, ...).

use clap::Parser;
use mysql_async::{Opts, OptsBuilder};
use std::path::PathBuf;
use std::time::Duration;

/// Metric namespace registered with the agent.
pub const DEFAULT_GRAPH_KEY: &str = "mysql.autoincrement.activity";

#[derive(Debug, Clone, Parser)]
#[command(
    name = "mackerel-plugin-mysql-autoincrement",
    version,
    about = "Report how close MySQL auto-increment columns are to their type limit"
)]
pub struct PluginConfig {
    /// Database hostname
    #[arg(long, env = "HEADROOM_DB_HOST", default_value = "localhost")]
    pub host: String,

    /// Database port
    #[arg(long, env = "HEADROOM_DB_PORT", default_value_t = 3306)]
    pub port: u16,

    /// Unix socket path; takes precedence over host and port
    #[arg(long, env = "HEADROOM_DB_SOCKET")]
    pub socket: Option<String>,

    /// Database user
    #[arg(long, env = "HEADROOM_DB_USER", default_value = "root")]
    pub username: String,

    /// Database password
    #[arg(
        long,
        env = "HEADROOM_DB_PASSWORD",
        default_value = "",
        hide_env_values = true
    )]
    pub password: String,

    /// Schema whose auto-increment columns are inspected
    #[arg(long, env = "HEADROOM_DB_NAME")]
    pub database: String,

    /// Label prefix for the graph definition
    #[arg(long, env = "HEADROOM_PREFIX", default_value = "mysql")]
    pub prefix: String,

    /// File receiving the last reported values
    #[arg(long, env = "HEADROOM_TEMPFILE")]
    pub tempfile: Option<PathBuf>,

    /// Metric namespace
    #[arg(long, env = "HEADROOM_GRAPH_KEY", default_value = DEFAULT_GRAPH_KEY)]
    pub graph_key: String,

    /// Seconds to wait for the database connection
    #[arg(long, env = "HEADROOM_CONNECT_TIMEOUT_SECS", default_value_t = 10)]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl PluginConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database",
                reason: "must not be empty".to_string(),
            });
        }
        if self.socket().is_none() && self.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "port",
                reason: "must be > 0".to_string(),
            });
        }
        if self.graph_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "graph_key",
                reason: "must not be empty".to_string(),
            });
        }
        if self.graph_key.contains('#') {
            return Err(ConfigError::InvalidValue {
                field: "graph_key",
                reason: "must not contain the '#' wildcard".to_string(),
            });
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "connect_timeout_secs",
                reason: "must be > 0".to_string(),
            });
        }
        Ok(())
    }

    fn socket(&self) -> Option<&str> {
        self.socket.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            host: self.host.clone(),
            port: self.port,
            socket: self.socket().map(str::to_string),
            user: self.username.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}

// ============================================================================
// DATABASE CONNECTION SETTINGS
// ============================================================================

/// Connection settings for the schema source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub socket: Option<String>,
    pub user: String,
    pub password: String,
    pub database: String,
    pub connect_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            socket: None,
            user: "root".to_string(),
            password: "".to_string(),
            database: "".to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl DbConfig {
    /// Human-readable target, never including credentials.
    pub fn endpoint(&self) -> String {
        match &self.socket {
            Some(socket) => socket.clone(),
            None => format!("{}:{}", self.host, self.port),
        }
    }

    pub fn to_opts(&self) -> Opts {
        let password = if self.password.is_empty() {
            None
        } else {
            Some(self.password.clone())
        };
        let builder = OptsBuilder::default()
            .user(Some(self.user.clone()))
            .pass(password)
            .db_name(Some(self.database.clone()));
        let builder = match &self.socket {
            Some(socket) => builder.socket(Some(socket.clone())),
            None => builder.ip_or_hostname(self.host.clone()).tcp_port(self.port),
        };
        Opts::from(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> PluginConfig {
        let mut argv = vec!["mackerel-plugin-mysql-autoincrement"];
        argv.extend_from_slice(args);
        PluginConfig::try_parse_from(argv).expect("arguments should parse")
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["--database", "shop"]);
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 3306);
        assert_eq!(config.username, "root");
        assert_eq!(config.prefix, "mysql");
        assert_eq!(config.graph_key, DEFAULT_GRAPH_KEY);
        assert!(config.tempfile.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_is_required() {
        let result = PluginConfig::try_parse_from(["mackerel-plugin-mysql-autoincrement"]);
        if std::env::var_os("HEADROOM_DB_NAME").is_none() {
            assert!(result.is_err());
        }
    }

    #[test]
    fn test_blank_database_rejected() {
        let config = parse(&["--database", "  "]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "database", .. })
        ));
    }

    #[test]
    fn test_wildcard_graph_key_rejected() {
        let config = parse(&["--database", "shop", "--graph-key", "mysql.#"]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "graph_key", .. })
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = parse(&["--database", "shop", "--connect-timeout-secs", "0"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_port_zero_allowed_with_socket() {
        let config = parse(&[
            "--database",
            "shop",
            "--port",
            "0",
            "--socket",
            "/var/run/mysqld/mysqld.sock",
        ]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_socket_overrides_endpoint() {
        let config = parse(&["--database", "shop", "--socket", "/tmp/mysql.sock"]);
        let db = config.db_config();
        assert_eq!(db.socket.as_deref(), Some("/tmp/mysql.sock"));
        assert_eq!(db.endpoint(), "/tmp/mysql.sock");
    }

    #[test]
    fn test_blank_socket_is_ignored() {
        let config = parse(&["--database", "shop", "--socket", ""]);
        let db = config.db_config();
        assert_eq!(db.socket, None);
        assert_eq!(db.endpoint(), "localhost:3306");
    }

    #[test]
    fn test_db_config_carries_timeout() {
        let config = parse(&["--database", "shop", "--connect-timeout-secs", "3"]);
        assert_eq!(config.db_config().connect_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_opts_use_tcp_target() {
        let db = DbConfig {
            host: "db.internal".to_string(),
            port: 3307,
            database: "shop".to_string(),
            ..DbConfig::default()
        };
        let opts = db.to_opts();
        assert_eq!(opts.ip_or_hostname(), "db.internal");
        assert_eq!(opts.tcp_port(), 3307);
        assert_eq!(opts.db_name(), Some("shop"));
        assert_eq!(opts.pass(), None);
    }
}
