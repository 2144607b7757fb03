//! Error types for the plugin boundary.

use crate::config::ConfigError;

/// Errors raised while collecting or reporting metrics.
///
/// The core calculation never produces these; they come from configuration,
/// the database driver, and output/persistence I/O.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {reason}")]
    Database { reason: String },

    #[error("Telemetry error: {reason}")]
    Telemetry { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PluginError {
    pub fn database(reason: impl Into<String>) -> Self {
        Self::Database {
            reason: reason.into(),
        }
    }

    pub fn telemetry(reason: impl Into<String>) -> Self {
        Self::Telemetry {
            reason: reason.into(),
        }
    }
}

impl From<mysql_async::Error> for PluginError {
    fn from(err: mysql_async::Error) -> Self {
        Self::database(err.to_string())
    }
}

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_display() {
        let err = PluginError::database("connection refused");
        assert_eq!(err.to_string(), "Database error: connection refused");
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: PluginError = ConfigError::InvalidValue {
            field: "database",
            reason: "must not be empty".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Invalid config value for database: must not be empty"
        );
    }
}
