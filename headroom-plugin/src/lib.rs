//! HEADROOM Plugin - MySQL Auto-Increment Saturation
//!
//! Monitoring-agent plugin around `headroom-core`: reads auto-increment
//! columns from `information_schema`, computes how much of each column's
//! integer range is used, and reports it in the agent's plugin format.

pub mod agent;
pub mod cache;
pub mod config;
pub mod error;
pub mod plugin;
pub mod source;
pub mod state;
pub mod telemetry;

pub use agent::{metric_key, GraphDefinition, OutputMode};
pub use cache::ColumnCache;
pub use config::{ConfigError, DbConfig, PluginConfig, DEFAULT_GRAPH_KEY};
pub use error::{PluginError, PluginResult};
pub use plugin::AutoIncrementPlugin;
pub use source::{MySqlSchemaSource, SchemaSource};
pub use telemetry::{init_tracing, TelemetryConfig};
