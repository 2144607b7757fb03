//! HEADROOM Test Utilities
//!
//! Shared test infrastructure for the HEADROOM workspace:
//! - Proptest generators for column declarations and observed rows
//! - An in-memory schema source
//! - Fixtures for common schemas

pub use headroom_core::ObservedColumn;
pub use headroom_plugin::{PluginError, PluginResult, SchemaSource};

use async_trait::async_trait;
use proptest::prelude::*;

// ============================================================================
// IN-MEMORY SCHEMA SOURCE
// ============================================================================

/// Schema source serving a fixed list of rows.
///
/// Records every query so tests can check how often the schema was read.
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaSource {
    columns: Vec<ObservedColumn>,
    failure: Option<String>,
    queries: Vec<String>,
    closed: bool,
}

impl StaticSchemaSource {
    pub fn new(columns: Vec<ObservedColumn>) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    /// A source whose every query fails with a database error.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.len()
    }

    /// Databases queried, in order.
    pub fn queried_databases(&self) -> &[String] {
        &self.queries
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[async_trait]
impl SchemaSource for StaticSchemaSource {
    async fn auto_increment_columns(
        &mut self,
        database: &str,
    ) -> PluginResult<Vec<ObservedColumn>> {
        self.queries.push(database.to_string());
        match &self.failure {
            Some(reason) => Err(PluginError::database(reason.clone())),
            None => Ok(self.columns.clone()),
        }
    }

    async fn close(&mut self) -> PluginResult<()> {
        self.closed = true;
        Ok(())
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    use super::ObservedColumn;

    /// A schema mixing healthy, nearly full, overflowed and unsupported
    /// columns.
    pub fn mixed_schema() -> Vec<ObservedColumn> {
        vec![
            ObservedColumn::new("orders", "int(11)", 2_000_000_000),
            ObservedColumn::new("log", "tinyint(3) unsigned", 300),
            ObservedColumn::new("users", "bigint(20) unsigned", 1_024),
            ObservedColumn::new("flags", "enum('a','b')", 2),
        ]
    }

    pub fn single_table(table: &str, raw_type: &str, current_value: u64) -> Vec<ObservedColumn> {
        vec![ObservedColumn::new(table, raw_type, current_value)]
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

/// Recognized integer type names.
pub fn arb_integer_name() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("tinyint"),
        Just("smallint"),
        Just("mediumint"),
        Just("int"),
        Just("bigint"),
    ]
}

/// Declarations the interpreter evaluates. The unsigned marker only follows
/// a display width; without a `(` it would become part of the base name.
pub fn arb_integer_declaration() -> impl Strategy<Value = String> {
    (
        arb_integer_name(),
        proptest::option::of((1u32..=20, any::<bool>())),
    )
        .prop_map(|(name, width)| match width {
            Some((digits, true)) => format!("{}({}) unsigned", name, digits),
            Some((digits, false)) => format!("{}({})", name, digits),
            None => name.to_string(),
        })
}

/// Declarations of column types the interpreter does not evaluate.
pub fn arb_unsupported_declaration() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("enum('a','b')".to_string()),
        Just("varchar(255)".to_string()),
        Just("decimal(10,2) unsigned".to_string()),
        Just("(11)".to_string()),
        arb_integer_name().prop_map(|name| format!("{} unsigned", name)),
        "[A-Z]{1,8}(\\([0-9]{1,3}\\))?".prop_map(|s| s),
    ]
}

pub fn arb_table_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}"
}

/// Observed rows with supported types and any counter value.
pub fn arb_observed_column() -> impl Strategy<Value = ObservedColumn> {
    (arb_table_name(), arb_integer_declaration(), any::<u64>())
        .prop_map(|(table, raw_type, value)| ObservedColumn::new(table, raw_type, value))
}

/// Observed rows drawing from supported and unsupported types.
pub fn arb_any_observed_column() -> impl Strategy<Value = ObservedColumn> {
    prop_oneof![
        3 => arb_observed_column(),
        1 => (arb_table_name(), arb_unsupported_declaration(), any::<u64>())
            .prop_map(|(table, raw_type, value)| ObservedColumn::new(table, raw_type, value)),
    ]
}
