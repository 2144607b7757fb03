//! Monitoring-agent plugin protocol
//!
//! The agent runs the plugin in one of two modes. With
//! `MACKEREL_AGENT_PLUGIN_META` set it expects a graph definition (a header
//! line followed by JSON); otherwise it expects one tab-separated
//! `key value epoch` line per metric on stdout.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;

use crate::error::PluginResult;

/// Environment variable the agent sets when it wants graph definitions.
pub const META_ENV: &str = "MACKEREL_AGENT_PLUGIN_META";

/// First line of a graph-definition response.
pub const META_HEADER: &str = "# mackerel-agent-plugin";

/// Unit reported for every saturation graph.
pub const PERCENTAGE_UNIT: &str = "percentage";

/// What the agent asked for on this invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Definition,
    Values,
}

impl OutputMode {
    pub fn from_env() -> Self {
        Self::from_meta_var(std::env::var(META_ENV).ok().as_deref())
    }

    /// Any non-empty value selects definition mode.
    pub fn from_meta_var(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Self::Definition,
            _ => Self::Values,
        }
    }
}

// ============================================================================
// GRAPH DEFINITION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetric {
    pub name: String,
    pub label: String,
    /// Whether the agent should report deltas. Not part of the JSON sent to
    /// the agent.
    #[serde(skip)]
    pub diff: bool,
    pub stacked: bool,
}

impl GraphMetric {
    pub fn gauge(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            diff: false,
            stacked: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub label: String,
    pub unit: String,
    pub metrics: Vec<GraphMetric>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDefinition {
    pub graphs: BTreeMap<String, Graph>,
}

impl GraphDefinition {
    pub fn insert(&mut self, key: impl Into<String>, graph: Graph) {
        self.graphs.insert(key.into(), graph);
    }
}

/// Graph key with the wildcard segment standing in for the database name.
pub fn wildcard_graph_key(graph_key: &str) -> String {
    format!("{}.#", graph_key)
}

/// Full metric name: `{graph_key}.{database}.{table}`.
pub fn metric_key(graph_key: &str, database: &str, table: &str) -> String {
    format!("{}.{}.{}", graph_key, database, table)
}

// ============================================================================
// OUTPUT
// ============================================================================

pub fn write_definition<W: Write>(out: &mut W, definition: &GraphDefinition) -> PluginResult<()> {
    writeln!(out, "{}", META_HEADER)?;
    serde_json::to_writer(&mut *out, definition)?;
    writeln!(out)?;
    Ok(())
}

/// Write one line per finite value. Returns the number of lines written.
pub fn write_values<W: Write>(
    out: &mut W,
    values: &BTreeMap<String, f64>,
    epoch: i64,
) -> PluginResult<usize> {
    let mut written = 0;
    for (key, value) in values {
        if !value.is_finite() {
            tracing::warn!(metric = %key, value, "Dropping non-finite metric value");
            continue;
        }
        writeln!(out, "{}\t{:.6}\t{}", key, value, epoch)?;
        written += 1;
    }
    Ok(written)
}
