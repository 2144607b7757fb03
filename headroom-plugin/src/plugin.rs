//! Auto-increment saturation plugin
//!
//! Ties the schema source, the invocation cache and the core calculation
//! to the agent protocol.

use chrono::Utc;
use headroom_core::{calculate, Saturation};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use crate::agent::{
    metric_key, wildcard_graph_key, write_definition, write_values, Graph, GraphDefinition,
    GraphMetric, OutputMode, PERCENTAGE_UNIT,
};
use crate::cache::ColumnCache;
use crate::config::PluginConfig;
use crate::error::PluginResult;
use crate::source::SchemaSource;
use crate::state::{self, LastValues};

pub struct AutoIncrementPlugin<S> {
    source: S,
    cache: ColumnCache,
    database: String,
    prefix: String,
    graph_key: String,
}

impl<S: SchemaSource> AutoIncrementPlugin<S> {
    pub fn new(source: S, config: &PluginConfig) -> Self {
        Self::with_names(source, &config.database, &config.prefix, &config.graph_key)
    }

    pub fn with_names(
        source: S,
        database: impl Into<String>,
        prefix: impl Into<String>,
        graph_key: impl Into<String>,
    ) -> Self {
        Self {
            source,
            cache: ColumnCache::new(),
            database: database.into(),
            prefix: prefix.into(),
            graph_key: graph_key.into(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &ColumnCache {
        &self.cache
    }

    async fn saturation(&mut self) -> PluginResult<Saturation> {
        let columns = self
            .cache
            .get_or_fetch(&mut self.source, &self.database)
            .await?;
        let result = calculate(columns);
        for table in &result.skipped {
            tracing::debug!(
                database = %self.database,
                table = %table,
                "Skipping column with unrecognized integer type"
            );
        }
        Ok(result)
    }

    /// One wildcard graph whose metrics are the evaluable tables.
    pub async fn graph_definition(&mut self) -> PluginResult<GraphDefinition> {
        let saturation = self.saturation().await?;
        let metrics = saturation
            .metrics
            .iter()
            .map(|metric| GraphMetric::gauge(metric.table_name.as_str()))
            .collect();

        let mut definition = GraphDefinition::default();
        definition.insert(
            wildcard_graph_key(&self.graph_key),
            Graph {
                label: format!("{} autoincrement activity", self.prefix),
                unit: PERCENTAGE_UNIT.to_string(),
                metrics,
            },
        );
        Ok(definition)
    }

    /// Metric key to saturation percentage, one entry per evaluable table.
    pub async fn fetch_metrics(&mut self) -> PluginResult<BTreeMap<String, f64>> {
        let saturation = self.saturation().await?;
        let mut values = BTreeMap::new();
        for metric in saturation.metrics {
            if metric.is_exhausted() {
                tracing::info!(
                    database = %self.database,
                    table = %metric.table_name,
                    percentage = metric.percentage,
                    "Auto-increment range exhausted"
                );
            }
            values.insert(
                metric_key(&self.graph_key, &self.database, &metric.table_name),
                metric.percentage,
            );
        }
        Ok(values)
    }

    /// Answer the agent once, stamping values with the current time.
    pub async fn run<W: Write>(
        &mut self,
        mode: OutputMode,
        out: &mut W,
        tempfile: Option<&Path>,
    ) -> PluginResult<()> {
        self.emit(mode, out, tempfile, Utc::now().timestamp()).await
    }

    /// Answer the agent once. In value mode the emitted values are also
    /// written to `tempfile` when one is given.
    pub async fn emit<W: Write>(
        &mut self,
        mode: OutputMode,
        out: &mut W,
        tempfile: Option<&Path>,
        epoch: i64,
    ) -> PluginResult<()> {
        match mode {
            OutputMode::Definition => {
                let definition = self.graph_definition().await?;
                write_definition(out, &definition)?;
            }
            OutputMode::Values => {
                let values = self.fetch_metrics().await?;
                let written = write_values(out, &values, epoch)?;
                tracing::debug!(database = %self.database, written, "Emitted metrics");
                if let Some(path) = tempfile {
                    state::save(
                        path,
                        &LastValues {
                            timestamp: epoch,
                            values,
                        },
                    )?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }

    pub async fn close(mut self) -> PluginResult<()> {
        self.source.close().await
    }
}
