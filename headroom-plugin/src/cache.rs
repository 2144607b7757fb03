//! Invocation-scoped column cache
//!
//! Graph registration and metric collection both need the column list. The
//! cache keeps the first non-empty result for the lifetime of the plugin
//! value so the schema is queried once per invocation.

use headroom_core::ObservedColumn;

use crate::error::PluginResult;
use crate::source::SchemaSource;

#[derive(Debug, Default)]
pub struct ColumnCache {
    columns: Option<Vec<ObservedColumn>>,
}

impl ColumnCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&[ObservedColumn]> {
        self.columns.as_deref()
    }

    pub fn is_populated(&self) -> bool {
        self.columns.is_some()
    }

    /// Drop the memoized rows so the next read queries the source again.
    pub fn invalidate(&mut self) {
        self.columns = None;
    }

    /// Cached rows, or rows freshly read from `source`.
    ///
    /// An empty result is returned but not memoized.
    pub async fn get_or_fetch<S>(
        &mut self,
        source: &mut S,
        database: &str,
    ) -> PluginResult<&[ObservedColumn]>
    where
        S: SchemaSource + ?Sized,
    {
        if self.columns.is_none() {
            let fetched = source.auto_increment_columns(database).await?;
            if fetched.is_empty() {
                tracing::debug!(database, "No auto-increment columns found");
                return Ok(&[]);
            }
            tracing::debug!(database, columns = fetched.len(), "Caching column list");
            self.columns = Some(fetched);
        }
        Ok(self.columns.as_deref().unwrap_or(&[]))
    }
}
