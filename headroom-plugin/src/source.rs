//! Schema source
//!
//! Where `ObservedColumn` rows come from. The trait is the seam between the
//! pure calculation and the database; `MySqlSchemaSource` is the production
//! implementation.

use async_trait::async_trait;
use headroom_core::ObservedColumn;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Opts};
use std::time::Duration;

use crate::config::DbConfig;
use crate::error::{PluginError, PluginResult};

/// Supplies the auto-increment columns of one schema.
#[async_trait]
pub trait SchemaSource: Send {
    /// Auto-increment columns of `database`, one row per table.
    async fn auto_increment_columns(&mut self, database: &str)
        -> PluginResult<Vec<ObservedColumn>>;

    /// Release any held connection. Safe to call more than once.
    async fn close(&mut self) -> PluginResult<()> {
        Ok(())
    }
}

/// Tables carrying an auto-increment column, with the column's declared
/// type and the table's next counter value.
const AUTO_INCREMENT_QUERY: &str = r"
SELECT DISTINCT
    t.TABLE_NAME,
    c.COLUMN_TYPE,
    t.AUTO_INCREMENT
FROM information_schema.TABLES AS t
INNER JOIN information_schema.COLUMNS AS c
    ON c.TABLE_NAME = t.TABLE_NAME
   AND c.TABLE_SCHEMA = t.TABLE_SCHEMA
WHERE t.TABLE_SCHEMA = ?
  AND c.EXTRA = 'auto_increment'
ORDER BY t.TABLE_NAME";

type AutoIncrementRow = (String, String, Option<u64>);

/// MySQL-backed schema source.
///
/// Holds at most one connection, opened on first use and reused until
/// [`SchemaSource::close`].
pub struct MySqlSchemaSource {
    opts: Opts,
    endpoint: String,
    connect_timeout: Duration,
    conn: Option<Conn>,
}

impl MySqlSchemaSource {
    pub fn new(config: &DbConfig) -> Self {
        Self {
            opts: config.to_opts(),
            endpoint: config.endpoint(),
            connect_timeout: config.connect_timeout,
            conn: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    async fn connection(&mut self) -> PluginResult<&mut Conn> {
        if self.conn.is_none() {
            tracing::debug!(endpoint = %self.endpoint, "Connecting to MySQL");
            let conn = tokio::time::timeout(self.connect_timeout, Conn::new(self.opts.clone()))
                .await
                .map_err(|_| {
                    PluginError::database(format!(
                        "connection to {} timed out after {}s",
                        self.endpoint,
                        self.connect_timeout.as_secs()
                    ))
                })??;
            self.conn = Some(conn);
        }
        self.conn
            .as_mut()
            .ok_or_else(|| PluginError::database("connection unavailable"))
    }
}

#[async_trait]
impl SchemaSource for MySqlSchemaSource {
    async fn auto_increment_columns(
        &mut self,
        database: &str,
    ) -> PluginResult<Vec<ObservedColumn>> {
        let conn = self.connection().await?;
        let rows: Vec<AutoIncrementRow> = conn.exec(AUTO_INCREMENT_QUERY, (database,)).await?;
        tracing::debug!(database, rows = rows.len(), "Fetched auto-increment columns");
        Ok(into_observed(rows))
    }

    async fn close(&mut self) -> PluginResult<()> {
        if let Some(conn) = self.conn.take() {
            conn.disconnect().await?;
            tracing::debug!(endpoint = %self.endpoint, "Disconnected from MySQL");
        }
        Ok(())
    }
}

/// Rows without a counter (`AUTO_INCREMENT IS NULL`) cannot be evaluated
/// and are dropped here.
fn into_observed(rows: Vec<AutoIncrementRow>) -> Vec<ObservedColumn> {
    rows.into_iter()
        .filter_map(|(table_name, raw_type, counter)| match counter {
            Some(current_value) => Some(ObservedColumn {
                table_name,
                raw_type,
                current_value,
            }),
            None => {
                tracing::debug!(table = %table_name, "Skipping table without AUTO_INCREMENT value");
                None
            }
        })
        .collect()
}
