//! Saturation calculation
//!
//! Combines interpreted column types with observed auto-increment counters
//! to produce a per-table percentage of the type's range already consumed.

use crate::column_type::{ColumnLimit, ColumnTypeFact};
use serde::{Deserialize, Serialize};

/// One auto-increment column as reported by the schema source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedColumn {
    pub table_name: String,
    pub raw_type: String,
    pub current_value: u64,
}

impl ObservedColumn {
    pub fn new(
        table_name: impl Into<String>,
        raw_type: impl Into<String>,
        current_value: u64,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            raw_type: raw_type.into(),
            current_value,
        }
    }

    pub fn type_fact(&self) -> ColumnTypeFact {
        ColumnTypeFact::parse(&self.raw_type)
    }

    pub fn limit(&self) -> ColumnLimit {
        self.type_fact().limit()
    }
}

/// Consumed share of one column's range, in percent.
///
/// Values above 100 are kept as-is: the counter has already passed the
/// nominal maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaturationMetric {
    pub table_name: String,
    pub percentage: f64,
}

impl SaturationMetric {
    pub fn is_exhausted(&self) -> bool {
        self.percentage >= 100.0
    }
}

/// Outcome of a batch: metrics in input order plus the tables that were
/// left out because their type could not be evaluated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Saturation {
    pub metrics: Vec<SaturationMetric>,
    pub skipped: Vec<String>,
}

impl Saturation {
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// `current / maximum * 100`. `None` when the limit is the zero sentinel.
pub fn percentage(current_value: u64, limit: ColumnLimit) -> Option<f64> {
    if !limit.is_evaluable() {
        return None;
    }
    Some(current_value as f64 / limit.maximum as f64 * 100.0)
}

/// Saturation of a single column, or `None` for an unevaluable type.
pub fn saturation(column: &ObservedColumn) -> Option<SaturationMetric> {
    percentage(column.current_value, column.limit()).map(|percentage| SaturationMetric {
        table_name: column.table_name.clone(),
        percentage,
    })
}

/// Evaluate every column independently. An unevaluable column never
/// affects the others.
pub fn calculate<'a, I>(columns: I) -> Saturation
where
    I: IntoIterator<Item = &'a ObservedColumn>,
{
    let mut result = Saturation::default();
    for column in columns {
        match saturation(column) {
            Some(metric) => result.metrics.push(metric),
            None => result.skipped.push(column.table_name.clone()),
        }
    }
    result
}
