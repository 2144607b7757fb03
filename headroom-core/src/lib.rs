//! HEADROOM Core - Auto-Increment Saturation
//!
//! Pure interpretation of integer column declarations and the saturation
//! math built on top of it. No I/O; everything here is a function of its
//! inputs.

pub mod column_type;
pub mod saturation;

pub use column_type::{
    base_type_name, is_unsigned, max_value, BaseType, ColumnLimit, ColumnTypeFact,
    MAX_BYTE_WIDTH, UNSIGNED_MARKER,
};
pub use saturation::{
    calculate, percentage, saturation, ObservedColumn, Saturation, SaturationMetric,
};
