//! Column type interpretation
//!
//! Turns a type declaration as reported by the schema source
//! (`bigint(20) unsigned`, `int(11)`, `tinyint`) into the facts needed to
//! bound an auto-increment counter: base type, byte width, signedness and
//! the largest representable value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker the schema source appends to unsigned integer declarations.
pub const UNSIGNED_MARKER: &str = "unsigned";

/// Widest integer type the interpreter knows about, in bytes.
pub const MAX_BYTE_WIDTH: u8 = 8;

// ============================================================================
// BASE TYPE
// ============================================================================

/// Integer family of a column declaration.
///
/// The set is open: anything the interpreter does not recognize is kept as
/// `Unknown` with its original spelling, and has a byte width of 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseType {
    TinyInt,
    SmallInt,
    MediumInt,
    Int,
    BigInt,
    Unknown(String),
}

impl BaseType {
    /// Map a bare type name to its base type. Matching is exact.
    pub fn from_name(name: &str) -> Self {
        match name {
            "tinyint" => Self::TinyInt,
            "smallint" => Self::SmallInt,
            "mediumint" => Self::MediumInt,
            "int" => Self::Int,
            "bigint" => Self::BigInt,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Storage size in bytes. 0 for unknown types.
    pub fn byte_width(&self) -> u8 {
        match self {
            Self::BigInt => 8,
            Self::Int => 4,
            Self::MediumInt => 3,
            Self::SmallInt => 2,
            Self::TinyInt => 1,
            Self::Unknown(_) => 0,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::TinyInt => "tinyint",
            Self::SmallInt => "smallint",
            Self::MediumInt => "mediumint",
            Self::Int => "int",
            Self::BigInt => "bigint",
            Self::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// RAW DECLARATION PARSING
// ============================================================================

/// Leading part of a declaration up to the first `(`, or the whole string.
///
/// `"bigint(20) unsigned"` yields `"bigint"`, `"int"` yields `"int"`, and
/// `"(11)"` yields an empty name.
pub fn base_type_name(raw: &str) -> &str {
    match raw.split_once('(') {
        Some((name, _)) => name,
        None => raw,
    }
}

/// Whether the declaration carries the unsigned marker anywhere.
/// Case-sensitive.
pub fn is_unsigned(raw: &str) -> bool {
    raw.contains(UNSIGNED_MARKER)
}

/// Largest value a column of `byte_width` bytes can hold.
///
/// Returns 0 for a width of 0, which callers must treat as "cannot
/// evaluate". Computed in `u128` so the 8-byte unsigned maximum is exact.
///
/// # Panics
///
/// Panics when `byte_width` exceeds [`MAX_BYTE_WIDTH`]. Widths only come
/// from [`BaseType::byte_width`], so a wider value is a logic error.
pub fn max_value(byte_width: u8, unsigned: bool) -> u128 {
    if byte_width == 0 {
        return 0;
    }
    assert!(
        byte_width <= MAX_BYTE_WIDTH,
        "byte width {} exceeds the widest integer type ({} bytes)",
        byte_width,
        MAX_BYTE_WIDTH
    );

    let bits = u32::from(byte_width) * 8;
    let mut max: u128 = 1 << (bits - 1);
    if unsigned {
        max *= 2;
    }
    max - 1
}

// ============================================================================
// TYPE FACTS
// ============================================================================

/// Structured facts about one column's declared integer type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTypeFact {
    pub base_type: BaseType,
    pub byte_width: u8,
    pub is_unsigned: bool,
}

impl ColumnTypeFact {
    /// Interpret a raw declaration. Never fails; unrecognized input becomes
    /// an `Unknown` base type with byte width 0.
    pub fn parse(raw: &str) -> Self {
        let base_type = BaseType::from_name(base_type_name(raw));
        let byte_width = base_type.byte_width();
        Self {
            base_type,
            byte_width,
            is_unsigned: is_unsigned(raw),
        }
    }

    pub fn limit(&self) -> ColumnLimit {
        ColumnLimit {
            maximum: max_value(self.byte_width, self.is_unsigned),
        }
    }
}

/// Upper bound of a column's integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnLimit {
    pub maximum: u128,
}

impl ColumnLimit {
    /// A zero maximum means the column type was not recognized.
    pub fn is_evaluable(&self) -> bool {
        self.maximum > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_byte_width_table() {
        let cases = [
            ("bigint", 8),
            ("int", 4),
            ("mediumint", 3),
            ("smallint", 2),
            ("tinyint", 1),
        ];
        for (name, width) in cases {
            assert_eq!(BaseType::from_name(name).byte_width(), width, "{name}");
        }
    }

    #[test]
    fn test_unrecognized_names_have_zero_width() {
        for name in ["", "enum", "decimal", "BIGINT", "integer", "int "] {
            let base = BaseType::from_name(name);
            assert!(!base.is_known());
            assert_eq!(base.byte_width(), 0, "{name:?}");
        }
    }

    #[test]
    fn test_max_value_known_widths() {
        let cases: [(u8, bool, u128); 10] = [
            (1, false, 127),
            (1, true, 255),
            (2, false, 32_767),
            (2, true, 65_535),
            (3, false, 8_388_607),
            (3, true, 16_777_215),
            (4, false, 2_147_483_647),
            (4, true, 4_294_967_295),
            (8, false, 9_223_372_036_854_775_807),
            (8, true, 18_446_744_073_709_551_615),
        ];
        for (width, unsigned, expected) in cases {
            assert_eq!(max_value(width, unsigned), expected, "({width}, {unsigned})");
        }
    }

    #[test]
    fn test_max_value_bigint_unsigned_matches_u64() {
        assert_eq!(max_value(8, true), u128::from(u64::MAX));
        assert_eq!(max_value(8, false), i64::MAX as u128);
    }

    #[test]
    fn test_max_value_zero_width_is_sentinel() {
        assert_eq!(max_value(0, false), 0);
        assert_eq!(max_value(0, true), 0);
    }

    #[test]
    #[should_panic(expected = "exceeds the widest integer type")]
    fn test_max_value_panics_above_eight_bytes() {
        max_value(9, false);
    }

    #[test]
    fn test_base_type_name_extraction() {
        assert_eq!(base_type_name("bigint(20) unsigned"), "bigint");
        assert_eq!(base_type_name("bigint(20)"), "bigint");
        assert_eq!(base_type_name("int(11)"), "int");
        assert_eq!(base_type_name("mediumint(8)"), "mediumint");
        assert_eq!(base_type_name("smallint(5)"), "smallint");
        assert_eq!(base_type_name("tinyint(3)"), "tinyint");
        assert_eq!(base_type_name("int"), "int");
        assert_eq!(base_type_name("(11)"), "");
        assert_eq!(base_type_name(""), "");
    }

    #[test]
    fn test_unsigned_detection() {
        assert!(is_unsigned("bigint(20) unsigned"));
        assert!(is_unsigned("int(11) unsigned"));
        assert!(is_unsigned("smallint(5) unsigned"));
        assert!(is_unsigned("int unsigned zerofill"));
        assert!(!is_unsigned("bigint(20)"));
        assert!(!is_unsigned("mediumint(8)"));
        assert!(!is_unsigned("int"));
        assert!(!is_unsigned("int(10) UNSIGNED"));
    }

    #[test]
    fn test_parse_full_declaration() {
        let fact = ColumnTypeFact::parse("bigint(20) unsigned");
        assert_eq!(fact.base_type, BaseType::BigInt);
        assert_eq!(fact.byte_width, 8);
        assert!(fact.is_unsigned);
        assert_eq!(fact.limit().maximum, u128::from(u64::MAX));
    }

    #[test]
    fn test_parse_unknown_type_is_not_evaluable() {
        let fact = ColumnTypeFact::parse("enum('a','b')");
        assert_eq!(fact.base_type, BaseType::Unknown("enum".to_string()));
        assert_eq!(fact.byte_width, 0);
        assert!(!fact.limit().is_evaluable());
    }

    #[test]
    fn test_unsigned_without_display_width_is_unknown() {
        let fact = ColumnTypeFact::parse("int unsigned");
        assert_eq!(fact.base_type, BaseType::Unknown("int unsigned".to_string()));
        assert_eq!(fact.byte_width, 0);
        assert!(fact.is_unsigned);
        assert_ne!(fact, ColumnTypeFact::parse("int(5) unsigned"));
    }

    #[test]
    fn test_display_uses_declared_spelling() {
        assert_eq!(BaseType::MediumInt.to_string(), "mediumint");
        assert_eq!(BaseType::Unknown("serial".into()).to_string(), "serial");
    }

    fn known_name() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("tinyint"),
            Just("smallint"),
            Just("mediumint"),
            Just("int"),
            Just("bigint"),
        ]
    }

    proptest! {
        /// Any string parses without panicking and keeps width in range.
        #[test]
        fn prop_parse_never_panics(raw in ".*") {
            let fact = ColumnTypeFact::parse(&raw);
            prop_assert!(matches!(fact.byte_width, 0 | 1 | 2 | 3 | 4 | 8));
            prop_assert_eq!(fact.byte_width, fact.base_type.byte_width());
            let _ = fact.limit();
        }

        /// The display width does not change a signed declaration.
        #[test]
        fn prop_display_width_is_ignored(name in known_name(), digits in 1u32..=255) {
            let with_digits = ColumnTypeFact::parse(&format!("{name}({digits})"));
            let bare = ColumnTypeFact::parse(name);
            prop_assert_eq!(with_digits, bare);
        }

        /// With a display width, the unsigned marker keeps the base type
        /// and only flips signedness.
        #[test]
        fn prop_unsigned_suffix_keeps_base_type(name in known_name(), digits in 1u32..=255) {
            let signed = ColumnTypeFact::parse(&format!("{name}({digits})"));
            let unsigned = ColumnTypeFact::parse(&format!("{name}({digits}) unsigned"));
            prop_assert_eq!(&signed.base_type, &unsigned.base_type);
            prop_assert_eq!(signed.byte_width, unsigned.byte_width);
            prop_assert!(unsigned.is_unsigned);
            prop_assert!(!signed.is_unsigned);
        }

        /// Without a `(`, the marker is part of the base name, which is
        /// then unrecognized.
        #[test]
        fn prop_bare_unsigned_is_unknown(name in known_name()) {
            let fact = ColumnTypeFact::parse(&format!("{name} unsigned"));
            prop_assert!(!fact.base_type.is_known());
            prop_assert_eq!(fact.byte_width, 0);
            prop_assert!(!fact.limit().is_evaluable());
        }

        /// Unsigned maximum is always twice the signed maximum plus one.
        #[test]
        fn prop_unsigned_doubles_range(width in prop_oneof![Just(1u8), Just(2), Just(3), Just(4), Just(8)]) {
            prop_assert_eq!(max_value(width, true), max_value(width, false) * 2 + 1);
        }
    }
}
