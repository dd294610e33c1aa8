//! Shape descriptors for configuration fields.
//!
//! A [`Shape`] is the semantic type of a field as the loader sees it. Shapes
//! are produced by [`Field::shape`](crate::Field::shape) and show up in
//! errors and in generated flag help.

use std::fmt;

/// The semantic type of a configuration field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// `bool`.
    Bool,
    /// A fixed-width integer.
    Int {
        /// Whether the integer is signed.
        signed: bool,
        /// Width in bits.
        bits: u32,
    },
    /// A floating point number.
    Float {
        /// Width in bits.
        bits: u32,
    },
    /// `std::time::Duration`, written as a number plus unit suffix.
    Duration,
    /// `String`.
    String,
    /// `PathBuf`.
    Path,
    /// A value that is allocated on first write (`Option<T>`).
    Optional(Box<Shape>),
    /// A delimited sequence (`Vec<T>`).
    Sequence(Box<Shape>),
    /// A delimited `key=value` mapping with string keys.
    Mapping(Box<Shape>),
    /// A nested configuration structure.
    Struct(&'static str),
}

impl Shape {
    /// Returns `true` if the shape is a structure, looking through optional
    /// values.
    pub fn is_struct(&self) -> bool {
        match self {
            Self::Struct(_) => true,
            Self::Optional(inner) => inner.is_struct(),
            _ => false,
        }
    }

    /// Placeholder used for the value in flag help.
    pub fn value_name(&self) -> &'static str {
        match self {
            Self::Bool => "BOOL",
            Self::Int { .. } => "INT",
            Self::Float { .. } => "FLOAT",
            Self::Duration => "DURATION",
            Self::String => "STRING",
            Self::Path => "PATH",
            Self::Optional(inner) => inner.value_name(),
            Self::Sequence(_) => "LIST",
            Self::Mapping(_) => "KEY=VALUE",
            Self::Struct(_) => "VALUE",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int { signed: true, bits } => write!(f, "i{bits}"),
            Self::Int { signed: false, bits } => write!(f, "u{bits}"),
            Self::Float { bits } => write!(f, "f{bits}"),
            Self::Duration => f.write_str("duration"),
            Self::String => f.write_str("string"),
            Self::Path => f.write_str("path"),
            Self::Optional(inner) => write!(f, "optional<{inner}>"),
            Self::Sequence(inner) => write!(f, "list<{inner}>"),
            Self::Mapping(inner) => write!(f, "map<string, {inner}>"),
            Self::Struct(name) => f.write_str(name),
        }
    }
}
