//! Configuration error types.

use thiserror::Error;

use crate::Shape;

/// Errors that can occur while loading configuration.
///
/// Every error ends the current load. Fields written before the failing one
/// keep their new values.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The load target is not a structure.
    #[error("config must be a struct, got {shape}")]
    ConfigType {
        /// Shape of the rejected target.
        shape: Shape,
    },

    /// A source supplied a value for a shape that has no coercion rule.
    #[error("unsupported type: {shape}")]
    UnsupportedType {
        /// The shape that cannot be set from a string.
        shape: Shape,
    },

    /// A string could not be converted into the target shape.
    #[error("cannot convert {value:?} to {shape}: {reason}")]
    TypeConversion {
        /// The offending raw value.
        value: String,
        /// The shape the value was converted into.
        shape: Shape,
        /// Explanation from the underlying parser.
        reason: String,
    },

    /// A map entry is not of the form `key=value`.
    #[error("invalid map entry: {entry:?}")]
    InvalidMapEntry {
        /// The entry as it appeared in the source value.
        entry: String,
    },

    /// Two fields resolve to the same command-line flag.
    #[error("flag defined more than once: --{name}")]
    DuplicateFlag {
        /// The conflicting flag name.
        name: String,
    },

    /// The command line could not be parsed.
    #[error("failed to parse command-line flags: {0}")]
    Flags(#[from] clap::Error),
}

impl ConfigError {
    /// Create a new config type error.
    pub fn config_type(shape: Shape) -> Self {
        Self::ConfigType { shape }
    }

    /// Create a new unsupported type error.
    pub fn unsupported_type(shape: Shape) -> Self {
        Self::UnsupportedType { shape }
    }

    /// Create a new type conversion error.
    pub fn type_conversion(
        value: impl Into<String>,
        shape: Shape,
        reason: impl ToString,
    ) -> Self {
        Self::TypeConversion {
            value: value.into(),
            shape,
            reason: reason.to_string(),
        }
    }

    /// Create a new invalid map entry error.
    pub fn invalid_map_entry(entry: impl Into<String>) -> Self {
        Self::InvalidMapEntry {
            entry: entry.into(),
        }
    }

    /// Create a new duplicate flag error.
    pub fn duplicate_flag(name: impl Into<String>) -> Self {
        Self::DuplicateFlag { name: name.into() }
    }
}
