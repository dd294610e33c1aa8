//! Configuration sources.
//!
//! A [`Source`] reads values from one place (the environment, the command
//! line) and applies them to a target through the shared
//! [`Walker`](crate::Walker). Sources run in order and each one mutates the
//! same target, so later sources override scalars written by earlier ones.

mod env;
mod flag;

pub use env::EnvSource;
pub use flag::{FlagSet, FlagSource, ParsedFlags};

use std::fmt;

use crate::{ConfigError, Configure};

/// Kind name of the environment source.
pub const ENV: &str = "env";

/// Kind name of the command-line flag source.
pub const FLAG: &str = "flag";

/// A place configuration values come from.
pub trait Source: fmt::Debug {
    /// Short name identifying the source, used for ordering.
    fn kind(&self) -> &str;

    /// Applies this source's values to `target`, returning how many values
    /// were applied.
    ///
    /// Each call walks the target from scratch.
    fn load(&mut self, target: &mut dyn Configure) -> Result<usize, ConfigError>;
}
