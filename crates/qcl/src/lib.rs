//! Typed configuration loading from environment variables and command-line
//! flags.
//!
//! This crate populates a plain Rust struct from:
//! - Environment variables (`APP_DB_HOST=localhost`)
//! - Command-line flags (`-db.host localhost` or `--db.host localhost`)
//! - Layered sources, applied in order over the struct's current values
//!
//! # Overview
//!
//! A configuration type derives [`Configure`](derive@Configure). Each field
//! is mapped to an external name built from its identifier, or from a
//! per-source override in a `#[qcl(...)]` attribute:
//!
//! | Field                   | Environment      | Flag            |
//! |-------------------------|------------------|-----------------|
//! | `max_conns`             | `MAX_CONNS`      | `max.conns`     |
//! | `db.host`               | `DB_HOST`        | `db.host`       |
//! | `#[qcl(env = "URL")]`   | `URL`            | (identifier)    |
//! | `#[qcl(embed)] base.x`  | `X`              | `x`             |
//!
//! Supported field types are `bool`, all fixed-width integers, `f32`/`f64`,
//! [`Duration`](std::time::Duration), `String`, [`PathBuf`](std::path::PathBuf),
//! nested derived structs, `Option<T>`, `Box<T>`, `Vec<T>` and string-keyed
//! `HashMap`/`BTreeMap`.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use qcl::{Configure, EnvSource, FlagSource, Loader};
//!
//! #[derive(Debug, Default, Configure)]
//! struct Database {
//!     host: String,
//!     port: u16,
//! }
//!
//! #[derive(Debug, Default, Configure)]
//! struct Config {
//!     #[qcl(env = "LISTEN")]
//!     addr: String,
//!     timeout: Duration,
//!     db: Database,
//!     tags: Vec<String>,
//! }
//!
//! # fn main() -> Result<(), qcl::ConfigError> {
//! let config: Config = Loader::new()
//!     .with_source(EnvSource::new().with_prefix("SVC").with_vars([
//!         ("SVC_LISTEN", "0.0.0.0:8080"),
//!         ("SVC_TIMEOUT", "30s"),
//!         ("SVC_TAGS", "a,b"),
//!     ]))
//!     .with_source(FlagSource::new().with_args(["svc", "-db.port", "5432", "-tags", "c"]))
//!     .load_default()?;
//!
//! assert_eq!(config.addr, "0.0.0.0:8080");
//! assert_eq!(config.timeout, Duration::from_secs(30));
//! assert_eq!(config.db.port, 5432);
//! assert_eq!(config.tags, ["a", "b", "c"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Layering
//!
//! Sources mutate the same value in order. Scalars are overwritten by the
//! last source that sets them; sequences and maps accumulate. Fields no
//! source mentions keep whatever the struct held before loading, so defaults
//! are simply the initial value.

#![warn(missing_docs)]

// Lets `#[derive(Configure)]` resolve `::qcl` paths inside this crate.
extern crate self as qcl;

mod coerce;
mod collection;
mod error;
mod field;
mod loader;
mod shape;
pub mod source;
mod walker;
mod words;

pub use coerce::{coerce, parse_bool};
pub use collection::split_entry;
pub use error::ConfigError;
pub use field::{Configure, Field, FieldMeta};
pub use loader::{load, Loader};
pub use qcl_macros::Configure;
pub use shape::Shape;
pub use source::{EnvSource, FlagSet, FlagSource, ParsedFlags, Source};
pub use walker::{Case, Lookup, Naming, Walker};
pub use words::split_words;
