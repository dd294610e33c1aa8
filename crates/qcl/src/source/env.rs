//! Environment variable source.

use std::collections::HashMap;
use std::env;

use tracing::debug;

use super::{Source, ENV};
use crate::{Case, ConfigError, Configure, Lookup, Naming, Shape, Walker};

/// Loads configuration from environment variables.
///
/// Names are the field path in uppercase joined with `_`: a field `db.host`
/// is read from `DB_HOST`, or `APP_DB_HOST` with prefix `APP`. Empty
/// variables count as unset. Values that are not valid UTF-8 are read
/// lossily, like command-line arguments.
///
/// # Example
///
/// ```
/// use qcl::{Configure, EnvSource, Source};
///
/// #[derive(Debug, Default, Configure)]
/// struct Config {
///     hosts: Vec<String>,
/// }
///
/// let mut config = Config::default();
/// EnvSource::new()
///     .with_prefix("DOC")
///     .with_separator(";")
///     .with_vars([("DOC_HOSTS", "a;b")])
///     .load(&mut config)
///     .unwrap();
///
/// assert_eq!(config.hosts, ["a", "b"]);
/// ```
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
    tag: String,
    separator: String,
    vars: Option<HashMap<String, String>>,
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvSource {
    /// Create an environment source with no prefix, tag `env` and separator `,`.
    pub fn new() -> Self {
        Self {
            prefix: String::new(),
            tag: "env".to_string(),
            separator: ",".to_string(),
            vars: None,
        }
    }

    /// Set the variable name prefix.
    ///
    /// A `_` is appended unless the prefix already ends with one.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the tag key consulted for name overrides.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Set the separator for collection values.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Read from a fixed set of variables instead of the process environment.
    #[must_use]
    pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.vars = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    fn prefix(&self) -> String {
        if self.prefix.is_empty() || self.prefix.ends_with('_') {
            self.prefix.clone()
        } else {
            format!("{}_", self.prefix)
        }
    }

    fn naming(&self) -> Naming {
        Naming::new("_", Case::Upper)
            .with_tag(self.tag.as_str())
            .with_prefix(self.prefix())
            .with_separator(self.separator.as_str())
    }
}

struct EnvLookup<'a> {
    vars: Option<&'a HashMap<String, String>>,
}

impl Lookup for EnvLookup<'_> {
    fn lookup(&mut self, name: &str, _shape: &Shape) -> Vec<String> {
        let value = match self.vars {
            Some(vars) => vars.get(name).cloned(),
            None => env::var_os(name).map(|v| v.to_string_lossy().into_owned()),
        };
        value.filter(|v| !v.is_empty()).into_iter().collect()
    }
}

impl Source for EnvSource {
    fn kind(&self) -> &str {
        ENV
    }

    fn load(&mut self, target: &mut dyn Configure) -> Result<usize, ConfigError> {
        let naming = self.naming();
        let mut lookup = EnvLookup {
            vars: self.vars.as_ref(),
        };
        debug!(source = ENV, prefix = %self.prefix(), "loading configuration");

        let mut walker = Walker::new(&naming, &mut lookup);
        walker.walk(target)?;

        debug!(source = ENV, writes = walker.writes(), "configuration loaded");
        Ok(walker.writes())
    }
}
