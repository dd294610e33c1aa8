//! Configuration loader with layered approach.
//!
//! This module provides the [`Loader`] for applying configuration from
//! multiple sources, in order, to one target.

use tracing::debug;

use crate::source::{EnvSource, FlagSource, Source};
use crate::{ConfigError, Configure, Field};

/// Configuration loader with layered approach.
///
/// The loader applies sources in order, with later sources overriding
/// scalars written by earlier ones:
/// 1. Default values (whatever the target already holds)
/// 2. Each configured source, in order
///
/// Sequences and maps accumulate across sources instead, since every source
/// appends to them.
///
/// With no sources configured the loader uses environment variables, then
/// command-line flags.
///
/// # Example
///
/// ```
/// use qcl::{Configure, EnvSource, FlagSource, Loader};
///
/// #[derive(Debug, Default, Configure)]
/// struct Config {
///     host: String,
///     port: u16,
/// }
///
/// # fn main() -> Result<(), qcl::ConfigError> {
/// let mut config = Config {
///     host: "0.0.0.0".to_string(),
///     port: 80,
/// };
///
/// Loader::new()
///     .with_source(EnvSource::new().with_prefix("APP").with_vars([("APP_PORT", "8080")]))
///     .with_source(FlagSource::new().with_args(["app", "-port", "9090"]))
///     .load(&mut config)?;
///
/// assert_eq!(config.host, "0.0.0.0");
/// assert_eq!(config.port, 9090);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Loader {
    sources: Vec<Box<dyn Source>>,
    order: Option<Vec<String>>,
}

impl Loader {
    /// Create a loader with no sources.
    ///
    /// # Example
    ///
    /// ```
    /// use qcl::Loader;
    ///
    /// let loader = Loader::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with the default sources: environment, then flags.
    pub fn with_defaults() -> Self {
        Self::new()
            .with_source(EnvSource::new())
            .with_source(FlagSource::new())
    }

    /// Add a source.
    ///
    /// A source of the same kind is replaced in place, keeping its position.
    #[must_use]
    pub fn with_source(mut self, source: impl Source + 'static) -> Self {
        let source: Box<dyn Source> = Box::new(source);
        match self.sources.iter().position(|s| s.kind() == source.kind()) {
            Some(index) => self.sources[index] = source,
            None => self.sources.push(source),
        }
        self
    }

    /// Run sources in this order of kinds instead of the order they were
    /// added.
    ///
    /// Kinds without a configured source are skipped, and sources whose kind
    /// is not listed do not run.
    ///
    /// # Example
    ///
    /// ```
    /// use qcl::{EnvSource, FlagSource, Loader};
    ///
    /// // Environment overrides flags.
    /// let loader = Loader::new()
    ///     .with_source(EnvSource::new())
    ///     .with_source(FlagSource::new())
    ///     .with_order(["flag", "env"]);
    ///
    /// assert_eq!(loader.kinds(), ["flag", "env"]);
    /// ```
    #[must_use]
    pub fn with_order<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order = Some(kinds.into_iter().map(Into::into).collect());
        self
    }

    /// Kinds of the sources that will run, in order.
    pub fn kinds(&self) -> Vec<&str> {
        self.plan().into_iter().map(|i| self.sources[i].kind()).collect()
    }

    /// Apply every source to `target`, stopping at the first error.
    ///
    /// An optional target that is `None` is loaded into `T::default()` and
    /// stays `None` if no source applies a value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `target` is not a structure
    /// - Any source value fails to convert
    /// - The command line does not parse
    pub fn load<T: Field>(&mut self, target: &mut T) -> Result<(), ConfigError> {
        let absent = target.is_absent();
        let result = match target.as_configure() {
            Some(root) => self.apply(root),
            None => Err(ConfigError::config_type(T::shape())),
        };

        // A root optional only stays allocated if something was written.
        if absent && matches!(result, Ok(0) | Err(ConfigError::ConfigType { .. })) {
            target.unset();
        }
        result.map(drop)
    }

    /// Load into a fresh `T::default()`.
    ///
    /// # Example
    ///
    /// ```
    /// use qcl::{Configure, EnvSource, Loader};
    ///
    /// #[derive(Debug, Default, Configure)]
    /// struct Config {
    ///     name: String,
    /// }
    ///
    /// let config: Config = Loader::new()
    ///     .with_source(EnvSource::new().with_vars([("NAME", "svc")]))
    ///     .load_default()
    ///     .unwrap();
    ///
    /// assert_eq!(config.name, "svc");
    /// ```
    pub fn load_default<T: Field + Default>(&mut self) -> Result<T, ConfigError> {
        let mut target = T::default();
        self.load(&mut target)?;
        Ok(target)
    }

    fn apply(&mut self, root: &mut dyn Configure) -> Result<usize, ConfigError> {
        if self.sources.is_empty() {
            debug!("no sources configured, using environment and flags");
            *self = Self::with_defaults().with_order_from(self.order.take());
        }

        let mut writes = 0;
        for index in self.plan() {
            let source = &mut self.sources[index];
            debug!(source = source.kind(), "applying source");
            writes += source.load(root)?;
        }
        Ok(writes)
    }

    fn with_order_from(mut self, order: Option<Vec<String>>) -> Self {
        self.order = order;
        self
    }

    // Indices of the sources to run, in order
    fn plan(&self) -> Vec<usize> {
        match &self.order {
            None => (0..self.sources.len()).collect(),
            Some(order) => order
                .iter()
                .filter_map(|kind| self.sources.iter().position(|s| s.kind() == kind))
                .collect(),
        }
    }
}

/// Load `target` from the environment, then from command-line flags.
///
/// Equivalent to `Loader::with_defaults().load(target)`.
pub fn load<T: Field>(target: &mut T) -> Result<(), ConfigError> {
    Loader::with_defaults().load(target)
}
