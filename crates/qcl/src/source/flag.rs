//! Command-line flag source.
//!
//! Loading from flags takes three steps against a caller-owned [`FlagSet`]:
//!
//! 1. walk the target once, registering one flag per leaf field;
//! 2. parse the arguments with `clap` against that registry;
//! 3. walk the target again, applying every parsed occurrence in order.
//!
//! Nothing is registered globally, so independent loads never see each
//! other's flags.

use std::collections::HashMap;
use std::env;

use clap::{value_parser, Arg, ArgAction, Command};
use tracing::debug;

use super::{Source, FLAG};
use crate::{Case, ConfigError, Configure, Lookup, Naming, Shape, Walker};

const POSITIONAL: &str = "qcl::args";

/// Registry of the flags a target accepts.
#[derive(Debug, Clone, Default)]
pub struct FlagSet {
    flags: Vec<(String, Shape)>,
}

impl FlagSet {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a flag taking one value of `shape` per occurrence.
    pub fn register(&mut self, name: impl Into<String>, shape: Shape) -> Result<(), ConfigError> {
        let name = name.into();
        if self.flags.iter().any(|(existing, _)| *existing == name) {
            return Err(ConfigError::duplicate_flag(name));
        }
        self.flags.push((name, shape));
        Ok(())
    }

    /// Registered flag names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(|(name, _)| name.as_str())
    }

    /// Number of registered flags.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Returns `true` if no flags are registered.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Builds the `clap` command describing this registry.
    pub fn command(&self, bin_name: &str) -> Command {
        let positional = Arg::new(POSITIONAL)
            .value_name("ARGS")
            .num_args(0..)
            .trailing_var_arg(true)
            .action(ArgAction::Append)
            .value_parser(value_parser!(String));

        self.flags.iter().fold(
            Command::new(bin_name.to_owned())
                .disable_help_flag(true)
                .disable_version_flag(true)
                .arg(positional),
            |cmd, (name, shape)| {
                cmd.arg(
                    Arg::new(name.clone())
                        .long(name.clone())
                        .value_name(shape.value_name())
                        .help(shape.to_string())
                        .num_args(1)
                        .allow_hyphen_values(true)
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(String)),
                )
            },
        )
    }

    /// Parses `args`, whose first element is the program name.
    ///
    /// Flags may be written `-name value`, `--name value` or `--name=value`.
    /// Parsing stops at the first positional argument or at `--`.
    pub fn parse(&self, args: &[String]) -> Result<ParsedFlags, ConfigError> {
        let bin_name = args.first().map_or("", String::as_str);
        let matches = self
            .command(bin_name)
            .try_get_matches_from(normalize_args(args))?;

        let values = self
            .flags
            .iter()
            .filter_map(|(name, _)| {
                matches
                    .get_many::<String>(name)
                    .map(|values| (name.clone(), values.cloned().collect()))
            })
            .collect();
        let args = matches
            .get_many::<String>(POSITIONAL)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        Ok(ParsedFlags { values, args })
    }
}

/// Flag values parsed from one command line.
#[derive(Debug, Clone, Default)]
pub struct ParsedFlags {
    values: HashMap<String, Vec<String>>,
    args: Vec<String>,
}

impl ParsedFlags {
    /// Every value given for `name`, in command-line order.
    pub fn values(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Positional arguments left after the flags.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Lookup for ParsedFlags {
    fn lookup(&mut self, name: &str, shape: &Shape) -> Vec<String> {
        if shape.is_struct() {
            return Vec::new();
        }
        self.values(name).to_vec()
    }
}

/// Rewrites single-dash long flags to the `--name` form `clap` expects.
///
/// Values following a flag and everything after the first positional
/// argument pass through untouched.
fn normalize_args(args: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len());
    let mut iter = args.iter();
    if let Some(bin) = iter.next() {
        out.push(bin.clone());
    }

    let mut expect_value = false;
    while let Some(arg) = iter.next() {
        if expect_value {
            out.push(arg.clone());
            expect_value = false;
            continue;
        }

        let name = match arg.strip_prefix("--") {
            Some("") => None,
            Some(rest) => Some(rest),
            None => arg
                .strip_prefix('-')
                .filter(|rest| rest.starts_with(char::is_alphabetic)),
        };
        match name {
            Some(name) => {
                expect_value = !name.contains('=');
                out.push(format!("--{name}"));
            }
            None => {
                out.push(arg.clone());
                out.extend(iter.by_ref().cloned());
                break;
            }
        }
    }
    out
}

/// Collects one flag per leaf field into a [`FlagSet`].
struct Registrar<'a> {
    flags: &'a mut FlagSet,
    error: Option<ConfigError>,
}

impl Lookup for Registrar<'_> {
    fn lookup(&mut self, name: &str, shape: &Shape) -> Vec<String> {
        if self.error.is_none() && !shape.is_struct() {
            if let Err(err) = self.flags.register(name, shape.clone()) {
                self.error = Some(err);
            }
        }
        Vec::new()
    }
}

/// Loads configuration from command-line flags.
///
/// Names are the field path in lowercase joined with `.`: a field `db.host`
/// is set with `--db.host`. Each occurrence of a flag is applied in order,
/// so the last one wins for scalars and every one appends for collections.
///
/// # Example
///
/// ```
/// use qcl::{Configure, FlagSource, Source};
///
/// #[derive(Debug, Default, Configure)]
/// struct Db {
///     host: String,
/// }
///
/// #[derive(Debug, Default, Configure)]
/// struct Config {
///     port: u16,
///     db: Db,
/// }
///
/// let mut config = Config::default();
/// let mut flags = FlagSource::new().with_args(["app", "-port", "8080", "--db.host=db", "serve"]);
/// flags.load(&mut config).unwrap();
///
/// assert_eq!(config.port, 8080);
/// assert_eq!(config.db.host, "db");
/// assert_eq!(flags.args(), ["serve"]);
/// ```
#[derive(Debug, Clone)]
pub struct FlagSource {
    tag: String,
    separator: String,
    args: Option<Vec<String>>,
    remaining: Vec<String>,
}

impl Default for FlagSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FlagSource {
    /// Create a flag source reading the process arguments, with tag `flag`
    /// and separator `,`.
    pub fn new() -> Self {
        Self {
            tag: "flag".to_string(),
            separator: ",".to_string(),
            args: None,
            remaining: Vec::new(),
        }
    }

    /// Parse these arguments instead of the process arguments.
    ///
    /// The first element is the program name.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
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

    /// Positional arguments that followed the flags in the last load.
    pub fn args(&self) -> &[String] {
        &self.remaining
    }

    /// Builds the registry of flags `target` accepts.
    ///
    /// Registration only reads the target.
    pub fn register(&self, target: &mut dyn Configure) -> Result<FlagSet, ConfigError> {
        let naming = self.naming();
        let mut flags = FlagSet::new();
        let mut registrar = Registrar {
            flags: &mut flags,
            error: None,
        };
        Walker::new(&naming, &mut registrar).walk(target)?;
        match registrar.error {
            Some(err) => Err(err),
            None => Ok(flags),
        }
    }

    /// Renders help text listing the flags `target` accepts.
    pub fn usage(&self, target: &mut dyn Configure) -> Result<String, ConfigError> {
        let args = self.resolve_args();
        let bin_name = args.first().map_or("app", String::as_str);
        let mut command = self.register(target)?.command(bin_name);
        Ok(command.render_help().to_string())
    }

    fn naming(&self) -> Naming {
        Naming::new(".", Case::Lower)
            .with_tag(self.tag.as_str())
            .with_separator(self.separator.as_str())
    }

    fn resolve_args(&self) -> Vec<String> {
        self.args.clone().unwrap_or_else(|| {
            env::args_os()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect()
        })
    }
}

impl Source for FlagSource {
    fn kind(&self) -> &str {
        FLAG
    }

    fn load(&mut self, target: &mut dyn Configure) -> Result<usize, ConfigError> {
        let args = self.resolve_args();
        if args.len() < 2 {
            debug!(source = FLAG, "no command-line arguments, skipping");
            return Ok(0);
        }

        let flags = self.register(target)?;
        debug!(source = FLAG, flags = flags.len(), "registered flags");

        let mut parsed = flags.parse(&args)?;
        self.remaining = parsed.args().to_vec();

        let naming = self.naming();
        let mut walker = Walker::new(&naming, &mut parsed);
        walker.walk(target)?;

        debug!(source = FLAG, writes = walker.writes(), "configuration loaded");
        Ok(walker.writes())
    }
}
