//! Recursive structure traversal and name resolution.
//!
//! The [`Walker`] is the single engine behind every source. A source supplies
//! a [`Naming`] convention and a [`Lookup`] strategy; derived
//! [`Configure`] impls feed the walker one field at a time, and the walker
//! builds each field's external name from the path of segments above it.

use tracing::{debug, trace};

use crate::words::{identifier_words, split_words};
use crate::{ConfigError, Configure, Field, FieldMeta, Shape};

/// Case transform applied to a fully-qualified name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// `DB_HOST`.
    Upper,
    /// `db.host`.
    Lower,
}

impl Case {
    fn apply(self, s: &str) -> String {
        match self {
            Self::Upper => s.to_uppercase(),
            Self::Lower => s.to_lowercase(),
        }
    }
}

/// How a source turns field paths into external names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Naming {
    tag: String,
    joiner: String,
    case: Case,
    prefix: String,
    separator: String,
}

impl Naming {
    /// Create a naming convention that joins words with `joiner`.
    pub fn new(joiner: impl Into<String>, case: Case) -> Self {
        Self {
            tag: String::new(),
            joiner: joiner.into(),
            case,
            prefix: String::new(),
            separator: ",".to_string(),
        }
    }

    /// Tag key consulted for per-field name overrides.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Text prepended to every root name, used verbatim.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Separator for collection elements and map entries.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Collection separator.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Computes a field's own name segment.
    ///
    /// The configured tag wins over the identifier. Either way the text is
    /// split on word boundaries and rejoined with the joiner.
    pub fn segment(&self, meta: &FieldMeta) -> String {
        match meta.tag(&self.tag) {
            Some(tag) => split_words(tag).join(&self.joiner),
            None => identifier_words(meta.ident).join(&self.joiner),
        }
    }

    /// Builds the external name for a path of segments.
    pub fn qualify(&self, path: &[String]) -> String {
        self.case
            .apply(&format!("{}{}", self.prefix, path.join(&self.joiner)))
    }
}

/// A strategy for finding raw values by external name.
pub trait Lookup {
    /// Returns the raw values for `name` in the order they should be applied.
    ///
    /// An empty result leaves the field untouched.
    fn lookup(&mut self, name: &str, shape: &Shape) -> Vec<String>;
}

/// Walks a configuration structure, resolving and applying source values.
pub struct Walker<'a> {
    naming: &'a Naming,
    lookup: &'a mut dyn Lookup,
    path: Vec<String>,
    writes: usize,
}

impl<'a> Walker<'a> {
    /// Create a walker for one pass over a target.
    pub fn new(naming: &'a Naming, lookup: &'a mut dyn Lookup) -> Self {
        Self {
            naming,
            lookup,
            path: Vec::new(),
            writes: 0,
        }
    }

    /// Walks every field of `target`.
    pub fn walk(&mut self, target: &mut dyn Configure) -> Result<(), ConfigError> {
        target.visit_fields(self)
    }

    /// Visits one named field, extending the path by its segment.
    pub fn field<F: Field>(&mut self, meta: &FieldMeta, value: &mut F) -> Result<(), ConfigError> {
        self.path.push(self.naming.segment(meta));
        let result = value.walk(self);
        self.path.pop();
        result
    }

    /// Visits an embedded structure without adding a segment.
    pub fn embed<C: Configure + ?Sized>(&mut self, value: &mut C) -> Result<(), ConfigError> {
        value.visit_fields(self)
    }

    /// Visits a nested structure under the current path, then resolves the
    /// structure's own name like any other field.
    pub fn nested<C: Configure + Field>(&mut self, value: &mut C) -> Result<(), ConfigError> {
        value.visit_fields(self)?;
        self.assign(value)
    }

    /// Resolves the current path and applies every value found.
    pub fn assign<F: Field>(&mut self, value: &mut F) -> Result<(), ConfigError> {
        let name = self.name();
        let shape = F::shape();
        trace!(name = %name, shape = %shape, "looking up field");

        for raw in self.lookup.lookup(&name, &shape) {
            if let Err(err) = value.set(&raw, self.naming.separator()) {
                debug!(name = %name, error = %err, "failed to apply value");
                return Err(err);
            }
            self.writes += 1;
            debug!(name = %name, "applied value");
        }
        Ok(())
    }

    /// The fully-qualified name of the current path.
    pub fn name(&self) -> String {
        self.naming.qualify(&self.path)
    }

    /// Number of values applied so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}
