//! Field and structure binding traits.
//!
//! [`Configure`] is what `#[derive(Configure)]` generates: a per-type
//! `visit_fields` that hands every field, along with its static
//! [`FieldMeta`], to the [`Walker`]. [`Field`] is implemented for every shape
//! the walker can write, including derived structures themselves.

use crate::{ConfigError, Shape, Walker};

/// Static description of a structure field, emitted by the derive macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    /// The field's Rust identifier.
    pub ident: &'static str,
    /// Naming overrides as `(tag key, tag text)` pairs.
    pub tags: &'static [(&'static str, &'static str)],
}

impl FieldMeta {
    /// Create a field description.
    pub const fn new(ident: &'static str, tags: &'static [(&'static str, &'static str)]) -> Self {
        Self { ident, tags }
    }

    /// Returns the override for `key`, cut at the first comma and trimmed.
    ///
    /// An empty override counts as absent.
    pub fn tag(&self, key: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(k, _)| *k == key)
            .map(|&(_, text)| text.trim().split(',').next().unwrap_or_default().trim())
            .filter(|text| !text.is_empty())
    }
}

/// A configuration structure whose fields can be walked.
///
/// Usually derived:
///
/// ```
/// use qcl::Configure;
///
/// #[derive(Debug, Default, Configure)]
/// struct Config {
///     host: String,
///     #[qcl(env = "PORT", flag = "port")]
///     listen_port: u16,
/// }
/// ```
pub trait Configure {
    /// Hands each field to the walker in declaration order.
    fn visit_fields(&mut self, walker: &mut Walker<'_>) -> Result<(), ConfigError>;
}

impl<T: Configure + ?Sized> Configure for Box<T> {
    fn visit_fields(&mut self, walker: &mut Walker<'_>) -> Result<(), ConfigError> {
        (**self).visit_fields(walker)
    }
}

/// A value the walker can populate from raw source strings.
pub trait Field: Sized {
    /// The semantic type of this field.
    fn shape() -> Shape;

    /// Visits this field at the walker's current path.
    ///
    /// Leaf values resolve their name and assign whatever the source has.
    /// Structures recurse first.
    fn walk(&mut self, walker: &mut Walker<'_>) -> Result<(), ConfigError> {
        walker.assign(self)
    }

    /// Applies one raw source value.
    ///
    /// Scalars are replaced; collections are extended. `separator` splits
    /// collection values.
    fn set(&mut self, raw: &str, separator: &str) -> Result<(), ConfigError>;

    /// Returns the value as a walkable structure, if it is one.
    fn as_configure(&mut self) -> Option<&mut dyn Configure> {
        None
    }

    /// Returns `true` for an optional that holds nothing.
    fn is_absent(&self) -> bool {
        false
    }

    /// Resets an optional to holding nothing. Other values are unchanged.
    fn unset(&mut self) {}
}

impl<T: Field + Default> Field for Option<T> {
    fn shape() -> Shape {
        Shape::Optional(Box::new(T::shape()))
    }

    fn walk(&mut self, walker: &mut Walker<'_>) -> Result<(), ConfigError> {
        if let Some(inner) = self {
            return inner.walk(walker);
        }

        // Only materialize the pointee if something under it was written.
        let mut inner = T::default();
        let before = walker.writes();
        let result = inner.walk(walker);
        if walker.writes() > before {
            *self = Some(inner);
        }
        result
    }

    fn set(&mut self, raw: &str, separator: &str) -> Result<(), ConfigError> {
        self.get_or_insert_with(T::default).set(raw, separator)
    }

    fn as_configure(&mut self) -> Option<&mut dyn Configure> {
        self.get_or_insert_with(T::default).as_configure()
    }

    fn is_absent(&self) -> bool {
        self.is_none()
    }

    fn unset(&mut self) {
        *self = None;
    }
}

impl<T: Field> Field for Box<T> {
    fn shape() -> Shape {
        T::shape()
    }

    fn walk(&mut self, walker: &mut Walker<'_>) -> Result<(), ConfigError> {
        (**self).walk(walker)
    }

    fn set(&mut self, raw: &str, separator: &str) -> Result<(), ConfigError> {
        (**self).set(raw, separator)
    }

    fn as_configure(&mut self) -> Option<&mut dyn Configure> {
        (**self).as_configure()
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }

    fn unset(&mut self) {
        (**self).unset();
    }
}
