//! Derive macro for qcl configuration structures.
//!
//! This crate provides `#[derive(Configure)]`, which generates the field
//! bindings the qcl loader walks. It replaces runtime reflection: every field's
//! identifier and naming overrides are emitted as static data next to a
//! mutable reference to the field.
//!
//! # Overview
//!
//! Use it through the `qcl` crate, which re-exports it:
//!
//! ```rust,ignore
//! use qcl::Configure;
//!
//! #[derive(Default, Configure)]
//! struct Config {
//!     #[qcl(env = "DATABASE_URL", flag = "db")]
//!     database_url: String,
//!     #[qcl(embed)]
//!     common: Common,
//!     #[qcl(skip)]
//!     cache: Cache,
//! }
//! ```
//!
//! # Macro Expansion
//!
//! The derive:
//!
//! 1. Rejects anything but a struct with named fields
//! 2. Emits `qcl::Configure`, visiting each field in declaration order
//! 3. Emits `qcl::Field`, so the struct can nest inside another one

mod derive;
mod parse;

use proc_macro::TokenStream;

/// Derives `qcl::Configure` and `qcl::Field` for a struct with named fields.
///
/// # Attributes
///
/// Field attributes go in `#[qcl(...)]`:
///
/// - `key = "Name"`: overrides the field's name segment for every source
///   whose tag key is `key`. `env` and `flag` are the default keys, but any
///   key works with a source configured to read it. Text after the first
///   comma is ignored.
/// - `embed`: walks the field's own fields as if they were declared here.
/// - `skip`: no source reads or writes the field.
///
/// # Generated Code
///
/// The macro generates approximately:
///
/// ```rust,ignore
/// impl qcl::Configure for Config {
///     fn visit_fields(&mut self, walker: &mut qcl::Walker<'_>) -> Result<(), qcl::ConfigError> {
///         walker.field(
///             &qcl::FieldMeta::new("database_url", &[("env", "DATABASE_URL"), ("flag", "db")]),
///             &mut self.database_url,
///         )?;
///         walker.embed(&mut self.common)?;
///         Ok(())
///     }
/// }
///
/// impl qcl::Field for Config {
///     fn shape() -> qcl::Shape {
///         qcl::Shape::Struct("Config")
///     }
///     // walk recurses, set rejects raw values, as_configure returns Some(self)
/// }
/// ```
#[proc_macro_derive(Configure, attributes(qcl))]
pub fn derive_configure(input: TokenStream) -> TokenStream {
    derive::expand_configure(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
