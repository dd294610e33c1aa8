//! Sequence and mapping assembly from delimited strings.
//!
//! Sequences are written as `a,b,c` and mappings as `k1=v1,k2=v2`, with the
//! separator configurable per source. Values are always added to what the
//! field already holds, so collections accumulate across sources. Assembly
//! is fail-fast: elements added before a bad one stay.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::{coerce, ConfigError, Field, Shape};

/// Splits a map entry into key and value.
///
/// The entry must contain exactly one `=`.
pub fn split_entry(entry: &str) -> Result<(&str, &str), ConfigError> {
    match entry.split_once('=') {
        Some((key, value)) if !value.contains('=') => Ok((key, value)),
        _ => Err(ConfigError::invalid_map_entry(entry)),
    }
}

fn extend_seq<T: Field + Default>(
    seq: &mut Vec<T>,
    raw: &str,
    separator: &str,
) -> Result<(), ConfigError> {
    for piece in raw.split(separator) {
        seq.push(coerce(piece, separator)?);
    }
    Ok(())
}

fn extend_map<T, F>(raw: &str, separator: &str, mut insert: F) -> Result<(), ConfigError>
where
    T: Field + Default,
    F: FnMut(String, T),
{
    for entry in raw.split(separator) {
        let (key, value) = split_entry(entry)?;
        insert(key.to_owned(), coerce(value, separator)?);
    }
    Ok(())
}

impl<T: Field + Default> Field for Vec<T> {
    fn shape() -> Shape {
        Shape::Sequence(Box::new(T::shape()))
    }

    fn set(&mut self, raw: &str, separator: &str) -> Result<(), ConfigError> {
        extend_seq(self, raw, separator)
    }
}

impl<T, S> Field for HashMap<String, T, S>
where
    T: Field + Default,
    S: BuildHasher + Default,
{
    fn shape() -> Shape {
        Shape::Mapping(Box::new(T::shape()))
    }

    fn set(&mut self, raw: &str, separator: &str) -> Result<(), ConfigError> {
        extend_map(raw, separator, |key, value: T| {
            self.insert(key, value);
        })
    }
}

impl<T: Field + Default> Field for BTreeMap<String, T> {
    fn shape() -> Shape {
        Shape::Mapping(Box::new(T::shape()))
    }

    fn set(&mut self, raw: &str, separator: &str) -> Result<(), ConfigError> {
        extend_map(raw, separator, |key, value: T| {
            self.insert(key, value);
        })
    }
}
