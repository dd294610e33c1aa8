//! Scalar value coercion.
//!
//! Every scalar shape gets a [`Field`] impl here. Pointer shapes live in
//! [`crate::field`] and collections in [`crate::collection`].

use std::path::PathBuf;
use std::time::Duration;

use crate::{ConfigError, Field, Shape};

/// Converts one raw string into a fresh value of `T`.
///
/// ```
/// use std::time::Duration;
///
/// let timeout: Duration = qcl::coerce("13s", ",").unwrap();
/// assert_eq!(timeout, Duration::from_secs(13));
///
/// let port: Option<u16> = qcl::coerce("8080", ",").unwrap();
/// assert_eq!(port, Some(8080));
/// ```
pub fn coerce<T: Field + Default>(raw: &str, separator: &str) -> Result<T, ConfigError> {
    let mut value = T::default();
    value.set(raw, separator)?;
    Ok(value)
}

/// Parse a boolean from a string.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "on" => Some(true),
        "false" | "f" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Field for bool {
    fn shape() -> Shape {
        Shape::Bool
    }

    fn set(&mut self, raw: &str, _separator: &str) -> Result<(), ConfigError> {
        *self = parse_bool(raw)
            .ok_or_else(|| ConfigError::type_conversion(raw, Self::shape(), "expected boolean"))?;
        Ok(())
    }
}

macro_rules! int_fields {
    ($signed:literal => $($ty:ty),+) => {
        $(
            impl Field for $ty {
                fn shape() -> Shape {
                    Shape::Int { signed: $signed, bits: <$ty>::BITS }
                }

                fn set(&mut self, raw: &str, _separator: &str) -> Result<(), ConfigError> {
                    *self = raw
                        .parse::<$ty>()
                        .map_err(|e| ConfigError::type_conversion(raw, Self::shape(), e))?;
                    Ok(())
                }
            }
        )+
    };
}

int_fields!(true => i8, i16, i32, i64, i128, isize);
int_fields!(false => u8, u16, u32, u64, u128, usize);

macro_rules! float_fields {
    ($($ty:ty => $bits:literal),+) => {
        $(
            impl Field for $ty {
                fn shape() -> Shape {
                    Shape::Float { bits: $bits }
                }

                fn set(&mut self, raw: &str, _separator: &str) -> Result<(), ConfigError> {
                    *self = raw
                        .parse::<$ty>()
                        .map_err(|e| ConfigError::type_conversion(raw, Self::shape(), e))?;
                    Ok(())
                }
            }
        )+
    };
}

float_fields!(f32 => 32, f64 => 64);

impl Field for Duration {
    fn shape() -> Shape {
        Shape::Duration
    }

    fn set(&mut self, raw: &str, _separator: &str) -> Result<(), ConfigError> {
        *self = humantime::parse_duration(raw)
            .map_err(|e| ConfigError::type_conversion(raw, Self::shape(), e))?;
        Ok(())
    }
}

impl Field for String {
    fn shape() -> Shape {
        Shape::String
    }

    fn set(&mut self, raw: &str, _separator: &str) -> Result<(), ConfigError> {
        raw.clone_into(self);
        Ok(())
    }
}

impl Field for PathBuf {
    fn shape() -> Shape {
        Shape::Path
    }

    fn set(&mut self, raw: &str, _separator: &str) -> Result<(), ConfigError> {
        *self = PathBuf::from(raw);
        Ok(())
    }
}
