// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Coercion of captured step arguments into typed handler parameters.
//!
//! Every handler parameter declares a [`ParamKind`]. Raw [`Argument`]s
//! (regex captures, a docstring and a [`Table`]) are coerced into [`Value`]s
//! of those kinds by [`coerce()`], and then extracted into the concrete Rust
//! types via the [`Parameter`] trait.

mod converter;
mod error;

use std::{
    any::{self, Any, TypeId},
    fmt,
};

use crate::Table;

pub use self::{
    converter::{Converter, Converters},
    error::CoercionError,
};

/// Declared type of a handler parameter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParamKind {
    /// [`String`], passed through as is.
    Text,

    /// [`bool`].
    Bool,

    /// [`f64`].
    F64,

    /// [`f32`].
    F32,

    /// [`i32`].
    I32,

    /// [`u32`].
    U32,

    /// [`i64`].
    I64,

    /// [`u64`].
    U64,

    /// [`i16`].
    I16,

    /// [`u16`].
    U16,

    /// Step's [`Table`].
    Table,

    /// Any other type, resolved through the registered [`Converters`].
    Custom {
        /// [`TypeId`] of the type.
        type_id: TypeId,

        /// Human-readable name of the type.
        name: &'static str,
    },
}

impl ParamKind {
    /// Creates a [`ParamKind::Custom`] describing the type `T`.
    #[must_use]
    pub fn custom<T: Any>() -> Self {
        Self::Custom { type_id: TypeId::of::<T>(), name: any::type_name::<T>() }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(kind_name(*self))
    }
}

/// Raw argument of a matched step, before coercion.
#[derive(Clone, Debug, PartialEq)]
pub enum Argument {
    /// Regex capture group or a docstring.
    Text(String),

    /// Step's [`Table`].
    Table(Table),
}

/// Coerced argument, ready to be extracted into a [`Parameter`].
#[derive(Debug)]
pub enum Value {
    /// [`String`] value.
    Text(String),

    /// [`bool`] value.
    Bool(bool),

    /// [`f64`] value.
    F64(f64),

    /// [`f32`] value.
    F32(f32),

    /// [`i32`] value.
    I32(i32),

    /// [`u32`] value.
    U32(u32),

    /// [`i64`] value.
    I64(i64),

    /// [`u64`] value.
    U64(u64),

    /// [`i16`] value.
    I16(i16),

    /// [`u16`] value.
    U16(u16),

    /// [`Table`] value.
    Table(Table),

    /// Value produced by a [`Converter`].
    Custom(Box<dyn Any + Send>),
}

impl Value {
    /// Returns a human-readable name of this [`Value`]'s type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "String",
            Self::Bool(_) => "bool",
            Self::F64(_) => "f64",
            Self::F32(_) => "f32",
            Self::I32(_) => "i32",
            Self::U32(_) => "u32",
            Self::I64(_) => "i64",
            Self::U64(_) => "u64",
            Self::I16(_) => "i16",
            Self::U16(_) => "u16",
            Self::Table(_) => "Table",
            Self::Custom(_) => "converted value",
        }
    }
}

/// Type usable as a step handler parameter.
///
/// Implemented for [`String`], [`bool`], the primitive numeric types and
/// [`Table`]. Any other type opts in with an empty implementation and gets
/// its values from a [`Converter`] registered for it:
///
/// ```rust
/// # use givenspecs::Parameter;
/// #
/// struct Money(u64);
///
/// impl Parameter for Money {}
/// ```
pub trait Parameter: Sized + 'static {
    /// Returns the [`ParamKind`] of this type.
    #[must_use]
    fn kind() -> ParamKind {
        ParamKind::custom::<Self>()
    }

    /// Extracts this type out of the coerced [`Value`].
    ///
    /// # Errors
    ///
    /// If the [`Value`] holds some other type. This happens for custom types
    /// without any [`Converter`] registered, as their raw text is passed
    /// through unmodified.
    fn extract(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Custom(boxed) => {
                boxed.downcast::<Self>().map(|v| *v).map_err(|_| {
                    CoercionError::Mismatch {
                        expected: any::type_name::<Self>(),
                        actual: "converted value of another type",
                    }
                })
            }
            other => Err(CoercionError::Mismatch {
                expected: any::type_name::<Self>(),
                actual: other.type_name(),
            }),
        }
    }
}

/// Implements [`Parameter`] for a built-in type.
macro_rules! builtin_parameter {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl Parameter for $ty {
            fn kind() -> ParamKind {
                ParamKind::$variant
            }

            fn extract(value: Value) -> Result<Self, CoercionError> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(CoercionError::Mismatch {
                        expected: any::type_name::<Self>(),
                        actual: other.type_name(),
                    }),
                }
            }
        }
    )*};
}

builtin_parameter! {
    String => Text,
    bool => Bool,
    f64 => F64,
    f32 => F32,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    i16 => I16,
    u16 => U16,
    Table => Table,
}

/// Coerces the raw `argument` into a [`Value`] of the given `kind`.
///
/// Built-in kinds are parsed with their standard textual rules (`bool`
/// ignores case, numbers ignore surrounding whitespace). A custom kind is
/// handed to the matching [`Converter`], or passed through as raw text if
/// there is none.
///
/// # Errors
///
/// If parsing of a built-in kind or a [`Converter`] fails, or a [`Table`] is
/// passed where text is expected (and vice versa).
pub fn coerce(
    argument: Argument,
    kind: ParamKind,
    converters: &Converters,
) -> Result<Value, CoercionError> {
    let text = match argument {
        Argument::Text(text) => text,
        Argument::Table(table) => {
            return match kind {
                ParamKind::Table => Ok(Value::Table(table)),
                _ => Err(CoercionError::Mismatch {
                    expected: kind_name(kind),
                    actual: "Table",
                }),
            }
        }
    };

    Ok(match kind {
        ParamKind::Text => Value::Text(text),
        ParamKind::Bool => match text.trim().to_lowercase().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => {
                return Err(CoercionError::Parse {
                    value: text,
                    kind: "bool",
                    reason: "expected `true` or `false`".into(),
                })
            }
        },
        ParamKind::F64 => Value::F64(parse(&text, "f64")?),
        ParamKind::F32 => Value::F32(parse(&text, "f32")?),
        ParamKind::I32 => Value::I32(parse(&text, "i32")?),
        ParamKind::U32 => Value::U32(parse(&text, "u32")?),
        ParamKind::I64 => Value::I64(parse(&text, "i64")?),
        ParamKind::U64 => Value::U64(parse(&text, "u64")?),
        ParamKind::I16 => Value::I16(parse(&text, "i16")?),
        ParamKind::U16 => Value::U16(parse(&text, "u16")?),
        ParamKind::Custom { type_id, name } => {
            match converters.get(type_id) {
                Some(convert) => Value::Custom(convert(&text).map_err(|e| {
                    CoercionError::Converter { kind: name, reason: e.to_string() }
                })?),
                None => Value::Text(text),
            }
        }
        ParamKind::Table => {
            return Err(CoercionError::Mismatch {
                expected: "Table",
                actual: "String",
            })
        }
    })
}

/// Parses the given `text` as a number, ignoring surrounding whitespace.
fn parse<T>(text: &str, kind: &'static str) -> Result<T, CoercionError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    text.trim().parse().map_err(|e: T::Err| CoercionError::Parse {
        value: text.to_owned(),
        kind,
        reason: e.to_string(),
    })
}

/// Returns a `'static` name of the given [`ParamKind`].
const fn kind_name(kind: ParamKind) -> &'static str {
    match kind {
        ParamKind::Text => "String",
        ParamKind::Bool => "bool",
        ParamKind::F64 => "f64",
        ParamKind::F32 => "f32",
        ParamKind::I32 => "i32",
        ParamKind::U32 => "u32",
        ParamKind::I64 => "i64",
        ParamKind::U64 => "u64",
        ParamKind::I16 => "i16",
        ParamKind::U16 => "u16",
        ParamKind::Table => "Table",
        ParamKind::Custom { name, .. } => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Money(u64);

    impl Parameter for Money {}

    fn text(s: &str) -> Argument {
        Argument::Text(s.into())
    }

    #[test]
    fn parses_builtins() {
        let none = Converters::default();

        let v = coerce(text("42"), ParamKind::I32, &none).unwrap();
        assert_eq!(i32::extract(v).unwrap(), 42);

        let v = coerce(text("-1.5"), ParamKind::F64, &none).unwrap();
        assert_eq!(f64::extract(v).unwrap(), -1.5);

        let v = coerce(text("True"), ParamKind::Bool, &none).unwrap();
        assert!(bool::extract(v).unwrap());

        let v = coerce(text(" spaced "), ParamKind::Text, &none).unwrap();
        assert_eq!(String::extract(v).unwrap(), " spaced ");
    }

    #[test]
    fn overflow_and_sign_fail() {
        let none = Converters::default();

        assert!(matches!(
            coerce(text("70000"), ParamKind::U16, &none),
            Err(CoercionError::Parse { kind: "u16", .. }),
        ));
        assert!(matches!(
            coerce(text("-3"), ParamKind::U32, &none),
            Err(CoercionError::Parse { kind: "u32", .. }),
        ));
        assert!(coerce(text("yes"), ParamKind::Bool, &none).is_err());
    }

    #[test]
    fn custom_kind_uses_converter() {
        let mut converters = Converters::default();
        converters.insert(|s: &str| s.trim_start_matches('$').parse().map(Money));

        let v = coerce(text("$15"), Money::kind(), &converters).unwrap();

        assert_eq!(Money::extract(v).unwrap(), Money(15));
    }

    #[test]
    fn custom_kind_without_converter_passes_raw_text() {
        let v = coerce(text("$15"), Money::kind(), &Converters::default())
            .unwrap();

        assert!(matches!(&v, Value::Text(t) if t == "$15"));
        assert!(matches!(
            Money::extract(v),
            Err(CoercionError::Mismatch { actual: "String", .. }),
        ));
    }

    #[test]
    fn converter_failure_is_reported() {
        let mut converters = Converters::default();
        converters.insert(|s: &str| s.parse().map(Money));

        let err = coerce(text("lots"), Money::kind(), &converters).unwrap_err();

        assert!(matches!(err, CoercionError::Converter { .. }), "{err}");
    }

    #[test]
    fn tables_only_fit_table_kind() {
        let table = Table::new(["a"]).unwrap();
        let none = Converters::default();

        let v = coerce(Argument::Table(table.clone()), ParamKind::Table, &none)
            .unwrap();
        assert_eq!(Table::extract(v).unwrap(), table);

        assert!(coerce(Argument::Table(table), ParamKind::I32, &none).is_err());
        assert!(coerce(text("1"), ParamKind::Table, &none).is_err());
    }
}
