// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Binding of [`Table`] rows to user types.
//!
//! Two orientations are supported (see [`Mode`]):
//! - [`Mode::Rows`]: every row describes one object, headers being its
//!   property names;
//! - [`Mode::Columns`]: every row is a `(property, value)` pair of a single
//!   object.
//!
//! Comparison walks the same orientation as population, but stops at the
//! first mismatching property instead of assigning it.

use std::{fmt, str::FromStr};

use derive_more::with_trait::Display;
use sealed::sealed;

use super::{BindError, Table, TableRow};

/// User type whose properties can be populated from and compared against
/// [`Table`] cells.
///
/// Usually implemented with the [`table_binding!`] macro, which maps every
/// listed field through its [`FromStr`] and [`fmt::Display`] implementations.
///
/// [`table_binding!`]: crate::table_binding
pub trait TableBinding {
    /// Assigns the raw `value` to the given `property`.
    ///
    /// # Errors
    ///
    /// If there is no such property, or the `value` is not valid for it.
    fn set_property(
        &mut self,
        property: &str,
        value: &str,
    ) -> Result<(), BindError>;

    /// Returns the textual representation of the given `property`, or
    /// [`None`] if there is no such property.
    fn property(&self, property: &str) -> Option<String>;
}

/// Per-property override of the assignment: receives the object under
/// construction and the raw cell value.
pub type Transform<'f, T> = (&'f str, &'f dyn Fn(&mut T, &str));

/// Per-property override of the comparison: receives the live object and the
/// expected cell value, and returns whether it matched along with the actual
/// value to display.
pub type Comparator<'f, T> = (&'f str, &'f dyn Fn(&T, &str) -> (bool, String));

/// Orientation of a [`Table`] being bound.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Mode {
    /// One object per row, headers are property names.
    #[default]
    Rows,

    /// Every row is a `(property, value)` pair of a single object.
    Columns,
}

/// Outcome of comparing a [`Table`] against objects.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[display("{}", if *result { "match" } else { message.as_str() })]
pub struct Comparison {
    /// Whether everything matched.
    pub result: bool,

    /// Description of the first mismatch, empty on success.
    pub message: String,
}

impl Comparison {
    /// Creates a successful [`Comparison`].
    #[must_use]
    pub const fn matched() -> Self {
        Self { result: true, message: String::new() }
    }

    /// Creates a failed [`Comparison`] with the given `message`.
    #[must_use]
    pub fn mismatch(message: impl Into<String>) -> Self {
        Self { result: false, message: message.into() }
    }

    /// Indicates whether this [`Comparison`] succeeded.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        self.result
    }
}

/// Extension of a [`Table`] binding it to [`TableBinding`] types.
#[sealed]
pub trait Ext {
    /// Creates a single object out of this [`Table`] in the [`Mode::Rows`]
    /// orientation, using only its first row.
    ///
    /// Returns [`None`] if this [`Table`] has no rows.
    ///
    /// # Errors
    ///
    /// If some header doesn't name a property, or its value is invalid.
    fn create_instance<T>(&self) -> Result<Option<T>, BindError>
    where
        T: TableBinding + Default,
    {
        self.create_instance_with(&[], Mode::Rows)
    }

    /// Creates a single object out of this [`Table`] in the given [`Mode`],
    /// applying the given `transforms` instead of plain assignment for the
    /// properties they name.
    ///
    /// Returns [`None`] if this [`Table`] has no rows.
    ///
    /// # Errors
    ///
    /// If some property is unknown, its value is invalid, or a
    /// [`Mode::Columns`] row is malformed.
    fn create_instance_with<T>(
        &self,
        transforms: &[Transform<'_, T>],
        mode: Mode,
    ) -> Result<Option<T>, BindError>
    where
        T: TableBinding + Default;

    /// Creates one object per row of this [`Table`], preserving the order.
    ///
    /// # Errors
    ///
    /// If some header doesn't name a property, or its value is invalid.
    fn create_set<T>(&self) -> Result<Vec<T>, BindError>
    where
        T: TableBinding + Default,
    {
        self.create_set_with(&[])
    }

    /// Same as [`Ext::create_set()`], but applying the given `transforms`.
    ///
    /// # Errors
    ///
    /// If some header doesn't name a property, or its value is invalid.
    fn create_set_with<T>(
        &self,
        transforms: &[Transform<'_, T>],
    ) -> Result<Vec<T>, BindError>
    where
        T: TableBinding + Default;

    /// Compares the first row of this [`Table`] against the given `instance`.
    ///
    /// # Errors
    ///
    /// If some header doesn't name a property of the `instance`.
    fn compare_to_instance<T>(&self, instance: &T) -> Result<Comparison, BindError>
    where
        T: TableBinding,
    {
        self.compare_to_instance_with(instance, &[], Mode::Rows)
    }

    /// Compares this [`Table`] against the given `instance` in the given
    /// [`Mode`], using the given `comparators` for the properties they name.
    ///
    /// # Errors
    ///
    /// If some property is unknown and has no comparator, or a
    /// [`Mode::Columns`] row is malformed.
    fn compare_to_instance_with<T>(
        &self,
        instance: &T,
        comparators: &[Comparator<'_, T>],
        mode: Mode,
    ) -> Result<Comparison, BindError>
    where
        T: TableBinding;

    /// Compares every row of this [`Table`] against the object with the same
    /// index in the given `set`.
    ///
    /// # Errors
    ///
    /// If some header doesn't name a property of the objects.
    fn compare_to_set<T>(&self, set: &[T]) -> Result<Comparison, BindError>
    where
        T: TableBinding,
    {
        self.compare_to_set_with(set, &[])
    }

    /// Same as [`Ext::compare_to_set()`], but using the given `comparators`.
    ///
    /// # Errors
    ///
    /// If some property is unknown and has no comparator.
    fn compare_to_set_with<T>(
        &self,
        set: &[T],
        comparators: &[Comparator<'_, T>],
    ) -> Result<Comparison, BindError>
    where
        T: TableBinding;
}

#[sealed]
impl Ext for Table {
    fn create_instance_with<T>(
        &self,
        transforms: &[Transform<'_, T>],
        mode: Mode,
    ) -> Result<Option<T>, BindError>
    where
        T: TableBinding + Default,
    {
        let Some(first) = self.row(0) else {
            return Ok(None);
        };

        let obj = match mode {
            Mode::Rows => object_from_row(&first, transforms)?,
            Mode::Columns => {
                let mut obj = T::default();
                for (i, row) in self.rows().enumerate() {
                    let (property, value) = pair(&row, i)?;
                    assign(&mut obj, transforms, property, value)?;
                }
                obj
            }
        };
        Ok(Some(obj))
    }

    fn create_set_with<T>(
        &self,
        transforms: &[Transform<'_, T>],
    ) -> Result<Vec<T>, BindError>
    where
        T: TableBinding + Default,
    {
        self.rows().map(|row| object_from_row(&row, transforms)).collect()
    }

    fn compare_to_instance_with<T>(
        &self,
        instance: &T,
        comparators: &[Comparator<'_, T>],
        mode: Mode,
    ) -> Result<Comparison, BindError>
    where
        T: TableBinding,
    {
        let Some(first) = self.row(0) else {
            return Ok(Comparison::mismatch("Empty table"));
        };

        match mode {
            Mode::Rows => compare_row(&first, instance, comparators),
            Mode::Columns => {
                for (i, row) in self.rows().enumerate() {
                    let (property, expected) = pair(&row, i)?;
                    let (matched, actual) =
                        compare(instance, comparators, property, expected)?;
                    if !matched {
                        return Ok(mismatch(property, &actual, expected));
                    }
                }
                Ok(Comparison::matched())
            }
        }
    }

    fn compare_to_set_with<T>(
        &self,
        set: &[T],
        comparators: &[Comparator<'_, T>],
    ) -> Result<Comparison, BindError>
    where
        T: TableBinding,
    {
        if self.len() != set.len() {
            return Ok(Comparison::mismatch("Number of items mismatch"));
        }
        if self.is_empty() {
            return Ok(Comparison::mismatch("Empty table"));
        }

        for (i, (row, instance)) in self.rows().zip(set).enumerate() {
            let cmp = compare_row(&row, instance, comparators)?;
            if !cmp.is_match() {
                return Ok(Comparison::mismatch(format!(
                    "Index: {i}, {}",
                    cmp.message,
                )));
            }
        }
        Ok(Comparison::matched())
    }
}

#[doc(hidden)]
/// Parses the raw `value` of the given `property`.
///
/// Used by the code generated with the [`table_binding!`] macro.
///
/// # Errors
///
/// With [`BindError::InvalidValue`] if the `value` cannot be parsed.
///
/// [`table_binding!`]: crate::table_binding
pub fn parse_property<T>(property: &str, value: &str) -> Result<T, BindError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.parse().map_err(|e: T::Err| BindError::InvalidValue {
        property: property.to_owned(),
        value: value.to_owned(),
        reason: e.to_string(),
    })
}

/// Builds a new object out of a single row in the [`Mode::Rows`]
/// orientation.
fn object_from_row<T>(
    row: &TableRow<'_>,
    transforms: &[Transform<'_, T>],
) -> Result<T, BindError>
where
    T: TableBinding + Default,
{
    let mut obj = T::default();
    for (property, value) in row.iter() {
        assign(&mut obj, transforms, property, value)?;
    }
    Ok(obj)
}

/// Compares a single row in the [`Mode::Rows`] orientation.
fn compare_row<T: TableBinding>(
    row: &TableRow<'_>,
    instance: &T,
    comparators: &[Comparator<'_, T>],
) -> Result<Comparison, BindError> {
    for (property, expected) in row.iter() {
        let (matched, actual) =
            compare(instance, comparators, property, expected)?;
        if !matched {
            return Ok(mismatch(property, &actual, expected));
        }
    }
    Ok(Comparison::matched())
}

/// Splits a [`Mode::Columns`] row into its property name and value.
fn pair<'t>(
    row: &TableRow<'t>,
    index: usize,
) -> Result<(&'t str, &'t str), BindError> {
    row.get(0)
        .zip(row.get(1))
        .ok_or(BindError::MalformedRow { row: index })
}

/// Assigns the `value` to the `property`, preferring a matching transform.
fn assign<T: TableBinding>(
    obj: &mut T,
    transforms: &[Transform<'_, T>],
    property: &str,
    value: &str,
) -> Result<(), BindError> {
    match transforms.iter().find(|(name, _)| *name == property) {
        Some((_, transform)) => {
            transform(obj, value);
            Ok(())
        }
        None => obj.set_property(property, value),
    }
}

/// Compares the `property` with the `expected` value, preferring a matching
/// comparator.
fn compare<T: TableBinding>(
    obj: &T,
    comparators: &[Comparator<'_, T>],
    property: &str,
    expected: &str,
) -> Result<(bool, String), BindError> {
    if let Some((_, comparator)) =
        comparators.iter().find(|(name, _)| *name == property)
    {
        return Ok(comparator(obj, expected));
    }

    let actual = obj.property(property).ok_or_else(|| {
        BindError::UnknownProperty { property: property.to_owned() }
    })?;
    let matched = actual == expected;
    Ok((matched, actual))
}

/// Formats the message of a single property mismatch.
fn mismatch(property: &str, actual: &str, expected: &str) -> Comparison {
    Comparison::mismatch(format!(
        "Property: {property}, Is: {actual}, Expected: {expected}",
    ))
}

/// Implements [`TableBinding`] for a struct by listing its bindable fields.
///
/// Every listed field is assigned through its [`FromStr`](std::str::FromStr)
/// implementation and compared through its [`Display`](std::fmt::Display)
/// one.
///
/// ```rust
/// use givenspecs::{table_binding, Table, TableExt as _};
///
/// #[derive(Debug, Default)]
/// struct Person {
///     name: String,
///     age: u32,
/// }
///
/// table_binding!(Person { name, age });
///
/// let table = Table::from_raw([["name", "age"], ["Alice", "30"]]).unwrap();
/// let person: Person = table.create_instance().unwrap().unwrap();
/// assert_eq!(person.age, 30);
/// ```
#[macro_export]
macro_rules! table_binding {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::TableBinding for $ty {
            fn set_property(
                &mut self,
                property: &str,
                value: &str,
            ) -> ::std::result::Result<(), $crate::BindError> {
                match property {
                    $(
                        ::std::stringify!($field) => {
                            self.$field =
                                $crate::table::parse_property(property, value)?;
                            Ok(())
                        }
                    )*
                    _ => Err($crate::BindError::UnknownProperty {
                        property: property.to_owned(),
                    }),
                }
            }

            fn property(
                &self,
                property: &str,
            ) -> ::std::option::Option<::std::string::String> {
                match property {
                    $(
                        ::std::stringify!($field) => Some(
                            ::std::string::ToString::to_string(&self.$field),
                        ),
                    )*
                    _ => None,
                }
            }
        }
    };
}
