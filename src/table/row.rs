// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Single row view of a [`Table`].
//!
//! [`Table`]: super::Table

/// Read-only view of one row, bound to its owning [`Table`]'s headers.
///
/// Lookups by a position or a header never fail: an out-of-range index or an
/// unknown header yields [`None`], which callers treat as "no opinion".
///
/// [`Table`]: super::Table
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableRow<'t> {
    /// Headers of the owning [`Table`](super::Table).
    headers: &'t [String],

    /// Values of this row, one per header.
    values: Vec<&'t str>,
}

impl<'t> TableRow<'t> {
    /// Creates a new [`TableRow`] view.
    pub(super) const fn new(headers: &'t [String], values: Vec<&'t str>) -> Self {
        Self { headers, values }
    }

    /// Returns the value of the given [`Column`], if it exists.
    ///
    /// ```rust
    /// use givenspecs::Table;
    ///
    /// let table = Table::from_raw([["field", "value"], ["name", "Bob"]]).unwrap();
    /// let row = table.row(0).unwrap();
    ///
    /// assert_eq!(row.get(0), Some("name"));
    /// assert_eq!(row.get("value"), Some("Bob"));
    /// assert_eq!(row.get(7), None);
    /// ```
    #[must_use]
    pub fn get<C: Column>(&self, column: C) -> Option<&'t str> {
        column.position(self.headers).and_then(|i| self.values.get(i).copied())
    }

    /// Returns the headers this row is bound to.
    #[must_use]
    pub const fn headers(&self) -> &'t [String] {
        self.headers
    }

    /// Returns the values of this row in header order.
    #[must_use]
    pub fn values(&self) -> &[&'t str] {
        &self.values
    }

    /// Iterates over `(header, value)` pairs of this row.
    pub fn iter(&self) -> impl Iterator<Item = (&'t str, &'t str)> + '_ {
        self.headers.iter().map(String::as_str).zip(self.values.iter().copied())
    }
}

/// Way to address a cell inside a [`TableRow`]: either by its position or by
/// its header.
pub trait Column {
    /// Resolves this [`Column`] into a position among the given `headers`.
    fn position(&self, headers: &[String]) -> Option<usize>;
}

impl Column for usize {
    fn position(&self, headers: &[String]) -> Option<usize> {
        (*self < headers.len()).then_some(*self)
    }
}

impl Column for &str {
    fn position(&self, headers: &[String]) -> Option<usize> {
        headers.iter().position(|h| h == *self)
    }
}

impl Column for &String {
    fn position(&self, headers: &[String]) -> Option<usize> {
        self.as_str().position(headers)
    }
}

#[cfg(test)]
mod tests {
    use crate::Table;

    #[test]
    fn looks_up_by_position_and_header() {
        let table =
            Table::from_raw([["a", "b", "c"], ["1", "2", "3"]]).unwrap();
        let row = table.row(0).unwrap();

        assert_eq!(row.get(2), Some("3"));
        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.get(&"b".to_owned()), Some("2"));
        assert_eq!(row.get(3), None);
        assert_eq!(row.get("d"), None);
    }

    #[test]
    fn iterates_over_pairs() {
        let table = Table::from_raw([["a", "b"], ["1", "2"]]).unwrap();
        let row = table.row(0).unwrap();

        assert_eq!(row.iter().collect::<Vec<_>>(), [("a", "1"), ("b", "2")]);
        assert_eq!(row.values(), ["1", "2"]);
    }
}
