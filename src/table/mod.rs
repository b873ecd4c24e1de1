// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Column-addressable, order-preserving [`Table`] of step data.
//!
//! A [`Table`] is built incrementally with [`Table::add_row()`] and then read
//! through [`TableRow`] views. Every cell is addressed by its row index and
//! its header, and both rows and columns keep their insertion order.

mod binder;
mod error;
mod row;

use std::fmt;

use itertools::Itertools as _;
use linked_hash_map::LinkedHashMap;

pub use self::{
    binder::{
        parse_property, Comparator, Comparison, Ext, Mode, TableBinding,
        Transform,
    },
    error::{BindError, TableError},
    row::{Column, TableRow},
};

/// Address of a single cell inside a [`Table`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
struct CellKey {
    /// Index of the row, in insertion order.
    row: usize,

    /// Index of the header the cell belongs to.
    column: usize,
}

/// Ordered tabular values with validated headers.
///
/// # Example
///
/// ```rust
/// use givenspecs::Table;
///
/// let mut table = Table::new(["name", "age"]).unwrap();
/// table.add_row(["Alice", "30"]).unwrap();
///
/// let row = table.rows().next().unwrap();
/// assert_eq!(row.get("name"), Some("Alice"));
/// assert_eq!(row.get(1), Some("30"));
/// assert_eq!(row.get("email"), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    /// Unique, trimmed, non-blank column names.
    headers: Vec<String>,

    /// Cell values keyed by their (row, column) address.
    cells: LinkedHashMap<CellKey, String>,

    /// Number of rows added so far.
    row_count: usize,
}

impl Table {
    /// Creates a new empty [`Table`] with the given `headers`.
    ///
    /// # Errors
    ///
    /// With [`TableError::InvalidHeaders`] if `headers` is empty, contains a
    /// blank entry, an entry with leading or trailing whitespace, or the same
    /// entry twice.
    pub fn new<I, S>(headers: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers = headers.into_iter().map(Into::into).collect::<Vec<_>>();

        let valid = !headers.is_empty()
            && headers
                .iter()
                .all(|h| !h.trim().is_empty() && h.trim() == h)
            && headers.iter().all_unique();
        if !valid {
            return Err(TableError::InvalidHeaders { headers });
        }

        Ok(Self { headers, cells: LinkedHashMap::new(), row_count: 0 })
    }

    /// Creates a [`Table`] out of raw rows, treating the first one as the
    /// header row.
    ///
    /// # Errors
    ///
    /// If `rows` is empty, the header row is invalid, or some row's width
    /// differs from the header row's one.
    pub fn from_raw<R, I, S>(rows: R) -> Result<Self, TableError>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rows = rows.into_iter();
        let mut table = match rows.next() {
            Some(headers) => Self::new(headers)?,
            None => {
                return Err(TableError::InvalidHeaders { headers: vec![] })
            }
        };
        for row in rows {
            table.add_row(row)?;
        }
        Ok(table)
    }

    /// Appends a row whose values map positionally onto the headers.
    ///
    /// # Errors
    ///
    /// With [`TableError::RowWidth`] if the number of `values` differs from
    /// the number of headers. The [`Table`] is left untouched in such case.
    pub fn add_row<I, S>(&mut self, values: I) -> Result<(), TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect::<Vec<_>>();
        if values.len() != self.headers.len() {
            return Err(TableError::RowWidth {
                row: self.row_count,
                expected: self.headers.len(),
                actual: values.len(),
            });
        }

        let row = self.row_count;
        for (column, value) in values.into_iter().enumerate() {
            _ = self.cells.insert(CellKey { row, column }, value);
        }
        self.row_count += 1;

        Ok(())
    }

    /// Returns the headers of this [`Table`] in their declaration order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns the number of (non-header) rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.row_count
    }

    /// Indicates whether this [`Table`] has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Returns the row at the given `index`, if any.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<TableRow<'_>> {
        (index < self.row_count).then(|| self.materialize(index))
    }

    /// Iterates over the rows in their insertion order.
    ///
    /// Rows are materialized lazily, one per iteration step.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = TableRow<'_>> + '_ {
        (0..self.row_count).map(|index| self.materialize(index))
    }

    /// Rewrites every cell value in place with the given `replace` function.
    ///
    /// Headers and the order of rows and columns are preserved.
    pub fn apply_replacements<F>(&mut self, replace: F)
    where
        F: Fn(&str) -> String,
    {
        for (_, value) in self.cells.iter_mut() {
            let replaced = replace(value.as_str());
            *value = replaced;
        }
    }

    /// Returns all the values as raw rows, the header row going first.
    #[must_use]
    pub fn to_raw(&self) -> Vec<Vec<String>> {
        std::iter::once(self.headers.clone())
            .chain(self.rows().map(|r| {
                r.values().iter().map(|v| (*v).to_owned()).collect()
            }))
            .collect()
    }

    /// Builds a [`TableRow`] view of the row at the given `index`.
    fn materialize(&self, index: usize) -> TableRow<'_> {
        let values = (0..self.headers.len())
            .map(|column| {
                self.cells
                    .get(&CellKey { row: index, column })
                    .map_or("", String::as_str)
            })
            .collect();
        TableRow::new(&self.headers, values)
    }
}

impl TryFrom<Vec<Vec<String>>> for Table {
    type Error = TableError;

    fn try_from(rows: Vec<Vec<String>>) -> Result<Self, Self::Error> {
        Self::from_raw(rows)
    }
}

impl TryFrom<&gherkin::Table> for Table {
    type Error = TableError;

    fn try_from(table: &gherkin::Table) -> Result<Self, Self::Error> {
        Self::from_raw(table.rows.iter().map(|r| r.iter().map(String::as_str)))
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = self.to_raw();
        let widths = (0..self.headers.len())
            .map(|c| {
                raw.iter().map(|r| r[c].chars().count()).max().unwrap_or(0)
            })
            .collect::<Vec<_>>();

        for row in &raw {
            let cells = row
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .join(" | ");
            writeln!(f, "| {cells} |")?;
        }
        Ok(())
    }
}
