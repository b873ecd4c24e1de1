// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors of building and binding [`Table`]s.
//!
//! [`Table`]: super::Table

use derive_more::with_trait::{Display, Error};

/// Error of constructing a [`Table`](super::Table).
///
/// These are construction-time errors: whatever builds the table is expected
/// to abort.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum TableError {
    /// Headers are empty, blank, padded with whitespace or duplicated.
    #[display("Table should be initialized with valid headers, got {headers:?}")]
    InvalidHeaders {
        /// Rejected headers.
        #[error(not(source))]
        headers: Vec<String>,
    },

    /// Row doesn't provide exactly one value per header.
    #[display(
        "Row {row} has {actual} values, but the table has {expected} headers"
    )]
    RowWidth {
        /// Index the row would have been inserted at.
        #[error(not(source))]
        row: usize,

        /// Number of headers.
        expected: usize,

        /// Number of provided values.
        actual: usize,
    },
}

/// Error of binding a [`Table`](super::Table) to a user type.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum BindError {
    /// Target type has no property with such name.
    #[display("Unknown property: {property}")]
    UnknownProperty {
        /// Name of the missing property.
        #[error(not(source))]
        property: String,
    },

    /// Property exists, but the value cannot be parsed into its type.
    #[display("Invalid value `{value}` for property {property}: {reason}")]
    InvalidValue {
        /// Name of the property.
        #[error(not(source))]
        property: String,

        /// Rejected raw value.
        value: String,

        /// Parsing error description.
        reason: String,
    },

    /// Column-major row misses its property name or value cell.
    #[display("Row {row} must consist of a property name and a value")]
    MalformedRow {
        /// Index of the malformed row.
        #[error(not(source))]
        row: usize,
    },
}
