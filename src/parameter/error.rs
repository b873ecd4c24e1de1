// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors of coercing step arguments.

use derive_more::with_trait::{Display, Error};

/// Error of coercing a raw step argument into a handler parameter.
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
pub enum CoercionError {
    /// Raw text cannot be parsed into a built-in type.
    #[display("Cannot parse `{value}` as `{kind}`: {reason}")]
    Parse {
        /// Raw text.
        #[error(not(source))]
        value: String,

        /// Name of the target type.
        kind: &'static str,

        /// Description of the parsing failure.
        reason: String,
    },

    /// Registered converter failed.
    #[display("Converter of `{kind}` failed: {reason}")]
    Converter {
        /// Name of the target type.
        #[error(not(source))]
        kind: &'static str,

        /// Description of the converter failure.
        reason: String,
    },

    /// Coerced value doesn't fit the declared parameter type.
    #[display("Expected `{expected}` parameter, but got `{actual}`")]
    Mismatch {
        /// Name of the declared parameter type.
        #[error(not(source))]
        expected: &'static str,

        /// Name of the provided value type.
        actual: &'static str,
    },

    /// Number of available arguments differs from the number of declared
    /// parameters.
    #[display(
        "Step handler declares {expected} parameters, but {actual} arguments \
         are available"
    )]
    Arity {
        /// Number of declared parameters.
        #[error(not(source))]
        expected: usize,

        /// Number of available arguments.
        actual: usize,
    },
}
