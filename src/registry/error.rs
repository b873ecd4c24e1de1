// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors of building a [`Registry`](super::Registry).

use derive_more::with_trait::{Display, Error};

use crate::step::Location;

/// Error of building a [`Registry`](super::Registry).
#[derive(Clone, Debug, Display, Error)]
pub enum RegistryError {
    /// Step pattern is not a valid regular expression.
    #[display("Invalid step pattern `{pattern}` at {location}: {source}")]
    InvalidPattern {
        /// Rejected pattern.
        pattern: String,

        /// [`Location`] of the registration.
        location: Location,

        /// Compilation error.
        source: regex::Error,
    },
}
