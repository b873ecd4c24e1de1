// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors of matching and invoking steps.

use derive_more::with_trait::{Display, Error, From};
use itertools::Itertools as _;

use super::{HashableRegex, Location};
use crate::parameter::CoercionError;

/// Error of resolving or invoking a step.
#[derive(Clone, Debug, Display, Error, From)]
pub enum StepError {
    /// No definition matches the step.
    #[display("no step for {keyword} -> {text}")]
    #[from(ignore)]
    NotFound {
        /// Resolved keyword of the step.
        #[error(not(source))]
        keyword: String,

        /// Step text.
        text: String,
    },

    /// More than one definition matches the step.
    #[display("multiple step implementations founds for {keyword} -> {text}")]
    #[from(ignore)]
    Ambiguous {
        /// Resolved keyword of the step.
        #[error(not(source))]
        keyword: String,

        /// Step text.
        text: String,

        /// Patterns and [`Location`]s of all the matching definitions.
        possible_matches: Vec<(HashableRegex, Location)>,
    },

    /// Step arguments cannot be coerced into the handler parameters.
    #[display("{_0}")]
    Coercion(CoercionError),

    /// Step body returned an error or panicked.
    #[display("{message}")]
    #[from(ignore)]
    Failed {
        /// Error message of the step body.
        #[error(not(source))]
        message: String,
    },
}

impl StepError {
    /// Creates a [`StepError::Failed`] out of the given step body `error`.
    #[must_use]
    pub fn failed(error: impl Into<anyhow::Error>) -> Self {
        Self::Failed { message: error.into().to_string() }
    }

    /// Describes all the possible matches of a [`StepError::Ambiguous`], one
    /// per line, or returns [`None`] for other errors.
    #[must_use]
    pub fn possible_matches(&self) -> Option<String> {
        let Self::Ambiguous { possible_matches, .. } = self else {
            return None;
        };
        Some(
            possible_matches
                .iter()
                .sorted()
                .map(|(re, loc)| format!("{re} --> {loc}"))
                .join("\n"),
        )
    }
}
