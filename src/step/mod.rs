// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step definitions: their kinds, patterns and type-erased handlers.
//!
//! - [`handler`]: typed handler functions and their erasure
//! - [`error`]: errors of matching and invoking steps
//! - [`location`]: source location of a step definition
//! - [`regex`]: hashable regex wrapper

pub mod error;
pub mod handler;
pub mod location;
pub mod regex;

use derive_more::with_trait::Display;

pub use self::{
    error::StepError,
    handler::{Binding, Bound, Handler, StepOutput, Unbound},
    location::Location,
    regex::HashableRegex,
};

/// Kind of a step definition.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Kind {
    /// Matches [Given] steps only.
    ///
    /// [Given]: https://cucumber.io/docs/gherkin/reference#given
    #[display("Given")]
    Given,

    /// Matches [When] steps only.
    ///
    /// [When]: https://cucumber.io/docs/gherkin/reference#when
    #[display("When")]
    When,

    /// Matches [Then] steps only.
    ///
    /// [Then]: https://cucumber.io/docs/gherkin/reference#then
    #[display("Then")]
    Then,

    /// Matches steps of any kind.
    #[display("Step")]
    Any,
}

impl Kind {
    /// Indicates whether a definition of this [`Kind`] is a candidate for a
    /// step resolved to the given concrete `kind`.
    #[must_use]
    pub fn accepts(self, kind: Self) -> bool {
        self == Self::Any || self == kind
    }
}

/// Keyword a step is written with in a `.feature` file.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Keyword {
    /// `Given`.
    #[display("Given")]
    Given,

    /// `When`.
    #[display("When")]
    When,

    /// `Then`.
    #[display("Then")]
    Then,

    /// `And` (or `*`), continuing the previous step's kind.
    #[display("And")]
    And,

    /// `But`, continuing the previous step's kind.
    #[display("But")]
    But,
}

impl Keyword {
    /// Parses the given raw `keyword`, ignoring surrounding whitespace and
    /// letter case.
    #[must_use]
    pub fn parse(keyword: &str) -> Option<Self> {
        let keyword = keyword.trim();
        [
            ("given", Self::Given),
            ("when", Self::When),
            ("then", Self::Then),
            ("and", Self::And),
            ("*", Self::And),
            ("but", Self::But),
        ]
        .into_iter()
        .find_map(|(raw, kw)| raw.eq_ignore_ascii_case(keyword).then_some(kw))
    }

    /// Returns the concrete [`Kind`] of this [`Keyword`], or [`None`] if it
    /// depends on the previous step.
    #[must_use]
    pub const fn kind(self) -> Option<Kind> {
        match self {
            Self::Given => Some(Kind::Given),
            Self::When => Some(Kind::When),
            Self::Then => Some(Kind::Then),
            Self::And | Self::But => None,
        }
    }
}
