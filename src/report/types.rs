// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Serializable nodes of the feature → scenario → step report tree.

use base64::Engine as _;
use derive_more::with_trait::Display;
use mime::Mime;
use once_cell::sync::Lazy;
use serde::{Serialize, Serializer};

use crate::{step::Location, Table};

/// [`base64`] encoded data.
#[derive(Clone, Debug, Display, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Base64(String);

impl Base64 {
    /// Used [`base64::engine`].
    const ENGINE: base64::engine::GeneralPurpose =
        base64::engine::general_purpose::STANDARD;

    /// Encodes `bytes` as [`base64`].
    #[must_use]
    pub fn encode(bytes: impl AsRef<[u8]>) -> Self {
        Self(Self::ENGINE.encode(bytes))
    }

    /// Decodes this [`base64`] encoded data.
    ///
    /// # Errors
    ///
    /// Never in practice, as [`Base64::encode()`] is the only constructor.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        Self::ENGINE.decode(&self.0)
    }
}

/// Named blob attached to a [`Step`] by its body.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Embedding {
    /// [`base64`] encoded data.
    pub data: Base64,

    /// [`Mime`] of this [`Embedding::data`].
    #[serde(serialize_with = "serialize_mime")]
    pub mime_type: Mime,

    /// Optional name of the [`Embedding`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Embedding {
    /// Creates a new unnamed [`Embedding`].
    #[must_use]
    pub fn new(data: impl AsRef<[u8]>, mime_type: Mime) -> Self {
        Self { data: Base64::encode(data), mime_type, name: None }
    }

    /// Creates an [`Embedding`] out of a plain log message.
    #[must_use]
    pub fn from_log(msg: impl AsRef<str>) -> Self {
        /// [`Mime`] of log message [`Embedding`]s.
        static LOG_MIME: Lazy<Mime> = Lazy::new(|| {
            "text/x.cucumber.log+plain"
                .parse()
                .unwrap_or_else(|_| unreachable!("valid MIME"))
        });

        Self::new(msg.as_ref(), LOG_MIME.clone())
    }
}

/// Serializes a [`Mime`] as its textual representation.
fn serialize_mime<S: Serializer>(
    mime: &Mime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(mime)
}

/// Tag of a [`Feature`] or a [`Scenario`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Tag {
    /// Name of this [`Tag`], including the leading `@`.
    pub name: String,

    /// Line number of this [`Tag`] in a `.feature` file.
    pub line: usize,
}

/// Possible statuses of an executed [`Step`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Step has been matched and succeeded.
    #[display("passed")]
    Passed,

    /// Step body failed or its arguments cannot be coerced.
    #[display("failed")]
    Failed,

    /// Step hasn't been attempted because an earlier one didn't pass.
    #[display("skipped")]
    Skipped,

    /// Step matched more than one definition.
    #[display("ambiguous")]
    Ambiguous,

    /// Scenario is explicitly marked as undefined.
    #[display("undefined")]
    Undefined,

    /// No definition matches the step.
    #[display("pending")]
    Pending,
}

/// Result of running a [`Step`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RunResult {
    /// [`Status`] of this running result.
    pub status: Status,

    /// Execution time in nanoseconds.
    pub duration: u128,

    /// Error message of a not passed [`Step`] (if any).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl RunResult {
    /// Creates a [`RunResult`] that took no time and has no error message.
    #[must_use]
    pub const fn instant(status: Status) -> Self {
        Self { status, duration: 0, error_message: None }
    }
}

/// Row of a [`Argument::Table`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Row {
    /// Cell values of this [`Row`].
    pub cells: Vec<String>,
}

/// Multiline argument of a [`Step`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Argument {
    /// Docstring of the [`Step`].
    DocString {
        /// Text of the docstring.
        content: String,
    },

    /// Data table of the [`Step`].
    Table {
        /// Rows of the table, the header row going first.
        rows: Vec<Row>,
    },
}

impl From<&Table> for Argument {
    fn from(table: &Table) -> Self {
        Self::Table {
            rows: table
                .to_raw()
                .into_iter()
                .map(|cells| Row { cells })
                .collect(),
        }
    }
}

/// Definition a [`Step`] has been matched with.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Match {
    /// Source [`Location`] of the definition's registration.
    pub location: String,
}

impl From<Location> for Match {
    fn from(loc: Location) -> Self {
        Self { location: loc.to_string() }
    }
}

/// Executed step.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Step {
    /// Resolved keyword followed by a space, like `Given `.
    pub keyword: String,

    /// Line number of this [`Step`] in a `.feature` file.
    pub line: usize,

    /// Step text after the placeholder substitution.
    pub name: String,

    /// Docstring and table of this [`Step`].
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Argument>,

    /// Definition this [`Step`] has been matched with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#match: Option<Match>,

    /// [`RunResult`] of this [`Step`].
    pub result: RunResult,

    /// [`Embedding`]s attached while running this [`Step`].
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeddings: Vec<Embedding>,
}

/// Executed scenario (an element of a [`Feature`]).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scenario {
    /// Identifier of this [`Scenario`]. Doesn't have to be unique.
    pub id: String,

    /// Keyword, always `Scenario`.
    pub keyword: String,

    /// Line number of this [`Scenario`] in a `.feature` file.
    pub line: usize,

    /// Display name of this [`Scenario`].
    pub name: String,

    /// [`Tag`]s of this [`Scenario`] and its examples table.
    pub tags: Vec<Tag>,

    /// Type of this [`Scenario`], always `scenario`.
    pub r#type: &'static str,

    /// Executed [`Step`]s.
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Creates a new [`Scenario`] without any [`Step`]s.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        line: usize,
        tags: Vec<Tag>,
    ) -> Self {
        Self {
            id: id.into(),
            keyword: "Scenario".into(),
            line,
            name: name.into(),
            tags,
            r#type: "scenario",
            steps: vec![],
        }
    }
}

/// Executed feature.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Feature {
    /// Keyword, always `Feature`.
    pub keyword: String,

    /// Name of this [`Feature`].
    pub name: String,

    /// Line number of this [`Feature`] in a `.feature` file.
    pub line: usize,

    /// Identifier of this [`Feature`], unique across a report.
    pub id: String,

    /// [`Tag`]s of this [`Feature`].
    pub tags: Vec<Tag>,

    /// Path to the `.feature` file, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Executed [`Scenario`]s.
    pub elements: Vec<Scenario>,
}

impl Feature {
    /// Creates a new [`Feature`] without any [`Scenario`]s.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        line: usize,
        tags: Vec<Tag>,
        uri: Option<String>,
    ) -> Self {
        Self {
            keyword: "Feature".into(),
            name: name.into(),
            line,
            id: id.into(),
            tags,
            uri,
            elements: vec![],
        }
    }
}
