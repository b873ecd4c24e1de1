// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Already parsed `.feature` document.
//!
//! This is the minimal shape of a parsed document the runtime consumes.
//! Documents parsed by the [`gherkin`] crate are adapted via [`From`].

use std::path::PathBuf;

/// Parsed feature.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Feature {
    /// Keyword, like `Feature`.
    pub keyword: String,

    /// Name of this [`Feature`].
    pub name: String,

    /// Line this [`Feature`] starts at.
    pub line: usize,

    /// Path to the `.feature` file, if known.
    pub uri: Option<PathBuf>,

    /// [`Tag`]s of this [`Feature`].
    pub tags: Vec<Tag>,

    /// Steps of the background, run before every scenario.
    pub background: Vec<Step>,

    /// [`Scenario`]s of this [`Feature`].
    pub scenarios: Vec<Scenario>,
}

/// Parsed scenario or scenario outline.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Scenario {
    /// Keyword, like `Scenario` or `Scenario Outline`.
    pub keyword: String,

    /// Name of this [`Scenario`].
    pub name: String,

    /// Line this [`Scenario`] starts at.
    pub line: usize,

    /// [`Tag`]s of this [`Scenario`].
    pub tags: Vec<Tag>,

    /// [`Step`]s of this [`Scenario`].
    pub steps: Vec<Step>,

    /// [`Examples`] tables, making this [`Scenario`] an outline.
    pub examples: Vec<Examples>,
}

/// Parsed step.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Step {
    /// Raw keyword, like `Given ` or `* `.
    pub keyword: String,

    /// Text following the keyword.
    pub text: String,

    /// Line of this [`Step`].
    pub line: usize,

    /// Multiline text argument.
    pub docstring: Option<String>,

    /// Raw table argument, the header row going first.
    pub table: Option<Vec<Vec<String>>>,
}

/// Parsed examples table of a scenario outline.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Examples {
    /// Name of this [`Examples`] table, possibly empty.
    pub name: String,

    /// Line this [`Examples`] table starts at.
    pub line: usize,

    /// [`Tag`]s of this [`Examples`] table.
    pub tags: Vec<Tag>,

    /// Raw table, the header row going first.
    pub table: Vec<Vec<String>>,
}

/// Parsed tag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tag {
    /// Name, including the leading `@`.
    pub name: String,

    /// Line of this [`Tag`].
    pub line: usize,
}

impl Tag {
    /// Creates a new [`Tag`], prepending `@` to its `name` if missing.
    #[must_use]
    pub fn new(name: impl AsRef<str>, line: usize) -> Self {
        let name = name.as_ref();
        let name = if name.starts_with('@') {
            name.to_owned()
        } else {
            format!("@{name}")
        };
        Self { name, line }
    }

    /// Returns the name of this [`Tag`] without the leading `@`.
    #[must_use]
    pub fn bare(&self) -> &str {
        self.name.trim_start_matches('@')
    }
}

/// Converts [`gherkin`] tags, which omit their lines, into [`Tag`]s on the
/// `line` of the owning node.
fn tags(raw: &[String], line: usize) -> Vec<Tag> {
    raw.iter().map(|t| Tag::new(t, line)).collect()
}

impl From<&gherkin::Step> for Step {
    fn from(step: &gherkin::Step) -> Self {
        Self {
            keyword: step.keyword.clone(),
            text: step.value.clone(),
            line: step.position.line,
            docstring: step.docstring.clone(),
            table: step.table.as_ref().map(|t| t.rows.clone()),
        }
    }
}

impl From<&gherkin::Examples> for Examples {
    fn from(examples: &gherkin::Examples) -> Self {
        Self {
            name: examples.name.clone().unwrap_or_default(),
            line: examples.position.line,
            tags: tags(&examples.tags, examples.position.line),
            table: examples
                .table
                .as_ref()
                .map(|t| t.rows.clone())
                .unwrap_or_default(),
        }
    }
}

impl From<&gherkin::Scenario> for Scenario {
    fn from(scenario: &gherkin::Scenario) -> Self {
        Self {
            keyword: scenario.keyword.clone(),
            name: scenario.name.clone(),
            line: scenario.position.line,
            tags: tags(&scenario.tags, scenario.position.line),
            steps: scenario.steps.iter().map(Into::into).collect(),
            examples: scenario.examples.iter().map(Into::into).collect(),
        }
    }
}

impl From<&gherkin::Feature> for Feature {
    /// Adapts a [`gherkin::Feature`]. Scenarios nested into rules are
    /// flattened after the top-level ones.
    fn from(feature: &gherkin::Feature) -> Self {
        Self {
            keyword: feature.keyword.clone(),
            name: feature.name.clone(),
            line: feature.position.line,
            uri: feature.path.clone(),
            tags: tags(&feature.tags, feature.position.line),
            background: feature
                .background
                .iter()
                .flat_map(|bg| &bg.steps)
                .map(Into::into)
                .collect(),
            scenarios: feature
                .scenarios
                .iter()
                .chain(feature.rules.iter().flat_map(|r| &r.scenarios))
                .map(Into::into)
                .collect(),
        }
    }
}
