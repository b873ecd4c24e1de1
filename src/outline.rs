// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Generation model of a [`document::Feature`].
//!
//! Expands [Scenario Outline]s into execution units and derives all the
//! names, identifiers and parameter lists a test-class template (or the
//! [`Runner`]) consumes.
//!
//! [`Runner`]: crate::Runner
//! [Scenario Outline]: https://cucumber.io/docs/gherkin/reference#scenario-outline

use crate::{
    document,
    report,
    slug,
    step::Keyword,
    table::{Table, TableError},
};

/// Name of the implicit leading outline parameter holding the 1-based row
/// ordinal inside its examples table.
pub const INDEX_PARAM: &str = "givenSpecsIdx";

/// Feature ready to be rendered or run.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureModel {
    /// Name of the test class generated for this feature.
    pub class_name: String,

    /// Report node of this feature, without any scenarios.
    pub report: report::Feature,

    /// Background steps, run before the steps of every scenario.
    pub background: Vec<StepModel>,

    /// Execution units of this feature.
    pub scenarios: Vec<ScenarioModel>,
}

impl FeatureModel {
    /// Builds the [`FeatureModel`] of the given parsed `feature`.
    #[must_use]
    pub fn new(feature: &document::Feature) -> Self {
        let id = slug::id(&feature.name);
        let report = report::Feature::new(
            id.clone(),
            feature.name.clone(),
            feature.line,
            report_tags(&feature.tags),
            feature.uri.as_ref().map(|p| p.display().to_string()),
        );

        Self {
            class_name: slug::method_name(&feature.name),
            report,
            background: feature
                .background
                .iter()
                .map(StepModel::from)
                .collect(),
            scenarios: feature
                .scenarios
                .iter()
                .flat_map(|s| ScenarioModel::expand(s, &id))
                .collect(),
        }
    }

    /// Returns the identifier of this feature inside a [`report::Report`].
    #[must_use]
    pub fn id(&self) -> &str {
        &self.report.id
    }
}

/// Step of a [`ScenarioModel`] or of a background.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StepModel {
    /// Keyword, trimmed.
    pub keyword: String,

    /// Step text, possibly containing `<placeholders>`.
    pub text: String,

    /// Line of this step.
    pub line: usize,

    /// Multiline text argument.
    pub docstring: Option<String>,

    /// Raw table argument, the header row going first.
    pub table: Option<Vec<Vec<String>>>,
}

impl StepModel {
    /// Parses the keyword of this step.
    #[must_use]
    pub fn keyword(&self) -> Option<Keyword> {
        Keyword::parse(&self.keyword)
    }

    /// Builds a fresh [`Table`] out of the raw table argument, if any.
    ///
    /// # Errors
    ///
    /// If the raw table has invalid headers or ragged rows.
    pub fn data_table(&self) -> Result<Option<Table>, TableError> {
        self.table.clone().map(Table::try_from).transpose()
    }
}

impl From<&document::Step> for StepModel {
    fn from(step: &document::Step) -> Self {
        Self {
            keyword: step.keyword.trim().to_owned(),
            text: step.text.clone(),
            line: step.line,
            docstring: step.docstring.clone(),
            table: step.table.clone(),
        }
    }
}

/// Parameter of an outline [`ScenarioModel`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Parameter {
    /// Examples table header, used as the `<placeholder>` name.
    pub header: String,

    /// Identifier-friendly name of the parameter.
    pub name: String,
}

impl Parameter {
    /// Creates a new [`Parameter`] out of an examples table `header`.
    #[must_use]
    pub fn new(header: impl Into<String>) -> Self {
        let header = header.into();
        let name = if header == INDEX_PARAM {
            header.clone()
        } else {
            slug::param_name(&header)
        };
        Self { header, name }
    }
}

/// Single row of an examples table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestCase {
    /// Values of the row, the 1-based row ordinal going first.
    pub values: Vec<String>,
}

impl TestCase {
    /// Pairs the `parameters` with the values of this [`TestCase`] into a
    /// substitution table.
    #[must_use]
    pub fn replacements(
        &self,
        parameters: &[Parameter],
    ) -> Vec<(String, String)> {
        parameters
            .iter()
            .zip(&self.values)
            .map(|(p, v)| (p.header.clone(), v.clone()))
            .collect()
    }
}

/// Execution unit: a plain scenario, or an outline bound to one of its
/// examples tables.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioModel {
    /// Human-readable name.
    pub display_name: String,

    /// Name of the test method generated for this unit.
    pub method_name: String,

    /// Tags of the scenario and its examples table, without `@`.
    pub tags: Vec<String>,

    /// Report node of this unit, without any steps.
    pub report: report::Scenario,

    /// Steps of the scenario.
    pub steps: Vec<StepModel>,

    /// Parameters of an outline, [`INDEX_PARAM`] going first.
    pub parameters: Vec<Parameter>,

    /// Rows of the examples table.
    pub cases: Vec<TestCase>,
}

impl ScenarioModel {
    /// Expands the given `scenario` into its execution units: a single one
    /// for a plain scenario, or one per examples table for an outline.
    #[must_use]
    pub fn expand(
        scenario: &document::Scenario,
        feature_id: &str,
    ) -> Vec<Self> {
        if scenario.examples.is_empty() {
            let name = scenario.name.clone();
            return vec![Self::unit(scenario, feature_id, name)];
        }

        scenario
            .examples
            .iter()
            .map(|examples| {
                let name = format!("{} - {}", scenario.name, examples.name);
                let mut unit = Self::unit(scenario, feature_id, name);

                unit.report.tags.extend(report_tags(&examples.tags));
                unit.tags
                    .extend(examples.tags.iter().map(|t| t.bare().to_owned()));

                let (header, rows) = match examples.table.split_first() {
                    Some((header, rows)) => (header.as_slice(), rows),
                    None => (&[][..], &[][..]),
                };
                if !header.is_empty() {
                    unit.parameters = [INDEX_PARAM]
                        .into_iter()
                        .chain(header.iter().map(String::as_str))
                        .map(Parameter::new)
                        .collect();
                }
                unit.cases = rows
                    .iter()
                    .enumerate()
                    .map(|(i, row)| TestCase {
                        values: [(i + 1).to_string()]
                            .into_iter()
                            .chain(row.iter().cloned())
                            .collect(),
                    })
                    .collect();
                unit
            })
            .collect()
    }

    /// Builds a unit out of the immutable fields of the `scenario` under the
    /// given display `name`.
    fn unit(
        scenario: &document::Scenario,
        feature_id: &str,
        name: String,
    ) -> Self {
        Self {
            method_name: slug::method_name(&name),
            tags: scenario.tags.iter().map(|t| t.bare().to_owned()).collect(),
            report: report::Scenario::new(
                format!("{feature_id};{}", slug::id(&name)),
                name.clone(),
                scenario.line,
                report_tags(&scenario.tags),
            ),
            steps: scenario.steps.iter().map(StepModel::from).collect(),
            parameters: vec![],
            cases: vec![],
            display_name: name,
        }
    }

    /// Indicates whether this unit is an outline instance.
    #[must_use]
    pub fn is_outline(&self) -> bool {
        !self.parameters.is_empty()
    }
}

/// Converts parsed tags into report ones.
fn report_tags(tags: &[document::Tag]) -> Vec<report::Tag> {
    tags.iter()
        .map(|t| report::Tag { name: t.name.clone(), line: t.line })
        .collect()
}
