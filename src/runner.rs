// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Sequential runner of whole [`FeatureModel`]s.

use std::path::PathBuf;

use derive_more::with_trait::{Display, Error, From};

use crate::{
    outline::{FeatureModel, ScenarioModel, StepModel},
    report::{Report, ReportError},
    resolver::{HookError, ScenarioError, StepInput, StepResolver},
    table::TableError,
    Config, Registry,
};

/// Outcome of a single scenario run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaseOutcome {
    /// Display name of the scenario.
    pub scenario: String,

    /// 1-based examples row ordinal of an outline instance.
    pub case: Option<usize>,

    /// Terminal failure message, if the scenario failed.
    pub error: Option<String>,
}

impl CaseOutcome {
    /// Indicates whether the scenario passed.
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of running a [`FeatureModel`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    /// Number of passed scenarios.
    pub passed: usize,

    /// Number of failed scenarios.
    pub failed: usize,

    /// Outcomes of all the scenarios, in running order.
    pub outcomes: Vec<CaseOutcome>,
}

impl RunSummary {
    /// Indicates whether any scenario failed.
    #[must_use]
    pub const fn has_failed(&self) -> bool {
        self.failed > 0
    }

    /// Adds the given [`CaseOutcome`].
    fn push(&mut self, outcome: CaseOutcome) {
        if outcome.is_passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.outcomes.push(outcome);
    }
}

/// Error aborting a run.
#[derive(Debug, Display, Error, From)]
pub enum RunError {
    /// Hook failed.
    #[display("{_0}")]
    Hook(HookError),

    /// [`Report`] cannot be updated.
    #[display("{_0}")]
    Report(ReportError),

    /// Step table is malformed.
    #[display("{_0}")]
    Table(TableError),

    /// Step keyword is unknown.
    #[display("unknown step keyword `{keyword}` at line {line}")]
    #[from(ignore)]
    UnknownKeyword {
        /// Raw keyword.
        #[error(not(source))]
        keyword: String,

        /// Line of the step.
        line: usize,
    },
}

/// Runs [`FeatureModel`]s scenario by scenario through a [`StepResolver`].
#[derive(Debug)]
pub struct Runner<'r> {
    /// Resolver of the steps.
    resolver: StepResolver<'r>,
}

impl<'r> Runner<'r> {
    /// Creates a new [`Runner`] of the given [`Registry`].
    #[must_use]
    pub fn new(registry: &'r Registry, report: Report, config: Config) -> Self {
        Self { resolver: StepResolver::new(registry, report, config) }
    }

    /// Returns the underlying [`StepResolver`].
    #[must_use]
    pub const fn resolver(&self) -> &StepResolver<'r> {
        &self.resolver
    }

    /// Runs every scenario of the given `feature`: once for a plain
    /// scenario, and once per examples row for an outline.
    ///
    /// # Errors
    ///
    /// If a hook fails, or a step can't be run at all. Failed steps don't
    /// abort the run, they fail their scenarios.
    pub fn run(
        &mut self,
        feature: &FeatureModel,
    ) -> Result<RunSummary, RunError> {
        let _span = tracing::info_span!("feature", name = %feature.report.name)
            .entered();

        let mut summary = RunSummary::default();
        for unit in &feature.scenarios {
            if unit.cases.is_empty() {
                summary.push(self.run_case(feature, unit, None)?);
            }
            for (i, case) in unit.cases.iter().enumerate() {
                let replacements = case.replacements(&unit.parameters);
                let case = Some((i + 1, replacements));
                summary.push(self.run_case(feature, unit, case)?);
            }
        }

        tracing::info!(
            passed = summary.passed,
            failed = summary.failed,
            "feature `{}` finished",
            feature.report.name,
        );
        Ok(summary)
    }

    /// Writes the [`Report`] to its configured path, if any.
    ///
    /// # Errors
    ///
    /// If the [`Report`] cannot be written.
    pub fn finish(self) -> Result<Option<PathBuf>, ReportError> {
        self.resolver.report().flush(self.resolver.config())
    }

    /// Runs a single scenario with the given examples row.
    fn run_case(
        &mut self,
        feature: &FeatureModel,
        unit: &ScenarioModel,
        case: Option<(usize, Vec<(String, String)>)>,
    ) -> Result<CaseOutcome, RunError> {
        let (idx, replacements) = case.unzip();
        let _span = tracing::info_span!(
            "scenario",
            name = %unit.display_name,
            case = idx,
        )
        .entered();

        _ = self.resolver.scenario_reset(
            &feature.report,
            unit.report.clone(),
            replacements.unwrap_or_default(),
        )?;
        self.resolver.before_scenario()?;
        for step in feature.background.iter().chain(&unit.steps) {
            self.run_step(step)?;
        }

        let error = match self.resolver.after_scenario() {
            Ok(()) => None,
            Err(ScenarioError::Failed { message }) => Some(message),
            Err(ScenarioError::Hook(e)) => return Err(e.into()),
        };
        Ok(CaseOutcome {
            scenario: unit.display_name.clone(),
            case: idx,
            error,
        })
    }

    /// Runs a single step along with its step hooks.
    fn run_step(&mut self, step: &StepModel) -> Result<(), RunError> {
        let keyword = step.keyword().ok_or_else(|| RunError::UnknownKeyword {
            keyword: step.keyword.clone(),
            line: step.line,
        })?;

        let mut input = StepInput::new(&step.text).line(step.line);
        if let Some(docstring) = &step.docstring {
            input = input.docstring(docstring);
        }
        if let Some(table) = step.data_table()? {
            input = input.table(table);
        }

        self.resolver.before_step(&step.text)?;
        _ = self.resolver.keyword(keyword, input);
        self.resolver.after_step(&step.text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        document::{Feature, Scenario, Step},
        ScenarioContext,
    };

    fn feature(keyword: &str) -> FeatureModel {
        FeatureModel::new(&Feature {
            name: "Counting".into(),
            scenarios: vec![Scenario {
                name: "count".into(),
                steps: vec![Step {
                    keyword: keyword.into(),
                    text: "one".into(),
                    ..Step::default()
                }],
                ..Scenario::default()
            }],
            ..Feature::default()
        })
    }

    #[test]
    fn counts_outcomes() {
        let registry = Registry::builder()
            .given("one", |_: &mut ScenarioContext| {})
            .build()
            .unwrap();
        let mut runner =
            Runner::new(&registry, Report::new(), Config::default());

        let summary = runner.run(&feature("Given ")).unwrap();
        assert_eq!((summary.passed, summary.failed), (1, 0));

        let summary = runner.run(&feature("Then ")).unwrap();
        assert!(summary.has_failed());
        assert_eq!(
            summary.outcomes[0].error.as_deref(),
            Some("no step for Then -> one"),
        );
    }

    #[test]
    fn unknown_keyword_aborts() {
        let registry = Registry::default();
        let mut runner =
            Runner::new(&registry, Report::new(), Config::default());

        assert!(matches!(
            runner.run(&feature("Angenommen ")),
            Err(RunError::UnknownKeyword { .. }),
        ));
    }
}
