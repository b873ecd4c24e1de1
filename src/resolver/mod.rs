// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Scenario execution state machine.
//!
//! A [`StepResolver`] runs scenarios one at a time: it matches each step
//! against a [`Registry`], invokes the matched handler, records the outcome
//! into the [`Report`] and keeps the skip-after-first-failure state.

mod error;

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    time::Instant,
};

use derive_more::with_trait::Display;
use lazy_regex::regex;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    parameter::{self, Converters, ParamKind, Value},
    registry::{HookKind, Registry},
    report::{
        self, Argument, Report, ReportError, RunResult, ScenarioHandle, Status,
    },
    step::{Keyword, Kind, Location, StepError},
    table::Table,
    CoercionError, Config, ScenarioContext,
};

pub use self::error::{HookError, ScenarioError};

/// Lifecycle state of a [`StepResolver`].
#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
pub enum Phase {
    /// Scenario has been reset and nothing has run yet.
    #[default]
    #[display("ready")]
    Ready,

    /// Hooks or steps of the scenario are running.
    #[display("running")]
    Running,

    /// Scenario has finished, possibly with failed steps.
    #[display("completed")]
    Completed,

    /// Scenario has been interrupted by a failed hook.
    #[display("aborted")]
    Aborted,
}

/// Single step to run.
#[derive(Clone, Debug, Default)]
pub struct StepInput<'a> {
    /// Step text, possibly containing `<placeholders>`.
    pub text: &'a str,

    /// Multiline text argument.
    pub docstring: Option<&'a str>,

    /// Table argument.
    pub table: Option<Table>,

    /// Line of the step in its `.feature` file.
    pub line: usize,
}

impl<'a> StepInput<'a> {
    /// Creates a new [`StepInput`] without any arguments.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self { text, ..Self::default() }
    }

    /// Attaches the multiline text argument.
    #[must_use]
    pub fn docstring(mut self, docstring: &'a str) -> Self {
        self.docstring = Some(docstring);
        self
    }

    /// Attaches the table argument.
    #[must_use]
    pub fn table(mut self, table: Table) -> Self {
        self.table = Some(table);
        self
    }

    /// Sets the line of the step.
    #[must_use]
    pub fn line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

impl<'a> From<&'a str> for StepInput<'a> {
    fn from(text: &'a str) -> Self {
        Self::new(text)
    }
}

/// Runs the steps and hooks of one scenario at a time.
///
/// ```rust
/// use givenspecs::{
///     report, Config, Registry, Report, ScenarioContext, Status,
///     StepResolver,
/// };
///
/// let registry = Registry::builder()
///     .given(r"(\d+) cucumbers", |ctx: &mut ScenarioContext, n: u32| {
///         ctx.insert("cucumbers", n);
///     })
///     .build()
///     .unwrap();
///
/// let mut resolver =
///     StepResolver::new(&registry, Report::new(), Config::default());
/// let feature = report::Feature::new("eating", "Eating", 1, vec![], None);
/// let scenario = report::Scenario::new("eating;one", "One", 2, vec![]);
/// resolver.scenario_reset(&feature, scenario, vec![]).unwrap();
///
/// resolver.before_scenario().unwrap();
/// assert_eq!(resolver.given("12 cucumbers").status, Status::Passed);
/// assert_eq!(resolver.and("a cat").status, Status::Pending);
/// assert_eq!(resolver.then("nothing").status, Status::Skipped);
/// assert!(resolver.after_scenario().is_err());
/// ```
#[derive(Debug)]
pub struct StepResolver<'r> {
    /// Step definitions and hooks.
    registry: &'r Registry,

    /// [`Report`] of the whole run.
    report: Report,

    /// Configuration of the run.
    config: Config,

    /// Current lifecycle state.
    phase: Phase,

    /// Concrete [`Kind`] of the last executed step.
    last_kind: Kind,

    /// Whether the remaining steps of the scenario are skipped.
    should_skip: bool,

    /// Whether the scenario is marked as undefined.
    undefined: bool,

    /// Message of the last step that didn't pass.
    last_error: String,

    /// State shared by the handlers of the current scenario.
    context: ScenarioContext,

    /// Report node of the current scenario.
    scenario: Option<ScenarioHandle>,

    /// Active `<placeholder>` substitutions.
    replacements: Vec<(String, String)>,
}

impl<'r> StepResolver<'r> {
    /// Creates a new [`StepResolver`] of the given [`Registry`], reporting
    /// into the given [`Report`].
    #[must_use]
    pub fn new(registry: &'r Registry, report: Report, config: Config) -> Self {
        Self {
            registry,
            context: ScenarioContext::new(vec![], report.clone()),
            report,
            config,
            phase: Phase::Ready,
            last_kind: Kind::Given,
            should_skip: false,
            undefined: false,
            last_error: String::new(),
            scenario: None,
            replacements: vec![],
        }
    }

    /// Returns the [`Report`] this [`StepResolver`] writes into.
    #[must_use]
    pub const fn report(&self) -> &Report {
        &self.report
    }

    /// Returns the [`Config`] of this [`StepResolver`].
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the current [`Phase`].
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the [`ScenarioContext`] of the current scenario.
    #[must_use]
    pub const fn context(&self) -> &ScenarioContext {
        &self.context
    }

    /// Returns the [`ScenarioContext`] of the current scenario mutably.
    pub fn context_mut(&mut self) -> &mut ScenarioContext {
        &mut self.context
    }

    /// Returns the report node of the current scenario, if any.
    #[must_use]
    pub fn reported_scenario(&self) -> Option<report::Scenario> {
        self.scenario.and_then(|h| self.report.scenario(h))
    }

    /// Starts a new scenario.
    ///
    /// Clears the failure state, installs a fresh [`ScenarioContext`] and
    /// the given `replacements`, and appends the `scenario` node (along with
    /// the `feature` one, unless reported already) to the [`Report`]. A
    /// scenario tagged with [`Config::undefined_tag`] is marked undefined.
    ///
    /// # Errors
    ///
    /// If the `scenario` cannot be added to the [`Report`].
    pub fn scenario_reset(
        &mut self,
        feature: &report::Feature,
        scenario: report::Scenario,
        replacements: Vec<(String, String)>,
    ) -> Result<ScenarioHandle, ReportError> {
        let tags = scenario
            .tags
            .iter()
            .map(|t| t.name.trim_start_matches('@').to_owned())
            .collect::<Vec<_>>();

        tracing::debug!(
            id = %scenario.id,
            "resetting scenario `{}`",
            scenario.name,
        );

        let mut feature = feature.clone();
        feature.elements.clear();
        _ = self.report.add_feature(feature.clone());
        let handle = self.report.add_scenario(&feature.id, scenario)?;

        self.undefined = tags.iter().any(|t| *t == self.config.undefined_tag);
        self.context = ScenarioContext::new(tags, self.report.clone());
        self.phase = Phase::Ready;
        self.last_kind = Kind::Given;
        self.should_skip = false;
        self.last_error.clear();
        self.scenario = Some(handle);
        self.replacements = replacements;
        Ok(handle)
    }

    /// Explicitly marks the current scenario as undefined (or not), as if it
    /// was tagged with the given `tag`.
    pub fn set_undefined(&mut self, value: bool, tag: impl Into<String>) {
        self.undefined = value;
        self.config.undefined_tag =
            tag.into().trim_start_matches('@').to_owned();
    }

    /// Runs a `Given` step.
    pub fn given<'a>(&mut self, step: impl Into<StepInput<'a>>) -> RunResult {
        self.process(Kind::Given, step.into())
    }

    /// Runs a `When` step.
    pub fn when<'a>(&mut self, step: impl Into<StepInput<'a>>) -> RunResult {
        self.process(Kind::When, step.into())
    }

    /// Runs a `Then` step.
    pub fn then<'a>(&mut self, step: impl Into<StepInput<'a>>) -> RunResult {
        self.process(Kind::Then, step.into())
    }

    /// Runs an `And` step as the [`Kind`] of the last executed step (`Given`
    /// if none has been executed yet).
    pub fn and<'a>(&mut self, step: impl Into<StepInput<'a>>) -> RunResult {
        self.process(self.last_kind, step.into())
    }

    /// Runs a `But` step, same as [`StepResolver::and()`].
    pub fn but<'a>(&mut self, step: impl Into<StepInput<'a>>) -> RunResult {
        self.and(step)
    }

    /// Runs a step written with the given [`Keyword`].
    pub fn keyword<'a>(
        &mut self,
        keyword: Keyword,
        step: impl Into<StepInput<'a>>,
    ) -> RunResult {
        match keyword {
            Keyword::Given => self.given(step),
            Keyword::When => self.when(step),
            Keyword::Then => self.then(step),
            Keyword::And => self.and(step),
            Keyword::But => self.but(step),
        }
    }

    /// Runs the `BeforeScenario` hooks.
    ///
    /// # Errors
    ///
    /// If any hook fails. The remaining hooks are not run.
    pub fn before_scenario(&mut self) -> Result<(), HookError> {
        self.phase = Phase::Running;
        self.run_hooks(HookKind::BeforeScenario, "")
    }

    /// Runs the `AfterScenario` hooks and finishes the scenario.
    ///
    /// # Errors
    ///
    /// - [`ScenarioError::Hook`] if any hook fails;
    /// - [`ScenarioError::Failed`] with the message of the last step that
    ///   didn't pass, if any.
    pub fn after_scenario(&mut self) -> Result<(), ScenarioError> {
        self.run_hooks(HookKind::AfterScenario, "")?;
        self.phase = Phase::Completed;

        if self.should_skip && !self.last_error.trim().is_empty() {
            return Err(ScenarioError::Failed {
                message: self.last_error.clone(),
            });
        }
        Ok(())
    }

    /// Runs the `BeforeStep` hooks with the raw `step_text`.
    ///
    /// # Errors
    ///
    /// If any hook fails. The remaining hooks are not run.
    pub fn before_step(&mut self, step_text: &str) -> Result<(), HookError> {
        self.phase = Phase::Running;
        self.run_hooks(HookKind::BeforeStep, step_text)
    }

    /// Runs the `AfterStep` hooks with the raw `step_text`.
    ///
    /// # Errors
    ///
    /// If any hook fails. The remaining hooks are not run.
    pub fn after_step(&mut self, step_text: &str) -> Result<(), HookError> {
        self.run_hooks(HookKind::AfterStep, step_text)
    }

    /// Runs the hooks of the given [`HookKind`] applying to the current
    /// scenario, in their order.
    fn run_hooks(
        &mut self,
        kind: HookKind,
        step_text: &str,
    ) -> Result<(), HookError> {
        let registry = self.registry;
        let hooks = registry
            .hooks(kind)
            .filter(|h| h.applies_to(self.context.tags()))
            .collect::<Vec<_>>();

        for hook in hooks {
            tracing::trace!(location = %hook.location(), "running {kind} hook");
            hook.invoke(&mut self.context, step_text).map_err(|error| {
                self.phase = Phase::Aborted;
                HookError { kind, location: hook.location(), error }
            })?;
        }
        Ok(())
    }

    /// Substitutes the active `<placeholders>` in the given `text`.
    fn substitute(&self, text: &str) -> String {
        substitute(text, &self.replacements)
    }

    /// Runs a single step resolved to the given concrete [`Kind`].
    fn process(&mut self, kind: Kind, input: StepInput<'_>) -> RunResult {
        self.phase = Phase::Running;
        // Attachments made outside of a step body (by step hooks) are dropped.
        _ = self.context.take_embeddings();

        let text = self.substitute(input.text);
        let mut step = report::Step {
            keyword: format!("{kind} "),
            line: input.line,
            name: text.clone(),
            arguments: vec![],
            r#match: None,
            result: RunResult::instant(Status::Passed),
            embeddings: vec![],
        };
        tracing::info!("-> {kind} {text}");

        let docstring = input.docstring.map(|d| self.substitute(d));
        if let Some(docstring) = &docstring {
            tracing::debug!("{docstring}");
            step.arguments
                .push(Argument::DocString { content: docstring.clone() });
        }

        let table = input.table.map(|mut table| {
            table.apply_replacements(|cell| self.substitute(cell));
            table
        });
        if let Some(table) = &table {
            tracing::debug!("\n{table}");
            step.arguments.push(Argument::from(table));
        }

        if self.undefined {
            tracing::info!("   ... undefined");
            step.result = RunResult::instant(Status::Undefined);
            return self.record(step);
        }
        if self.should_skip {
            tracing::info!("   ... skipped");
            step.result = RunResult::instant(Status::Skipped);
            return self.record(step);
        }

        self.last_kind = kind;

        let start = Instant::now();
        let (location, outcome) = self.invoke(kind, &text, docstring, table);
        let duration = start.elapsed().as_nanos();
        step.r#match = location.map(Into::into);

        step.result = match outcome {
            Ok(()) => {
                tracing::info!("   ... ok");
                step.embeddings = self.context.take_embeddings();
                RunResult {
                    status: Status::Passed,
                    duration,
                    error_message: None,
                }
            }
            Err(e) => {
                let message = e.to_string();
                tracing::info!("   ... error: {message}");
                if let Some(matches) = e.possible_matches() {
                    tracing::debug!("possible matches:\n{matches}");
                }

                self.should_skip = true;
                self.last_error.clone_from(&message);
                match e {
                    StepError::NotFound { .. } => {
                        RunResult::instant(Status::Pending)
                    }
                    StepError::Ambiguous { .. } => {
                        RunResult::instant(Status::Ambiguous)
                    }
                    StepError::Coercion(_) | StepError::Failed { .. } => {
                        step.embeddings = self.context.take_embeddings();
                        RunResult {
                            status: Status::Failed,
                            duration,
                            error_message: Some(message),
                        }
                    }
                }
            }
        };
        _ = self.context.take_embeddings();
        self.record(step)
    }

    /// Matches the step `text` and invokes its handler, trapping panics.
    ///
    /// Returns the [`Location`] of the matched definition, if any.
    fn invoke(
        &mut self,
        kind: Kind,
        text: &str,
        docstring: Option<String>,
        table: Option<Table>,
    ) -> (Option<Location>, Result<(), StepError>) {
        let registry = self.registry;
        let found = match registry.find(kind, text) {
            Ok(found) => found,
            Err(e) => return (None, Err(e)),
        };
        let definition = found.definition;
        let location = Some(definition.location());

        let args = match arguments(
            definition.parameters(),
            found.captures,
            docstring,
            table,
            registry.converters(),
        ) {
            Ok(args) => args,
            Err(e) => return (location, Err(e.into())),
        };

        let ctx = &mut self.context;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            definition.invoke(ctx, args)
        }))
        .unwrap_or_else(|payload| {
            Err(StepError::Failed { message: panic_message(&*payload) })
        });
        (location, outcome)
    }

    /// Appends the `step` to the current scenario's report node.
    fn record(&self, step: report::Step) -> RunResult {
        let result = step.result.clone();
        match self.scenario {
            Some(handle) => {
                if let Err(e) = self.report.add_step(handle, step) {
                    tracing::error!("failed to report step: {e}");
                }
            }
            None => {
                tracing::warn!("step `{}` run outside of a scenario", step.name);
            }
        }
        result
    }
}

/// Orders the raw step arguments as the handler `parameters` expect them
/// (captures, then multiline text, then table) and coerces them.
///
/// The multiline text is passed only if the handler declares a parameter
/// for it.
///
/// # Errors
///
/// If the number of arguments differs from the number of `parameters`, or
/// some argument cannot be coerced.
fn arguments(
    parameters: &[ParamKind],
    captures: Vec<String>,
    docstring: Option<String>,
    table: Option<Table>,
    converters: &Converters,
) -> Result<Vec<Value>, CoercionError> {
    let trailing = usize::from(table.is_some());
    let mut raw = captures
        .into_iter()
        .map(parameter::Argument::Text)
        .collect::<Vec<_>>();
    if let Some(docstring) =
        docstring.filter(|_| parameters.len() > raw.len() + trailing)
    {
        raw.push(parameter::Argument::Text(docstring));
    }
    raw.extend(table.map(parameter::Argument::Table));

    if raw.len() != parameters.len() {
        return Err(CoercionError::Arity {
            expected: parameters.len(),
            actual: raw.len(),
        });
    }
    raw.into_iter()
        .zip(parameters)
        .map(|(arg, &kind)| parameter::coerce(arg, kind, converters))
        .collect()
}

/// Replaces every `<name>` placeholder in the `text` with its value from the
/// `replacements`. Unknown placeholders are left verbatim.
#[must_use]
pub fn substitute(text: &str, replacements: &[(String, String)]) -> String {
    /// [`Regex`] matching `<placeholders>`.
    static PLACEHOLDER: &Lazy<Regex> = regex!(r"<([^<>]+)>");

    if replacements.is_empty() {
        return text.to_owned();
    }
    PLACEHOLDER
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            let name = caps.get(1).map_or("", |m| m.as_str());
            replacements
                .iter()
                .find_map(|(k, v)| (k == name).then(|| v.clone()))
                .unwrap_or_else(|| whole.to_owned())
        })
        .into_owned()
}

/// Extracts a human-readable message out of a panic `payload`.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "step panicked".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Feature;

    fn registry() -> Registry {
        Registry::builder()
            .given(r"(\d+) cucumbers", |ctx: &mut ScenarioContext, n: u32| {
                ctx.insert("cucumbers", n);
            })
            .when("I eat (\\d+)", |ctx: &mut ScenarioContext, n: u32| {
                let left = ctx.get_mut::<u32>("cucumbers").unwrap();
                *left = left
                    .checked_sub(n)
                    .ok_or_else(|| anyhow::anyhow!("not enough"))?;
                anyhow::Ok(())
            })
            .then("(\\d+) left", |ctx: &mut ScenarioContext, n: u32| {
                assert_eq!(ctx.get::<u32>("cucumbers"), Some(&n));
            })
            .then("a note", |_: &mut ScenarioContext, text: String| {
                assert_eq!(text, "hello 5");
            })
            .step("ambiguous .*", |_: &mut ScenarioContext| {})
            .step(".* ambiguous", |_: &mut ScenarioContext| {})
            .build()
            .unwrap()
    }

    fn reset(resolver: &mut StepResolver<'_>, tags: &[&str]) {
        let feature = Feature::new("eating", "Eating", 1, vec![], None);
        let tags = tags
            .iter()
            .map(|t| report::Tag { name: format!("@{t}"), line: 2 })
            .collect();
        let scenario = report::Scenario::new("eating;a", "A", 3, tags);
        _ = resolver
            .scenario_reset(&feature, scenario, vec![("n".into(), "5".into())])
            .unwrap();
    }

    #[test]
    fn substitutes_known_placeholders_only() {
        let replacements = vec![("Value".to_owned(), "123".to_owned())];

        assert_eq!(
            substitute("value is <Value>", &replacements),
            "value is 123",
        );
        assert_eq!(substitute("keep <Other>", &replacements), "keep <Other>");
        assert_eq!(substitute("keep <Value>", &[]), "keep <Value>");
    }

    #[test]
    fn passes_and_substitutes() {
        let registry = registry();
        let mut resolver =
            StepResolver::new(&registry, Report::new(), Config::default());
        reset(&mut resolver, &[]);

        assert_eq!(resolver.given("12 cucumbers").status, Status::Passed);
        assert_eq!(resolver.when("I eat <n>").status, Status::Passed);
        assert_eq!(resolver.then("7 left").status, Status::Passed);
        assert_eq!(
            resolver
                .and(StepInput::new("a note").docstring("hello <n>"))
                .status,
            Status::Passed,
        );
        assert!(resolver.after_scenario().is_ok());
        assert_eq!(resolver.phase(), Phase::Completed);

        let scenario = resolver.reported_scenario().unwrap();
        assert_eq!(scenario.steps[1].name, "I eat 5");
        assert_eq!(scenario.steps[3].keyword, "Then ");
        assert_eq!(
            scenario.steps[3].arguments,
            [Argument::DocString { content: "hello 5".into() }],
        );
        assert!(scenario.steps[0].r#match.is_some());
    }

    #[test]
    fn failure_skips_the_rest() {
        let registry = registry();
        let mut resolver =
            StepResolver::new(&registry, Report::new(), Config::default());
        reset(&mut resolver, &[]);

        assert_eq!(resolver.given("1 cucumbers").status, Status::Passed);
        let failed = resolver.when("I eat 3");
        assert_eq!(failed.status, Status::Failed);
        assert_eq!(failed.error_message.as_deref(), Some("not enough"));
        assert_eq!(resolver.then("1 left").status, Status::Skipped);

        let err = resolver.after_scenario().unwrap_err();
        assert_eq!(err.to_string(), "not enough");
    }

    #[test]
    fn panics_become_failures() {
        let registry = registry();
        let mut resolver =
            StepResolver::new(&registry, Report::new(), Config::default());
        reset(&mut resolver, &[]);

        _ = resolver.given("1 cucumbers");
        let failed = resolver.then("2 left");

        assert_eq!(failed.status, Status::Failed);
        assert!(failed.error_message.unwrap().contains("assertion"));
    }

    #[test]
    fn ambiguity_and_absence() {
        let registry = registry();
        let mut resolver =
            StepResolver::new(&registry, Report::new(), Config::default());

        reset(&mut resolver, &[]);
        assert_eq!(
            resolver.given("ambiguous and ambiguous").status,
            Status::Ambiguous,
        );
        assert_eq!(resolver.given("1 cucumbers").status, Status::Skipped);

        reset(&mut resolver, &[]);
        assert_eq!(resolver.when("nothing").status, Status::Pending);
        assert_eq!(
            resolver.after_scenario().unwrap_err().to_string(),
            "no step for When -> nothing",
        );
    }

    #[test]
    fn and_follows_last_kind() {
        let registry = registry();
        let mut resolver =
            StepResolver::new(&registry, Report::new(), Config::default());
        reset(&mut resolver, &[]);

        assert_eq!(resolver.and("12 cucumbers").status, Status::Passed);
        assert_eq!(resolver.when("I eat 2").status, Status::Passed);
        assert_eq!(resolver.but("12 cucumbers").status, Status::Pending);
    }

    #[test]
    fn undefined_scenario_is_not_a_failure() {
        let registry = registry();
        let mut resolver =
            StepResolver::new(&registry, Report::new(), Config::default());
        reset(&mut resolver, &["inconclusive"]);

        assert_eq!(resolver.given("12 cucumbers").status, Status::Undefined);
        assert_eq!(resolver.then("whatever").status, Status::Undefined);
        assert!(resolver.after_scenario().is_ok());

        reset(&mut resolver, &[]);
        assert_eq!(resolver.given("12 cucumbers").status, Status::Passed);
    }

    #[test]
    fn explicit_undefined_tag_ignores_at_sign() {
        let registry = registry();
        let mut resolver =
            StepResolver::new(&registry, Report::new(), Config::default());
        reset(&mut resolver, &[]);

        resolver.set_undefined(false, "@wip");
        assert_eq!(resolver.config().undefined_tag, "wip");

        reset(&mut resolver, &["wip"]);
        assert_eq!(resolver.given("12 cucumbers").status, Status::Undefined);
    }

    #[test]
    fn table_argument_arity_is_checked() {
        let registry = registry();
        let mut resolver =
            StepResolver::new(&registry, Report::new(), Config::default());
        reset(&mut resolver, &[]);

        let table = Table::new(["a"]).unwrap();
        let result = resolver.given(StepInput::new("3 cucumbers").table(table));

        assert_eq!(result.status, Status::Failed);
        let scenario = resolver.reported_scenario().unwrap();
        assert_eq!(scenario.steps[0].arguments.len(), 1);
    }
}
