// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Indexed step definitions, hooks and parameter converters.
//!
//! A [`Registry`] is assembled once through a [`RegistryBuilder`] and is
//! read-only afterwards, so it can be shared by any number of
//! [`StepResolver`]s.
//!
//! [`StepResolver`]: crate::StepResolver

mod builder;
mod error;

use std::sync::Arc;

use derive_more::with_trait::{Debug, Display};

use crate::{
    parameter::{Converters, ParamKind, Value},
    step::{HashableRegex, Kind, Location, StepError},
    ScenarioContext,
};

pub use self::{
    builder::{Bindings, HookOptions, RegistryBuilder},
    error::RegistryError,
};

/// Type-erased step handler.
pub(crate) type StepFn = Arc<
    dyn Fn(&mut ScenarioContext, Vec<Value>) -> Result<(), StepError>
        + Send
        + Sync,
>;

/// Type-erased hook handler. Scenario hooks ignore the step text.
pub(crate) type HookFn =
    Arc<dyn Fn(&mut ScenarioContext, &str) -> anyhow::Result<()> + Send + Sync>;

/// Registered step definition.
#[derive(Clone, Debug)]
pub struct StepDefinition {
    /// [`Kind`] of steps this definition matches.
    kind: Kind,

    /// Anchored pattern of this definition.
    regex: HashableRegex,

    /// [`Location`] of the registration.
    location: Location,

    /// Declared parameters of the handler.
    parameters: Vec<ParamKind>,

    /// Type-erased handler.
    #[debug(skip)]
    handler: StepFn,
}

impl StepDefinition {
    /// Returns the [`Kind`] of steps this definition matches.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the anchored pattern of this definition.
    #[must_use]
    pub const fn regex(&self) -> &HashableRegex {
        &self.regex
    }

    /// Returns the [`Location`] this definition has been registered at.
    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    /// Returns the declared parameters of the handler.
    #[must_use]
    pub fn parameters(&self) -> &[ParamKind] {
        &self.parameters
    }

    /// Invokes the handler with the coerced `args`.
    ///
    /// # Errors
    ///
    /// If the `args` don't fit the handler, or its body fails.
    pub fn invoke(
        &self,
        ctx: &mut ScenarioContext,
        args: Vec<Value>,
    ) -> Result<(), StepError> {
        (self.handler)(ctx, args)
    }
}

/// Kind of a hook.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum HookKind {
    /// Runs once before the steps of a scenario.
    #[display("BeforeScenario")]
    BeforeScenario,

    /// Runs once after the steps of a scenario.
    #[display("AfterScenario")]
    AfterScenario,

    /// Runs before every step.
    #[display("BeforeStep")]
    BeforeStep,

    /// Runs after every step.
    #[display("AfterStep")]
    AfterStep,
}

/// Registered hook.
#[derive(Clone, Debug)]
pub struct HookDefinition {
    /// [`HookKind`] of this hook.
    kind: HookKind,

    /// Scenario tags (without `@`) this hook is limited to. Empty means any
    /// scenario.
    tags: Vec<String>,

    /// Ordering key, lower runs first.
    order: i32,

    /// [`Location`] of the registration.
    location: Location,

    /// Type-erased handler.
    #[debug(skip)]
    handler: HookFn,
}

impl HookDefinition {
    /// Returns the [`HookKind`] of this hook.
    #[must_use]
    pub const fn kind(&self) -> HookKind {
        self.kind
    }

    /// Returns the tags this hook is limited to.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the ordering key of this hook.
    #[must_use]
    pub const fn order(&self) -> i32 {
        self.order
    }

    /// Returns the [`Location`] this hook has been registered at.
    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    /// Indicates whether this hook runs for a scenario with the given
    /// `scenario_tags`.
    #[must_use]
    pub fn applies_to(&self, scenario_tags: &[String]) -> bool {
        self.tags.is_empty()
            || self.tags.iter().any(|t| {
                scenario_tags.iter().any(|s| s.trim_start_matches('@') == t)
            })
    }

    /// Invokes the handler.
    ///
    /// # Errors
    ///
    /// If the hook body fails.
    pub fn invoke(
        &self,
        ctx: &mut ScenarioContext,
        step_text: &str,
    ) -> anyhow::Result<()> {
        (self.handler)(ctx, step_text)
    }
}

/// Step definition matched by a step text, along with its captures.
#[derive(Clone, Debug)]
pub struct Match<'r> {
    /// Matched [`StepDefinition`].
    pub definition: &'r StepDefinition,

    /// Capture groups in left-to-right order. A group that didn't
    /// participate in the match is an empty string.
    pub captures: Vec<String>,
}

/// Read-only index of step definitions, hooks and converters.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    /// Step definitions in registration order.
    steps: Vec<StepDefinition>,

    /// Hooks sorted by their order, ties in registration order.
    hooks: Vec<HookDefinition>,

    /// Converters of custom parameter types.
    converters: Converters,
}

impl Registry {
    /// Creates a new [`RegistryBuilder`].
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Returns all the [`StepDefinition`]s in registration order.
    #[must_use]
    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    /// Returns the hooks of the given [`HookKind`] in their running order.
    pub fn hooks(
        &self,
        kind: HookKind,
    ) -> impl Iterator<Item = &HookDefinition> + '_ {
        self.hooks.iter().filter(move |h| h.kind == kind)
    }

    /// Returns the registered [`Converters`].
    #[must_use]
    pub const fn converters(&self) -> &Converters {
        &self.converters
    }

    /// Finds the only [`StepDefinition`] of the given concrete `kind` (or of
    /// [`Kind::Any`]) matching the whole `text`.
    ///
    /// # Errors
    ///
    /// - [`StepError::NotFound`] if nothing matches;
    /// - [`StepError::Ambiguous`] if more than one definition matches.
    pub fn find(&self, kind: Kind, text: &str) -> Result<Match<'_>, StepError> {
        let mut matches = self
            .steps
            .iter()
            .filter(|def| def.kind.accepts(kind))
            .filter_map(|def| def.regex.captures(text).map(|c| (def, c)))
            .collect::<Vec<_>>();

        if matches.len() > 1 {
            return Err(StepError::Ambiguous {
                keyword: kind.to_string(),
                text: text.to_owned(),
                possible_matches: matches
                    .into_iter()
                    .map(|(def, _)| (def.regex.clone(), def.location))
                    .collect(),
            });
        }
        let Some((definition, captures)) = matches.pop() else {
            return Err(StepError::NotFound {
                keyword: kind.to_string(),
                text: text.to_owned(),
            });
        };

        let captures = captures
            .iter()
            .skip(1)
            .map(|c| c.map_or_else(String::new, |m| m.as_str().to_owned()))
            .collect();
        Ok(Match { definition, captures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Report;

    fn noop(_: &mut ScenarioContext) {}

    fn noop_text(_: &mut ScenarioContext, _: String) {}

    fn registry() -> Registry {
        Registry::builder()
            .given(r"I have (\d+) cucumbers", |_: &mut ScenarioContext, _: u32| {})
            .when("I eat (?:some|(\\d+)) cucumbers", noop_text)
            .then("nothing happens", noop)
            .step("anything happens", noop)
            .build()
            .unwrap()
    }

    #[test]
    fn finds_by_kind() {
        let registry = registry();

        let m = registry.find(Kind::Given, "I have 5 cucumbers").unwrap();
        assert_eq!(m.captures, ["5"]);
        assert_eq!(m.definition.parameters(), [ParamKind::U32]);

        assert!(matches!(
            registry.find(Kind::When, "I have 5 cucumbers"),
            Err(StepError::NotFound { .. }),
        ));
    }

    #[test]
    fn any_kind_matches_every_keyword() {
        let registry = registry();

        for kind in [Kind::Given, Kind::When, Kind::Then] {
            assert!(registry.find(kind, "anything happens").is_ok());
        }
    }

    #[test]
    fn unmatched_group_is_empty() {
        let registry = registry();

        let m = registry.find(Kind::When, "I eat some cucumbers").unwrap();

        assert_eq!(m.captures, [""]);
    }

    #[test]
    fn partial_match_is_not_a_match() {
        let registry = registry();

        assert!(registry.find(Kind::Then, "nothing happens at all").is_err());
    }

    #[test]
    fn multiple_matches_are_ambiguous() {
        let registry = Registry::builder()
            .then(r"a (\w+) cat", noop_text)
            .step(r"a black (\w+)", noop_text)
            .build()
            .unwrap();

        let err = registry.find(Kind::Then, "a black cat").unwrap_err();

        assert!(matches!(
            &err,
            StepError::Ambiguous { possible_matches, .. }
                if possible_matches.len() == 2,
        ));
        assert_eq!(
            err.to_string(),
            "multiple step implementations founds for Then -> a black cat",
        );
    }

    #[test]
    fn hooks_are_ordered_and_filtered() {
        let registry = Registry::builder()
            .before_scenario(noop)
            .before_scenario_with(HookOptions::default().order(1), noop)
            .before_scenario_with(HookOptions::default().tags(["@db"]), noop)
            .after_step(|_: &mut ScenarioContext, _: &str| {})
            .build()
            .unwrap();

        let orders = registry
            .hooks(HookKind::BeforeScenario)
            .map(HookDefinition::order)
            .collect::<Vec<_>>();
        assert_eq!(orders, [1, 10_000, 10_000]);

        let tagged = registry.hooks(HookKind::BeforeScenario).last().unwrap();
        assert_eq!(tagged.tags(), ["db"]);
        assert!(tagged.applies_to(&["db".to_owned()]));
        assert!(!tagged.applies_to(&["web".to_owned()]));
        assert_eq!(registry.hooks(HookKind::AfterStep).count(), 1);

        let mut ctx = ScenarioContext::new(vec![], Report::new());
        for hook in registry.hooks(HookKind::BeforeScenario) {
            hook.invoke(&mut ctx, "").unwrap();
        }
    }
}
