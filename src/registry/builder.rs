// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Assembling a [`Registry`].

use std::{marker::PhantomData, sync::Arc};

use derive_more::with_trait::Debug;
use smart_default::SmartDefault;

use super::{
    HookDefinition, HookFn, HookKind, Registry, RegistryError, StepDefinition,
    StepFn,
};
use crate::{
    parameter::{Converters, ParamKind, Parameter, Value},
    step::{
        Binding, Bound, Handler, HashableRegex, Kind, Location, StepOutput,
        Unbound,
    },
    ScenarioContext,
};

/// Options of a registered hook.
#[derive(Clone, Debug, SmartDefault)]
pub struct HookOptions {
    /// Scenario tags the hook is limited to. Empty means any scenario.
    pub tags: Vec<String>,

    /// Ordering key, lower runs first.
    #[default(10_000)]
    pub order: i32,
}

impl HookOptions {
    /// Limits the hook to scenarios carrying at least one of the given
    /// `tags` (with or without `@`).
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = tags
            .into_iter()
            .map(|t| t.as_ref().trim_start_matches('@').to_owned())
            .collect();
        self
    }

    /// Sets the ordering key of the hook.
    #[must_use]
    pub const fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

/// Step definition waiting for its pattern to be compiled.
#[derive(Debug)]
struct PendingStep {
    /// [`Kind`] of steps to match.
    kind: Kind,

    /// Raw pattern.
    pattern: String,

    /// [`Location`] of the registration.
    location: Location,

    /// Declared parameters of the handler.
    parameters: Vec<ParamKind>,

    /// Type-erased handler.
    #[debug(skip)]
    handler: StepFn,
}

/// Builder of a [`Registry`].
///
/// ```rust
/// use givenspecs::{Registry, ScenarioContext};
///
/// let registry = Registry::builder()
///     .given(r"(\d+) cucumbers", |ctx: &mut ScenarioContext, n: u32| {
///         ctx.insert("cucumbers", n);
///     })
///     .before_scenario(|ctx: &mut ScenarioContext| ctx.log("starting"))
///     .build()
///     .unwrap();
///
/// assert_eq!(registry.steps().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    /// Step definitions in registration order.
    steps: Vec<PendingStep>,

    /// Hooks in registration order.
    hooks: Vec<HookDefinition>,

    /// Converters of custom parameter types.
    converters: Converters,
}

impl RegistryBuilder {
    /// Registers a [Given] step definition.
    ///
    /// [Given]: https://cucumber.io/docs/gherkin/reference#given
    #[must_use]
    #[track_caller]
    pub fn given<A, H>(self, pattern: impl Into<String>, handler: H) -> Self
    where
        A: 'static,
        H: Handler<Unbound, A>,
    {
        self.push_step(Kind::Given, pattern, Location::caller(), handler)
    }

    /// Registers a [When] step definition.
    ///
    /// [When]: https://cucumber.io/docs/gherkin/reference#when
    #[must_use]
    #[track_caller]
    pub fn when<A, H>(self, pattern: impl Into<String>, handler: H) -> Self
    where
        A: 'static,
        H: Handler<Unbound, A>,
    {
        self.push_step(Kind::When, pattern, Location::caller(), handler)
    }

    /// Registers a [Then] step definition.
    ///
    /// [Then]: https://cucumber.io/docs/gherkin/reference#then
    #[must_use]
    #[track_caller]
    pub fn then<A, H>(self, pattern: impl Into<String>, handler: H) -> Self
    where
        A: 'static,
        H: Handler<Unbound, A>,
    {
        self.push_step(Kind::Then, pattern, Location::caller(), handler)
    }

    /// Registers a step definition matching steps of any kind.
    #[must_use]
    #[track_caller]
    pub fn step<A, H>(self, pattern: impl Into<String>, handler: H) -> Self
    where
        A: 'static,
        H: Handler<Unbound, A>,
    {
        self.push_step(Kind::Any, pattern, Location::caller(), handler)
    }

    /// Registers a hook running before every scenario.
    #[must_use]
    #[track_caller]
    pub fn before_scenario<F, R>(self, hook: F) -> Self
    where
        F: Fn(&mut ScenarioContext) -> R + Send + Sync + 'static,
        R: StepOutput,
    {
        self.before_scenario_with(HookOptions::default(), hook)
    }

    /// Registers a hook running before scenarios, with the given
    /// [`HookOptions`].
    #[must_use]
    #[track_caller]
    pub fn before_scenario_with<F, R>(self, opts: HookOptions, hook: F) -> Self
    where
        F: Fn(&mut ScenarioContext) -> R + Send + Sync + 'static,
        R: StepOutput,
    {
        let loc = Location::caller();
        self.push_hook(HookKind::BeforeScenario, opts, loc, scenario_hook(hook))
    }

    /// Registers a hook running after every scenario.
    #[must_use]
    #[track_caller]
    pub fn after_scenario<F, R>(self, hook: F) -> Self
    where
        F: Fn(&mut ScenarioContext) -> R + Send + Sync + 'static,
        R: StepOutput,
    {
        self.after_scenario_with(HookOptions::default(), hook)
    }

    /// Registers a hook running after scenarios, with the given
    /// [`HookOptions`].
    #[must_use]
    #[track_caller]
    pub fn after_scenario_with<F, R>(self, opts: HookOptions, hook: F) -> Self
    where
        F: Fn(&mut ScenarioContext) -> R + Send + Sync + 'static,
        R: StepOutput,
    {
        let loc = Location::caller();
        self.push_hook(HookKind::AfterScenario, opts, loc, scenario_hook(hook))
    }

    /// Registers a hook running before every step, receiving its text.
    #[must_use]
    #[track_caller]
    pub fn before_step<F, R>(self, hook: F) -> Self
    where
        F: Fn(&mut ScenarioContext, &str) -> R + Send + Sync + 'static,
        R: StepOutput,
    {
        self.before_step_with(HookOptions::default(), hook)
    }

    /// Registers a hook running before steps, with the given
    /// [`HookOptions`].
    #[must_use]
    #[track_caller]
    pub fn before_step_with<F, R>(self, opts: HookOptions, hook: F) -> Self
    where
        F: Fn(&mut ScenarioContext, &str) -> R + Send + Sync + 'static,
        R: StepOutput,
    {
        let loc = Location::caller();
        self.push_hook(HookKind::BeforeStep, opts, loc, step_hook(hook))
    }

    /// Registers a hook running after every step, receiving its text.
    #[must_use]
    #[track_caller]
    pub fn after_step<F, R>(self, hook: F) -> Self
    where
        F: Fn(&mut ScenarioContext, &str) -> R + Send + Sync + 'static,
        R: StepOutput,
    {
        self.after_step_with(HookOptions::default(), hook)
    }

    /// Registers a hook running after steps, with the given [`HookOptions`].
    #[must_use]
    #[track_caller]
    pub fn after_step_with<F, R>(self, opts: HookOptions, hook: F) -> Self
    where
        F: Fn(&mut ScenarioContext, &str) -> R + Send + Sync + 'static,
        R: StepOutput,
    {
        let loc = Location::caller();
        self.push_hook(HookKind::AfterStep, opts, loc, step_hook(hook))
    }

    /// Registers a converter of the custom parameter type `T`.
    #[must_use]
    pub fn converter<T, E, F>(mut self, convert: F) -> Self
    where
        T: Parameter + Send,
        E: Into<anyhow::Error>,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        self.converters.insert(convert);
        self
    }

    /// Registers all the handlers of the [`Binding`] container `B`.
    #[must_use]
    pub fn bindings<B: Binding>(self) -> Self {
        B::register(Bindings { builder: self, _binding: PhantomData })
            .builder
    }

    /// Compiles all the patterns and builds the [`Registry`].
    ///
    /// # Errors
    ///
    /// With [`RegistryError::InvalidPattern`] on the first pattern that is
    /// not a valid regular expression.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let steps = self
            .steps
            .into_iter()
            .map(|s| {
                let regex =
                    HashableRegex::anchored(&s.pattern).map_err(|source| {
                        RegistryError::InvalidPattern {
                            pattern: s.pattern.clone(),
                            location: s.location,
                            source,
                        }
                    })?;
                Ok(StepDefinition {
                    kind: s.kind,
                    regex,
                    location: s.location,
                    parameters: s.parameters,
                    handler: s.handler,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut hooks = self.hooks;
        hooks.sort_by_key(|h| h.order);

        tracing::debug!(
            steps = steps.len(),
            hooks = hooks.len(),
            converters = self.converters.len(),
            "registry built",
        );
        Ok(Registry { steps, hooks, converters: self.converters })
    }

    /// Adds a step definition with the given `handler`.
    fn push_step<M, A, H>(
        mut self,
        kind: Kind,
        pattern: impl Into<String>,
        location: Location,
        handler: H,
    ) -> Self
    where
        M: 'static,
        A: 'static,
        H: Handler<M, A>,
    {
        let parameters = handler.parameters();
        let handler: StepFn =
            Arc::new(move |ctx: &mut ScenarioContext, args: Vec<Value>| {
                handler.invoke(ctx, args)
            });
        self.steps.push(PendingStep {
            kind,
            pattern: pattern.into(),
            location,
            parameters,
            handler,
        });
        self
    }

    /// Adds a hook with the given `handler`.
    fn push_hook(
        mut self,
        kind: HookKind,
        opts: HookOptions,
        location: Location,
        handler: HookFn,
    ) -> Self {
        self.hooks.push(HookDefinition {
            kind,
            tags: opts.tags,
            order: opts.order,
            location,
            handler,
        });
        self
    }
}

/// Erases a scenario `hook`.
fn scenario_hook<F, R>(hook: F) -> HookFn
where
    F: Fn(&mut ScenarioContext) -> R + Send + Sync + 'static,
    R: StepOutput,
{
    Arc::new(move |ctx: &mut ScenarioContext, _: &str| hook(ctx).into_result())
}

/// Erases a step `hook`.
fn step_hook<F, R>(hook: F) -> HookFn
where
    F: Fn(&mut ScenarioContext, &str) -> R + Send + Sync + 'static,
    R: StepOutput,
{
    Arc::new(move |ctx: &mut ScenarioContext, text: &str| {
        hook(ctx, text).into_result()
    })
}

/// Registrar of the handlers of a [`Binding`] container `B`.
///
/// Every handler takes a fresh `B` (built with [`Binding::new()`]) as its
/// first argument.
#[derive(Debug)]
pub struct Bindings<B> {
    /// Wrapped [`RegistryBuilder`].
    builder: RegistryBuilder,

    /// Type of the container.
    #[debug(skip)]
    _binding: PhantomData<fn() -> B>,
}

impl<B: Binding> Bindings<B> {
    /// Registers a [Given] step definition.
    ///
    /// [Given]: https://cucumber.io/docs/gherkin/reference#given
    #[must_use]
    #[track_caller]
    pub fn given<A, H>(self, pattern: impl Into<String>, handler: H) -> Self
    where
        A: 'static,
        H: Handler<Bound<B>, A>,
    {
        self.push_step(Kind::Given, pattern, Location::caller(), handler)
    }

    /// Registers a [When] step definition.
    ///
    /// [When]: https://cucumber.io/docs/gherkin/reference#when
    #[must_use]
    #[track_caller]
    pub fn when<A, H>(self, pattern: impl Into<String>, handler: H) -> Self
    where
        A: 'static,
        H: Handler<Bound<B>, A>,
    {
        self.push_step(Kind::When, pattern, Location::caller(), handler)
    }

    /// Registers a [Then] step definition.
    ///
    /// [Then]: https://cucumber.io/docs/gherkin/reference#then
    #[must_use]
    #[track_caller]
    pub fn then<A, H>(self, pattern: impl Into<String>, handler: H) -> Self
    where
        A: 'static,
        H: Handler<Bound<B>, A>,
    {
        self.push_step(Kind::Then, pattern, Location::caller(), handler)
    }

    /// Registers a step definition matching steps of any kind.
    #[must_use]
    #[track_caller]
    pub fn step<A, H>(self, pattern: impl Into<String>, handler: H) -> Self
    where
        A: 'static,
        H: Handler<Bound<B>, A>,
    {
        self.push_step(Kind::Any, pattern, Location::caller(), handler)
    }

    /// Registers a scenario hook of the given [`HookKind`].
    ///
    /// A step [`HookKind`] runs the `hook` without exposing the step text,
    /// use [`Bindings::step_hook()`] to receive it.
    #[must_use]
    #[track_caller]
    pub fn hook<F, R>(self, kind: HookKind, opts: HookOptions, hook: F) -> Self
    where
        F: Fn(&mut B, &mut ScenarioContext) -> R + Send + Sync + 'static,
        R: StepOutput,
    {
        let loc = Location::caller();
        let handler: HookFn =
            Arc::new(move |ctx: &mut ScenarioContext, _: &str| {
                let mut binding = B::new(ctx);
                hook(&mut binding, ctx).into_result()
            });
        Self {
            builder: self.builder.push_hook(kind, opts, loc, handler),
            _binding: PhantomData,
        }
    }

    /// Registers a step hook of the given [`HookKind`], receiving the step
    /// text.
    #[must_use]
    #[track_caller]
    pub fn step_hook<F, R>(
        self,
        kind: HookKind,
        opts: HookOptions,
        hook: F,
    ) -> Self
    where
        F: Fn(&mut B, &mut ScenarioContext, &str) -> R + Send + Sync + 'static,
        R: StepOutput,
    {
        let loc = Location::caller();
        let handler: HookFn =
            Arc::new(move |ctx: &mut ScenarioContext, text: &str| {
                let mut binding = B::new(ctx);
                hook(&mut binding, ctx, text).into_result()
            });
        Self {
            builder: self.builder.push_hook(kind, opts, loc, handler),
            _binding: PhantomData,
        }
    }

    /// Registers a converter of the custom parameter type `T`.
    #[must_use]
    pub fn converter<T, E, F>(self, convert: F) -> Self
    where
        T: Parameter + Send,
        E: Into<anyhow::Error>,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        Self { builder: self.builder.converter(convert), _binding: PhantomData }
    }

    /// Adds a step definition with the given `handler`.
    fn push_step<A, H>(
        self,
        kind: Kind,
        pattern: impl Into<String>,
        location: Location,
        handler: H,
    ) -> Self
    where
        A: 'static,
        H: Handler<Bound<B>, A>,
    {
        Self {
            builder: self.builder.push_step(kind, pattern, location, handler),
            _binding: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Report;

    struct Greeter {
        greeting: String,
    }

    impl Binding for Greeter {
        fn new(ctx: &mut ScenarioContext) -> Self {
            let greeting = ctx.get::<String>("greeting").cloned();
            Self { greeting: greeting.unwrap_or_else(|| "Hello".into()) }
        }

        fn register(bindings: Bindings<Self>) -> Bindings<Self> {
            bindings
                .when(r"I greet (\w+)", Self::greet)
                .hook(
                    HookKind::BeforeScenario,
                    HookOptions::default().order(5),
                    Self::prepare,
                )
        }
    }

    impl Greeter {
        fn greet(&mut self, ctx: &mut ScenarioContext, name: String) {
            ctx.insert("said", format!("{}, {name}!", self.greeting));
        }

        fn prepare(&mut self, ctx: &mut ScenarioContext) {
            ctx.insert("greeting", "Hi".to_owned());
        }
    }

    #[test]
    fn bindings_register_their_handlers() {
        let registry =
            RegistryBuilder::default().bindings::<Greeter>().build().unwrap();
        let mut ctx = ScenarioContext::new(vec![], Report::new());

        for hook in registry.hooks(HookKind::BeforeScenario) {
            hook.invoke(&mut ctx, "").unwrap();
        }
        let m = registry.find(Kind::When, "I greet Bob").unwrap();
        m.definition
            .invoke(&mut ctx, vec![crate::parameter::Value::Text("Bob".into())])
            .unwrap();

        assert_eq!(ctx.get::<String>("said").unwrap(), "Hi, Bob!");
    }

    #[test]
    fn invalid_pattern_is_reported_with_location() {
        let err = RegistryBuilder::default()
            .given("unclosed (group", |_: &mut ScenarioContext| {})
            .build()
            .unwrap_err();

        let RegistryError::InvalidPattern { pattern, location, .. } = err;
        assert_eq!(pattern, "unclosed (group");
        assert!(location.path.ends_with("builder.rs"));
    }

    #[test]
    fn debug_skips_handlers() {
        let builder = RegistryBuilder::default()
            .given("a step", |_: &mut ScenarioContext| {})
            .before_scenario(|_: &mut ScenarioContext| {});
        let debug = format!("{builder:?}");

        assert!(debug.starts_with("RegistryBuilder"));
        assert!(debug.contains("a step"));

        let bindings = Bindings::<Greeter> { builder, _binding: PhantomData };
        assert!(format!("{bindings:?}").starts_with("Bindings"));
    }

    #[test]
    fn hook_options_strip_at_sign() {
        let opts = HookOptions::default().tags(["@db", "web"]).order(3);

        assert_eq!(opts.tags, ["db", "web"]);
        assert_eq!(opts.order, 3);
        assert_eq!(HookOptions::default().order, 10_000);
    }
}
