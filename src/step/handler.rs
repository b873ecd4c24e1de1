// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Typed step handlers and their type erasure.
//!
//! A step handler is a plain function (or a closure) taking the
//! [`ScenarioContext`] followed by its typed [`Parameter`]s:
//!
//! ```rust
//! # use givenspecs::ScenarioContext;
//! #
//! fn eat(ctx: &mut ScenarioContext, count: u32) {
//!     let left = ctx.get::<u32>("cucumbers").copied().unwrap_or_default();
//!     ctx.insert("cucumbers", left - count);
//! }
//! ```
//!
//! A handler of a [`Binding`] container additionally takes the container,
//! which is freshly constructed for every invocation:
//!
//! ```rust
//! # use givenspecs::{Binding, Bindings, ScenarioContext};
//! #
//! struct Basket {
//!     capacity: u32,
//! }
//!
//! impl Basket {
//!     fn fill(&mut self, ctx: &mut ScenarioContext, count: u32) -> anyhow::Result<()> {
//!         anyhow::ensure!(count <= self.capacity, "basket is full");
//!         ctx.insert("cucumbers", count);
//!         Ok(())
//!     }
//! }
//!
//! impl Binding for Basket {
//!     fn new(_: &mut ScenarioContext) -> Self {
//!         Self { capacity: 10 }
//!     }
//!
//!     fn register(bindings: Bindings<Self>) -> Bindings<Self> {
//!         bindings.given(r"I put (\d+) cucumbers", Self::fill)
//!     }
//! }
//! ```

use std::{marker::PhantomData, vec};

use super::StepError;
use crate::{
    parameter::{CoercionError, ParamKind, Parameter, Value},
    registry::Bindings,
    ScenarioContext,
};

/// Container of step definitions and hooks, constructed anew for every
/// invocation of its handlers.
pub trait Binding: Sized + 'static {
    /// Creates a new instance for a single handler invocation.
    fn new(ctx: &mut ScenarioContext) -> Self;

    /// Registers the handlers of this container.
    fn register(bindings: Bindings<Self>) -> Bindings<Self>;
}

/// Return type of a step or hook handler.
pub trait StepOutput {
    /// Converts this output into a [`Result`].
    ///
    /// # Errors
    ///
    /// If the handler failed.
    fn into_result(self) -> anyhow::Result<()>;
}

impl StepOutput for () {
    fn into_result(self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<E: Into<anyhow::Error>> StepOutput for Result<(), E> {
    fn into_result(self) -> anyhow::Result<()> {
        self.map_err(Into::into)
    }
}

/// Marker of a [`Handler`] taking only the [`ScenarioContext`] and
/// parameters.
#[derive(Clone, Copy, Debug)]
pub struct Unbound;

/// Marker of a [`Handler`] taking a freshly constructed [`Binding`] first.
#[derive(Debug)]
pub struct Bound<B>(PhantomData<fn() -> B>);

/// Typed step handler of some arity.
///
/// Implemented for functions of up to 8 [`Parameter`]s. The `M` marker is
/// either [`Unbound`] or [`Bound`], and `Args` is a tuple of the parameter
/// types.
pub trait Handler<M, Args>: Send + Sync + 'static {
    /// Returns the declared [`ParamKind`]s in order.
    fn parameters(&self) -> Vec<ParamKind>;

    /// Invokes this [`Handler`] with the coerced `args`.
    ///
    /// # Errors
    ///
    /// If the `args` don't fit the parameters, or the handler body fails.
    fn invoke(
        &self,
        ctx: &mut ScenarioContext,
        args: Vec<Value>,
    ) -> Result<(), StepError>;
}

/// Takes the next argument out of the `args` and extracts it.
fn next<P: Parameter>(
    args: &mut vec::IntoIter<Value>,
) -> Result<P, CoercionError> {
    args.next()
        .ok_or(CoercionError::Arity { expected: 1, actual: 0 })
        .and_then(P::extract)
}

/// Checks the number of `args` against the `expected` one.
fn check_arity(args: &[Value], expected: usize) -> Result<(), CoercionError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(CoercionError::Arity { expected, actual: args.len() })
    }
}

/// Implements [`Handler`] for functions of the given parameters.
macro_rules! impl_handler {
    ($($arg:ident),*) => {
        #[allow(non_snake_case, unused_mut, unused_variables)]
        impl<F, R, $($arg,)*> Handler<Unbound, ($($arg,)*)> for F
        where
            F: Fn(&mut ScenarioContext, $($arg),*) -> R + Send + Sync + 'static,
            R: StepOutput,
            $($arg: Parameter,)*
        {
            fn parameters(&self) -> Vec<ParamKind> {
                vec![$($arg::kind()),*]
            }

            fn invoke(
                &self,
                ctx: &mut ScenarioContext,
                args: Vec<Value>,
            ) -> Result<(), StepError> {
                check_arity(&args, <[&str]>::len(&[$(stringify!($arg)),*]))?;
                let mut args = args.into_iter();
                $(let $arg = next::<$arg>(&mut args)?;)*
                self(ctx, $($arg),*).into_result().map_err(StepError::failed)
            }
        }

        #[allow(non_snake_case, unused_mut, unused_variables)]
        impl<B, F, R, $($arg,)*> Handler<Bound<B>, ($($arg,)*)> for F
        where
            B: Binding,
            F: Fn(&mut B, &mut ScenarioContext, $($arg),*) -> R
                + Send
                + Sync
                + 'static,
            R: StepOutput,
            $($arg: Parameter,)*
        {
            fn parameters(&self) -> Vec<ParamKind> {
                vec![$($arg::kind()),*]
            }

            fn invoke(
                &self,
                ctx: &mut ScenarioContext,
                args: Vec<Value>,
            ) -> Result<(), StepError> {
                check_arity(&args, <[&str]>::len(&[$(stringify!($arg)),*]))?;
                let mut args = args.into_iter();
                $(let $arg = next::<$arg>(&mut args)?;)*
                let mut binding = B::new(ctx);
                self(&mut binding, ctx, $($arg),*)
                    .into_result()
                    .map_err(StepError::failed)
            }
        }
    };
}

impl_handler!();
impl_handler!(P1);
impl_handler!(P1, P2);
impl_handler!(P1, P2, P3);
impl_handler!(P1, P2, P3, P4);
impl_handler!(P1, P2, P3, P4, P5);
impl_handler!(P1, P2, P3, P4, P5, P6);
impl_handler!(P1, P2, P3, P4, P5, P6, P7);
impl_handler!(P1, P2, P3, P4, P5, P6, P7, P8);
