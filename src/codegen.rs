// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Link-time self-registration of [`Binding`] containers.
//!
//! ```rust
//! use givenspecs::{register_bindings, Binding, Bindings, Registry, ScenarioContext};
//!
//! struct Calculator;
//!
//! impl Binding for Calculator {
//!     fn new(_: &mut ScenarioContext) -> Self {
//!         Self
//!     }
//!
//!     fn register(bindings: Bindings<Self>) -> Bindings<Self> {
//!         bindings.given(r"(\d+) is entered", Self::enter)
//!     }
//! }
//!
//! impl Calculator {
//!     fn enter(&mut self, ctx: &mut ScenarioContext, n: i64) {
//!         ctx.insert("entered", n);
//!     }
//! }
//!
//! register_bindings!(Calculator);
//!
//! let registry = Registry::discover().unwrap();
//! assert!(!registry.steps().is_empty());
//! ```

use once_cell::sync::Lazy;

use crate::{
    registry::{Registry, RegistryBuilder, RegistryError},
    step::Binding,
};

pub use inventory::{self, collect, submit};

/// [`Binding`] container submitted via [`register_bindings!`].
///
/// [`register_bindings!`]: crate::register_bindings
#[derive(Clone, Copy, Debug)]
pub struct Registration {
    /// Registers the container's handlers.
    register: fn(RegistryBuilder) -> RegistryBuilder,
}

impl Registration {
    /// Creates a [`Registration`] of the container `B`.
    #[must_use]
    pub const fn of<B: Binding>() -> Self {
        Self { register: RegistryBuilder::bindings::<B> }
    }
}

inventory::collect!(Registration);

/// [`Registry`] of all the submitted containers, built on first access.
static DISCOVERED: Lazy<Result<Registry, RegistryError>> = Lazy::new(|| {
    let registrations = inventory::iter::<Registration>.into_iter();
    let builder = registrations
        .fold(Registry::builder(), |builder, r| (r.register)(builder));
    builder.build()
});

impl Registry {
    /// Returns the [`Registry`] of all the [`Binding`] containers submitted
    /// via [`register_bindings!`] anywhere in the binary.
    ///
    /// Containers are scanned once, subsequent calls return the same
    /// [`Registry`].
    ///
    /// # Errors
    ///
    /// If some submitted pattern is invalid.
    ///
    /// [`register_bindings!`]: crate::register_bindings
    pub fn discover() -> Result<&'static Self, RegistryError> {
        DISCOVERED.as_ref().map_err(Clone::clone)
    }
}

/// Submits [`Binding`] containers for [`Registry::discover()`].
///
/// [`Binding`]: crate::Binding
/// [`Registry::discover()`]: crate::Registry::discover
#[macro_export]
macro_rules! register_bindings {
    ($($ty:ty),+ $(,)?) => {$(
        $crate::codegen::submit! {
            $crate::codegen::Registration::of::<$ty>()
        }
    )+};
}
