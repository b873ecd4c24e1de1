// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Behaviour-driven test execution layer.
//!
//! Takes already parsed `.feature` documents and drives user-written step
//! definitions matched by regular expressions, with ordered hooks, outline
//! expansion, placeholder substitution, a JSON-serializable result tree and
//! table-to-object data binding.
//!
//! ```rust
//! use givenspecs::{
//!     document, gherkin, Config, FeatureModel, Registry, Report, Runner,
//!     ScenarioContext,
//! };
//!
//! let feature: document::Feature = gherkin::Feature::parse(
//!     "Feature: Eating\n\
//!      \x20 Scenario Outline: eating\n\
//!      \x20   Given there are <start> cucumbers\n\
//!      \x20   When I eat <eat> cucumbers\n\
//!      \x20   Then I should have <left> cucumbers\n\
//!      \x20   Examples: small\n\
//!      \x20     | start | eat | left |\n\
//!      \x20     | 12    | 5   | 7    |\n\
//!      \x20     | 20    | 4   | 16   |\n",
//!     gherkin::GherkinEnv::default(),
//! )
//! .map(|f| document::Feature::from(&f))
//! .unwrap();
//!
//! let registry = Registry::builder()
//!     .given(r"there are (\d+) cucumbers", |ctx: &mut ScenarioContext, n: u32| {
//!         ctx.insert("cucumbers", n);
//!     })
//!     .when(r"I eat (\d+) cucumbers", |ctx: &mut ScenarioContext, n: u32| {
//!         *ctx.get_mut::<u32>("cucumbers").unwrap() -= n;
//!     })
//!     .then(r"I should have (\d+) cucumbers", |ctx: &mut ScenarioContext, n: u32| {
//!         assert_eq!(ctx.get::<u32>("cucumbers"), Some(&n));
//!     })
//!     .build()
//!     .unwrap();
//!
//! let mut runner = Runner::new(&registry, Report::new(), Config::default());
//! let summary = runner.run(&FeatureModel::new(&feature)).unwrap();
//! assert_eq!((summary.passed, summary.failed), (2, 0));
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(nonstandard_style, trivial_casts, trivial_numeric_casts)]
#![forbid(non_ascii_idents, unsafe_code)]
#![warn(
    clippy::pedantic,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]

pub mod cli;
#[cfg(feature = "macros")]
pub mod codegen;
pub mod config;
pub mod context;
pub mod document;
pub mod outline;
pub mod parameter;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod runner;
pub mod slug;
pub mod step;
pub mod table;

pub use gherkin;

#[doc(inline)]
pub use self::{
    config::Config,
    context::ScenarioContext,
    outline::{FeatureModel, ScenarioModel, StepModel},
    parameter::{CoercionError, Converters, ParamKind, Parameter},
    registry::{
        Bindings, HookKind, HookOptions, Registry, RegistryBuilder,
        RegistryError,
    },
    report::{Report, ReportError, ScenarioHandle, Status},
    resolver::{HookError, Phase, ScenarioError, StepInput, StepResolver},
    runner::{CaseOutcome, RunError, RunSummary, Runner},
    step::{Binding, Handler, Keyword, Kind, Location, StepError},
    table::{
        BindError, Comparator, Comparison, Ext as TableExt, Mode, Table,
        TableBinding, TableError, TableRow, Transform,
    },
};
