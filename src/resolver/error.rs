// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors escaping a scenario run.

use derive_more::with_trait::{Display, Error, From};

use crate::{registry::HookKind, step::Location};

/// Error returned by a hook body.
///
/// Hook failures are never turned into step results, they abort the
/// scenario run.
#[derive(Debug, Display, Error)]
#[display("{kind} hook registered at {location} failed: {error:#}")]
pub struct HookError {
    /// [`HookKind`] of the failed hook.
    pub kind: HookKind,

    /// [`Location`] of the failed hook's registration.
    pub location: Location,

    /// Error returned by the hook body.
    #[error(not(source))]
    pub error: anyhow::Error,
}

/// Terminal failure of a scenario.
#[derive(Debug, Display, Error, From)]
pub enum ScenarioError {
    /// Some hook failed.
    #[display("{_0}")]
    Hook(HookError),

    /// Some step didn't pass, the scenario is failed with its message.
    #[display("{message}")]
    #[from(ignore)]
    Failed {
        /// Error message of the last step that didn't pass.
        #[error(not(source))]
        message: String,
    },
}

impl ScenarioError {
    /// Returns the [`HookError`], if this is one.
    #[must_use]
    pub const fn as_hook(&self) -> Option<&HookError> {
        match self {
            Self::Hook(e) => Some(e),
            Self::Failed { .. } => None,
        }
    }
}
