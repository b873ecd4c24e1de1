// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Append-only report tree of executed features.
//!
//! [`Report`] is a cheaply cloneable handle, so every [`StepResolver`] of a
//! run shares the same tree. Writes are serialized through a mutex, allowing
//! resolvers on different threads to report concurrently.
//!
//! [`StepResolver`]: crate::StepResolver

mod types;

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use derive_more::with_trait::{Display, Error, From};

use crate::Config;

pub use self::types::{
    Argument, Base64, Embedding, Feature, Match, Row, RunResult, Scenario,
    Status, Step, Tag,
};

/// Address of a [`Scenario`] inside a [`Report`].
///
/// Scenario outline instances may share the same identifier, so the
/// [`Step`]s are routed by position rather than by identifier.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ScenarioHandle {
    /// Index of the owning [`Feature`].
    feature: usize,

    /// Index of the [`Scenario`] among the [`Feature::elements`].
    element: usize,
}

/// Shared, append-only tree of [`Feature`]s.
#[derive(Clone, Debug, Default)]
pub struct Report {
    /// Guarded state of this [`Report`].
    inner: Arc<Mutex<Inner>>,
}

/// State of a [`Report`].
#[derive(Debug, Default)]
struct Inner {
    /// Reported [`Feature`]s in the order of their first appearance.
    features: Vec<Feature>,

    /// Output path requested at runtime, overriding [`Config::report_path`].
    path: Option<PathBuf>,
}

impl Report {
    /// Creates a new empty [`Report`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the given [`Feature`] unless a [`Feature`] with the same
    /// identifier has been added already. Existing [`Feature`]s are never
    /// replaced.
    ///
    /// Returns whether the [`Feature`] has been added.
    pub fn add_feature(&self, feature: Feature) -> bool {
        let mut inner = self.lock();
        if inner.features.iter().any(|f| f.id == feature.id) {
            return false;
        }
        inner.features.push(feature);
        true
    }

    /// Appends the given [`Scenario`] to the [`Feature`] with the given
    /// identifier.
    ///
    /// # Errors
    ///
    /// With [`ReportError::UnknownFeature`] if no such [`Feature`] has been
    /// added.
    pub fn add_scenario(
        &self,
        feature_id: &str,
        scenario: Scenario,
    ) -> Result<ScenarioHandle, ReportError> {
        let mut inner = self.lock();
        let feature = inner
            .features
            .iter()
            .position(|f| f.id == feature_id)
            .ok_or_else(|| ReportError::UnknownFeature {
                id: feature_id.to_owned(),
            })?;

        let elements = &mut inner.features[feature].elements;
        elements.push(scenario);
        Ok(ScenarioHandle { feature, element: elements.len() - 1 })
    }

    /// Appends the given [`Step`] to the [`Scenario`] behind the `handle`.
    ///
    /// # Errors
    ///
    /// With [`ReportError::UnknownScenario`] if the `handle` has been issued
    /// by another [`Report`].
    pub fn add_step(
        &self,
        handle: ScenarioHandle,
        step: Step,
    ) -> Result<(), ReportError> {
        let mut inner = self.lock();
        let scenario = inner
            .features
            .get_mut(handle.feature)
            .and_then(|f| f.elements.get_mut(handle.element))
            .ok_or(ReportError::UnknownScenario)?;
        scenario.steps.push(step);
        Ok(())
    }

    /// Returns the [`Scenario`] behind the `handle`, if any.
    #[must_use]
    pub fn scenario(&self, handle: ScenarioHandle) -> Option<Scenario> {
        self.lock()
            .features
            .get(handle.feature)
            .and_then(|f| f.elements.get(handle.element))
            .cloned()
    }

    /// Returns a snapshot of all the reported [`Feature`]s.
    #[must_use]
    pub fn features(&self) -> Vec<Feature> {
        self.lock().features.clone()
    }

    /// Overrides the output path of this [`Report`].
    pub fn set_path(&self, path: impl Into<PathBuf>) {
        self.lock().path = Some(path.into());
    }

    /// Returns the output path of this [`Report`] for the given [`Config`].
    ///
    /// A path set via [`Report::set_path()`] wins over the
    /// [`Config::report_path`]. [`None`] means nothing should be written.
    #[must_use]
    pub fn path(&self, config: &Config) -> Option<PathBuf> {
        self.lock()
            .path
            .clone()
            .or_else(|| Some(config.report_path.clone()))
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Serializes this [`Report`] as a JSON array of [`Feature`]s.
    ///
    /// # Errors
    ///
    /// If serialization fails.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string(&self.lock().features)?)
    }

    /// Writes this [`Report`] as JSON to its [`Report::path()`], if any.
    ///
    /// Returns the path written to.
    ///
    /// # Errors
    ///
    /// If serialization or writing fails.
    pub fn flush(&self, config: &Config) -> Result<Option<PathBuf>, ReportError> {
        let Some(path) = self.path(config) else {
            tracing::debug!("no report path configured, skipping report");
            return Ok(None);
        };

        let json = self.to_json()?;
        write(&path, &json)?;
        tracing::info!(path = %path.display(), "report written");
        Ok(Some(path))
    }

    /// Locks the [`Inner`] state, recovering it from poisoning.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Writes the `json` into the file at `path`.
fn write(path: &Path, json: &str) -> Result<(), ReportError> {
    fs::write(path, json).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Error of building or persisting a [`Report`].
#[derive(Debug, Display, Error, From)]
pub enum ReportError {
    /// No [`Feature`] with such identifier has been added.
    #[display("Feature `{id}` is not reported")]
    #[from(ignore)]
    UnknownFeature {
        /// Identifier of the [`Feature`].
        #[error(not(source))]
        id: String,
    },

    /// [`ScenarioHandle`] doesn't belong to this [`Report`].
    #[display("Scenario is not reported")]
    #[from(ignore)]
    UnknownScenario,

    /// [`Report`] cannot be serialized.
    #[display("Failed to serialize report: {_0}")]
    Serialize(serde_json::Error),

    /// [`Report`] cannot be written.
    #[display("Failed to write report to `{}`: {source}", path.display())]
    #[from(ignore)]
    Io {
        /// Path being written.
        path: PathBuf,

        /// Underlying I/O error.
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(id: &str) -> Feature {
        Feature::new(id, id, 1, vec![], None)
    }

    #[test]
    fn feature_is_added_once() {
        let report = Report::new();

        assert!(report.add_feature(feature("a")));
        let mut renamed = feature("a");
        renamed.name = "other".into();
        assert!(!report.add_feature(renamed));

        let features = report.features();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].name, "a");
    }

    #[test]
    fn steps_go_to_their_own_element() {
        let report = Report::new();
        _ = report.add_feature(feature("f"));

        let first = report
            .add_scenario("f", Scenario::new("f;s", "s", 2, vec![]))
            .unwrap();
        let second = report
            .add_scenario("f", Scenario::new("f;s", "s", 2, vec![]))
            .unwrap();
        let step = Step {
            keyword: "Given ".into(),
            line: 3,
            name: "x".into(),
            arguments: vec![],
            r#match: None,
            result: RunResult::instant(Status::Passed),
            embeddings: vec![],
        };
        report.add_step(second, step).unwrap();

        assert!(report.scenario(first).unwrap().steps.is_empty());
        assert_eq!(report.scenario(second).unwrap().steps.len(), 1);
    }

    #[test]
    fn unknown_feature_is_an_error() {
        let err = Report::new()
            .add_scenario("nope", Scenario::new("x", "x", 1, vec![]))
            .unwrap_err();

        assert!(matches!(err, ReportError::UnknownFeature { .. }));
    }

    #[test]
    fn empty_path_writes_nothing() {
        let report = Report::new();

        assert_eq!(report.flush(&Config::default()).unwrap(), None);
    }

    #[test]
    fn runtime_path_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = Report::new();
        _ = report.add_feature(feature("f"));

        report.set_path(&path);
        let written = report.flush(&Config::default()).unwrap();

        assert_eq!(written.as_deref(), Some(path.as_path()));
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json[0]["id"], "f");
        assert_eq!(json[0]["keyword"], "Feature");
    }
}
