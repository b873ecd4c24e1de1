// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-scenario state shared by step and hook handlers.

use std::{
    any::Any,
    collections::HashMap,
    fmt,
    mem,
    path::PathBuf,
};

use mime::Mime;

use crate::report::{Embedding, Report};

/// Mutable state of a single scenario run.
///
/// Created fresh when a scenario is reset and dropped when the next one
/// starts, so nothing leaks between scenarios. Handlers share data through
/// its typed key-value bag:
///
/// ```rust
/// use givenspecs::{Report, ScenarioContext};
///
/// let mut ctx = ScenarioContext::new(vec!["smoke".into()], Report::new());
/// ctx.insert("cucumbers", 12_u32);
///
/// *ctx.get_mut::<u32>("cucumbers").unwrap() -= 5;
/// assert_eq!(ctx.get::<u32>("cucumbers"), Some(&7));
/// assert_eq!(ctx.get::<String>("cucumbers"), None);
/// assert_eq!(ctx.tags(), ["smoke"]);
/// ```
pub struct ScenarioContext {
    /// Values stored by handlers.
    data: HashMap<String, Box<dyn Any + Send>>,

    /// Tags of the current scenario, without `@`.
    tags: Vec<String>,

    /// [`Embedding`]s attached during the current step.
    embeddings: Vec<Embedding>,

    /// [`Report`] the current scenario is reported into.
    report: Report,
}

impl fmt::Debug for ScenarioContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioContext")
            .field("data", &self.data.keys().collect::<Vec<_>>())
            .field("tags", &self.tags)
            .field("embeddings", &self.embeddings.len())
            .finish_non_exhaustive()
    }
}

impl ScenarioContext {
    /// Creates a new empty [`ScenarioContext`] of a scenario with the given
    /// `tags`.
    #[must_use]
    pub fn new(tags: Vec<String>, report: Report) -> Self {
        Self { data: HashMap::new(), tags, embeddings: vec![], report }
    }

    /// Stores the `value` under the given `key`, replacing any previous one.
    pub fn insert<T: Any + Send>(&mut self, key: impl Into<String>, value: T) {
        _ = self.data.insert(key.into(), Box::new(value));
    }

    /// Returns the value stored under the given `key`, if it's of type `T`.
    #[must_use]
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.data.get(key).and_then(|v| v.downcast_ref())
    }

    /// Returns the value stored under the given `key` mutably, if it's of
    /// type `T`.
    #[must_use]
    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.data.get_mut(key).and_then(|v| v.downcast_mut())
    }

    /// Removes the value stored under the given `key` and returns it, if it's
    /// of type `T`. A value of another type is left in place.
    pub fn remove<T: Any>(&mut self, key: &str) -> Option<T> {
        if !self.data.get(key).is_some_and(|v| v.is::<T>()) {
            return None;
        }
        self.data
            .remove(key)
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }

    /// Indicates whether any value is stored under the given `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns the tags of the current scenario, without `@`.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Attaches the given `data` to the current step's report.
    pub fn attach(&mut self, data: impl AsRef<[u8]>, mime_type: Mime) {
        self.embeddings.push(Embedding::new(data, mime_type));
    }

    /// Attaches the given `data` under the given `name` to the current step's
    /// report.
    pub fn attach_named(
        &mut self,
        name: impl Into<String>,
        data: impl AsRef<[u8]>,
        mime_type: Mime,
    ) {
        let mut embedding = Embedding::new(data, mime_type);
        embedding.name = Some(name.into());
        self.embeddings.push(embedding);
    }

    /// Attaches the given log message to the current step's report.
    pub fn log(&mut self, msg: impl AsRef<str>) {
        self.embeddings.push(Embedding::from_log(msg));
    }

    /// Overrides the path the [`Report`] of the whole run is written to.
    pub fn set_report_path(&self, path: impl Into<PathBuf>) {
        self.report.set_path(path);
    }

    /// Takes the [`Embedding`]s attached since the last call.
    pub(crate) fn take_embeddings(&mut self) -> Vec<Embedding> {
        mem::take(&mut self.embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    fn ctx() -> ScenarioContext {
        ScenarioContext::new(vec![], Report::new())
    }

    #[test]
    fn remove_keeps_value_of_other_type() {
        let mut ctx = ctx();
        ctx.insert("k", 1_u8);

        assert_eq!(ctx.remove::<String>("k"), None);
        assert!(ctx.contains("k"));
        assert_eq!(ctx.remove::<u8>("k"), Some(1));
        assert!(!ctx.contains("k"));
    }

    #[test]
    fn embeddings_are_taken_once() {
        let mut ctx = ctx();
        ctx.log("hello");
        ctx.attach_named("shot", [1, 2, 3], mime::IMAGE_PNG);

        let embeddings = ctx.take_embeddings();

        assert_eq!(embeddings.len(), 2);
        assert_eq!(embeddings[1].name.as_deref(), Some("shot"));
        assert!(ctx.take_embeddings().is_empty());
    }

    #[test]
    fn report_path_is_forwarded() {
        let report = Report::new();
        let ctx = ScenarioContext::new(vec![], report.clone());

        ctx.set_report_path("custom.json");

        assert_eq!(
            report.path(&Config::default()),
            Some(PathBuf::from("custom.json")),
        );
    }
}
