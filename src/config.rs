// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Runtime configuration.

use std::path::PathBuf;

use smart_default::SmartDefault;

use crate::cli;

/// Configuration of a test run.
#[derive(Clone, Debug, Eq, PartialEq, SmartDefault)]
pub struct Config {
    /// Path to write the JSON report to. Empty path means no report is
    /// written.
    pub report_path: PathBuf,

    /// Scenario tag (without `@`) marking the whole scenario as undefined.
    #[default("inconclusive".to_owned())]
    pub undefined_tag: String,
}

impl Config {
    /// Sets the [`Config::report_path`].
    #[must_use]
    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = path.into();
        self
    }

    /// Sets the [`Config::undefined_tag`], stripping a leading `@`, if any.
    #[must_use]
    pub fn with_undefined_tag(mut self, tag: impl AsRef<str>) -> Self {
        self.undefined_tag = tag.as_ref().trim_start_matches('@').to_owned();
        self
    }
}

impl From<cli::Opts> for Config {
    fn from(opts: cli::Opts) -> Self {
        Self::default()
            .with_report_path(opts.report_path.unwrap_or_default())
            .with_undefined_tag(opts.undefined_tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();

        assert!(config.report_path.as_os_str().is_empty());
        assert_eq!(config.undefined_tag, "inconclusive");
    }

    #[test]
    fn builds_from_cli() {
        let opts = cli::Opts {
            report_path: Some("out/cucumber.json".into()),
            undefined_tag: "@wip".into(),
        };

        let config = Config::from(opts);

        assert_eq!(config.report_path, PathBuf::from("out/cucumber.json"));
        assert_eq!(config.undefined_tag, "wip");
    }
}
