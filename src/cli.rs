// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! CLI (command line interface) options of a test run.
//!
//! [`Opts`] are meant to be flattened into a host binary's own CLI:
//!
//! ```rust
//! # use clap::Parser as _;
//! #
//! #[derive(clap::Parser)]
//! struct Cli {
//!     #[command(flatten)]
//!     givenspecs: givenspecs::cli::Opts,
//! }
//!
//! let cli = Cli::parse_from(["tests", "--report-path", "cucumber.json"]);
//! let config = givenspecs::Config::from(cli.givenspecs);
//! assert_eq!(config.report_path.to_str(), Some("cucumber.json"));
//! ```

use std::path::PathBuf;

use clap::Parser;
use smart_default::SmartDefault;

/// CLI options of a test run.
#[derive(Clone, Debug, SmartDefault, clap::Args)]
#[group(skip)]
pub struct Opts {
    /// Path to write the JSON report to.
    #[arg(long, value_name = "path", env = "GIVENSPECS_REPORT_PATH")]
    pub report_path: Option<PathBuf>,

    /// Tag marking a scenario as undefined, so its steps are reported
    /// without being run.
    #[arg(long, value_name = "tag", default_value = "inconclusive")]
    #[default("inconclusive".to_owned())]
    pub undefined_tag: String,
}

impl Opts {
    /// Parses [`Opts`] from the process' command line arguments.
    #[must_use]
    pub fn parsed() -> Self {
        Root::parse().opts
    }
}

/// Top-level parser wrapping [`Opts`].
#[derive(Debug, Parser)]
#[command(about = "Run the scenarios of a feature")]
struct Root {
    /// Actual options.
    #[command(flatten)]
    opts: Opts,
}
