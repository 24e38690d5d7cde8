// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    ExpectedError,
    errors::Result,
    output::{OutputContext, OutputOpts},
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use results_metadata::ProcessResultsExitCode;
use results_processor::{
    config::ProcessorConfig,
    output::{process_intermediate_results, read_intermediate_results},
};
use tracing::{debug, info};

/// Converts intermediate test results into the JSON Test Results Format.
#[derive(Debug, Parser)]
#[command(
    version,
    styles = crate::output::clap_styles::style(),
    max_term_width = 100
)]
pub struct ProcessResultsApp {
    #[clap(flatten)]
    output: OutputOpts,

    #[clap(subcommand)]
    command: Command,
}

impl ProcessResultsApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app, returning the process exit code.
    pub fn exec(self) -> Result<i32> {
        match self.command {
            Command::Convert(opts) => opts.exec(),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert intermediate results into output files.
    ///
    /// Reads the intermediate results document, aggregates repeated runs of each test case and
    /// writes every configured output format (by default `test-results.json`) into the output
    /// directory.
    Convert(ConvertOpts),
}

#[derive(Debug, Args)]
struct ConvertOpts {
    /// Intermediate results JSON file to read
    #[arg(long, value_name = "FILE")]
    intermediate_results: Utf8PathBuf,

    /// Directory to write outputs into; local artifact paths are made relative to it
    #[arg(long, value_name = "DIR")]
    output_dir: Utf8PathBuf,

    /// Config file [default: <output-dir>/.config/process-results.toml]
    #[arg(long, value_name = "FILE", env = "PROCESS_RESULTS_CONFIG")]
    config_file: Option<Utf8PathBuf>,
}

impl ConvertOpts {
    fn exec(self) -> Result<i32> {
        let output_dir = absolute_dir(&self.output_dir)?;
        debug!("writing outputs to {output_dir}");

        let config = ProcessorConfig::from_sources(&output_dir, self.config_file.as_deref())?;
        let results = read_intermediate_results(&self.intermediate_results)?;
        debug!(
            "read {} test results from {}",
            results.test_results.len(),
            self.intermediate_results
        );

        let written = process_intermediate_results(&results, &output_dir, &config)?;
        if written.is_empty() {
            info!("no output formats configured, nothing written");
        }
        for path in written {
            info!("wrote {path}");
        }

        Ok(ProcessResultsExitCode::OK)
    }
}

fn absolute_dir(dir: &Utf8Path) -> Result<Utf8PathBuf> {
    let absolute = std::path::absolute(dir).map_err(|err| ExpectedError::InvalidOutputDir {
        path: dir.to_owned(),
        err,
    })?;
    Utf8PathBuf::try_from(absolute).map_err(|err| ExpectedError::NonUtf8OutputDir { err })
}
