// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reading intermediate results and writing reports to an output directory.

use crate::{
    aggregator,
    config::{OutputFormat, ProcessorConfig},
    errors::{IntermediateReadError, ProcessError, WriteReportError},
};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use camino::{Utf8Path, Utf8PathBuf};
use json_results::Report;
use results_metadata::IntermediateResults;
use std::io::{self, Write};
use tracing::debug;

/// The name of the JSON test results file within the output directory.
pub const OUTPUT_FILENAME: &str = "test-results.json";

/// Reads intermediate results from a JSON file.
pub fn read_intermediate_results(
    path: &Utf8Path,
) -> Result<IntermediateResults, IntermediateReadError> {
    let contents = std::fs::read_to_string(path).map_err(|error| IntermediateReadError::Read {
        path: path.to_owned(),
        error,
    })?;
    IntermediateResults::parse_json(contents).map_err(|error| IntermediateReadError::Parse {
        path: path.to_owned(),
        error,
    })
}

/// Converts intermediate results and writes every configured output format into `output_dir`.
///
/// Returns the paths that were written, in the order the formats are configured.
pub fn process_intermediate_results(
    results: &IntermediateResults,
    output_dir: &Utf8Path,
    config: &ProcessorConfig,
) -> Result<Vec<Utf8PathBuf>, ProcessError> {
    let base_dir = config.artifacts_base_dir(output_dir);
    let report = aggregator::convert(results, &base_dir)?;

    let mut written = Vec::with_capacity(config.formats().len());
    for &format in config.formats() {
        let path = match format {
            OutputFormat::JsonTestResults => write_report(&report, output_dir, config.overwrite())?,
        };
        debug!("wrote {format} output to {path}");
        written.push(path);
    }

    Ok(written)
}

/// Writes `report` to `test-results.json` within `output_dir`, creating the directory if
/// necessary.
///
/// The file is replaced atomically. If `overwrite` is false and the file already exists,
/// [`WriteReportError::Exists`] is returned and the existing file is left untouched.
pub fn write_report(
    report: &Report,
    output_dir: &Utf8Path,
    overwrite: bool,
) -> Result<Utf8PathBuf, WriteReportError> {
    let path = output_dir.join(OUTPUT_FILENAME);

    let contents = report
        .to_string()
        .map_err(|error| WriteReportError::Serialize {
            path: path.clone(),
            error,
        })?;

    std::fs::create_dir_all(output_dir).map_err(|error| WriteReportError::CreateDir {
        path: output_dir.to_owned(),
        error,
    })?;

    if !overwrite && path.exists() {
        return Err(WriteReportError::Exists { path });
    }

    let behavior = if overwrite {
        OverwriteBehavior::AllowOverwrite
    } else {
        OverwriteBehavior::DisallowOverwrite
    };
    // DisallowOverwrite also catches a file that appeared after the check above.
    let result = AtomicFile::new(&path, behavior).write(|f| f.write_all(contents.as_bytes()));
    match result {
        Ok(()) => Ok(path),
        Err(atomicwrites::Error::Internal(error))
            if !overwrite && error.kind() == io::ErrorKind::AlreadyExists =>
        {
            Err(WriteReportError::Exists { path })
        }
        Err(error) => Err(WriteReportError::Write { path, error }),
    }
}
