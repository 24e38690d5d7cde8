// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    merge::{CaseAccumulator, Invocation},
    tags::TagTable,
};
use crate::{artifacts::resolve_artifact_path, errors::ConvertError, time::timestamp_to_epoch};
use camino::Utf8Path;
use json_results::Report;
use percent_encoding::percent_decode_str;
use results_metadata::{IntermediateResults, TestResult, TestStatus};
use std::collections::BTreeMap;
use tracing::debug;

/// Converts intermediate results into a JSON test results report.
///
/// Invocations are grouped by suite and case. Within a case, the first invocation decides
/// `time` and `shard`, so the order of `results.test_results` matters.
///
/// Local artifact paths are written relative to `base_dir`.
///
/// Any malformed record aborts the whole conversion.
pub fn convert(results: &IntermediateResults, base_dir: &Utf8Path) -> Result<Report, ConvertError> {
    let groups = results
        .test_results
        .iter()
        .try_fold(CaseGroups::default(), |mut groups, record| {
            groups.add(record, base_dir)?;
            Ok::<_, ConvertError>(groups)
        })?;

    let seconds_since_epoch = timestamp_to_epoch(&results.benchmark_run.start_time)?;
    let mut report = Report::new(seconds_since_epoch);
    report.set_interrupted(results.benchmark_run.interrupted);
    for record in &results.test_results {
        report.count_status(record.status.as_str());
    }

    let suite_count = groups.suites.len();
    for (suite, cases) in groups.suites {
        for (case, accumulator) in cases {
            report.add_test(suite.clone(), case, accumulator.finish());
        }
    }

    debug!(
        "converted {} invocations into {} cases across {} suites",
        results.test_results.len(),
        report.case_count(),
        suite_count,
    );

    Ok(report)
}

/// Accumulators for every case seen so far, keyed by suite and then case.
#[derive(Debug, Default)]
struct CaseGroups {
    suites: BTreeMap<String, BTreeMap<String, CaseAccumulator>>,
}

impl CaseGroups {
    fn add(&mut self, record: &TestResult, base_dir: &Utf8Path) -> Result<(), ConvertError> {
        let (suite, case) = split_test_path(&record.test_path)?;
        let invocation = make_invocation(record, base_dir)?;

        self.suites
            .entry(suite.to_owned())
            .or_default()
            .entry(case)
            .or_default()
            .merge_invocation(invocation)
            .map_err(|error| ConvertError::Merge {
                test_path: record.test_path.clone(),
                error,
            })
    }
}

fn make_invocation(record: &TestResult, base_dir: &Utf8Path) -> Result<Invocation, ConvertError> {
    let test_path = record.test_path.as_str();

    // A miss is recorded against the default expectation.
    let expected = if record.is_expected {
        record.status.clone()
    } else {
        TestStatus::PASS
    };

    let tags = TagTable::new(&record.tags);
    let shard = tags.shard(test_path)?;

    let artifacts = record
        .output_artifacts
        .iter()
        .map(|(name, artifact)| {
            let path = resolve_artifact_path(artifact, base_dir).map_err(|error| {
                ConvertError::Artifact {
                    test_path: test_path.to_owned(),
                    name: name.clone(),
                    error,
                }
            })?;
            Ok((name.clone(), path))
        })
        .collect::<Result<BTreeMap<_, _>, ConvertError>>()?;

    Ok(Invocation {
        status: record.status.clone(),
        expected,
        is_unexpected: !record.is_expected,
        duration: parse_duration(test_path, &record.run_duration)?,
        shard,
        artifacts,
    })
}

/// Splits a test path into its suite and its percent-decoded case name.
pub(crate) fn split_test_path(test_path: &str) -> Result<(&str, String), ConvertError> {
    let malformed = || ConvertError::MalformedTestPath {
        test_path: test_path.to_owned(),
    };

    let (suite, raw_case) = test_path.split_once('/').ok_or_else(malformed)?;
    if raw_case.contains('/') {
        return Err(malformed());
    }

    let case = percent_decode_str(raw_case)
        .decode_utf8()
        .map_err(|error| ConvertError::InvalidCaseName {
            test_path: test_path.to_owned(),
            error,
        })?;

    Ok((suite, case.into_owned()))
}

/// Parses a duration such as `1.5s` into seconds.
pub(crate) fn parse_duration(test_path: &str, run_duration: &str) -> Result<f64, ConvertError> {
    let invalid = |error| ConvertError::InvalidDuration {
        test_path: test_path.to_owned(),
        duration: run_duration.to_owned(),
        error,
    };

    let seconds: f64 = run_duration
        .trim_end_matches('s')
        .parse()
        .map_err(|error| invalid(Some(error)))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(invalid(None));
    }

    Ok(seconds)
}
