// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    DeserializeError, SerializeError,
    serialize::{deserialize_report, serialize_report},
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, io};

/// Suites keyed by name, each holding its cases keyed by name.
pub type TestTree = BTreeMap<String, BTreeMap<String, TestResult>>;

/// The root of a JSON test results report.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    /// Results for every test, keyed by suite and then by case.
    pub tests: TestTree,

    /// The time at which the run started, as (fractional) seconds since the Unix epoch.
    pub seconds_since_epoch: f64,

    /// Whether the run was interrupted.
    pub interrupted: bool,

    /// The number of invocations with each status.
    ///
    /// This counts every invocation, so a case that ran three times contributes three.
    pub num_failures_by_type: BTreeMap<String, usize>,
}

impl Report {
    /// The format version written by this crate.
    pub const VERSION: u32 = 3;

    /// The delimiter between path components of a test name.
    pub const PATH_DELIMITER: &'static str = "/";

    /// Creates a new, empty `Report` for a run that started at the given time.
    pub fn new(seconds_since_epoch: f64) -> Self {
        Self {
            tests: BTreeMap::new(),
            seconds_since_epoch,
            interrupted: false,
            num_failures_by_type: BTreeMap::new(),
        }
    }

    /// Sets whether the run was interrupted.
    pub fn set_interrupted(&mut self, interrupted: bool) -> &mut Self {
        self.interrupted = interrupted;
        self
    }

    /// Adds a test result, replacing any existing result for the same suite and case.
    pub fn add_test(
        &mut self,
        suite: impl Into<String>,
        case: impl Into<String>,
        result: TestResult,
    ) -> &mut Self {
        self.tests
            .entry(suite.into())
            .or_default()
            .insert(case.into(), result);
        self
    }

    /// Records one invocation with the given status in `num_failures_by_type`.
    pub fn count_status(&mut self, status: impl Into<String>) -> &mut Self {
        *self.num_failures_by_type.entry(status.into()).or_default() += 1;
        self
    }

    /// Returns the result for the given suite and case, if present.
    pub fn test(&self, suite: &str, case: &str) -> Option<&TestResult> {
        self.tests.get(suite)?.get(case)
    }

    /// Returns the total number of cases across all suites.
    pub fn case_count(&self) -> usize {
        self.tests.values().map(BTreeMap::len).sum()
    }

    /// Serialize this report to the given writer.
    ///
    /// Keys are sorted and nested values are indented by four spaces.
    pub fn serialize(&self, writer: impl io::Write) -> Result<(), SerializeError> {
        serialize_report(self, writer)
    }

    /// Serialize this report to a string.
    pub fn to_string(&self) -> Result<String, SerializeError> {
        let mut buf: Vec<u8> = vec![];
        self.serialize(&mut buf)?;
        // serde_json only ever produces UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Reads a report from the given reader.
    pub fn deserialize(reader: impl io::Read) -> Result<Self, DeserializeError> {
        deserialize_report(reader)
    }
}

/// The collapsed result of every invocation of a single case.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TestResult {
    /// The observed status, possibly several space-separated statuses for repeated runs.
    pub actual: String,

    /// Artifact names mapped to paths (relative to the results directory) or URLs.
    #[serde(default)]
    pub artifacts: BTreeMap<String, String>,

    /// The expected statuses, sorted, deduplicated and space-separated.
    pub expected: String,

    /// Whether any invocation of this case had an unexpected result.
    pub is_unexpected: bool,

    /// The shard the case ran on, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard: Option<u32>,

    /// The duration of the first invocation, in seconds.
    pub time: f64,
}

impl TestResult {
    /// Creates a new test result that is not marked unexpected and has no artifacts.
    pub fn new(actual: impl Into<String>, expected: impl Into<String>, time: f64) -> Self {
        Self {
            actual: actual.into(),
            artifacts: BTreeMap::new(),
            expected: expected.into(),
            is_unexpected: false,
            shard: None,
            time,
        }
    }

    /// Sets whether the result was unexpected.
    pub fn set_unexpected(&mut self, is_unexpected: bool) -> &mut Self {
        self.is_unexpected = is_unexpected;
        self
    }

    /// Sets the shard.
    pub fn set_shard(&mut self, shard: u32) -> &mut Self {
        self.shard = Some(shard);
        self
    }

    /// Adds an artifact, replacing any existing artifact with the same name.
    pub fn add_artifact(&mut self, name: impl Into<String>, path: impl Into<String>) -> &mut Self {
        self.artifacts.insert(name.into(), path.into());
        self
    }

    /// Adds several artifacts.
    pub fn add_artifacts(
        &mut self,
        artifacts: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> &mut Self {
        for (name, path) in artifacts {
            self.add_artifact(name, path);
        }
        self
    }
}
