// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::{collections::BTreeMap, fmt, io};

/// Intermediate results for a single run, as produced by a benchmark or test harness.
///
/// This is the top-level document: a list of per-invocation results plus metadata about the run
/// as a whole.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntermediateResults {
    /// One entry per invocation, in the order the invocations were recorded.
    pub test_results: Vec<TestResult>,

    /// Metadata about the run.
    pub benchmark_run: BenchmarkRun,
}

impl IntermediateResults {
    /// Parses intermediate results from a JSON string.
    pub fn parse_json(json: impl AsRef<str>) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json.as_ref())
    }

    /// Parses intermediate results from a reader producing JSON.
    pub fn from_reader(reader: impl io::Read) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }
}

/// The result of one invocation of a test case.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// The suite and the (percent-encoded) case name, joined by `/`.
    pub test_path: String,

    /// The outcome of this invocation.
    pub status: TestStatus,

    /// Whether `status` matched the expectation for this invocation.
    pub is_expected: bool,

    /// How long the invocation took, as a number of seconds followed by `s`, e.g. `"1.5s"`.
    pub run_duration: String,

    /// Key-value tags attached to the invocation. Keys may repeat.
    #[serde(default)]
    pub tags: Vec<Tag>,

    /// Named artifacts produced by the invocation.
    #[serde(default)]
    pub output_artifacts: BTreeMap<String, Artifact>,
}

impl TestResult {
    /// Creates a new `TestResult` with no tags or artifacts.
    pub fn new(
        test_path: impl Into<String>,
        status: impl Into<TestStatus>,
        is_expected: bool,
        run_duration: impl Into<String>,
    ) -> Self {
        Self {
            test_path: test_path.into(),
            status: status.into(),
            is_expected,
            run_duration: run_duration.into(),
            tags: Vec::new(),
            output_artifacts: BTreeMap::new(),
        }
    }

    /// Adds a tag to this result.
    pub fn add_tag(&mut self, tag: Tag) -> &mut Self {
        self.tags.push(tag);
        self
    }

    /// Adds an artifact to this result, replacing any existing artifact with the same name.
    pub fn add_artifact(&mut self, name: impl Into<String>, artifact: Artifact) -> &mut Self {
        self.output_artifacts.insert(name.into(), artifact);
        self
    }
}

/// An outcome token such as `PASS`, `FAIL`, `SKIP` or `CRASH`.
///
/// Statuses are opaque: beyond the two well-known values exposed as constants, they are only
/// ever compared for equality.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct TestStatus(SmolStr);

impl TestStatus {
    /// The status of an invocation that passed.
    pub const PASS: Self = Self(SmolStr::new_static("PASS"));

    /// The status of an invocation that was skipped.
    pub const SKIP: Self = Self(SmolStr::new_static("SKIP"));

    /// Creates a new status from the given token.
    pub fn new(status: impl AsRef<str>) -> Self {
        Self(SmolStr::new(status))
    }

    /// Returns the token as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for TestStatus {
    fn from(status: &str) -> Self {
        Self::new(status)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key-value tag attached to a test result.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Tag {
    /// The key.
    pub key: String,

    /// The value. Producers emit strings, but any JSON value is accepted here and validated
    /// by consumers.
    pub value: serde_json::Value,
}

impl Tag {
    /// Creates a new tag.
    pub fn new(key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An artifact produced by a test invocation.
///
/// An artifact is either stored locally (`filePath`) or has been uploaded (`remoteUrl`). If both
/// are present, the remote URL takes precedence.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Absolute path to the artifact on the local file system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<Utf8PathBuf>,

    /// URL the artifact was uploaded to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,

    /// MIME type of the artifact, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl Artifact {
    /// Creates an artifact stored at the given local path.
    pub fn local(file_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            file_path: Some(file_path.into()),
            ..Self::default()
        }
    }

    /// Creates an artifact stored at the given remote URL.
    pub fn remote(remote_url: impl Into<String>) -> Self {
        Self {
            remote_url: Some(remote_url.into()),
            ..Self::default()
        }
    }

    /// Returns where this artifact lives, preferring the remote URL.
    ///
    /// Returns `None` if neither a remote URL nor a file path is set.
    pub fn location(&self) -> Option<ArtifactLocation<'_>> {
        match (&self.remote_url, &self.file_path) {
            (Some(url), _) => Some(ArtifactLocation::Remote(url)),
            (None, Some(path)) => Some(ArtifactLocation::Local(path)),
            (None, None) => None,
        }
    }
}

/// Where an [`Artifact`] is stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArtifactLocation<'a> {
    /// A remote URL.
    Remote(&'a str),

    /// A path on the local file system.
    Local(&'a Utf8Path),
}

/// Metadata about a run as a whole.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkRun {
    /// The UTC time the run started, e.g. `2020-01-01T00:00:00.500000Z`.
    pub start_time: String,

    /// Whether the run was interrupted before all tests finished.
    pub interrupted: bool,
}
