// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::MergeError;
use json_results::TestResult;
use results_metadata::TestStatus;
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

/// A leaf value being merged into a case.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// An absent value.
    Null,

    /// A boolean.
    Bool(bool),

    /// A non-negative integer.
    Int(u64),

    /// A floating-point number, or a negative integer.
    Float(f64),

    /// A string.
    Str(String),
}

/// A value being merged into a case, tagged by its shape.
#[derive(Clone, Debug, PartialEq)]
pub enum MergeValue {
    /// A single value.
    Scalar(Scalar),

    /// A map of names to values.
    Nested(BTreeMap<String, MergeValue>),

    /// A sequence of values. Every field of a case accepts one value per invocation, so merging
    /// a sequence is always rejected.
    Sequence(Vec<MergeValue>),
}

impl MergeValue {
    /// Converts a JSON value into a `MergeValue`.
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Scalar(Scalar::Null),
            Value::Bool(b) => Self::Scalar(Scalar::Bool(*b)),
            Value::Number(n) => match (n.as_u64(), n.as_f64()) {
                (Some(n), _) => Self::Scalar(Scalar::Int(n)),
                (None, Some(n)) => Self::Scalar(Scalar::Float(n)),
                // Only reachable with arbitrary-precision numbers.
                (None, None) => Self::Scalar(Scalar::Str(n.to_string())),
            },
            Value::String(s) => Self::Scalar(Scalar::Str(s.clone())),
            Value::Array(values) => Self::Sequence(values.iter().map(Self::from_json).collect()),
            Value::Object(map) => Self::Nested(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    fn str(s: impl Into<String>) -> Self {
        Self::Scalar(Scalar::Str(s.into()))
    }
}

/// A field of a case that invocations are merged into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CaseField {
    /// The observed status.
    Actual,

    /// The expected status.
    Expected,

    /// Whether the invocation was unexpected.
    IsUnexpected,

    /// The run duration in seconds.
    Time,

    /// The shard index.
    Shard,

    /// Resolved artifact paths, keyed by name.
    Artifacts,
}

impl CaseField {
    /// Returns the name of this field as written to reports.
    pub fn name(self) -> &'static str {
        match self {
            Self::Actual => "actual",
            Self::Expected => "expected",
            Self::IsUnexpected => "is_unexpected",
            Self::Time => "time",
            Self::Shard => "shard",
            Self::Artifacts => "artifacts",
        }
    }
}

impl fmt::Display for CaseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single validated invocation, ready to be merged into its case.
#[derive(Clone, Debug)]
pub(super) struct Invocation {
    pub(super) status: TestStatus,
    pub(super) expected: TestStatus,
    pub(super) is_unexpected: bool,
    pub(super) duration: f64,
    pub(super) shard: MergeValue,
    pub(super) artifacts: BTreeMap<String, String>,
}

impl Invocation {
    fn into_merge_values(self) -> [(CaseField, MergeValue); 6] {
        [
            (CaseField::Actual, MergeValue::str(self.status.as_str())),
            (CaseField::Expected, MergeValue::str(self.expected.as_str())),
            (
                CaseField::IsUnexpected,
                MergeValue::Scalar(Scalar::Bool(self.is_unexpected)),
            ),
            (
                CaseField::Time,
                MergeValue::Scalar(Scalar::Float(self.duration)),
            ),
            (CaseField::Shard, self.shard),
            (
                CaseField::Artifacts,
                MergeValue::Nested(
                    self.artifacts
                        .into_iter()
                        .map(|(name, path)| (name, MergeValue::str(path)))
                        .collect(),
                ),
            ),
        ]
    }
}

/// Every invocation of one case, accumulated in the order they were merged.
#[derive(Clone, Debug, Default)]
pub(super) struct CaseAccumulator {
    actual_statuses: Vec<TestStatus>,
    expected_statuses: BTreeSet<TestStatus>,
    any_unexpected: bool,
    durations: Vec<f64>,
    shard_values: Vec<Option<u32>>,
    artifacts: BTreeMap<String, String>,
}

impl CaseAccumulator {
    pub(super) fn merge_invocation(&mut self, invocation: Invocation) -> Result<(), MergeError> {
        invocation
            .into_merge_values()
            .into_iter()
            .try_for_each(|(field, value)| self.merge(field, value))
    }

    /// Merges a single value into the given field.
    pub(super) fn merge(&mut self, field: CaseField, value: MergeValue) -> Result<(), MergeError> {
        let shape_mismatch = |expected| MergeError::ShapeMismatch {
            field: field.name(),
            expected,
        };

        let scalar = match value {
            MergeValue::Sequence(_) => {
                return Err(MergeError::SequenceValue {
                    field: field.name(),
                });
            }
            MergeValue::Nested(map) => {
                if field != CaseField::Artifacts {
                    return Err(shape_mismatch("a single value, not a map"));
                }
                for (name, path) in map {
                    match path {
                        MergeValue::Scalar(Scalar::Str(path)) => {
                            self.artifacts.insert(name, path);
                        }
                        MergeValue::Sequence(_) => {
                            return Err(MergeError::SequenceValue {
                                field: field.name(),
                            });
                        }
                        _ => return Err(shape_mismatch("a map of strings")),
                    }
                }
                return Ok(());
            }
            MergeValue::Scalar(scalar) => scalar,
        };

        match (field, scalar) {
            (CaseField::Actual, Scalar::Str(status)) => {
                self.actual_statuses.push(TestStatus::new(status));
            }
            (CaseField::Expected, Scalar::Str(status)) => {
                self.expected_statuses.insert(TestStatus::new(status));
            }
            (CaseField::IsUnexpected, Scalar::Bool(is_unexpected)) => {
                self.any_unexpected |= is_unexpected;
            }
            (CaseField::Time, Scalar::Float(duration)) => self.durations.push(duration),
            (CaseField::Time, Scalar::Int(duration)) => self.durations.push(duration as f64),
            (CaseField::Shard, Scalar::Null) => self.shard_values.push(None),
            (CaseField::Shard, Scalar::Int(shard)) => {
                let shard = u32::try_from(shard)
                    .map_err(|_| shape_mismatch("a shard index that fits in 32 bits"))?;
                self.shard_values.push(Some(shard));
            }
            (CaseField::Actual | CaseField::Expected, _) => {
                return Err(shape_mismatch("a status string"));
            }
            (CaseField::IsUnexpected, _) => return Err(shape_mismatch("a boolean")),
            (CaseField::Time, _) => return Err(shape_mismatch("a number of seconds")),
            (CaseField::Shard, _) => return Err(shape_mismatch("an integer or null")),
            (CaseField::Artifacts, _) => return Err(shape_mismatch("a map of strings")),
        }

        Ok(())
    }

    /// Collapses the accumulated invocations into a single result.
    pub(super) fn finish(self) -> TestResult {
        let time = *self
            .durations
            .first()
            .expect("a case is only created when an invocation is merged into it");

        let mut result = TestResult::new(
            super::status::dedup_statuses(&self.actual_statuses),
            super::status::render_expected(&self.expected_statuses),
            time,
        );
        result
            .set_unexpected(self.any_unexpected)
            .add_artifacts(self.artifacts);
        if let Some(shard) = self.shard_values.first().copied().flatten() {
            result.set_shard(shard);
        }
        result
    }
}
