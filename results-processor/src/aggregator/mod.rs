// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregation of intermediate results into a JSON test results report.
//!
//! Conversion is a single fold over the input records. Each record is validated into an
//! invocation, which is then merged field by field into the accumulator for its suite and case.
//! Once every record has been folded in, each accumulator is collapsed into one
//! [`TestResult`](json_results::TestResult).

mod imp;
mod merge;
mod status;
mod tags;

pub use imp::*;
pub use merge::{CaseField, MergeValue, Scalar};
pub use tags::SHARD_TAG;
