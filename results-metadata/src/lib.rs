// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured access to the intermediate results that benchmark and test harnesses emit.
//!
//! The types in this crate describe the input side of `process-results`: one record per test
//! invocation plus run-level metadata. Field names match the upstream producers exactly.

#![warn(missing_docs)]

mod exit_codes;
mod intermediate;

pub use exit_codes::*;
pub use intermediate::*;
