// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Writing the files that explain a test failure: text baselines and diffs, images, audio, crash
//! logs and reftest references.
//!
//! The artifact paths this produces are what end up in the `artifacts` map of a report.
//!
//! Output file names are derived from the test name. The extension is dropped and any query
//! string is sanitized into the file name, so `dir/foo.html?a/b` produces files such as
//! `dir/foo_a_b-actual.txt`.

mod failures;
mod filesystem;
mod imp;
mod naming;
#[cfg(test)]
mod test_helpers;

pub use failures::*;
pub use filesystem::*;
pub use imp::*;
