// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `process-results` failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum ProcessResultsExitCode {}

impl ProcessResultsExitCode {
    /// No errors occurred and results were processed normally.
    pub const OK: i32 = 0;

    /// A user issue happened while setting up the invocation, e.g. a config file failed to parse.
    pub const SETUP_ERROR: i32 = 96;

    /// The intermediate results could not be read or did not match the expected schema.
    pub const INPUT_READ_FAILED: i32 = 97;

    /// The intermediate results were well-formed JSON but could not be converted, e.g. because a
    /// test path was malformed or a duration was not numeric.
    pub const CONVERSION_FAILED: i32 = 98;

    /// Writing output files produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
