// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// An error that occurs while serializing a [`Report`](crate::Report).
///
/// Returned by [`Report::serialize`](crate::Report::serialize) and
/// [`Report::to_string`](crate::Report::to_string).
#[derive(Debug, Error)]
#[error("error serializing JSON test results")]
pub struct SerializeError {
    #[from]
    inner: serde_json::Error,
}

/// An error that occurs while reading a [`Report`](crate::Report).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeserializeError {
    /// The input was not valid JSON, or did not match the report schema.
    #[error("error deserializing JSON test results")]
    Json(#[from] serde_json::Error),

    /// The report declared a version other than the one this crate understands.
    #[error("unsupported JSON test results version {version} (expected {expected})")]
    UnsupportedVersion {
        /// The version found in the report.
        version: u32,

        /// The version this crate supports.
        expected: u32,
    },

    /// The report declared a path delimiter other than `/`.
    #[error("unsupported path delimiter `{delimiter}` (expected `{expected}`)")]
    UnsupportedPathDelimiter {
        /// The delimiter found in the report.
        delimiter: String,

        /// The delimiter this crate supports.
        expected: &'static str,
    },
}
