// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by the results processor.

use camino::Utf8PathBuf;
use config::ConfigError;
use std::{error, fmt, num::ParseFloatError, str::Utf8Error};
use thiserror::Error;

/// An error that occurred while converting intermediate results.
///
/// All of these are fatal: a single bad record aborts the whole conversion.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// A test path did not contain exactly one `/`.
    #[error("test path `{test_path}` must contain exactly one `/` separating suite and case")]
    MalformedTestPath {
        /// The test path.
        test_path: String,
    },

    /// The case part of a test path did not decode to valid UTF-8.
    #[error("case name in test path `{test_path}` is not valid UTF-8 after percent-decoding")]
    InvalidCaseName {
        /// The test path.
        test_path: String,

        /// The underlying error.
        #[source]
        error: Utf8Error,
    },

    /// A run duration was not a non-negative number of seconds.
    #[error("run duration `{duration}` for `{test_path}` is not a non-negative number of seconds")]
    InvalidDuration {
        /// The test path.
        test_path: String,

        /// The run duration as provided.
        duration: String,

        /// The parse error, if the duration was not numeric at all.
        #[source]
        error: Option<ParseFloatError>,
    },

    /// A shard tag did not hold a non-negative integer.
    #[error("shard tag value `{value}` for `{test_path}` is not a non-negative integer")]
    InvalidShard {
        /// The test path.
        test_path: String,

        /// The tag value, rendered as JSON.
        value: String,
    },

    /// An artifact path could not be resolved.
    #[error("error resolving artifact `{name}` for `{test_path}`")]
    Artifact {
        /// The test path.
        test_path: String,

        /// The artifact name.
        name: String,

        /// The underlying error.
        #[source]
        error: ArtifactPathError,
    },

    /// The start time of the run could not be parsed.
    #[error(
        "start time `{timestamp}` is not a UTC timestamp of the form \
         YYYY-MM-DDTHH:MM:SS.ffffffZ"
    )]
    InvalidTimestamp {
        /// The timestamp as provided.
        timestamp: String,

        /// The parse error, if the overall shape was correct.
        #[source]
        error: Option<chrono::ParseError>,
    },

    /// Merging an invocation into its case failed.
    #[error("error merging results for `{test_path}`")]
    Merge {
        /// The test path.
        test_path: String,

        /// The underlying error.
        #[source]
        error: MergeError,
    },
}

/// A value of the wrong shape was passed into the merge step.
///
/// This indicates a bug in how per-invocation values were assembled, or input that bypassed
/// validation. It is never silently coerced.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MergeError {
    /// A sequence was provided for a field that only accumulates single values.
    #[error("field `{field}` received a sequence, but only accepts single values")]
    SequenceValue {
        /// The field being merged.
        field: &'static str,
    },

    /// A value of the wrong kind was provided.
    #[error("field `{field}` expected {expected}")]
    ShapeMismatch {
        /// The field being merged.
        field: &'static str,

        /// A description of what was expected.
        expected: &'static str,
    },
}

/// An error that occurred while resolving an artifact to a path or URL.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArtifactPathError {
    /// The artifact had neither a remote URL nor a file path.
    #[error("artifact has neither a remote URL nor a file path")]
    MissingLocation,

    /// The artifact's file path could not be expressed relative to the base directory.
    #[error("artifact path `{path}` cannot be made relative to `{base_dir}`")]
    NotRelativizable {
        /// The artifact's path.
        path: Utf8PathBuf,

        /// The base directory.
        base_dir: Utf8PathBuf,
    },
}

/// An error that occurred while reading intermediate results from disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IntermediateReadError {
    /// The file could not be read.
    #[error("error reading intermediate results from `{path}`")]
    Read {
        /// The path being read.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// The file did not contain valid intermediate results.
    #[error("error parsing intermediate results at `{path}`")]
    Parse {
        /// The path being read.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: serde_json::Error,
    },
}

/// An error that occurred while writing a report to disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteReportError {
    /// The report could not be serialized.
    #[error("error serializing report for `{path}`")]
    Serialize {
        /// The destination path.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: json_results::SerializeError,
    },

    /// The output directory could not be created.
    #[error("error creating output directory `{path}`")]
    CreateDir {
        /// The directory.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// The destination already exists and overwriting was disabled.
    #[error("`{path}` already exists and output.overwrite is false")]
    Exists {
        /// The destination path.
        path: Utf8PathBuf,
    },

    /// The report could not be written.
    #[error("error writing report to `{path}`")]
    Write {
        /// The destination path.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: atomicwrites::Error<std::io::Error>,
    },
}

/// An error that occurred while converting and writing results.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Conversion failed.
    #[error("error converting intermediate results")]
    Convert(#[from] ConvertError),

    /// Writing an output failed.
    #[error("error writing output")]
    Write(#[from] WriteReportError),
}

/// An error that occurred while writing the files for a failed test.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteResultError {
    /// A source file could not be read.
    #[error("error reading `{path}`")]
    Read {
        /// The path being read.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// A directory could not be created.
    #[error("error creating directory `{path}`")]
    CreateDir {
        /// The directory.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// A file could not be written.
    #[error("error writing `{path}`")]
    Write {
        /// The path being written.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },
}

/// An error that occurred while parsing the config.
#[derive(Debug, Error)]
#[error("failed to parse process-results config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self {
            config_file: config_file.into(),
            kind,
        }
    }

    /// Returns the config file for this error.
    pub fn config_file(&self) -> &Utf8PathBuf {
        &self.config_file
    }

    /// Returns the kind of error this is.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred while parsing a config.
///
/// Returned by [`ConfigParseError::kind`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseErrorKind {
    /// An error occurred while building the config.
    #[error(transparent)]
    BuildError(Box<ConfigError>),

    /// An error occurred while deserializing the config.
    #[error(transparent)]
    DeserializeError(Box<serde_path_to_error::Error<ConfigError>>),
}

/// Displays an error along with the chain of errors that caused it.
pub struct DisplayErrorChain<E> {
    error: E,
}

impl<E: error::Error> DisplayErrorChain<E> {
    /// Creates a new `DisplayErrorChain`.
    pub fn new(error: E) -> Self {
        Self { error }
    }
}

impl<E: error::Error> fmt::Display for DisplayErrorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        let mut source = self.error.source();
        while let Some(error) = source {
            write!(f, "\n  caused by:\n  - {error}")?;
            source = error.source();
        }

        Ok(())
    }
}
