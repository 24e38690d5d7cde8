// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING_TARGET, StderrStyles};
use camino::Utf8PathBuf;
use owo_colors::OwoColorize;
use results_metadata::ProcessResultsExitCode;
use results_processor::errors::{
    ConfigParseError, ConfigParseErrorKind, ConvertError, DisplayErrorChain, IntermediateReadError,
    ProcessError, WriteReportError,
};
use std::error::Error;
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

/// An error that is expected to occur and is reported to the user without a backtrace.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("invalid output directory")]
    InvalidOutputDir {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("output directory is not valid UTF-8")]
    NonUtf8OutputDir {
        #[source]
        err: camino::FromPathBufError,
    },
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        err: ConfigParseError,
    },
    #[error("error reading intermediate results")]
    InputReadFailed {
        #[from]
        err: IntermediateReadError,
    },
    #[error("error converting intermediate results")]
    ConversionFailed {
        #[source]
        err: ConvertError,
    },
    #[error("error writing output")]
    WriteOutputFailed {
        #[source]
        err: WriteReportError,
    },
}

impl From<ProcessError> for ExpectedError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::Convert(err) => Self::ConversionFailed { err },
            ProcessError::Write(err) => Self::WriteOutputFailed { err },
        }
    }
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::InvalidOutputDir { .. }
            | Self::NonUtf8OutputDir { .. }
            | Self::ConfigParseError { .. } => ProcessResultsExitCode::SETUP_ERROR,
            Self::InputReadFailed { .. } => ProcessResultsExitCode::INPUT_READ_FAILED,
            Self::ConversionFailed { .. } => ProcessResultsExitCode::CONVERSION_FAILED,
            Self::WriteOutputFailed { .. } => ProcessResultsExitCode::WRITE_OUTPUT_ERROR,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let next_error = match self {
            Self::InvalidOutputDir { path, err } => {
                error!(
                    "could not resolve output directory `{}`",
                    path.style(styles.bold)
                );
                Some(err as &dyn Error)
            }
            Self::NonUtf8OutputDir { err } => {
                error!(
                    "output directory `{}` is not valid UTF-8",
                    err.as_path().display().style(styles.bold)
                );
                None
            }
            Self::ConfigParseError { err } => {
                match err.kind() {
                    ConfigParseErrorKind::BuildError(error) => {
                        error!(
                            "failed to parse config at `{}`\n{}",
                            err.config_file().style(styles.bold),
                            error
                        );
                    }
                    ConfigParseErrorKind::DeserializeError(error) => {
                        error!(
                            "failed to parse config at `{}`: error at `{}`\n{}",
                            err.config_file().style(styles.bold),
                            error.path().style(styles.bold),
                            error.inner()
                        );
                    }
                    other => {
                        error!(
                            "failed to parse config at `{}`",
                            err.config_file().style(styles.bold)
                        );
                        return display_sources(Some(other as &dyn Error));
                    }
                }
                None
            }
            Self::InputReadFailed { err } => {
                error!("{err}");
                err.source()
            }
            Self::ConversionFailed { err } => {
                error!("{}", DisplayErrorChain::new(err));
                None
            }
            Self::WriteOutputFailed { err } => {
                error!("{err}");
                err.source()
            }
        };

        display_sources(next_error);
    }
}

fn display_sources(mut next_error: Option<&dyn Error>) {
    while let Some(err) = next_error {
        error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
        next_error = err.source();
    }
}
