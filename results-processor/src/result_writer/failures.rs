// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;

/// The way in which a test failed.
///
/// A failing test may have several failures, each of which decides some of the files written
/// for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Failure {
    /// The text output did not match the expected text.
    TextMismatch,

    /// A test harness assertion failed.
    TestHarnessAssertion,

    /// The rendered image did not match the expected image.
    ImageHashMismatch,

    /// The audio output did not match the expected audio.
    AudioMismatch,

    /// The test crashed.
    Crash,

    /// The test timed out.
    Timeout,

    /// The rendering did not match the reference, which was expected to match.
    ReftestMismatch {
        /// The reference file.
        reference: Utf8PathBuf,
    },

    /// The rendering matched the reference, which was expected to differ.
    ReftestMismatchDidNotOccur {
        /// The reference file.
        reference: Utf8PathBuf,
    },

    /// The test did not produce an image to compare with the reference.
    ReftestNoImageGenerated {
        /// The reference file.
        reference: Utf8PathBuf,
    },

    /// The reference did not produce an image to compare with the test.
    ReftestNoReferenceImageGenerated {
        /// The reference file.
        reference: Utf8PathBuf,
    },
}

impl Failure {
    /// Returns the reference file for reftest failures.
    pub fn reference(&self) -> Option<&Utf8Path> {
        match self {
            Self::ReftestMismatch { reference }
            | Self::ReftestMismatchDidNotOccur { reference }
            | Self::ReftestNoImageGenerated { reference }
            | Self::ReftestNoReferenceImageGenerated { reference } => Some(reference),
            Self::TextMismatch
            | Self::TestHarnessAssertion
            | Self::ImageHashMismatch
            | Self::AudioMismatch
            | Self::Crash
            | Self::Timeout => None,
        }
    }

    pub(super) fn writes_text(&self) -> bool {
        matches!(self, Self::TextMismatch | Self::TestHarnessAssertion)
    }

    pub(super) fn writes_images(&self) -> bool {
        matches!(
            self,
            Self::ImageHashMismatch
                | Self::ReftestMismatch { .. }
                | Self::ReftestMismatchDidNotOccur { .. }
        )
    }

    pub(super) fn writes_audio(&self) -> bool {
        matches!(self, Self::AudioMismatch)
    }

    pub(super) fn writes_crash_log(&self) -> bool {
        matches!(self, Self::Crash)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TextMismatch => write!(f, "text mismatch"),
            Self::TestHarnessAssertion => write!(f, "test harness assertion"),
            Self::ImageHashMismatch => write!(f, "image mismatch"),
            Self::AudioMismatch => write!(f, "audio mismatch"),
            Self::Crash => write!(f, "crash"),
            Self::Timeout => write!(f, "timeout"),
            Self::ReftestMismatch { reference } => {
                write!(f, "reference mismatch ({reference})")
            }
            Self::ReftestMismatchDidNotOccur { reference } => {
                write!(f, "reference mismatch did not occur ({reference})")
            }
            Self::ReftestNoImageGenerated { reference } => {
                write!(f, "no image generated ({reference})")
            }
            Self::ReftestNoReferenceImageGenerated { reference } => {
                write!(f, "no reference image generated ({reference})")
            }
        }
    }
}

/// Output captured from the driver for one test, or the expected output for it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DriverOutput {
    /// Text output.
    pub text: Option<String>,

    /// PNG image output.
    pub image: Option<Vec<u8>>,

    /// WAV audio output.
    pub audio: Option<Vec<u8>>,

    /// The crash log, if the test crashed.
    pub crash_log: Option<String>,

    /// Anything written to standard error.
    pub error: Vec<u8>,
}

impl DriverOutput {
    /// Creates a new `DriverOutput` with the given text and nothing else.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}
