// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core functionality for `process-results`: converting intermediate test results into the JSON
//! test results format, and writing the files for failed tests into a results directory.
//!
//! The usual entry point is [`output::process_intermediate_results`], which converts a run with
//! [`aggregator::convert`] and writes each configured output format.

#![warn(missing_docs)]

pub mod aggregator;
pub mod artifacts;
pub mod config;
pub mod errors;
mod helpers;
pub mod output;
pub mod result_writer;
pub mod time;
