// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generate and read reports in the JSON Test Results Format (version 3).
//!
//! The format nests results as `tests -> suite -> case`, where every case carries a single
//! collapsed `actual` verdict even if the case was run several times.

mod errors;
mod report;
mod serialize;

pub use errors::*;
pub use report::*;
