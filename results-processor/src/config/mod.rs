// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration support for process-results.
//!
//! Configuration is layered: the embedded `default-config.toml` is read first, and a user config
//! file is layered on top of it. The user config is either passed in explicitly, in which case it
//! must exist, or read from `.config/process-results.toml` under the output directory if present.

mod imp;
mod warnings;

pub use imp::*;
pub use warnings::*;
