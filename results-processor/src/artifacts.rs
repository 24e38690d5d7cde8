// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolution of artifact locations into the strings written to a report.
//!
//! This is a pure string transform: artifact files are never read or checked for existence.

use crate::{
    errors::ArtifactPathError,
    helpers::{convert_rel_path_to_forward_slash, normalize_lexically},
};
use camino::Utf8Path;
use results_metadata::{Artifact, ArtifactLocation};

/// Resolves an artifact to the value recorded for it in a report.
///
/// Remote URLs are returned verbatim. Local paths are made relative to `base_dir` and always use
/// `/` as the separator, whatever the host platform.
pub fn resolve_artifact_path(
    artifact: &Artifact,
    base_dir: &Utf8Path,
) -> Result<String, ArtifactPathError> {
    match artifact.location() {
        Some(ArtifactLocation::Remote(url)) => Ok(url.to_owned()),
        Some(ArtifactLocation::Local(path)) => relativize(path, base_dir),
        None => Err(ArtifactPathError::MissingLocation),
    }
}

fn relativize(path: &Utf8Path, base_dir: &Utf8Path) -> Result<String, ArtifactPathError> {
    let not_relativizable = || ArtifactPathError::NotRelativizable {
        path: path.to_owned(),
        base_dir: base_dir.to_owned(),
    };

    // pathdiff compares components literally, so `.` and `..` must be resolved first.
    let rel_path =
        pathdiff::diff_utf8_paths(normalize_lexically(path), normalize_lexically(base_dir))
            .ok_or_else(not_relativizable)?;
    // pathdiff hands back absolute paths unchanged if the base is relative.
    if !rel_path.is_relative() {
        return Err(not_relativizable());
    }
    if rel_path.as_str().is_empty() {
        return Ok(".".to_owned());
    }

    Ok(convert_rel_path_to_forward_slash(&rel_path).into_string())
}
