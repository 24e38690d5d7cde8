// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! General support code for results-processor.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Converts a relative path that uses the host's separator into one that uses forward slashes.
pub(crate) fn convert_rel_path_to_forward_slash(rel_path: &Utf8Path) -> Utf8PathBuf {
    replace_separator(rel_path, std::path::MAIN_SEPARATOR)
}

pub(crate) fn replace_separator(rel_path: &Utf8Path, separator: char) -> Utf8PathBuf {
    if !rel_path.is_relative() {
        panic!("path for conversion to forward slash '{rel_path}' is not relative");
    }
    if separator == '/' {
        return rel_path.to_path_buf();
    }
    rel_path.as_str().replace(separator, "/").into()
}

/// Removes `.` segments and resolves `..` segments without touching the file system.
pub(crate) fn normalize_lexically(path: &Utf8Path) -> Utf8PathBuf {
    let mut normalized = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match normalized.components().next_back() {
                Some(Utf8Component::Normal(_)) => {
                    normalized.pop();
                }
                // `..` at the root is the root.
                Some(Utf8Component::RootDir | Utf8Component::Prefix(_)) => {}
                Some(Utf8Component::ParentDir | Utf8Component::CurDir) | None => {
                    normalized.push("..");
                }
            },
            other => normalized.push(other),
        }
    }
    if normalized.as_str().is_empty() {
        normalized.push(".");
    }
    normalized
}

/// Escapes the characters that are significant in HTML text and attribute values.
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}
