// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Where the files for a test are written, relative to the results directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct OutputName {
    /// The directory part of the test name.
    pub(super) dir: Utf8PathBuf,

    /// The file stem all outputs start with.
    pub(super) base: String,
}

impl OutputName {
    /// Derives the output name for a test.
    ///
    /// The query string, if any, is sanitized and folded into the base name. It never contributes
    /// directories, so `foo.html?a/b` becomes `foo_a_b` in the top-level directory.
    pub(super) fn new(test_name: &str) -> Self {
        let (path, query) = match test_name.find(['?', '#']) {
            Some(index) => (&test_name[..index], Some(&test_name[index + 1..])),
            None => (test_name, None),
        };

        // Only keep plain components, so outputs never escape the results directory.
        let mut components: Vec<&str> = Utf8Path::new(path)
            .components()
            .filter_map(|component| match component {
                Utf8Component::Normal(name) => Some(name),
                _ => None,
            })
            .collect();
        let file_name = components.pop().unwrap_or_default();
        let dir = components.into_iter().collect();

        let mut base = strip_extension(file_name).to_owned();
        if let Some(query) = query.filter(|query| !query.is_empty()) {
            base.push('_');
            base.push_str(&sanitize(query));
        }

        Self { dir, base }
    }

    /// Returns the path of the output with the given suffix, relative to the results directory.
    pub(super) fn output_path(&self, suffix: &str) -> Utf8PathBuf {
        self.dir.join(format!("{}{suffix}", self.base))
    }
}

fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        // A leading dot marks a hidden file, not an extension.
        Some(index) if index > 0 => &file_name[..index],
        _ => file_name,
    }
}

fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
