// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::ResultFileSystem;
use camino::{Utf8Path, Utf8PathBuf};
use std::{
    collections::{BTreeMap, BTreeSet},
    io,
};

/// An in-memory file system that records what was written.
#[derive(Debug)]
pub(super) struct MockFileSystem {
    pub(super) files: BTreeMap<Utf8PathBuf, Vec<u8>>,
    pub(super) written_files: BTreeMap<Utf8PathBuf, Vec<u8>>,
    pub(super) dirs: BTreeSet<Utf8PathBuf>,
}

impl MockFileSystem {
    pub(super) fn new() -> Self {
        Self {
            files: BTreeMap::new(),
            written_files: BTreeMap::new(),
            dirs: BTreeSet::from(["/".into()]),
        }
    }

    pub(super) fn with_files<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut fs = Self::new();
        fs.files.extend(
            files
                .into_iter()
                .map(|(path, contents)| (path.into(), contents.as_bytes().to_vec())),
        );
        fs
    }

    pub(super) fn written_paths(&self) -> BTreeSet<&str> {
        self.written_files.keys().map(|path| path.as_str()).collect()
    }

    pub(super) fn written_str(&self, path: &str) -> &str {
        let contents = self
            .written_files
            .get(Utf8Path::new(path))
            .unwrap_or_else(|| panic!("{path} was written"));
        std::str::from_utf8(contents).expect("contents are UTF-8")
    }
}

impl ResultFileSystem for MockFileSystem {
    fn exists(&self, path: &Utf8Path) -> bool {
        self.files.contains_key(path)
    }

    fn read(&self, path: &Utf8Path) -> io::Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{path} not found")))
    }

    fn create_dir_all(&mut self, path: &Utf8Path) -> io::Result<()> {
        self.dirs
            .extend(path.ancestors().map(Utf8Path::to_path_buf));
        Ok(())
    }

    fn write(&mut self, path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
        let parent = path.parent().unwrap_or(Utf8Path::new("/"));
        if !self.dirs.contains(parent) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("parent directory {parent} does not exist"),
            ));
        }
        self.files.insert(path.to_owned(), contents.to_vec());
        self.written_files.insert(path.to_owned(), contents.to_vec());
        Ok(())
    }
}
