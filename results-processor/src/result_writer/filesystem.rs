// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8Path;
use std::io;

/// The file system operations needed to write results for a test.
pub trait ResultFileSystem {
    /// Returns true if a file exists at `path`.
    fn exists(&self, path: &Utf8Path) -> bool;

    /// Reads the contents of the file at `path`.
    fn read(&self, path: &Utf8Path) -> io::Result<Vec<u8>>;

    /// Creates `path` and any missing parent directories.
    fn create_dir_all(&mut self, path: &Utf8Path) -> io::Result<()>;

    /// Writes `contents` to `path`, replacing any existing file.
    fn write(&mut self, path: &Utf8Path, contents: &[u8]) -> io::Result<()>;
}

/// A [`ResultFileSystem`] backed by the real file system.
#[derive(Clone, Copy, Debug, Default)]
pub struct RealFileSystem;

impl ResultFileSystem for RealFileSystem {
    fn exists(&self, path: &Utf8Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Utf8Path) -> io::Result<Vec<u8>> {
        fs_err::read(path)
    }

    fn create_dir_all(&mut self, path: &Utf8Path) -> io::Result<()> {
        fs_err::create_dir_all(path)
    }

    fn write(&mut self, path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
        fs_err::write(path, contents)
    }
}
