// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{DriverOutput, Failure, ResultFileSystem, naming::OutputName};
use crate::{errors::WriteResultError, helpers::escape_html};
use camino::{Utf8Path, Utf8PathBuf};
use similar::{ChangeTag, TextDiff};
use std::collections::BTreeSet;
use swrite::{SWrite, swriteln};
use tracing::debug;

const ACTUAL_TEXT: &str = "-actual.txt";
const EXPECTED_TEXT: &str = "-expected.txt";
const DIFF_TEXT: &str = "-diff.txt";
const PRETTY_DIFF: &str = "-pretty-diff.html";
const ACTUAL_IMAGE: &str = "-actual.png";
const EXPECTED_IMAGE: &str = "-expected.png";
const ACTUAL_AUDIO: &str = "-actual.wav";
const EXPECTED_AUDIO: &str = "-expected.wav";
const CRASH_LOG: &str = "-crash-log.txt";
const STDERR: &str = "-stderr.txt";

/// Writes the files that describe how a test failed into `results_dir`.
///
/// Nothing is written for a test without failures. Directories are only created when a file is
/// about to be written into them. Returns the paths that were written.
///
/// Reference files for reftests are resolved against `tests_root`. A reference that does not
/// exist is skipped.
pub fn write_test_result<F: ResultFileSystem>(
    fs: &mut F,
    results_dir: &Utf8Path,
    tests_root: &Utf8Path,
    test_name: &str,
    actual: &DriverOutput,
    expected: &DriverOutput,
    failures: &[Failure],
) -> Result<Vec<Utf8PathBuf>, WriteResultError> {
    if failures.is_empty() {
        return Ok(Vec::new());
    }

    let mut writer = TestResultWriter {
        fs,
        results_dir,
        tests_root,
        name: OutputName::new(test_name),
        created_dirs: BTreeSet::new(),
        written: Vec::new(),
    };

    for failure in failures {
        debug!("writing results for {test_name}: {failure}");

        if failure.writes_text() {
            writer.write_text_outputs(actual, expected)?;
        }
        if failure.writes_images() {
            writer.write_optional(ACTUAL_IMAGE, actual.image.as_deref())?;
            writer.write_optional(EXPECTED_IMAGE, expected.image.as_deref())?;
        }
        if failure.writes_audio() {
            writer.write_optional(ACTUAL_AUDIO, actual.audio.as_deref())?;
            writer.write_optional(EXPECTED_AUDIO, expected.audio.as_deref())?;
        }
        if failure.writes_crash_log() {
            writer.write_optional(CRASH_LOG, actual.crash_log.as_deref().map(str::as_bytes))?;
        }
        if let Some(reference) = failure.reference() {
            writer.copy_reference(reference)?;
        }
    }

    if !actual.error.is_empty() {
        writer.write_output(STDERR, &actual.error)?;
    }

    Ok(writer.written)
}

struct TestResultWriter<'a, F> {
    fs: &'a mut F,
    results_dir: &'a Utf8Path,
    tests_root: &'a Utf8Path,
    name: OutputName,
    created_dirs: BTreeSet<Utf8PathBuf>,
    written: Vec<Utf8PathBuf>,
}

impl<F: ResultFileSystem> TestResultWriter<'_, F> {
    fn write_text_outputs(
        &mut self,
        actual: &DriverOutput,
        expected: &DriverOutput,
    ) -> Result<(), WriteResultError> {
        let actual_text = actual.text.as_deref().unwrap_or_default();
        let expected_text = expected.text.as_deref().unwrap_or_default();

        self.write_output(ACTUAL_TEXT, actual_text.as_bytes())?;
        self.write_output(EXPECTED_TEXT, expected_text.as_bytes())?;

        let diff = TextDiff::from_lines(expected_text, actual_text);
        let expected_name = self.name.output_path(EXPECTED_TEXT);
        let actual_name = self.name.output_path(ACTUAL_TEXT);
        let unified = diff
            .unified_diff()
            .header(expected_name.as_str(), actual_name.as_str())
            .to_string();
        self.write_output(DIFF_TEXT, unified.as_bytes())?;
        self.write_output(PRETTY_DIFF, pretty_diff(&diff).as_bytes())?;

        Ok(())
    }

    fn write_optional(
        &mut self,
        suffix: &str,
        contents: Option<&[u8]>,
    ) -> Result<(), WriteResultError> {
        match contents {
            Some(contents) => self.write_output(suffix, contents),
            None => Ok(()),
        }
    }

    fn write_output(&mut self, suffix: &str, contents: &[u8]) -> Result<(), WriteResultError> {
        let path = self.results_dir.join(self.name.output_path(suffix));
        self.write_file(path, contents)
    }

    fn copy_reference(&mut self, reference: &Utf8Path) -> Result<(), WriteResultError> {
        let source = self.tests_root.join(reference);
        if !self.fs.exists(&source) {
            debug!("reference {source} does not exist, not copying it");
            return Ok(());
        }

        let dest = match source.strip_prefix(self.tests_root) {
            Ok(rel_path) => self.results_dir.join(rel_path),
            Err(_) => {
                let file_name = source.file_name().unwrap_or(reference.as_str());
                self.results_dir.join(&self.name.dir).join(file_name)
            }
        };
        let contents = self
            .fs
            .read(&source)
            .map_err(|error| WriteResultError::Read {
                path: source.clone(),
                error,
            })?;
        self.write_file(dest, &contents)
    }

    fn write_file(&mut self, path: Utf8PathBuf, contents: &[u8]) -> Result<(), WriteResultError> {
        if self.written.contains(&path) {
            return Ok(());
        }

        if let Some(parent) = path.parent()
            && !self.created_dirs.contains(parent)
        {
            self.fs
                .create_dir_all(parent)
                .map_err(|error| WriteResultError::CreateDir {
                    path: parent.to_owned(),
                    error,
                })?;
            self.created_dirs.insert(parent.to_owned());
        }

        self.fs
            .write(&path, contents)
            .map_err(|error| WriteResultError::Write {
                path: path.clone(),
                error,
            })?;
        self.written.push(path);
        Ok(())
    }
}

fn pretty_diff<'a>(diff: &TextDiff<'a, 'a, 'a, str>) -> String {
    let mut out = String::new();
    swriteln!(out, "<!DOCTYPE html>");
    swriteln!(out, "<html><head><meta charset=\"utf-8\"><style>");
    swriteln!(out, ".del {{ background-color: #fdd; }}");
    swriteln!(out, ".ins {{ background-color: #dfd; }}");
    swriteln!(out, "</style></head><body><pre>");
    for change in diff.iter_all_changes() {
        let (class, sign) = match change.tag() {
            ChangeTag::Delete => (Some("del"), '-'),
            ChangeTag::Insert => (Some("ins"), '+'),
            ChangeTag::Equal => (None, ' '),
        };
        let line = escape_html(change.value().trim_end_matches(['\r', '\n']));
        match class {
            Some(class) => swriteln!(out, "<span class=\"{class}\">{sign}{line}</span>"),
            None => swriteln!(out, "{sign}{line}"),
        }
    }
    swriteln!(out, "</pre></body></html>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result_writer::{RealFileSystem, test_helpers::MockFileSystem};
    use pretty_assertions::assert_eq;

    const RESULTS_DIR: &str = "/tmp";
    const TESTS_ROOT: &str = "/src";

    fn run_test(
        fs: &mut MockFileSystem,
        test_name: &str,
        actual: &DriverOutput,
        expected: &DriverOutput,
        failures: &[Failure],
    ) -> Vec<Utf8PathBuf> {
        write_test_result(
            fs,
            Utf8Path::new(RESULTS_DIR),
            Utf8Path::new(TESTS_ROOT),
            test_name,
            actual,
            expected,
            failures,
        )
        .expect("writing results succeeds")
    }

    fn empty() -> DriverOutput {
        DriverOutput::with_text("")
    }

    #[test]
    fn nothing_is_written_without_failures() {
        let mut fs = MockFileSystem::new();
        let written = run_test(&mut fs, "foo.html", &empty(), &empty(), &[]);
        assert!(written.is_empty());
        assert!(fs.written_files.is_empty());
        assert_eq!(fs.dirs, BTreeSet::from(["/".into()]));
    }

    #[test]
    fn existing_reference_is_copied() {
        for (reference, dest) in [
            ("/src/exists-expected.html", "/tmp/exists-expected.html"),
            (
                "/src/exists-expected-mismatch.html",
                "/tmp/exists-expected-mismatch.html",
            ),
        ] {
            for failure in [
                Failure::ReftestMismatch {
                    reference: reference.into(),
                },
                Failure::ReftestMismatchDidNotOccur {
                    reference: reference.into(),
                },
            ] {
                let mut fs = MockFileSystem::with_files([(reference, "yup")]);
                run_test(&mut fs, "foo.html", &empty(), &empty(), &[failure]);
                assert_eq!(fs.written_paths(), BTreeSet::from([dest]));
                assert_eq!(fs.written_str(dest), "yup");
            }
        }
    }

    #[test]
    fn missing_reference_is_skipped() {
        for failure in [
            Failure::ReftestMismatch {
                reference: "notfound.html".into(),
            },
            Failure::ReftestMismatchDidNotOccur {
                reference: "notfound.html".into(),
            },
        ] {
            let mut fs = MockFileSystem::new();
            let written = run_test(&mut fs, "foo.html", &empty(), &empty(), &[failure]);
            assert!(written.is_empty());
            assert!(fs.written_files.is_empty());
        }
    }

    #[test]
    fn reference_copied_when_images_are_missing() {
        for failure in [
            Failure::ReftestNoImageGenerated {
                reference: "/src/exists-expected.html".into(),
            },
            Failure::ReftestNoReferenceImageGenerated {
                reference: "/src/exists-expected.html".into(),
            },
        ] {
            let mut fs = MockFileSystem::with_files([("/src/exists-expected.html", "yup")]);
            run_test(&mut fs, "foo.html", &empty(), &empty(), &[failure]);
            assert_eq!(
                fs.written_paths(),
                BTreeSet::from(["/tmp/exists-expected.html"])
            );
        }
    }

    #[test]
    fn relative_reference_keeps_its_directory() {
        let mut fs = MockFileSystem::with_files([("/src/dir/ref/foo-ref.html", "ref")]);
        run_test(
            &mut fs,
            "dir/foo.html",
            &empty(),
            &empty(),
            &[Failure::ReftestMismatch {
                reference: "dir/ref/foo-ref.html".into(),
            }],
        );
        assert_eq!(
            fs.written_paths(),
            BTreeSet::from(["/tmp/dir/ref/foo-ref.html"])
        );
    }

    #[test]
    fn reference_outside_tests_root_lands_beside_outputs() {
        let mut fs = MockFileSystem::with_files([("/elsewhere/foo-ref.html", "ref")]);
        run_test(
            &mut fs,
            "dir/foo.html",
            &empty(),
            &empty(),
            &[Failure::ReftestMismatch {
                reference: "/elsewhere/foo-ref.html".into(),
            }],
        );
        assert_eq!(
            fs.written_paths(),
            BTreeSet::from(["/tmp/dir/foo-ref.html"])
        );
    }

    #[test]
    fn query_string_is_sanitized_without_creating_directories() {
        let mut fs = MockFileSystem::new();
        run_test(
            &mut fs,
            "foo.html?a/b",
            &empty(),
            &empty(),
            &[Failure::TestHarnessAssertion],
        );
        assert_eq!(
            fs.written_paths(),
            BTreeSet::from([
                "/tmp/foo_a_b-actual.txt",
                "/tmp/foo_a_b-diff.txt",
                "/tmp/foo_a_b-expected.txt",
                "/tmp/foo_a_b-pretty-diff.html",
            ])
        );
        // No directory is created for `foo.html?a`.
        assert_eq!(fs.dirs, BTreeSet::from(["/".into(), "/tmp".into()]));
    }

    #[test]
    fn text_mismatch_writes_diffs() {
        let mut fs = MockFileSystem::new();
        let actual = DriverOutput::with_text("line 1\nline <2>\n");
        let expected = DriverOutput::with_text("line 1\nline 2\n");
        let written = run_test(
            &mut fs,
            "dir/foo.html",
            &actual,
            &expected,
            &[Failure::TextMismatch, Failure::TestHarnessAssertion],
        );

        // Each file is only written once.
        assert_eq!(written.len(), 4);
        assert_eq!(
            fs.written_str("/tmp/dir/foo-actual.txt"),
            "line 1\nline <2>\n"
        );
        assert_eq!(fs.written_str("/tmp/dir/foo-expected.txt"), "line 1\nline 2\n");
        assert_eq!(
            fs.written_str("/tmp/dir/foo-diff.txt"),
            "--- dir/foo-expected.txt\n\
             +++ dir/foo-actual.txt\n\
             @@ -1,2 +1,2 @@\n \
             line 1\n\
             -line 2\n\
             +line <2>\n"
        );

        let pretty = fs.written_str("/tmp/dir/foo-pretty-diff.html");
        assert!(pretty.contains("<span class=\"del\">-line 2</span>"), "{pretty}");
        assert!(
            pretty.contains("<span class=\"ins\">+line &lt;2&gt;</span>"),
            "{pretty}"
        );
        assert!(pretty.contains("\n line 1\n"), "{pretty}");
        assert!(fs.dirs.contains(Utf8Path::new("/tmp/dir")));
    }

    #[test]
    fn binary_outputs_are_written_when_present() {
        let mut fs = MockFileSystem::new();
        let actual = DriverOutput {
            image: Some(b"actual png".to_vec()),
            audio: Some(b"actual wav".to_vec()),
            crash_log: Some("stack trace".to_owned()),
            error: b"stderr output".to_vec(),
            ..DriverOutput::default()
        };
        let expected = DriverOutput {
            image: Some(b"expected png".to_vec()),
            ..DriverOutput::default()
        };
        run_test(
            &mut fs,
            "foo.html",
            &actual,
            &expected,
            &[
                Failure::ImageHashMismatch,
                Failure::AudioMismatch,
                Failure::Crash,
            ],
        );

        assert_eq!(
            fs.written_paths(),
            BTreeSet::from([
                "/tmp/foo-actual.png",
                "/tmp/foo-actual.wav",
                "/tmp/foo-crash-log.txt",
                "/tmp/foo-expected.png",
                "/tmp/foo-stderr.txt",
            ])
        );
        assert_eq!(fs.written_str("/tmp/foo-crash-log.txt"), "stack trace");
        assert_eq!(fs.written_str("/tmp/foo-stderr.txt"), "stderr output");
    }

    #[test]
    fn timeout_only_writes_stderr() {
        let mut fs = MockFileSystem::new();
        let actual = DriverOutput {
            error: b"timed out".to_vec(),
            ..DriverOutput::default()
        };
        run_test(&mut fs, "foo.html", &actual, &empty(), &[Failure::Timeout]);
        assert_eq!(fs.written_paths(), BTreeSet::from(["/tmp/foo-stderr.txt"]));

        let mut fs = MockFileSystem::new();
        run_test(&mut fs, "foo.html", &empty(), &empty(), &[Failure::Timeout]);
        assert!(fs.written_files.is_empty());
    }

    #[test]
    fn real_file_system_writes_files() {
        let dir = camino_tempfile::tempdir().expect("created temp dir");
        let tests_root = dir.path().join("src");
        let results_dir = dir.path().join("results");
        std::fs::create_dir_all(&tests_root).expect("created tests root");
        std::fs::write(tests_root.join("foo-expected.html"), "ref").expect("wrote reference");

        let written = write_test_result(
            &mut RealFileSystem,
            &results_dir,
            &tests_root,
            "sub/foo.html?x",
            &DriverOutput::with_text("a\n"),
            &DriverOutput::with_text("b\n"),
            &[
                Failure::TextMismatch,
                Failure::ReftestMismatch {
                    reference: "foo-expected.html".into(),
                },
            ],
        )
        .expect("writing results succeeds");

        assert_eq!(written.len(), 5);
        assert_eq!(
            std::fs::read_to_string(results_dir.join("sub/foo_x-actual.txt"))
                .expect("actual text is readable"),
            "a\n"
        );
        assert_eq!(
            std::fs::read_to_string(results_dir.join("foo-expected.html"))
                .expect("reference is readable"),
            "ref"
        );
    }
}
