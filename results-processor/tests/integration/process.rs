// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8Path;
use color_eyre::eyre::{Result, ensure};
use indoc::{formatdoc, indoc};
use json_results::Report;
use pretty_assertions::assert_eq;
use results_metadata::{Artifact, BenchmarkRun, IntermediateResults, Tag, TestResult};
use results_processor::{
    config::ProcessorConfig,
    errors::{ProcessError, WriteReportError},
    output::{OUTPUT_FILENAME, process_intermediate_results, read_intermediate_results},
};

fn story_results(output_dir: &Utf8Path) -> IntermediateResults {
    let mut first = TestResult::new("bench/story%20A", "FAIL", false, "1.0s");
    first
        .add_tag(Tag::new("shard", "1"))
        .add_artifact("trace", Artifact::local(output_dir.join("story_A/trace.html")));
    let second = TestResult::new("bench/story%20A", "PASS", true, "2.0s");

    IntermediateResults {
        test_results: vec![first, second],
        benchmark_run: BenchmarkRun {
            start_time: "2020-01-01T00:00:00.500000Z".to_owned(),
            interrupted: false,
        },
    }
}

#[test]
fn writes_json_test_results() -> Result<()> {
    let dir = camino_tempfile::tempdir()?;
    let output_dir = dir.path().join("output");
    let results = story_results(&output_dir);

    let written =
        process_intermediate_results(&results, &output_dir, &ProcessorConfig::default_config())?;
    assert_eq!(written, vec![output_dir.join(OUTPUT_FILENAME)]);

    let contents = std::fs::read_to_string(&written[0])?;
    let expected = indoc! {r#"
        {
            "interrupted": false,
            "num_failures_by_type": {
                "FAIL": 1,
                "PASS": 1
            },
            "path_delimiter": "/",
            "seconds_since_epoch": 1577836800.5,
            "tests": {
                "bench": {
                    "story A": {
                        "actual": "FAIL PASS",
                        "artifacts": {
                            "trace": "story_A/trace.html"
                        },
                        "expected": "PASS",
                        "is_unexpected": true,
                        "shard": 1,
                        "time": 1.0
                    }
                }
            },
            "version": 3
        }"#};
    assert_eq!(contents, expected);

    let report = Report::deserialize(contents.as_bytes())?;
    ensure!(
        report.test("bench", "story A").is_some(),
        "written report can be read back"
    );

    Ok(())
}

#[test]
fn reads_intermediate_results_from_disk() -> Result<()> {
    let dir = camino_tempfile::tempdir()?;
    let input = dir.path().join("_test_results.json");
    std::fs::write(
        &input,
        formatdoc! {r#"
            {{
                "testResults": [
                    {{
                        "testPath": "bench/story",
                        "status": "SKIP",
                        "isExpected": true,
                        "runDuration": "0.0s",
                        "outputArtifacts": {{
                            "log": {{"filePath": "{output}/logs/story.txt"}},
                            "trace": {{"filePath": "{output}/t.html", "remoteUrl": "https://example.com/t.html"}}
                        }}
                    }}
                ],
                "benchmarkRun": {{"startTime": "2021-06-15T12:30:45.25Z", "interrupted": true}}
            }}
        "#, output = dir.path()},
    )?;

    let results = read_intermediate_results(&input)?;
    let report = results_processor::aggregator::convert(&results, dir.path())?;

    assert!(report.interrupted);
    assert_eq!(report.seconds_since_epoch, 1_623_760_245.25);
    let case = report.test("bench", "story").expect("case exists");
    assert_eq!(case.actual, "SKIP");
    assert_eq!(case.expected, "SKIP");
    assert_eq!(case.artifacts["log"], "logs/story.txt");
    assert_eq!(case.artifacts["trace"], "https://example.com/t.html");
    assert_eq!(case.shard, None);

    Ok(())
}

#[test]
fn user_config_changes_base_dir_and_overwrite() -> Result<()> {
    let dir = camino_tempfile::tempdir()?;
    let output_dir = dir.path().join("output");
    let config_file = dir.path().join("process-results.toml");
    std::fs::write(
        &config_file,
        indoc! {r#"
            [output]
            overwrite = false

            [artifacts]
            base-dir = ".."
        "#},
    )?;
    let config = ProcessorConfig::from_sources(&output_dir, Some(&config_file))?;
    let results = story_results(&output_dir);

    let written = process_intermediate_results(&results, &output_dir, &config)?;
    let report = Report::deserialize(std::fs::read(&written[0])?.as_slice())?;
    let case = report.test("bench", "story A").expect("case exists");
    assert_eq!(case.artifacts["trace"], "output/story_A/trace.html");

    // A second run must not replace the existing file.
    let error = process_intermediate_results(&results, &output_dir, &config)
        .expect_err("existing output is kept");
    ensure!(
        matches!(error, ProcessError::Write(WriteReportError::Exists { .. })),
        "unexpected error: {error:?}"
    );

    Ok(())
}

#[test]
fn repeated_format_without_overwrite_is_written_once() -> Result<()> {
    let dir = camino_tempfile::tempdir()?;
    let output_dir = dir.path().join("output");
    let config_file = dir.path().join("process-results.toml");
    std::fs::write(
        &config_file,
        indoc! {r#"
            [output]
            formats = ["json-test-results", "json-test-results"]
            overwrite = false
        "#},
    )?;
    let config = ProcessorConfig::from_sources(&output_dir, Some(&config_file))?;

    let written = process_intermediate_results(&story_results(&output_dir), &output_dir, &config)?;
    assert_eq!(written, vec![output_dir.join(OUTPUT_FILENAME)]);

    Ok(())
}

#[test]
fn conversion_errors_write_nothing() -> Result<()> {
    let dir = camino_tempfile::tempdir()?;
    let output_dir = dir.path().join("output");
    let mut results = story_results(&output_dir);
    results
        .test_results
        .push(TestResult::new("bench/story/extra", "PASS", true, "1s"));

    let error = process_intermediate_results(
        &results,
        &output_dir,
        &ProcessorConfig::default_config(),
    )
    .expect_err("malformed test path is rejected");
    ensure!(
        matches!(error, ProcessError::Convert(_)),
        "unexpected error: {error:?}"
    );
    ensure!(!output_dir.exists(), "output directory was not created");

    Ok(())
}
