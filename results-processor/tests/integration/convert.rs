// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8Path;
use proptest::prelude::*;
use results_metadata::{BenchmarkRun, IntermediateResults, TestResult};
use results_processor::aggregator::convert;
use std::collections::{BTreeMap, BTreeSet};
use test_strategy::proptest;

// Suites are used verbatim, so an encoded suite name stays encoded.
const SUITES: [&str; 3] = ["bench_a", "bench_b", "bench%2Fc"];
// Raw case segments and their decoded names.
const CASES: [(&str, &str); 3] = [
    ("story", "story"),
    ("story%20two", "story two"),
    ("other%3Fq%3D1", "other?q=1"),
];
const STATUSES: [&str; 4] = ["PASS", "FAIL", "SKIP", "CRASH"];

type RawRecord = (usize, usize, usize, bool, u32);

fn arb_records() -> impl Strategy<Value = Vec<RawRecord>> {
    prop::collection::vec(
        (
            0..SUITES.len(),
            0..CASES.len(),
            0..STATUSES.len(),
            any::<bool>(),
            0..100_000u32,
        ),
        0..64,
    )
}

fn duration_str(millis: u32) -> String {
    format!("{}.{:03}s", millis / 1000, millis % 1000)
}

fn build_results(records: &[RawRecord]) -> IntermediateResults {
    IntermediateResults {
        test_results: records
            .iter()
            .map(|&(suite, case, status, is_expected, millis)| {
                TestResult::new(
                    format!("{}/{}", SUITES[suite], CASES[case].0),
                    STATUSES[status],
                    is_expected,
                    duration_str(millis),
                )
            })
            .collect(),
        benchmark_run: BenchmarkRun {
            start_time: "2020-01-01T00:00:00.000001Z".to_owned(),
            interrupted: false,
        },
    }
}

#[proptest]
fn counts_every_invocation_once(#[strategy(arb_records())] records: Vec<RawRecord>) {
    let results = build_results(&records);
    let report = convert(&results, Utf8Path::new("/out")).expect("conversion succeeds");

    let total: usize = report.num_failures_by_type.values().sum();
    prop_assert_eq!(total, records.len());

    let distinct: BTreeSet<(usize, usize)> = records
        .iter()
        .map(|&(suite, case, ..)| (suite, case))
        .collect();
    prop_assert_eq!(report.case_count(), distinct.len());
}

#[proptest]
fn first_invocation_decides_time(#[strategy(arb_records())] records: Vec<RawRecord>) {
    let results = build_results(&records);
    let report = convert(&results, Utf8Path::new("/out")).expect("conversion succeeds");

    let mut first_seen: BTreeMap<(usize, usize), u32> = BTreeMap::new();
    let mut statuses: BTreeMap<(usize, usize), Vec<&str>> = BTreeMap::new();
    for &(suite, case, status, _, millis) in &records {
        first_seen.entry((suite, case)).or_insert(millis);
        statuses
            .entry((suite, case))
            .or_default()
            .push(STATUSES[status]);
    }

    for ((suite, case), millis) in first_seen {
        let result = report
            .test(SUITES[suite], CASES[case].1)
            .expect("every key has a case");

        let expected_time: f64 = duration_str(millis)
            .trim_end_matches('s')
            .parse()
            .expect("duration is numeric");
        prop_assert_eq!(result.time, expected_time);

        let case_statuses = &statuses[&(suite, case)];
        if case_statuses.iter().all(|&s| s == "PASS") {
            prop_assert_eq!(result.actual.as_str(), "PASS");
        } else if case_statuses.iter().all(|&s| s == "SKIP") {
            prop_assert_eq!(result.actual.as_str(), "SKIP");
        } else {
            prop_assert_eq!(result.actual.clone(), case_statuses.join(" "));
        }
    }
}
