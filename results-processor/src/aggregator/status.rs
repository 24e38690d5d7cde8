// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use results_metadata::TestStatus;
use std::collections::BTreeSet;

/// Collapses the statuses of every invocation of a case into the `actual` string.
///
/// Runs that are uniformly `PASS` or uniformly `SKIP` collapse to that single status. Anything
/// else is joined in invocation order without deduplication, so `PASS PASS FAIL` stays as is.
/// Flakiness detection downstream relies on seeing every status of a mixed run.
pub(super) fn dedup_statuses(statuses: &[TestStatus]) -> String {
    match statuses.split_first() {
        Some((first, rest))
            if (*first == TestStatus::PASS || *first == TestStatus::SKIP)
                && rest.iter().all(|status| status == first) =>
        {
            first.to_string()
        }
        _ => join(statuses),
    }
}

/// Renders the set of expected statuses: sorted, deduplicated and space-separated.
pub(super) fn render_expected(expected: &BTreeSet<TestStatus>) -> String {
    join(expected)
}

fn join<'a>(statuses: impl IntoIterator<Item = &'a TestStatus>) -> String {
    statuses
        .into_iter()
        .map(TestStatus::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
