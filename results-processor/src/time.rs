// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion of run start times to Unix timestamps.

use crate::errors::ConvertError;
use chrono::NaiveDateTime;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";
const MAX_FRACTION_DIGITS: usize = 6;

/// Converts a UTC timestamp such as `2020-01-01T00:00:00.500000Z` into fractional seconds since
/// the Unix epoch.
///
/// The fractional part must have between one and six digits. Sub-second precision is preserved
/// down to the microsecond.
pub fn timestamp_to_epoch(timestamp: &str) -> Result<f64, ConvertError> {
    if !has_valid_fraction(timestamp) {
        return Err(ConvertError::InvalidTimestamp {
            timestamp: timestamp.to_owned(),
            error: None,
        });
    }

    let parsed = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).map_err(|error| {
        ConvertError::InvalidTimestamp {
            timestamp: timestamp.to_owned(),
            error: Some(error),
        }
    })?;
    let utc = parsed.and_utc();

    Ok(utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_micros()) / 1_000_000.0)
}

fn has_valid_fraction(timestamp: &str) -> bool {
    let Some(rest) = timestamp.strip_suffix('Z') else {
        return false;
    };
    let Some((_, fraction)) = rest.rsplit_once('.') else {
        return false;
    };
    (1..=MAX_FRACTION_DIGITS).contains(&fraction.len())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}
