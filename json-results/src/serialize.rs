// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize and deserialize a `Report`.

use crate::{DeserializeError, Report, SerializeError, TestTree};
use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, PrettyFormatter};
use std::{collections::BTreeMap, io};

static INDENT: &[u8] = b"    ";

// Fields are declared in alphabetical order so that serialized keys come out sorted. The maps
// are all BTreeMaps, which sort their keys as well.
#[derive(Serialize)]
struct SerializableReport<'a> {
    interrupted: bool,
    num_failures_by_type: &'a BTreeMap<String, usize>,
    path_delimiter: &'static str,
    seconds_since_epoch: f64,
    tests: &'a TestTree,
    version: u32,
}

#[derive(Deserialize)]
struct DeserializedReport {
    interrupted: bool,
    num_failures_by_type: BTreeMap<String, usize>,
    path_delimiter: String,
    seconds_since_epoch: f64,
    tests: TestTree,
    version: u32,
}

pub(crate) fn serialize_report(report: &Report, writer: impl io::Write) -> Result<(), SerializeError> {
    // Use the destructuring syntax to ensure that all fields are handled.
    let Report {
        tests,
        seconds_since_epoch,
        interrupted,
        num_failures_by_type,
    } = report;

    let serializable = SerializableReport {
        interrupted: *interrupted,
        num_failures_by_type,
        path_delimiter: Report::PATH_DELIMITER,
        seconds_since_epoch: *seconds_since_epoch,
        tests,
        version: Report::VERSION,
    };

    let mut serializer = serde_json::Serializer::with_formatter(
        writer,
        AsciiFormatter(PrettyFormatter::with_indent(INDENT)),
    );
    serializable.serialize(&mut serializer)?;
    Ok(())
}

/// A pretty formatter that writes every character outside printable ASCII as a `\uXXXX` escape.
///
/// Characters outside the Basic Multilingual Plane are written as a surrogate pair. serde_json
/// escapes quotes, backslashes and control characters before fragments reach this formatter.
struct AsciiFormatter<'a>(PrettyFormatter<'a>);

impl Formatter for AsciiFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (index, c) in fragment.char_indices() {
            if (' '..='~').contains(&c) {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..index])?;
            let mut units = [0; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = index + c.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

pub(crate) fn deserialize_report(reader: impl io::Read) -> Result<Report, DeserializeError> {
    let DeserializedReport {
        interrupted,
        num_failures_by_type,
        path_delimiter,
        seconds_since_epoch,
        tests,
        version,
    } = serde_json::from_reader(reader)?;

    if version != Report::VERSION {
        return Err(DeserializeError::UnsupportedVersion {
            version,
            expected: Report::VERSION,
        });
    }
    if path_delimiter != Report::PATH_DELIMITER {
        return Err(DeserializeError::UnsupportedPathDelimiter {
            delimiter: path_delimiter,
            expected: Report::PATH_DELIMITER,
        });
    }

    Ok(Report {
        tests,
        seconds_since_epoch,
        interrupted,
        num_failures_by_type,
    })
}
