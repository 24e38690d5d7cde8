// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::merge::{MergeValue, Scalar};
use crate::errors::ConvertError;
use indexmap::IndexMap;
use results_metadata::Tag;
use serde_json::Value;

/// The key of the tag holding the shard an invocation ran on.
pub const SHARD_TAG: &str = "shard";

/// Tags for a single invocation, keyed by name.
///
/// If a key is repeated, the first occurrence wins and later ones are ignored.
#[derive(Clone, Debug)]
pub(super) struct TagTable<'a> {
    first: IndexMap<&'a str, &'a Value>,
}

impl<'a> TagTable<'a> {
    pub(super) fn new(tags: &'a [Tag]) -> Self {
        let mut first = IndexMap::with_capacity(tags.len());
        for tag in tags {
            first.entry(tag.key.as_str()).or_insert(&tag.value);
        }
        Self { first }
    }

    pub(super) fn get(&self, key: &str) -> Option<&'a Value> {
        self.first.get(key).copied()
    }

    /// Returns the shard as a value ready to be merged.
    ///
    /// A missing shard tag is `Null`. Strings and numbers must hold a non-negative integer that
    /// fits in 32 bits. Arrays and objects are passed through for the merge step to reject.
    pub(super) fn shard(&self, test_path: &str) -> Result<MergeValue, ConvertError> {
        let invalid = |value: &Value| ConvertError::InvalidShard {
            test_path: test_path.to_owned(),
            value: value.to_string(),
        };

        let Some(value) = self.get(SHARD_TAG) else {
            return Ok(MergeValue::Scalar(Scalar::Null));
        };
        let shard = match value {
            Value::Null => return Ok(MergeValue::Scalar(Scalar::Null)),
            Value::String(s) => s.trim().parse::<u32>().map_err(|_| invalid(value))?,
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| invalid(value))?,
            Value::Bool(_) => return Err(invalid(value)),
            Value::Array(_) | Value::Object(_) => return Ok(MergeValue::from_json(value)),
        };

        Ok(MergeValue::Scalar(Scalar::Int(u64::from(shard))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn first_tag_wins() {
        let tags = vec![
            Tag::new("story_tag", "a"),
            Tag::new("shard", "2"),
            Tag::new("story_tag", "b"),
            Tag::new("shard", "5"),
        ];
        let table = TagTable::new(&tags);
        assert_eq!(table.get("story_tag"), Some(&json!("a")));
        assert_eq!(table.get("missing"), None);
        assert_eq!(
            table.shard("suite/case").expect("shard is valid"),
            MergeValue::Scalar(Scalar::Int(2))
        );
    }

    #[test_case(json!("3"), 3; "string")]
    #[test_case(json!(" 7 "), 7; "string with whitespace")]
    #[test_case(json!(4), 4; "integer")]
    fn parses_shards(value: Value, expected: u64) {
        let tags = vec![Tag::new("shard", value)];
        assert_eq!(
            TagTable::new(&tags).shard("suite/case").expect("shard is valid"),
            MergeValue::Scalar(Scalar::Int(expected))
        );
    }

    #[test]
    fn missing_or_null_shard_is_null() {
        assert_eq!(
            TagTable::new(&[]).shard("suite/case").expect("no shard is fine"),
            MergeValue::Scalar(Scalar::Null)
        );
        let tags = vec![Tag::new("shard", Value::Null)];
        assert_eq!(
            TagTable::new(&tags).shard("suite/case").expect("null shard is fine"),
            MergeValue::Scalar(Scalar::Null)
        );
    }

    #[test_case(json!("three"); "word")]
    #[test_case(json!("-1"); "negative string")]
    #[test_case(json!(-1); "negative number")]
    #[test_case(json!(1.5); "float")]
    #[test_case(json!(true); "bool")]
    #[test_case(json!("4294967296"); "out of range")]
    fn rejects_invalid_shards(value: Value) {
        let tags = vec![Tag::new("shard", value)];
        let error = TagTable::new(&tags)
            .shard("suite/case")
            .expect_err("shard is invalid");
        assert!(
            matches!(&error, ConvertError::InvalidShard { test_path, .. } if test_path == "suite/case"),
            "unexpected error: {error:?}"
        );
    }

    #[test]
    fn compound_shards_are_left_to_merge() {
        let tags = vec![Tag::new("shard", json!(["1"]))];
        assert!(matches!(
            TagTable::new(&tags).shard("suite/case"),
            Ok(MergeValue::Sequence(_))
        ));
    }
}
