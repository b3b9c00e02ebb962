/*!
 * Routing-key extraction from a single JSON record
 *
 * A field path is a dot-separated list of keys (`info.chr`). A literal dot
 * inside a key is written as `\.`. When the value at a segment is an array,
 * the segment is read as a zero-based index (`calls.0.chr`).
 *
 * The record is walked with a streaming `serde` seed rather than parsed into
 * a tree: only the values along the path are materialised, everything else is
 * skipped. The first occurrence of a duplicated key wins, and bytes inside
 * skipped string values are not required to be valid UTF-8.
 *
 * Coercion: strings yield their content; numbers and booleans yield their
 * JSON text (`1`, `2.5`, `true`); objects and arrays yield compact JSON;
 * `null` is treated as absent.
 */

use std::fmt;

use serde::de::{self, DeserializeSeed, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;

/// Parsed field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a dotted path, honouring `\.` escapes
    pub fn parse(path: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = path.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '\\' if chars.peek() == Some(&'.') => {
                    current.push('.');
                    chars.next();
                }
                '.' => segments.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
        segments.push(current);

        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

/// Extract the routing key of `record` at `path`.
///
/// Returns `None` when the record is not well-formed JSON, the path does not
/// resolve, or the value is `null`.
pub fn extract(record: &[u8], path: &FieldPath) -> Option<String> {
    let mut de = serde_json::Deserializer::from_slice(record);
    let value = PathSeed(&path.segments).deserialize(&mut de).ok()?;
    de.end().ok()?;
    value.as_ref().and_then(value_to_key)
}

fn value_to_key(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Resolves the remaining segments against the next value in the stream
struct PathSeed<'p>(&'p [String]);

impl<'de> DeserializeSeed<'de> for PathSeed<'_> {
    type Value = Option<Value>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        match self.0.split_first() {
            None => Value::deserialize(deserializer).map(Some),
            Some((segment, rest)) => deserializer.deserialize_any(SegmentVisitor { segment, rest }),
        }
    }
}

struct SegmentVisitor<'p> {
    segment: &'p str,
    rest: &'p [String],
}

impl<'de> Visitor<'de> for SegmentVisitor<'_> {
    type Value = Option<Value>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut found = None;
        let mut matched = false;

        while let Some(is_segment) = map.next_key_seed(KeyMatch(self.segment))? {
            if is_segment && !matched {
                matched = true;
                found = map.next_value_seed(PathSeed(self.rest))?;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }

        Ok(found)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let index = self.segment.parse::<usize>().ok();
        let mut found = None;
        let mut position = 0usize;

        loop {
            if index == Some(position) {
                match seq.next_element_seed(PathSeed(self.rest))? {
                    Some(value) => found = value,
                    None => break,
                }
            } else if seq.next_element::<IgnoredAny>()?.is_none() {
                break;
            }
            position += 1;
        }

        Ok(found)
    }

    // Scalars have no children to descend into
    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }
}

/// Compares an object key against one path segment without allocating
struct KeyMatch<'p>(&'p str);

impl<'de> DeserializeSeed<'de> for KeyMatch<'_> {
    type Value = bool;

    fn deserialize<D>(self, deserializer: D) -> Result<bool, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_str(self)
    }
}

impl<'de> Visitor<'de> for KeyMatch<'_> {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object key")
    }

    fn visit_str<E: de::Error>(self, key: &str) -> Result<bool, E> {
        Ok(key == self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(record: &str, path: &str) -> Option<String> {
        extract(record.as_bytes(), &FieldPath::parse(path))
    }

    #[test]
    fn test_top_level_string() {
        assert_eq!(key(r#"{"chr":"chr1","v":1}"#, "chr"), Some("chr1".to_string()));
    }

    #[test]
    fn test_missing_field() {
        assert_eq!(key(r#"{"other":"x"}"#, "chr"), None);
    }

    #[test]
    fn test_malformed_json_is_not_found() {
        assert_eq!(key(r#"{"chr":"chr1""#, "chr"), None);
        assert_eq!(key("not json at all", "chr"), None);
        assert_eq!(key("", "chr"), None);
    }

    #[test]
    fn test_top_level_not_object() {
        assert_eq!(key(r#"["chr1"]"#, "chr"), None);
        assert_eq!(key(r#""chr1""#, "chr"), None);
    }

    #[test]
    fn test_nested_path() {
        let record = r#"{"locus":{"chr":"chrX","pos":100}}"#;
        assert_eq!(key(record, "locus.chr"), Some("chrX".to_string()));
        assert_eq!(key(record, "locus.missing"), None);
        assert_eq!(key(record, "locus.chr.deeper"), None);
    }

    #[test]
    fn test_array_index() {
        let record = r#"{"calls":[{"chr":"chr2"},{"chr":"chr3"}]}"#;
        assert_eq!(key(record, "calls.1.chr"), Some("chr3".to_string()));
        assert_eq!(key(record, "calls.5.chr"), None);
        assert_eq!(key(record, "calls.x.chr"), None);
    }

    #[test]
    fn test_escaped_dot_in_key() {
        let record = r#"{"a.b":"dotted","a":{"b":"nested"}}"#;
        assert_eq!(key(record, r"a\.b"), Some("dotted".to_string()));
        assert_eq!(key(record, "a.b"), Some("nested".to_string()));
    }

    #[test]
    fn test_non_string_coercion() {
        assert_eq!(key(r#"{"chr":1}"#, "chr"), Some("1".to_string()));
        assert_eq!(key(r#"{"chr":2.5}"#, "chr"), Some("2.5".to_string()));
        assert_eq!(key(r#"{"chr":true}"#, "chr"), Some("true".to_string()));
        assert_eq!(key(r#"{"chr":{"a":1}}"#, "chr"), Some(r#"{"a":1}"#.to_string()));
        assert_eq!(key(r#"{"chr":null}"#, "chr"), None);
    }

    #[test]
    fn test_parse_segments() {
        assert_eq!(FieldPath::parse("chr").segments(), &["chr"]);
        assert_eq!(FieldPath::parse("a.b.c").segments(), &["a", "b", "c"]);
        assert_eq!(FieldPath::parse(r"a\.b.c").segments(), &["a.b", "c"]);
    }

    #[test]
    fn test_duplicate_key_first_occurrence_wins() {
        assert_eq!(key(r#"{"chr":"chr1","chr":"chr2"}"#, "chr"), Some("chr1".to_string()));

        let record = r#"{"locus":{"chr":"chr3"},"locus":{"chr":"chr4"}}"#;
        assert_eq!(key(record, "locus.chr"), Some("chr3".to_string()));

        // The first occurrence decides even when it does not resolve
        assert_eq!(key(r#"{"a":1,"a":{"b":"x"}}"#, "a.b"), None);
    }

    #[test]
    fn test_invalid_utf8_outside_the_path_is_skipped() {
        let path = FieldPath::parse("chr");
        let record = b"{\"note\":\"\xff\xfe\",\"chr\":\"chr1\"}";
        assert_eq!(extract(record, &path), Some("chr1".to_string()));

        // Invalid bytes in the routing value itself are not a usable key
        assert_eq!(extract(b"{\"chr\":\"chr1\xff\"}", &path), None);
    }

    #[test]
    fn test_trailing_garbage_is_not_found() {
        assert_eq!(key(r#"{"chr":"chr1"} extra"#, "chr"), None);
        assert_eq!(key(r#"{"chr":"chr1"}{"chr":"chr2"}"#, "chr"), None);
        assert_eq!(key("{\"chr\":\"chr1\"}  ", "chr"), Some("chr1".to_string()));
    }
}
