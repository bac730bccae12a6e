//! Serde helpers shared by the variant parameter structs.
//!
//! Lesson content is written by hand and by generators that are loose about
//! JSON types: an element list may mix `"1"` and `1`, a bar value may be
//! `"$240"` or `240`. [`Label`] accepts any scalar and keeps the text the
//! page would have shown. An explicit `null` means "not given", see
//! [`without_null_fields`].

use std::fmt;

use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

/// A display label decoded from a JSON string, number or boolean.
///
/// Numbers are printed the way a browser prints them: `12`, not `12.0`.
///
/// # Examples
///
/// ```
/// use lessonviz::params::Label;
///
/// let labels: Vec<Label> = serde_json::from_str(r#"["x", 12, 2.5, true]"#).unwrap();
/// let texts: Vec<&str> = labels.iter().map(Label::as_str).collect();
/// assert_eq!(texts, vec!["x", "12", "2.5", "true"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Label(String);

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::String(text) => Ok(Self(text)),
            Value::Number(number) => Ok(Self(
                number
                    .as_f64()
                    .map(format_number)
                    .unwrap_or_else(|| number.to_string()),
            )),
            Value::Bool(flag) => Ok(Self(flag.to_string())),
            other => Err(de::Error::invalid_type(
                unexpected(&other),
                &"a string, number or boolean label",
            )),
        }
    }
}

fn unexpected(value: &Value) -> de::Unexpected<'_> {
    match value {
        Value::Null => de::Unexpected::Unit,
        Value::Array(_) => de::Unexpected::Seq,
        Value::Object(_) => de::Unexpected::Map,
        _ => de::Unexpected::Other("scalar"),
    }
}

/// Formats a number for display without a trailing `.0`.
///
/// Tiny floating point noise from repeated stepping (`0.30000000000000004`)
/// is rounded away; negative zero prints as `0`.
///
/// # Examples
///
/// ```
/// use lessonviz::params::format_number;
///
/// assert_eq!(format_number(12.0), "12");
/// assert_eq!(format_number(-2.5), "-2.5");
/// assert_eq!(format_number(0.1 + 0.2), "0.3");
/// assert_eq!(format_number(-0.0), "0");
/// ```
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let rounded = if value.abs() < 1e9 {
        (value * 1e9).round() / 1e9
    } else {
        value
    };
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

/// Returns a copy of `value` with every `null` object member removed, at any
/// depth.
///
/// Generators write `"setName": null` for fields they leave unset. With the
/// member gone the field decodes to its documented default. Array items are
/// kept as they are.
///
/// # Examples
///
/// ```
/// use lessonviz::params::without_null_fields;
/// use serde_json::json;
///
/// let value = json!({"a": null, "b": [null, {"c": null, "d": 1}]});
/// assert_eq!(without_null_fields(&value), json!({"b": [null, {"d": 1}]}));
/// ```
pub fn without_null_fields(value: &Value) -> Value {
    match value {
        Value::Object(members) => Value::Object(
            members
                .iter()
                .filter(|(_, member)| !member.is_null())
                .map(|(key, member)| (key.clone(), without_null_fields(member)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(without_null_fields).collect()),
        other => other.clone(),
    }
}

/// Replaces backslash-escaped dollar signs (`\$`, `\\$`) with a plain `$`.
///
/// Values are often copied from math-mode lesson text where currency is
/// escaped.
pub fn clean_value(value: &str) -> String {
    let mut cleaned = String::with_capacity(value.len());
    let mut pending_backslashes = 0usize;
    for ch in value.chars() {
        match ch {
            '\\' => pending_backslashes += 1,
            '$' => {
                pending_backslashes = 0;
                cleaned.push('$');
            }
            other => {
                cleaned.extend(std::iter::repeat_n('\\', pending_backslashes));
                pending_backslashes = 0;
                cleaned.push(other);
            }
        }
    }
    cleaned.extend(std::iter::repeat_n('\\', pending_backslashes));
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_scalars() {
        let labels: Vec<Label> = serde_json::from_str(r#"["a", 1, -3, 0.5, false]"#).unwrap();
        let texts: Vec<&str> = labels.iter().map(Label::as_str).collect();
        assert_eq!(texts, vec!["a", "1", "-3", "0.5", "false"]);
    }

    #[test]
    fn test_label_rejects_null_and_objects() {
        assert!(serde_json::from_str::<Label>("null").is_err());
        assert!(serde_json::from_str::<Label>(r#"{"a": 1}"#).is_err());
        assert!(serde_json::from_str::<Label>("[1]").is_err());
    }

    #[test]
    fn test_label_is_empty() {
        assert!(Label::new("  ").is_empty());
        assert!(!Label::new("0").is_empty());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(-5.0), "-5");
        assert_eq!(format_number(33.5), "33.5");
        assert_eq!(format_number(3.0 * 0.1), "0.3");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_without_null_fields() {
        let value = serde_json::json!({
            "setName": null,
            "elements": [1, null],
            "bars": [{"label": null, "segments": []}],
            "caption": "kept",
        });
        assert_eq!(
            without_null_fields(&value),
            serde_json::json!({
                "elements": [1, null],
                "bars": [{"segments": []}],
                "caption": "kept",
            })
        );
        assert_eq!(without_null_fields(&Value::Null), Value::Null);
    }

    #[test]
    fn test_clean_value() {
        assert_eq!(clean_value(r"\$240"), "$240");
        assert_eq!(clean_value(r"\\$8"), "$8");
        assert_eq!(clean_value("$80"), "$80");
        assert_eq!(clean_value(r"a\b"), r"a\b");
        assert_eq!(clean_value("40"), "40");
    }
}
