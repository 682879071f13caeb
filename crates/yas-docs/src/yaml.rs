//! Block-style YAML emitter with explicit per-value quoting.
//!
//! `serde_yaml` decides scalar styles on its own, so normalized documents are
//! written through this small emitter instead: a [`Node::Quoted`] value is
//! always single-quoted, a [`Node::Plain`] value is written bare unless a
//! YAML 1.1 reader could take it for something other than a string.
//! Sequences nested in a mapping are indented under their key.

use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::{Mapping, Number, Value};

/// Scalars a YAML 1.1 resolver would read as null, bool, number, date or time.
static IMPLICIT_SCALAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^(?:
            ~ | (?i:null) | (?i:y|n|yes|no|true|false|on|off)
          | [-+]?(?:[0-9][0-9_]*(?:\.[0-9_]*)?|\.[0-9_]+)(?:[eE][-+]?[0-9]+)?
          | [-+]?0(?:x[0-9a-fA-F_]+|o[0-7_]+|b[01_]+)
          | [-+]?\.(?i:inf|nan)
          | [-+]?[0-9][0-9_]*(?::[0-5]?[0-9])+(?:\.[0-9_]*)?
        )$
        | ^[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}
        ",
    )
    .expect("implicit scalar pattern is valid")
});

const INDICATORS: &[char] = &[
    '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@',
    '`',
];

/// Output tree. Mapping order is emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(Number),
    /// A string written bare when that reads back as the same string.
    Plain(String),
    /// A string that is always written quoted.
    Quoted(String),
    Seq(Vec<Node>),
    Map(Vec<(String, Node)>),
}

impl Node {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    #[must_use]
    pub fn quoted(text: impl Into<String>) -> Self {
        Self::Quoted(text.into())
    }

    /// Convert a parsed value. Tags are dropped, mapping keys become strings.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(*flag),
            Value::Number(number) => Self::Number(number.clone()),
            Value::String(text) => Self::Plain(text.clone()),
            Value::Sequence(items) => Self::Seq(items.iter().map(Self::from_value).collect()),
            Value::Mapping(mapping) => Self::from_mapping(mapping),
            Value::Tagged(tagged) => Self::from_value(&tagged.value),
        }
    }

    #[must_use]
    pub fn from_mapping(mapping: &Mapping) -> Self {
        Self::Map(
            mapping
                .iter()
                .map(|(key, value)| (key_text(key), Self::from_value(value)))
                .collect(),
        )
    }
}

/// Render `node` as a YAML document ending in exactly one newline.
#[must_use]
pub fn to_string(node: &Node) -> String {
    let mut out = String::new();
    match node {
        Node::Map(entries) if !entries.is_empty() => write_mapping(&mut out, entries, 0, false),
        Node::Seq(items) if !items.is_empty() => write_sequence(&mut out, items, 0, false),
        scalar => {
            out.push_str(&inline(scalar));
            out.push('\n');
        }
    }
    out
}

/// Text of a mapping key.
#[must_use]
pub fn key_text(key: &Value) -> String {
    scalar_text(key).unwrap_or_else(|| inline_text(key))
}

/// Text of a scalar value; `None` for null and collections.
#[must_use]
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Single-line rendering of any value, for report text.
#[must_use]
pub fn inline_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Sequence(items) => {
            let parts: Vec<String> = items.iter().map(inline_text).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Mapping(mapping) => {
            let parts: Vec<String> = mapping
                .iter()
                .map(|(key, value)| format!("{}: {}", key_text(key), inline_text(value)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        Value::Tagged(tagged) => inline_text(&tagged.value),
        scalar => scalar_text(scalar).unwrap_or_default(),
    }
}

fn write_mapping(out: &mut String, entries: &[(String, Node)], indent: usize, continuation: bool) {
    for (index, (key, value)) in entries.iter().enumerate() {
        if index > 0 || !continuation {
            pad(out, indent);
        }
        out.push_str(&string_scalar(key, false));
        out.push(':');
        match value {
            Node::Map(nested) if !nested.is_empty() => {
                out.push('\n');
                write_mapping(out, nested, indent + 2, false);
            }
            Node::Seq(items) if !items.is_empty() => {
                out.push('\n');
                write_sequence(out, items, indent + 2, false);
            }
            scalar => {
                out.push(' ');
                out.push_str(&inline(scalar));
                out.push('\n');
            }
        }
    }
}

fn write_sequence(out: &mut String, items: &[Node], indent: usize, continuation: bool) {
    for (index, item) in items.iter().enumerate() {
        if index > 0 || !continuation {
            pad(out, indent);
        }
        out.push_str("- ");
        match item {
            Node::Map(entries) if !entries.is_empty() => {
                write_mapping(out, entries, indent + 2, true);
            }
            Node::Seq(nested) if !nested.is_empty() => {
                write_sequence(out, nested, indent + 2, true);
            }
            scalar => {
                out.push_str(&inline(scalar));
                out.push('\n');
            }
        }
    }
}

fn pad(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat_n(' ', indent));
}

/// Scalars and empty collections.
fn inline(node: &Node) -> String {
    match node {
        Node::Null => "null".to_string(),
        Node::Bool(flag) => flag.to_string(),
        Node::Number(number) => number.to_string(),
        Node::Plain(text) => string_scalar(text, false),
        Node::Quoted(text) => string_scalar(text, true),
        Node::Seq(_) => "[]".to_string(),
        Node::Map(_) => "{}".to_string(),
    }
}

/// Characters only a double-quoted scalar can carry, as escapes.
fn needs_escape(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            '\u{2028}' | '\u{2029}' | '\u{feff}' | '\u{fffe}' | '\u{ffff}'
        )
}

fn string_scalar(text: &str, force_quotes: bool) -> String {
    if text.chars().any(needs_escape) {
        double_quoted(text)
    } else if force_quotes || !is_plain_safe(text) {
        format!("'{}'", text.replace('\'', "''"))
    } else {
        text.to_string()
    }
}

fn is_plain_safe(text: &str) -> bool {
    !(text.is_empty()
        || text.starts_with(INDICATORS)
        || text.starts_with(char::is_whitespace)
        || text.ends_with(char::is_whitespace)
        || text.ends_with(':')
        || text.contains(": ")
        || text.contains(" #")
        || IMPLICIT_SCALAR.is_match(text))
}

fn double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if needs_escape(c) => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("plain text", "plain text")]
    #[case("don't", "don't")]
    #[case("2025-01-01", "'2025-01-01'")]
    #[case("09:30", "'09:30'")]
    #[case("42", "'42'")]
    #[case("3.14", "'3.14'")]
    #[case("yes", "'yes'")]
    #[case("Null", "'Null'")]
    #[case("~", "'~'")]
    #[case("", "''")]
    #[case("- bullet", "'- bullet'")]
    #[case("key: value", "'key: value'")]
    #[case("trailing ", "'trailing '")]
    #[case("issue#1", "issue#1")]
    #[case("see #1 and also ", "'see #1 and also '")]
    #[case("note #tag", "'note #tag'")]
    #[case("'quoted'", "'''quoted'''")]
    #[case("line\nbreak", "\"line\\nbreak\"")]
    #[case("Überprüfung", "Überprüfung")]
    fn plain_strings_are_quoted_only_when_ambiguous(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(inline(&Node::plain(text)), expected);
    }

    #[test]
    fn quoted_node_is_always_single_quoted() {
        assert_eq!(inline(&Node::quoted("TBD")), "'TBD'");
        assert_eq!(inline(&Node::quoted("it's")), "'it''s'");
    }

    #[test]
    fn sequences_are_indented_under_their_key() {
        let node = Node::Map(vec![
            (
                "metadata".to_string(),
                Node::Map(vec![(
                    "blockers".to_string(),
                    Node::Seq(vec![Node::plain("waiting on vendor")]),
                )]),
            ),
            (
                "tasks".to_string(),
                Node::Seq(vec![Node::Map(vec![
                    ("id".to_string(), Node::plain("T-1")),
                    ("due".to_string(), Node::quoted("2025-03-01")),
                    ("tags".to_string(), Node::Seq(vec![])),
                ])]),
            ),
            ("empty".to_string(), Node::Map(vec![])),
            ("nothing".to_string(), Node::Null),
        ]);

        let expected = "\
metadata:
  blockers:
    - waiting on vendor
tasks:
  - id: T-1
    due: '2025-03-01'
    tags: []
empty: {}
nothing: null
";
        assert_eq!(to_string(&node), expected);
    }

    #[test]
    fn nested_sequences_continue_on_the_dash_line() {
        let node = Node::Seq(vec![Node::Seq(vec![Node::plain("a"), Node::plain("b")])]);
        assert_eq!(to_string(&node), "- - a\n  - b\n");
    }

    #[test]
    fn emitted_text_reads_back_as_the_same_values() {
        let node = Node::Map(vec![
            ("when".to_string(), Node::plain("2025-01-01")),
            ("count".to_string(), Node::plain("12")),
            ("flag".to_string(), Node::plain("off")),
            ("multi".to_string(), Node::plain("a\n\"b\"\\c")),
            ("list".to_string(), Node::Seq(vec![Node::plain("x: y")])),
        ]);

        let parsed: Value = serde_yaml::from_str(&to_string(&node)).expect("emitted YAML parses");
        assert_eq!(parsed["when"], Value::String("2025-01-01".to_string()));
        assert_eq!(parsed["count"], Value::String("12".to_string()));
        assert_eq!(parsed["flag"], Value::String("off".to_string()));
        assert_eq!(parsed["multi"], Value::String("a\n\"b\"\\c".to_string()));
        assert_eq!(parsed["list"][0], Value::String("x: y".to_string()));
    }

    #[rstest]
    #[case("a\u{2028}b", "\"a\\u2028b\"")]
    #[case("a\u{2029}b", "\"a\\u2029b\"")]
    #[case("a\u{85}b", "\"a\\u0085b\"")]
    #[case("\u{feff}lead", "\"\\ufefflead\"")]
    fn line_separators_are_escaped_and_read_back(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(inline(&Node::plain(text)), expected);
        assert_eq!(inline(&Node::quoted(text)), expected);

        let node = Node::Map(vec![
            (text.to_string(), Node::plain(text)),
            ("after".to_string(), Node::plain("kept")),
        ]);
        let parsed: Value = serde_yaml::from_str(&to_string(&node)).expect("emitted YAML parses");
        assert_eq!(parsed[text], Value::String(text.to_string()));
        assert_eq!(parsed["after"], Value::String("kept".to_string()));
    }

    #[test]
    fn inline_text_flattens_collections() {
        let value: Value = serde_yaml::from_str("{a: [1, two], b: null}").expect("parses");
        assert_eq!(inline_text(&value), "{a: [1, two], b: }");
    }
}
