//! SQL type normalization.
//!
//! Maps a declared column type (`varchar(255)`, `bigint(20) unsigned`,
//! `decimal(10,2)`, ...) to a [`SemanticType`] that is independent of any
//! host language. Keyword matching is ordered: the first rule that fits wins,
//! so `tinyint(1)` is a flag before it is an integer and `timestamp` is a
//! point in time before `time` could claim it as a duration.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static NOT_NULL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bnot\s+null\b").expect("NOT NULL pattern is valid"));

const QUALIFIERS: [&str; 3] = ["unsigned", "signed", "zerofill"];

/// Abstract data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SemanticType {
    Boolean,
    Int16,
    Int32,
    Int64,
    Decimal {
        precision: Option<u32>,
        scale: Option<u32>,
    },
    Double,
    DateTime,
    Duration,
    Bytes,
    String {
        max_length: Option<u32>,
    },
}

impl SemanticType {
    /// C# type name, without any nullability marker.
    #[must_use]
    pub const fn csharp_type(self) -> &'static str {
        match self {
            Self::Boolean => "bool",
            Self::Int16 => "short",
            Self::Int32 => "int",
            Self::Int64 => "long",
            Self::Decimal { .. } => "decimal",
            Self::Double => "double",
            Self::DateTime => "DateTime",
            Self::Duration => "TimeSpan",
            Self::Bytes => "byte[]",
            Self::String { .. } => "string",
        }
    }

    #[must_use]
    pub const fn is_decimal(self) -> bool {
        matches!(self, Self::Decimal { .. })
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => f.write_str("boolean"),
            Self::Int16 => f.write_str("int16"),
            Self::Int32 => f.write_str("int32"),
            Self::Int64 => f.write_str("int64"),
            Self::Decimal {
                precision: Some(precision),
                scale: Some(scale),
            } => write!(f, "decimal({precision},{scale})"),
            Self::Decimal { .. } => f.write_str("decimal"),
            Self::Double => f.write_str("double"),
            Self::DateTime => f.write_str("date_time"),
            Self::Duration => f.write_str("duration"),
            Self::Bytes => f.write_str("bytes"),
            Self::String {
                max_length: Some(length),
            } => write!(f, "string({length})"),
            Self::String { max_length: None } => f.write_str("string"),
        }
    }
}

/// Parenthesized suffix of a declared type.
#[derive(Debug, Default, PartialEq, Eq)]
struct TypeArguments {
    length: Option<u32>,
    precision: Option<(u32, u32)>,
}

/// Normalize a declared SQL type into its semantic type.
#[must_use]
pub fn normalize_type(raw: &str) -> SemanticType {
    let lowered = raw.trim().to_ascii_lowercase();
    let (base, arguments) = split_arguments(&lowered);
    let keyword = base_keyword(base);

    if keyword == "bool"
        || keyword == "boolean"
        || (keyword == "tinyint" && arguments.length == Some(1))
    {
        SemanticType::Boolean
    } else if keyword.contains("bigint") {
        SemanticType::Int64
    } else if keyword.starts_with("int") {
        SemanticType::Int32
    } else if keyword.starts_with("smallint") {
        SemanticType::Int16
    } else if keyword.starts_with("decimal") || keyword.starts_with("numeric") {
        let (precision, scale) = arguments
            .precision
            .map_or((None, None), |(p, s)| (Some(p), Some(s)));
        SemanticType::Decimal { precision, scale }
    } else if ["double", "float", "real"]
        .iter()
        .any(|prefix| keyword.starts_with(prefix))
    {
        SemanticType::Double
    } else if ["datetime", "timestamp", "date"]
        .iter()
        .any(|prefix| keyword.starts_with(prefix))
    {
        SemanticType::DateTime
    } else if keyword.starts_with("time") {
        SemanticType::Duration
    } else if keyword.contains("blob") || keyword.contains("binary") {
        SemanticType::Bytes
    } else if keyword == "tinyint" {
        SemanticType::Int16
    } else if keyword == "mediumint" {
        SemanticType::Int32
    } else {
        SemanticType::String {
            max_length: arguments.length.filter(|length| *length > 0),
        }
    }
}

/// A column is nullable unless its declaration carries `NOT NULL`.
#[must_use]
pub fn is_nullable(declaration: &str) -> bool {
    !NOT_NULL.is_match(declaration)
}

fn split_arguments(lowered: &str) -> (&str, TypeArguments) {
    let Some(open) = lowered.find('(') else {
        return (lowered, TypeArguments::default());
    };

    let rest = &lowered[open + 1..];
    let inner = rest.split(')').next().unwrap_or_default();
    (&lowered[..open], parse_arguments(inner))
}

fn parse_arguments(inner: &str) -> TypeArguments {
    if inner.contains(',') {
        let parts = inner
            .split(',')
            .map(|part| part.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>();
        let precision = match parts.as_deref() {
            Ok([precision, scale]) => Some((*precision, *scale)),
            _ => None,
        };
        TypeArguments {
            length: None,
            precision,
        }
    } else {
        TypeArguments {
            length: inner.trim().parse().ok(),
            precision: None,
        }
    }
}

/// First word of the type text once `unsigned`/`signed`/`zerofill` are removed.
fn base_keyword(base: &str) -> &str {
    base.split_whitespace()
        .find(|token| !QUALIFIERS.contains(token))
        .unwrap_or_default()
}
