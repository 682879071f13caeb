//! Deterministic ordering of a [`TaskDocument`].
//!
//! Normalizing a document that was already normalized and written back is a
//! no-op, so a second sync pass produces byte-identical artifacts.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_yaml::{Mapping, Value};

use crate::document::{
    DATE_FORMAT, PINNED_METADATA_KEYS, STANDARD_CATEGORIES, TaskCategory, TaskDocument, TaskRecord,
};
use crate::yaml::inline_text;

/// Sort key for tasks without a due or completion date.
const UNDATED: &str = "9999-12-31";

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

pub fn normalize(document: &mut TaskDocument) {
    document.metadata = ordered_metadata(&document.metadata);
    order_categories(&mut document.categories);

    for category in &mut document.categories {
        for task in &mut category.tasks {
            normalize_dates(task);
        }
        category.tasks.sort_by_cached_key(task_sort_key);
    }

    for entry in &mut document.execution_log {
        entry.rows.sort_by_key(|row| row.timestamp);
    }
    document
        .execution_log
        .sort_by(|left, right| right.date.cmp(&left.date));
}

/// Pinned keys first, the rest in source order.
#[must_use]
pub fn ordered_metadata(metadata: &Mapping) -> Mapping {
    let mut ordered = Mapping::new();
    for key in PINNED_METADATA_KEYS {
        if let Some(value) = metadata.get(key) {
            ordered.insert(Value::String(key.to_string()), value.clone());
        }
    }
    for (key, value) in metadata {
        if !ordered.contains_key(key) {
            ordered.insert(key.clone(), value.clone());
        }
    }
    ordered
}

fn order_categories(categories: &mut Vec<TaskCategory>) {
    let mut ordered: Vec<TaskCategory> = STANDARD_CATEGORIES
        .iter()
        .map(|name| {
            categories
                .iter()
                .position(|category| category.name == *name)
                .map_or_else(
                    || TaskCategory {
                        name: (*name).to_string(),
                        tasks: Vec::new(),
                    },
                    |index| categories.remove(index),
                )
        })
        .collect();
    ordered.append(categories);
    *categories = ordered;
}

fn normalize_dates(task: &mut TaskRecord) {
    for field in [&mut task.due, &mut task.completed_on] {
        if let Some(Value::String(text)) = field {
            if let Some(date) = iso_date(text) {
                *text = date;
            }
        }
    }
}

/// ISO form of a date or date-time string, if it is one.
#[must_use]
pub fn iso_date(text: &str) -> Option<String> {
    let text = text.trim();
    let date = NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(|moment| moment.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|moment| moment.date_naive())
        })?;
    Some(date.format(DATE_FORMAT).to_string())
}

/// Id or title of a task. Numeric labels order by value and before text.
#[derive(Debug, Clone)]
enum Label {
    Number(f64),
    Text(String),
}

impl Label {
    fn of(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(number)) => number
                .as_f64()
                .map_or_else(|| Self::Text(number.to_string()), Self::Number),
            Some(Value::Tagged(tagged)) => Self::of(Some(&tagged.value)),
            Some(value) => Self::Text(inline_text(value)),
            None => Self::Text(String::new()),
        }
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(left), Self::Number(right)) => left.total_cmp(right),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
            (Self::Text(left), Self::Text(right)) => left.cmp(right),
        }
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Label {}

/// (due-or-completion date as text, id-or-title).
fn task_sort_key(task: &TaskRecord) -> (String, Label) {
    let date = first_present(&[&task.due, &task.completed_on])
        .map_or_else(|| UNDATED.to_string(), inline_text);
    let label = Label::of(first_present(&[&task.id, &task.title]));
    (date, label)
}

fn first_present<'a>(fields: &[&'a Option<Value>]) -> Option<&'a Value> {
    fields
        .iter()
        .copied()
        .filter_map(Option::as_ref)
        .find(|value| is_present(value))
}

/// Null, `false`, zero and empty values count as absent.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Sequence(items) => !items.is_empty(),
        Value::Mapping(mapping) => !mapping.is_empty(),
        Value::Tagged(tagged) => is_present(&tagged.value),
    }
}
