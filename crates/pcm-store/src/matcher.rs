use std::cmp::Ordering;

use bson::{Bson, Document};
use regex::Regex;

/// Evaluate a predicate document against a record.
///
/// Supports the dialect the query builder emits plus logical composition:
/// `$eq $ne $in $nin $gt $gte $lt $lte $regex` under field keys, `$and`/`$or`
/// at any level, dotted-path field access, and implicit equality for bare
/// values. Equality against an array field matches on containment.
pub fn matches(filter: &Document, record: &Document) -> bool {
    filter.iter().all(|(key, condition)| match key.as_str() {
        "$and" => logical_children(condition)
            .iter()
            .all(|sub| matches(sub, record)),
        "$or" => logical_children(condition)
            .iter()
            .any(|sub| matches(sub, record)),
        field => field_matches(record, field, condition),
    })
}

fn logical_children(condition: &Bson) -> Vec<&Document> {
    match condition {
        Bson::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Bson::Document(doc) => Some(doc),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn field_matches(record: &Document, path: &str, condition: &Bson) -> bool {
    let value = lookup(record, path);
    match condition {
        Bson::Document(ops) if ops.keys().any(|k| k.starts_with('$')) => ops
            .iter()
            .all(|(op, operand)| apply_operator(op, value, operand)),
        other => equals(value, other),
    }
}

/// Walk a dotted path through nested documents.
fn lookup<'a>(record: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let mut current = record.get(segments.next()?)?;
    for segment in segments {
        match current {
            Bson::Document(doc) => current = doc.get(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

fn apply_operator(op: &str, value: Option<&Bson>, operand: &Bson) -> bool {
    match op {
        "$eq" => equals(value, operand),
        "$ne" => !equals(value, operand),
        "$in" => match operand {
            Bson::Array(candidates) => candidates.iter().any(|c| equals(value, c)),
            _ => false,
        },
        "$nin" => match operand {
            Bson::Array(candidates) => !candidates.iter().any(|c| equals(value, c)),
            _ => false,
        },
        "$gt" => compare(value, operand).is_some_and(|o| o == Ordering::Greater),
        "$gte" => compare(value, operand).is_some_and(|o| o != Ordering::Less),
        "$lt" => compare(value, operand).is_some_and(|o| o == Ordering::Less),
        "$lte" => compare(value, operand).is_some_and(|o| o != Ordering::Greater),
        "$regex" => regex_matches(value, operand),
        _ => false,
    }
}

/// Equality with array containment: a stored array matches when any of its
/// elements equals the operand.
fn equals(value: Option<&Bson>, operand: &Bson) -> bool {
    match value {
        None => matches!(operand, Bson::Null),
        Some(Bson::Array(items)) if !matches!(operand, Bson::Array(_)) => {
            items.iter().any(|item| item == operand)
        }
        Some(v) => v == operand,
    }
}

fn compare(value: Option<&Bson>, operand: &Bson) -> Option<Ordering> {
    match (value?, operand) {
        (Bson::String(a), Bson::String(b)) => Some(a.cmp(b)),
        (Bson::DateTime(a), Bson::DateTime(b)) => Some(a.cmp(b)),
        (a, b) => {
            let a = numeric(a)?;
            let b = numeric(b)?;
            a.partial_cmp(&b)
        }
    }
}

fn numeric(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

fn regex_matches(value: Option<&Bson>, operand: &Bson) -> bool {
    let (Some(Bson::String(haystack)), Bson::String(pattern)) = (value, operand) else {
        return false;
    };
    Regex::new(pattern).is_ok_and(|re| re.is_match(haystack))
}
