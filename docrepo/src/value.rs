//! Helpers for navigating and comparing BSON values.
//!
//! Field names may address nested documents with a `.` separator
//! (`"address.city"`). Comparison follows the store's loose numeric
//! semantics: integers and doubles compare by numeric value, values of
//! unrelated types do not compare at all.

use std::cmp::Ordering;

use bson::{Bson, Document};

const PATH_SEPARATOR: char = '.';

/// Looks up a (possibly nested) field in a document.
pub(crate) fn path_get<'a>(document: &'a Document, field: &str) -> Option<&'a Bson> {
    match field.split_once(PATH_SEPARATOR) {
        None => document.get(field),
        Some((head, rest)) => match document.get(head) {
            Some(Bson::Document(inner)) => path_get(inner, rest),
            _ => None,
        },
    }
}

/// Sets a (possibly nested) field, creating intermediate documents as needed.
pub(crate) fn path_set(document: &mut Document, field: &str, value: Bson) {
    match field.split_once(PATH_SEPARATOR) {
        None => {
            document.insert(field, value);
        }
        Some((head, rest)) => {
            if !matches!(document.get(head), Some(Bson::Document(_))) {
                document.insert(head, Document::new());
            }
            if let Some(Bson::Document(inner)) = document.get_mut(head) {
                path_set(inner, rest, value);
            }
        }
    }
}

/// Removes a (possibly nested) field. Returns the removed value, if any.
pub(crate) fn path_remove(document: &mut Document, field: &str) -> Option<Bson> {
    match field.split_once(PATH_SEPARATOR) {
        None => document.remove(field),
        Some((head, rest)) => match document.get_mut(head) {
            Some(Bson::Document(inner)) => path_remove(inner, rest),
            _ => None,
        },
    }
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(*v as f64),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

/// Equality with cross-type numeric comparison, as the store evaluates it.
pub(crate) fn value_eq(left: &Bson, right: &Bson) -> bool {
    if let (Some(a), Some(b)) = (as_f64(left), as_f64(right)) {
        return a == b;
    }
    left == right
}

/// Orders two values, or `None` when they are not comparable.
pub(crate) fn value_cmp(left: &Bson, right: &Bson) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (as_f64(left), as_f64(right)) {
        return a.partial_cmp(&b);
    }
    match (left, right) {
        (Bson::String(a), Bson::String(b)) => Some(a.cmp(b)),
        (Bson::Boolean(a), Bson::Boolean(b)) => Some(a.cmp(b)),
        (Bson::DateTime(a), Bson::DateTime(b)) => Some(a.cmp(b)),
        (Bson::ObjectId(a), Bson::ObjectId(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
