use bson::{Bson, Document};

use crate::errors::{Error, Result};
use crate::value::{path_get, value_cmp, value_eq};

/// A filter expression over documents, represented as data.
///
/// # Purpose
/// Describes which documents an operation applies to without committing to
/// any particular store. Each backend interprets the tree natively: the
/// in-memory store evaluates it with [`Filter::matches`], the MongoDB
/// adapter translates it into operator documents.
///
/// # Characteristics
/// - Plain value type: cloneable, comparable, buildable without a store
/// - Composable through [`Filter::and`], [`Filter::or`], [`Filter::not`]
/// - Missing fields behave as the store does: `eq(null)` matches an absent
///   field, comparisons never do
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document.
    All,
    /// Matches documents satisfying all inner filters.
    And(Vec<Filter>),
    /// Matches documents satisfying at least one inner filter.
    Or(Vec<Filter>),
    /// Matches documents not satisfying the inner filter.
    Not(Box<Filter>),
    /// Field equals value.
    Eq { field: String, value: Bson },
    /// Field differs from value (also matches absent fields).
    Ne { field: String, value: Bson },
    /// Field is greater than value.
    Gt { field: String, value: Bson },
    /// Field is greater than or equal to value.
    Gte { field: String, value: Bson },
    /// Field is less than value.
    Lt { field: String, value: Bson },
    /// Field is less than or equal to value.
    Lte { field: String, value: Bson },
    /// Field equals one of the listed values.
    In { field: String, values: Vec<Bson> },
    /// Field equals none of the listed values (also matches absent fields).
    NotIn { field: String, values: Vec<Bson> },
    /// Field is present (or absent, when `exists` is false).
    Exists { field: String, exists: bool },
    /// Field is a string matching the regex pattern.
    Regex { field: String, pattern: String },
}

impl Filter {
    /// Combines this filter with another using logical AND.
    pub fn and(self, other: Filter) -> Filter {
        match self {
            Filter::And(mut filters) => {
                filters.push(other);
                Filter::And(filters)
            }
            _ => Filter::And(vec![self, other]),
        }
    }

    /// Combines this filter with another using logical OR.
    pub fn or(self, other: Filter) -> Filter {
        match self {
            Filter::Or(mut filters) => {
                filters.push(other);
                Filter::Or(filters)
            }
            _ => Filter::Or(vec![self, other]),
        }
    }

    /// Negates this filter.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Filter {
        Filter::Not(Box::new(self))
    }

    /// Evaluates the filter against a document.
    ///
    /// This is the in-memory interpreter; store adapters translate the tree
    /// into their own query language instead of calling this.
    ///
    /// # Errors
    /// Fails only on malformed filter input, e.g. an invalid regex pattern.
    pub fn matches(&self, document: &Document) -> Result<bool> {
        match self {
            Filter::All => Ok(true),
            Filter::And(filters) => {
                for filter in filters {
                    if !filter.matches(document)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Filter::Or(filters) => {
                for filter in filters {
                    if filter.matches(document)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Filter::Not(filter) => Ok(!filter.matches(document)?),
            Filter::Eq { field, value } => Ok(eq_matches(document, field, value)),
            Filter::Ne { field, value } => Ok(!eq_matches(document, field, value)),
            Filter::Gt { field, value } => Ok(cmp_matches(document, field, value, |o| o.is_gt())),
            Filter::Gte { field, value } => Ok(cmp_matches(document, field, value, |o| o.is_ge())),
            Filter::Lt { field, value } => Ok(cmp_matches(document, field, value, |o| o.is_lt())),
            Filter::Lte { field, value } => Ok(cmp_matches(document, field, value, |o| o.is_le())),
            Filter::In { field, values } => Ok(in_matches(document, field, values)),
            Filter::NotIn { field, values } => Ok(!in_matches(document, field, values)),
            Filter::Exists { field, exists } => Ok(path_get(document, field).is_some() == *exists),
            Filter::Regex { field, pattern } => regex_matches(document, field, pattern),
        }
    }

    /// Collects the equality constraints of the filter, used to seed
    /// upserted documents.
    pub(crate) fn equality_fields(&self, out: &mut Document) {
        match self {
            Filter::Eq { field, value } => {
                crate::value::path_set(out, field, value.clone());
            }
            Filter::And(filters) => {
                for filter in filters {
                    filter.equality_fields(out);
                }
            }
            _ => {}
        }
    }
}

fn eq_matches(document: &Document, field: &str, value: &Bson) -> bool {
    match path_get(document, field) {
        Some(actual) => value_eq(actual, value),
        None => matches!(value, Bson::Null),
    }
}

fn cmp_matches(
    document: &Document,
    field: &str,
    value: &Bson,
    accept: fn(std::cmp::Ordering) -> bool,
) -> bool {
    match path_get(document, field) {
        Some(actual) => value_cmp(actual, value).is_some_and(accept),
        None => false,
    }
}

fn in_matches(document: &Document, field: &str, values: &[Bson]) -> bool {
    match path_get(document, field) {
        Some(actual) => values.iter().any(|value| value_eq(actual, value)),
        None => false,
    }
}

fn regex_matches(document: &Document, field: &str, pattern: &str) -> Result<bool> {
    let regex = regex::Regex::new(pattern).map_err(|e| {
        log::error!("Invalid regex pattern in filter: {}", e);
        Error::Filter(format!("invalid regex pattern: {}", e))
    })?;
    match path_get(document, field) {
        Some(Bson::String(actual)) => Ok(regex.is_match(actual)),
        _ => Ok(false),
    }
}
