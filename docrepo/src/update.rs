//! Neutral update specifications.
//!
//! Updates are described as data, a list of field operations, instead of a
//! store-specific update-definition type. Each backend translates the
//! operations at its boundary: the MongoDB adapter renders
//! `$set`/`$unset`/... documents, the in-memory store applies them directly.

use bson::{Bson, Document};

use crate::errors::{Error, Result};
use crate::value::{path_get, path_remove, path_set};

/// A single field-level mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    /// Sets the field to the value, creating it if absent.
    Set { field: String, value: Bson },
    /// Removes the field.
    Unset { field: String },
    /// Increments a numeric field by the given amount (absent counts as 0).
    Inc { field: String, by: Bson },
    /// Multiplies a numeric field by the given factor (absent counts as 0).
    Mul { field: String, by: Bson },
    /// Renames the field.
    Rename { field: String, to: String },
    /// Appends the value to an array field, creating the array if absent.
    Push { field: String, value: Bson },
    /// Removes all occurrences of the value from an array field.
    Pull { field: String, value: Bson },
    /// Appends the value to an array field unless it is already present.
    AddToSet { field: String, value: Bson },
}

/// An update specification: an ordered list of field operations.
///
/// # Usage
/// ```ignore
/// use docrepo::Update;
///
/// let update = Update::new()
///     .set("title", "New title")
///     .inc("revision", 1)
///     .unset("draft");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Update {
    ops: Vec<FieldOp>,
}

impl Update {
    /// Creates an empty update specification.
    pub fn new() -> Self {
        Update { ops: Vec::new() }
    }

    /// Sets a field to a value.
    pub fn set<T: Into<Bson>>(mut self, field: &str, value: T) -> Self {
        self.ops.push(FieldOp::Set {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    /// Removes a field.
    pub fn unset(mut self, field: &str) -> Self {
        self.ops.push(FieldOp::Unset {
            field: field.to_string(),
        });
        self
    }

    /// Increments a numeric field.
    pub fn inc<T: Into<Bson>>(mut self, field: &str, by: T) -> Self {
        self.ops.push(FieldOp::Inc {
            field: field.to_string(),
            by: by.into(),
        });
        self
    }

    /// Multiplies a numeric field.
    pub fn mul<T: Into<Bson>>(mut self, field: &str, by: T) -> Self {
        self.ops.push(FieldOp::Mul {
            field: field.to_string(),
            by: by.into(),
        });
        self
    }

    /// Renames a field.
    pub fn rename(mut self, field: &str, to: &str) -> Self {
        self.ops.push(FieldOp::Rename {
            field: field.to_string(),
            to: to.to_string(),
        });
        self
    }

    /// Appends a value to an array field.
    pub fn push<T: Into<Bson>>(mut self, field: &str, value: T) -> Self {
        self.ops.push(FieldOp::Push {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    /// Removes all occurrences of a value from an array field.
    pub fn pull<T: Into<Bson>>(mut self, field: &str, value: T) -> Self {
        self.ops.push(FieldOp::Pull {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    /// Appends a value to an array field unless already present.
    pub fn add_to_set<T: Into<Bson>>(mut self, field: &str, value: T) -> Self {
        self.ops.push(FieldOp::AddToSet {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    /// Returns the field operations in application order.
    pub fn ops(&self) -> &[FieldOp] {
        &self.ops
    }

    /// Returns whether the specification contains no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Applies the operations to a document in place.
    ///
    /// This is the in-memory interpreter; store adapters translate the
    /// operations into their own update language instead of calling this.
    pub fn apply(&self, document: &mut Document) -> Result<()> {
        for op in &self.ops {
            apply_op(op, document)?;
        }
        Ok(())
    }
}

fn apply_op(op: &FieldOp, document: &mut Document) -> Result<()> {
    match op {
        FieldOp::Set { field, value } => {
            path_set(document, field, value.clone());
        }
        FieldOp::Unset { field } => {
            path_remove(document, field);
        }
        FieldOp::Inc { field, by } => {
            let current = path_get(document, field).cloned().unwrap_or(Bson::Int32(0));
            path_set(document, field, numeric_op(field, &current, by, |a, b| a + b)?);
        }
        FieldOp::Mul { field, by } => {
            let current = path_get(document, field).cloned().unwrap_or(Bson::Int32(0));
            path_set(document, field, numeric_op(field, &current, by, |a, b| a * b)?);
        }
        FieldOp::Rename { field, to } => {
            if let Some(value) = path_remove(document, field) {
                path_set(document, to, value);
            }
        }
        FieldOp::Push { field, value } => {
            let mut array = take_array(document, field)?;
            array.push(value.clone());
            path_set(document, field, Bson::Array(array));
        }
        FieldOp::Pull { field, value } => {
            let mut array = take_array(document, field)?;
            array.retain(|item| item != value);
            path_set(document, field, Bson::Array(array));
        }
        FieldOp::AddToSet { field, value } => {
            let mut array = take_array(document, field)?;
            if !array.contains(value) {
                array.push(value.clone());
            }
            path_set(document, field, Bson::Array(array));
        }
    }
    Ok(())
}

fn numeric_op(field: &str, current: &Bson, operand: &Bson, f: fn(f64, f64) -> f64) -> Result<Bson> {
    // Integer operands on integer fields stay integers, anything else
    // widens to a double, matching the store's arithmetic.
    match (current, operand) {
        (Bson::Int32(a), Bson::Int32(b)) => Ok(Bson::Int32(f(*a as f64, *b as f64) as i32)),
        (Bson::Int32(a), Bson::Int64(b)) | (Bson::Int64(b), Bson::Int32(a)) => {
            Ok(Bson::Int64(f(*a as f64, *b as f64) as i64))
        }
        (Bson::Int64(a), Bson::Int64(b)) => Ok(Bson::Int64(f(*a as f64, *b as f64) as i64)),
        (a, b) => match (as_double(a), as_double(b)) {
            (Some(a), Some(b)) => Ok(Bson::Double(f(a, b))),
            _ => {
                log::error!("Non-numeric value in arithmetic update on field {}", field);
                Err(Error::Update(format!(
                    "cannot apply arithmetic update to non-numeric field {}",
                    field
                )))
            }
        },
    }
}

fn as_double(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(*v as f64),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

fn take_array(document: &mut Document, field: &str) -> Result<Vec<Bson>> {
    match path_remove(document, field) {
        None => Ok(Vec::new()),
        Some(Bson::Array(array)) => Ok(array),
        Some(other) => {
            // put it back so a failed update leaves the document untouched
            path_set(document, field, other);
            log::error!("Array update on non-array field {}", field);
            Err(Error::Update(format!(
                "cannot apply array update to non-array field {}",
                field
            )))
        }
    }
}
