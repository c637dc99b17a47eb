use bson::oid::ObjectId;
use bson::Bson;

use super::Filter;

/// Creates a fluent filter builder for the specified field name.
///
/// Nested fields are addressed with a `.` separator, e.g.
/// `field("address.city")`.
pub fn field(field_name: &str) -> FluentFilter {
    FluentFilter {
        field_name: field_name.to_string(),
    }
}

/// Creates a filter that matches every document in the collection.
pub fn all() -> Filter {
    Filter::All
}

/// Creates a filter matching the document with the given identifier.
pub fn by_id(id: ObjectId) -> Filter {
    Filter::Eq {
        field: "_id".to_string(),
        value: Bson::ObjectId(id),
    }
}

/// Combines filters using logical AND.
pub fn and(filters: Vec<Filter>) -> Filter {
    Filter::And(filters)
}

/// Combines filters using logical OR.
pub fn or(filters: Vec<Filter>) -> Filter {
    Filter::Or(filters)
}

/// Negates a filter.
pub fn not(filter: Filter) -> Filter {
    Filter::Not(Box::new(filter))
}

/// A fluent builder for constructing filters on a specific field.
///
/// Each method consumes the builder and returns a [`Filter`] that can be
/// passed to repository operations or combined with other filters.
pub struct FluentFilter {
    field_name: String,
}

impl FluentFilter {
    /// Field equals the specified value.
    #[inline]
    pub fn eq<T: Into<Bson>>(self, value: T) -> Filter {
        Filter::Eq {
            field: self.field_name,
            value: value.into(),
        }
    }

    /// Field does not equal the specified value.
    #[inline]
    pub fn ne<T: Into<Bson>>(self, value: T) -> Filter {
        Filter::Ne {
            field: self.field_name,
            value: value.into(),
        }
    }

    /// Field is greater than the specified value.
    #[inline]
    pub fn gt<T: Into<Bson>>(self, value: T) -> Filter {
        Filter::Gt {
            field: self.field_name,
            value: value.into(),
        }
    }

    /// Field is greater than or equal to the specified value.
    #[inline]
    pub fn gte<T: Into<Bson>>(self, value: T) -> Filter {
        Filter::Gte {
            field: self.field_name,
            value: value.into(),
        }
    }

    /// Field is less than the specified value.
    #[inline]
    pub fn lt<T: Into<Bson>>(self, value: T) -> Filter {
        Filter::Lt {
            field: self.field_name,
            value: value.into(),
        }
    }

    /// Field is less than or equal to the specified value.
    #[inline]
    pub fn lte<T: Into<Bson>>(self, value: T) -> Filter {
        Filter::Lte {
            field: self.field_name,
            value: value.into(),
        }
    }

    /// Field equals one of the listed values.
    pub fn in_array<T: Into<Bson>>(self, values: Vec<T>) -> Filter {
        Filter::In {
            field: self.field_name,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Field equals none of the listed values.
    pub fn not_in_array<T: Into<Bson>>(self, values: Vec<T>) -> Filter {
        Filter::NotIn {
            field: self.field_name,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Field is present (or absent, when `exists` is false).
    #[inline]
    pub fn exists(self, exists: bool) -> Filter {
        Filter::Exists {
            field: self.field_name,
            exists,
        }
    }

    /// Field is a string matching the regex pattern.
    #[inline]
    pub fn regex(self, pattern: &str) -> Filter {
        Filter::Regex {
            field: self.field_name,
            pattern: pattern.to_string(),
        }
    }
}
