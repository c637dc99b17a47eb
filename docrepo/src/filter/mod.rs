//! Query filters for selecting documents from collections.
//!
//! Filters are plain data: a tree of tagged variants over BSON values,
//! interpreted by each backend at its boundary. They are built through the
//! fluent API:
//!
//! - `field("age").gt(30)` - comparison operators
//! - `field("name").eq("Alice")` - equality checks
//! - `all()` - match all documents
//! - `by_id(id)` - match by document identifier
//! - `field("age").gt(30).and(field("status").eq("active"))` - logical AND
//!
//! # Supported Operators
//!
//! - **Equality**: `eq`, `ne`
//! - **Comparison**: `gt`, `gte`, `lt`, `lte`
//! - **Pattern**: `regex`
//! - **Array**: `in_array`, `not_in_array`
//! - **Field presence**: `exists`
//! - **Logical**: `and`, `or`, `not`

#[allow(clippy::module_inception)]
mod filter;
mod fluent;

pub use filter::*;
pub use fluent::*;
