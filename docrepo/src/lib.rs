//! # docrepo - Generic Document Repository
//!
//! A generic, typed repository abstraction over document stores. One
//! parametric type exposes CRUD, filtering, projection, and pagination for
//! any entity carrying a unique identifier and a creation timestamp; every
//! operation is a thin pass-through to the underlying store backend.
//!
//! ## Key Features
//!
//! - **Typed repositories**: `Repository<T>` for any `Entity` implementor
//! - **Filters and updates as data**: tagged-variant trees over BSON
//!   values, interpreted per backend
//! - **Pagination**: server-side count + skip + limit with page-count math
//! - **Async and blocking**: every operation in both calling conventions
//!   with identical semantics
//! - **Pluggable backends**: an in-memory store ships here; the MongoDB
//!   adapter lives in its own crate
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docrepo::{Datastore, filter::field};
//! use docrepo_derive::Entity;
//!
//! #[derive(Entity, Serialize, Deserialize)]
//! #[entity(collection = "books")]
//! struct Book {
//!     #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
//!     id: Option<bson::oid::ObjectId>,
//!     created_at: bson::DateTime,
//!     title: String,
//! }
//!
//! # async fn example() -> docrepo::Result<()> {
//! let datastore = Datastore::in_memory();
//! let books = datastore.repository::<Book>();
//!
//! books.insert_one(&Book {
//!     id: None,
//!     created_at: bson::DateTime::now(),
//!     title: "Dune".to_string(),
//! }).await?;
//!
//! let found = books.find_one(field("title").eq("Dune")).await?;
//! let page = books.paginate(0, 20, "title").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`entity`] - The identity contract stored types satisfy
//! - [`filter`] - Query filters and the fluent construction API
//! - [`store`] - The backend seam and the in-memory store
//! - [`errors`] - Error types and result definitions
//! - [`blocking`] - Synchronous counterparts of the whole API

pub mod blocking;
pub mod entity;
pub mod errors;
pub mod filter;
pub mod store;
pub mod update;
pub mod update_options;

mod cursor;
mod datastore;
mod find_options;
mod page;
mod projection;
mod repository;
mod settings;
mod value;

// Re-export the document model so entities and adapters agree on it.
pub use bson;

pub use cursor::Cursor;
pub use datastore::Datastore;
pub use entity::Entity;
pub use errors::{Error, Result};
pub use find_options::{limit_to, order_by, skip_by, FindOptions, SortOrder};
pub use page::Page;
pub use projection::Projection;
pub use repository::Repository;
pub use settings::StoreSettings;
pub use update::Update;
pub use update_options::UpdateOptions;
