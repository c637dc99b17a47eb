use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::Document;

use crate::errors::Result;
use crate::filter::Filter;
use crate::find_options::FindOptions;
use crate::projection::Projection;
use crate::update::Update;
use crate::update_options::UpdateOptions;

/// A document store backend.
///
/// # Purpose
/// Every repository operation is a thin pass-through to one method of this
/// trait. Implementations issue exactly one request per call and add no
/// caching, retries, or coordination; thread safety is whatever the
/// underlying handle guarantees.
///
/// # Errors
/// Backend failures propagate unchanged (boxed). "Not found" is never an
/// error: single-document operations return `Ok(None)`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Finds all documents matching the filter, honoring sort, skip, limit,
    /// and projection from the options.
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>>;

    /// Finds the first document matching the filter, optionally projected.
    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
        projection: Option<&Projection>,
    ) -> Result<Option<Document>>;

    /// Counts the documents matching the filter.
    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64>;

    /// Runs the pagination query: counts all documents matching the filter,
    /// sorts them ascending by `sort_field`, skips `page_index * page_size`
    /// and returns at most `page_size` documents.
    ///
    /// Returns the total matching count and the page slice. A page index
    /// past the end yields an empty slice with the correct count.
    /// `page_size == 0` is caller error and unguarded.
    async fn paginate(
        &self,
        collection: &str,
        filter: &Filter,
        sort_field: &str,
        page_index: u64,
        page_size: u64,
    ) -> Result<(u64, Vec<Document>)>;

    /// Inserts a batch of documents, assigning an identifier to any document
    /// without one. Returns the identifiers in input order.
    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<Vec<ObjectId>>;

    /// Applies an update specification to matching documents.
    ///
    /// With `just_once` only the first match is updated. With
    /// `options.is_upsert()` a document seeded from the filter's equality
    /// constraints is inserted when nothing matches. Returns the number of
    /// modified documents (an upserted document is not counted, per driver
    /// semantics).
    async fn update(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
        options: &UpdateOptions,
        just_once: bool,
    ) -> Result<u64>;

    /// Replaces the first document matching the filter wholesale, keeping
    /// its identifier. Returns the previous document, or `None` when
    /// nothing matched.
    async fn replace_one(
        &self,
        collection: &str,
        filter: &Filter,
        replacement: Document,
    ) -> Result<Option<Document>>;

    /// Deletes matching documents; with `just_once` only the first match.
    /// Returns the number of deleted documents.
    async fn delete(&self, collection: &str, filter: &Filter, just_once: bool) -> Result<u64>;

    /// Deletes the first document matching the filter and returns it, or
    /// `None` when nothing matched.
    async fn find_one_and_delete(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>>;
}
