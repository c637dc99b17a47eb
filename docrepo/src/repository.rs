use std::marker::PhantomData;
use std::sync::Arc;

use bson::oid::ObjectId;
use bson::Document;
use serde::de::DeserializeOwned;

use crate::cursor::Cursor;
use crate::entity::Entity;
use crate::errors::{Error, Result};
use crate::filter::{all, by_id, Filter};
use crate::find_options::FindOptions;
use crate::page::Page;
use crate::projection::Projection;
use crate::store::DocumentStore;
use crate::update::Update;
use crate::update_options::UpdateOptions;

/// A typed repository over one collection of a document store.
///
/// # Purpose
/// Translates operations on an entity type into requests against the bound
/// collection. Every call is one store round-trip; the repository holds no
/// state beyond the collection binding and adds no caching, retries, or
/// coordination of its own.
///
/// # Characteristics
/// - **Generic over the entity type**: any [`Entity`] implementor
/// - **Cheap to clone**: clones share the store handle through `Arc`
/// - **Thread-safe**: safe for concurrent use by independent callers, to
///   the extent the backend handle is
/// - **Error transparency**: store failures propagate unchanged; absent
///   documents are `Ok(None)`, never errors
///
/// Obtained from [`Datastore::repository`](crate::Datastore::repository).
/// Synchronous counterparts with identical semantics live in
/// [`blocking`](crate::blocking).
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    collection_name: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Repository {
            store: Arc::clone(&self.store),
            collection_name: self.collection_name.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Repository<T> {
    pub(crate) fn new(store: Arc<dyn DocumentStore>, collection_name: String) -> Self {
        Repository {
            store,
            collection_name,
            _entity: PhantomData,
        }
    }

    /// Returns the name of the collection this repository is bound to.
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    fn to_document(object: &T) -> Result<Document> {
        let document = bson::to_document(object)?;
        Ok(document)
    }

    fn from_document<P: DeserializeOwned>(document: Document) -> Result<P> {
        let object = bson::from_document(document)?;
        Ok(object)
    }

    /// Returns every document in the collection.
    pub async fn read_all(&self) -> Result<Vec<T>> {
        self.find(all()).await?.collect()
    }

    /// Finds all entities matching a filter, as a lazily-converting cursor.
    pub async fn find(&self, filter: Filter) -> Result<Cursor<T>> {
        self.find_with_options(filter, FindOptions::new()).await
    }

    /// Finds entities matching a filter with sorting, skip/limit, and
    /// projection options applied.
    pub async fn find_with_options(&self, filter: Filter, options: FindOptions) -> Result<Cursor<T>> {
        let documents = self.store.find(&self.collection_name, &filter, &options).await?;
        Ok(Cursor::new(documents))
    }

    /// Finds matching entities reshaped through a projection.
    ///
    /// The target type `P` describes the projected shape; fields the
    /// projection drops must be absent or optional on `P`.
    pub async fn find_projected<P: DeserializeOwned>(
        &self,
        filter: Filter,
        projection: Projection,
    ) -> Result<Cursor<P>> {
        let options = FindOptions::new().projection(projection);
        let documents = self.store.find(&self.collection_name, &filter, &options).await?;
        Ok(Cursor::new(documents))
    }

    /// Returns the first entity matching the filter, or `None`.
    pub async fn find_one(&self, filter: Filter) -> Result<Option<T>> {
        let document = self.store.find_one(&self.collection_name, &filter, None).await?;
        document.map(Self::from_document).transpose()
    }

    /// Returns the first match reshaped through a projection, or `None`.
    pub async fn find_one_projected<P: DeserializeOwned>(
        &self,
        filter: Filter,
        projection: Projection,
    ) -> Result<Option<P>> {
        let document = self
            .store
            .find_one(&self.collection_name, &filter, Some(&projection))
            .await?;
        document.map(Self::from_document).transpose()
    }

    /// Looks up an entity by the string form of its identifier.
    ///
    /// # Errors
    /// Fails with an invalid-identifier error when the string is not a valid
    /// identifier encoding. A well-formed identifier that matches nothing is
    /// `Ok(None)`.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        let id = ObjectId::parse_str(id)?;
        self.find_one(by_id(id)).await
    }

    /// Counts the documents matching a filter.
    pub async fn count(&self, filter: Filter) -> Result<u64> {
        self.store.count(&self.collection_name, &filter).await
    }

    /// Returns one page of the whole collection, sorted ascending by
    /// `sort_field`.
    ///
    /// `page_index` is zero-based. The page count is
    /// `ceil(count / page_size)`; an index past the last page yields an
    /// empty page with the correct count. `page_size == 0` is caller error
    /// and unguarded.
    pub async fn paginate(&self, page_index: u64, page_size: u64, sort_field: &str) -> Result<Page<T>> {
        self.paginate_filtered(all(), page_index, page_size, sort_field).await
    }

    /// Returns one page of the documents matching a filter, sorted
    /// ascending by `sort_field`.
    pub async fn paginate_filtered(
        &self,
        filter: Filter,
        page_index: u64,
        page_size: u64,
        sort_field: &str,
    ) -> Result<Page<T>> {
        let (count, documents) = self
            .store
            .paginate(&self.collection_name, &filter, sort_field, page_index, page_size)
            .await?;
        let total_pages = count.div_ceil(page_size);
        let items = documents
            .into_iter()
            .map(Self::from_document)
            .collect::<Result<Vec<T>>>()?;
        Ok(Page::new(total_pages, items))
    }

    /// Inserts one entity; the store assigns an identifier when unset.
    /// Returns the identifier.
    pub async fn insert_one(&self, object: &T) -> Result<ObjectId> {
        let mut ids = self
            .store
            .insert_many(&self.collection_name, vec![Self::to_document(object)?])
            .await?;
        ids.pop().ok_or_else(|| {
            log::error!("Insert into {} returned no identifier", self.collection_name);
            Error::Store("insert returned no identifier".into())
        })
    }

    /// Inserts a batch of entities. Returns the identifiers in input order.
    pub async fn insert_many(&self, objects: &[T]) -> Result<Vec<ObjectId>> {
        let documents = objects
            .iter()
            .map(Self::to_document)
            .collect::<Result<Vec<Document>>>()?;
        self.store.insert_many(&self.collection_name, documents).await
    }

    /// Applies an update specification to the first document matching the
    /// filter. Returns the number of modified documents.
    pub async fn update_one(
        &self,
        filter: Filter,
        update: &Update,
        options: &UpdateOptions,
    ) -> Result<u64> {
        self.store
            .update(&self.collection_name, &filter, update, options, true)
            .await
    }

    /// Applies an update specification to every document matching the
    /// filter. Returns the number of modified documents.
    pub async fn update_many(
        &self,
        filter: Filter,
        update: &Update,
        options: &UpdateOptions,
    ) -> Result<u64> {
        self.store
            .update(&self.collection_name, &filter, update, options, false)
            .await
    }

    /// Replaces the stored document whose identifier equals the entity's,
    /// wholesale. Returns the previous document, or `None` when the entity
    /// has no identifier or nothing matches (calling it again after a
    /// replacement already happened is safe).
    pub async fn replace_one(&self, object: &T) -> Result<Option<T>> {
        let Some(id) = object.id() else {
            return Ok(None);
        };
        let previous = self
            .store
            .replace_one(&self.collection_name, &by_id(id), Self::to_document(object)?)
            .await?;
        previous.map(Self::from_document).transpose()
    }

    /// Deletes the first document matching the filter. Returns the number
    /// of deleted documents.
    pub async fn delete_one(&self, filter: Filter) -> Result<u64> {
        self.store.delete(&self.collection_name, &filter, true).await
    }

    /// Deletes every document matching the filter. Returns the number of
    /// deleted documents.
    pub async fn delete_many(&self, filter: Filter) -> Result<u64> {
        self.store.delete(&self.collection_name, &filter, false).await
    }

    /// Deletes the first document matching the filter and returns it, or
    /// `None` when nothing matched.
    pub async fn find_one_and_delete(&self, filter: Filter) -> Result<Option<T>> {
        let document = self.store.find_one_and_delete(&self.collection_name, &filter).await?;
        document.map(Self::from_document).transpose()
    }

    /// Deletes the document with the given identifier string and returns
    /// it. Absent documents are `Ok(None)`, so a second call is safe.
    ///
    /// # Errors
    /// Fails with an invalid-identifier error when the string is not a
    /// valid identifier encoding.
    pub async fn delete_by_id(&self, id: &str) -> Result<Option<T>> {
        let id = ObjectId::parse_str(id)?;
        self.find_one_and_delete(by_id(id)).await
    }
}
