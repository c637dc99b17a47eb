//! Synchronous counterparts of the repository API.
//!
//! Every operation has identical semantics to its async form; the blocking
//! variants drive the async implementation to completion on a shared
//! runtime dedicated to this module. Do not call them from within an async
//! context; use the async API there instead.

use std::future::Future;
use std::sync::OnceLock;

use bson::oid::ObjectId;
use serde::de::DeserializeOwned;

use crate::cursor::Cursor;
use crate::entity::Entity;
use crate::errors::Result;
use crate::filter::Filter;
use crate::find_options::FindOptions;
use crate::page::Page;
use crate::projection::Projection;
use crate::update::Update;
use crate::update_options::UpdateOptions;

fn runtime() -> &'static tokio::runtime::Runtime {
    static RUNTIME: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("failed to initialize the blocking runtime")
    })
}

fn block_on<F: Future>(future: F) -> F::Output {
    runtime().block_on(future)
}

/// Blocking handle to one logical document database.
///
/// See [`crate::Datastore`]; this wrapper only changes the calling
/// convention.
#[derive(Clone)]
pub struct Datastore {
    inner: crate::Datastore,
}

impl Datastore {
    /// Wraps an async datastore for blocking use.
    pub fn new(inner: crate::Datastore) -> Self {
        Datastore { inner }
    }

    /// Creates a blocking datastore over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Datastore::new(crate::Datastore::in_memory())
    }

    /// Drives an async connect future to completion, e.g. a store
    /// adapter's `connect(&settings)`.
    pub fn connect_with<F>(future: F) -> Result<Self>
    where
        F: Future<Output = Result<crate::Datastore>>,
    {
        Ok(Datastore::new(block_on(future)?))
    }

    /// Returns a blocking repository bound to the entity's collection.
    pub fn repository<T: Entity>(&self) -> Repository<T> {
        Repository {
            inner: self.inner.repository::<T>(),
        }
    }

    /// Returns a blocking repository bound to an explicitly named
    /// collection.
    pub fn repository_with_name<T: Entity>(&self, collection_name: &str) -> Repository<T> {
        Repository {
            inner: self.inner.repository_with_name::<T>(collection_name),
        }
    }

    /// Returns the wrapped async datastore.
    pub fn as_async(&self) -> &crate::Datastore {
        &self.inner
    }
}

/// Blocking counterpart of [`crate::Repository`].
///
/// One store round-trip per call, blocking the caller until it completes.
/// Semantics are identical to the async methods of the same name.
pub struct Repository<T> {
    inner: crate::Repository<T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Repository {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Entity> Repository<T> {
    /// Returns the name of the collection this repository is bound to.
    pub fn collection_name(&self) -> &str {
        self.inner.collection_name()
    }

    /// Returns every document in the collection.
    pub fn read_all(&self) -> Result<Vec<T>> {
        block_on(self.inner.read_all())
    }

    /// Finds all entities matching a filter, as a lazily-converting cursor.
    pub fn find(&self, filter: Filter) -> Result<Cursor<T>> {
        block_on(self.inner.find(filter))
    }

    /// Finds entities matching a filter with options applied.
    pub fn find_with_options(&self, filter: Filter, options: FindOptions) -> Result<Cursor<T>> {
        block_on(self.inner.find_with_options(filter, options))
    }

    /// Finds matching entities reshaped through a projection.
    pub fn find_projected<P: DeserializeOwned>(
        &self,
        filter: Filter,
        projection: Projection,
    ) -> Result<Cursor<P>> {
        block_on(self.inner.find_projected(filter, projection))
    }

    /// Returns the first entity matching the filter, or `None`.
    pub fn find_one(&self, filter: Filter) -> Result<Option<T>> {
        block_on(self.inner.find_one(filter))
    }

    /// Returns the first match reshaped through a projection, or `None`.
    pub fn find_one_projected<P: DeserializeOwned>(
        &self,
        filter: Filter,
        projection: Projection,
    ) -> Result<Option<P>> {
        block_on(self.inner.find_one_projected(filter, projection))
    }

    /// Looks up an entity by the string form of its identifier.
    pub fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        block_on(self.inner.find_by_id(id))
    }

    /// Counts the documents matching a filter.
    pub fn count(&self, filter: Filter) -> Result<u64> {
        block_on(self.inner.count(filter))
    }

    /// Returns one page of the whole collection, sorted ascending by
    /// `sort_field`.
    pub fn paginate(&self, page_index: u64, page_size: u64, sort_field: &str) -> Result<Page<T>> {
        block_on(self.inner.paginate(page_index, page_size, sort_field))
    }

    /// Returns one page of the documents matching a filter.
    pub fn paginate_filtered(
        &self,
        filter: Filter,
        page_index: u64,
        page_size: u64,
        sort_field: &str,
    ) -> Result<Page<T>> {
        block_on(self.inner.paginate_filtered(filter, page_index, page_size, sort_field))
    }

    /// Inserts one entity; the store assigns an identifier when unset.
    pub fn insert_one(&self, object: &T) -> Result<ObjectId> {
        block_on(self.inner.insert_one(object))
    }

    /// Inserts a batch of entities.
    pub fn insert_many(&self, objects: &[T]) -> Result<Vec<ObjectId>> {
        block_on(self.inner.insert_many(objects))
    }

    /// Applies an update specification to the first matching document.
    pub fn update_one(&self, filter: Filter, update: &Update, options: &UpdateOptions) -> Result<u64> {
        block_on(self.inner.update_one(filter, update, options))
    }

    /// Applies an update specification to every matching document.
    pub fn update_many(&self, filter: Filter, update: &Update, options: &UpdateOptions) -> Result<u64> {
        block_on(self.inner.update_many(filter, update, options))
    }

    /// Replaces the stored document whose identifier equals the entity's.
    pub fn replace_one(&self, object: &T) -> Result<Option<T>> {
        block_on(self.inner.replace_one(object))
    }

    /// Deletes the first document matching the filter.
    pub fn delete_one(&self, filter: Filter) -> Result<u64> {
        block_on(self.inner.delete_one(filter))
    }

    /// Deletes every document matching the filter.
    pub fn delete_many(&self, filter: Filter) -> Result<u64> {
        block_on(self.inner.delete_many(filter))
    }

    /// Deletes the first document matching the filter and returns it.
    pub fn find_one_and_delete(&self, filter: Filter) -> Result<Option<T>> {
        block_on(self.inner.find_one_and_delete(filter))
    }

    /// Deletes the document with the given identifier string and returns it.
    pub fn delete_by_id(&self, id: &str) -> Result<Option<T>> {
        block_on(self.inner.delete_by_id(id))
    }
}
