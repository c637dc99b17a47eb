use std::sync::Arc;

use crate::entity::Entity;
use crate::repository::Repository;
use crate::store::{DocumentStore, MemoryStore};

/// A handle to one logical document database.
///
/// Wraps a [`DocumentStore`] backend and hands out typed repositories bound
/// to it. Cloning is cheap; all clones share the backend handle.
///
/// # Usage
/// ```ignore
/// let datastore = Datastore::in_memory();
/// let books = datastore.repository::<Book>();
/// ```
#[derive(Clone)]
pub struct Datastore {
    backend: Arc<dyn DocumentStore>,
}

impl Datastore {
    /// Creates a datastore over the given backend.
    pub fn new(backend: Arc<dyn DocumentStore>) -> Self {
        Datastore { backend }
    }

    /// Creates a datastore over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Datastore::new(Arc::new(MemoryStore::new()))
    }

    /// Returns a typed repository bound to the entity's collection.
    ///
    /// The collection name is resolved once, here: the entity's
    /// `#[entity(collection = "...")]` override, else its type name.
    pub fn repository<T: Entity>(&self) -> Repository<T> {
        self.repository_with_name(T::collection_name())
    }

    /// Returns a typed repository bound to an explicitly named collection,
    /// overriding the entity's own collection name.
    pub fn repository_with_name<T: Entity>(&self, collection_name: &str) -> Repository<T> {
        Repository::new(Arc::clone(&self.backend), collection_name.to_string())
    }

    /// Returns the underlying backend handle.
    pub fn backend(&self) -> Arc<dyn DocumentStore> {
        Arc::clone(&self.backend)
    }
}
