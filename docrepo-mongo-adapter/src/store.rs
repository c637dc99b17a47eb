use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Bson, Document};
use mongodb::options::UpdateOptions as DriverUpdateOptions;
use mongodb::{Client, Collection, Database};

use docrepo::errors::{Error, Result};
use docrepo::filter::Filter;
use docrepo::store::DocumentStore;
use docrepo::update::Update;
use docrepo::update_options::UpdateOptions;
use docrepo::{Datastore, FindOptions, Projection, StoreSettings};

use crate::translate;

fn connection_err(err: mongodb::error::Error) -> Error {
    Error::Connection(Box::new(err))
}

fn store_err(err: mongodb::error::Error) -> Error {
    Error::Store(Box::new(err))
}

/// A [`DocumentStore`] over one MongoDB database.
///
/// Holds the driver's database handle; collection handles are materialized
/// per call, which the driver makes cheap. Thread safety and connection
/// pooling are entirely the driver's.
#[derive(Debug, Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Connects to the database named by the settings.
    ///
    /// The connection is verified with a `ping`, so an unreachable or
    /// misconfigured server fails here, at construction, and the error is
    /// propagated rather than retried.
    pub async fn connect(settings: &StoreSettings) -> Result<Self> {
        let client = Client::with_uri_str(settings.connection_string())
            .await
            .map_err(connection_err)?;
        let database = client.database(settings.database());
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(connection_err)?;
        log::debug!("Connected to database {}", settings.database());
        Ok(MongoStore { database })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

/// Connects and wraps the store in a [`Datastore`] handle.
pub async fn connect(settings: &StoreSettings) -> Result<Datastore> {
    let store = MongoStore::connect(settings).await?;
    Ok(Datastore::new(Arc::new(store)))
}

async fn collect(mut cursor: mongodb::Cursor<Document>) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    while cursor.advance().await.map_err(store_err)? {
        documents.push(cursor.deserialize_current().map_err(store_err)?);
    }
    Ok(documents)
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>> {
        let collection = self.collection(collection);
        let mut find = collection.find(translate::filter_document(filter));
        if !options.sort_spec().is_empty() {
            find = find.sort(translate::sort_document(options.sort_spec()));
        }
        if let Some(skip) = options.skip_count() {
            find = find.skip(skip);
        }
        if let Some(limit) = options.limit_count() {
            find = find.limit(limit as i64);
        }
        if let Some(projection) = options.projection_spec() {
            find = find.projection(translate::projection_document(projection));
        }
        let cursor = find.await.map_err(store_err)?;
        collect(cursor).await
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
        projection: Option<&Projection>,
    ) -> Result<Option<Document>> {
        let collection = self.collection(collection);
        let mut find_one = collection.find_one(translate::filter_document(filter));
        if let Some(projection) = projection {
            find_one = find_one.projection(translate::projection_document(projection));
        }
        find_one.await.map_err(store_err)
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let collection = self.collection(collection);
        collection
            .count_documents(translate::filter_document(filter))
            .await
            .map_err(store_err)
    }

    async fn paginate(
        &self,
        collection: &str,
        filter: &Filter,
        sort_field: &str,
        page_index: u64,
        page_size: u64,
    ) -> Result<(u64, Vec<Document>)> {
        let mut sort = Document::new();
        sort.insert(sort_field, 1);
        let skip = page_index.saturating_mul(page_size);
        let pipeline = vec![
            doc! { "$match": translate::filter_document(filter) },
            doc! { "$sort": sort },
            doc! { "$facet": {
                "total": [ { "$count": "count" } ],
                "data": [ { "$skip": skip as i64 }, { "$limit": page_size as i64 } ],
            } },
        ];

        let collection = self.collection(collection);
        let mut cursor = collection.aggregate(pipeline).await.map_err(store_err)?;

        let mut total = 0u64;
        let mut documents = Vec::new();
        if cursor.advance().await.map_err(store_err)? {
            let facet = cursor.deserialize_current().map_err(store_err)?;
            if let Ok(counts) = facet.get_array("total") {
                if let Some(Bson::Document(count)) = counts.first() {
                    total = match count.get("count") {
                        Some(Bson::Int32(value)) => *value as u64,
                        Some(Bson::Int64(value)) => *value as u64,
                        _ => 0,
                    };
                }
            }
            if let Ok(data) = facet.get_array("data") {
                for item in data {
                    if let Bson::Document(document) = item {
                        documents.push(document.clone());
                    }
                }
            }
        }
        Ok((total, documents))
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<Vec<ObjectId>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        let count = documents.len();
        let collection = self.collection(collection);
        let result = collection.insert_many(documents).await.map_err(store_err)?;
        let mut ids = Vec::with_capacity(count);
        for index in 0..count {
            match result.inserted_ids.get(&index) {
                Some(Bson::ObjectId(id)) => ids.push(*id),
                other => {
                    log::error!("Unexpected inserted identifier for index {}: {:?}", index, other);
                    return Err(Error::Store(
                        format!("unexpected inserted identifier: {:?}", other).into(),
                    ));
                }
            }
        }
        Ok(ids)
    }

    async fn update(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
        options: &UpdateOptions,
        just_once: bool,
    ) -> Result<u64> {
        let query = translate::filter_document(filter);
        let modifications = translate::update_document(update);
        let driver_options = DriverUpdateOptions::builder()
            .upsert(options.is_upsert())
            .build();
        let collection = self.collection(collection);
        let result = if just_once {
            collection
                .update_one(query, modifications)
                .with_options(driver_options)
                .await
        } else {
            collection
                .update_many(query, modifications)
                .with_options(driver_options)
                .await
        }
        .map_err(store_err)?;
        Ok(result.modified_count)
    }

    async fn replace_one(
        &self,
        collection: &str,
        filter: &Filter,
        replacement: Document,
    ) -> Result<Option<Document>> {
        let collection = self.collection(collection);
        collection
            .find_one_and_replace(translate::filter_document(filter), replacement)
            .await
            .map_err(store_err)
    }

    async fn delete(&self, collection: &str, filter: &Filter, just_once: bool) -> Result<u64> {
        let query = translate::filter_document(filter);
        let collection = self.collection(collection);
        let result = if just_once {
            collection.delete_one(query).await
        } else {
            collection.delete_many(query).await
        }
        .map_err(store_err)?;
        Ok(result.deleted_count)
    }

    async fn find_one_and_delete(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>> {
        let collection = self.collection(collection);
        collection
            .find_one_and_delete(translate::filter_document(filter))
            .await
            .map_err(store_err)
    }
}
