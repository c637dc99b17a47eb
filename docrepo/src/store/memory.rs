use std::cmp::Ordering;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use dashmap::DashMap;

use crate::errors::{Error, Result};
use crate::filter::Filter;
use crate::find_options::{FindOptions, SortOrder};
use crate::projection::Projection;
use crate::store::DocumentStore;
use crate::update::Update;
use crate::update_options::UpdateOptions;
use crate::value::{path_get, value_cmp};

/// An in-memory document store.
///
/// Collections are kept as plain document lists in insertion order, guarded
/// by a concurrent map. Intended for tests and embedded use; it interprets
/// the filter, update, and projection value trees directly instead of
/// translating them.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: DashMap<String, Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn matching(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>> {
        let mut matched = Vec::new();
        if let Some(docs) = self.collections.get(collection) {
            for doc in docs.iter() {
                if filter.matches(doc)? {
                    matched.push(doc.clone());
                }
            }
        }
        Ok(matched)
    }
}

fn compare_documents(a: &Document, b: &Document, sort: &[(String, SortOrder)]) -> Ordering {
    for (field, order) in sort {
        let ordering = match (path_get(a, field), path_get(b, field)) {
            (None, None) => Ordering::Equal,
            // missing fields sort first, as the store does
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(left), Some(right)) => value_cmp(left, right).unwrap_or(Ordering::Equal),
        };
        let ordering = match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn document_id(document: &Document) -> Option<ObjectId> {
    match document.get("_id") {
        Some(Bson::ObjectId(id)) => Some(*id),
        _ => None,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>> {
        let mut matched = self.matching(collection, filter)?;
        if !options.sort_spec().is_empty() {
            matched.sort_by(|a, b| compare_documents(a, b, options.sort_spec()));
        }
        let skip = options.skip_count().unwrap_or(0) as usize;
        let limit = options.limit_count().map(|l| l as usize).unwrap_or(usize::MAX);
        let mut result: Vec<Document> = matched.into_iter().skip(skip).take(limit).collect();
        if let Some(projection) = options.projection_spec() {
            result = result.iter().map(|doc| projection.apply(doc)).collect();
        }
        Ok(result)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
        projection: Option<&Projection>,
    ) -> Result<Option<Document>> {
        if let Some(docs) = self.collections.get(collection) {
            for doc in docs.iter() {
                if filter.matches(doc)? {
                    return Ok(Some(match projection {
                        Some(projection) => projection.apply(doc),
                        None => doc.clone(),
                    }));
                }
            }
        }
        Ok(None)
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let mut count = 0u64;
        if let Some(docs) = self.collections.get(collection) {
            for doc in docs.iter() {
                if filter.matches(doc)? {
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    async fn paginate(
        &self,
        collection: &str,
        filter: &Filter,
        sort_field: &str,
        page_index: u64,
        page_size: u64,
    ) -> Result<(u64, Vec<Document>)> {
        let mut matched = self.matching(collection, filter)?;
        let sort = [(sort_field.to_string(), SortOrder::Ascending)];
        matched.sort_by(|a, b| compare_documents(a, b, &sort));
        let total = matched.len() as u64;
        let skip = page_index.saturating_mul(page_size) as usize;
        let page = matched.into_iter().skip(skip).take(page_size as usize).collect();
        Ok((total, page))
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<Vec<ObjectId>> {
        let mut entry = self.collections.entry(collection.to_string()).or_default();
        let mut ids = Vec::with_capacity(documents.len());
        for mut document in documents {
            let id = match document.get("_id") {
                Some(Bson::ObjectId(id)) => *id,
                None | Some(Bson::Null) => {
                    let id = ObjectId::new();
                    document.insert("_id", id);
                    id
                }
                Some(other) => {
                    return Err(Error::Store(
                        format!("unsupported identifier type: {}", other).into(),
                    ));
                }
            };
            if entry.iter().any(|existing| document_id(existing) == Some(id)) {
                log::error!("Duplicate identifier {} in collection {}", id, collection);
                return Err(Error::Store(
                    format!("duplicate identifier {} in collection {}", id, collection).into(),
                ));
            }
            entry.push(document);
            ids.push(id);
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
        let mut modified = 0u64;
        if let Some(mut docs) = self.collections.get_mut(collection) {
            for doc in docs.iter_mut() {
                if filter.matches(doc)? {
                    update.apply(doc)?;
                    modified += 1;
                    if just_once {
                        break;
                    }
                }
            }
        }
        if modified == 0 && options.is_upsert() {
            // seed the new document from the filter's equality constraints,
            // then apply the update, as the store's upsert does
            let mut seeded = Document::new();
            filter.equality_fields(&mut seeded);
            update.apply(&mut seeded)?;
            self.insert_many(collection, vec![seeded]).await?;
        }
        Ok(modified)
    }

    async fn replace_one(
        &self,
        collection: &str,
        filter: &Filter,
        replacement: Document,
    ) -> Result<Option<Document>> {
        if let Some(mut docs) = self.collections.get_mut(collection) {
            let mut target = None;
            for (index, doc) in docs.iter().enumerate() {
                if filter.matches(doc)? {
                    target = Some(index);
                    break;
                }
            }
            if let Some(index) = target {
                let previous = std::mem::replace(&mut docs[index], replacement);
                if let Some(id) = previous.get("_id") {
                    docs[index].insert("_id", id.clone());
                }
                return Ok(Some(previous));
            }
        }
        Ok(None)
    }

    async fn delete(&self, collection: &str, filter: &Filter, just_once: bool) -> Result<u64> {
        let mut deleted = 0u64;
        if let Some(mut docs) = self.collections.get_mut(collection) {
            let mut index = 0;
            while index < docs.len() {
                if filter.matches(&docs[index])? {
                    docs.remove(index);
                    deleted += 1;
                    if just_once {
                        break;
                    }
                } else {
                    index += 1;
                }
            }
        }
        Ok(deleted)
    }

    async fn find_one_and_delete(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>> {
        if let Some(mut docs) = self.collections.get_mut(collection) {
            let mut target = None;
            for (index, doc) in docs.iter().enumerate() {
                if filter.matches(doc)? {
                    target = Some(index);
                    break;
                }
            }
            if let Some(index) = target {
                return Ok(Some(docs.remove(index)));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{all, field};
    use bson::doc;

    fn store_with(collection: &str, docs: Vec<Document>) -> MemoryStore {
        let store = MemoryStore::new();
        store.collections.insert(
            collection.to_string(),
            docs.into_iter()
                .map(|mut doc| {
                    if doc.get("_id").is_none() {
                        doc.insert("_id", ObjectId::new());
                    }
                    doc
                })
                .collect(),
        );
        store
    }

    #[tokio::test]
    async fn find_on_unknown_collection_is_empty() {
        let store = MemoryStore::new();
        let docs = store.find("nothing", &all(), &FindOptions::new()).await.unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn insert_assigns_missing_ids() {
        let store = MemoryStore::new();
        let ids = store
            .insert_many("c", vec![doc! { "n": 1 }, doc! { "n": 2 }])
            .await
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);

        let docs = store.find("c", &all(), &FindOptions::new()).await.unwrap();
        assert!(docs.iter().all(|d| d.get_object_id("_id").is_ok()));
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_ids() {
        let store = MemoryStore::new();
        let id = ObjectId::new();
        store.insert_many("c", vec![doc! { "_id": id }]).await.unwrap();
        let result = store.insert_many("c", vec![doc! { "_id": id }]).await;
        assert!(matches!(result, Err(Error::Store(_))));
    }

    #[tokio::test]
    async fn find_sorts_skips_and_limits() {
        let store = store_with(
            "c",
            vec![doc! { "n": 3 }, doc! { "n": 1 }, doc! { "n": 2 }],
        );
        let options = FindOptions::new()
            .sort_by("n", SortOrder::Ascending)
            .skip(1)
            .limit(1);
        let docs = store.find("c", &all(), &options).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].get_i32("n").unwrap(), 2);
    }

    #[tokio::test]
    async fn find_applies_projection() {
        let store = store_with("c", vec![doc! { "n": 1, "secret": "x" }]);
        let options = FindOptions::new().projection(Projection::exclude(["secret"]));
        let docs = store.find("c", &all(), &options).await.unwrap();
        assert!(docs[0].get("secret").is_none());
        assert!(docs[0].get("n").is_some());
    }

    #[tokio::test]
    async fn update_counts_modified_documents() {
        let store = store_with("c", vec![doc! { "n": 1 }, doc! { "n": 1 }, doc! { "n": 2 }]);
        let modified = store
            .update(
                "c",
                &field("n").eq(1),
                &Update::new().set("seen", true),
                &UpdateOptions::default(),
                false,
            )
            .await
            .unwrap();
        assert_eq!(modified, 2);

        let just_one = store
            .update(
                "c",
                &field("seen").eq(true),
                &Update::new().set("n", 9),
                &UpdateOptions::default(),
                true,
            )
            .await
            .unwrap();
        assert_eq!(just_one, 1);
    }

    #[tokio::test]
    async fn upsert_inserts_seeded_document() {
        let store = MemoryStore::new();
        let modified = store
            .update(
                "c",
                &field("name").eq("ghost"),
                &Update::new().set("count", 1),
                &crate::update_options::upsert(),
                true,
            )
            .await
            .unwrap();
        assert_eq!(modified, 0);

        let doc = store
            .find_one("c", &field("name").eq("ghost"), None)
            .await
            .unwrap()
            .expect("upserted document");
        assert_eq!(doc.get_i32("count").unwrap(), 1);
        assert!(doc.get_object_id("_id").is_ok());
    }

    #[tokio::test]
    async fn replace_keeps_identifier_and_returns_previous() {
        let id = ObjectId::new();
        let store = store_with("c", vec![doc! { "_id": id, "n": 1 }]);
        let previous = store
            .replace_one("c", &field("_id").eq(id), doc! { "n": 2 })
            .await
            .unwrap()
            .expect("previous document");
        assert_eq!(previous.get_i32("n").unwrap(), 1);

        let current = store.find_one("c", &all(), None).await.unwrap().unwrap();
        assert_eq!(current.get_i32("n").unwrap(), 2);
        assert_eq!(current.get_object_id("_id").unwrap(), id);
    }

    #[tokio::test]
    async fn replace_without_match_returns_none() {
        let store = MemoryStore::new();
        let result = store
            .replace_one("c", &field("n").eq(1), doc! { "n": 2 })
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_just_once_and_many() {
        let store = store_with("c", vec![doc! { "n": 1 }, doc! { "n": 1 }, doc! { "n": 2 }]);
        let deleted = store.delete("c", &field("n").eq(1), true).await.unwrap();
        assert_eq!(deleted, 1);
        let deleted = store.delete("c", &all(), false).await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(store.count("c", &all()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn find_one_and_delete_returns_removed() {
        let store = store_with("c", vec![doc! { "n": 1 }]);
        let removed = store.find_one_and_delete("c", &field("n").eq(1)).await.unwrap();
        assert_eq!(removed.unwrap().get_i32("n").unwrap(), 1);
        let removed = store.find_one_and_delete("c", &field("n").eq(1)).await.unwrap();
        assert!(removed.is_none());
    }

    #[tokio::test]
    async fn paginate_counts_and_slices() {
        let store = store_with(
            "c",
            (1..=5).map(|n| doc! { "n": n }).collect(),
        );
        let (total, page) = store.paginate("c", &all(), "n", 1, 2).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].get_i32("n").unwrap(), 3);
        assert_eq!(page[1].get_i32("n").unwrap(), 4);

        let (total, page) = store.paginate("c", &all(), "n", 10, 2).await.unwrap();
        assert_eq!(total, 5);
        assert!(page.is_empty());
    }

    #[test]
    fn sorting_places_missing_fields_first() {
        let a = doc! { "n": 1 };
        let b = Document::new();
        let sort = [("n".to_string(), SortOrder::Ascending)];
        assert_eq!(compare_documents(&b, &a, &sort), Ordering::Less);
        assert_eq!(compare_documents(&a, &b, &sort), Ordering::Greater);
    }
}
