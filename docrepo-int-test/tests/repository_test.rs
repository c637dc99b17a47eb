use std::collections::HashSet;

use bson::oid::ObjectId;
use docrepo::filter::{all, field};
use docrepo::{Error, Update, UpdateOptions};
use docrepo_int_test::test_util::{create_datastore, Book, Note};

// =============================================================================
// BASIC REPOSITORY TESTS
// =============================================================================

#[tokio::test]
async fn insert_assigns_a_unique_identifier() {
    let datastore = create_datastore();
    let repo = datastore.repository::<Book>();

    let mut ids = HashSet::new();
    for index in 0..10 {
        let book = Book::new(&format!("title-{}", index), "someone", 100);
        assert!(book.id.is_none());
        let id = repo.insert_one(&book).await.unwrap();
        assert!(!id.to_hex().is_empty());
        assert!(ids.insert(id), "identifier {} assigned twice", id);
    }

    let stored = repo.read_all().await.unwrap();
    assert_eq!(stored.len(), 10);
    assert!(stored.iter().all(|book| book.id.is_some()));
}

#[tokio::test]
async fn insert_keeps_a_preset_identifier() {
    let datastore = create_datastore();
    let repo = datastore.repository::<Book>();

    let mut book = Book::new("preset", "someone", 1);
    let preset = ObjectId::new();
    book.id = Some(preset);

    let id = repo.insert_one(&book).await.unwrap();
    assert_eq!(id, preset);

    let found = repo.find_by_id(&preset.to_hex()).await.unwrap().unwrap();
    assert_eq!(found.title, "preset");
}

#[tokio::test]
async fn insert_many_returns_identifiers_in_input_order() {
    let datastore = create_datastore();
    let repo = datastore.repository::<Book>();

    let books = vec![
        Book::new("a", "x", 1),
        Book::new("b", "y", 2),
        Book::new("c", "z", 3),
    ];
    let ids = repo.insert_many(&books).await.unwrap();
    assert_eq!(ids.len(), 3);

    for (id, title) in ids.iter().zip(["a", "b", "c"]) {
        let found = repo.find_by_id(&id.to_hex()).await.unwrap().unwrap();
        assert_eq!(found.title, title);
    }
}

#[tokio::test]
async fn read_all_returns_every_document() {
    let datastore = create_datastore();
    let repo = datastore.repository::<Book>();
    assert!(repo.read_all().await.unwrap().is_empty());

    repo.insert_many(&[Book::new("a", "x", 1), Book::new("b", "y", 2)])
        .await
        .unwrap();
    let all_books = repo.read_all().await.unwrap();
    assert_eq!(all_books.len(), 2);
}

#[tokio::test]
async fn find_one_returns_first_match_or_none() {
    let datastore = create_datastore();
    let repo = datastore.repository::<Book>();
    repo.insert_many(&[Book::new("a", "x", 1), Book::new("b", "y", 2)])
        .await
        .unwrap();

    let found = repo.find_one(field("title").eq("b")).await.unwrap();
    assert_eq!(found.unwrap().author, "y");

    let missing = repo.find_one(field("title").eq("zzz")).await.unwrap();
    assert!(missing.is_none());
}

// =============================================================================
// FIND BY IDENTIFIER
// =============================================================================

#[tokio::test]
async fn find_by_id_on_unknown_but_well_formed_id_is_absent() {
    let datastore = create_datastore();
    let repo = datastore.repository::<Book>();
    repo.insert_one(&Book::new("a", "x", 1)).await.unwrap();

    let unknown = ObjectId::new().to_hex();
    let result = repo.find_by_id(&unknown).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn find_by_id_on_malformed_id_fails() {
    let datastore = create_datastore();
    let repo = datastore.repository::<Book>();

    let result = repo.find_by_id("definitely-not-an-object-id").await;
    assert!(matches!(result, Err(Error::InvalidId(_))));
}

// =============================================================================
// UPDATE
// =============================================================================

#[tokio::test]
async fn update_one_modifies_only_the_first_match() {
    let datastore = create_datastore();
    let repo = datastore.repository::<Book>();
    repo.insert_many(&[Book::new("a", "x", 1), Book::new("b", "x", 2)])
        .await
        .unwrap();

    let modified = repo
        .update_one(
            field("author").eq("x"),
            &Update::new().set("author", "updated"),
            &UpdateOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(modified, 1);
    assert_eq!(repo.count(field("author").eq("updated")).await.unwrap(), 1);
}

#[tokio::test]
async fn update_many_modifies_all_matches() {
    let datastore = create_datastore();
    let repo = datastore.repository::<Book>();
    repo.insert_many(&[
        Book::new("a", "x", 1),
        Book::new("b", "x", 2),
        Book::new("c", "y", 3),
    ])
    .await
    .unwrap();

    let modified = repo
        .update_many(
            field("author").eq("x"),
            &Update::new().inc("pages", 10),
            &UpdateOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(modified, 2);

    let a = repo.find_one(field("title").eq("a")).await.unwrap().unwrap();
    assert_eq!(a.pages, 11);
}

#[tokio::test]
async fn upsert_inserts_when_nothing_matches() {
    let datastore = create_datastore();
    let repo = datastore.repository::<Book>();

    let modified = repo
        .update_one(
            field("title").eq("ghost"),
            &Update::new()
                .set("author", "nobody")
                .set("pages", 0_i64)
                .set("created_at", bson::DateTime::now()),
            &docrepo::update_options::upsert(),
        )
        .await
        .unwrap();
    assert_eq!(modified, 0);

    let upserted = repo.find_one(field("title").eq("ghost")).await.unwrap().unwrap();
    assert_eq!(upserted.author, "nobody");
    assert!(upserted.id.is_some());
}

// =============================================================================
// REPLACE
// =============================================================================

#[tokio::test]
async fn replace_swaps_the_whole_document_and_keeps_the_id() {
    let datastore = create_datastore();
    let repo = datastore.repository::<Book>();

    let mut book = Book::new("before", "x", 1);
    let id = repo.insert_one(&book).await.unwrap();
    book.id = Some(id);
    book.title = "after".to_string();
    book.pages = 99;

    let previous = repo.replace_one(&book).await.unwrap().unwrap();
    assert_eq!(previous.title, "before");

    let current = repo.find_by_id(&id.to_hex()).await.unwrap().unwrap();
    assert_eq!(current.title, "after");
    assert_eq!(current.pages, 99);
    assert_eq!(current.id, Some(id));
}

#[tokio::test]
async fn replace_without_identifier_is_absent() {
    let datastore = create_datastore();
    let repo = datastore.repository::<Book>();
    let book = Book::new("no-id", "x", 1);
    assert!(repo.replace_one(&book).await.unwrap().is_none());
}

#[tokio::test]
async fn replace_twice_is_idempotent_safe() {
    let datastore = create_datastore();
    let repo = datastore.repository::<Book>();

    let mut book = Book::new("v1", "x", 1);
    let id = repo.insert_one(&book).await.unwrap();
    book.id = Some(id);
    book.title = "v2".to_string();

    assert!(repo.replace_one(&book).await.unwrap().is_some());
    // remove it, then replace again: absent result, not a failure
    repo.delete_by_id(&id.to_hex()).await.unwrap();
    assert!(repo.replace_one(&book).await.unwrap().is_none());
}

// =============================================================================
// DELETE
// =============================================================================

#[tokio::test]
async fn delete_one_and_many_report_counts() {
    let datastore = create_datastore();
    let repo = datastore.repository::<Book>();
    repo.insert_many(&[
        Book::new("a", "x", 1),
        Book::new("b", "x", 2),
        Book::new("c", "y", 3),
    ])
    .await
    .unwrap();

    assert_eq!(repo.delete_one(field("author").eq("x")).await.unwrap(), 1);
    assert_eq!(repo.delete_many(all()).await.unwrap(), 2);
    assert_eq!(repo.count(all()).await.unwrap(), 0);
}

#[tokio::test]
async fn find_one_and_delete_returns_the_removed_document() {
    let datastore = create_datastore();
    let repo = datastore.repository::<Book>();
    repo.insert_one(&Book::new("doomed", "x", 1)).await.unwrap();

    let removed = repo
        .find_one_and_delete(field("title").eq("doomed"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(removed.title, "doomed");
    assert_eq!(repo.count(all()).await.unwrap(), 0);
}

#[tokio::test]
async fn delete_by_id_twice_is_idempotent_safe() {
    let datastore = create_datastore();
    let repo = datastore.repository::<Book>();
    let id = repo.insert_one(&Book::new("a", "x", 1)).await.unwrap();

    let removed = repo.delete_by_id(&id.to_hex()).await.unwrap();
    assert_eq!(removed.unwrap().title, "a");

    let removed_again = repo.delete_by_id(&id.to_hex()).await.unwrap();
    assert!(removed_again.is_none());
}

#[tokio::test]
async fn delete_by_id_on_malformed_id_fails() {
    let datastore = create_datastore();
    let repo = datastore.repository::<Book>();
    let result = repo.delete_by_id("nope").await;
    assert!(matches!(result, Err(Error::InvalidId(_))));
}

// =============================================================================
// COLLECTION ISOLATION
// =============================================================================

#[tokio::test]
async fn entity_types_live_in_separate_collections() {
    let datastore = create_datastore();
    let books = datastore.repository::<Book>();
    let notes = datastore.repository::<Note>();

    books.insert_one(&Book::new("a", "x", 1)).await.unwrap();
    notes.insert_one(&Note::new("remember")).await.unwrap();

    assert_eq!(books.count(all()).await.unwrap(), 1);
    assert_eq!(notes.count(all()).await.unwrap(), 1);
    notes.delete_many(all()).await.unwrap();
    assert_eq!(books.count(all()).await.unwrap(), 1);
}

#[tokio::test]
async fn repository_with_name_overrides_the_binding() {
    let datastore = create_datastore();
    let archive = datastore.repository_with_name::<Book>("archived_books");
    let live = datastore.repository::<Book>();

    archive.insert_one(&Book::new("old", "x", 1)).await.unwrap();
    assert_eq!(archive.count(all()).await.unwrap(), 1);
    assert_eq!(live.count(all()).await.unwrap(), 0);
    assert_eq!(archive.collection_name(), "archived_books");
}
