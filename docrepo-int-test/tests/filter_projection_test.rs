use docrepo::filter::{all, and, field, not, or};
use docrepo::{FindOptions, Projection, SortOrder};
use docrepo_int_test::test_util::{create_datastore, Book};
use serde::Deserialize;

async fn seeded() -> (docrepo::Datastore, docrepo::Repository<Book>) {
    let datastore = create_datastore();
    let repo = datastore.repository::<Book>();
    repo.insert_many(&[
        Book::new("Dune", "Herbert", 412),
        Book::new("Emma", "Austen", 474),
        Book::new("Persuasion", "Austen", 249),
        Book::new("Hyperion", "Simmons", 482),
    ])
    .await
    .unwrap();
    (datastore, repo)
}

#[tokio::test]
async fn filters_compose() {
    let (_ds, repo) = seeded().await;

    let austen_long = and(vec![field("author").eq("Austen"), field("pages").gt(300)]);
    let found: Vec<Book> = repo.find(austen_long).await.unwrap().collect::<Result<_, _>>().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Emma");

    let either = or(vec![field("title").eq("Dune"), field("title").eq("Hyperion")]);
    assert_eq!(repo.count(either).await.unwrap(), 2);

    let not_austen = not(field("author").eq("Austen"));
    assert_eq!(repo.count(not_austen).await.unwrap(), 2);

    let shortish = field("pages").in_array(vec![249, 412]);
    assert_eq!(repo.count(shortish).await.unwrap(), 2);

    let pattern = field("title").regex("^P");
    let found = repo.find_one(pattern).await.unwrap().unwrap();
    assert_eq!(found.title, "Persuasion");
}

#[tokio::test]
async fn find_with_options_sorts_skips_and_limits() {
    let (_ds, repo) = seeded().await;

    let options = FindOptions::new()
        .sort_by("pages", SortOrder::Descending)
        .skip(1)
        .limit(2);
    let found: Vec<Book> = repo
        .find_with_options(all(), options)
        .await
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    let pages: Vec<i64> = found.iter().map(|book| book.pages).collect();
    assert_eq!(pages, vec![474, 412]);
}

#[derive(Debug, Deserialize, PartialEq)]
struct TitleOnly {
    title: String,
}

#[tokio::test]
async fn projected_reads_reshape_matches() {
    let (_ds, repo) = seeded().await;

    let titles: Vec<TitleOnly> = repo
        .find_projected(field("author").eq("Austen"), Projection::include(["title"]))
        .await
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(titles.len(), 2);
    assert!(titles.contains(&TitleOnly { title: "Emma".to_string() }));

    let one: TitleOnly = repo
        .find_one_projected(field("pages").gt(480), Projection::include(["title"]))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(one.title, "Hyperion");
}

#[tokio::test]
async fn projected_read_of_no_match_is_absent() {
    let (_ds, repo) = seeded().await;
    let none: Option<TitleOnly> = repo
        .find_one_projected(field("title").eq("missing"), Projection::include(["title"]))
        .await
        .unwrap();
    assert!(none.is_none());
}

#[tokio::test]
async fn exclude_projection_drops_fields() {
    let (_ds, repo) = seeded().await;

    #[derive(Debug, Deserialize)]
    struct NoAuthor {
        title: String,
        author: Option<String>,
    }

    let stripped: Vec<NoAuthor> = repo
        .find_projected(field("title").eq("Dune"), Projection::exclude(["author"]))
        .await
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(stripped.len(), 1);
    assert_eq!(stripped[0].title, "Dune");
    assert!(stripped[0].author.is_none());
}

#[tokio::test]
async fn cursor_converts_lazily() {
    let (_ds, repo) = seeded().await;

    let mut cursor = repo.find(all()).await.unwrap();
    let first = cursor.next().expect("at least one result").unwrap();
    assert!(!first.title.is_empty());
    // remaining items are still pending conversion
    assert!(cursor.size_hint().0 >= 3);
}
