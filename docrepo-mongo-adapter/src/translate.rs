//! Translation of the neutral filter/update/projection value trees into
//! BSON operator documents.

use bson::{doc, Bson, Document};
use docrepo::filter::Filter;
use docrepo::update::{FieldOp, Update};
use docrepo::{Projection, SortOrder};

pub(crate) fn filter_document(filter: &Filter) -> Document {
    match filter {
        Filter::All => Document::new(),
        Filter::And(filters) => doc! { "$and": subfilters(filters) },
        Filter::Or(filters) => doc! { "$or": subfilters(filters) },
        Filter::Not(inner) => doc! { "$nor": [filter_document(inner)] },
        Filter::Eq { field, value } => operator(field, "$eq", value.clone()),
        Filter::Ne { field, value } => operator(field, "$ne", value.clone()),
        Filter::Gt { field, value } => operator(field, "$gt", value.clone()),
        Filter::Gte { field, value } => operator(field, "$gte", value.clone()),
        Filter::Lt { field, value } => operator(field, "$lt", value.clone()),
        Filter::Lte { field, value } => operator(field, "$lte", value.clone()),
        Filter::In { field, values } => operator(field, "$in", Bson::Array(values.clone())),
        Filter::NotIn { field, values } => operator(field, "$nin", Bson::Array(values.clone())),
        Filter::Exists { field, exists } => operator(field, "$exists", Bson::Boolean(*exists)),
        Filter::Regex { field, pattern } => operator(field, "$regex", Bson::String(pattern.clone())),
    }
}

fn subfilters(filters: &[Filter]) -> Vec<Bson> {
    filters
        .iter()
        .map(|filter| Bson::Document(filter_document(filter)))
        .collect()
}

fn operator(field: &str, op: &str, value: Bson) -> Document {
    let mut condition = Document::new();
    condition.insert(op, value);
    let mut document = Document::new();
    document.insert(field, condition);
    document
}

pub(crate) fn update_document(update: &Update) -> Document {
    let mut set = Document::new();
    let mut unset = Document::new();
    let mut inc = Document::new();
    let mut mul = Document::new();
    let mut rename = Document::new();
    let mut push = Document::new();
    let mut pull = Document::new();
    let mut add_to_set = Document::new();

    for op in update.ops() {
        match op {
            FieldOp::Set { field, value } => {
                set.insert(field.clone(), value.clone());
            }
            FieldOp::Unset { field } => {
                unset.insert(field.clone(), Bson::String(String::new()));
            }
            FieldOp::Inc { field, by } => {
                inc.insert(field.clone(), by.clone());
            }
            FieldOp::Mul { field, by } => {
                mul.insert(field.clone(), by.clone());
            }
            FieldOp::Rename { field, to } => {
                rename.insert(field.clone(), Bson::String(to.clone()));
            }
            FieldOp::Push { field, value } => {
                push.insert(field.clone(), value.clone());
            }
            FieldOp::Pull { field, value } => {
                pull.insert(field.clone(), value.clone());
            }
            FieldOp::AddToSet { field, value } => {
                add_to_set.insert(field.clone(), value.clone());
            }
        }
    }

    let mut document = Document::new();
    for (name, group) in [
        ("$set", set),
        ("$unset", unset),
        ("$inc", inc),
        ("$mul", mul),
        ("$rename", rename),
        ("$push", push),
        ("$pull", pull),
        ("$addToSet", add_to_set),
    ] {
        if !group.is_empty() {
            document.insert(name, group);
        }
    }
    document
}

pub(crate) fn sort_document(sort: &[(String, SortOrder)]) -> Document {
    let mut document = Document::new();
    for (field, order) in sort {
        let direction = match order {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        };
        document.insert(field.clone(), direction);
    }
    document
}

pub(crate) fn projection_document(projection: &Projection) -> Document {
    let flag = if projection.is_include() { 1 } else { 0 };
    let mut document = Document::new();
    for field in projection.fields() {
        document.insert(field.clone(), flag);
    }
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use docrepo::filter::{all, and, field, not, or};

    #[test]
    fn all_is_the_empty_document() {
        assert_eq!(filter_document(&all()), Document::new());
    }

    #[test]
    fn comparison_filters_use_operator_documents() {
        assert_eq!(
            filter_document(&field("age").gt(21)),
            doc! { "age": { "$gt": 21 } }
        );
        assert_eq!(
            filter_document(&field("name").eq("Alice")),
            doc! { "name": { "$eq": "Alice" } }
        );
        assert_eq!(
            filter_document(&field("tag").in_array(vec!["a", "b"])),
            doc! { "tag": { "$in": ["a", "b"] } }
        );
        assert_eq!(
            filter_document(&field("flag").exists(false)),
            doc! { "flag": { "$exists": false } }
        );
        assert_eq!(
            filter_document(&field("name").regex("^A")),
            doc! { "name": { "$regex": "^A" } }
        );
    }

    #[test]
    fn logical_filters_nest() {
        let filter = and(vec![field("a").eq(1), field("b").gt(2)]);
        assert_eq!(
            filter_document(&filter),
            doc! { "$and": [ { "a": { "$eq": 1 } }, { "b": { "$gt": 2 } } ] }
        );

        let filter = or(vec![field("a").eq(1), field("b").eq(2)]);
        assert_eq!(
            filter_document(&filter),
            doc! { "$or": [ { "a": { "$eq": 1 } }, { "b": { "$eq": 2 } } ] }
        );

        let filter = not(field("a").eq(1));
        assert_eq!(
            filter_document(&filter),
            doc! { "$nor": [ { "a": { "$eq": 1 } } ] }
        );
    }

    #[test]
    fn update_operations_group_by_operator() {
        let update = Update::new()
            .set("title", "x")
            .set("state", "done")
            .unset("draft")
            .inc("revision", 1)
            .push("tags", "new");
        assert_eq!(
            update_document(&update),
            doc! {
                "$set": { "title": "x", "state": "done" },
                "$unset": { "draft": "" },
                "$inc": { "revision": 1 },
                "$push": { "tags": "new" },
            }
        );
    }

    #[test]
    fn rename_and_array_operations() {
        let update = Update::new()
            .rename("old", "new")
            .pull("tags", "stale")
            .add_to_set("tags", "fresh")
            .mul("score", 2);
        assert_eq!(
            update_document(&update),
            doc! {
                "$mul": { "score": 2 },
                "$rename": { "old": "new" },
                "$pull": { "tags": "stale" },
                "$addToSet": { "tags": "fresh" },
            }
        );
    }

    #[test]
    fn empty_update_translates_to_empty_document() {
        assert_eq!(update_document(&Update::new()), Document::new());
    }

    #[test]
    fn sort_translates_directions() {
        let sort = vec![
            ("age".to_string(), SortOrder::Descending),
            ("name".to_string(), SortOrder::Ascending),
        ];
        assert_eq!(sort_document(&sort), doc! { "age": -1, "name": 1 });
    }

    #[test]
    fn projections_translate_to_flags() {
        assert_eq!(
            projection_document(&Projection::include(["name", "age"])),
            doc! { "name": 1, "age": 1 }
        );
        assert_eq!(
            projection_document(&Projection::exclude(["secret"])),
            doc! { "secret": 0 }
        );
    }
}
