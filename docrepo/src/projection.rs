use bson::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProjectionMode {
    Include,
    Exclude,
}

/// A field selector reshaping result documents.
///
/// A projection either includes a fixed set of fields (the identifier is
/// retained unless excluded explicitly, as the store does) or excludes a
/// fixed set. The projection is data; each backend interprets it natively.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    fields: Vec<String>,
    mode: ProjectionMode,
}

impl Projection {
    /// Keeps only the listed fields (plus `_id`).
    pub fn include<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection {
            fields: fields.into_iter().map(Into::into).collect(),
            mode: ProjectionMode::Include,
        }
    }

    /// Drops the listed fields and keeps everything else.
    pub fn exclude<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection {
            fields: fields.into_iter().map(Into::into).collect(),
            mode: ProjectionMode::Exclude,
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn is_include(&self) -> bool {
        self.mode == ProjectionMode::Include
    }

    /// Applies the projection to a document, producing the reshaped copy.
    ///
    /// In-memory interpreter; store adapters translate the projection into
    /// their own field-selection syntax instead.
    pub fn apply(&self, document: &Document) -> Document {
        match self.mode {
            ProjectionMode::Include => {
                let mut projected = Document::new();
                if let Some(id) = document.get("_id") {
                    projected.insert("_id", id.clone());
                }
                for field in &self.fields {
                    if let Some(value) = document.get(field) {
                        projected.insert(field.clone(), value.clone());
                    }
                }
                projected
            }
            ProjectionMode::Exclude => {
                let mut projected = document.clone();
                for field in &self.fields {
                    projected.remove(field);
                }
                projected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use bson::oid::ObjectId;

    #[test]
    fn include_keeps_listed_fields_and_id() {
        let id = ObjectId::new();
        let doc = doc! { "_id": id, "name": "Alice", "age": 34, "secret": "x" };
        let projected = Projection::include(["name"]).apply(&doc);
        assert_eq!(projected, doc! { "_id": id, "name": "Alice" });
    }

    #[test]
    fn include_skips_missing_fields() {
        let doc = doc! { "name": "Alice" };
        let projected = Projection::include(["name", "missing"]).apply(&doc);
        assert_eq!(projected, doc! { "name": "Alice" });
    }

    #[test]
    fn exclude_drops_listed_fields() {
        let doc = doc! { "name": "Alice", "age": 34, "secret": "x" };
        let projected = Projection::exclude(["secret"]).apply(&doc);
        assert_eq!(projected, doc! { "name": "Alice", "age": 34 });
    }

    #[test]
    fn exclude_can_drop_the_id() {
        let doc = doc! { "_id": ObjectId::new(), "name": "Alice" };
        let projected = Projection::exclude(["_id"]).apply(&doc);
        assert_eq!(projected, doc! { "name": "Alice" });
    }
}
