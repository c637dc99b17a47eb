use std::marker::PhantomData;

use bson::Document;
use serde::de::DeserializeOwned;

use crate::errors::Result;

/// A lazily-converting cursor over query results.
///
/// The backing documents have already been fetched; conversion into the
/// target type happens one document at a time as the cursor is iterated, so
/// decoding work (and decoding failures) surface per item. The same cursor
/// type backs entity reads and projected reads, and iterates identically in
/// async and blocking code.
pub struct Cursor<T> {
    documents: std::vec::IntoIter<Document>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Cursor<T> {
    pub(crate) fn new(documents: Vec<Document>) -> Self {
        Cursor {
            documents: documents.into_iter(),
            _marker: PhantomData,
        }
    }

    /// Returns the first result, consuming the cursor.
    pub fn first(mut self) -> Option<Result<T>> {
        self.next()
    }
}

impl<T: DeserializeOwned> Iterator for Cursor<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let document = self.documents.next()?;
        Some(bson::from_document(document).map_err(Into::into))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.documents.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[test]
    fn converts_lazily_per_item() {
        let cursor: Cursor<Named> = Cursor::new(vec![
            doc! { "name": "a" },
            doc! { "wrong_field": 1 },
            doc! { "name": "b" },
        ]);
        let results: Vec<Result<Named>> = cursor.collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }

    #[test]
    fn first_consumes_the_cursor() {
        let cursor: Cursor<Named> = Cursor::new(vec![doc! { "name": "a" }]);
        let first = cursor.first().unwrap().unwrap();
        assert_eq!(first, Named { name: "a".to_string() });

        let empty: Cursor<Named> = Cursor::new(vec![]);
        assert!(empty.first().is_none());
    }

    #[test]
    fn collects_into_result_vec() {
        let cursor: Cursor<Named> = Cursor::new(vec![doc! { "name": "a" }, doc! { "name": "b" }]);
        let items: Result<Vec<Named>> = cursor.collect();
        assert_eq!(items.unwrap().len(), 2);
    }
}
