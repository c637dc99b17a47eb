/// One page of a paginated result set, together with the total page count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    total_pages: u64,
    items: Vec<T>,
}

impl<T> Page<T> {
    pub(crate) fn new(total_pages: u64, items: Vec<T>) -> Self {
        Page { total_pages, items }
    }

    /// Total number of pages for the query, `ceil(count / page_size)`.
    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// The documents on this page, in sort order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the page, returning its documents.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Splits the page into its total page count and documents.
    pub fn into_parts(self) -> (u64, Vec<T>) {
        (self.total_pages, self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let page = Page::new(3, vec![1, 2]);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.items(), &[1, 2]);
        assert_eq!(page.into_parts(), (3, vec![1, 2]));
    }
}
