/// Options for controlling update operations.
///
/// ```ignore
/// use docrepo::update_options::upsert;
///
/// // Insert a new document when nothing matches the filter
/// let options = upsert();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    upsert: bool,
}

impl UpdateOptions {
    /// Creates new `UpdateOptions` with the specified behavior.
    ///
    /// # Arguments
    ///
    /// * `upsert` - If true, insert a new document when no matches are found
    pub fn new(upsert: bool) -> Self {
        Self { upsert }
    }

    /// Returns whether to insert when no matching documents are found.
    pub fn is_upsert(&self) -> bool {
        self.upsert
    }
}

/// Creates `UpdateOptions` with upsert behavior.
///
/// If no documents match the update filter, a new document will be inserted.
pub fn upsert() -> UpdateOptions {
    UpdateOptions::new(true)
}
