use bson::oid::ObjectId;
use bson::DateTime;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Trait that defines the identity contract a type must satisfy to be stored.
///
/// # Purpose
/// Every stored entity carries a store-assigned unique identifier and a
/// creation timestamp (UTC). Everything else about the type is opaque to the
/// repository; additional fields travel through serde untouched.
///
/// # Characteristics
/// - The identifier is `None` until the store assigns one on insert and is
///   immutable afterwards. It serializes as the `_id` field and must be
///   omitted when absent:
///   `#[serde(rename = "_id", skip_serializing_if = "Option::is_none")]`.
/// - The creation timestamp should default to [`DateTime::now`] in the
///   entity's constructor.
/// - The collection name defaults to the type's own name and can be
///   overridden with `#[entity(collection = "...")]`.
///
/// Typically implemented via the `Entity` derive macro from `docrepo_derive`,
/// not by hand.
///
/// # Usage
/// ```ignore
/// use docrepo_derive::Entity;
///
/// #[derive(Entity, Serialize, Deserialize)]
/// #[entity(collection = "books")]
/// pub struct Book {
///     #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
///     id: Option<ObjectId>,
///     created_at: DateTime,
///     title: String,
/// }
/// ```
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// Returns the name of the collection this entity type is stored in.
    ///
    /// # Behavior
    /// - Defaults to the struct name if not customized via
    ///   `#[entity(collection = "...")]`
    /// - Resolved once at repository construction
    fn collection_name() -> &'static str;

    /// Returns the entity's identifier, or `None` if it has not been
    /// persisted yet.
    fn id(&self) -> Option<ObjectId>;

    /// Sets the entity's identifier. Called when the store assigns one.
    fn set_id(&mut self, id: ObjectId);

    /// Returns the creation timestamp (UTC).
    fn created_at(&self) -> DateTime;

    /// Sets the creation timestamp.
    fn set_created_at(&mut self, created_at: DateTime);
}
