use std::error::Error as StdError;

/// Boxed error type used to carry backend failures through unchanged.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Error type for repository operations.
///
/// The repository deliberately carries no error taxonomy of its own: backend
/// failures are boxed and passed through untranslated, identifier and codec
/// failures keep their source errors. A missing document is never an error;
/// single-document lookups return `Ok(None)` instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The string form of an identifier is not a valid identifier encoding.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] bson::oid::Error),

    /// An entity could not be encoded into a document.
    #[error("serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),

    /// A document could not be decoded into the requested type.
    #[error("deserialization error: {0}")]
    Deserialization(#[from] bson::de::Error),

    /// A filter could not be evaluated (e.g. an invalid regex pattern).
    #[error("filter error: {0}")]
    Filter(String),

    /// An update operation could not be applied to a document.
    #[error("update error: {0}")]
    Update(String),

    /// The connection to the backing store could not be established.
    #[error("connection error: {0}")]
    Connection(#[source] BoxedError),

    /// The backing store reported a failure; carried through unchanged.
    #[error("store error: {0}")]
    Store(#[source] BoxedError),
}

/// A result type alias for repository operations.
pub type Result<T> = std::result::Result<T, Error>;
