//! MongoDB storage adapter for the docrepo generic repository.
//!
//! Implements the [`docrepo::store::DocumentStore`] seam over the official
//! `mongodb` driver. The neutral filter, update, and projection value trees
//! are translated into BSON operator documents at this boundary; driver
//! errors pass through boxed and untranslated.
//!
//! ```rust,ignore
//! use docrepo::StoreSettings;
//!
//! # async fn example() -> docrepo::Result<()> {
//! let settings = StoreSettings::new("mongodb://localhost:27017", "appdb");
//! let datastore = docrepo_mongo_adapter::connect(&settings).await?;
//! let books = datastore.repository::<Book>();
//! # Ok(())
//! # }
//! ```

mod store;
mod translate;

pub use store::{connect, MongoStore};
