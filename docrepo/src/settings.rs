use serde::{Deserialize, Serialize};

/// Connection settings for a document store.
///
/// Carries the connection string and the database name, typically bound
/// from application configuration. The repository layer performs no
/// interpretation of the connection string; the driver parses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    connection_string: String,
    database: String,
}

impl StoreSettings {
    pub fn new(connection_string: impl Into<String>, database: impl Into<String>) -> Self {
        StoreSettings {
            connection_string: connection_string.into(),
            database: database.into(),
        }
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}
