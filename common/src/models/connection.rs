//! Connection models.
//!
//! A connection binds a published data source or workbook to a physical
//! database endpoint.

use serde::{Deserialize, Serialize};

/// One database binding inside a Tableau resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Connection identifier (absent only in malformed responses).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Database server address, compared against the target environment name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_address: Option<String>,
    /// Connection type such as `oracle`. Data source connections omit it.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
}

impl Connection {
    /// Creates a connection with an id and server address.
    pub fn new(id: impl Into<String>, server_address: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            server_address: Some(server_address.into()),
            connection_type: None,
        }
    }

    /// Sets the connection type.
    pub fn with_type(mut self, connection_type: impl Into<String>) -> Self {
        self.connection_type = Some(connection_type.into());
        self
    }

    /// Returns true if the server address equals `environment` exactly.
    ///
    /// The comparison is case-sensitive; a missing address never matches.
    pub fn points_at(&self, environment: &str) -> bool {
        self.server_address.as_deref() == Some(environment)
    }
}
