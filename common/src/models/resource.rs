//! Published resources: data sources and workbooks.

use serde::{Deserialize, Serialize};

use super::connection::Connection;

/// Kind of published resource that owns connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Published data source.
    DataSource,
    /// Published workbook.
    Workbook,
}

impl ResourceKind {
    /// URL path segment for this resource kind.
    pub fn path_segment(&self) -> &'static str {
        match self {
            ResourceKind::DataSource => "datasources",
            ResourceKind::Workbook => "workbooks",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::DataSource => write!(f, "datasource"),
            ResourceKind::Workbook => write!(f, "workbook"),
        }
    }
}

/// A published data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    /// Data source identifier.
    pub id: String,
    /// Connections, empty until resolved.
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl DataSource {
    /// Creates a data source with no resolved connections.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            connections: Vec::new(),
        }
    }
}

/// A published workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    /// Workbook identifier.
    pub id: String,
    /// Workbook display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Connections, empty until resolved.
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Workbook {
    /// Creates a workbook with no resolved connections.
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: id.into(),
            name,
            connections: Vec::new(),
        }
    }
}
