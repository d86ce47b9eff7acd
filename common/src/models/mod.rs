//! Shared data models for the rotation workflow.

pub mod connection;
pub mod resource;
pub mod rotation;
pub mod session;

// Re-export commonly used types
pub use connection::Connection;
pub use resource::{DataSource, ResourceKind, Workbook};
pub use rotation::{RotationReport, RotationRequest, UpdatedConnection, WorkbookRotation};
pub use session::{Credentials, Session};
