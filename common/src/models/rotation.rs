//! Rotation request and report models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use super::resource::ResourceKind;
use crate::errors::{AppError, AppResult};

/// Operator-supplied rotation input.
#[derive(Clone, Validate)]
pub struct RotationRequest {
    /// Database environment name, matched against connection server addresses.
    #[validate(length(min = 1, message = "environment name must not be empty"))]
    pub environment: String,
    /// New database password.
    #[validate(length(min = 1, message = "new password must not be empty"))]
    pub new_password: String,
}

impl RotationRequest {
    /// Creates a validated rotation request.
    ///
    /// # Errors
    /// Returns `AppError::Config` if either field is empty.
    pub fn new(environment: impl Into<String>, new_password: impl Into<String>) -> AppResult<Self> {
        let request = Self {
            environment: environment.into(),
            new_password: new_password.into(),
        };
        request
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;
        Ok(request)
    }
}

impl std::fmt::Debug for RotationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotationRequest")
            .field("environment", &self.environment)
            .field("new_password", &"<redacted>")
            .finish()
    }
}

/// A connection whose password was replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatedConnection {
    /// Owning resource kind.
    pub resource_kind: ResourceKind,
    /// Owning resource identifier.
    pub resource_id: String,
    /// Connection identifier.
    pub connection_id: String,
}

/// The workbook selected for rotation and the connections updated in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkbookRotation {
    /// Workbook identifier.
    pub workbook_id: String,
    /// Workbook display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workbook_name: Option<String>,
    /// Server address of the workbook's first connection.
    pub server_address: String,
    /// Updated connection identifiers, in update order.
    pub connection_ids: Vec<String>,
}

/// Summary of a completed rotation run.
#[derive(Debug, Clone, Serialize)]
pub struct RotationReport {
    /// Unique run identifier, also attached to the tracing span.
    pub run_id: Uuid,
    /// Target environment name.
    pub environment: String,
    /// Run start time.
    pub started_at: DateTime<Utc>,
    /// Run completion time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Updated data source connections.
    pub datasources: Vec<UpdatedConnection>,
    /// Rotated workbook, if any matched.
    pub workbook: Option<WorkbookRotation>,
}

impl RotationReport {
    /// Starts an empty report for `environment`.
    pub fn start(run_id: Uuid, environment: impl Into<String>) -> Self {
        Self {
            run_id,
            environment: environment.into(),
            started_at: Utc::now(),
            finished_at: None,
            datasources: Vec::new(),
            workbook: None,
        }
    }

    /// Marks the report as finished.
    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    /// Total number of connection updates issued.
    pub fn updated_count(&self) -> usize {
        self.datasources.len()
            + self
                .workbook
                .as_ref()
                .map_or(0, |wb| wb.connection_ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_rejects_empty_fields() {
        assert!(matches!(RotationRequest::new("", "secret"), Err(AppError::Config(_))));
        assert!(matches!(RotationRequest::new("HRDB", ""), Err(AppError::Config(_))));
        assert!(RotationRequest::new("HRDB", "p@ss").is_ok());
    }

    #[test]
    fn test_request_debug_redacts_password() {
        let request = RotationRequest::new("HRDB", "p@ss").unwrap();
        assert!(!format!("{:?}", request).contains("p@ss"));
    }

    #[test]
    fn test_updated_count() {
        let mut report = RotationReport::start(Uuid::new_v4(), "HRDB");
        report.datasources.push(UpdatedConnection {
            resource_kind: ResourceKind::DataSource,
            resource_id: "D1".into(),
            connection_id: "C1".into(),
        });
        report.workbook = Some(WorkbookRotation {
            workbook_id: "W1".into(),
            workbook_name: None,
            server_address: "HRDB".into(),
            connection_ids: vec!["C2".into(), "C3".into()],
        });
        let report = report.finish();
        assert_eq!(report.updated_count(), 3);
        assert!(report.finished_at.is_some());
    }
}
