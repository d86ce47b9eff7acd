//! Connection selection rules.
//!
//! Data sources: every connection whose server address equals the target
//! environment is selected.
//!
//! Workbooks: a workbook is only eligible when all of its connections share a
//! single `type` value. Mixed-type workbooks are skipped, never partially
//! updated. An eligible workbook is selected when its first connection points
//! at the target environment; the caller stops at the first selected workbook
//! in listing order.

use common::models::Connection;

/// Outcome of evaluating one workbook's connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkbookVerdict<'a> {
    /// The workbook has no connections.
    NoConnections,
    /// Connection types differ; the workbook is skipped.
    MixedTypes,
    /// Connections are homogeneous but not of the required type.
    UnexpectedType,
    /// The first connection points elsewhere.
    OtherEnvironment,
    /// The workbook is a rotation target.
    Selected {
        /// Address of the first connection.
        server_address: &'a str,
        /// Every connection id in the workbook, in listing order.
        connection_ids: Vec<&'a str>,
    },
}

/// Ids of the connections that point at `environment`.
///
/// Matching connections without an id cannot be addressed and are left out.
pub fn matching_connection_ids<'a>(connections: &'a [Connection], environment: &str) -> Vec<&'a str> {
    connections
        .iter()
        .filter(|c| c.points_at(environment))
        .filter_map(|c| {
            if c.id.is_none() {
                tracing::warn!(environment, "Matching connection has no id, skipping");
            }
            c.id.as_deref()
        })
        .collect()
}

/// Returns true if there is at least one connection and all types are equal.
pub fn is_homogeneous(connections: &[Connection]) -> bool {
    match connections.split_first() {
        Some((first, rest)) => rest
            .iter()
            .all(|c| c.connection_type == first.connection_type),
        None => false,
    }
}

/// Evaluates a workbook against the target environment.
///
/// `required_type`, when set, must equal the shared connection type.
pub fn evaluate_workbook<'a>(
    connections: &'a [Connection],
    environment: &str,
    required_type: Option<&str>,
) -> WorkbookVerdict<'a> {
    let Some(first) = connections.first() else {
        return WorkbookVerdict::NoConnections;
    };
    if !is_homogeneous(connections) {
        return WorkbookVerdict::MixedTypes;
    }
    if let Some(required) = required_type {
        if first.connection_type.as_deref() != Some(required) {
            return WorkbookVerdict::UnexpectedType;
        }
    }
    match first.server_address.as_deref() {
        Some(address) if address == environment => WorkbookVerdict::Selected {
            server_address: address,
            connection_ids: connections
                .iter()
                .filter_map(|c| {
                    if c.id.is_none() {
                        tracing::warn!(environment, "Workbook connection has no id, skipping");
                    }
                    c.id.as_deref()
                })
                .collect(),
        },
        _ => WorkbookVerdict::OtherEnvironment,
    }
}
