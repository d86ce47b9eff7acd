//! Tableau credential rotation.
//!
//! Signs in to a Tableau server, replaces the stored database password on
//! every data source connection that points at the target environment and on
//! the first matching workbook, then signs out.

pub mod cli;
pub mod client;
pub mod filter;
pub mod service;
pub mod state;
pub mod validator;

pub use client::{TableauApi, TableauClient};
pub use service::RotationService;
pub use state::AppState;
