//! Shared building blocks for the credential rotation tooling.
//!
//! - `config`: runtime configuration loaded once at startup
//! - `errors`: error taxonomy shared by every component
//! - `models`: sessions, resources, connections and rotation results
//! - `xml`: Tableau REST API request/response codec
//! - `utils`: small display helpers

pub mod config;
pub mod errors;
pub mod models;
pub mod utils;
pub mod xml;

pub use errors::{ApiError, AppError, AppResult};
