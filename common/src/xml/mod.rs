//! Tableau REST API XML codec.
//!
//! Requests are `tsRequest` documents built with serde; responses are
//! `tsResponse` documents read into lenient structs where every attribute is
//! optional, so a missing attribute becomes `None` instead of a parse failure.

pub mod request;
pub mod response;

pub use request::{sign_in_body, update_connection_body};
pub use response::{
    parse_api_error, parse_connections, parse_datasources, parse_sign_in, parse_workbooks, Page,
    SignInPayload,
};
