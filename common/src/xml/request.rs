//! Request bodies.

use serde::Serialize;

use crate::errors::{AppError, AppResult};
use crate::models::Credentials;

#[derive(Serialize)]
#[serde(rename = "tsRequest")]
struct SignInRequest<'a> {
    credentials: CredentialsXml<'a>,
}

#[derive(Serialize)]
struct CredentialsXml<'a> {
    #[serde(rename = "@name")]
    name: &'a str,
    #[serde(rename = "@password")]
    password: &'a str,
    site: SiteXml<'a>,
}

#[derive(Serialize)]
struct SiteXml<'a> {
    #[serde(rename = "@contentUrl")]
    content_url: &'a str,
}

#[derive(Serialize)]
#[serde(rename = "tsRequest")]
struct UpdateConnectionRequest<'a> {
    connection: ConnectionPasswordXml<'a>,
}

#[derive(Serialize)]
struct ConnectionPasswordXml<'a> {
    #[serde(rename = "@password")]
    password: &'a str,
}

/// Builds the sign-in body:
/// `<tsRequest><credentials name=".." password=".."><site contentUrl=".."/></credentials></tsRequest>`.
pub fn sign_in_body(credentials: &Credentials) -> AppResult<String> {
    let request = SignInRequest {
        credentials: CredentialsXml {
            name: &credentials.username,
            password: &credentials.password,
            site: SiteXml {
                content_url: &credentials.site,
            },
        },
    };
    quick_xml::se::to_string(&request)
        .map_err(|e| AppError::Decode(format!("failed to encode sign-in request: {}", e)))
}

/// Builds the connection update body:
/// `<tsRequest><connection password=".."/></tsRequest>`.
pub fn update_connection_body(new_password: &str) -> AppResult<String> {
    let request = UpdateConnectionRequest {
        connection: ConnectionPasswordXml {
            password: new_password,
        },
    };
    quick_xml::se::to_string(&request)
        .map_err(|e| AppError::Decode(format!("failed to encode connection update: {}", e)))
}
