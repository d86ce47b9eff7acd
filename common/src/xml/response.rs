//! Response bodies.

use serde::Deserialize;

use crate::errors::{ApiError, AppError, AppResult};
use crate::models::{Connection, DataSource, Workbook};

/// Identifiers extracted from a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInPayload {
    /// Authentication token.
    pub token: String,
    /// Site identifier.
    pub site_id: String,
    /// Signed-in user identifier.
    pub user_id: String,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total items reported by the server, when the response is paginated.
    pub total_available: Option<usize>,
}

#[derive(Deserialize)]
struct SignInResponse {
    credentials: Option<CredentialsXml>,
}

#[derive(Deserialize)]
struct CredentialsXml {
    #[serde(rename = "@token")]
    token: Option<String>,
    site: Option<IdXml>,
    user: Option<IdXml>,
}

#[derive(Deserialize)]
struct IdXml {
    #[serde(rename = "@id")]
    id: Option<String>,
}

#[derive(Deserialize)]
struct PaginationXml {
    #[serde(rename = "@totalAvailable")]
    total_available: Option<String>,
}

impl PaginationXml {
    fn total(&self) -> Option<usize> {
        self.total_available.as_deref().and_then(|v| v.trim().parse().ok())
    }
}

#[derive(Deserialize)]
struct DataSourcesResponse {
    pagination: Option<PaginationXml>,
    datasources: Option<DataSourcesXml>,
}

#[derive(Deserialize)]
struct DataSourcesXml {
    #[serde(default)]
    datasource: Vec<DataSourceXml>,
}

#[derive(Deserialize)]
struct DataSourceXml {
    #[serde(rename = "@id")]
    id: Option<String>,
}

#[derive(Deserialize)]
struct WorkbooksResponse {
    pagination: Option<PaginationXml>,
    workbooks: Option<WorkbooksXml>,
}

#[derive(Deserialize)]
struct WorkbooksXml {
    #[serde(default)]
    workbook: Vec<WorkbookXml>,
}

#[derive(Deserialize)]
struct WorkbookXml {
    #[serde(rename = "@id")]
    id: Option<String>,
    #[serde(rename = "@name")]
    name: Option<String>,
}

#[derive(Deserialize)]
struct ConnectionsResponse {
    connections: Option<ConnectionsXml>,
}

#[derive(Deserialize)]
struct ConnectionsXml {
    #[serde(default)]
    connection: Vec<ConnectionXml>,
}

#[derive(Deserialize)]
struct ConnectionXml {
    #[serde(rename = "@id")]
    id: Option<String>,
    #[serde(rename = "@serverAddress")]
    server_address: Option<String>,
    #[serde(rename = "@type")]
    connection_type: Option<String>,
}

impl From<ConnectionXml> for Connection {
    fn from(xml: ConnectionXml) -> Self {
        Connection {
            id: xml.id,
            server_address: xml.server_address,
            connection_type: xml.connection_type,
        }
    }
}

/// Error envelope. The error element may be the document root or nested
/// under `tsResponse`, so both shapes are captured.
#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(rename = "@code")]
    code: Option<String>,
    summary: Option<String>,
    detail: Option<String>,
    error: Option<ErrorXml>,
}

#[derive(Deserialize)]
struct ErrorXml {
    #[serde(rename = "@code")]
    code: Option<String>,
    summary: Option<String>,
    detail: Option<String>,
}

fn decode<'de, T: Deserialize<'de>>(body: &'de str, what: &str) -> AppResult<T> {
    quick_xml::de::from_str(body)
        .map_err(|e| AppError::Decode(format!("invalid {} response: {}", what, e)))
}

/// Parses a sign-in response.
///
/// # Errors
/// Returns `AppError::Decode` if the token, site id or user id is missing.
pub fn parse_sign_in(body: &str) -> AppResult<SignInPayload> {
    let response: SignInResponse = decode(body, "sign-in")?;
    let credentials = response
        .credentials
        .ok_or_else(|| AppError::Decode("sign-in response has no credentials element".into()))?;

    let token = credentials
        .token
        .ok_or_else(|| AppError::Decode("sign-in response has no token".into()))?;
    let site_id = credentials
        .site
        .and_then(|s| s.id)
        .ok_or_else(|| AppError::Decode("sign-in response has no site id".into()))?;
    let user_id = credentials
        .user
        .and_then(|u| u.id)
        .ok_or_else(|| AppError::Decode("sign-in response has no user id".into()))?;

    Ok(SignInPayload {
        token,
        site_id,
        user_id,
    })
}

/// Parses one page of the data source listing. Entries without an id are dropped.
pub fn parse_datasources(body: &str) -> AppResult<Page<DataSource>> {
    let response: DataSourcesResponse = decode(body, "datasource list")?;
    let items = response
        .datasources
        .map(|list| list.datasource)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|ds| match ds.id {
            Some(id) => Some(DataSource::new(id)),
            None => {
                tracing::warn!("Skipping datasource entry without id");
                None
            }
        })
        .collect();

    Ok(Page {
        items,
        total_available: response.pagination.and_then(|p| p.total()),
    })
}

/// Parses one page of the workbook listing. Entries without an id are dropped.
pub fn parse_workbooks(body: &str) -> AppResult<Page<Workbook>> {
    let response: WorkbooksResponse = decode(body, "workbook list")?;
    let items = response
        .workbooks
        .map(|list| list.workbook)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|wb| match wb.id {
            Some(id) => Some(Workbook::new(id, wb.name)),
            None => {
                tracing::warn!("Skipping workbook entry without id");
                None
            }
        })
        .collect();

    Ok(Page {
        items,
        total_available: response.pagination.and_then(|p| p.total()),
    })
}

/// Parses a connection listing, one `Connection` per `connection` element.
pub fn parse_connections(body: &str) -> AppResult<Vec<Connection>> {
    let response: ConnectionsResponse = decode(body, "connection list")?;
    Ok(response
        .connections
        .map(|list| list.connection.into_iter().map(Connection::from).collect())
        .unwrap_or_default())
}

/// Parses an error envelope. Never fails: unreadable bodies yield sentinels.
pub fn parse_api_error(body: &str) -> ApiError {
    match quick_xml::de::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope {
            error: Some(error), ..
        }) => ApiError::new(present(error.code), present(error.summary), present(error.detail)),
        Ok(envelope) => ApiError::new(
            present(envelope.code),
            present(envelope.summary),
            present(envelope.detail),
        ),
        Err(_) => ApiError::unknown(),
    }
}

/// Blank values count as missing.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const XMLNS: &str = r#"xmlns="http://tableau.com/api" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#;

    #[test]
    fn test_parse_sign_in() {
        let body = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <tsResponse {XMLNS}>
              <credentials token="tok-1" estimatedTimeToExpiration="365:22:17">
                <site id="site-1" contentUrl="TRINET"/>
                <user id="user-1"/>
              </credentials>
            </tsResponse>"#
        );
        let payload = parse_sign_in(&body).unwrap();
        assert_eq!(payload.token, "tok-1");
        assert_eq!(payload.site_id, "site-1");
        assert_eq!(payload.user_id, "user-1");
    }

    #[test]
    fn test_parse_sign_in_missing_token() {
        let body = r#"<tsResponse><credentials><site id="s"/><user id="u"/></credentials></tsResponse>"#;
        assert!(matches!(parse_sign_in(body), Err(AppError::Decode(_))));
    }

    #[test]
    fn test_parse_datasources_with_pagination() {
        let body = format!(
            r#"<tsResponse {XMLNS}>
              <pagination pageNumber="1" pageSize="100" totalAvailable="2"/>
              <datasources>
                <datasource id="D1" name="HR"><project id="p"/></datasource>
                <datasource id="D2" name="Payroll"/>
              </datasources>
            </tsResponse>"#
        );
        let page = parse_datasources(&body).unwrap();
        assert_eq!(page.total_available, Some(2));
        let ids: Vec<_> = page.items.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["D1", "D2"]);
    }

    #[test]
    fn test_parse_empty_listing() {
        let body = r#"<tsResponse><pagination totalAvailable="0"/><datasources/></tsResponse>"#;
        let page = parse_datasources(body).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_available, Some(0));
    }

    #[test]
    fn test_parse_workbooks_keeps_names() {
        let body = r#"<tsResponse><workbooks>
              <workbook id="W1" name="Headcount"/>
              <workbook id="W2"/>
            </workbooks></tsResponse>"#;
        let page = parse_workbooks(body).unwrap();
        assert_eq!(page.items[0].name.as_deref(), Some("Headcount"));
        assert_eq!(page.items[1].name, None);
        assert_eq!(page.total_available, None);
    }

    #[test]
    fn test_parse_connections_missing_attributes_are_none() {
        let body = r#"<tsResponse><connections>
              <connection id="C1" serverAddress="HRDB" type="oracle"/>
              <connection id="C2"/>
            </connections></tsResponse>"#;
        let conns = parse_connections(body).unwrap();
        assert_eq!(conns.len(), 2);
        assert_eq!(conns[0], Connection::new("C1", "HRDB").with_type("oracle"));
        assert_eq!(conns[1].server_address, None);
        assert_eq!(conns[1].connection_type, None);
    }

    #[test]
    fn test_parse_api_error_at_root() {
        let body = r#"<error code="400009"><summary>Bad Request</summary><detail>bad token</detail></error>"#;
        let err = parse_api_error(body);
        assert_eq!(err.code, "400009");
        assert_eq!(err.summary, "Bad Request");
        assert_eq!(err.detail, "bad token");
    }

    #[test]
    fn test_parse_api_error_nested() {
        let body = format!(
            r#"<tsResponse {XMLNS}><error code="401002"><summary>Unauthorized Access</summary></error></tsResponse>"#
        );
        let err = parse_api_error(&body);
        assert_eq!(err.code, "401002");
        assert_eq!(err.summary, "Unauthorized Access");
        assert_eq!(err.detail, "unknown detail");
    }

    #[test]
    fn test_parse_api_error_empty_elements_use_sentinels() {
        let body = r#"<error code="401001"><summary>Sign &amp; in</summary><detail/></error>"#;
        let err = parse_api_error(body);
        assert_eq!(err.summary, "Sign & in");
        assert_eq!(err.detail, "unknown detail");
        assert!(!err.to_string().ends_with(" - "));

        let err = parse_api_error(r#"<error code=""><summary>  </summary></error>"#);
        assert_eq!(err, ApiError::unknown());
    }

    #[test]
    fn test_parse_api_error_garbage_body() {
        assert_eq!(parse_api_error("<html><body>502"), ApiError::unknown());
        assert_eq!(parse_api_error(""), ApiError::unknown());
    }
}
