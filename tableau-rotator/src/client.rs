//! Tableau REST API client.
//!
//! Every call goes through [`check_status`] before its body is read.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Response, StatusCode};

use common::config::AppConfig;
use common::errors::{AppError, AppResult};
use common::models::{Connection, Credentials, DataSource, ResourceKind, Session, Workbook};
use common::xml::{self, Page};

use crate::validator::check_status;

/// Header carrying the session token on authenticated calls.
pub const AUTH_HEADER: &str = "x-tableau-auth";

const XML_CONTENT_TYPE: &str = "application/xml";

/// Operations the rotation workflow needs from a Tableau server.
#[async_trait]
pub trait TableauApi: Send + Sync {
    /// Signs in and opens a session.
    async fn sign_in(&self, credentials: &Credentials) -> AppResult<Session>;

    /// Signs out, invalidating the session token.
    async fn sign_out(&self, session: Session) -> AppResult<()>;

    /// Lists every data source on the session's site. Empty is an error.
    async fn list_datasources(&self, session: &Session) -> AppResult<Vec<DataSource>>;

    /// Lists every workbook on the session's site. Empty is an error.
    async fn list_workbooks(&self, session: &Session) -> AppResult<Vec<Workbook>>;

    /// Lists the connections of one data source or workbook.
    async fn get_connections(
        &self,
        session: &Session,
        kind: ResourceKind,
        resource_id: &str,
    ) -> AppResult<Vec<Connection>>;

    /// Replaces the stored password of one connection.
    async fn update_connection(
        &self,
        session: &Session,
        kind: ResourceKind,
        resource_id: &str,
        connection_id: &str,
        new_password: &str,
    ) -> AppResult<()>;
}

/// HTTP implementation of [`TableauApi`].
pub struct TableauClient {
    http_client: reqwest::Client,
    server: String,
    api_version: String,
    page_size: u32,
}

impl TableauClient {
    /// Creates a client for the server at `server` (base URL, no `/api` suffix).
    pub fn new(http_client: reqwest::Client, server: impl Into<String>, config: &AppConfig) -> Self {
        let server = server.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            server,
            api_version: config.api_version.clone(),
            page_size: config.page_size,
        }
    }

    /// Server base URL.
    pub fn server(&self) -> &str {
        &self.server
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}/{}", self.server, self.api_version, path)
    }

    fn site_url(&self, session: &Session, path: &str) -> String {
        self.api_url(&format!("sites/{}/{}", session.site_id(), path))
    }

    fn connections_url(&self, session: &Session, kind: ResourceKind, resource_id: &str) -> String {
        self.site_url(
            session,
            &format!("{}/{}/connections", kind.path_segment(), resource_id),
        )
    }

    async fn send(request: RequestBuilder) -> AppResult<Response> {
        request
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))
    }

    async fn read_body(response: Response) -> AppResult<String> {
        response
            .text()
            .await
            .map_err(|e| AppError::Transport(format!("failed to read response body: {}", e)))
    }

    /// Fetches every page of a site listing.
    ///
    /// Stops when the collected count reaches `totalAvailable`, when the
    /// response carries no pagination element, or when a page comes back empty.
    async fn list_all<T>(
        &self,
        session: &Session,
        path: &str,
        parse: fn(&str) -> AppResult<Page<T>>,
    ) -> AppResult<Vec<T>>
    where
        T: Send,
    {
        let url = self.site_url(session, path);
        let mut items = Vec::new();
        let mut page_number: u32 = 1;

        loop {
            let request = self
                .http_client
                .get(&url)
                .header(AUTH_HEADER, session.token())
                .query(&[
                    ("pageSize", self.page_size.to_string()),
                    ("pageNumber", page_number.to_string()),
                ]);
            let response = check_status(Self::send(request).await?, StatusCode::OK)
                .await
                .map_err(AppError::Api)?;
            let page = parse(&Self::read_body(response).await?)?;

            let fetched = page.items.len();
            items.extend(page.items);
            tracing::debug!(path, page_number, fetched, total = ?page.total_available, "Fetched page");

            match page.total_available {
                Some(total) if fetched > 0 && items.len() < total => page_number += 1,
                _ => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl TableauApi for TableauClient {
    async fn sign_in(&self, credentials: &Credentials) -> AppResult<Session> {
        let body = xml::sign_in_body(credentials)?;
        let request = self
            .http_client
            .post(self.api_url("auth/signin"))
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(body);

        let response = check_status(Self::send(request).await?, StatusCode::OK)
            .await
            .map_err(AppError::Auth)?;
        let payload = xml::parse_sign_in(&Self::read_body(response).await?)?;

        Ok(Session::new(
            self.server.clone(),
            payload.token,
            payload.site_id,
            payload.user_id,
        ))
    }

    async fn sign_out(&self, session: Session) -> AppResult<()> {
        let request = self
            .http_client
            .post(self.api_url("auth/signout"))
            .header(AUTH_HEADER, session.token());

        check_status(Self::send(request).await?, StatusCode::NO_CONTENT)
            .await
            .map_err(AppError::Auth)?;
        Ok(())
    }

    async fn list_datasources(&self, session: &Session) -> AppResult<Vec<DataSource>> {
        let datasources = self
            .list_all(session, "datasources", xml::parse_datasources)
            .await?;
        if datasources.is_empty() {
            return Err(AppError::NotFound("No datasources found on this site".into()));
        }
        Ok(datasources)
    }

    async fn list_workbooks(&self, session: &Session) -> AppResult<Vec<Workbook>> {
        let workbooks = self
            .list_all(session, "workbooks", xml::parse_workbooks)
            .await?;
        if workbooks.is_empty() {
            return Err(AppError::NotFound("No workbooks found on this site".into()));
        }
        Ok(workbooks)
    }

    async fn get_connections(
        &self,
        session: &Session,
        kind: ResourceKind,
        resource_id: &str,
    ) -> AppResult<Vec<Connection>> {
        let request = self
            .http_client
            .get(self.connections_url(session, kind, resource_id))
            .header(AUTH_HEADER, session.token());

        let response = check_status(Self::send(request).await?, StatusCode::OK)
            .await
            .map_err(AppError::Api)?;
        xml::parse_connections(&Self::read_body(response).await?)
    }

    async fn update_connection(
        &self,
        session: &Session,
        kind: ResourceKind,
        resource_id: &str,
        connection_id: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let url = format!(
            "{}/{}",
            self.connections_url(session, kind, resource_id),
            connection_id
        );
        let request = self
            .http_client
            .put(url)
            .header(AUTH_HEADER, session.token())
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(xml::update_connection_body(new_password)?);

        check_status(Self::send(request).await?, StatusCode::OK)
            .await
            .map_err(AppError::Update)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(server: &str) -> TableauClient {
        TableauClient::new(reqwest::Client::new(), server, &AppConfig::default())
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        assert_eq!(client("https://bi.example.com/").server(), "https://bi.example.com");
    }

    #[test]
    fn test_connection_urls() {
        let client = client("https://bi.example.com");
        let session = Session::new("https://bi.example.com", "tok", "S1", "U1");
        assert_eq!(
            client.connections_url(&session, ResourceKind::DataSource, "D1"),
            "https://bi.example.com/api/2.8/sites/S1/datasources/D1/connections"
        );
        assert_eq!(
            client.connections_url(&session, ResourceKind::Workbook, "W1"),
            "https://bi.example.com/api/2.8/sites/S1/workbooks/W1/connections"
        );
    }
}
