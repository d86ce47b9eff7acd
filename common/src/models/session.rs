//! Authentication models.

/// Administrator credentials used to sign in.
#[derive(Clone)]
pub struct Credentials {
    /// Administrator user name.
    pub username: String,
    /// Administrator password.
    pub password: String,
    /// Site content URL; empty selects the default site.
    pub site: String,
}

impl Credentials {
    /// Creates a new set of credentials.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        site: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            site: site.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("site", &self.site)
            .finish()
    }
}

/// An authenticated Tableau session.
///
/// Created by sign-in and consumed by sign-out, so a token cannot be used
/// after the session has been closed.
pub struct Session {
    server: String,
    token: String,
    site_id: String,
    user_id: String,
}

impl Session {
    /// Creates a session from a successful sign-in response.
    pub fn new(
        server: impl Into<String>,
        token: impl Into<String>,
        site_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            token: token.into(),
            site_id: site_id.into(),
            user_id: user_id.into(),
        }
    }

    /// Server base URL the session belongs to.
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Authentication token sent as `x-tableau-auth`.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Site identifier.
    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    /// Signed-in user identifier.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("server", &self.server)
            .field("token", &"<redacted>")
            .field("site_id", &self.site_id)
            .field("user_id", &self.user_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::new("admin", "hunter2", "");
        let session = Session::new("https://bi", "tok-123", "site", "user");
        assert!(!format!("{:?}", creds).contains("hunter2"));
        assert!(!format!("{:?}", session).contains("tok-123"));
    }
}
