//! Command-line arguments.

use std::io::Write;

use clap::error::ErrorKind;
use clap::Parser;

use common::config::AppConfig;
use common::errors::{AppError, AppResult};
use common::models::{Credentials, RotationRequest};

/// Rotate the database password stored in Tableau data sources and workbooks.
#[derive(Parser)]
#[command(name = "tableau-rotator", version, about)]
pub struct Cli {
    /// Tableau server URL, e.g. https://tableau.example.com
    pub server: String,
    /// Server administrator user name
    pub username: String,
    /// Server administrator password
    #[arg(allow_hyphen_values = true)]
    pub password: String,
    /// Database environment name, matched exactly against connection server addresses
    pub environment: String,
    /// New database password
    #[arg(allow_hyphen_values = true)]
    pub new_password: String,
}

/// Outcome of parsing the command line.
pub enum Invocation {
    /// Proceed with a rotation.
    Rotate(Cli),
    /// Help or version was requested; print and exit successfully.
    Info(clap::Error),
}

impl Cli {
    /// Parses arguments without exiting the process.
    ///
    /// # Errors
    /// Returns `AppError::Config` for a wrong argument count or unknown flags.
    pub fn try_parse_args<I, T>(args: I) -> AppResult<Invocation>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        match Cli::try_parse_from(args) {
            Ok(cli) => Ok(Invocation::Rotate(cli)),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                Ok(Invocation::Info(e))
            }
            Err(e) => Err(AppError::Config(format!(
                "5 arguments needed (server URL, admin username, admin password, \
                 DB environment name, new DB password)\n{}",
                e.render()
            ))),
        }
    }

    /// Splits the arguments into sign-in credentials and a validated rotation request.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the server URL is not an http(s) URL or
    /// the environment name or new password is empty.
    pub fn into_parts(self, config: &AppConfig) -> AppResult<(String, Credentials, RotationRequest)> {
        let url = reqwest::Url::parse(&self.server)
            .map_err(|e| AppError::Config(format!("invalid server URL '{}': {}", self.server, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "server URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        let request = RotationRequest::new(self.environment, self.new_password)?;
        let credentials = Credentials::new(self.username, self.password, config.site.clone());
        Ok((self.server, credentials, request))
    }
}

impl Invocation {
    /// Writes the help or version text of an `Info` invocation to `out`.
    ///
    /// # Errors
    /// Returns `AppError::Transport` if the text cannot be written.
    pub fn write_info<W: Write>(message: &clap::Error, out: &mut W) -> AppResult<()> {
        write!(out, "{}", message.render())
            .and_then(|_| out.flush())
            .map_err(|e| AppError::Transport(format!("failed to write help output: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn parse(args: &[&str]) -> AppResult<Invocation> {
        Cli::try_parse_args(std::iter::once("tableau-rotator").chain(args.iter().copied()))
    }

    #[test]
    fn test_five_positional_arguments() {
        let Ok(Invocation::Rotate(cli)) =
            parse(&["https://bi.example.com", "admin", "secret", "HRDB", "p@ss"])
        else {
            panic!("expected a rotation invocation");
        };
        let (server, creds, request) = cli
            .into_parts(&AppConfig {
                site: "TRINET".into(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(server, "https://bi.example.com");
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.site, "TRINET");
        assert_eq!(request.environment, "HRDB");
        assert_eq!(request.new_password, "p@ss");
    }

    #[test]
    fn test_wrong_argument_count_is_config_error() {
        assert!(matches!(
            parse(&["https://bi.example.com", "admin", "secret", "HRDB"]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            parse(&["https://bi", "admin", "secret", "HRDB", "p@ss", "extra"]),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_help_is_not_an_error() {
        assert!(matches!(parse(&["--help"]), Ok(Invocation::Info(_))));
    }

    #[test]
    fn test_help_text_is_written() {
        let Ok(Invocation::Info(message)) = parse(&["--help"]) else {
            panic!("expected an info invocation");
        };
        let mut out = Vec::new();
        Invocation::write_info(&message, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("tableau-rotator"));
    }

    #[test]
    fn test_unwritable_help_is_an_error() {
        let Ok(Invocation::Info(message)) = parse(&["--version"]) else {
            panic!("expected an info invocation");
        };
        assert!(matches!(
            Invocation::write_info(&message, &mut ClosedPipe),
            Err(AppError::Transport(_))
        ));
    }

    #[test]
    fn test_server_must_be_http_url() {
        let Ok(Invocation::Rotate(cli)) = parse(&["ftp://bi", "admin", "secret", "HRDB", "p@ss"])
        else {
            panic!("expected a rotation invocation");
        };
        assert!(matches!(
            cli.into_parts(&AppConfig::default()),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_empty_environment_is_rejected() {
        let Ok(Invocation::Rotate(cli)) = parse(&["https://bi", "admin", "secret", "", "p@ss"])
        else {
            panic!("expected a rotation invocation");
        };
        assert!(matches!(
            cli.into_parts(&AppConfig::default()),
            Err(AppError::Config(_))
        ));
    }
}
