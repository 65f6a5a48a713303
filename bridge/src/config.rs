//! Configuration module for command line and environment parsing.
//!
//! Everything is read once at startup and validated before any task is
//! spawned. The resulting `Config` is handed to each component explicitly.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use url::Url;

use crate::error::ConfigError;

/// Port used for the Tachikoma endpoint when the URI does not carry one.
pub const DEFAULT_TACHIKOMA_PORT: u16 = 443;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Coloured,
    Plain,
    Json,
}

/// Application configuration loaded from flags, with env fallback for the API key.
#[derive(Clone, Parser)]
#[command(
    name = "tachikoma-bridge",
    version,
    about = "Bridge nodemailer JSON sends to Tachikoma and Tachikoma events to a webhook"
)]
pub struct Config {
    /// Show verbose debug information (-vv for trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Be very quiet
    #[arg(short, long)]
    pub quiet: bool,

    /// Log output format
    #[arg(short = 'l', long = "logging", value_enum, default_value_t = LogFormat::Coloured)]
    pub log_format: LogFormat,

    /// Path to client certificate (PEM)
    #[arg(short = 'c', long = "certificate")]
    pub certificate: PathBuf,

    /// Path to client key (PEM)
    #[arg(short = 'k', long = "key")]
    pub key: PathBuf,

    /// ApiKey e.g. example.com:mysupersecretpassword
    #[arg(short = 'a', long = "apikey", env = "TACHIKOMA_AUTH", hide_env_values = true)]
    pub api_key: String,

    /// URI to Tachikoma
    #[arg(short = 'u', long = "uri")]
    pub uri: Url,

    /// Listening port
    #[arg(short = 'p', long = "port", default_value_t = 3100)]
    pub port: u16,

    /// URI to the webhook receiver
    #[arg(short = 'w', long = "webhook")]
    pub webhook_uri: Url,
}

impl Config {
    /// Check the values clap cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        self.tachikoma_endpoint()?;

        match self.webhook_uri.scheme() {
            "http" | "https" if self.webhook_uri.has_host() => Ok(()),
            _ => Err(ConfigError::InvalidWebhook(self.webhook_uri.to_string())),
        }
    }

    /// `https://host:port` for the gRPC channel. Port defaults to 443.
    pub fn tachikoma_endpoint(&self) -> Result<String, ConfigError> {
        let host = self
            .uri
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ConfigError::InvalidUri(self.uri.to_string()))?;
        let port = self.uri.port().unwrap_or(DEFAULT_TACHIKOMA_PORT);

        Ok(format!("https://{}:{}", host, port))
    }

    /// Host name used for TLS server name verification.
    pub fn tachikoma_host(&self) -> Option<&str> {
        self.uri.host_str()
    }

    /// Default tracing filter derived from -v/-q.
    pub fn log_directive(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URI: &str = "https://tachikoma.example.com";
    const WEBHOOK: &str = "http://localhost:3000/api/providers/J7O98WX4ZL/json";

    fn try_parse(uri: &str, webhook: &str, api_key: &str, extra: &[&str]) -> Result<Config, clap::Error> {
        let mut args = vec![
            "tachikoma-bridge",
            "-c",
            "client.crt",
            "-k",
            "client.key",
            "-a",
            api_key,
            "-u",
            uri,
            "-w",
            webhook,
        ];
        args.extend_from_slice(extra);
        Config::try_parse_from(args)
    }

    fn parse(extra: &[&str]) -> Config {
        try_parse(URI, WEBHOOK, "example.com:secret", extra).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.port, 3100);
        assert_eq!(config.log_format, LogFormat::Coloured);
        assert_eq!(config.log_directive(), "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_default_port() {
        let config = parse(&[]);
        assert_eq!(
            config.tachikoma_endpoint().unwrap(),
            "https://tachikoma.example.com:443"
        );
        assert_eq!(config.tachikoma_host(), Some("tachikoma.example.com"));
    }

    #[test]
    fn test_endpoint_explicit_port() {
        let config =
            try_parse("https://tachikoma.example.com:8443", WEBHOOK, "key", &[]).unwrap();
        assert_eq!(
            config.tachikoma_endpoint().unwrap(),
            "https://tachikoma.example.com:8443"
        );
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(parse(&["-v"]).log_directive(), "debug");
        assert_eq!(parse(&["-vv"]).log_directive(), "trace");
        assert_eq!(parse(&["-vv", "-q"]).log_directive(), "error");
    }

    #[test]
    fn test_logging_format() {
        assert_eq!(parse(&["-l", "json"]).log_format, LogFormat::Json);
        assert_eq!(parse(&["--logging", "plain"]).log_format, LogFormat::Plain);
        assert!(try_parse(URI, WEBHOOK, "key", &["-l", "fancy"]).is_err());
    }

    #[test]
    fn test_port_flag() {
        assert_eq!(parse(&["-p", "8080"]).port, 8080);
        assert!(try_parse(URI, WEBHOOK, "key", &["-p", "http"]).is_err());
    }

    #[test]
    fn test_rejects_blank_api_key() {
        let config = try_parse(URI, WEBHOOK, "  ", &[]).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_rejects_non_http_webhook() {
        let config = try_parse(URI, "ftp://example.com/hook", "key", &[]).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWebhook(_))
        ));
    }

    #[test]
    fn test_rejects_uri_without_host() {
        let config = try_parse("unix:/var/run/tachikoma.sock", WEBHOOK, "key", &[]).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUri(_))));
    }

    #[test]
    fn test_rejects_unparseable_uri() {
        assert!(try_parse("not a uri", WEBHOOK, "key", &[]).is_err());
    }

    #[test]
    fn test_missing_webhook_is_an_error() {
        let result = Config::try_parse_from([
            "tachikoma-bridge",
            "-c",
            "client.crt",
            "-k",
            "client.key",
            "-a",
            "key",
            "-u",
            URI,
        ]);
        assert!(result.is_err());
    }
}
