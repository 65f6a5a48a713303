//! Error types for the send path, the notification stream and startup.
//!
//! Send-path errors are local to one HTTP request and end up as a 400.
//! Stream errors are fatal and travel up to the supervisor in `main`.

use thiserror::Error;

/// The inbound document could not be turned into an outgoing email.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed email json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("from address is empty")]
    EmptySender,

    #[error("attachment {index} ({filename:?}) is not valid base64: {source}")]
    Attachment {
        index: usize,
        filename: String,
        #[source]
        source: base64::DecodeError,
    },
}

/// Failure of a single send request.
#[derive(Debug, Error)]
pub enum SendError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("tachikoma send failed: {0}")]
    Transport(#[from] tonic::Status),

    #[error("tachikoma protocol error: {0}")]
    Protocol(String),
}

/// Failure of the notification stream. Always terminal.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("failed to open notification stream: {0}")]
    Open(#[source] tonic::Status),

    #[error("notification stream broke: {0}")]
    Receive(#[source] tonic::Status),
}

/// Invalid startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("provide an API key through --apikey or env TACHIKOMA_AUTH")]
    MissingApiKey,

    #[error("api key is not a valid metadata value")]
    InvalidApiKey,

    #[error("tachikoma uri {0} has no host")]
    InvalidUri(String),

    #[error("webhook uri {0} must be http or https")]
    InvalidWebhook(String),
}
