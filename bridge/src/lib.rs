//! Tachikoma bridge - relay between a nodemailer-speaking marketing platform
//! and the Tachikoma mail service.
//!
//! Two independent pipelines share one authenticated gRPC channel:
//!
//! ```text
//! POST /tachikoma/sendEmail → InboundEmail → OutgoingEmail → Tachikoma SendEmail
//! Tachikoma notification stream → classify() → JSON webhook
//! ```

pub mod config;
pub mod error;
pub mod nodemailer;
pub mod notifications;
pub mod tachikoma;
pub mod web;

// Re-export commonly used types
pub use config::{Config, LogFormat};
pub use error::{ConfigError, DecodeError, SendError, StreamError};
pub use nodemailer::{to_outgoing_email, InboundEmail};
pub use notifications::{StreamSummary, WebhookEmitter};
pub use tachikoma::{MailSender, TachikomaMailer};
pub use web::AppState;
