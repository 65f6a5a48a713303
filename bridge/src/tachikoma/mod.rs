//! Tachikoma gRPC side of the bridge.
//!
//! This module provides:
//! - The message and client definitions for the frontend API subset in use
//! - The authenticated (mutual TLS + API token) channel
//! - The send gateway used by the HTTP intake

pub mod channel;
pub mod mailer;
pub mod proto;

pub use channel::{connect, ApiToken, AuthenticatedChannel, TlsMaterial};
pub use mailer::{MailSender, TachikomaMailer};
