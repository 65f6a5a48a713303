//! Web server module for the send intake.
//!
//! This module provides a single endpoint that:
//! - Decodes a nodemailer-style JSON email
//! - Translates it to a Tachikoma `OutgoingEmail`
//! - Sends it through the gateway and answers 204, or 400 on any failure

pub mod handlers;

pub use handlers::{router, send_email, AppState, SEND_EMAIL_PATH};
