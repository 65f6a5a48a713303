//! Send intake handler.
//!
//! The body is read as raw bytes and decoded here, so every decode failure
//! maps to the same empty 400 instead of axum's extractor rejections.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::post,
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::error::SendError;
use crate::nodemailer::{to_outgoing_email, InboundEmail};
use crate::tachikoma::proto::EmailQueueStatus;
use crate::tachikoma::MailSender;

/// Route accepting send requests.
pub const SEND_EMAIL_PATH: &str = "/tachikoma/sendEmail";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub mailer: Arc<dyn MailSender>,
}

impl AppState {
    pub fn new(mailer: Arc<dyn MailSender>) -> Self {
        Self { mailer }
    }
}

/// Build the intake router.
///
/// Bodies are not size-capped: attachments arrive inline as base64.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(SEND_EMAIL_PATH, post(send_email))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Send email endpoint.
///
/// 204 with an empty body on success, 400 with an empty body otherwise.
pub async fn send_email(State(state): State<AppState>, body: Bytes) -> StatusCode {
    info!(body_length = body.len(), "send_email_received");

    match relay(&state, &body).await {
        Ok(status) => {
            info!(
                email_id = status.email_id.map(|id| id.id).unwrap_or_default(),
                "send_email_accepted"
            );
            StatusCode::NO_CONTENT
        }
        Err(e) => {
            error!(error = %e, "send_email_failed");
            StatusCode::BAD_REQUEST
        }
    }
}

async fn relay(state: &AppState, body: &[u8]) -> Result<EmailQueueStatus, SendError> {
    let email = InboundEmail::from_json(body)?;

    debug!(
        from = %email.from.address,
        to = email.to.len(),
        cc = email.cc.len(),
        bcc = email.bcc.len(),
        attachments = email.attachments.len(),
        campaign = ?email.campaign(),
        "send_email_decoded"
    );

    let outgoing = to_outgoing_email(email)?;

    state.mailer.send(outgoing).await
}
