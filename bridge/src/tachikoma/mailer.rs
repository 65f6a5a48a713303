//! Send gateway: one `SendEmail` call per inbound request.

use async_trait::async_trait;
use tonic::body::BoxBody;
use tonic::client::GrpcService;
use tonic::codegen::{Body, Bytes, StdError};
use tracing::{info, warn};

use super::channel::AuthenticatedChannel;
use super::proto::email_queue_status::Status;
use super::proto::mail_delivery_service_client::MailDeliveryServiceClient;
use super::proto::{EmailQueueStatus, OutgoingEmail};
use crate::error::SendError;

/// Something that can hand an outgoing email to Tachikoma.
///
/// The HTTP intake depends on this rather than on the gRPC client so it can
/// be exercised without a live channel.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<EmailQueueStatus, SendError>;
}

/// gRPC-backed sender. No retries; timeouts are the channel defaults.
#[derive(Clone)]
pub struct TachikomaMailer<T = AuthenticatedChannel> {
    client: MailDeliveryServiceClient<T>,
}

impl<T> TachikomaMailer<T>
where
    T: GrpcService<BoxBody> + Clone,
    T::Error: Into<StdError>,
    T::ResponseBody: Body<Data = Bytes> + Send + 'static,
    <T::ResponseBody as Body>::Error: Into<StdError> + Send,
{
    pub fn new(channel: T) -> Self {
        Self {
            client: MailDeliveryServiceClient::new(channel),
        }
    }

    /// Send one email and return the first queue status Tachikoma streams back.
    pub async fn deliver(&self, email: OutgoingEmail) -> Result<EmailQueueStatus, SendError> {
        let recipients = email.recipients.len();
        let mut client = self.client.clone();

        let mut statuses = client.send_email(email).await?.into_inner();

        let status = statuses.message().await?.ok_or_else(|| {
            SendError::Protocol("sendEmail stream closed without a queue status".to_string())
        })?;

        log_queue_status(&status, recipients);

        Ok(status)
    }
}

#[async_trait]
impl MailSender for TachikomaMailer<AuthenticatedChannel> {
    async fn send(&self, email: OutgoingEmail) -> Result<EmailQueueStatus, SendError> {
        self.deliver(email).await
    }
}

fn log_queue_status(status: &EmailQueueStatus, recipients: usize) {
    let email_id = status.email_id.map(|id| id.id).unwrap_or_default();
    let recipient = status
        .recipient
        .as_ref()
        .map(|r| r.email.as_str())
        .unwrap_or("");

    match &status.status {
        Some(Status::Rejected(rejected)) => warn!(
            email_id = email_id,
            recipient = %recipient,
            reason = %rejected.rejection_reason,
            "tachikoma_email_rejected"
        ),
        Some(Status::Queued(_)) => info!(
            email_id = email_id,
            recipient = %recipient,
            recipients = recipients,
            "tachikoma_email_queued"
        ),
        Some(Status::Scheduled(_)) => info!(
            email_id = email_id,
            recipient = %recipient,
            recipients = recipients,
            "tachikoma_email_scheduled"
        ),
        None => info!(email_id = email_id, "tachikoma_email_status_unknown"),
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use axum::http::{Request, Response};
    use prost::Message;
    use tower::service_fn;

    use super::*;
    use crate::tachikoma::proto::{EmailAddress, EmailId, Queued};

    type Reply = Response<axum::body::Body>;

    /// A gRPC response with no messages, status carried in the headers.
    fn trailers_only(code: &'static str) -> Reply {
        Response::builder()
            .header("content-type", "application/grpc")
            .header("grpc-status", code)
            .body(axum::body::Body::empty())
            .unwrap()
    }

    /// A gRPC response carrying one length-prefixed message.
    fn single_message(status: &EmailQueueStatus) -> Reply {
        let message = status.encode_to_vec();
        let mut frame = vec![0u8];
        frame.extend_from_slice(&(message.len() as u32).to_be_bytes());
        frame.extend_from_slice(&message);

        Response::builder()
            .header("content-type", "application/grpc")
            .body(axum::body::Body::from(frame))
            .unwrap()
    }

    fn mailer(
        reply: fn() -> Reply,
    ) -> TachikomaMailer<
        impl GrpcService<BoxBody, ResponseBody = axum::body::Body, Error = Infallible> + Clone,
    > {
        TachikomaMailer::new(service_fn(move |_request: Request<BoxBody>| async move {
            Ok::<_, Infallible>(reply())
        }))
    }

    #[tokio::test]
    async fn test_first_status_is_returned() {
        fn queued() -> Reply {
            single_message(&EmailQueueStatus {
                email_id: Some(EmailId { id: 42 }),
                recipient: Some(EmailAddress {
                    email: "b@x.com".to_string(),
                }),
                status: Some(Status::Queued(Queued {})),
                ..Default::default()
            })
        }

        let status = mailer(queued)
            .deliver(OutgoingEmail::default())
            .await
            .unwrap();

        assert_eq!(status.email_id, Some(EmailId { id: 42 }));
        assert!(matches!(status.status, Some(Status::Queued(_))));
    }

    #[tokio::test]
    async fn test_empty_status_stream_is_protocol_error() {
        let result = mailer(|| trailers_only("0"))
            .deliver(OutgoingEmail::default())
            .await;

        assert!(matches!(result, Err(SendError::Protocol(_))));
    }

    #[tokio::test]
    async fn test_grpc_error_is_transport_error() {
        let result = mailer(|| trailers_only("14"))
            .deliver(OutgoingEmail::default())
            .await;

        match result {
            Err(SendError::Transport(status)) => {
                assert_eq!(status.code(), tonic::Code::Unavailable)
            }
            other => panic!("Expected transport error, got {:?}", other),
        }
    }
}
