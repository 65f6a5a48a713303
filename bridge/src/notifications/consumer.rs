//! Tachikoma notification stream consumer.
//!
//! This module opens the long-lived `NotificationStreamWithKeepAlive` call and
//! forwards every real notification to the webhook emitter, one at a time and
//! in the order Tachikoma sends them. Keep-alives are dropped.
//!
//! End of stream is a clean shutdown. Any other transport error ends the loop
//! with a `StreamError`; there is no reconnect.

use futures::{Stream, StreamExt};
use tracing::{debug, error, info, trace};

use crate::error::StreamError;
use crate::notifications::webhook::WebhookEmitter;
use crate::tachikoma::proto::delivery_notification_service_client::DeliveryNotificationServiceClient;
use crate::tachikoma::proto::email_notification_or_keep_alive::Content;
use crate::tachikoma::proto::{EmailNotificationOrKeepAlive, NotificationStreamParameters};
use crate::tachikoma::AuthenticatedChannel;

/// Parameters requested when opening the stream.
pub const STREAM_PARAMETERS: NotificationStreamParameters = NotificationStreamParameters {
    include_tracking_data: true,
    include_subject: true,
    include_metrics_data: true,
};

/// Counters reported when the stream ends cleanly.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    pub keep_alives: u64,
    pub notifications: u64,
    pub forwarded: u64,
}

/// Open the notification stream on the shared channel and consume it.
pub async fn run(
    channel: AuthenticatedChannel,
    emitter: &WebhookEmitter,
) -> Result<StreamSummary, StreamError> {
    let mut client = DeliveryNotificationServiceClient::new(channel);

    info!(
        include_tracking_data = STREAM_PARAMETERS.include_tracking_data,
        include_subject = STREAM_PARAMETERS.include_subject,
        include_metrics_data = STREAM_PARAMETERS.include_metrics_data,
        "notification_stream_opening"
    );

    let stream = client
        .notification_stream_with_keep_alive(STREAM_PARAMETERS)
        .await
        .map_err(StreamError::Open)?
        .into_inner();

    info!(webhook = %emitter.url(), "notification_stream_open");

    consume(stream, emitter).await
}

/// Drive a notification stream to completion.
pub async fn consume<S>(
    mut stream: S,
    emitter: &WebhookEmitter,
) -> Result<StreamSummary, StreamError>
where
    S: Stream<Item = Result<EmailNotificationOrKeepAlive, tonic::Status>> + Unpin,
{
    let mut summary = StreamSummary::default();

    while let Some(message) = stream.next().await {
        let message = match message {
            Ok(message) => message,
            Err(status) => {
                error!(
                    code = ?status.code(),
                    message = %status.message(),
                    notifications = summary.notifications,
                    "notification_stream_error"
                );
                return Err(StreamError::Receive(status));
            }
        };

        match message.content {
            Some(Content::EmailNotification(notification)) => {
                summary.notifications += 1;
                debug!(
                    email_id = notification.email_id.map(|id| id.id).unwrap_or_default(),
                    "notification_received"
                );
                if emitter.send_event(&notification).await.is_some() {
                    summary.forwarded += 1;
                }
            }
            Some(Content::KeepAlive(_)) | None => {
                summary.keep_alives += 1;
                trace!("notification_keep_alive");
            }
        }
    }

    info!(
        notifications = summary.notifications,
        forwarded = summary.forwarded,
        keep_alives = summary.keep_alives,
        "notification_stream_closed"
    );

    Ok(summary)
}
