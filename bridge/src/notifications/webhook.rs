//! Delivery event classification and webhook delivery.
//!
//! Each Tachikoma notification is mapped to one of the event names the
//! receiver understands and POSTed as a mailgun-shaped `event-data` envelope.
//! Delivery is best effort: failures are logged and never retried.

use std::collections::HashMap;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use url::Url;

use crate::tachikoma::proto::email_notification::Event;
use crate::tachikoma::proto::EmailNotification;

/// Event names understood by the webhook receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Clicked,
    Opened,
    Bounced,
    Complained,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Clicked => "clicked",
            EventKind::Opened => "opened",
            EventKind::Bounced => "bounced",
            EventKind::Complained => "complained",
        }
    }
}

/// Classify a notification, checking clicked, opened, hard-bounced and
/// reported-abuse in that order. Anything else is not forwarded.
pub fn classify(notification: &EmailNotification) -> Option<EventKind> {
    let event = notification.event.as_ref()?;

    if matches!(event, Event::ClickedEvent(_)) {
        Some(EventKind::Clicked)
    } else if matches!(event, Event::OpenedEvent(_)) {
        Some(EventKind::Opened)
    } else if matches!(event, Event::HardBouncedEvent(_)) {
        Some(EventKind::Bounced)
    } else if matches!(event, Event::ReportedAbuseEvent(_)) {
        Some(EventKind::Complained)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookMessage {
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    pub recipient: String,
    pub event: String,
    pub message: WebhookMessage,
}

/// JSON body POSTed to the webhook receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(rename = "event-data")]
    pub event_data: EventData,
}

/// Build the payload; the tracking metadata is exposed as message headers.
pub fn build_payload(notification: &EmailNotification, kind: EventKind) -> WebhookPayload {
    let recipient = notification
        .recipient_email_address
        .as_ref()
        .map(|address| address.email.clone())
        .unwrap_or_default();

    let headers = notification
        .email_tracking_data
        .as_ref()
        .map(|tracking| tracking.metadata.clone())
        .unwrap_or_default();

    WebhookPayload {
        event_data: EventData {
            recipient,
            event: kind.as_str().to_string(),
            message: WebhookMessage { headers },
        },
    }
}

/// Posts classified notifications to the configured webhook.
#[derive(Clone)]
pub struct WebhookEmitter {
    client: Client,
    url: Url,
}

impl WebhookEmitter {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Classify and forward one notification.
    ///
    /// Returns the kind that was posted, or `None` when the notification was
    /// skipped. A failed POST still returns the kind; it is only logged.
    pub async fn send_event(&self, notification: &EmailNotification) -> Option<EventKind> {
        let email_id = notification.email_id.map(|id| id.id).unwrap_or_default();

        let Some(kind) = classify(notification) else {
            debug!(email_id = email_id, "webhook_event_skipped");
            return None;
        };

        let payload = build_payload(notification, kind);

        debug!(
            email_id = email_id,
            recipient = %payload.event_data.recipient,
            event = kind.as_str(),
            "webhook_event_sending"
        );

        self.post(&payload).await;

        Some(kind)
    }

    async fn post(&self, payload: &WebhookPayload) {
        let event = payload.event_data.event.as_str();
        let recipient = payload.event_data.recipient.as_str();

        let response = match self.client.post(self.url.clone()).json(payload).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(
                    event = event,
                    recipient = %recipient,
                    error = %e,
                    "webhook_dispatch_failed"
                );
                return;
            }
        };

        let status = response.status();
        if status.is_success() {
            info!(
                event = event,
                recipient = %recipient,
                status_code = status.as_u16(),
                "webhook_event_delivered"
            );
            return;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, "webhook_response_read_failed");
                String::new()
            }
        };

        error!(
            event = event,
            recipient = %recipient,
            status_code = status.as_u16(),
            body_preview = %body.chars().take(500).collect::<String>(),
            "webhook_event_rejected"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tachikoma::proto::{
        ClickedEvent, DeliveredEvent, EmailAddress, EmailId, HardBouncedEvent, OpenedEvent,
        ReportedAbuseEvent, TrackingData,
    };
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notification(event: Option<Event>) -> EmailNotification {
        EmailNotification {
            email_id: Some(EmailId { id: 7 }),
            recipient_email_address: Some(EmailAddress {
                email: "b@x.com".to_string(),
            }),
            email_tracking_data: Some(TrackingData {
                metadata: HashMap::from([("campaign".to_string(), "abc123".to_string())]),
                ..Default::default()
            }),
            event,
            ..Default::default()
        }
    }

    fn emitter(server: &MockServer) -> WebhookEmitter {
        let url = Url::parse(&format!("{}/api/providers/J7O98WX4ZL/json", server.uri())).unwrap();
        WebhookEmitter::new(Client::new(), url)
    }

    #[test]
    fn test_classify_maps_each_event() {
        let cases = [
            (Event::ClickedEvent(ClickedEvent::default()), EventKind::Clicked),
            (Event::OpenedEvent(OpenedEvent::default()), EventKind::Opened),
            (
                Event::HardBouncedEvent(HardBouncedEvent::default()),
                EventKind::Bounced,
            ),
            (
                Event::ReportedAbuseEvent(ReportedAbuseEvent::default()),
                EventKind::Complained,
            ),
        ];

        for (event, expected) in cases {
            assert_eq!(classify(&notification(Some(event))), Some(expected));
        }
    }

    #[test]
    fn test_classify_skips_other_events() {
        assert_eq!(
            classify(&notification(Some(Event::DeliveredEvent(DeliveredEvent {})))),
            None
        );
        assert_eq!(classify(&notification(None)), None);
    }

    #[test]
    fn test_payload_shape() {
        let payload = build_payload(
            &notification(Some(Event::OpenedEvent(OpenedEvent::default()))),
            EventKind::Opened,
        );

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "event-data": {
                    "recipient": "b@x.com",
                    "event": "opened",
                    "message": {"headers": {"campaign": "abc123"}}
                }
            })
        );
    }

    #[test]
    fn test_payload_without_tracking_data() {
        let mut bare = notification(Some(Event::ClickedEvent(ClickedEvent::default())));
        bare.email_tracking_data = None;
        bare.recipient_email_address = None;

        let payload = build_payload(&bare, EventKind::Clicked);

        assert_eq!(payload.event_data.recipient, "");
        assert!(payload.event_data.message.headers.is_empty());
    }

    #[tokio::test]
    async fn test_clicked_event_is_posted_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/providers/J7O98WX4ZL/json"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "event-data": {
                    "recipient": "b@x.com",
                    "event": "clicked",
                    "message": {"headers": {"campaign": "abc123"}}
                }
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let kind = emitter(&server)
            .send_event(&notification(Some(Event::ClickedEvent(ClickedEvent {
                ip_address: "10.0.0.1".to_string(),
                clicked_url: "https://example.com".to_string(),
            }))))
            .await;

        assert_eq!(kind, Some(EventKind::Clicked));
    }

    #[tokio::test]
    async fn test_unclassified_event_is_not_posted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let kind = emitter(&server)
            .send_event(&notification(Some(Event::DeliveredEvent(DeliveredEvent {}))))
            .await;

        assert_eq!(kind, None);
    }

    #[tokio::test]
    async fn test_server_error_is_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let kind = emitter(&server)
            .send_event(&notification(Some(Event::OpenedEvent(OpenedEvent::default()))))
            .await;

        assert_eq!(kind, Some(EventKind::Opened));
    }

    #[tokio::test]
    async fn test_unreachable_receiver_is_swallowed() {
        let url = Url::parse("http://127.0.0.1:1/hook").unwrap();
        let emitter = WebhookEmitter::new(Client::new(), url);

        let kind = emitter
            .send_event(&notification(Some(Event::HardBouncedEvent(
                HardBouncedEvent::default(),
            ))))
            .await;

        assert_eq!(kind, Some(EventKind::Bounced));
    }
}
