//! Tachikoma frontend API messages and clients.
//!
//! Hand-maintained prost/tonic rendition of the parts of the frontend API the
//! bridge talks to. Transcribed from the `tachikoma-frontend-api-proto-1.0.167.zip`
//! release asset of github.com/SourceForgery/tachikoma:
//! - common: the shared address and id messages
//! - maildelivery: package `com.sourceforgery.tachikoma.grpc.frontend.maildelivery`
//! - tracking: package `com.sourceforgery.tachikoma.grpc.frontend.tracking`
//!
//! Keep field tags in step with that archive when bumping the api version. The
//! tests at the bottom pin the wire bytes of the fields the bridge depends on.

use std::collections::HashMap;

// =============================================================================
// common
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EmailAddress {
    #[prost(string, tag = "1")]
    pub email: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NamedEmailAddress {
    #[prost(string, tag = "1")]
    pub email: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct EmailId {
    #[prost(int64, tag = "1")]
    pub id: i64,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct EmailTransactionId {
    #[prost(int64, tag = "1")]
    pub id: i64,
}

// =============================================================================
// maildelivery
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EmailRecipient {
    #[prost(message, optional, tag = "1")]
    pub named_email: ::core::option::Option<NamedEmailAddress>,
    #[prost(map = "string, string", tag = "2")]
    pub metadata: HashMap<::prost::alloc::string::String, ::prost::alloc::string::String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StaticBody {
    #[prost(string, tag = "1")]
    pub html_body: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub plaintext_body: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub subject: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Attachment {
    #[prost(bytes = "vec", tag = "1")]
    pub data: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag = "2")]
    pub content_type: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub file_name: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TrackingData {
    #[prost(string, tag = "1")]
    pub tracking_domain: ::prost::alloc::string::String,
    #[prost(string, repeated, tag = "2")]
    pub tags: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(map = "string, string", tag = "3")]
    pub metadata: HashMap<::prost::alloc::string::String, ::prost::alloc::string::String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OutgoingEmail {
    #[prost(message, repeated, tag = "1")]
    pub recipients: ::prost::alloc::vec::Vec<EmailRecipient>,
    #[prost(message, repeated, tag = "2")]
    pub bcc: ::prost::alloc::vec::Vec<EmailAddress>,
    #[prost(message, optional, tag = "3")]
    pub from: ::core::option::Option<NamedEmailAddress>,
    #[prost(message, optional, tag = "4")]
    pub reply_to: ::core::option::Option<EmailAddress>,
    #[prost(map = "string, string", tag = "7")]
    pub headers: HashMap<::prost::alloc::string::String, ::prost::alloc::string::String>,
    #[prost(message, optional, tag = "9")]
    pub tracking_data: ::core::option::Option<TrackingData>,
    #[prost(message, repeated, tag = "13")]
    pub attachments: ::prost::alloc::vec::Vec<Attachment>,
    #[prost(oneof = "outgoing_email::Body", tags = "5")]
    pub body: ::core::option::Option<outgoing_email::Body>,
}

pub mod outgoing_email {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Body {
        #[prost(message, tag = "5")]
        Static(super::StaticBody),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Queued {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Scheduled {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Rejected {
    #[prost(string, tag = "1")]
    pub rejection_reason: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EmailQueueStatus {
    #[prost(message, optional, tag = "1")]
    pub email_id: ::core::option::Option<EmailId>,
    #[prost(message, optional, tag = "2")]
    pub recipient: ::core::option::Option<EmailAddress>,
    #[prost(message, optional, tag = "3")]
    pub transaction_id: ::core::option::Option<EmailTransactionId>,
    #[prost(oneof = "email_queue_status::Status", tags = "101, 102, 103")]
    pub status: ::core::option::Option<email_queue_status::Status>,
}

pub mod email_queue_status {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Status {
        #[prost(message, tag = "101")]
        Rejected(super::Rejected),
        #[prost(message, tag = "102")]
        Queued(super::Queued),
        #[prost(message, tag = "103")]
        Scheduled(super::Scheduled),
    }
}

// =============================================================================
// tracking
// =============================================================================

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct NotificationStreamParameters {
    #[prost(bool, tag = "1")]
    pub include_tracking_data: bool,
    #[prost(bool, tag = "2")]
    pub include_subject: bool,
    #[prost(bool, tag = "3")]
    pub include_metrics_data: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OpenedEvent {
    #[prost(string, tag = "1")]
    pub ip_address: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ClickedEvent {
    #[prost(string, tag = "1")]
    pub ip_address: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub clicked_url: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HardBouncedEvent {
    #[prost(string, tag = "1")]
    pub reject_reason: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SoftBouncedEvent {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeliveredEvent {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueuedEvent {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UnsubscribedEvent {
    #[prost(string, tag = "1")]
    pub ip_address: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReportedAbuseEvent {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EmailNotification {
    #[prost(message, optional, tag = "1")]
    pub email_id: ::core::option::Option<EmailId>,
    #[prost(message, optional, tag = "2")]
    pub recipient_email_address: ::core::option::Option<EmailAddress>,
    #[prost(message, optional, tag = "3")]
    pub email_transaction_id: ::core::option::Option<EmailTransactionId>,
    #[prost(message, optional, tag = "20")]
    pub email_tracking_data: ::core::option::Option<TrackingData>,
    #[prost(string, tag = "21")]
    pub subject: ::prost::alloc::string::String,
    #[prost(
        oneof = "email_notification::Event",
        tags = "101, 102, 103, 104, 105, 106, 107, 108"
    )]
    pub event: ::core::option::Option<email_notification::Event>,
}

pub mod email_notification {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Event {
        #[prost(message, tag = "101")]
        SoftBouncedEvent(super::SoftBouncedEvent),
        #[prost(message, tag = "102")]
        DeliveredEvent(super::DeliveredEvent),
        #[prost(message, tag = "103")]
        HardBouncedEvent(super::HardBouncedEvent),
        #[prost(message, tag = "104")]
        QueuedEvent(super::QueuedEvent),
        #[prost(message, tag = "105")]
        OpenedEvent(super::OpenedEvent),
        #[prost(message, tag = "106")]
        ClickedEvent(super::ClickedEvent),
        #[prost(message, tag = "107")]
        UnsubscribedEvent(super::UnsubscribedEvent),
        #[prost(message, tag = "108")]
        ReportedAbuseEvent(super::ReportedAbuseEvent),
    }
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct KeepAlive {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EmailNotificationOrKeepAlive {
    #[prost(oneof = "email_notification_or_keep_alive::Content", tags = "1, 2")]
    pub content: ::core::option::Option<email_notification_or_keep_alive::Content>,
}

pub mod email_notification_or_keep_alive {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Content {
        #[prost(message, tag = "1")]
        EmailNotification(super::EmailNotification),
        #[prost(message, tag = "2")]
        KeepAlive(super::KeepAlive),
    }
}

// =============================================================================
// clients
// =============================================================================

pub mod mail_delivery_service_client {
    use tonic::codegen::*;

    #[derive(Debug, Clone)]
    pub struct MailDeliveryServiceClient<T> {
        inner: tonic::client::Grpc<T>,
    }

    impl<T> MailDeliveryServiceClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }

        /// Queue one email. The server answers with one status per recipient.
        pub async fn send_email(
            &mut self,
            request: impl tonic::IntoRequest<super::OutgoingEmail>,
        ) -> std::result::Result<
            tonic::Response<tonic::codec::Streaming<super::EmailQueueStatus>>,
            tonic::Status,
        > {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/com.sourceforgery.tachikoma.grpc.frontend.maildelivery.MailDeliveryService/SendEmail",
            );
            let mut req = request.into_request();
            req.extensions_mut().insert(GrpcMethod::new(
                "com.sourceforgery.tachikoma.grpc.frontend.maildelivery.MailDeliveryService",
                "SendEmail",
            ));
            self.inner.server_streaming(req, path, codec).await
        }
    }
}

pub mod delivery_notification_service_client {
    use tonic::codegen::*;

    #[derive(Debug, Clone)]
    pub struct DeliveryNotificationServiceClient<T> {
        inner: tonic::client::Grpc<T>,
    }

    impl<T> DeliveryNotificationServiceClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }

        /// Open the notification stream. Idle periods are filled with keep-alives.
        pub async fn notification_stream_with_keep_alive(
            &mut self,
            request: impl tonic::IntoRequest<super::NotificationStreamParameters>,
        ) -> std::result::Result<
            tonic::Response<tonic::codec::Streaming<super::EmailNotificationOrKeepAlive>>,
            tonic::Status,
        > {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/com.sourceforgery.tachikoma.grpc.frontend.tracking.DeliveryNotificationService/NotificationStreamWithKeepAlive",
            );
            let mut req = request.into_request();
            req.extensions_mut().insert(GrpcMethod::new(
                "com.sourceforgery.tachikoma.grpc.frontend.tracking.DeliveryNotificationService",
                "NotificationStreamWithKeepAlive",
            ));
            self.inner.server_streaming(req, path, codec).await
        }
    }
}
