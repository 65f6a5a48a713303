//! Notification side of the bridge.
//!
//! ```text
//! Tachikoma stream → consumer → classify() → WebhookEmitter → webhook receiver
//! ```

pub mod consumer;
pub mod webhook;

pub use consumer::{consume, run, StreamSummary};
pub use webhook::{build_payload, classify, EventKind, WebhookEmitter, WebhookPayload};
