//! Nodemailer side of the bridge.
//!
//! ```text
//! JSON body → InboundEmail::from_json() → to_outgoing_email() → OutgoingEmail
//! ```

pub mod converters;
pub mod types;

pub use converters::{to_outgoing_email, CAMPAIGN_METADATA_KEY};
pub use types::{InboundAddress, InboundAttachment, InboundEmail};
