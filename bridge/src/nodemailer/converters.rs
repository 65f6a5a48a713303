//! Conversion from the nodemailer document to a Tachikoma `OutgoingEmail`.
//!
//! Two mappings are not what the field names suggest:
//! - `cc` is merged into the recipient list after `to`; Tachikoma sees no cc
//! - the outbound subject is taken from `text`, the HTML body from `html`;
//!   `subject` is only used when `text` is empty

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

use crate::error::DecodeError;
use crate::nodemailer::types::{InboundAddress, InboundAttachment, InboundEmail};
use crate::tachikoma::proto::{
    outgoing_email, Attachment, EmailAddress, EmailRecipient, NamedEmailAddress, OutgoingEmail,
    StaticBody, TrackingData,
};

/// Tracking metadata key for the campaign id.
pub const CAMPAIGN_METADATA_KEY: &str = "campaign";

pub fn to_named_address(address: &InboundAddress) -> NamedEmailAddress {
    NamedEmailAddress {
        email: address.address.clone(),
        name: address.name.clone(),
    }
}

pub fn to_plain_addresses(addresses: &[String]) -> Vec<EmailAddress> {
    addresses
        .iter()
        .map(|email| EmailAddress {
            email: email.clone(),
        })
        .collect()
}

/// Order and duplicates are preserved; Tachikoma decides what to do with them.
pub fn to_recipients(addresses: &[InboundAddress]) -> Vec<EmailRecipient> {
    addresses
        .iter()
        .map(|address| EmailRecipient {
            named_email: Some(to_named_address(address)),
            metadata: HashMap::new(),
        })
        .collect()
}

/// Decode every attachment, stopping at the first bad payload.
pub fn decode_attachments(
    attachments: &[InboundAttachment],
) -> Result<Vec<Attachment>, DecodeError> {
    attachments
        .iter()
        .enumerate()
        .map(|(index, attachment)| {
            let data = STANDARD
                .decode(attachment.base64_content.as_bytes())
                .map_err(|source| DecodeError::Attachment {
                    index,
                    filename: attachment.filename.clone(),
                    source,
                })?;

            Ok(Attachment {
                data,
                content_type: attachment.content_type.clone(),
                file_name: attachment.filename.clone(),
            })
        })
        .collect()
}

/// Tracking data for the outbound email. Only the campaign id is carried.
pub fn to_tracking_data(campaign: Option<&str>) -> TrackingData {
    let mut metadata = HashMap::new();
    if let Some(campaign) = campaign {
        metadata.insert(CAMPAIGN_METADATA_KEY.to_string(), campaign.to_string());
    }

    TrackingData {
        metadata,
        ..Default::default()
    }
}

/// Build the outgoing email. Fails only on malformed attachment base64.
pub fn to_outgoing_email(email: InboundEmail) -> Result<OutgoingEmail, DecodeError> {
    let attachments = decode_attachments(&email.attachments)?;

    let mut recipients = to_recipients(&email.to);
    recipients.extend(to_recipients(&email.cc));

    let tracking_data = to_tracking_data(email.campaign());

    let subject = if email.text.is_empty() {
        email.subject
    } else {
        email.text
    };

    let reply_to = if email.reply_to.is_empty() {
        None
    } else {
        Some(EmailAddress {
            email: email.reply_to.clone(),
        })
    };

    debug!(
        recipients = recipients.len(),
        bcc = email.bcc.len(),
        attachments = attachments.len(),
        has_campaign = tracking_data.metadata.contains_key(CAMPAIGN_METADATA_KEY),
        "outgoing_email_built"
    );

    Ok(OutgoingEmail {
        recipients,
        bcc: to_plain_addresses(&email.bcc),
        from: Some(to_named_address(&email.from)),
        reply_to,
        headers: email.headers,
        tracking_data: Some(tracking_data),
        attachments,
        body: Some(outgoing_email::Body::Static(StaticBody {
            html_body: email.html,
            plaintext_body: String::new(),
            subject,
        })),
    })
}
