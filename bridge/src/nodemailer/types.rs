//! Inbound nodemailer-style email document.
//!
//! A subset of the nodemailer message object, as posted by the marketing
//! platform to `/tachikoma/sendEmail`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Header some senders use to carry the campaign id.
pub const CAMPAIGN_HEADER: &str = "X-Campaign-Id";

/// Address with optional display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundAddress {
    pub address: String,
    #[serde(default)]
    pub name: String,
}

/// Attachment with base64 payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundAttachment {
    /// Base64 encoded content
    #[serde(rename = "content")]
    pub base64_content: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub content_type: String,
}

/// Inbound email as accepted by the HTTP intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEmail {
    pub from: InboundAddress,
    #[serde(default)]
    pub to: Vec<InboundAddress>,
    #[serde(default)]
    pub cc: Vec<InboundAddress>,
    /// Plain addresses, no display names
    #[serde(default)]
    pub bcc: Vec<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub attachments: Vec<InboundAttachment>,
    #[serde(default)]
    pub reply_to: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
}

impl InboundEmail {
    /// Decode a request body. Rejects an empty from address.
    pub fn from_json(body: &[u8]) -> Result<Self, DecodeError> {
        let email: InboundEmail = serde_json::from_slice(body)?;

        if email.from.address.trim().is_empty() {
            return Err(DecodeError::EmptySender);
        }

        Ok(email)
    }

    /// Campaign id from the explicit field, falling back to the header.
    pub fn campaign(&self) -> Option<&str> {
        self.campaign_id
            .as_deref()
            .or_else(|| {
                self.headers
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(CAMPAIGN_HEADER))
                    .map(|(_, value)| value.as_str())
            })
            .filter(|id| !id.is_empty())
    }
}
