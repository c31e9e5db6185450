//! Outbound message records for the webhook response.
//!
//! Messages queued during a webhook call are appended to the response
//! document's `send_messages` list. The queue hands back live handles: the
//! queued record and the handle share one allocation, so assignments made
//! through the handle after queuing are visible in the serialized response.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// A single block of an email body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailBlock {
    /// Block kind understood by the platform renderer ("title", "text", ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Text content of the block.
    pub text: String,
}

impl EmailBlock {
    /// Create a title block.
    pub fn title(text: impl Into<String>) -> Self {
        Self {
            kind: "title".to_string(),
            text: text.into(),
        }
    }

    /// Create a plain text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

/// An outbound email record.
///
/// The typed fields cover the common surface; anything else the platform
/// accepts rides along in the flattened extras map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Primary recipient address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Carbon-copy recipients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    /// Blind-carbon-copy recipients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcc: Option<String>,
    /// Sender address override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Subject line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Ordered body blocks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body: Vec<EmailBlock>,
    /// Fields beyond the typed set, passed through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Live handle to a queued outbound message.
///
/// Cloning the handle clones the reference, not the record; the queue holds
/// the same record, so mutation through any clone is visible everywhere.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    inner: Arc<Mutex<EmailMessage>>,
}

impl OutboundMessage {
    fn new(message: EmailMessage) -> Self {
        Self {
            inner: Arc::new(Mutex::new(message)),
        }
    }

    /// Current subject line.
    pub fn subject(&self) -> Option<String> {
        self.inner.lock().subject.clone()
    }

    /// Replace the subject line.
    pub fn set_subject(&self, subject: impl Into<String>) {
        self.inner.lock().subject = Some(subject.into());
    }

    /// Replace the primary recipient.
    pub fn set_to(&self, to: impl Into<String>) {
        self.inner.lock().to = Some(to.into());
    }

    /// Apply an arbitrary edit to the underlying record.
    pub fn update(&self, edit: impl FnOnce(&mut EmailMessage)) {
        edit(&mut self.inner.lock());
    }

    /// Copy of the current record state.
    pub fn snapshot(&self) -> EmailMessage {
        self.inner.lock().clone()
    }
}

/// Append-only queue of outbound messages for one webhook call.
#[derive(Debug, Default)]
pub struct OutboundQueue {
    messages: Vec<OutboundMessage>,
}

impl OutboundQueue {
    /// Queue a message and return the live handle to it.
    pub fn push(&mut self, message: EmailMessage) -> OutboundMessage {
        let handle = OutboundMessage::new(message);
        self.messages.push(handle.clone());
        debug!("Queued outbound message ({} queued)", self.messages.len());
        handle
    }

    /// Whether anything has been queued.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of queued messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Snapshot the queue as a JSON array, in insertion order.
    pub fn to_json(&self) -> Value {
        Value::Array(
            self.messages
                .iter()
                .map(|message| {
                    serde_json::to_value(message.snapshot())
                        .expect("email message serializes to JSON")
                })
                .collect(),
        )
    }
}
