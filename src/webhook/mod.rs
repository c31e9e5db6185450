//! Webhook call context.
//!
//! One [`WebhookContext`] wraps a single webhook invocation: the immutable
//! request document handed in by the platform and the mutable response
//! document handed back. Handler code reads prior stored state, mutates
//! task/extension data, builds settings forms and queues outbound messages;
//! the final response document is read back out for serialization.

pub mod reference_email;
pub mod stored_data;

pub use reference_email::ReferenceEmail;
pub use stored_data::StoredData;

use crate::json_path;
use crate::messages::{EmailBlock, EmailMessage, OutboundMessage, OutboundQueue};
use crate::settings::{SettingsForm, SettingsRegistry};
use serde_json::{json, Value};
use tracing::debug;

/// Version marker stamped on every response document.
pub const RESPONSE_VERSION: &str = "1";

/// Per-call webhook context: request and response documents, per-entity
/// stored-data accessors, the settings-form registry and the outbound
/// message queue. Call-scoped and single-threaded; handles returned from it
/// are valid only for the current call.
#[derive(Debug)]
pub struct WebhookContext {
    request: Value,
    response: Value,
    settings: SettingsRegistry,
    outbound: OutboundQueue,
}

impl WebhookContext {
    /// Wrap a parsed request document and initialize an empty response.
    pub fn new(request: Value) -> Self {
        Self {
            request,
            response: json!({ "version": RESPONSE_VERSION }),
            settings: SettingsRegistry::default(),
            outbound: OutboundQueue::default(),
        }
    }

    /// Command identifier off the request document, if present.
    pub fn command(&self) -> Option<&str> {
        self.request.get("command").and_then(Value::as_str)
    }

    /// Event identifier off the request document, if present.
    pub fn event(&self) -> Option<&str> {
        self.request.get("event").and_then(Value::as_str)
    }

    /// Action identifier off the request document, if present.
    pub fn action(&self) -> Option<&str> {
        self.request.get("action").and_then(Value::as_str)
    }

    /// The incoming request document. Never mutated by this crate.
    pub fn request_json(&self) -> &Value {
        &self.request
    }

    /// Compose the final response document: the mutable base (version, task,
    /// extension) plus the settings entries and the queued messages. The
    /// `settings` and `send_messages` keys are omitted while empty.
    pub fn response_json(&self) -> Value {
        let mut response = self.response.clone();
        if !self.settings.is_empty() {
            json_path::set(&mut response, "settings", self.settings.to_json());
        }
        if !self.outbound.is_empty() {
            json_path::set(&mut response, "send_messages", self.outbound.to_json());
        }
        response
    }

    /// Response-wins read across both documents.
    pub fn get(&self, path: &str) -> Option<Value> {
        json_path::get(&self.response, path)
            .or_else(|| json_path::get(&self.request, path))
            .cloned()
    }

    /// Like [`get`](Self::get), returning `default` when the path does not
    /// resolve.
    pub fn get_or(&self, path: &str, default: Value) -> Value {
        self.get(path).unwrap_or(default)
    }

    /// Write a value at a dotted path on the response document.
    pub fn set(&mut self, path: &str, value: Value) {
        json_path::set(&mut self.response, path, value);
    }

    /// Stored-data accessor for the task entity.
    pub fn task_data(&mut self) -> StoredData<'_> {
        StoredData::new(&self.request, &mut self.response, "task")
    }

    /// Stored-data accessor for the extension entity.
    pub fn extension_data(&mut self) -> StoredData<'_> {
        StoredData::new(&self.request, &mut self.response, "extension")
    }

    /// Accessor for the task's reference email.
    pub fn reference_email(&mut self) -> ReferenceEmail<'_> {
        ReferenceEmail::new(&self.request, &mut self.response)
    }

    /// Fetch the settings form for a namespace, creating it on first
    /// reference. Repeated calls return a handle to the same entry.
    pub fn settings_form(&mut self, namespace: &str, title: Option<&str>) -> SettingsForm {
        self.settings.get_or_create(namespace, title)
    }

    /// Queue an outbound email. The returned handle and the queued record
    /// are the same object: later assignments through the handle are visible
    /// in the serialized response.
    pub fn add_email(&mut self, message: EmailMessage) -> OutboundMessage {
        self.outbound.push(message)
    }

    /// Queue a minimal reply: one text block and subject both set to `text`,
    /// addressed to the reference email's reply-to.
    pub fn quick_reply(&mut self, text: impl Into<String>) -> OutboundMessage {
        let text = text.into();
        let to = self.reference_email().reply_to();
        debug!(subject = %text, "Queueing quick reply");
        self.add_email(EmailMessage {
            to,
            subject: Some(text.clone()),
            body: vec![EmailBlock::text(text)],
            ..Default::default()
        })
    }

    /// Invite addresses to the extension, replacing any prior list.
    pub fn invite(&mut self, addresses: Vec<String>) {
        json_path::set(&mut self.response, "extension.invite", json!(addresses));
    }

    /// Schedule the task with a human-readable interval ("1day", "3weeks").
    pub fn set_trigger_time(&mut self, interval: impl Into<String>) {
        json_path::set(
            &mut self.response,
            "task.trigger_timeformat",
            Value::String(interval.into()),
        );
    }

    /// Schedule the task with an exact timestamp, passed through in the
    /// platform's epoch units unchanged.
    pub fn set_trigger_timestamp(&mut self, timestamp: i64) {
        json_path::set(&mut self.response, "task.trigger_time", json!(timestamp));
    }

    /// Mark the task completed.
    pub fn complete_task(&mut self) {
        json_path::set(&mut self.response, "task.completed", json!(1));
    }
}
