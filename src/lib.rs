//! chitin webhook helper library
//!
//! Wraps the JSON documents of one bot-platform webhook call: handler code
//! reads prior stored state off the incoming request document, mutates the
//! outgoing response document, queues outbound messages and assembles
//! namespaced settings forms (JSON Schema + UI schema + form data) for the
//! platform to render.

pub mod json_path;
pub mod messages;
pub mod settings;
pub mod webhook;

pub use messages::{EmailBlock, EmailMessage, OutboundMessage};
pub use settings::{SettingsError, SettingsForm};
pub use webhook::WebhookContext;
