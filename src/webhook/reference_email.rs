//! Merged view over the task's reference email.

use crate::json_path;
use serde_json::{json, Value};

/// Path of the reference email on both documents.
const REFERENCE_EMAIL_PATH: &str = "task.reference_email";

/// Accessor over `task.reference_email`: reads merge the request-side object
/// beneath the response-side overrides, writes shallow-merge into the
/// response side only.
#[derive(Debug)]
pub struct ReferenceEmail<'a> {
    request: &'a Value,
    response: &'a mut Value,
}

impl<'a> ReferenceEmail<'a> {
    pub(crate) fn new(request: &'a Value, response: &'a mut Value) -> Self {
        Self { request, response }
    }

    /// The merged view: request-side fields with response-side fields
    /// layered on top, key by key. Neither source is mutated.
    pub fn get(&self) -> Value {
        let mut merged = json_path::get(self.request, REFERENCE_EMAIL_PATH)
            .cloned()
            .unwrap_or_else(|| json!({}));
        if let Some(overrides) = json_path::get(self.response, REFERENCE_EMAIL_PATH) {
            json_path::merge_value(&mut merged, overrides.clone());
        }
        merged
    }

    /// Shallow-merge `partial` into the response-side object. The response
    /// side is seeded from the current merged view, so inherited fields
    /// survive unless overwritten.
    pub fn set(&mut self, partial: Value) {
        let mut merged = self.get();
        json_path::merge_value(&mut merged, partial);
        json_path::set(self.response, REFERENCE_EMAIL_PATH, merged);
    }

    /// The reply-to address off the merged view, falling back to the sender
    /// address when `reply_to` is absent.
    pub fn reply_to(&self) -> Option<String> {
        let email = self.get();
        json_path::get(&email, "reply_to")
            .filter(|value| !value.is_null())
            .or_else(|| json_path::get(&email, "from"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
