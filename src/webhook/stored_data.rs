//! Layered stored-data access for task and extension entities.

use crate::json_path;
use serde_json::Value;

/// Accessor over one entity's `stored_data`, resolving reads against the
/// request and response documents with response-wins precedence: once the
/// response carries any non-null `stored_data`, it is the exclusive source
/// for every read. An explicit reset to null re-enables request fallback.
#[derive(Debug)]
pub struct StoredData<'a> {
    request: &'a Value,
    response: &'a mut Value,
    entity: &'static str,
}

impl<'a> StoredData<'a> {
    pub(crate) fn new(request: &'a Value, response: &'a mut Value, entity: &'static str) -> Self {
        Self {
            request,
            response,
            entity,
        }
    }

    fn data_path(&self) -> String {
        format!("{}.stored_data", self.entity)
    }

    fn source(&self) -> Option<&Value> {
        let path = self.data_path();
        match json_path::get(self.response, &path) {
            Some(value) if !value.is_null() => Some(value),
            _ => json_path::get(self.request, &path).filter(|value| !value.is_null()),
        }
    }

    /// The whole `stored_data` value under response-wins precedence.
    pub fn all(&self) -> Option<Value> {
        self.source().cloned()
    }

    /// Dotted-path read against the precedence-selected document.
    pub fn get(&self, path: &str) -> Option<Value> {
        json_path::get(self.source()?, path).cloned()
    }

    /// Like [`get`](Self::get), returning `default` when the path does not
    /// resolve.
    pub fn get_or(&self, path: &str, default: Value) -> Value {
        self.get(path).unwrap_or(default)
    }

    /// Root-form write into the response-side `stored_data`: an object
    /// shallow-merges over the existing response-side value (request data is
    /// never copied forward), arrays and scalars replace it outright.
    pub fn set(&mut self, value: Value) {
        let path = self.data_path();
        json_path::merge(self.response, &path, value);
    }

    /// Merge a value at a dotted path under the response-side `stored_data`,
    /// with the same object-merge / array-replace rules.
    pub fn set_path(&mut self, path: &str, value: Value) {
        let full = format!("{}.{}", self.data_path(), path);
        json_path::merge(self.response, &full, value);
    }
}
