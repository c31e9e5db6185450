//! Namespaced settings-form builder.
//!
//! Assembles, per namespace, a JSON Schema document, a companion UI schema
//! with rendering directives, pre-populated form data and submission
//! metadata. Multiple namespaces coexist in one response; each is created
//! lazily on first reference and the same underlying entry is returned on
//! every subsequent reference.

mod fields;

pub use fields::{
    CheckboxOptions, InputOptions, InsertOptions, SelectOptions, SubmitButtonOptions,
};

use crate::json_path;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Marker embedded in generated markdown block keys.
const MARKDOWN_KEY_MARKER: &str = "_md_";

/// Marker embedded in generated alert block keys.
const ALERT_KEY_MARKER: &str = "_alert_";

/// Caller-usage errors raised by the form builder.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Field definition is missing a name")]
    MissingFieldName,
}

/// JSON Schema document for one settings namespace.
#[derive(Debug, Clone, Serialize)]
pub struct FormSchema {
    /// Form title shown above the rendered fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Always "object"; settings forms are flat objects.
    #[serde(rename = "type")]
    pub kind: String,
    /// Field name → field schema fragment.
    pub properties: Map<String, Value>,
}

impl FormSchema {
    fn new(title: Option<String>) -> Self {
        Self {
            title,
            kind: "object".to_string(),
            properties: Map::new(),
        }
    }
}

/// One namespace's settings form: schema, UI directives, pre-populated data
/// and submission metadata.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsEntry {
    #[serde(rename = "JSONSchema")]
    pub json_schema: FormSchema,
    #[serde(rename = "uiSchema")]
    pub ui_schema: Map<String, Value>,
    #[serde(rename = "formData")]
    pub form_data: Value,
    #[serde(rename = "formMeta")]
    pub form_meta: Map<String, Value>,
}

impl SettingsEntry {
    fn new(title: Option<String>) -> Self {
        Self {
            json_schema: FormSchema::new(title),
            ui_schema: Map::new(),
            form_data: Value::Object(Map::new()),
            form_meta: Map::new(),
        }
    }

    fn set_form_value(&mut self, name: &str, value: Value) {
        if !self.form_data.is_object() {
            self.form_data = Value::Object(Map::new());
        }
        if let Some(data) = self.form_data.as_object_mut() {
            data.insert(name.to_string(), value);
        }
    }
}

/// Clone-able live handle to one namespace's settings entry.
///
/// All clones handed out for a namespace share the same entry; field appends
/// through any of them accumulate in the one schema.
#[derive(Debug, Clone)]
pub struct SettingsForm {
    inner: Arc<Mutex<SettingsEntry>>,
}

impl SettingsForm {
    fn new(title: Option<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SettingsEntry::new(title))),
        }
    }

    /// Whether two handles refer to the same underlying entry.
    pub fn same_entry(&self, other: &SettingsForm) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Append a single-line string input. Returns the field key.
    pub fn input(&self, opts: InputOptions) -> Result<String, SettingsError> {
        self.append_string_field(opts, None)
    }

    /// Append a multi-line text input. Returns the field key.
    pub fn textarea(&self, opts: InputOptions) -> Result<String, SettingsError> {
        self.append_string_field(opts, Some("textarea"))
    }

    fn append_string_field(
        &self,
        opts: InputOptions,
        widget: Option<&str>,
    ) -> Result<String, SettingsError> {
        let name = required_name(opts.name)?;
        let mut entry = self.inner.lock();
        // description is encoded as an explicit null when absent: consumers
        // probe for the key's presence.
        entry.json_schema.properties.insert(
            name.clone(),
            json!({
                "type": "string",
                "title": opts.title,
                "description": opts.description,
            }),
        );
        let mut ui = Map::new();
        if let Some(widget) = widget {
            ui.insert("ui:widget".to_string(), Value::String(widget.to_string()));
        }
        if let Some(placeholder) = opts.placeholder {
            ui.insert("ui:placeholder".to_string(), Value::String(placeholder));
        }
        if let Some(help) = opts.help_text {
            ui.insert("ui:help".to_string(), Value::String(help));
        }
        if !ui.is_empty() {
            entry.ui_schema.insert(name.clone(), Value::Object(ui));
        }
        if let Some(default) = opts.default_value {
            entry.set_form_value(&name, default);
        }
        Ok(name)
    }

    /// Append a boolean checkbox. Returns the field key.
    pub fn checkbox(&self, opts: CheckboxOptions) -> Result<String, SettingsError> {
        let name = required_name(opts.name)?;
        let mut entry = self.inner.lock();
        entry.json_schema.properties.insert(
            name.clone(),
            json!({
                "type": "boolean",
                "title": opts.title,
            }),
        );
        if let Some(default) = opts.default_value {
            entry.set_form_value(&name, Value::Bool(default));
        }
        Ok(name)
    }

    /// Append a select dropdown. Returns the field key.
    pub fn select(&self, opts: SelectOptions) -> Result<String, SettingsError> {
        let name = required_name(opts.name)?;
        let mut entry = self.inner.lock();
        let mut schema = Map::new();
        schema.insert("type".to_string(), Value::String("string".to_string()));
        schema.insert("title".to_string(), json!(opts.title));
        if let Some(description) = opts.description {
            schema.insert("description".to_string(), Value::String(description));
        }
        schema.insert("enum".to_string(), json!(opts.options));
        entry
            .json_schema
            .properties
            .insert(name.clone(), Value::Object(schema));
        let mut ui = Map::new();
        if let Some(help) = opts.help_text {
            ui.insert("ui:help".to_string(), Value::String(help));
        }
        if let Some(placeholder) = opts.placeholder {
            ui.insert("ui:placeholder".to_string(), Value::String(placeholder));
        }
        ui.insert("ui:emptyValue".to_string(), Value::String(String::new()));
        entry.ui_schema.insert(name.clone(), Value::Object(ui));
        if let Some(default) = opts.default_value {
            entry.set_form_value(&name, Value::String(default));
        }
        Ok(name)
    }

    /// Append an alert block under a generated key. Returns the key.
    pub fn alert(&self, title: impl Into<String>) -> String {
        let key = synthetic_key(ALERT_KEY_MARKER);
        let mut entry = self.inner.lock();
        entry.json_schema.properties.insert(
            key.clone(),
            json!({
                "type": "string",
                "title": title.into(),
            }),
        );
        entry
            .ui_schema
            .insert(key.clone(), json!({"ui:widget": "alert"}));
        key
    }

    /// Append a markdown text block under a generated key. Returns the key.
    pub fn text(&self, markdown: impl Into<String>) -> String {
        let key = synthetic_key(MARKDOWN_KEY_MARKER);
        let mut entry = self.inner.lock();
        entry.json_schema.properties.insert(
            key.clone(),
            json!({
                "type": "string",
                "title": markdown.into(),
            }),
        );
        entry
            .ui_schema
            .insert(key.clone(), json!({"ui:widget": "markdown"}));
        key
    }

    /// Append a caller-supplied schema fragment verbatim. Returns the field
    /// key.
    pub fn insert(&self, opts: InsertOptions) -> Result<String, SettingsError> {
        let name = required_name(opts.name)?;
        let mut entry = self.inner.lock();
        entry
            .json_schema
            .properties
            .insert(name.clone(), opts.json_schema);
        if let Some(ui) = opts.ui_schema {
            entry.ui_schema.insert(name.clone(), ui);
        }
        Ok(name)
    }

    /// Merge values into the form data. Objects shallow-merge over existing
    /// values (overriding field defaults for the same keys), arrays replace
    /// the form data outright.
    pub fn populate(&self, data: Value) {
        let mut entry = self.inner.lock();
        json_path::merge_value(&mut entry.form_data, data);
    }

    /// Set submission metadata: button label and submission URL parameters.
    pub fn submit_button(&self, opts: SubmitButtonOptions) {
        let mut entry = self.inner.lock();
        if let Some(text) = opts.submit_text {
            entry
                .form_meta
                .insert("submitText".to_string(), Value::String(text));
        }
        if let Some(params) = opts.url_params {
            entry.form_meta.insert("urlParams".to_string(), params);
        }
    }

    /// Serialize the current entry state.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(&*self.inner.lock()).expect("settings entry serializes to JSON")
    }
}

fn required_name(name: Option<String>) -> Result<String, SettingsError> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(SettingsError::MissingFieldName),
    }
}

fn synthetic_key(marker: &str) -> String {
    format!("{}{}", marker, Uuid::new_v4().simple())
}

/// Lazily-created settings forms keyed by namespace.
#[derive(Debug, Default)]
pub struct SettingsRegistry {
    forms: Vec<(String, SettingsForm)>,
}

impl SettingsRegistry {
    /// Fetch the form for a namespace, creating it on first reference. The
    /// title only applies at creation; later references return the existing
    /// entry unchanged.
    pub fn get_or_create(&mut self, namespace: &str, title: Option<&str>) -> SettingsForm {
        if let Some((_, form)) = self.forms.iter().find(|(ns, _)| ns == namespace) {
            return form.clone();
        }
        debug!(namespace = %namespace, "Created settings namespace");
        let form = SettingsForm::new(title.map(str::to_string));
        self.forms.push((namespace.to_string(), form.clone()));
        form
    }

    /// Whether any namespace has been created.
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Namespace → serialized settings entry.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (namespace, form) in &self.forms {
            map.insert(namespace.clone(), form.to_json());
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SettingsForm {
        SettingsForm::new(Some("Memorize Settings".to_string()))
    }

    #[test]
    fn test_new_form_serializes_empty_documents() {
        let serialized = form().to_json();
        assert_eq!(serialized["JSONSchema"]["title"], json!("Memorize Settings"));
        assert_eq!(serialized["JSONSchema"]["type"], json!("object"));
        assert_eq!(serialized["JSONSchema"]["properties"], json!({}));
        assert_eq!(serialized["uiSchema"], json!({}));
        assert_eq!(serialized["formData"], json!({}));
        assert_eq!(serialized["formMeta"], json!({}));
    }

    #[test]
    fn test_input_writes_schema_with_explicit_null_description() {
        let form = form();
        form.input(InputOptions {
            name: Some("first_name".to_string()),
            title: Some("First name".to_string()),
            ..Default::default()
        })
        .expect("named field");
        let serialized = form.to_json();
        assert_eq!(
            serialized["JSONSchema"]["properties"]["first_name"],
            json!({"type": "string", "title": "First name", "description": null})
        );
        let props = serialized["JSONSchema"]["properties"]["first_name"]
            .as_object()
            .expect("field schema is an object");
        assert!(props.contains_key("description"));
    }

    #[test]
    fn test_input_without_name_is_rejected() {
        let err = form()
            .input(InputOptions {
                title: Some("No name".to_string()),
                ..Default::default()
            })
            .expect_err("missing name must be rejected");
        assert!(matches!(err, SettingsError::MissingFieldName));
    }

    #[test]
    fn test_input_default_lands_in_form_data() {
        let form = form();
        form.input(InputOptions {
            name: Some("first_name".to_string()),
            title: Some("First name".to_string()),
            default_value: Some(json!("Joe")),
            ..Default::default()
        })
        .expect("named field");
        assert_eq!(form.to_json()["formData"]["first_name"], json!("Joe"));
    }

    #[test]
    fn test_populate_overrides_defaults() {
        let form = form();
        form.input(InputOptions {
            name: Some("first_name".to_string()),
            default_value: Some(json!("Joe")),
            ..Default::default()
        })
        .expect("named field");
        form.populate(json!({"first_name": "Bob"}));
        assert_eq!(form.to_json()["formData"]["first_name"], json!("Bob"));
    }

    #[test]
    fn test_textarea_sets_widget() {
        let form = form();
        form.textarea(InputOptions {
            name: Some("essay".to_string()),
            title: Some("essay".to_string()),
            ..Default::default()
        })
        .expect("named field");
        let serialized = form.to_json();
        assert_eq!(
            serialized["JSONSchema"]["properties"]["essay"]["type"],
            json!("string")
        );
        assert_eq!(
            serialized["uiSchema"]["essay"]["ui:widget"],
            json!("textarea")
        );
    }

    #[test]
    fn test_checkbox_is_boolean() {
        let form = form();
        form.checkbox(CheckboxOptions {
            name: Some("notifications".to_string()),
            title: Some("Notifications".to_string()),
            ..Default::default()
        })
        .expect("named field");
        assert_eq!(
            form.to_json()["JSONSchema"]["properties"]["notifications"]["type"],
            json!("boolean")
        );
    }

    #[test]
    fn test_select_ui_directives_exact_shape() {
        let form = form();
        form.select(SelectOptions {
            name: Some("select_something".to_string()),
            title: Some("What's your favorite color?".to_string()),
            options: vec!["Red".to_string(), "Blue".to_string()],
            help_text: Some("(Hint: Blue is the best)".to_string()),
            ..Default::default()
        })
        .expect("named field");
        let serialized = form.to_json();
        assert_eq!(
            serialized["uiSchema"]["select_something"],
            json!({"ui:help": "(Hint: Blue is the best)", "ui:emptyValue": ""})
        );
        assert_eq!(
            serialized["JSONSchema"]["properties"]["select_something"]["enum"],
            json!(["Red", "Blue"])
        );
    }

    #[test]
    fn test_select_with_placeholder_emits_all_directives() {
        let form = form();
        form.select(SelectOptions {
            name: Some("color".to_string()),
            options: vec!["Red".to_string()],
            placeholder: Some("Select something".to_string()),
            help_text: Some("hint".to_string()),
            ..Default::default()
        })
        .expect("named field");
        assert_eq!(
            form.to_json()["uiSchema"]["color"],
            json!({
                "ui:help": "hint",
                "ui:placeholder": "Select something",
                "ui:emptyValue": ""
            })
        );
    }

    #[test]
    fn test_text_block_key_carries_marker() {
        let form = form();
        let key = form.text("## Connect\n[Connect](https://example.com)");
        assert!(key.contains("_md_"));
        let serialized = form.to_json();
        assert!(serialized["JSONSchema"]["properties"]
            .as_object()
            .expect("properties object")
            .contains_key(&key));
        assert_eq!(serialized["uiSchema"][&key]["ui:widget"], json!("markdown"));
    }

    #[test]
    fn test_alert_block_key_carries_marker() {
        let form = form();
        let key = form.alert("An Alert Dialog");
        assert!(key.contains("_alert_"));
        assert_eq!(
            form.to_json()["JSONSchema"]["properties"][&key]["title"],
            json!("An Alert Dialog")
        );
    }

    #[test]
    fn test_insert_places_fragments_verbatim() {
        let form = form();
        form.insert(InsertOptions {
            name: Some("my_selection".to_string()),
            json_schema: json!({
                "title": "Something direct",
                "type": "string",
                "enum": ["foo", "bar"]
            }),
            ui_schema: Some(json!({"ui:placeholder": "Choose one"})),
        })
        .expect("named field");
        let serialized = form.to_json();
        assert_eq!(
            serialized["JSONSchema"]["properties"]["my_selection"]["enum"],
            json!(["foo", "bar"])
        );
        assert_eq!(
            serialized["uiSchema"]["my_selection"],
            json!({"ui:placeholder": "Choose one"})
        );
    }

    #[test]
    fn test_submit_button_writes_form_meta() {
        let form = form();
        form.submit_button(SubmitButtonOptions {
            submit_text: Some("Submit Me".to_string()),
            url_params: Some(json!({"foo": "bar"})),
        });
        let serialized = form.to_json();
        assert_eq!(serialized["formMeta"]["submitText"], json!("Submit Me"));
        assert_eq!(serialized["formMeta"]["urlParams"], json!({"foo": "bar"}));
    }

    #[test]
    fn test_properties_accumulate_monotonically() {
        let form = form();
        form.input(InputOptions {
            name: Some("first".to_string()),
            ..Default::default()
        })
        .expect("named field");
        form.checkbox(CheckboxOptions {
            name: Some("second".to_string()),
            ..Default::default()
        })
        .expect("named field");
        form.text("a block");
        let properties = form.to_json()["JSONSchema"]["properties"]
            .as_object()
            .expect("properties object")
            .len();
        assert_eq!(properties, 3);
    }

    #[test]
    fn test_registry_is_idempotent_per_namespace() {
        let mut registry = SettingsRegistry::default();
        let first = registry.get_or_create("memorize", Some("Memorize Settings"));
        let second = registry.get_or_create("memorize", Some("Memorize Settings"));
        assert!(first.same_entry(&second));
        first
            .input(InputOptions {
                name: Some("first_name".to_string()),
                ..Default::default()
            })
            .expect("named field");
        // The append through the first handle is visible through the second.
        assert!(second.to_json()["JSONSchema"]["properties"]
            .as_object()
            .expect("properties object")
            .contains_key("first_name"));
    }

    #[test]
    fn test_registry_keeps_namespaces_separate() {
        let mut registry = SettingsRegistry::default();
        let github = registry.get_or_create("github", Some("Github Settings"));
        let memorize = registry.get_or_create("memorize", None);
        github.populate(json!({"first_name": "Bob"}));
        memorize.populate(json!({"first_name": "Joe"}));
        let serialized = registry.to_json();
        assert_eq!(serialized["github"]["formData"]["first_name"], json!("Bob"));
        assert_eq!(
            serialized["memorize"]["formData"]["first_name"],
            json!("Joe")
        );
    }
}
