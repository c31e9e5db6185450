//! Field definitions accepted by the settings-form builder.

use serde_json::Value;

/// Options for a single-line string input (also used for textareas).
#[derive(Debug, Clone, Default)]
pub struct InputOptions {
    /// Field name; becomes the key under the schema's `properties`. Required.
    pub name: Option<String>,
    /// Label shown next to the field.
    pub title: Option<String>,
    /// Longer description rendered with the label.
    pub description: Option<String>,
    /// Help text rendered under the field.
    pub help_text: Option<String>,
    /// Placeholder shown while the field is empty.
    pub placeholder: Option<String>,
    /// Pre-populated value written into the form data.
    pub default_value: Option<Value>,
}

/// Options for a boolean checkbox.
#[derive(Debug, Clone, Default)]
pub struct CheckboxOptions {
    /// Field name. Required.
    pub name: Option<String>,
    /// Label shown next to the checkbox.
    pub title: Option<String>,
    /// Pre-populated checked state.
    pub default_value: Option<bool>,
}

/// Options for a select dropdown.
#[derive(Debug, Clone, Default)]
pub struct SelectOptions {
    /// Field name. Required.
    pub name: Option<String>,
    /// Label shown next to the dropdown.
    pub title: Option<String>,
    /// Longer description rendered with the label.
    pub description: Option<String>,
    /// Selectable values, in display order.
    pub options: Vec<String>,
    /// Placeholder shown while nothing is selected.
    pub placeholder: Option<String>,
    /// Help text rendered under the dropdown.
    pub help_text: Option<String>,
    /// Pre-selected value written into the form data.
    pub default_value: Option<String>,
}

/// A caller-supplied schema fragment, bypassing field-kind inference.
#[derive(Debug, Clone, Default)]
pub struct InsertOptions {
    /// Field name. Required.
    pub name: Option<String>,
    /// Verbatim JSON Schema fragment for the field.
    pub json_schema: Value,
    /// Verbatim UI schema fragment for the field.
    pub ui_schema: Option<Value>,
}

/// Submission metadata for a settings form.
#[derive(Debug, Clone, Default)]
pub struct SubmitButtonOptions {
    /// Label on the submit button.
    pub submit_text: Option<String>,
    /// Query parameters appended to the submission URL.
    pub url_params: Option<Value>,
}
