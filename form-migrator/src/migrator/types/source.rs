//! Read-only projections of the source plugin's stored forms and entries

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::migrator::translate::path::{is_filled, is_true, members, resolve_path, scalar_string};

/// A form as stored by the source plugin
#[derive(Debug, Clone, PartialEq)]
pub struct SourceForm {
    /// Source post ID
    pub id: String,
    /// Post title
    pub name: String,
    /// Fields in stored order
    pub fields: Vec<SourceField>,
    /// Raw settings blob (confirmations, notifications, submit button)
    pub settings: Value,
}

impl SourceForm {
    /// Create a form with no settings
    pub fn new(id: impl Into<String>, name: impl Into<String>, fields: Vec<SourceField>) -> Self {
        SourceForm {
            id: id.into(),
            name: name.into(),
            fields,
            settings: Value::Object(Default::default()),
        }
    }

    /// Attach a settings blob
    pub fn with_settings(mut self, settings: Value) -> Self {
        self.settings = settings;
        self
    }

    /// Build a form from a stored post: its ID, title and JSON `post_content`
    pub fn from_post(
        id: impl Into<String>,
        title: impl Into<String>,
        content: &str,
    ) -> Result<Self, serde_json::Error> {
        let data: Value = serde_json::from_str(content)?;

        let fields: Vec<SourceField> = resolve_path(&data, "fields")
            .map(|fields| match fields {
                // Keyed by field id; fall back to the key when the id is missing
                Value::Object(map) => map
                    .iter()
                    .filter_map(|(key, raw)| SourceField::from_json(raw, Some(key)))
                    .collect(),
                other => members(Some(other))
                    .into_iter()
                    .filter_map(|raw| SourceField::from_json(raw, None))
                    .collect(),
            })
            .unwrap_or_default();

        let settings = resolve_path(&data, "settings")
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default()));

        Ok(SourceForm::new(id, title, fields).with_settings(settings))
    }

    /// Look up a settings value by dotted path
    pub fn setting(&self, path: &str) -> Option<&Value> {
        resolve_path(&self.settings, path)
    }

    /// Settings value rendered as a string
    pub fn setting_str(&self, path: &str) -> Option<String> {
        self.setting(path).and_then(scalar_string)
    }

    /// Settings flag
    pub fn setting_is_true(&self, path: &str) -> bool {
        is_true(self.setting(path))
    }
}

/// One field of a source form: an id, a type tag and a bag of attributes
#[derive(Debug, Clone, PartialEq)]
pub struct SourceField {
    pub id: String,
    /// Source type tag (e.g. "text", "name", "number-slider")
    pub kind: String,
    attrs: Value,
}

impl SourceField {
    /// Create a field from its attribute bag
    pub fn new(id: impl Into<String>, kind: impl Into<String>, attrs: Value) -> Self {
        SourceField {
            id: id.into(),
            kind: kind.into(),
            attrs,
        }
    }

    /// Parse a stored field object; `fallback_id` is used when it carries no `id`
    pub fn from_json(raw: &Value, fallback_id: Option<&str>) -> Option<Self> {
        if !raw.is_object() {
            return None;
        }

        let id = resolve_path(raw, "id")
            .and_then(scalar_string)
            .filter(|id| !id.is_empty())
            .or_else(|| fallback_id.map(str::to_string))?;

        let kind = resolve_path(raw, "type")
            .and_then(scalar_string)
            .unwrap_or_default();

        Some(SourceField::new(id, kind, raw.clone()))
    }

    /// Raw attribute lookup (dotted paths allowed); `null` counts as missing
    pub fn attr(&self, key: &str) -> Option<&Value> {
        resolve_path(&self.attrs, key)
    }

    /// Attribute as string, or `default` when missing
    pub fn str_or(&self, key: &str, default: &str) -> String {
        self.attr(key)
            .and_then(scalar_string)
            .unwrap_or_else(|| default.to_string())
    }

    /// Attribute as string only when it is filled (not "", "0", false, ...)
    pub fn filled_str(&self, key: &str) -> Option<String> {
        self.attr(key)
            .filter(|v| is_filled(v))
            .and_then(scalar_string)
    }

    /// Checkbox-style flag
    pub fn is_true(&self, key: &str) -> bool {
        is_true(self.attr(key))
    }

    /// Field label, empty when missing
    pub fn label(&self) -> String {
        self.str_or("label", "")
    }
}

/// A stored submission row, payload still encoded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSubmission {
    pub entry_id: String,
    pub form_id: String,
    /// JSON object keyed by field id
    pub fields: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub date_modified: Option<String>,
}
