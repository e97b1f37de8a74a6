//! Destination form, its submit button and its metadata

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::DestinationField;

/// Submit button synthesized from the source's submit settings
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitButton {
    pub key: String,
    pub text: Option<String>,
    pub class: Option<String>,
}

/// Multi-step wrapper (fixed start/end templates)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepWrapper;

/// A translated form schema
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationForm {
    pub title: String,
    /// Keyed by source field id, in source order
    pub fields: IndexMap<String, DestinationField>,
    pub submit_button: SubmitButton,
    pub step_wrapper: Option<StepWrapper>,
}

/// What happens after a successful submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RedirectTo {
    #[default]
    SamePage,
    CustomPage,
    CustomUrl,
}

impl RedirectTo {
    /// Map the source confirmation type ("message", "page", "redirect")
    pub fn from_source(kind: &str) -> Self {
        match kind {
            "redirect" => RedirectTo::CustomUrl,
            "page" => RedirectTo::CustomPage,
            _ => RedirectTo::SamePage,
        }
    }
}

/// A submission confirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub message_to_show: String,
    pub same_page_form_behavior: String,
    pub redirect_to: RedirectTo,
    pub custom_page: Option<i64>,
    pub custom_url: Option<String>,
    pub active: bool,
}

/// Confirmation fields read from the source; unset fields fall back to defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfirmationDraft {
    pub name: Option<String>,
    pub message_to_show: Option<String>,
    pub same_page_form_behavior: Option<String>,
    pub redirect_to: Option<RedirectTo>,
    pub custom_page: Option<i64>,
    pub custom_url: Option<String>,
    pub active: Option<bool>,
}

impl ConfirmationDraft {
    /// Merge with destination defaults, source values win when present
    pub fn merge(self, defaults: &Confirmation) -> Confirmation {
        Confirmation {
            name: self.name.or_else(|| defaults.name.clone()),
            message_to_show: self
                .message_to_show
                .unwrap_or_else(|| defaults.message_to_show.clone()),
            same_page_form_behavior: self
                .same_page_form_behavior
                .unwrap_or_else(|| defaults.same_page_form_behavior.clone()),
            redirect_to: self.redirect_to.unwrap_or(defaults.redirect_to),
            custom_page: self.custom_page.or(defaults.custom_page),
            custom_url: self.custom_url.or_else(|| defaults.custom_url.clone()),
            active: self.active.unwrap_or(defaults.active),
        }
    }
}

/// Notification recipient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendTo {
    #[serde(rename = "type")]
    pub kind: String,
    pub email: String,
    pub field: String,
    pub routing: Vec<serde_json::Value>,
}

/// An email notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub send_to: SendTo,
    pub enabled: bool,
    pub name: String,
    pub subject: String,
    pub to: String,
    pub reply_to: String,
    pub message: String,
    pub from_name: Option<String>,
    pub from_email: Option<String>,
    pub bcc: String,
}

/// A single advanced-validation condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationCondition {
    pub field: String,
    pub operator: String,
    pub value: String,
}

/// Advanced validation settings; migrated forms always start disabled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedValidation {
    pub status: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub conditions: Vec<ValidationCondition>,
    pub error_message: String,
    pub validation_type: String,
}

impl Default for AdvancedValidation {
    fn default() -> Self {
        AdvancedValidation {
            status: false,
            kind: "all".to_string(),
            conditions: vec![ValidationCondition {
                field: String::new(),
                operator: "=".to_string(),
                value: String::new(),
            }],
            error_message: String::new(),
            validation_type: "fail_on_condition_met".to_string(),
        }
    }
}

/// `formSettings` meta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSettings {
    pub confirmation: Confirmation,
    pub restrictions: serde_json::Value,
    pub layout: serde_json::Value,
}

/// Metadata written next to a migrated form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormMeta {
    pub form_settings: FormSettings,
    pub advanced_validation_settings: AdvancedValidation,
    #[serde(rename = "delete_entry_on_submission")]
    pub delete_entry_on_submission: String,
    pub notifications: Vec<Notification>,
    pub confirmations: Vec<Confirmation>,
}

/// Destination-side defaults for new forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefaults {
    pub confirmation: Confirmation,
    pub restrictions: serde_json::Value,
    pub layout: serde_json::Value,
}

impl Default for FormDefaults {
    fn default() -> Self {
        FormDefaults {
            confirmation: Confirmation {
                name: None,
                message_to_show: "Thank you for your message. We will get in touch with you shortly"
                    .to_string(),
                same_page_form_behavior: "hide_form".to_string(),
                redirect_to: RedirectTo::SamePage,
                custom_page: None,
                custom_url: None,
                active: true,
            },
            restrictions: json!({
                "limitNumberOfEntries": {
                    "enabled": false,
                    "numberOfEntries": null,
                    "period": "total",
                    "limitReachedMsg": "Maximum number of entries exceeded."
                },
                "scheduleForm": {
                    "enabled": false,
                    "start": null,
                    "end": null,
                    "pendingMsg": "Form submission is not started yet.",
                    "expiredMsg": "Form submission is now closed."
                },
                "requireLogin": {
                    "enabled": false,
                    "requireLoginMsg": "You must be logged in to submit the form."
                },
                "denyEmptySubmission": {
                    "enabled": false,
                    "message": "Sorry, you cannot submit an empty form. Let's hear what you wanna say."
                }
            }),
            layout: json!({
                "labelPlacement": "top",
                "helpMessagePlacement": "with_label",
                "errorMessagePlacement": "inline",
                "cssClassName": "",
                "asteriskPlacement": "asterisk-right"
            }),
        }
    }
}
