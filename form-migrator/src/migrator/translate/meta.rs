//! Form metadata: confirmations, notifications and settings

use serde_json::Value;

use crate::migrator::types::{
    AdvancedValidation, Confirmation, ConfirmationDraft, FormDefaults, FormMeta, FormSettings,
    Notification, RedirectTo, SendTo, SourceForm,
};

use super::path::{members, resolve_path, scalar_string};

/// Placeholder the source uses for "all submitted fields"
const SOURCE_ALL_FIELDS: &str = "{all_fields}";
/// Destination equivalent
const DESTINATION_ALL_DATA: &str = "{all_data}";
const ADMIN_EMAIL: &str = "{wp.admin_email}";

/// Derive the full metadata record for a form
pub fn translate_meta(form: &SourceForm, defaults: &FormDefaults) -> FormMeta {
    let mut confirmations = translate_confirmations(form, &defaults.confirmation).into_iter();

    // First confirmation is the default one; no confirmations means destination defaults
    let default_confirmation = confirmations
        .next()
        .unwrap_or_else(|| defaults.confirmation.clone());

    FormMeta {
        form_settings: FormSettings {
            confirmation: default_confirmation,
            restrictions: defaults.restrictions.clone(),
            layout: defaults.layout.clone(),
        },
        advanced_validation_settings: AdvancedValidation::default(),
        delete_entry_on_submission: "no".to_string(),
        notifications: translate_notifications(form),
        confirmations: confirmations.collect(),
    }
}

/// One confirmation per source confirmation record, merged with defaults
pub fn translate_confirmations(form: &SourceForm, defaults: &Confirmation) -> Vec<Confirmation> {
    members(form.setting("confirmations"))
        .into_iter()
        .map(|record| {
            let kind = text(record, "type").unwrap_or_default();
            let custom_page = text(record, "page")
                .and_then(|page| page.trim().parse::<i64>().ok())
                .unwrap_or(0);

            ConfirmationDraft {
                name: text(record, "name"),
                message_to_show: text(record, "message"),
                same_page_form_behavior: Some("hide_form".to_string()),
                redirect_to: Some(RedirectTo::from_source(&kind)),
                custom_page: Some(custom_page),
                custom_url: text(record, "redirect"),
                active: Some(true),
            }
            .merge(defaults)
        })
        .collect()
}

/// Notifications, derived from the source's confirmation records
///
/// The source keeps per-message mailer fields on the same records it uses for
/// confirmations, so each confirmation yields one notification.
pub fn translate_notifications(form: &SourceForm) -> Vec<Notification> {
    let enabled = form.setting_is_true("notification_enable");

    members(form.setting("confirmations"))
        .into_iter()
        .map(|record| {
            let to = text(record, "email").unwrap_or_else(|| ADMIN_EMAIL.to_string());
            let message = text(record, "mailer.email_message")
                .unwrap_or_default()
                .replace(SOURCE_ALL_FIELDS, DESTINATION_ALL_DATA);

            Notification {
                send_to: SendTo {
                    kind: "email".to_string(),
                    email: to.clone(),
                    field: String::new(),
                    routing: Vec::new(),
                },
                enabled,
                name: text(record, "name").unwrap_or_else(|| "Admin Notification".to_string()),
                subject: text(record, "subject").unwrap_or_else(|| "Notification".to_string()),
                to,
                reply_to: text(record, "replyto").unwrap_or_else(|| ADMIN_EMAIL.to_string()),
                message,
                from_name: text(record, "sender_name"),
                from_email: text(record, "sender_address"),
                bcc: String::new(),
            }
        })
        .collect()
}

fn text(record: &Value, path: &str) -> Option<String> {
    resolve_path(record, path).and_then(scalar_string)
}
