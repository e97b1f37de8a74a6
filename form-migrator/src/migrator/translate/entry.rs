//! Entry translator: reshapes stored submissions into destination entries

use indexmap::IndexMap;
use serde_json::Value;

use crate::migrator::error::MigrationError;
use crate::migrator::files::FileMigrator;
use crate::migrator::types::{DestinationField, Entry, EntryValue, FieldKind, RawSubmission};

use super::path::{resolve_path, scalar_string};

/// Submission keys for each address sub-field
const ADDRESS_KEYS: &[(&str, &str)] = &[
    ("address_line_1", "address1"),
    ("address_line_2", "address2"),
    ("city", "city"),
    ("state", "state"),
    ("zip", "postal"),
    ("country", "country"),
];

/// Submission keys for each name sub-field
const NAME_KEYS: &[(&str, &str)] = &[
    ("first_name", "first"),
    ("middle_name", "middle"),
    ("last_name", "last"),
];

/// Entries translated from a batch of submissions
#[derive(Debug, Default)]
pub struct EntryBatch {
    /// Submissions stored in the source, including ones beyond the entry limit
    pub total: usize,
    pub entries: Vec<Entry>,
    /// Submissions that were skipped, with the reason
    pub skipped: Vec<MigrationError>,
}

/// Translate a batch; malformed submissions are skipped and reported
pub fn translate_entries(
    fields: &IndexMap<String, DestinationField>,
    submissions: &[RawSubmission],
    files: &dyn FileMigrator,
) -> EntryBatch {
    let mut batch = EntryBatch {
        total: submissions.len(),
        ..Default::default()
    };

    for submission in submissions {
        match translate_submission(fields, submission, files) {
            Ok(entry) => batch.entries.push(entry),
            Err(err) => {
                log::warn!("Skipping entry: {}", err);
                batch.skipped.push(err);
            }
        }
    }

    batch
}

/// Translate one submission against the form's translated fields
pub fn translate_submission(
    fields: &IndexMap<String, DestinationField>,
    submission: &RawSubmission,
    files: &dyn FileMigrator,
) -> Result<Entry, MigrationError> {
    let payload = parse_payload(submission)?;

    let mut response = IndexMap::new();
    for (field_id, submitted) in &payload {
        // Fields that were unsupported or removed have no descriptor
        let Some(field) = fields.get(field_id) else {
            continue;
        };
        if field.name.is_empty() {
            continue;
        }

        let value = reshape(field, submitted, files);
        response.insert(field.name.clone(), value);
    }

    Ok(Entry {
        source_id: submission.entry_id.clone(),
        response,
        created_at: non_empty(&submission.date),
        updated_at: non_empty(&submission.date_modified),
    })
}

fn parse_payload(submission: &RawSubmission) -> Result<serde_json::Map<String, Value>, MigrationError> {
    let malformed = |reason: String| MigrationError::MalformedSubmission {
        entry_id: submission.entry_id.clone(),
        reason,
    };

    match serde_json::from_str::<Value>(&submission.fields) {
        Ok(Value::Object(map)) if !map.is_empty() => Ok(map),
        Ok(Value::Object(_)) => Err(malformed("payload has no fields".to_string())),
        Ok(other) => Err(malformed(format!("expected an object, found {}", json_kind(&other)))),
        Err(err) => Err(malformed(err.to_string())),
    }
}

fn reshape(field: &DestinationField, submitted: &Value, files: &dyn FileMigrator) -> EntryValue {
    match &field.kind {
        FieldKind::Name { sub_fields } => {
            let parts = NAME_KEYS
                .iter()
                .filter_map(|(key, submitted_key)| {
                    let sub = sub_fields.get(*key)?;
                    if sub.name.is_empty() {
                        return None;
                    }
                    Some((sub.name.clone(), text(submitted, submitted_key)))
                })
                .collect();
            EntryValue::Fields(parts)
        }
        FieldKind::Address { .. } => {
            let parts = ADDRESS_KEYS
                .iter()
                .map(|(key, submitted_key)| (key.to_string(), text(submitted, submitted_key)))
                .collect();
            EntryValue::Fields(parts)
        }
        _ if field.is_multi_value() => {
            let raw = raw_value(submitted);
            match raw {
                EntryValue::Text(s) if s.is_empty() => EntryValue::List(Vec::new()),
                EntryValue::Text(s) => EntryValue::List(s.split('\n').map(str::to_string).collect()),
                other => other,
            }
        }
        FieldKind::File { .. } => {
            let raw = text(submitted, "value");
            if raw.is_empty() {
                return EntryValue::Text(raw);
            }
            match files.migrate(&raw) {
                Ok(urls) => EntryValue::List(urls),
                Err(err) => {
                    log::warn!("Keeping source URLs for field {}: {:#}", field.name, err);
                    EntryValue::List(raw.split('\n').map(str::to_string).collect())
                }
            }
        }
        _ => raw_value(submitted),
    }
}

/// The submission's `value`, as text or a list; null becomes ""
fn raw_value(submitted: &Value) -> EntryValue {
    match resolve_path(submitted, "value") {
        Some(Value::Array(items)) => {
            EntryValue::List(items.iter().filter_map(scalar_string).collect())
        }
        Some(value) => EntryValue::Text(scalar_string(value).unwrap_or_default()),
        None => EntryValue::Text(String::new()),
    }
}

fn text(submitted: &Value, key: &str) -> String {
    resolve_path(submitted, key)
        .and_then(scalar_string)
        .unwrap_or_default()
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrator::files::UrlRewriteMigrator;
    use crate::migrator::translate::FormTranslator;
    use crate::migrator::types::{SourceField, SourceForm};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fields() -> IndexMap<String, DestinationField> {
        let form = SourceForm::new(
            "1",
            "Everything",
            vec![
                SourceField::new("1", "name", json!({"format": "first-middle-last"})),
                SourceField::new("2", "checkbox", json!({"choices": {"1": {"label": "A"}}})),
                SourceField::new("3", "address", json!({})),
                SourceField::new("4", "file-upload", json!({})),
                SourceField::new("5", "email", json!({})),
                SourceField::new("6", "select", json!({"multiple": "1"})),
                SourceField::new("7", "select", json!({})),
                SourceField::new("8", "name", json!({"format": "simple"})),
            ],
        );
        FormTranslator::new(false)
            .with_stamp(1)
            .translate_fields(&form)
            .unwrap()
            .form
            .fields
    }

    fn submission(payload: serde_json::Value) -> RawSubmission {
        RawSubmission {
            entry_id: "31".into(),
            form_id: "1".into(),
            fields: payload.to_string(),
            date: Some("2024-03-01 10:00:00".into()),
            date_modified: None,
        }
    }

    fn files() -> UrlRewriteMigrator {
        UrlRewriteMigrator::new(
            "https://old.example.com/wp-content/uploads/wpforms/",
            "https://new.example.com/uploads/migrated/",
        )
    }

    #[test]
    fn test_checkbox_splits_lines() {
        let entry = translate_submission(
            &fields(),
            &submission(json!({"2": {"value": "A\nB\nC"}})),
            &files(),
        )
        .unwrap();

        assert_eq!(
            entry.get("checkbox_2"),
            Some(&EntryValue::List(vec!["A".into(), "B".into(), "C".into()]))
        );
    }

    #[test]
    fn test_multi_select_splits_single_does_not() {
        let entry = translate_submission(
            &fields(),
            &submission(json!({
                "6": {"value": "X\nY"},
                "7": {"value": "X\nY"}
            })),
            &files(),
        )
        .unwrap();

        assert_eq!(
            entry.get("select_6"),
            Some(&EntryValue::List(vec!["X".into(), "Y".into()]))
        );
        assert_eq!(entry.get("select_7"), Some(&EntryValue::from("X\nY")));
    }

    #[test]
    fn test_name_parts() {
        let entry = translate_submission(
            &fields(),
            &submission(json!({
                "1": {"first": "Ada", "middle": "King", "last": "Lovelace", "value": "Ada King Lovelace"},
                "8": {"first": "Grace", "value": "Grace Hopper"}
            })),
            &files(),
        )
        .unwrap();

        let parts = entry.get("name_1").and_then(EntryValue::as_fields).unwrap();
        assert_eq!(parts["first_name"], "Ada");
        assert_eq!(parts["middle_name"], "King");
        assert_eq!(parts["last_name"], "Lovelace");

        // Simple names only carry the first part
        let parts = entry.get("name_8").and_then(EntryValue::as_fields).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts["first_name"], "Grace");
    }

    #[test]
    fn test_address_missing_postal() {
        let entry = translate_submission(
            &fields(),
            &submission(json!({
                "3": {"address1": "1 Main St", "city": "Springfield", "state": "IL", "country": "US"}
            })),
            &files(),
        )
        .unwrap();

        let address = entry.get("address_3").and_then(EntryValue::as_fields).unwrap();
        let keys: Vec<_> = address.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["address_line_1", "address_line_2", "city", "state", "zip", "country"]
        );
        assert_eq!(address["zip"], "");
        assert_eq!(address["address_line_2"], "");
        assert_eq!(address["address_line_1"], "1 Main St");
    }

    #[test]
    fn test_file_urls_migrated() {
        let entry = translate_submission(
            &fields(),
            &submission(json!({
                "4": {"value": "https://old.example.com/wp-content/uploads/wpforms/1/cv.pdf\nhttps://old.example.com/wp-content/uploads/wpforms/1/photo.jpg"}
            })),
            &files(),
        )
        .unwrap();

        assert_eq!(
            entry.get("file-upload_4"),
            Some(&EntryValue::List(vec![
                "https://new.example.com/uploads/migrated/1/cv.pdf".into(),
                "https://new.example.com/uploads/migrated/1/photo.jpg".into(),
            ]))
        );
    }

    #[test]
    fn test_empty_file_value_not_migrated() {
        let entry = translate_submission(
            &fields(),
            &submission(json!({"4": {"value": ""}})),
            &files(),
        )
        .unwrap();
        assert_eq!(entry.get("file-upload_4"), Some(&EntryValue::from("")));
    }

    #[test]
    fn test_default_value_and_null() {
        let entry = translate_submission(
            &fields(),
            &submission(json!({"5": {"value": null}})),
            &files(),
        )
        .unwrap();
        assert_eq!(entry.get("email_5"), Some(&EntryValue::from("")));

        let entry = translate_submission(
            &fields(),
            &submission(json!({"5": {"value": "a@example.com"}})),
            &files(),
        )
        .unwrap();
        assert_eq!(entry.get("email_5"), Some(&EntryValue::from("a@example.com")));
    }

    #[test]
    fn test_unknown_field_ids_skipped() {
        let entry = translate_submission(
            &fields(),
            &submission(json!({"99": {"value": "x"}, "5": {"value": "y"}})),
            &files(),
        )
        .unwrap();
        assert_eq!(entry.response.len(), 1);
    }

    #[test]
    fn test_timestamps_copied_when_present() {
        let entry = translate_submission(
            &fields(),
            &submission(json!({"5": {"value": "y"}})),
            &files(),
        )
        .unwrap();
        assert_eq!(entry.created_at.as_deref(), Some("2024-03-01 10:00:00"));
        assert_eq!(entry.updated_at, None);
        assert_eq!(entry.source_id, "31");
    }

    #[test]
    fn test_malformed_submissions_are_skipped() {
        let good = submission(json!({"5": {"value": "ok"}}));
        let mut broken = submission(json!({}));
        broken.entry_id = "32".into();
        broken.fields = "{not json".into();
        let mut empty = submission(json!({}));
        empty.entry_id = "33".into();

        let batch = translate_entries(&fields(), &[broken, good, empty], &files());
        assert_eq!(batch.entries.len(), 1);
        assert_eq!(batch.skipped.len(), 2);
        assert!(matches!(
            &batch.skipped[0],
            MigrationError::MalformedSubmission { entry_id, .. } if entry_id == "32"
        ));
    }
}
