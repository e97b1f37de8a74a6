//! Field formatter: one source field in, one destination field out

use indexmap::IndexMap;

use crate::migrator::error::FieldError;
use crate::migrator::types::{
    DestinationField, ElementType, FieldKind, FieldValue, NameSubField, SourceField,
};

use super::address::address_sub_fields;
use super::options::normalize_choices;
use super::path::{as_number, scalar_string};

/// Bytes per megabyte for upload limits
const BYTES_PER_MB: f64 = 1_048_576.0;

/// Average characters per word when converting word limits
const CHARS_PER_WORD: u64 = 6;

/// Allowed-type groups understood by the destination upload field
pub const FILE_TYPE_GROUPS: &[&str] = &[
    "jpg|jpeg|gif|png|bmp",
    "mp3|wav|ogg|oga|wma|mka|m4a|ra|mid|midi|mpga",
    "avi|divx|flv|mov|ogv|mkv|mp4|m4v|mpg|mpeg|mpe|video/quicktime|qt",
    "pdf",
    "doc|ppt|pps|xls|mdb|docx|xlsx|pptx|odt|odp|ods|odg|odc|odb|odf|rtf|txt",
    "zip|gz|gzip|rar|7z",
    "exe",
    "csv",
];

/// Result of formatting a field
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedField {
    pub field: DestinationField,
    /// The field is a page break; the form needs a step wrapper
    pub is_step_marker: bool,
}

/// Translate one source field into its destination descriptor
///
/// `stamp` makes element keys unique across repeated imports of the same form.
pub fn format_field(
    source: &SourceField,
    element: ElementType,
    stamp: i64,
) -> Result<FormattedField, FieldError> {
    let label = source.label();
    let name = format!("{}_{}", source.kind, source.id);
    let required = source.is_true("required");

    let mut value = FieldValue::Text(source.filled_str("default_value").unwrap_or_default());
    let mut is_step_marker = false;

    let kind = match element {
        ElementType::Email => FieldKind::Email,
        ElementType::InputText => FieldKind::Text {
            max_length: max_length(source),
        },
        ElementType::InputName => FieldKind::Name {
            sub_fields: name_sub_fields(source, &label, required),
        },
        ElementType::InputHidden => FieldKind::Hidden,
        ElementType::InputTextarea => FieldKind::Textarea,
        ElementType::Select | ElementType::MultiSelect => {
            let (options, defaults) = normalize_choices(source.attr("choices"));
            let multiple = element == ElementType::MultiSelect || source.is_true("multiple");
            value = if multiple {
                FieldValue::List(defaults)
            } else {
                first_or_empty(defaults)
            };
            FieldKind::Select {
                options,
                multiple,
                randomize: source.is_true("random"),
            }
        }
        ElementType::InputRadio => {
            let (options, defaults) = normalize_choices(source.attr("choices"));
            value = first_or_empty(defaults);
            FieldKind::Radio {
                options,
                randomize: source.is_true("random"),
            }
        }
        ElementType::InputCheckbox => {
            let (options, defaults) = normalize_choices(source.attr("choices"));
            value = FieldValue::List(defaults);
            FieldKind::Checkbox {
                options,
                randomize: source.is_true("random"),
            }
        }
        // Number bounds are not part of the source schema
        ElementType::InputNumber => FieldKind::Number {
            min: String::new(),
            max: String::new(),
        },
        ElementType::Container => FieldKind::Container,
        ElementType::InputDate => FieldKind::Date {
            format: date_format(source),
        },
        ElementType::Address => FieldKind::Address {
            sub_fields: address_sub_fields(source, &name),
        },
        ElementType::InputPassword => FieldKind::Password,
        ElementType::CustomHtml => FieldKind::CustomHtml {
            html: source.str_or("code", ""),
        },
        ElementType::Ratings => FieldKind::Ratings {
            options: rating_options(source),
        },
        ElementType::SectionBreak => FieldKind::SectionBreak {
            description: source.str_or("description", ""),
        },
        ElementType::InputUrl => FieldKind::Url,
        ElementType::Rangeslider => FieldKind::RangeSlider {
            step: required_attr(source, "step")?,
            min: required_attr(source, "min")?,
            max: required_attr(source, "max")?,
        },
        ElementType::RichTextInput => FieldKind::RichText {
            rows: match source.str_or("size", "").as_str() {
                "small" => 2,
                "large" => 5,
                _ => 3,
            },
        },
        ElementType::Phone => FieldKind::Phone {
            valid_phone_number: true,
        },
        ElementType::InputFile => file_upload(source, &label),
        ElementType::FormStep => {
            is_step_marker = true;
            FieldKind::FormStep
        }
    };

    let field = DestinationField {
        key: format!("{}-{}", source.id, stamp),
        index: source.id.clone(),
        name,
        label,
        required,
        placeholder: source.str_or("placeholder", ""),
        class: String::new(),
        value,
        help_message: source.str_or("description", ""),
        container_class: source.str_or("css", ""),
        kind,
    };

    Ok(FormattedField {
        field,
        is_step_marker,
    })
}

fn first_or_empty(defaults: Vec<String>) -> FieldValue {
    FieldValue::Text(defaults.into_iter().next().unwrap_or_default())
}

fn required_attr(source: &SourceField, attribute: &'static str) -> Result<String, FieldError> {
    source
        .attr(attribute)
        .and_then(scalar_string)
        .ok_or_else(|| FieldError::MissingAttribute {
            field_id: source.id.clone(),
            attribute,
        })
}

/// Character limit, converting word limits at six characters per word
fn max_length(source: &SourceField) -> Option<u64> {
    let count = source.filled_str("limit_count")?;
    let mode = source.filled_str("limit_mode")?;
    let count = count.trim().parse::<f64>().ok()?.max(0.0) as u64;

    if mode == "words" {
        Some(count.saturating_mul(CHARS_PER_WORD))
    } else {
        Some(count)
    }
}

/// Expand a name format like "first-middle-last" into sub-fields
///
/// A missing format yields no sub-fields; the field itself stays valid.
fn name_sub_fields(
    source: &SourceField,
    label: &str,
    required: bool,
) -> IndexMap<String, NameSubField> {
    let Some(format) = source.filled_str("format") else {
        return IndexMap::new();
    };

    format
        .split('-')
        .filter(|token| !token.is_empty())
        .map(|token| {
            let (key, sub_label, hide_label) = if token == "simple" {
                ("first_name".to_string(), label.to_string(), source.is_true("label_hide"))
            } else {
                (
                    format!("{}_name", token),
                    capitalize(token),
                    source.is_true("sublabel_hide"),
                )
            };

            let sub_field = NameSubField {
                name: key.clone(),
                label: (!hide_label).then_some(sub_label),
                placeholder: source.filled_str(&format!("{}_placeholder", token)),
                default: source.str_or(&format!("{}_default", token), ""),
                visible: true,
                required,
            };
            (key, sub_field)
        })
        .collect()
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn date_format(source: &SourceField) -> String {
    let date = source.str_or("date_format", "d/m/Y");
    let time = source.str_or("time_format", "H:i");

    match source.str_or("format", "").as_str() {
        "date" => date,
        "time" => time,
        _ => format!("{} {}", date, time),
    }
}

fn rating_options(source: &SourceField) -> IndexMap<String, String> {
    let scale = source
        .attr("scale")
        .and_then(as_number)
        .map(|n| n.max(0.0) as u32)
        .unwrap_or(5);

    (1..=scale)
        .map(|n| (n.to_string(), n.to_string()))
        .collect()
}

fn file_upload(source: &SourceField, label: &str) -> FieldKind {
    let max_size = source
        .filled_str("max_size")
        .and_then(|size| size.trim().parse::<f64>().ok())
        .filter(|size| *size > 0.0)
        .unwrap_or(1.0);

    let max_file_count = source
        .attr("max_file_number")
        .and_then(as_number)
        .map(|n| n.max(0.0) as u64)
        .unwrap_or(1);

    let upload_btn_text = if label.is_empty() {
        "File Upload".to_string()
    } else {
        label.to_string()
    };

    FieldKind::File {
        allowed_file_types: allowed_file_types(&source.str_or("extensions", "")),
        max_size_unit: "MB".to_string(),
        max_file_size: (max_size * BYTES_PER_MB).ceil() as u64,
        max_file_count,
        upload_btn_text,
    }
}

/// Map a comma separated extension list onto the destination's type groups
pub fn allowed_file_types(extensions: &str) -> Vec<String> {
    let mut groups: Vec<String> = Vec::new();

    for ext in extensions.split(',') {
        let ext = ext.trim().trim_start_matches('.').to_lowercase();
        if ext.is_empty() {
            continue;
        }

        for group in FILE_TYPE_GROUPS {
            if group.split('|').any(|known| known == ext) && !groups.iter().any(|g| g == group) {
                groups.push(group.to_string());
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrator::types::FIELD_TYPE_MAP;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const STAMP: i64 = 1_700_000_000;

    fn format(kind: &str, attrs: serde_json::Value) -> FormattedField {
        let field = SourceField::new("4", kind, attrs);
        let element = ElementType::from_source(kind).unwrap();
        format_field(&field, element, STAMP).unwrap()
    }

    #[test]
    fn test_baseline_attributes() {
        let formatted = format(
            "email",
            json!({
                "label": "Your Email",
                "required": "1",
                "placeholder": "you@example.com",
                "description": "We never share it",
                "css": "wide",
                "default_value": false
            }),
        );
        let field = formatted.field;

        assert_eq!(field.key, "4-1700000000");
        assert_eq!(field.index, "4");
        assert_eq!(field.name, "email_4");
        assert_eq!(field.label, "Your Email");
        assert!(field.required);
        assert_eq!(field.placeholder, "you@example.com");
        assert_eq!(field.class, "");
        assert_eq!(field.value, FieldValue::Text(String::new()));
        assert_eq!(field.help_message, "We never share it");
        assert_eq!(field.container_class, "wide");
        assert_eq!(field.kind, FieldKind::Email);
        assert!(!formatted.is_step_marker);
    }

    #[test]
    fn test_every_mapped_type_formats() {
        // Well-formed input for every mapped type yields a keyed descriptor
        let attrs = json!({
            "label": "Field",
            "step": "1",
            "min": "0",
            "max": "10"
        });

        for (tag, element) in FIELD_TYPE_MAP {
            let field = SourceField::new("9", *tag, attrs.clone());
            let formatted = format_field(&field, *element, STAMP).unwrap();
            assert!(!formatted.field.key.is_empty(), "empty key for {}", tag);
        }
    }

    #[test]
    fn test_text_word_limit() {
        let field = format("text", json!({"limit_count": "10", "limit_mode": "words"})).field;
        assert_eq!(field.kind, FieldKind::Text { max_length: Some(60) });

        let field = format("text", json!({"limit_count": "25", "limit_mode": "characters"})).field;
        assert_eq!(field.kind, FieldKind::Text { max_length: Some(25) });

        let field = format("text", json!({"limit_count": "25"})).field;
        assert_eq!(field.kind, FieldKind::Text { max_length: None });
    }

    #[test]
    fn test_huge_word_limit_saturates() {
        let field = format(
            "text",
            json!({"limit_count": "4000000000000000000", "limit_mode": "words"}),
        )
        .field;
        assert_eq!(field.kind, FieldKind::Text { max_length: Some(u64::MAX) });
    }

    #[test]
    fn test_phone_validation_forced() {
        let field = format("phone", json!({})).field;
        assert_eq!(field.kind, FieldKind::Phone { valid_phone_number: true });
    }

    #[test]
    fn test_name_first_last_required() {
        let field = format(
            "name",
            json!({
                "label": "Name",
                "format": "first-last",
                "required": "1",
                "first_placeholder": "Jane",
                "last_default": "Doe"
            }),
        )
        .field;

        let FieldKind::Name { sub_fields } = field.kind else {
            panic!("expected name field");
        };
        let keys: Vec<_> = sub_fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["first_name", "last_name"]);

        let first = &sub_fields["first_name"];
        assert_eq!(first.name, "first_name");
        assert_eq!(first.label.as_deref(), Some("First"));
        assert_eq!(first.placeholder.as_deref(), Some("Jane"));
        assert!(first.required);

        let last = &sub_fields["last_name"];
        assert_eq!(last.default, "Doe");
        assert_eq!(last.placeholder, None);
        assert!(last.required);
    }

    #[test]
    fn test_name_simple_uses_field_label() {
        let field = format("name", json!({"label": "Full Name", "format": "simple"})).field;
        let FieldKind::Name { sub_fields } = field.kind else {
            panic!("expected name field");
        };
        assert_eq!(sub_fields.len(), 1);
        assert_eq!(sub_fields["first_name"].label.as_deref(), Some("Full Name"));
    }

    #[test]
    fn test_name_label_hiding_is_per_format() {
        // label_hide only applies to "simple", sublabel_hide to the rest
        let field = format(
            "name",
            json!({"format": "first-middle-last", "label_hide": "1"}),
        )
        .field;
        let FieldKind::Name { sub_fields } = field.kind else {
            panic!("expected name field");
        };
        assert!(sub_fields.values().all(|s| s.label.is_some()));

        let field = format(
            "name",
            json!({"format": "first-middle-last", "sublabel_hide": "1"}),
        )
        .field;
        let FieldKind::Name { sub_fields } = field.kind else {
            panic!("expected name field");
        };
        assert_eq!(sub_fields.len(), 3);
        assert!(sub_fields.values().all(|s| s.label.is_none()));
    }

    #[test]
    fn test_name_without_format() {
        let field = format("name", json!({"label": "Name"})).field;
        assert_eq!(
            field.kind,
            FieldKind::Name {
                sub_fields: IndexMap::new()
            }
        );
    }

    #[test]
    fn test_select_single_keeps_first_default() {
        let field = format(
            "select",
            json!({
                "choices": {
                    "1": {"label": "A", "default": "1"},
                    "2": {"label": "B", "default": "1"}
                },
                "random": "1"
            }),
        )
        .field;

        assert_eq!(field.element(), ElementType::Select);
        assert_eq!(field.value, FieldValue::Text("A".into()));
        let FieldKind::Select { randomize, multiple, .. } = field.kind else {
            panic!("expected select");
        };
        assert!(randomize);
        assert!(!multiple);
    }

    #[test]
    fn test_select_multiple_keeps_all_defaults() {
        let field = format(
            "select",
            json!({
                "multiple": "1",
                "choices": {
                    "1": {"label": "A", "default": "1"},
                    "2": {"label": "B"},
                    "3": {"label": "C", "default": "1"}
                }
            }),
        )
        .field;

        assert_eq!(field.element(), ElementType::MultiSelect);
        assert_eq!(field.value, FieldValue::List(vec!["A".into(), "C".into()]));
        assert!(field.is_multi_value());
    }

    #[test]
    fn test_select_without_defaults() {
        let field = format("select", json!({"choices": {"1": {"label": "A"}}})).field;
        assert_eq!(field.value, FieldValue::Text(String::new()));
    }

    #[test]
    fn test_radio_and_checkbox_defaults() {
        let choices = json!({
            "1": {"label": "A", "default": "1"},
            "2": {"label": "B", "default": "1"}
        });

        let radio = format("radio", json!({"choices": choices.clone()})).field;
        assert_eq!(radio.value, FieldValue::Text("A".into()));

        let checkbox = format("checkbox", json!({"choices": choices})).field;
        assert_eq!(checkbox.value, FieldValue::List(vec!["A".into(), "B".into()]));
        assert_eq!(checkbox.kind.options().map(|o| o.len()), Some(2));
    }

    #[test]
    fn test_date_formats() {
        let field = format("date-time", json!({"format": "date", "date_format": "m/d/Y"})).field;
        assert_eq!(field.kind, FieldKind::Date { format: "m/d/Y".into() });

        let field = format("date-time", json!({"format": "time"})).field;
        assert_eq!(field.kind, FieldKind::Date { format: "H:i".into() });

        let field = format("date-time", json!({"format": "date-time", "time_format": "g:i A"})).field;
        assert_eq!(field.kind, FieldKind::Date { format: "d/m/Y g:i A".into() });
    }

    #[test]
    fn test_range_slider_passthrough() {
        let field = format("number-slider", json!({"step": "5", "min": 0, "max": "100"})).field;
        assert_eq!(
            field.kind,
            FieldKind::RangeSlider {
                step: "5".into(),
                min: "0".into(),
                max: "100".into()
            }
        );
    }

    #[test]
    fn test_range_slider_missing_bounds() {
        let field = SourceField::new("4", "number-slider", json!({"step": "5"}));
        let err = format_field(&field, ElementType::Rangeslider, STAMP).unwrap_err();
        assert_eq!(
            err,
            FieldError::MissingAttribute {
                field_id: "4".into(),
                attribute: "min"
            }
        );
    }

    #[test]
    fn test_ratings_scale() {
        let field = format("rating", json!({"scale": "5"})).field;
        let FieldKind::Ratings { options } = field.kind else {
            panic!("expected ratings");
        };
        let expected: Vec<(String, String)> =
            (1..=5).map(|n| (n.to_string(), n.to_string())).collect();
        assert_eq!(options.into_iter().collect::<Vec<_>>(), expected);

        let field = format("rating", json!({})).field;
        let FieldKind::Ratings { options } = field.kind else {
            panic!("expected ratings");
        };
        assert_eq!(options.len(), 5);

        let field = format("rating", json!({"scale": 10})).field;
        let FieldKind::Ratings { options } = field.kind else {
            panic!("expected ratings");
        };
        assert_eq!(options.len(), 10);
    }

    #[test]
    fn test_file_upload_limits() {
        let field = format(
            "file-upload",
            json!({
                "label": "Resume",
                "max_size": "2",
                "max_file_number": "3",
                "extensions": "pdf, .docx,jpg, png"
            }),
        )
        .field;

        assert_eq!(
            field.kind,
            FieldKind::File {
                allowed_file_types: vec![
                    "pdf".to_string(),
                    FILE_TYPE_GROUPS[4].to_string(),
                    FILE_TYPE_GROUPS[0].to_string(),
                ],
                max_size_unit: "MB".into(),
                max_file_size: 2_097_152,
                max_file_count: 3,
                upload_btn_text: "Resume".into(),
            }
        );
    }

    #[test]
    fn test_file_upload_defaults() {
        let field = format("file-upload", json!({"max_size": ""})).field;
        let FieldKind::File {
            max_file_size,
            max_file_count,
            upload_btn_text,
            allowed_file_types,
            ..
        } = field.kind
        else {
            panic!("expected file field");
        };

        assert_eq!(max_file_size, 1_048_576);
        assert_eq!(max_file_count, 1);
        assert_eq!(upload_btn_text, "File Upload");
        assert!(allowed_file_types.is_empty());
    }

    #[test]
    fn test_file_size_rounds_up() {
        let field = format("file-upload", json!({"max_size": "0.5"})).field;
        let FieldKind::File { max_file_size, .. } = field.kind else {
            panic!("expected file field");
        };
        assert_eq!(max_file_size, 524_288);

        let field = format("file-upload", json!({"max_size": "1.0000001"})).field;
        let FieldKind::File { max_file_size, .. } = field.kind else {
            panic!("expected file field");
        };
        assert_eq!(max_file_size, 1_048_577);
    }

    #[test]
    fn test_form_step_is_marker() {
        let formatted = format("pagebreak", json!({"title": "Page 2"}));
        assert!(formatted.is_step_marker);
        assert_eq!(formatted.field.kind, FieldKind::FormStep);
    }

    #[test]
    fn test_address_names_use_parent() {
        let field = format("address", json!({"scheme": "us"})).field;
        let FieldKind::Address { sub_fields } = field.kind else {
            panic!("expected address");
        };
        assert_eq!(sub_fields["address_line_1"].name, "address_4_address_line_1");
        assert_eq!(sub_fields["country"].default, "US");
    }

    #[test]
    fn test_rich_text_rows() {
        for (size, rows) in [("small", 2), ("large", 5), ("medium", 3), ("", 3)] {
            let field = format("richtext", json!({"size": size})).field;
            assert_eq!(field.kind, FieldKind::RichText { rows });
        }
    }

    #[test]
    fn test_section_break_and_html() {
        let field = format("divider", json!({"description": "Part two"})).field;
        assert_eq!(field.kind, FieldKind::SectionBreak { description: "Part two".into() });

        let field = format("html", json!({"code": "<p>Hi</p>"})).field;
        assert_eq!(field.kind, FieldKind::CustomHtml { html: "<p>Hi</p>".into() });
    }

    #[test]
    fn test_number_bounds_are_empty() {
        // The source stores no bounds on number fields, whatever the bag holds
        let field = format("number", json!({"min": "1", "max": "9"})).field;
        assert_eq!(
            field.kind,
            FieldKind::Number {
                min: String::new(),
                max: String::new()
            }
        );
    }

    #[test]
    fn test_allowed_file_types_dedupes() {
        assert_eq!(
            allowed_file_types("jpg,jpeg,png"),
            vec![FILE_TYPE_GROUPS[0].to_string()]
        );
        assert!(allowed_file_types("").is_empty());
        assert!(allowed_file_types("unknown").is_empty());
    }
}
