//! Rendering of translated forms into the destination's stored JSON schema

use serde_json::{Map, Value, json};

use crate::migrator::types::{
    DestinationField, DestinationForm, FieldKind, StepWrapper, SubmitButton,
};

const REQUIRED_MESSAGE: &str = "This field is required";

impl DestinationField {
    /// Render as a destination field descriptor
    pub fn to_json(&self) -> Value {
        let mut attributes = Map::new();
        attributes.insert("name".into(), json!(self.name));
        attributes.insert("value".into(), json!(self.value));
        attributes.insert("class".into(), json!(self.class));
        attributes.insert("placeholder".into(), json!(self.placeholder));

        let mut settings = Map::new();
        settings.insert("label".into(), json!(self.label));
        settings.insert("admin_field_label".into(), json!(""));
        settings.insert("help_message".into(), json!(self.help_message));
        settings.insert("container_class".into(), json!(self.container_class));
        settings.insert("conditional_logics".into(), json!([]));

        let mut rules = Map::new();
        rules.insert(
            "required".into(),
            json!({"value": self.required, "message": REQUIRED_MESSAGE}),
        );

        let mut descriptor = Map::new();

        match &self.kind {
            FieldKind::Email => {
                attributes.insert("type".into(), json!("email"));
                rules.insert(
                    "email".into(),
                    json!({"value": true, "message": "This field must contain a valid email"}),
                );
            }
            FieldKind::Text { max_length } => {
                attributes.insert("type".into(), json!("text"));
                if let Some(max_length) = max_length {
                    attributes.insert("maxlength".into(), json!(max_length));
                }
            }
            FieldKind::Name { sub_fields } => {
                let fields: Map<String, Value> = sub_fields
                    .iter()
                    .map(|(key, sub)| {
                        let sub_json = json!({
                            "element": "input_text",
                            "attributes": {
                                "type": "text",
                                "name": sub.name,
                                "value": sub.default,
                                "placeholder": sub.placeholder.clone().unwrap_or_default(),
                            },
                            "settings": {
                                "label": sub.label.clone().unwrap_or_default(),
                                "visible": sub.visible,
                                "validation_rules": {
                                    "required": {"value": sub.required, "message": REQUIRED_MESSAGE}
                                }
                            }
                        });
                        (key.clone(), sub_json)
                    })
                    .collect();
                descriptor.insert("fields".into(), Value::Object(fields));
            }
            FieldKind::Hidden => {
                attributes.insert("type".into(), json!("hidden"));
            }
            FieldKind::Textarea => {
                attributes.insert("rows".into(), json!(3));
                attributes.insert("cols".into(), json!(2));
            }
            FieldKind::Select {
                options,
                multiple,
                randomize,
            } => {
                if *multiple {
                    attributes.insert("multiple".into(), json!(true));
                }
                settings.insert("advanced_options".into(), json!(options));
                settings.insert("randomize_options".into(), json!(yes_no(*randomize)));
                settings.insert("calc_value_status".into(), json!(false));
            }
            FieldKind::Radio { options, randomize } | FieldKind::Checkbox { options, randomize } => {
                let input_type = if matches!(self.kind, FieldKind::Radio { .. }) {
                    "radio"
                } else {
                    "checkbox"
                };
                attributes.insert("type".into(), json!(input_type));
                settings.insert("advanced_options".into(), json!(options));
                settings.insert("randomize_options".into(), json!(yes_no(*randomize)));
                settings.insert("calc_value_status".into(), json!(false));
            }
            FieldKind::Number { min, max } => {
                attributes.insert("type".into(), json!("number"));
                rules.insert("numeric".into(), json!({"value": true, "message": "This field must contain numeric value"}));
                rules.insert("min".into(), json!({"value": min, "message": "Minimum value is "}));
                rules.insert("max".into(), json!({"value": max, "message": "Maximum value is "}));
            }
            FieldKind::Container => {
                descriptor.insert("columns".into(), json!([{"fields": []}, {"fields": []}]));
            }
            FieldKind::Date { format } => {
                attributes.insert("type".into(), json!("text"));
                settings.insert("date_format".into(), json!(format));
            }
            FieldKind::Address { sub_fields } => {
                let fields: Map<String, Value> = sub_fields
                    .iter()
                    .map(|(key, sub)| {
                        let element = if key == "country" { "select_country" } else { "input_text" };
                        let sub_json = json!({
                            "element": element,
                            "attributes": {
                                "name": sub.name,
                                "value": sub.default,
                                "placeholder": sub.placeholder,
                            },
                            "settings": {
                                "label": sub.label,
                                "visible": sub.visible,
                                "validation_rules": {
                                    "required": {"value": false, "message": REQUIRED_MESSAGE}
                                }
                            }
                        });
                        (key.clone(), sub_json)
                    })
                    .collect();
                descriptor.insert("fields".into(), Value::Object(fields));
            }
            FieldKind::Password => {
                attributes.insert("type".into(), json!("password"));
            }
            FieldKind::CustomHtml { html } => {
                settings.insert("html_codes".into(), json!(html));
            }
            FieldKind::Ratings { options } => {
                descriptor.insert("options".into(), json!(options));
                settings.insert("show_text".into(), json!("no"));
            }
            FieldKind::SectionBreak { description } => {
                settings.insert("description".into(), json!(description));
            }
            FieldKind::Url => {
                attributes.insert("type".into(), json!("url"));
                rules.insert(
                    "url".into(),
                    json!({"value": true, "message": "This field must contain a valid url"}),
                );
            }
            FieldKind::RangeSlider { step, min, max } => {
                attributes.insert("type".into(), json!("range"));
                attributes.insert("step".into(), json!(step));
                attributes.insert("min".into(), json!(min));
                attributes.insert("max".into(), json!(max));
            }
            FieldKind::RichText { rows } => {
                attributes.insert("rows".into(), json!(rows));
            }
            FieldKind::Phone { valid_phone_number } => {
                attributes.insert("type".into(), json!("tel"));
                rules.insert(
                    "valid_phone_number".into(),
                    json!({"value": valid_phone_number, "message": "Phone number is not valid"}),
                );
            }
            FieldKind::File {
                allowed_file_types,
                max_size_unit,
                max_file_size,
                max_file_count,
                upload_btn_text,
            } => {
                attributes.insert("type".into(), json!("file"));
                settings.insert("btn_text".into(), json!(upload_btn_text));
                rules.insert(
                    "max_file_size".into(),
                    json!({"value": max_file_size, "_valueFrom": max_size_unit, "message": "Maximum file size limit is 1MB"}),
                );
                rules.insert(
                    "max_file_count".into(),
                    json!({"value": max_file_count, "message": "You can upload maximum 1 file"}),
                );
                rules.insert(
                    "allowed_file_types".into(),
                    json!({"value": allowed_file_types, "message": "Invalid file type"}),
                );
            }
            FieldKind::FormStep => {
                settings.insert(
                    "prev_btn".into(),
                    json!({"type": "default", "text": "Previous", "img_url": ""}),
                );
                settings.insert(
                    "next_btn".into(),
                    json!({"type": "default", "text": "Next", "img_url": ""}),
                );
            }
        }

        settings.insert("validation_rules".into(), Value::Object(rules));

        descriptor.insert("index".into(), json!(self.index));
        descriptor.insert("element".into(), json!(self.element().as_str()));
        descriptor.insert("attributes".into(), Value::Object(attributes));
        descriptor.insert("settings".into(), Value::Object(settings));
        descriptor.insert("editor_options".into(), json!({"title": self.editor_title()}));
        descriptor.insert("uniqElKey".into(), json!(self.key));

        Value::Object(descriptor)
    }
}

impl SubmitButton {
    pub fn to_json(&self) -> Value {
        json!({
            "uniqElKey": self.key,
            "element": "button",
            "attributes": {
                "type": "submit",
                "class": self.class,
            },
            "settings": {
                "container_class": "",
                "align": "left",
                "button_style": "default",
                "button_size": "md",
                "color": "#ffffff",
                "background_color": "#409EFF",
                "button_ui": {
                    "type": "default",
                    "text": self.text,
                    "img_url": "",
                },
                "normal_styles": [],
                "hover_styles": [],
                "current_state": "normal_styles",
            },
            "editor_options": {
                "title": "Submit Button",
            },
        })
    }
}

impl StepWrapper {
    pub fn to_json(&self) -> Value {
        json!({
            "stepStart": {
                "element": "step_start",
                "attributes": {"id": "", "class": ""},
                "settings": {
                    "progress_indicator": "progress-bar",
                    "step_titles": [],
                    "disable_auto_focus": "no",
                    "enable_auto_slider": "no",
                    "enable_step_data_persistency": "no",
                    "enable_step_page_resume": "no",
                },
                "editor_options": {"title": "Start Paging"},
            },
            "stepEnd": {
                "element": "step_end",
                "attributes": {"id": "", "class": ""},
                "settings": {
                    "prev_btn": {"type": "default", "text": "Previous", "img_url": ""},
                },
                "editor_options": {"title": "End Paging"},
            },
        })
    }
}

impl DestinationForm {
    /// Render the `form_fields` document
    pub fn to_json(&self) -> Value {
        let mut doc = Map::new();
        doc.insert(
            "fields".into(),
            Value::Array(self.fields.values().map(DestinationField::to_json).collect()),
        );
        doc.insert("submitButton".into(), self.submit_button.to_json());
        if let Some(wrapper) = &self.step_wrapper {
            doc.insert("stepsWrapper".into(), wrapper.to_json());
        }
        Value::Object(doc)
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
