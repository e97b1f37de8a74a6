//! Destination field descriptors

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::ElementType;

/// Default value of a destination field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn empty() -> Self {
        FieldValue::Text(String::new())
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::empty()
    }
}

/// One option of a select, radio or checkbox field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: String,
    pub value: String,
    pub image: Option<String>,
    pub calc_value: String,
    /// Position in the source choice list
    pub id: usize,
}

/// A part of a name field (first, middle or last)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameSubField {
    pub name: String,
    /// `None` when the source hides this sub-label
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub default: String,
    pub visible: bool,
    pub required: bool,
}

/// A part of an address field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressSubField {
    pub name: String,
    pub label: String,
    pub placeholder: String,
    pub default: String,
    pub visible: bool,
}

/// Element-specific attributes, one variant per destination element
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Email,
    Text {
        /// Character limit
        max_length: Option<u64>,
    },
    Name {
        /// Keyed by sub-field key (`first_name`, `middle_name`, `last_name`)
        sub_fields: IndexMap<String, NameSubField>,
    },
    Hidden,
    Textarea,
    Select {
        options: Vec<ChoiceOption>,
        multiple: bool,
        randomize: bool,
    },
    Radio {
        options: Vec<ChoiceOption>,
        randomize: bool,
    },
    Checkbox {
        options: Vec<ChoiceOption>,
        randomize: bool,
    },
    Number {
        min: String,
        max: String,
    },
    Container,
    Date {
        format: String,
    },
    Address {
        /// Keyed by `address_line_1`, `address_line_2`, `city`, `state`, `zip`, `country`
        sub_fields: IndexMap<String, AddressSubField>,
    },
    Password,
    CustomHtml {
        html: String,
    },
    Ratings {
        /// value -> label
        options: IndexMap<String, String>,
    },
    SectionBreak {
        description: String,
    },
    Url,
    RangeSlider {
        step: String,
        min: String,
        max: String,
    },
    RichText {
        rows: u8,
    },
    Phone {
        valid_phone_number: bool,
    },
    File {
        allowed_file_types: Vec<String>,
        max_size_unit: String,
        /// Bytes
        max_file_size: u64,
        max_file_count: u64,
        upload_btn_text: String,
    },
    FormStep,
}

impl FieldKind {
    /// The destination element this variant renders as
    pub fn element(&self) -> ElementType {
        match self {
            FieldKind::Email => ElementType::Email,
            FieldKind::Text { .. } => ElementType::InputText,
            FieldKind::Name { .. } => ElementType::InputName,
            FieldKind::Hidden => ElementType::InputHidden,
            FieldKind::Textarea => ElementType::InputTextarea,
            FieldKind::Select { multiple: true, .. } => ElementType::MultiSelect,
            FieldKind::Select { .. } => ElementType::Select,
            FieldKind::Radio { .. } => ElementType::InputRadio,
            FieldKind::Checkbox { .. } => ElementType::InputCheckbox,
            FieldKind::Number { .. } => ElementType::InputNumber,
            FieldKind::Container => ElementType::Container,
            FieldKind::Date { .. } => ElementType::InputDate,
            FieldKind::Address { .. } => ElementType::Address,
            FieldKind::Password => ElementType::InputPassword,
            FieldKind::CustomHtml { .. } => ElementType::CustomHtml,
            FieldKind::Ratings { .. } => ElementType::Ratings,
            FieldKind::SectionBreak { .. } => ElementType::SectionBreak,
            FieldKind::Url => ElementType::InputUrl,
            FieldKind::RangeSlider { .. } => ElementType::Rangeslider,
            FieldKind::RichText { .. } => ElementType::RichTextInput,
            FieldKind::Phone { .. } => ElementType::Phone,
            FieldKind::File { .. } => ElementType::InputFile,
            FieldKind::FormStep => ElementType::FormStep,
        }
    }

    /// Choice options for select, radio and checkbox fields
    pub fn options(&self) -> Option<&[ChoiceOption]> {
        match self {
            FieldKind::Select { options, .. }
            | FieldKind::Radio { options, .. }
            | FieldKind::Checkbox { options, .. } => Some(options),
            _ => None,
        }
    }
}

/// A translated field, ready to be written into the destination form schema
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationField {
    /// Unique element key within the form
    pub key: String,
    /// Source field id
    pub index: String,
    pub name: String,
    pub label: String,
    pub required: bool,
    pub placeholder: String,
    pub class: String,
    pub value: FieldValue,
    pub help_message: String,
    pub container_class: String,
    pub kind: FieldKind,
}

impl DestinationField {
    pub fn element(&self) -> ElementType {
        self.kind.element()
    }

    /// Whether submitted values for this field are lists
    pub fn is_multi_value(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Checkbox { .. } | FieldKind::Select { multiple: true, .. }
        )
    }

    pub fn editor_title(&self) -> &'static str {
        self.element().editor_title()
    }
}
