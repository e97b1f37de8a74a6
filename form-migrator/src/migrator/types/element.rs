//! Static mapping between source field types and destination elements

use serde::{Deserialize, Serialize};

/// Destination element identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Email,
    InputText,
    InputName,
    InputHidden,
    InputTextarea,
    Select,
    InputRadio,
    InputCheckbox,
    InputNumber,
    Container,
    InputDate,
    Address,
    InputPassword,
    CustomHtml,
    Ratings,
    SectionBreak,
    InputUrl,
    MultiSelect,
    Rangeslider,
    RichTextInput,
    Phone,
    InputFile,
    FormStep,
}

/// Source type tag -> destination element, in the source plugin's builder order
pub const FIELD_TYPE_MAP: &[(&str, ElementType)] = &[
    ("email", ElementType::Email),
    ("text", ElementType::InputText),
    ("name", ElementType::InputName),
    ("hidden", ElementType::InputHidden),
    ("textarea", ElementType::InputTextarea),
    ("select", ElementType::Select),
    ("radio", ElementType::InputRadio),
    ("checkbox", ElementType::InputCheckbox),
    ("number", ElementType::InputNumber),
    ("layout", ElementType::Container),
    ("date-time", ElementType::InputDate),
    ("address", ElementType::Address),
    ("password", ElementType::InputPassword),
    ("html", ElementType::CustomHtml),
    ("rating", ElementType::Ratings),
    ("divider", ElementType::SectionBreak),
    ("url", ElementType::InputUrl),
    ("multi_select", ElementType::MultiSelect),
    ("number-slider", ElementType::Rangeslider),
    ("richtext", ElementType::RichTextInput),
    ("phone", ElementType::Phone),
    ("file-upload", ElementType::InputFile),
    ("pagebreak", ElementType::FormStep),
];

impl ElementType {
    /// Resolve a source type tag; `None` means the field is unsupported
    pub fn from_source(source_type: &str) -> Option<Self> {
        FIELD_TYPE_MAP
            .iter()
            .find(|(tag, _)| *tag == source_type)
            .map(|(_, element)| *element)
    }

    /// The source type tag this element is migrated from
    #[cfg(test)]
    pub fn source_type(&self) -> &'static str {
        FIELD_TYPE_MAP
            .iter()
            .find(|(_, element)| element == self)
            .map(|(tag, _)| *tag)
            .unwrap_or("")
    }

    /// Destination identifier as stored in the form schema
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Email => "email",
            ElementType::InputText => "input_text",
            ElementType::InputName => "input_name",
            ElementType::InputHidden => "input_hidden",
            ElementType::InputTextarea => "input_textarea",
            ElementType::Select => "select",
            ElementType::InputRadio => "input_radio",
            ElementType::InputCheckbox => "input_checkbox",
            ElementType::InputNumber => "input_number",
            ElementType::Container => "container",
            ElementType::InputDate => "input_date",
            ElementType::Address => "address",
            ElementType::InputPassword => "input_password",
            ElementType::CustomHtml => "custom_html",
            ElementType::Ratings => "ratings",
            ElementType::SectionBreak => "section_break",
            ElementType::InputUrl => "input_url",
            ElementType::MultiSelect => "multi_select",
            ElementType::Rangeslider => "rangeslider",
            ElementType::RichTextInput => "rich_text_input",
            ElementType::Phone => "phone",
            ElementType::InputFile => "input_file",
            ElementType::FormStep => "form_step",
        }
    }

    /// Title shown in the destination editor
    pub fn editor_title(&self) -> &'static str {
        match self {
            ElementType::Email => "Email Address",
            ElementType::InputText => "Simple Text",
            ElementType::InputName => "Name Fields",
            ElementType::InputHidden => "Hidden Field",
            ElementType::InputTextarea => "Text Area",
            ElementType::Select => "Dropdown",
            ElementType::InputRadio => "Radio Field",
            ElementType::InputCheckbox => "Check Box",
            ElementType::InputNumber => "Numeric Field",
            ElementType::Container => "Container",
            ElementType::InputDate => "Time & Date",
            ElementType::Address => "Address Fields",
            ElementType::InputPassword => "Password Field",
            ElementType::CustomHtml => "Custom HTML",
            ElementType::Ratings => "Ratings",
            ElementType::SectionBreak => "Section Break",
            ElementType::InputUrl => "Website URL",
            ElementType::MultiSelect => "Multiple Choice",
            ElementType::Rangeslider => "Range Slider",
            ElementType::RichTextInput => "Rich Text Input",
            ElementType::Phone => "Phone/Mobile Field",
            ElementType::InputFile => "File Upload",
            ElementType::FormStep => "Form Step",
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
