//! Migration error types

/// Error from translating a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The source type has no destination element
    NoMapping { source_type: String },
    /// A required source attribute is missing
    MissingAttribute {
        field_id: String,
        attribute: &'static str,
    },
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::NoMapping { source_type } => {
                write!(f, "no destination element for source type '{}'", source_type)
            }
            FieldError::MissingAttribute {
                field_id,
                attribute,
            } => {
                write!(f, "field {} is missing required attribute '{}'", field_id, attribute)
            }
        }
    }
}

impl std::error::Error for FieldError {}

/// Error from a migration operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationError {
    /// A field was dropped; never fatal for the form
    UnsupportedField { label: String, reason: FieldError },
    /// A form has no field that could be translated
    EmptyTranslation { form_id: String },
    /// A submission payload could not be parsed; the submission is skipped
    MalformedSubmission { entry_id: String, reason: String },
    /// The source plugin is not installed or not active
    SourcePluginAbsent { source: &'static str },
    /// No source form with this id
    FormNotFound { form_id: String },
    /// Entries were requested for a form that has not been imported yet
    NotImported { form_id: String },
}

impl std::fmt::Display for MigrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationError::UnsupportedField { label, reason } => {
                write!(f, "unsupported field '{}': {}", label, reason)
            }
            MigrationError::EmptyTranslation { form_id } => {
                write!(f, "form {} has no fields that can be migrated", form_id)
            }
            MigrationError::MalformedSubmission { entry_id, reason } => {
                write!(f, "submission {} could not be parsed: {}", entry_id, reason)
            }
            MigrationError::SourcePluginAbsent { source } => {
                write!(f, "{} is not installed or not active", source)
            }
            MigrationError::FormNotFound { form_id } => {
                write!(f, "source form {} not found", form_id)
            }
            MigrationError::NotImported { form_id } => {
                write!(
                    f,
                    "source form {} has not been imported yet - import the form before its entries",
                    form_id
                )
            }
        }
    }
}

impl std::error::Error for MigrationError {}
