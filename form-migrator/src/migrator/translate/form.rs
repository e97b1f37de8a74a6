//! Form translator: orchestrates field formatting and metadata derivation

use chrono::Utc;
use indexmap::IndexMap;

use crate::migrator::error::{FieldError, MigrationError};
use crate::migrator::types::{
    DestinationField, DestinationForm, ElementType, FormDefaults, FormMeta, SourceForm,
    StepWrapper, SubmitButton,
};

use super::format::format_field;
use super::meta::translate_meta;

/// Fields translated from one source form
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSet {
    pub form: DestinationForm,
    /// A page break was translated
    pub has_steps: bool,
    /// Labels of dropped fields, in source order
    pub unsupported_fields: Vec<String>,
}

impl FieldSet {
    pub fn fields(&self) -> &IndexMap<String, DestinationField> {
        &self.form.fields
    }
}

/// A complete translation, ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct FormTranslation {
    pub source_id: String,
    pub fields: FieldSet,
    pub meta: FormMeta,
}

impl FormTranslation {
    pub fn form(&self) -> &DestinationForm {
        &self.fields.form
    }

    pub fn unsupported_fields(&self) -> &[String] {
        &self.fields.unsupported_fields
    }
}

/// Translates source forms into destination forms
#[derive(Debug, Clone)]
pub struct FormTranslator {
    /// Freshness token for element keys
    stamp: i64,
    /// Step wrappers are a pro feature of the destination
    pro_features: bool,
    defaults: FormDefaults,
}

impl FormTranslator {
    pub fn new(pro_features: bool) -> Self {
        FormTranslator {
            stamp: Utc::now().timestamp(),
            pro_features,
            defaults: FormDefaults::default(),
        }
    }

    /// Use a fixed freshness token instead of the current time
    #[cfg(test)]
    pub fn with_stamp(mut self, stamp: i64) -> Self {
        self.stamp = stamp;
        self
    }

    #[cfg(test)]
    pub fn with_defaults(mut self, defaults: FormDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Translate a form's fields, submit button and step wrapper
    ///
    /// Fails with `EmptyTranslation` when no field survives.
    pub fn translate_fields(&self, form: &SourceForm) -> Result<FieldSet, MigrationError> {
        let mut fields = IndexMap::new();
        let mut unsupported_fields = Vec::new();
        let mut has_steps = false;

        for source in &form.fields {
            // Top/bottom page breaks only carry page titles and navigation
            if source.kind == "pagebreak"
                && matches!(source.str_or("position", "").as_str(), "top" | "bottom")
            {
                continue;
            }

            let formatted = ElementType::from_source(&source.kind)
                .ok_or_else(|| FieldError::NoMapping {
                    source_type: source.kind.clone(),
                })
                .and_then(|element| format_field(source, element, self.stamp));

            match formatted {
                Ok(formatted) => {
                    has_steps |= formatted.is_step_marker;
                    if fields.insert(source.id.clone(), formatted.field).is_some() {
                        log::debug!("Form {}: duplicate field id {} replaced", form.id, source.id);
                    }
                }
                Err(reason) => {
                    let err = MigrationError::UnsupportedField {
                        label: source.label(),
                        reason,
                    };
                    log::warn!("Form {}: {}", form.id, err);
                    unsupported_fields.push(source.label());
                }
            }
        }

        if fields.is_empty() {
            return Err(MigrationError::EmptyTranslation {
                form_id: form.id.clone(),
            });
        }

        let submit_button = SubmitButton {
            key: format!("button_{}", self.stamp),
            text: form.setting_str("submit_text"),
            class: form.setting_str("submit_class"),
        };

        let step_wrapper = (has_steps && self.pro_features).then_some(StepWrapper);
        if has_steps && !self.pro_features {
            log::info!(
                "Form {} has page breaks but pro features are disabled; steps are migrated without a wrapper",
                form.id
            );
        }

        log::debug!(
            "Form {}: {} fields translated, {} unsupported",
            form.id,
            fields.len(),
            unsupported_fields.len()
        );

        Ok(FieldSet {
            form: DestinationForm {
                title: form.name.clone(),
                fields,
                submit_button,
                step_wrapper,
            },
            has_steps,
            unsupported_fields,
        })
    }

    /// Translate fields and metadata
    pub fn translate(&self, form: &SourceForm) -> Result<FormTranslation, MigrationError> {
        let fields = self.translate_fields(form)?;
        let meta = translate_meta(form, &self.defaults);

        Ok(FormTranslation {
            source_id: form.id.clone(),
            fields,
            meta,
        })
    }
}
