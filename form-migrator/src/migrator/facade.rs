//! Migration facade: the operations exposed to the CLI

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::migrator::error::MigrationError;
use crate::migrator::files::{FileMigrator, KeepUrls};
use crate::migrator::limit::{DEFAULT_ENTRY_MIGRATION_MAX_LIMIT, DefaultLimit, EntryLimitPolicy};
use crate::migrator::source::{SOURCE_KEY, SOURCE_NAME};
use crate::migrator::store::{DestinationStore, ImportLog, LogStatus, SourceLink, SourceStore};
use crate::migrator::translate::{EntryBatch, FormTranslation, FormTranslator, translate_entries};
use crate::migrator::types::SourceForm;

const LOG_COMPONENT: &str = "Migrator";

/// A source form as listed for selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSummary {
    pub name: String,
    pub id: String,
    /// Destination form id when the form was imported before
    pub imported_id: Option<i64>,
}

/// Result of importing one form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    pub source_id: String,
    pub form_id: i64,
    pub title: String,
    pub unsupported_fields: Vec<String>,
    /// An existing destination form was rewritten
    pub reimported: bool,
}

/// A form that could not be imported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormFailure {
    pub source_id: String,
    pub name: String,
    pub error: String,
}

/// Result of importing several forms
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: Vec<ImportOutcome>,
    pub failed: Vec<FormFailure>,
}

/// Result of importing a form's entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryImport {
    pub form_id: i64,
    /// Entries stored in the source
    pub total: usize,
    pub imported: usize,
    pub skipped: usize,
}

/// Moves forms and entries from the source store into the destination store
pub struct Migrator {
    source: Arc<dyn SourceStore>,
    destination: Arc<dyn DestinationStore>,
    files: Arc<dyn FileMigrator>,
    limit: Arc<dyn EntryLimitPolicy>,
    translator: FormTranslator,
}

impl Migrator {
    pub fn new(
        source: Arc<dyn SourceStore>,
        destination: Arc<dyn DestinationStore>,
        pro_features: bool,
    ) -> Self {
        Migrator {
            source,
            destination,
            files: Arc::new(KeepUrls),
            limit: Arc::new(DefaultLimit),
            translator: FormTranslator::new(pro_features),
        }
    }

    pub fn with_files(mut self, files: Arc<dyn FileMigrator>) -> Self {
        self.files = files;
        self
    }

    pub fn with_limit(mut self, limit: Arc<dyn EntryLimitPolicy>) -> Self {
        self.limit = limit;
        self
    }

    #[cfg(test)]
    pub fn with_translator(mut self, translator: FormTranslator) -> Self {
        self.translator = translator;
        self
    }

    /// Whether the source plugin is present
    pub async fn exists(&self) -> Result<bool> {
        self.source
            .is_installed()
            .await
            .context("Failed to probe source plugin")
    }

    async fn ensure_installed(&self) -> Result<()> {
        if !self.exists().await? {
            return Err(MigrationError::SourcePluginAbsent {
                source: SOURCE_NAME,
            }
            .into());
        }
        Ok(())
    }

    async fn source_form(&self, id: &str) -> Result<SourceForm> {
        self.source
            .get_form(id)
            .await
            .with_context(|| format!("Failed to read source form {}", id))?
            .ok_or_else(|| {
                MigrationError::FormNotFound {
                    form_id: id.to_string(),
                }
                .into()
            })
    }

    /// Source form title for reports, empty when the form cannot be read
    async fn form_name(&self, id: &str) -> String {
        match self.source.get_form(id).await {
            Ok(Some(form)) => form.name,
            _ => String::new(),
        }
    }

    async fn imported_id(&self, source_id: &str) -> Result<Option<i64>> {
        self.destination
            .find_form_by_source_id(&link(source_id))
            .await
            .with_context(|| format!("Failed to look up imported form for {}", source_id))
    }

    /// List source forms with their imported status
    pub async fn forms_formatted(&self) -> Result<Vec<FormSummary>> {
        self.ensure_installed().await?;

        let forms = self
            .source
            .list_forms()
            .await
            .context("Failed to list source forms")?;

        let mut summaries = Vec::with_capacity(forms.len());
        for form in forms {
            let imported_id = self.imported_id(&form.id).await?;
            summaries.push(FormSummary {
                name: form.name,
                id: form.id,
                imported_id,
            });
        }

        Ok(summaries)
    }

    /// Translate a source form without writing anything
    pub async fn translate_form(&self, id: &str) -> Result<FormTranslation> {
        self.ensure_installed().await?;
        let form = self.source_form(id).await?;
        Ok(self.translator.translate(&form)?)
    }

    /// Import one form; an already linked destination form is rewritten in place
    pub async fn import_form(&self, id: &str) -> Result<ImportOutcome> {
        self.ensure_installed().await?;
        let form = self.source_form(id).await?;

        let translation = match self.translator.translate(&form) {
            Ok(translation) => translation,
            Err(err) => {
                self.log(None, LogStatus::Failed, &form.name, &err.to_string())
                    .await?;
                return Err(err.into());
            }
        };

        let existing = self.imported_id(&form.id).await?;
        let form_id = match existing {
            Some(form_id) => {
                log::info!("Source form {} already imported as {}, updating", form.id, form_id);
                form_id
            }
            None => self
                .destination
                .create_form(&translation.form().title, &link(&form.id))
                .await
                .with_context(|| format!("Failed to create destination form for {}", form.id))?,
        };

        self.destination
            .attach_fields(form_id, translation.form())
            .await
            .with_context(|| format!("Failed to store fields of form {}", form_id))?;
        self.destination
            .attach_metadata(form_id, &translation.meta)
            .await
            .with_context(|| format!("Failed to store metadata of form {}", form_id))?;

        let unsupported = translation.unsupported_fields().to_vec();
        let mut description = format!("{} imported from {}", form.name, SOURCE_NAME);
        if !unsupported.is_empty() {
            description.push_str(&format!("; unsupported fields: {}", unsupported.join(", ")));
        }
        self.log(Some(form_id), LogStatus::Success, &form.name, &description)
            .await?;

        log::info!("Imported source form {} as destination form {}", form.id, form_id);

        Ok(ImportOutcome {
            source_id: form.id,
            form_id,
            title: translation.fields.form.title,
            unsupported_fields: unsupported,
            reimported: existing.is_some(),
        })
    }

    /// Import the given forms, or every source form when `ids` is empty
    ///
    /// A failing form is reported and the batch moves on.
    pub async fn import_all(&self, ids: &[String]) -> Result<ImportReport> {
        let ids: Vec<(String, Option<String>)> = if ids.is_empty() {
            self.forms_formatted()
                .await?
                .into_iter()
                .map(|form| (form.id, Some(form.name)))
                .collect()
        } else {
            self.ensure_installed().await?;
            ids.iter().map(|id| (id.clone(), None)).collect()
        };

        let mut report = ImportReport::default();
        for (id, name) in ids {
            match self.import_form(&id).await {
                Ok(outcome) => report.imported.push(outcome),
                Err(err) => {
                    log::warn!("Failed to import source form {}: {:#}", id, err);
                    let name = match name {
                        Some(name) => name,
                        None => self.form_name(&id).await,
                    };
                    report.failed.push(FormFailure {
                        source_id: id,
                        name,
                        error: format!("{:#}", err),
                    });
                }
            }
        }

        Ok(report)
    }

    /// Translate a form's stored entries, bounded by the entry limit policy
    pub async fn get_entries(&self, id: &str) -> Result<EntryBatch> {
        self.ensure_installed().await?;
        let form = self.source_form(id).await?;
        let fields = self.translator.translate_fields(&form)?;

        let total = self
            .source
            .count_entries(&form.id)
            .await
            .with_context(|| format!("Failed to count entries of form {}", form.id))?;
        let limit = self
            .limit
            .max_entries(DEFAULT_ENTRY_MIGRATION_MAX_LIMIT, SOURCE_KEY, total, &form.id);

        let submissions = self
            .source
            .list_entries(&form.id, limit)
            .await
            .with_context(|| format!("Failed to read entries of form {}", form.id))?;

        log::debug!(
            "Form {}: translating {} of {} entries (limit {})",
            form.id,
            submissions.len(),
            total,
            limit
        );

        let mut batch = translate_entries(fields.fields(), &submissions, self.files.as_ref());
        batch.total = total;
        Ok(batch)
    }

    /// Import a form's entries into its destination form
    ///
    /// Entries imported earlier from the same submission are rewritten.
    pub async fn import_entries(&self, id: &str) -> Result<EntryImport> {
        self.ensure_installed().await?;

        let form_id = self
            .imported_id(id)
            .await?
            .ok_or_else(|| MigrationError::NotImported {
                form_id: id.to_string(),
            })?;

        let batch = self.get_entries(id).await?;

        for entry in &batch.entries {
            self.destination
                .upsert_entry(form_id, entry)
                .await
                .with_context(|| format!("Failed to store entry {}", entry.source_id))?;
        }

        log::info!(
            "Imported {} entries into destination form {} ({} skipped)",
            batch.entries.len(),
            form_id,
            batch.skipped.len()
        );

        Ok(EntryImport {
            form_id,
            total: batch.total,
            imported: batch.entries.len(),
            skipped: batch.skipped.len(),
        })
    }

    async fn log(
        &self,
        form_id: Option<i64>,
        status: LogStatus,
        title: &str,
        description: &str,
    ) -> Result<()> {
        self.destination
            .record_log(&ImportLog {
                parent_source_id: form_id,
                source_type: SOURCE_NAME.to_string(),
                component: LOG_COMPONENT.to_string(),
                status,
                title: title.to_string(),
                description: description.to_string(),
            })
            .await
            .context("Failed to write import log")
    }
}

fn link(source_id: &str) -> SourceLink {
    SourceLink {
        source_key: SOURCE_KEY.to_string(),
        source_id: source_id.to_string(),
    }
}
