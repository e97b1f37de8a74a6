//! In-memory destination store, used for dry runs and tests

use std::sync::{Mutex, MutexGuard};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;

use crate::migrator::store::{DestinationStore, ImportLog, SourceLink};
use crate::migrator::types::{DestinationForm, Entry, FormMeta};

/// A destination form as held in memory
#[derive(Debug, Clone)]
pub struct StoredForm {
    pub id: i64,
    pub title: String,
    pub link: SourceLink,
    /// Rendered `form_fields` document
    pub fields: Option<Value>,
    pub meta: Option<FormMeta>,
}

#[derive(Debug, Default)]
struct State {
    forms: Vec<StoredForm>,
    entries: Vec<(i64, Entry)>,
    logs: Vec<ImportLog>,
}

#[derive(Debug, Default)]
pub struct MemoryDestination {
    state: Mutex<State>,
}

impl MemoryDestination {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("Destination store lock poisoned"))
    }

    pub fn forms(&self) -> Result<Vec<StoredForm>> {
        Ok(self.state()?.forms.clone())
    }

    #[cfg(test)]
    pub fn form(&self, id: i64) -> Result<Option<StoredForm>> {
        Ok(self.state()?.forms.iter().find(|f| f.id == id).cloned())
    }

    pub fn entries(&self, form_id: i64) -> Result<Vec<Entry>> {
        Ok(self
            .state()?
            .entries
            .iter()
            .filter(|(id, _)| *id == form_id)
            .map(|(_, entry)| entry.clone())
            .collect())
    }

    #[cfg(test)]
    pub fn logs(&self) -> Result<Vec<ImportLog>> {
        Ok(self.state()?.logs.clone())
    }
}

#[async_trait]
impl DestinationStore for MemoryDestination {
    async fn create_form(&self, title: &str, link: &SourceLink) -> Result<i64> {
        let mut state = self.state()?;
        let id = state.forms.len() as i64 + 1;
        state.forms.push(StoredForm {
            id,
            title: title.to_string(),
            link: link.clone(),
            fields: None,
            meta: None,
        });
        Ok(id)
    }

    async fn attach_fields(&self, form_id: i64, form: &DestinationForm) -> Result<()> {
        let mut state = self.state()?;
        let stored = state
            .forms
            .iter_mut()
            .find(|f| f.id == form_id)
            .ok_or_else(|| anyhow!("Destination form {} does not exist", form_id))?;
        stored.title = form.title.clone();
        stored.fields = Some(form.to_json());
        Ok(())
    }

    async fn attach_metadata(&self, form_id: i64, meta: &FormMeta) -> Result<()> {
        let mut state = self.state()?;
        let stored = state
            .forms
            .iter_mut()
            .find(|f| f.id == form_id)
            .ok_or_else(|| anyhow!("Destination form {} does not exist", form_id))?;
        stored.meta = Some(meta.clone());
        Ok(())
    }

    async fn upsert_entry(&self, form_id: i64, entry: &Entry) -> Result<i64> {
        let mut state = self.state()?;
        let existing = state
            .entries
            .iter()
            .position(|(id, stored)| *id == form_id && stored.source_id == entry.source_id);

        match existing {
            Some(index) => {
                state.entries[index].1 = entry.clone();
                Ok(index as i64 + 1)
            }
            None => {
                state.entries.push((form_id, entry.clone()));
                Ok(state.entries.len() as i64)
            }
        }
    }

    async fn find_form_by_source_id(&self, link: &SourceLink) -> Result<Option<i64>> {
        Ok(self
            .state()?
            .forms
            .iter()
            .find(|f| &f.link == link)
            .map(|f| f.id))
    }

    async fn record_log(&self, log: &ImportLog) -> Result<()> {
        self.state()?.logs.push(log.clone());
        Ok(())
    }
}
