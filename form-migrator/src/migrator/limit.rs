//! Entry migration limit

/// Entries migrated per form unless a policy says otherwise
pub const DEFAULT_ENTRY_MIGRATION_MAX_LIMIT: usize = 1000;

/// Decides how many entries of a form are migrated
pub trait EntryLimitPolicy: Send + Sync {
    /// `source_key` names the source plugin, `total` is the form's entry count
    fn max_entries(&self, default: usize, source_key: &str, total: usize, form_id: &str) -> usize;
}

/// Always the default limit
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLimit;

impl EntryLimitPolicy for DefaultLimit {
    fn max_entries(&self, default: usize, _source_key: &str, _total: usize, _form_id: &str) -> usize {
        default
    }
}

/// A fixed limit, from configuration
#[derive(Debug, Clone, Copy)]
pub struct FixedLimit(pub usize);

impl EntryLimitPolicy for FixedLimit {
    fn max_entries(&self, _default: usize, _source_key: &str, _total: usize, _form_id: &str) -> usize {
        self.0
    }
}

impl<F> EntryLimitPolicy for F
where
    F: Fn(usize, &str, usize, &str) -> usize + Send + Sync,
{
    fn max_entries(&self, default: usize, source_key: &str, total: usize, form_id: &str) -> usize {
        self(default, source_key, total, form_id)
    }
}
