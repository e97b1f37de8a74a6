//! Translation of source forms, metadata and entries into the destination schema

pub mod address;
pub mod entry;
pub mod form;
pub mod format;
pub mod meta;
pub mod options;
pub mod path;
mod render;

pub use entry::{EntryBatch, translate_entries};
pub use form::{FormTranslation, FormTranslator};
