//! WPForms to Fluent Forms migration
//!
//! Source forms are read through a [`SourceStore`], translated into the
//! destination schema by [`translate`] and written through a
//! [`DestinationStore`]. [`Migrator`] ties the pieces together.

pub mod error;
pub mod facade;
pub mod files;
pub mod limit;
pub mod memory;
pub mod source;
pub mod store;
pub mod translate;
pub mod types;

pub use facade::Migrator;
pub use files::UrlRewriteMigrator;
pub use limit::FixedLimit;
pub use memory::MemoryDestination;
pub use source::ExportSourceStore;
pub use store::DestinationStore;
