//! Source plugin readers

mod export;

pub use export::ExportSourceStore;

/// Source plugin key used for links and entry limits
pub const SOURCE_KEY: &str = "wpforms";

/// Source plugin name as shown in logs and errors
pub const SOURCE_NAME: &str = "WP Forms";
