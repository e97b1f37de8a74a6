//! Core types for form migration

mod element;
mod entry;
mod field;
mod form;
mod source;

pub use element::*;
pub use entry::*;
pub use field::*;
pub use form::*;
pub use source::*;
