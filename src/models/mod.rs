//! Data model for documents held in the remote storage namespace.

pub mod document;
