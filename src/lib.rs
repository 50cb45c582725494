//! Client-side document repository over a remote object store.
//!
//! The crate uploads, lists, and downloads documents inside a fixed storage
//! namespace. Each upload is addressed by a millisecond-timestamp-prefixed
//! storage key, so repeated uploads of the same file never collide; the
//! original file name is recovered from the key for display and for saving
//! downloads to disk.

pub mod config;
pub mod errors;
pub mod keys;
pub mod models;
pub mod services;
pub mod store;
