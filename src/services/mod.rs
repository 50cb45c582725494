//! Services implementing the document repository workflows.

pub mod repository;
