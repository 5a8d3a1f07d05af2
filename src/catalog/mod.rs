//! Catalog data model and loading.
//!
//! The catalog is produced offline and published as static JSON documents.
//! This module only reads it:
//!
//! - [`types`] - courses, exams, semesters, file rows
//! - [`loader`] - [`CatalogSource`] and background fetches

pub mod loader;
pub mod types;

pub use loader::{CatalogSource, DirectorySource, PendingFetch};
pub use types::*;
