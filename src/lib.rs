//! # exambank - search and browse a bank of past exams
//!
//! The catalog is a set of static JSON documents produced offline: a root
//! document listing every course, and one document per course listing its
//! exams and their PDF files. This crate reads it, searches it, and lets a
//! visitor expand one exam at a time to reach its files.
//!
//! ## Architecture
//!
//! - [`text`] - accent/case folding and the bidirectional substring matcher
//! - [`catalog`] - data model, JSON documents and background fetches
//! - [`search`] - course and exam search (sort, then filter)
//! - [`session`] - pages, the expanded-exam state machine, the query
//!   debouncer and `?course=<code>#<id>` locations
//! - [`tui`] - interactive terminal browser (feature `interactive`)
//! - [`output`] - colored listings for the non-interactive commands
//! - [`utils`] - configuration and logging setup
//!
//! ## Quick Start
//!
//! ```ignore
//! use exambank::catalog::{CatalogSource, DirectorySource};
//! use exambank::search::{search_courses, search_exams};
//!
//! let source = DirectorySource::new("/srv/exams");
//! let catalog = source.fetch_catalog()?;
//!
//! for course in search_courses(&catalog, Some("genie")) {
//!     let list = source.fetch_course(&course.code, Some(&course.name))?;
//!     for exam in search_exams(&list.exams, Some("2021")) {
//!         println!("{} {}", course.display_code(), exam.term());
//!     }
//! }
//! ```

pub mod catalog;
pub mod error;
pub mod output;
pub mod search;
pub mod session;
pub mod text;
#[cfg(feature = "interactive")]
pub mod tui;
pub mod utils;
