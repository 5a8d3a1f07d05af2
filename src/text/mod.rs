//! Text folding and matching primitives.
//!
//! Everything the search engines compare goes through these free functions:
//!
//! - [`normalize`] - lowercase + diacritic stripping
//! - [`matches`] - bothways substring containment on normalized text
//! - [`collate`] - ordering used for course listings
//!
//! ```
//! use exambank::text::{matches, normalize};
//!
//! let name = normalize("Génie logiciel");
//! assert_eq!(name, "genie logiciel");
//! assert!(matches(&name, &normalize("GENIE")));
//! ```

pub mod matcher;
pub mod normalize;

pub use matcher::*;
pub use normalize::*;
