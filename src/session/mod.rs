//! Page sessions: what the visitor is looking at and how input changes it.
//!
//! - [`page`] - [`IndexPage`] / [`CoursePage`] and the [`Event`]s they consume
//! - [`selection`] - the expanded-exam state machine
//! - [`debounce`] - keystroke coalescing with an Enter bypass
//! - [`location`] - `?course=<code>#<id>` parsing and rendering

pub mod debounce;
pub mod location;
pub mod page;
pub mod selection;

pub use debounce::{QueryDebouncer, Timer, DEFAULT_DEBOUNCE};
pub use location::Location;
pub use page::{CoursePage, Event, IndexPage, PageLoad, Redirect};
pub use selection::{Origin, SelectionChange, SelectionMachine, SelectionState};
