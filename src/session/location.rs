//! Navigation surface: `?course=<code>` selects a course, `#<id>` the
//! expanded exam.

use std::fmt;
use tracing::debug;
use url::Url;
use url::form_urlencoded::byte_serialize;

/// Base used to resolve relative locations such as `?course=gif-1001#3`
const PARSE_BASE: &str = "https://exambank.invalid/";

/// Query parameter naming the course
pub const COURSE_PARAM: &str = "course";

/// Where the visitor is: the index, or a course page with an optional
/// fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    course: Option<String>,
    fragment: Option<String>,
}

impl Location {
    /// The main index (no course, no fragment)
    pub fn index() -> Self {
        Self::default()
    }

    /// A course page without a selected exam
    pub fn course_page(code: impl Into<String>) -> Self {
        Self {
            course: Some(code.into()),
            fragment: None,
        }
    }

    /// Parse an absolute URL, a relative page (`cours.html?course=…`) or a
    /// bare `?course=…#…`.
    ///
    /// Anything unparseable is the index.
    pub fn parse(input: &str) -> Self {
        let Ok(base) = Url::parse(PARSE_BASE) else {
            return Self::index();
        };

        match base.join(input.trim()) {
            Ok(url) => Self::from_url(&url),
            Err(e) => {
                debug!(input, error = %e, "unparseable location, using index");
                Self::index()
            }
        }
    }

    pub fn from_url(url: &Url) -> Self {
        let course = url
            .query_pairs()
            .find(|(key, _)| key == COURSE_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty());

        let fragment = url
            .fragment()
            .filter(|f| !f.is_empty())
            .map(str::to_string);

        Self { course, fragment }
    }

    /// Selected course code, if any
    pub fn course(&self) -> Option<&str> {
        self.course.as_deref()
    }

    /// Fragment without the leading `#`
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    pub fn set_fragment(&mut self, fragment: Option<String>) {
        self.fragment = fragment.filter(|f| !f.is_empty());
    }

    pub fn is_index(&self) -> bool {
        self.course.is_none()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.course {
            Some(code) => {
                let encoded: String = byte_serialize(code.as_bytes()).collect();
                write!(f, "?{}={}", COURSE_PARAM, encoded)?;
            }
            None => write!(f, "/")?,
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}
