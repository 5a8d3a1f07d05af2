use crate::catalog::{CourseCatalog, CourseEntry, Exam, ExamId, ExamList, FileRow};
use crate::error::CatalogError;
use crate::search::{search_courses, search_exams};
use crate::session::location::Location;
use crate::session::selection::{Origin, SelectionChange, SelectionMachine, SelectionState};
use tracing::{debug, info, warn};

/// Input consumed by a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The (debounced or confirmed) search text
    QueryChanged(String),
    /// An exam row was activated
    ExamClicked(ExamId),
}

/// Navigation decided by a page instead of showing an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    ToIndex,
}

impl Redirect {
    pub fn target(self) -> Location {
        match self {
            Redirect::ToIndex => Location::index(),
        }
    }
}

/// Outcome of a course document fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLoad {
    /// Exams are available; `restored` is the expansion recovered from the
    /// fragment, if the fragment named one of the listed exams.
    Ready { restored: Option<SelectionChange> },
    Redirect(Redirect),
}

/// The course list.
///
/// The catalog is written once by [`IndexPage::resolve`]; until then queries
/// are only remembered.
#[derive(Debug, Default)]
pub struct IndexPage {
    catalog: Option<CourseCatalog>,
    query: String,
    results: Vec<CourseEntry>,
}

impl IndexPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the fetched catalog.
    ///
    /// An unavailable catalog leaves the list empty; a malformed one is
    /// returned to the caller.
    pub fn resolve(&mut self, result: Result<CourseCatalog, CatalogError>) -> Result<(), CatalogError> {
        match result {
            Ok(catalog) => {
                info!(
                    courses = catalog.courses.len(),
                    exams = catalog.exam_count,
                    "catalog loaded"
                );
                self.catalog = Some(catalog);
                self.refresh();
                Ok(())
            }
            Err(e) if e.is_unavailable() => {
                warn!(error = %e, "catalog unavailable");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub fn handle(&mut self, event: Event) {
        match event {
            Event::QueryChanged(query) => {
                self.query = query;
                self.refresh();
            }
            Event::ExamClicked(id) => debug!(id, "exam click on the index page ignored"),
        }
    }

    fn refresh(&mut self) {
        if let Some(catalog) = &self.catalog {
            self.results = search_courses(catalog, Some(&self.query));
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.catalog.is_some()
    }

    pub fn catalog(&self) -> Option<&CourseCatalog> {
        self.catalog.as_ref()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[CourseEntry] {
        &self.results
    }
}

/// One course's exams with the expandable selection.
#[derive(Debug)]
pub struct CoursePage {
    location: Location,
    code: String,
    exams: Option<ExamList>,
    query: String,
    results: Vec<Exam>,
    selection: SelectionMachine,
}

impl CoursePage {
    /// Open the page named by `location`; without a course it redirects.
    pub fn open(location: Location) -> Result<Self, Redirect> {
        let Some(code) = location.course().map(str::to_string) else {
            info!("no course in location, redirecting to index");
            return Err(Redirect::ToIndex);
        };
        let selection = SelectionMachine::from_fragment(location.fragment());

        Ok(Self {
            location,
            code,
            exams: None,
            query: String::new(),
            results: Vec::new(),
            selection,
        })
    }

    /// Take the fetched course document and restore the selection named by
    /// the fragment.
    pub fn resolve(&mut self, result: Result<ExamList, CatalogError>) -> Result<PageLoad, CatalogError> {
        let list = match result {
            Ok(list) => list,
            Err(e) if e.is_unavailable() => {
                warn!(course = %self.code, error = %e, "course unavailable, redirecting to index");
                return Ok(PageLoad::Redirect(Redirect::ToIndex));
            }
            Err(e) => return Err(e),
        };

        info!(course = %self.code, exams = list.exams.len(), "course loaded");

        // Restore looks at every loaded exam, whatever the query hides
        let restored = match self.selection.state() {
            SelectionState::Selected(id) => match list.find(id) {
                Some(exam) => self.selection.click(exam, Origin::Restore),
                None => {
                    debug!(course = %self.code, id, "fragment names no loaded exam");
                    self.selection = SelectionMachine::default();
                    None
                }
            },
            SelectionState::NoneSelected => None,
        };

        self.exams = Some(list);
        self.refresh();
        Ok(PageLoad::Ready { restored })
    }

    pub fn handle(&mut self, event: Event) -> Option<SelectionChange> {
        match event {
            Event::QueryChanged(query) => {
                self.query = query;
                self.refresh();
                None
            }
            Event::ExamClicked(id) => self.click(id),
        }
    }

    fn click(&mut self, id: ExamId) -> Option<SelectionChange> {
        let exam = self.exams.as_ref()?.find(id)?;
        let change = self.selection.click(exam, Origin::User);
        self.location.set_fragment(self.selection.fragment());
        debug!(id, location = %self.location, "selection changed");
        change
    }

    fn refresh(&mut self) {
        if let Some(list) = &self.exams {
            self.results = search_exams(&list.exams, Some(&self.query));
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Course name once loaded
    pub fn name(&self) -> Option<&str> {
        self.exams.as_ref().map(|l| l.name.as_str())
    }

    pub fn is_loaded(&self) -> bool {
        self.exams.is_some()
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[Exam] {
        &self.results
    }

    /// Total exams in the course, ignoring the query
    pub fn exam_count(&self) -> usize {
        self.exams.as_ref().map_or(0, |l| l.exams.len())
    }

    pub fn selection(&self) -> SelectionState {
        self.selection.state()
    }

    /// Exam whose files are shown, with its rows
    pub fn expanded(&self) -> Option<(ExamId, Vec<FileRow>)> {
        let id = self.selection.expanded()?;
        let exam = self.exams.as_ref()?.find(id)?;
        Some((id, exam.file_rows()))
    }
}
