use crate::catalog::loader::{fetch_catalog, fetch_course};
use crate::catalog::{
    CatalogSource, CourseCatalog, CourseEntry, DirectorySource, Exam, ExamId, ExamList, FileRow,
    PendingFetch,
};
use crate::error::CatalogError;
use crate::session::{
    CoursePage, Event, IndexPage, Location, PageLoad, QueryDebouncer, SelectionChange,
};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Search,
    Help,
}

/// Background fetch in flight
pub enum LoadState {
    Idle,
    Catalog(PendingFetch<CourseCatalog>),
    Course(PendingFetch<ExamList>),
}

/// A displayed line of the result list
pub enum Row<'a> {
    Course(&'a CourseEntry),
    Exam { exam: &'a Exam, expanded: bool },
    File(FileRow),
}

/// Application state
pub struct App {
    /// Published catalog, also used to resolve file rows
    directory: DirectorySource,
    source: Arc<dyn CatalogSource>,
    /// Course list, fetched once per session
    pub index: IndexPage,
    /// Open course, if any
    pub course: Option<CoursePage>,
    /// Search field content
    pub query: String,
    pub selected: usize,
    pub mode: Mode,
    /// Previous mode before entering help (to return to)
    pub previous_mode: Mode,
    pub status_message: String,
    debouncer: QueryDebouncer,
    load_state: LoadState,
}

impl App {
    /// Create the app and start fetching the catalog in the background.
    ///
    /// A `location` naming a course opens that course as soon as possible.
    pub fn new(root: PathBuf, location: Location, debounce: Duration) -> Self {
        let directory = DirectorySource::new(root);
        let source: Arc<dyn CatalogSource> = Arc::new(directory.clone());
        let load_state = LoadState::Catalog(fetch_catalog(&source));

        let mut app = Self {
            directory,
            source,
            index: IndexPage::new(),
            course: None,
            query: String::new(),
            selected: 0,
            mode: Mode::Search,
            previous_mode: Mode::Search,
            status_message: "Loading catalog...".to_string(),
            debouncer: QueryDebouncer::new(debounce),
            load_state,
        };

        if !location.is_index() {
            // The catalog fetch is superseded; the index is fetched again on return
            app.navigate(location);
        }
        app
    }

    /// Current location, as it would appear in the address bar
    pub fn location(&self) -> Location {
        self.course
            .as_ref()
            .map(|c| c.location().clone())
            .unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        !matches!(self.load_state, LoadState::Idle)
    }

    /// Check for background fetch completion (call this in event loop)
    pub fn poll_load(&mut self) -> Result<()> {
        // Take ownership of the state temporarily
        let current_state = std::mem::replace(&mut self.load_state, LoadState::Idle);

        match current_state {
            LoadState::Catalog(pending) => match pending.try_take() {
                Some(result) => {
                    self.index.resolve(result)?;
                    self.status_message = match self.index.catalog() {
                        Some(catalog) => format!(
                            "{} courses, {} exams",
                            catalog.courses.len(),
                            catalog.exam_count
                        ),
                        None => "Catalog unavailable".to_string(),
                    };
                    self.clamp_selection();
                }
                None => self.load_state = LoadState::Catalog(pending),
            },
            LoadState::Course(pending) => match pending.try_take() {
                Some(result) => self.finish_course_load(result)?,
                None => self.load_state = LoadState::Course(pending),
            },
            LoadState::Idle => {}
        }
        Ok(())
    }

    fn finish_course_load(&mut self, result: Result<ExamList, CatalogError>) -> Result<()> {
        let Some(course) = self.course.as_mut() else {
            return Ok(());
        };

        match course.resolve(result)? {
            PageLoad::Ready { restored } => {
                self.status_message = format!(
                    "{} {}: {} exams",
                    course.code().to_uppercase(),
                    course.name().unwrap_or_default(),
                    course.exam_count()
                );
                self.selected = 0;
                if let Some(SelectionChange::Expanded { exam, .. }) = restored {
                    self.select_exam_row(exam);
                }
            }
            PageLoad::Redirect(redirect) => {
                let code = course.code().to_string();
                self.status_message = format!("Course {} not found", code.to_uppercase());
                self.go_to(redirect.target());
            }
        }
        Ok(())
    }

    /// Evaluate the debounced query if its delay has elapsed
    pub fn poll_debounce(&mut self) {
        if let Some(query) = self.debouncer.poll(Instant::now()) {
            self.dispatch(Event::QueryChanged(query));
        }
    }

    /// How long the event loop may wait for input
    pub fn poll_timeout(&self, max: Duration) -> Duration {
        self.debouncer
            .time_until_ready(Instant::now())
            .map_or(max, |t| t.min(max))
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.debouncer.on_keyup(&self.query, Instant::now());
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.debouncer.on_keyup(&self.query, Instant::now());
    }

    /// Delete word backward from query
    pub fn delete_word(&mut self) {
        while self.query.ends_with(' ') {
            self.query.pop();
        }
        while !self.query.is_empty() && !self.query.ends_with(' ') {
            self.query.pop();
        }
        self.debouncer.on_keyup(&self.query, Instant::now());
    }

    /// Enter: search now
    pub fn confirm(&mut self) {
        let query = self.debouncer.on_confirm(&self.query);
        self.dispatch(Event::QueryChanged(query));
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.debouncer.clear();
        self.dispatch(Event::QueryChanged(String::new()));
    }

    fn dispatch(&mut self, event: Event) {
        let change = match self.course.as_mut() {
            Some(course) => course.handle(event),
            None => {
                self.index.handle(event);
                None
            }
        };
        if let Some(change) = change {
            self.show_change(&change);
        }
        self.clamp_selection();
    }

    fn show_change(&mut self, change: &SelectionChange) {
        self.status_message = match change {
            SelectionChange::Expanded { rows, .. } => {
                format!("{} ({} file(s))", self.location(), rows.len())
            }
            SelectionChange::Collapsed { .. } => self.location().to_string(),
        };
    }

    /// Rows shown in the result list
    pub fn rows(&self) -> Vec<Row<'_>> {
        match &self.course {
            Some(course) => {
                let expanded = course.expanded();
                let mut rows = Vec::with_capacity(course.results().len());
                for exam in course.results() {
                    let is_expanded = expanded.as_ref().is_some_and(|(id, _)| *id == exam.id);
                    rows.push(Row::Exam {
                        exam,
                        expanded: is_expanded,
                    });
                    if is_expanded && let Some((_, files)) = &expanded {
                        rows.extend(files.iter().cloned().map(Row::File));
                    }
                }
                rows
            }
            None => self.index.results().iter().map(Row::Course).collect(),
        }
    }

    /// Activate the highlighted row: open a course, toggle an exam, open a file
    pub fn activate(&mut self) {
        enum Action {
            Open(String),
            Toggle(ExamId),
            File(FileRow),
        }

        let action = match self.rows().get(self.selected) {
            Some(Row::Course(entry)) => Action::Open(entry.code.clone()),
            Some(Row::Exam { exam, .. }) => Action::Toggle(exam.id),
            Some(Row::File(row)) => Action::File(row.clone()),
            None => return,
        };

        match action {
            Action::Open(code) => self.navigate(Location::course_page(code)),
            Action::Toggle(id) => {
                self.dispatch(Event::ExamClicked(id));
                self.select_exam_row(id);
            }
            Action::File(row) => self.open_file(&row),
        }
    }

    /// Go back to the index, or report that we already are there
    pub fn back(&mut self) -> bool {
        if self.course.is_some() {
            self.go_to(Location::index());
            true
        } else {
            false
        }
    }

    /// Open `location` like a page load
    pub fn navigate(&mut self, location: Location) {
        match CoursePage::open(location) {
            Ok(page) => {
                let fallback_name = self
                    .index
                    .catalog()
                    .and_then(|c| c.course_name(page.code()))
                    .map(str::to_string);
                self.status_message = format!("Loading {}...", page.code().to_uppercase());
                self.load_state = LoadState::Course(fetch_course(&self.source, page.code(), fallback_name));
                self.course = Some(page);
                self.reset_query();
            }
            Err(redirect) => self.go_to(redirect.target()),
        }
    }

    fn go_to(&mut self, location: Location) {
        if !location.is_index() {
            self.navigate(location);
            return;
        }
        self.course = None;
        self.reset_query();
        if !self.index.is_loaded() && !self.is_loading() {
            self.load_state = LoadState::Catalog(fetch_catalog(&self.source));
        }
    }

    fn reset_query(&mut self) {
        self.query.clear();
        self.debouncer.clear();
        self.selected = 0;
        self.dispatch(Event::QueryChanged(String::new()));
    }

    /// Open an exam file in a new browser window or tab
    fn open_file(&mut self, row: &FileRow) {
        let path = self.directory.resolve_file(&row.path);
        let absolute = path.canonicalize().unwrap_or(path);

        let target = match Url::from_file_path(&absolute) {
            Ok(url) => url.to_string(),
            Err(()) => absolute.to_string_lossy().into_owned(),
        };

        debug!(url = %target, "opening exam file");
        match webbrowser::open(&target) {
            Ok(()) => self.status_message = format!("Opened {}", row.label()),
            Err(e) => {
                warn!(error = %e, url = %target, "failed to open exam file");
                self.status_message = format!("Could not open {}: {}", row.path, e);
            }
        }
    }

    fn select_exam_row(&mut self, id: ExamId) {
        if let Some(pos) = self
            .rows()
            .iter()
            .position(|r| matches!(r, Row::Exam { exam, .. } if exam.id == id))
        {
            self.selected = pos;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.rows().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn select_next(&mut self) {
        let len = self.rows().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_page_down(&mut self) {
        let len = self.rows().len();
        if len > 0 {
            self.selected = (self.selected + 10).min(len - 1);
        }
    }

    pub fn select_page_up(&mut self) {
        self.selected = self.selected.saturating_sub(10);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.rows().len().saturating_sub(1);
    }

    pub fn show_help(&mut self) {
        if self.mode != Mode::Help {
            self.previous_mode = self.mode;
            self.mode = Mode::Help;
        }
    }

    pub fn hide_help(&mut self) {
        if self.mode == Mode::Help {
            self.mode = self.previous_mode;
        }
    }
}
