use crate::catalog::types::{CourseCatalog, CourseDocument, ExamList};
use crate::error::CatalogError;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::{Arc, OnceLock};
use std::thread;
use tracing::{debug, warn};

/// Directory holding the JSON documents
pub const DB_DIR: &str = "db";

/// Name of the root catalog document (without extension)
pub const DB_ROOT: &str = "root";

/// Where catalog documents come from.
///
/// Implementations are called from a background thread, so they must be
/// shareable.
pub trait CatalogSource: Send + Sync + 'static {
    /// Fetch the root catalog
    fn fetch_catalog(&self) -> Result<CourseCatalog, CatalogError>;

    /// Fetch the document of one course.
    ///
    /// `fallback_name` names the course when the document itself does not.
    fn fetch_course(&self, code: &str, fallback_name: Option<&str>)
        -> Result<ExamList, CatalogError>;
}

/// Catalog published as a directory tree:
///
/// ```text
/// <root>/db/root.json
/// <root>/db/<code>.json
/// <root>/exam/<h0h1>/<hash>.pdf
/// ```
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the root catalog document
    pub fn catalog_path(&self) -> PathBuf {
        self.root.join(DB_DIR).join(format!("{}.json", DB_ROOT))
    }

    /// Path of a course document, if the code is safe to use as a file name
    pub fn course_path(&self, code: &str) -> Result<PathBuf, CatalogError> {
        if !is_valid_course_key(code) {
            return Err(CatalogError::InvalidCode(code.to_string()));
        }
        Ok(self.root.join(DB_DIR).join(format!("{}.json", code)))
    }

    /// Absolute location of a file row's relative path
    pub fn resolve_file(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

impl CatalogSource for DirectorySource {
    fn fetch_catalog(&self) -> Result<CourseCatalog, CatalogError> {
        read_json(&self.catalog_path())
    }

    fn fetch_course(
        &self,
        code: &str,
        fallback_name: Option<&str>,
    ) -> Result<ExamList, CatalogError> {
        let path = self.course_path(code)?;
        let document: CourseDocument = read_json(&path)?;
        Ok(document.into_exam_list(fallback_name))
    }
}

/// Course codes that may be turned into a document path
pub fn is_valid_course_key(code: &str) -> bool {
    static COURSE_KEY: OnceLock<Regex> = OnceLock::new();
    COURSE_KEY
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static regex"))
        .is_match(code)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    debug!(path = %path.display(), "reading catalog document");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            CatalogError::NotFound(path.to_path_buf())
        } else {
            CatalogError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_str(&content).map_err(|source| CatalogError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// A fetch running on a background thread.
///
/// The event loop polls it with [`PendingFetch::try_take`]; the payload is
/// handed over exactly once.
pub struct PendingFetch<T> {
    receiver: Receiver<Result<T, CatalogError>>,
}

impl<T: Send + 'static> PendingFetch<T> {
    /// Run `fetch` on a new thread
    pub fn spawn<F>(fetch: F) -> Self
    where
        F: FnOnce() -> Result<T, CatalogError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(fetch());
        });
        Self { receiver: rx }
    }

    /// Wrap an already available result (used by synchronous callers)
    pub fn ready(result: Result<T, CatalogError>) -> Self {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(result);
        Self { receiver: rx }
    }

    /// Non-blocking check for completion
    pub fn try_take(&self) -> Option<Result<T, CatalogError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("catalog fetch thread terminated unexpectedly");
                Some(Err(CatalogError::Interrupted))
            }
        }
    }

    /// Block until the fetch completes
    pub fn wait(self) -> Result<T, CatalogError> {
        self.receiver.recv().unwrap_or(Err(CatalogError::Interrupted))
    }
}

/// Start fetching the root catalog
pub fn fetch_catalog(source: &Arc<dyn CatalogSource>) -> PendingFetch<CourseCatalog> {
    let source = Arc::clone(source);
    PendingFetch::spawn(move || source.fetch_catalog())
}

/// Start fetching one course document
pub fn fetch_course(
    source: &Arc<dyn CatalogSource>,
    code: &str,
    fallback_name: Option<String>,
) -> PendingFetch<ExamList> {
    let source = Arc::clone(source);
    let code = code.to_string();
    PendingFetch::spawn(move || source.fetch_course(&code, fallback_name.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_db(dir: &Path, name: &str, content: &str) {
        let db = dir.join(DB_DIR);
        fs::create_dir_all(&db).unwrap();
        fs::write(db.join(name), content).unwrap();
    }

    #[test]
    fn test_fetch_catalog() {
        let dir = TempDir::new().unwrap();
        write_db(
            dir.path(),
            "root.json",
            r#"{"exam_count":3,"courses":{"gif-1001":"Introduction"}}"#,
        );

        let catalog = DirectorySource::new(dir.path()).fetch_catalog().unwrap();
        assert_eq!(catalog.exam_count, 3);
        assert_eq!(catalog.course_name("gif-1001"), Some("Introduction"));
    }

    #[test]
    fn test_missing_catalog_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = DirectorySource::new(dir.path()).fetch_catalog().unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_malformed_course_document() {
        let dir = TempDir::new().unwrap();
        write_db(dir.path(), "gif-1001.json", r#"{"name": "x", "exams": [ "#);

        let err = DirectorySource::new(dir.path())
            .fetch_course("gif-1001", None)
            .unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { .. }));
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_bare_course_document_takes_catalog_name() {
        let dir = TempDir::new().unwrap();
        write_db(
            dir.path(),
            "gif-1001.json",
            r#"[{"id":1,"y":2021,"s":0,"h":["ab12"]}]"#,
        );

        let list = DirectorySource::new(dir.path())
            .fetch_course("gif-1001", Some("Introduction"))
            .unwrap();
        assert_eq!(list.name, "Introduction");
        assert_eq!(list.exams.len(), 1);
    }

    #[test]
    fn test_course_key_rejects_paths() {
        assert!(is_valid_course_key("gif-1001"));
        assert!(is_valid_course_key("GIF_1001"));
        assert!(!is_valid_course_key(""));
        assert!(!is_valid_course_key("../root"));
        assert!(!is_valid_course_key("gif/1001"));

        let source = DirectorySource::new("/nonexistent");
        let err = source.fetch_course("../../etc/passwd", None).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidCode(_)));
    }

    #[test]
    fn test_pending_fetch_delivers_once() {
        let dir = TempDir::new().unwrap();
        write_db(dir.path(), "root.json", r#"{"exam_count":0,"courses":{}}"#);

        let source: Arc<dyn CatalogSource> = Arc::new(DirectorySource::new(dir.path()));
        let pending = fetch_catalog(&source);
        let catalog = pending.wait().unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_pending_fetch_ready() {
        let pending = PendingFetch::ready(Ok(5u32));
        assert_eq!(pending.try_take().unwrap().unwrap(), 5);
        // Sender is gone after the single delivery
        assert!(matches!(
            pending.try_take(),
            Some(Err(CatalogError::Interrupted))
        ));
    }

    #[test]
    fn test_resolve_file() {
        let source = DirectorySource::new("/srv/exams");
        assert_eq!(
            source.resolve_file("exam/ab/ab12.pdf"),
            PathBuf::from("/srv/exams/exam/ab/ab12.pdf")
        );
    }
}
