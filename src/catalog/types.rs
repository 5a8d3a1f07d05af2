use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier of an exam, unique within its course
pub type ExamId = u32;

/// Reserved id meaning "no exam"
pub const NO_EXAM: ExamId = 0;

/// Placeholder shown for an exam without a title
pub const UNKNOWN_TITLE: &str = "Examen inconnu";

/// Placeholder shown for an exam without an author
pub const UNKNOWN_AUTHOR: &str = "Auteur inconnu";

/// Directory holding exam files, fanned out by hash prefix
pub const EXAM_DIR: &str = "exam";

/// Length of the hash prefix used as the fan-out directory
pub const EXAM_DIR_HASH_PREFIX: usize = 2;

/// Root catalog document: course code → course name, plus the exam total
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseCatalog {
    #[serde(default)]
    pub exam_count: u64,
    #[serde(default)]
    pub courses: HashMap<String, String>,
}

impl CourseCatalog {
    /// Name of a course, looked up by its code as stored
    pub fn course_name(&self, code: &str) -> Option<&str> {
        self.courses.get(code).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

/// A course as listed on the index page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseEntry {
    pub code: String,
    pub name: String,
}

impl CourseEntry {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Course code as printed (`GIF-1001`)
    pub fn display_code(&self) -> String {
        self.code.to_uppercase()
    }
}

/// Semester an exam was given in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Semester {
    /// Hiver
    Winter = 0,
    /// Été
    Summer = 1,
    /// Automne
    Fall = 2,
}

impl Semester {
    /// One-letter French label (`H`, `E`, `A`)
    pub fn label(self) -> char {
        match self {
            Semester::Winter => 'H',
            Semester::Summer => 'E',
            Semester::Fall => 'A',
        }
    }

    /// Parse a semester letter, French or English (`H`/`W`, `E`/`S`, `A`/`F`)
    pub fn from_letter(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "h" | "w" => Some(Semester::Winter),
            "e" | "s" => Some(Semester::Summer),
            "a" | "f" => Some(Semester::Fall),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Semester {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Semester::Winter),
            1 => Ok(Semester::Summer),
            2 => Ok(Semester::Fall),
            other => Err(format!("invalid semester code {}", other)),
        }
    }
}

impl From<Semester> for u8 {
    fn from(semester: Semester) -> Self {
        semester as u8
    }
}

/// One exam record, as stored in a course document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    pub id: ExamId,
    #[serde(rename = "y")]
    pub year: i32,
    #[serde(rename = "s")]
    pub semester: Semester,
    #[serde(rename = "t", default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(rename = "a", default, skip_serializing_if = "String::is_empty")]
    pub author: String,
    /// Date the exam was added (`YYYY-MM-DD`), shown as-is
    #[serde(rename = "d", default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<String>,
    /// Content hashes, in display order
    #[serde(rename = "h", default)]
    pub files: Vec<String>,
}

impl Exam {
    /// Title for display, with the placeholder for an empty title
    pub fn title_or_placeholder(&self) -> &str {
        if self.title.is_empty() {
            UNKNOWN_TITLE
        } else {
            &self.title
        }
    }

    /// Author for display, with the placeholder for an empty author
    pub fn author_or_placeholder(&self) -> &str {
        if self.author.is_empty() {
            UNKNOWN_AUTHOR
        } else {
            &self.author
        }
    }

    /// Year and semester label, e.g. `2021H`
    pub fn term(&self) -> String {
        format!("{}{}", self.year, self.semester.label())
    }

    /// One row per attached file, numbered from 1 in stored order
    pub fn file_rows(&self) -> Vec<FileRow> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, hash)| FileRow {
                position: i + 1,
                hash: hash.clone(),
                path: exam_file_path(hash),
            })
            .collect()
    }
}

/// A course document: course name and its exams
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExamList {
    pub name: String,
    pub exams: Vec<Exam>,
}

impl ExamList {
    pub fn find(&self, id: ExamId) -> Option<&Exam> {
        self.exams.iter().find(|e| e.id == id)
    }
}

/// On-disk shapes of a course document.
///
/// Older builds wrote the exam array alone; the name then comes from the
/// root catalog.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CourseDocument {
    Named { name: String, exams: Vec<Exam> },
    Bare(Vec<Exam>),
}

impl CourseDocument {
    pub(crate) fn into_exam_list(self, fallback_name: Option<&str>) -> ExamList {
        match self {
            CourseDocument::Named { name, exams } => ExamList { name, exams },
            CourseDocument::Bare(exams) => ExamList {
                name: fallback_name.unwrap_or_default().to_string(),
                exams,
            },
        }
    }
}

/// A materialized file link for an expanded exam
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRow {
    /// 1-based position in the exam's file list
    pub position: usize,
    pub hash: String,
    /// Relative path, `exam/{hash[0:2]}/{hash}.pdf`
    pub path: String,
}

impl FileRow {
    pub fn label(&self) -> String {
        format!("Fichier {}", self.position)
    }
}

impl fmt::Display for FileRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.path)
    }
}

/// Storage path of an exam file: `exam/{hash[0:2]}/{hash}.pdf`
pub fn exam_file_path(hash: &str) -> String {
    let prefix = hash.get(..EXAM_DIR_HASH_PREFIX).unwrap_or(hash);
    format!("{}/{}/{}.pdf", EXAM_DIR, prefix, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exam(files: &[&str]) -> Exam {
        Exam {
            id: 7,
            year: 2021,
            semester: Semester::Winter,
            title: String::new(),
            author: String::new(),
            date_added: None,
            files: files.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_exam_file_path_fans_out_by_prefix() {
        assert_eq!(exam_file_path("ab12cd"), "exam/ab/ab12cd.pdf");
    }

    #[test]
    fn test_file_rows_keep_order_and_number_from_one() {
        let rows = exam(&["ab12", "cd34"]).file_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label(), "Fichier 1");
        assert_eq!(rows[0].path, "exam/ab/ab12.pdf");
        assert_eq!(rows[1].label(), "Fichier 2");
        assert_eq!(rows[1].path, "exam/cd/cd34.pdf");
    }

    #[test]
    fn test_placeholders_only_for_empty_fields() {
        let mut e = exam(&[]);
        assert_eq!(e.title_or_placeholder(), UNKNOWN_TITLE);
        assert_eq!(e.author_or_placeholder(), UNKNOWN_AUTHOR);

        e.title = "Final".to_string();
        e.author = "Tremblay".to_string();
        assert_eq!(e.title_or_placeholder(), "Final");
        assert_eq!(e.author_or_placeholder(), "Tremblay");
    }

    #[test]
    fn test_term_label() {
        let mut e = exam(&[]);
        assert_eq!(e.term(), "2021H");
        e.semester = Semester::Fall;
        assert_eq!(e.term(), "2021A");
    }

    #[test]
    fn test_semester_from_letter() {
        assert_eq!(Semester::from_letter("H"), Some(Semester::Winter));
        assert_eq!(Semester::from_letter("w"), Some(Semester::Winter));
        assert_eq!(Semester::from_letter("E"), Some(Semester::Summer));
        assert_eq!(Semester::from_letter("f"), Some(Semester::Fall));
        assert_eq!(Semester::from_letter("x"), None);
    }

    #[test]
    fn test_exam_deserialize_short_fields() {
        let json = r#"{"id":3,"y":2020,"s":1,"a":"Côté","h":["ab12"]}"#;
        let e: Exam = serde_json::from_str(json).unwrap();
        assert_eq!(e.id, 3);
        assert_eq!(e.year, 2020);
        assert_eq!(e.semester, Semester::Summer);
        assert_eq!(e.author, "Côté");
        assert!(e.title.is_empty());
        assert_eq!(e.files, vec!["ab12".to_string()]);
    }

    #[test]
    fn test_exam_rejects_unknown_semester() {
        let json = r#"{"id":3,"y":2020,"s":5,"h":[]}"#;
        assert!(serde_json::from_str::<Exam>(json).is_err());
    }

    #[test]
    fn test_course_document_named_and_bare() {
        let named: CourseDocument =
            serde_json::from_str(r#"{"name":"Introduction","exams":[]}"#).unwrap();
        assert_eq!(named.into_exam_list(Some("ignored")).name, "Introduction");

        let bare: CourseDocument =
            serde_json::from_str(r#"[{"id":1,"y":2019,"s":2,"h":[]}]"#).unwrap();
        let list = bare.into_exam_list(Some("Depuis le catalogue"));
        assert_eq!(list.name, "Depuis le catalogue");
        assert_eq!(list.exams.len(), 1);
    }

    #[test]
    fn test_catalog_defaults() {
        let catalog: CourseCatalog =
            serde_json::from_str(r#"{"courses":{"gif-1001":"Introduction"}}"#).unwrap();
        assert_eq!(catalog.exam_count, 0);
        assert_eq!(catalog.course_name("gif-1001"), Some("Introduction"));
    }
}
