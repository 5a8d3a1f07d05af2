//! Integration tests running the exambank binary against a fixture catalog.

use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;
use tempfile::TempDir;

static FIXTURE_DIR: OnceLock<TempDir> = OnceLock::new();

/// Get or create the fixture catalog (singleton)
fn fixture_dir() -> &'static Path {
    FIXTURE_DIR.get_or_init(create_fixture_dir).path()
}

fn create_fixture_dir() -> TempDir {
    let dir = TempDir::new().expect("Failed to create fixture dir");
    let db = dir.path().join("db");
    fs::create_dir_all(&db).expect("Failed to create db dir");

    fs::write(
        db.join("root.json"),
        r#"{
            "exam_count": 5,
            "courses": {
                "mat-1900": "Mathématiques de l'ingénieur",
                "gif-1001": "Introduction",
                "gmc-1000": "Génie",
                "ift-2002": "Informatique"
            }
        }"#,
    )
    .unwrap();

    fs::write(
        db.join("gif-1001.json"),
        r#"{
            "name": "Introduction",
            "exams": [
                {"id": 10, "y": 2020, "s": 1, "a": "Tremblay", "t": "Intra", "h": ["ab1200"]},
                {"id": 11, "y": 2021, "s": 2, "a": "Côté", "t": "Final", "h": ["cd3400"]},
                {"id": 12, "y": 2021, "s": 0, "a": "", "t": "", "d": "2022-01-15",
                 "h": ["ab12ff", "cd34ff"]}
            ]
        }"#,
    )
    .unwrap();

    // Historical shape: a bare array, named by the root catalog
    fs::write(
        db.join("mat-1900.json"),
        r#"[{"id": 20, "y": 2019, "s": 0, "a": "Gagnon", "t": "Examen final", "h": ["ee5500"]}]"#,
    )
    .unwrap();

    fs::write(db.join("ift-2002.json"), r#"{"name": "Informatique", "exams": [ "#).unwrap();

    dir
}

/// Run exambank with given args against the fixture catalog
fn run(args: &[&str]) -> (String, String, bool) {
    let data_home = TempDir::new().expect("Failed to create data dir");

    let output = Command::new(env!("CARGO_BIN_EXE_exambank"))
        .arg("--db")
        .arg(fixture_dir())
        .arg("--no-color")
        .args(args)
        .env("XDG_DATA_HOME", data_home.path())
        .env("HOME", data_home.path())
        .env_remove("EXAMBANK_LOG")
        .output()
        .expect("Failed to run exambank");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

fn non_empty_lines(output: &str) -> Vec<&str> {
    output.lines().filter(|l| !l.trim().is_empty()).collect()
}

#[test]
fn test_courses_sorted_by_code() {
    let (out, err, ok) = run(&["courses"]);
    assert!(ok, "stderr: {}", err);

    let codes: Vec<&str> = non_empty_lines(&out)
        .iter()
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    assert_eq!(codes, vec!["GIF-1001", "GMC-1000", "IFT-2002", "MAT-1900"]);
}

#[test]
fn test_courses_query_matches_code() {
    let (out, _, ok) = run(&["courses", "gif"]);
    assert!(ok);
    let lines = non_empty_lines(&out);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("GIF-1001"));
}

#[test]
fn test_courses_query_ignores_accents_and_case() {
    let (out, _, ok) = run(&["courses", "MATHEMATIQUES"]);
    assert!(ok);
    let lines = non_empty_lines(&out);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("Mathématiques de l'ingénieur"));
}

#[test]
fn test_courses_query_contained_in_name_both_ways() {
    // "genie" is contained in the query; so is "introduction"
    let (out, _, ok) = run(&["courses", "introduction", "au", "génie"]);
    assert!(ok);
    let lines = non_empty_lines(&out);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("GIF-1001"));
    assert!(lines[1].starts_with("GMC-1000"));
}

#[test]
fn test_exams_sorted_newest_first() {
    let (out, err, ok) = run(&["exams", "gif-1001"]);
    assert!(ok, "stderr: {}", err);

    let lines = non_empty_lines(&out);
    assert_eq!(lines[0], "GIF-1001 Introduction");
    assert!(lines[1].starts_with("[12] 2021H"));
    assert!(lines[2].starts_with("[11] 2021A"));
    assert!(lines[3].starts_with("[10] 2020E"));
}

#[test]
fn test_exams_placeholders_and_date() {
    let (out, _, ok) = run(&["exams", "gif-1001"]);
    assert!(ok);
    assert!(out.contains(
        "[12] 2021H, Auteur inconnu, Examen inconnu, 2 fichier(s), ajouté le 2022-01-15"
    ));
}

#[test]
fn test_exams_query_by_author_without_accent() {
    let (out, _, ok) = run(&["exams", "gif-1001", "cote"]);
    assert!(ok);
    let lines = non_empty_lines(&out);
    // Exam 12 has an empty title and author, which match every query
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("[12]"));
    assert!(lines[2].starts_with("[11]"));
}

#[test]
fn test_exams_year_and_semester_filters() {
    let (out, _, ok) = run(&["exams", "gif-1001", "--year", "2021", "--semester", "A"]);
    assert!(ok);
    let lines = non_empty_lines(&out);
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("[11]"));
}

#[test]
fn test_exams_bare_document_uses_catalog_name() {
    let (out, _, ok) = run(&["exams", "mat-1900"]);
    assert!(ok);
    assert_eq!(
        non_empty_lines(&out)[0],
        "MAT-1900 Mathématiques de l'ingénieur"
    );
}

#[test]
fn test_exams_missing_course_fails() {
    let (_, err, ok) = run(&["exams", "gif-9999"]);
    assert!(!ok);
    assert!(err.contains("gif-9999"));
}

#[test]
fn test_exams_malformed_course_fails() {
    let (_, _, ok) = run(&["exams", "ift-2002"]);
    assert!(!ok);
}

#[test]
fn test_show_restores_fragment_selection() {
    let (out, err, ok) = run(&["show", "?course=gif-1001#12"]);
    assert!(ok, "stderr: {}", err);

    let lines = non_empty_lines(&out);
    let exam = lines
        .iter()
        .position(|l| l.starts_with("[12]"))
        .expect("exam 12 listed");
    assert_eq!(lines[exam + 1].trim(), "Fichier 1  exam/ab/ab12ff.pdf");
    assert_eq!(lines[exam + 2].trim(), "Fichier 2  exam/cd/cd34ff.pdf");
    assert_eq!(*lines.last().unwrap(), "?course=gif-1001#12");
}

#[test]
fn test_show_without_fragment_lists_only_exams() {
    let (out, _, ok) = run(&["show", "https://exams.example.org/cours.html?course=gif-1001"]);
    assert!(ok);
    assert!(!out.contains("Fichier"));
    assert_eq!(*non_empty_lines(&out).last().unwrap(), "?course=gif-1001");
}

#[test]
fn test_show_unknown_fragment_is_ignored() {
    let (out, _, ok) = run(&["show", "?course=gif-1001#abc"]);
    assert!(ok);
    assert!(!out.contains("Fichier"));
}

#[test]
fn test_show_missing_course_redirects() {
    let (out, _, ok) = run(&["show", "?course=gif-9999#3"]);
    assert!(ok);
    assert!(out.starts_with("redirect /"));
}

#[test]
fn test_show_without_course_redirects() {
    let (out, _, ok) = run(&["show", "#3"]);
    assert!(ok);
    assert!(out.starts_with("redirect /"));
}

#[test]
fn test_show_path_traversal_redirects() {
    let (out, _, ok) = run(&["show", "?course=..%2Fdb%2Froot"]);
    assert!(ok);
    assert!(out.starts_with("redirect /"));
}

#[test]
fn test_config_reports_defaults() {
    let (out, _, ok) = run(&["config"]);
    assert!(ok);
    assert!(out.contains("Debounce:     250 ms"));
    assert!(out.contains(&fixture_dir().display().to_string()));
}

#[test]
fn test_missing_catalog_fails() {
    let empty = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_exambank"))
        .arg("--db")
        .arg(empty.path())
        .arg("courses")
        .env("XDG_DATA_HOME", empty.path())
        .env("HOME", empty.path())
        .output()
        .expect("Failed to run exambank");
    assert!(!output.status.success());
}

