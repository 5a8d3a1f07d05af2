use crate::catalog::{CourseCatalog, CourseEntry};
use crate::search::prepare_query;
use crate::text::{collate, matches, normalize};

/// Courses ordered by code, filtered by `query` on code or name.
pub fn search_courses(catalog: &CourseCatalog, query: Option<&str>) -> Vec<CourseEntry> {
    let mut entries: Vec<CourseEntry> = catalog
        .courses
        .iter()
        .map(|(code, name)| CourseEntry::new(code.as_str(), name.as_str()))
        .collect();
    entries.sort_by(|a, b| collate(&a.code, &b.code));

    let Some(query) = prepare_query(query) else {
        return entries;
    };

    entries
        .into_iter()
        .filter(|entry| {
            matches(&normalize(&entry.code), &query) || matches(&normalize(&entry.name), &query)
        })
        .collect()
}
