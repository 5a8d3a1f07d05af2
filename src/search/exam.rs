use crate::catalog::Exam;
use crate::search::prepare_query;
use crate::text::{matches, normalize};
use std::cmp::Reverse;

/// Exams ordered newest year first, then by semester, filtered by `query`
/// on year, title or author.
///
/// The source slice is left untouched so it can be filtered again. Empty
/// titles and authors take part in matching as empty strings, which means
/// they match every query.
pub fn search_exams(exams: &[Exam], query: Option<&str>) -> Vec<Exam> {
    let mut sorted = exams.to_vec();
    sorted.sort_by_key(|exam| (Reverse(exam.year), exam.semester));

    let Some(query) = prepare_query(query) else {
        return sorted;
    };

    sorted
        .into_iter()
        .filter(|exam| exam_matches(exam, &query))
        .collect()
}

fn exam_matches(exam: &Exam, query: &str) -> bool {
    matches(&exam.year.to_string(), query)
        || matches(&normalize(&exam.title), query)
        || matches(&normalize(&exam.author), query)
}
