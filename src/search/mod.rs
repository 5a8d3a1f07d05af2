//! Query evaluation over the catalog.
//!
//! Both engines share the same shape: order the whole list first, then keep
//! the entries where any searchable field [`matches`](crate::text::matches)
//! the folded query. A missing or blank query returns the ordered list as is.

pub mod course;
pub mod exam;

pub use course::search_courses;
pub use exam::search_exams;

use crate::text::normalize;

/// Trimmed, folded query, or `None` when there is nothing to filter on
pub(crate) fn prepare_query(query: Option<&str>) -> Option<String> {
    let trimmed = query?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(normalize(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_query_blank() {
        assert_eq!(prepare_query(None), None);
        assert_eq!(prepare_query(Some("")), None);
        assert_eq!(prepare_query(Some("   \t")), None);
    }

    #[test]
    fn test_prepare_query_trims_and_folds() {
        assert_eq!(prepare_query(Some("  Génie ")), Some("genie".to_string()));
    }
}
