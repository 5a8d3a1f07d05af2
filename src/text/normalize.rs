use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold a string to its comparable form.
///
/// Lowercases, decomposes to NFD and drops every combining mark, so
/// `"Été"` and `"ete"` fold to the same string. Lowercasing happens first
/// because some uppercase letters lowercase to a base letter plus a mark
/// (`İ` → `i̇`), which the mark filter then removes.
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Ordering used for course listings.
///
/// Folded forms are compared first so accents and case do not push entries
/// around. Ties are broken like a locale compare: unaccented before
/// accented (`cote` < `côte`), then lowercase before uppercase
/// (`ift-2002` < `IFT-2002`).
pub fn collate(a: &str, b: &str) -> Ordering {
    normalize(a)
        .cmp(&normalize(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}
