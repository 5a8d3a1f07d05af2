/// Bothways containment: true when either string contains the other.
///
/// Both arguments must already be normalized. An empty string is contained
/// in everything, so an empty field matches any query.
pub fn matches(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}
