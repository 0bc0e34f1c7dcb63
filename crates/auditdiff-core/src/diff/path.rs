//! Structural and label path composition.

/// Join a structural path segment
///
/// Segments are joined with `.`, an index is appended as `[i]`. An absent or
/// empty parent is the root.
///
/// ```
/// use auditdiff_core::diff::path::bind_path;
///
/// assert_eq!(bind_path(Some("root"), Some("child"), Some(0)), "root.child[0]");
/// assert_eq!(bind_path(None, Some("child"), None), "child");
/// ```
pub fn bind_path(parent: Option<&str>, key: Option<&str>, index: Option<usize>) -> String {
    let parent = parent.unwrap_or_default();
    let key = key.unwrap_or_default();
    let mut path = match (parent.is_empty(), key.is_empty()) {
        (_, true) => parent.to_string(),
        (true, false) => key.to_string(),
        (false, false) => format!("{}.{}", parent, key),
    };
    if let Some(i) = index {
        path.push_str(&format!("[{}]", i));
    }
    path
}

/// Join a label path segment with `delimiter`; empty segments are skipped
pub fn bind_label(parent: &str, segment: &str, delimiter: &str) -> String {
    match (parent.is_empty(), segment.is_empty()) {
        (_, true) => parent.to_string(),
        (true, false) => segment.to_string(),
        (false, false) => format!("{}{}{}", parent, delimiter, segment),
    }
}
