use super::constants::VARIADIC_MARKER;

/// Transform a variadic path into a specific path by substituting the identifiers.
///
/// Each marker is replaced positionally, left to right, by the next identifier. Paths
/// without markers are returned as they are. Returns None if the path is empty, if
/// there are fewer identifiers than markers, or if the markers are malformed (a doubled
/// marker or an escaped marker). A None path must not be written to the template.
pub fn resolve_variadic_path(path: &str, identifier: &[u32]) -> Option<String> {
    if path.is_empty() {
        return None;
    }

    let n_markers = path.matches(VARIADIC_MARKER).count();
    if n_markers == 0 {
        return Some(path.to_string());
    }
    if identifier.len() < n_markers {
        return None;
    }

    let segments: Vec<&str> = path.split(VARIADIC_MARKER).collect();
    if segments.len() != n_markers + 1 {
        return None;
    }
    // Interior segments separate two markers, so they can never be empty
    if segments[1..n_markers].iter().any(|segment| segment.is_empty()) {
        return None;
    }
    if segments[..n_markers]
        .iter()
        .any(|segment| segment.ends_with('\\'))
    {
        return None;
    }

    let mut specific = String::with_capacity(path.len() + 4 * n_markers);
    for (segment, id) in segments[..n_markers].iter().zip(identifier.iter()) {
        specific.push_str(segment);
        specific.push_str(&id.to_string());
    }
    specific.push_str(segments[n_markers]);
    Some(specific)
}
