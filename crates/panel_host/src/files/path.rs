//! Server-relative path helpers.
//!
//! Paths are `/`-separated and always absolute relative to the server's base directory; `/` is
//! the root.

/// The root directory path.
pub const ROOT_PATH: &str = "/";

/// Normalizes a server-relative path.
///
/// Trims whitespace, converts backslashes to `/`, resolves `.`/`..`, ensures a leading slash,
/// and returns `/` for empty or fully-collapsed paths.
pub fn normalize_virtual_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return ROOT_PATH.to_string();
    }

    let mut out = String::new();
    for segment in trimmed.replace('\\', "/").split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if let Some(idx) = out.rfind('/') {
                    out.truncate(idx);
                }
            }
            _ => {
                out.push('/');
                out.push_str(segment);
            }
        }
    }

    if out.is_empty() {
        ROOT_PATH.to_string()
    } else {
        out
    }
}

/// Returns the parent directory, or `None` for the root.
pub fn parent_path(path: &str) -> Option<String> {
    let normalized = normalize_virtual_path(path);
    if normalized == ROOT_PATH {
        return None;
    }
    match normalized.rfind('/') {
        Some(0) | None => Some(ROOT_PATH.to_string()),
        Some(idx) => Some(normalized[..idx].to_string()),
    }
}

/// Returns the final path segment; the root yields an empty string.
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Joins a directory and a child name.
pub fn join_path(dir: &str, name: &str) -> String {
    let dir = normalize_virtual_path(dir);
    let name = name.trim_matches('/');
    if dir == ROOT_PATH {
        format!("/{name}")
    } else {
        format!("{dir}/{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One clickable segment of the location bar.
pub struct Breadcrumb {
    /// Display label; the root is labelled `Root`.
    pub label: String,
    /// Directory the segment navigates to.
    pub path: String,
}

/// Builds the root-first breadcrumb trail for a directory.
pub fn breadcrumb_trail(path: &str) -> Vec<Breadcrumb> {
    let normalized = normalize_virtual_path(path);
    let mut trail = vec![Breadcrumb {
        label: "Root".to_string(),
        path: ROOT_PATH.to_string(),
    }];
    let mut current = String::new();
    for segment in normalized.split('/').filter(|segment| !segment.is_empty()) {
        current.push('/');
        current.push_str(segment);
        trail.push(Breadcrumb {
            label: segment.to_string(),
            path: current.clone(),
        });
    }
    trail
}

/// Percent-encodes a query-string component.
///
/// Matches `encodeURIComponent`: unreserved ASCII and `!'()*` stay literal, everything else is
/// UTF-8 percent-encoded.
pub fn encode_query_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn normalize_virtual_path_matches_expected_cases() {
        let cases = [
            ("", "/"),
            ("   ", "/"),
            ("docs/reports", "/docs/reports"),
            ("/docs//reports/", "/docs/reports"),
            ("./docs/../media", "/media"),
            ("\\docs\\reports", "/docs/reports"),
            ("/../../", "/"),
        ];

        for (input, expected) in cases {
            assert_eq!(normalize_virtual_path(input), expected, "input={input:?}");
        }
    }

    #[test]
    fn parent_of_root_is_none() {
        assert_eq!(parent_path("/"), None);
        assert_eq!(parent_path("/docs"), Some("/".to_string()));
        assert_eq!(parent_path("/docs/reports/"), Some("/docs".to_string()));
    }

    #[test]
    fn base_name_and_join() {
        assert_eq!(base_name("/docs/q3.pdf"), "q3.pdf");
        assert_eq!(base_name("/docs/"), "docs");
        assert_eq!(base_name("/"), "");
        assert_eq!(join_path("/", "a.txt"), "/a.txt");
        assert_eq!(join_path("/docs/", "a.txt"), "/docs/a.txt");
    }

    #[test]
    fn breadcrumbs_start_at_root() {
        let trail = breadcrumb_trail("/docs/reports");
        let labels: Vec<_> = trail.iter().map(|crumb| crumb.label.as_str()).collect();
        let paths: Vec<_> = trail.iter().map(|crumb| crumb.path.as_str()).collect();
        assert_eq!(labels, vec!["Root", "docs", "reports"]);
        assert_eq!(paths, vec!["/", "/docs", "/docs/reports"]);
    }

    #[test]
    fn query_components_are_percent_encoded() {
        assert_eq!(encode_query_component("/docs/a b.txt"), "%2Fdocs%2Fa%20b.txt");
        assert_eq!(encode_query_component("ü"), "%C3%BC");
        assert_eq!(encode_query_component("(x)*"), "(x)*");
    }
}
