//! Helpers for the slash-separated relative paths used throughout the tree.

/// Maven's conventional java source root.
const SOURCE_ROOT: &str = "src/main/java";

/// Join two path fragments with a single separator.
///
/// Runs of separators collapse to one. Joining onto the empty root path
/// yields a relative path (no leading separator).
pub fn concat_path(base: &str, appending: &str) -> String {
    let joined = format!("{}/{}", base.trim(), appending.trim());
    let mut out = String::with_capacity(joined.len());
    for c in joined.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    if base.trim().is_empty() {
        out.trim_start_matches('/').to_string()
    } else {
        out
    }
}

/// The folder part of a path ("a/b/c.xml" -> "a/b"), empty for top-level entries.
pub fn parent_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// The last segment of a path ("a/b/c.xml" -> "c.xml").
pub fn file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Byte offset just past `src/main/java/`, when the path has a package part.
fn package_offset(path: &str) -> Option<usize> {
    let marker = format!("{SOURCE_ROOT}/");
    let idx = path.rfind(&marker)?;
    if idx > 0 && !path[..idx].ends_with('/') {
        return None;
    }
    let start = idx + marker.len();
    (start < path.trim_end_matches('/').len()).then_some(start)
}

/// Derive a java package name from a folder path beyond the source root.
///
/// `"web/src/main/java/org/demo/model"` becomes `"org.demo.model"`.
pub fn extract_package_name(path: &str) -> Option<String> {
    let start = package_offset(path)?;
    Some(path[start..].trim_end_matches('/').replace('/', "."))
}

/// Strip the package part from a source folder path, keeping the source root.
///
/// `"web/src/main/java/org/demo/model"` becomes `"web/src/main/java"`. Paths
/// without a package part are returned unchanged.
pub fn wipe_package_path(path: &str) -> &str {
    match package_offset(path) {
        Some(start) => &path[..start - 1],
        None => path,
    }
}

/// Turn a dotted package name into a path fragment.
pub fn package_to_path(package: &str) -> String {
    package.replace('.', "/")
}
