//! String-level path normalization shared by all resource kinds.

use std::collections::VecDeque;
use std::path::{Component, Path, PathBuf};

/// Normalize a `/`-separated path: backslashes become `/`, `.` segments are
/// dropped and `..` cancels the preceding real segment. A leading scheme
/// prefix such as `file:` and a leading `/` are preserved; `..` segments that
/// cannot be cancelled are kept at the front.
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let normalized = path.replace('\\', "/");
    if !normalized.contains('.') {
        return normalized;
    }

    let mut rest = normalized.as_str();
    let mut prefix = String::new();
    if let Some(colon) = rest.find(':') {
        let candidate = &rest[..=colon];
        if !candidate.contains('/') {
            prefix.push_str(candidate);
            rest = &rest[colon + 1..];
        }
    }
    if let Some(stripped) = rest.strip_prefix('/') {
        prefix.push('/');
        rest = stripped;
    }

    let elements: Vec<&str> = rest.split('/').collect();
    let mut kept: VecDeque<&str> = VecDeque::with_capacity(elements.len());
    let mut tops = 0;
    for element in elements.iter().rev() {
        match *element {
            "." => {}
            ".." => tops += 1,
            _ if tops > 0 => tops -= 1,
            _ => kept.push_front(element),
        }
    }

    // Nothing was removed
    if elements.len() == kept.len() {
        return normalized;
    }

    for _ in 0..tops {
        kept.push_front("..");
    }
    // A lone trailing separator with nothing before it stays relative
    if kept.len() == 1 && kept.back() == Some(&"") && !prefix.ends_with('/') {
        kept.push_front(".");
    }

    let joined = kept.into_iter().collect::<Vec<_>>().join("/");
    format!("{prefix}{joined}")
}

/// [`clean_path`] for a filesystem path. The empty path is the current
/// directory; a path that is not valid UTF-8 is cleaned component-wise so its
/// bytes are kept.
pub fn clean_file_path(path: &Path) -> PathBuf {
    if path.as_os_str().is_empty() {
        return PathBuf::from(".");
    }
    if let Some(text) = path.to_str() {
        return PathBuf::from(clean_path(text));
    }

    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(cleaned.components().next_back(), Some(Component::Normal(_))) {
                    cleaned.pop();
                } else if !cleaned.has_root() {
                    cleaned.push("..");
                }
            }
            other => cleaned.push(other),
        }
    }
    cleaned
}

/// Resolve `relative` against `path` by replacing its last segment.
///
/// `apply_relative_path("a/b/c.txt", "d.txt") == "a/b/d.txt"`
pub fn apply_relative_path(path: &str, relative: &str) -> String {
    match path.rfind('/') {
        Some(idx) => {
            let mut resolved = path[..idx].to_string();
            if !relative.starts_with('/') {
                resolved.push('/');
            }
            resolved.push_str(relative);
            resolved
        }
        None => relative.to_string(),
    }
}

/// Last segment of a `/`-separated path, `None` when it is empty.
pub fn filename(path: &str) -> Option<String> {
    let name = path.rsplit('/').next().unwrap_or(path);
    (!name.is_empty()).then(|| name.to_string())
}

/// Render a filesystem path with `/` separators.
pub fn to_slash_path(path: &Path) -> String {
    let rendered = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        rendered.into_owned()
    } else {
        rendered.replace(std::path::MAIN_SEPARATOR, "/")
    }
}
