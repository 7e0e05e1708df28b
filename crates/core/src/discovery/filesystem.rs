//! Pattern traversal of a directory tree on the local filesystem.

use classglob_matcher::GlobMatcher;
use classglob_resource::path::to_slash_path;
use classglob_resource::{FileResource, Resource};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Lists directory contents for the filesystem traversal.
pub trait DirectorySource: Send + Sync {
    /// Children of `dir`, sorted by file name. An error means the directory
    /// cannot be read; it is skipped.
    fn list(&self, dir: &Path) -> io::Result<Vec<DirEntry>>;
}

/// Reads directories with `std::fs`. Symbolic links are followed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDirectories;

impl DirectorySource for LocalDirectories {
    fn list(&self, dir: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let is_dir = match fs::metadata(&path) {
                Ok(metadata) => metadata.is_dir(),
                // Dangling symlink
                Err(_) => entry.file_type().map(|t| t.is_dir()).unwrap_or(false),
            };
            entries.push(DirEntry { path, is_dir });
        }
        entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        Ok(entries)
    }
}

enum Step {
    Descend(PathBuf),
    Check(PathBuf),
}

/// Every path below `root` matching `sub_pattern`.
///
/// A missing or unlistable root yields nothing; an empty root is the current
/// directory. Subdirectories are entered only while the pattern can still
/// match something inside them, and at most once per canonical location so
/// symbolic link cycles terminate. A matching directory is reported after its
/// contents.
pub fn scan(
    root: &Path,
    sub_pattern: &str,
    matcher: &GlobMatcher,
    directories: &dyn DirectorySource,
) -> Vec<Resource> {
    // Collecting components drops `.` segments such as the one in `cwd/.`
    let root: PathBuf = match std::path::absolute(root) {
        Ok(root) => root.components().collect(),
        Err(e) => {
            debug!("Cannot make {} absolute: {}", root.display(), e);
            return Vec::new();
        }
    };
    if !root.is_dir() {
        debug!(
            "Skipping {}: does not exist or is not a directory",
            root.display()
        );
        return Vec::new();
    }

    let root_str = to_slash_path(&root);
    let mut full_pattern = root_str.trim_end_matches('/').to_string();
    if !sub_pattern.starts_with('/') {
        full_pattern.push('/');
    }
    full_pattern.push_str(&sub_pattern.replace('\\', "/"));

    let mut found = Vec::new();
    let mut visited = HashSet::new();
    let mut stack = vec![Step::Descend(root)];
    while let Some(step) = stack.pop() {
        match step {
            Step::Descend(dir) => {
                let identity = fs::canonicalize(&dir).unwrap_or_else(|_| dir.clone());
                if !visited.insert(identity) {
                    debug!("Skipping already visited directory {}", dir.display());
                    continue;
                }
                let entries = match directories.list(&dir) {
                    Ok(entries) => entries,
                    Err(e) => {
                        debug!("Skipping unreadable directory {}: {}", dir.display(), e);
                        continue;
                    }
                };
                // Reverse so the first entry is processed first
                for entry in entries.into_iter().rev() {
                    let descend = entry.is_dir && {
                        let mut dir_path = to_slash_path(&entry.path);
                        dir_path.push('/');
                        matcher.match_start(&full_pattern, &dir_path)
                    };
                    stack.push(Step::Check(entry.path.clone()));
                    if descend {
                        stack.push(Step::Descend(entry.path));
                    }
                }
            }
            Step::Check(path) => {
                if matcher.is_match(&full_pattern, &to_slash_path(&path)) {
                    found.push(Resource::File(FileResource::new(&path)));
                }
            }
        }
    }
    found
}
