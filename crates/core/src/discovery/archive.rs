//! Pattern traversal of entries inside a jar/zip archive.

use classglob_api::{BoundedCache, CacheStats, ResourceError, ResourceResult};
use classglob_matcher::GlobMatcher;
use classglob_resource::archive::{self, ArchiveLocation};
use classglob_resource::Resource;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

/// Identifies one version of an archive on disk
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct ArchiveKey {
    pub path: PathBuf,
    pub size: u64,
    /// Nanoseconds since the Unix epoch
    pub mtime: u128,
}

impl ArchiveKey {
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let mtime = metadata
            .modified()?
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);

        Ok(Self {
            path: path.to_path_buf(),
            size: metadata.len(),
            mtime,
        })
    }
}

/// Shared cache of archive entry listings.
///
/// Only the immutable name listing is kept; archives are reopened whenever
/// an entry is read. An archive that changes size or modification time gets
/// a new key, so stale listings are never served.
#[derive(Debug)]
pub struct ArchiveIndexCache {
    listings: BoundedCache<ArchiveKey, Arc<[String]>>,
}

impl ArchiveIndexCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            listings: BoundedCache::new(capacity),
        }
    }

    pub fn entry_names(&self, path: &Path) -> io::Result<Arc<[String]>> {
        let key = ArchiveKey::from_path(path)?;
        self.listings.get_or_insert_with(key, || {
            debug!("Indexing archive {}", path.display());
            archive::entry_names(path).map(Arc::from)
        })
    }

    pub fn stats(&self) -> CacheStats {
        self.listings.stats()
    }

    pub fn clear(&self) {
        self.listings.clear();
    }
}

/// Every entry below `location` whose remaining path matches `sub_pattern`,
/// as handles relative to `root`.
///
/// A missing archive yields nothing; an archive that cannot be read is a
/// `BackingIo` error.
pub fn scan(
    root: &Resource,
    location: &ArchiveLocation,
    sub_pattern: &str,
    matcher: &GlobMatcher,
    index: Option<&ArchiveIndexCache>,
) -> ResourceResult<Vec<Resource>> {
    let listing = match index {
        Some(cache) => cache.entry_names(location.archive()),
        None => archive::entry_names(location.archive()).map(Arc::from),
    };
    let names: Arc<[String]> = match listing {
        Ok(names) => names,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("Skipping missing archive {}", location.archive().display());
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(ResourceError::backing_io(
                location.archive().display().to_string(),
                e,
            ));
        }
    };

    // Relative paths resolve against the root's parent, so a root entry
    // without a trailing `/` must repeat its own last segment
    let entry = location.entry();
    let (root_entry, relative_base) = if entry.is_empty() || entry.ends_with('/') {
        (entry.to_string(), String::new())
    } else {
        let last = entry.rsplit('/').next().unwrap_or(entry);
        (format!("{entry}/"), format!("{last}/"))
    };

    let mut found = Vec::new();
    for name in names.iter() {
        let Some(rest) = name.strip_prefix(&root_entry) else {
            continue;
        };
        if matcher.is_match(sub_pattern, rest) {
            found.push(root.create_relative(&format!("{relative_base}{rest}"))?);
        }
    }
    debug!(
        "Matched {} of {} entries in {}",
        found.len(),
        names.len(),
        location.archive().display()
    );
    Ok(found)
}
