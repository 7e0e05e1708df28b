//! Namespace-relative resources.
//!
//! A namespace is an ordered list of roots (directories or archives). A
//! namespace name such as `config/app.properties` is resolved by asking each
//! root in order; the first root that contains it wins for single lookups,
//! and every root that contains it contributes to aggregate lookups.

use crate::archive::{ArchiveLocation, has_archive_extension};
use crate::path::{apply_relative_path, clean_path, filename};
use crate::url::UrlResource;
use classglob_api::{ResourceError, ResourceResult};
use std::ffi::OsStr;
use std::hash::{Hash, Hasher};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;
use url::Url;
use walkdir::WalkDir;

/// One entry of a namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NamespaceRoot {
    Directory(PathBuf),
    Archive(PathBuf),
}

impl NamespaceRoot {
    /// Classify by file extension only; the path need not exist.
    pub fn classify(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if has_archive_extension(&path) {
            NamespaceRoot::Archive(path)
        } else {
            NamespaceRoot::Directory(path)
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            NamespaceRoot::Directory(path) | NamespaceRoot::Archive(path) => path,
        }
    }

    /// URL of `name` inside this root, or `None` when the root lacks it.
    /// The empty name addresses the root itself.
    fn locate(&self, name: &str) -> io::Result<Option<Url>> {
        match self {
            NamespaceRoot::Directory(dir) => {
                let candidate = if name.is_empty() {
                    dir.clone()
                } else {
                    dir.join(name)
                };
                if !candidate.exists() {
                    return Ok(None);
                }
                let absolute = std::path::absolute(&candidate)?;
                let url = if absolute.is_dir() {
                    Url::from_directory_path(&absolute)
                } else {
                    Url::from_file_path(&absolute)
                };
                url.map(Some).map_err(|_| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("cannot express {} as a URL", absolute.display()),
                    )
                })
            }
            NamespaceRoot::Archive(archive) => {
                if !archive.is_file() {
                    return Ok(None);
                }
                let location = ArchiveLocation::new(std::path::absolute(archive)?, name);
                if !location.exists()? {
                    return Ok(None);
                }
                location
                    .to_url()
                    .map(Some)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))
            }
        }
    }
}

/// Ordered list of roots that namespace names are resolved against
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace {
    roots: Vec<NamespaceRoot>,
}

impl Namespace {
    pub fn new<P: Into<PathBuf>>(roots: impl IntoIterator<Item = P>) -> Self {
        Self {
            roots: roots.into_iter().map(NamespaceRoot::classify).collect(),
        }
    }

    /// Parse a platform path list (`:`-separated on Unix, `;` on Windows).
    /// Empty elements are ignored.
    pub fn from_path_list(list: impl AsRef<OsStr>) -> Self {
        Self::new(std::env::split_paths(list.as_ref()).filter(|p| !p.as_os_str().is_empty()))
    }

    /// Every archive below `dir`, in sorted order. Source and javadoc jars are
    /// skipped.
    pub fn from_lib_dir(dir: &Path) -> Self {
        if !dir.is_dir() {
            debug!("Library directory {} does not exist", dir.display());
            return Self::default();
        }
        let roots = WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && has_archive_extension(e.path()))
            .filter(|e| {
                let name = e.path().file_name().and_then(|n| n.to_str()).unwrap_or("");
                !name.ends_with("-sources.jar") && !name.ends_with("-javadoc.jar")
            })
            .map(|e| NamespaceRoot::Archive(e.into_path()))
            .collect();
        Self { roots }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(NamespaceRoot::classify(root));
        self
    }

    pub fn extend(&mut self, other: Namespace) {
        self.roots.extend(other.roots);
    }

    pub fn roots(&self) -> &[NamespaceRoot] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// First root containing `name`
    pub fn find(&self, name: &str) -> Option<Url> {
        self.roots.iter().find_map(|root| self.locate_in(root, name))
    }

    /// Every root containing `name`, in namespace order
    pub fn find_all(&self, name: &str) -> Vec<Url> {
        self.roots
            .iter()
            .filter_map(|root| self.locate_in(root, name))
            .collect()
    }

    fn locate_in(&self, root: &NamespaceRoot, name: &str) -> Option<Url> {
        match root.locate(name) {
            Ok(found) => found,
            Err(e) => {
                debug!("Skipping namespace root {}: {}", root.path().display(), e);
                None
            }
        }
    }
}

/// A resource named relative to a [`Namespace`]
#[derive(Debug, Clone)]
pub struct NamespaceResource {
    name: String,
    namespace: Arc<Namespace>,
}

impl NamespaceResource {
    /// The name is cleaned and a leading `/` is dropped.
    pub fn new(name: &str, namespace: Arc<Namespace>) -> Self {
        let cleaned = clean_path(name);
        let name = cleaned.strip_prefix('/').unwrap_or(&cleaned).to_string();
        Self { name, namespace }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &Arc<Namespace> {
        &self.namespace
    }

    /// URL of the first root containing this name
    pub fn resolve(&self) -> ResourceResult<Url> {
        self.namespace
            .find(&self.name)
            .ok_or_else(|| ResourceError::not_found(self.description()))
    }

    fn resolved(&self) -> ResourceResult<UrlResource> {
        self.resolve().map(UrlResource::new)
    }

    pub fn exists(&self) -> bool {
        self.namespace.find(&self.name).is_some()
    }

    pub fn is_readable(&self) -> bool {
        self.resolved().is_ok_and(|r| r.is_readable())
    }

    pub fn is_file(&self) -> bool {
        self.resolved().is_ok_and(|r| r.is_file())
    }

    pub fn content_length(&self) -> ResourceResult<u64> {
        self.resolved()?.content_length()
    }

    pub fn last_modified(&self) -> ResourceResult<SystemTime> {
        self.resolved()?.last_modified()
    }

    pub fn open(&self) -> ResourceResult<Box<dyn Read + Send>> {
        self.resolved()?.open()
    }

    pub fn file_path(&self) -> Option<PathBuf> {
        self.resolved().ok().and_then(|r| r.file_path())
    }

    pub fn create_relative(&self, relative: &str) -> Self {
        Self::new(&apply_relative_path(&self.name, relative), self.namespace.clone())
    }

    pub fn filename(&self) -> Option<String> {
        filename(&self.name)
    }

    pub fn description(&self) -> String {
        format!("class path resource [{}]", self.name)
    }
}

impl PartialEq for NamespaceResource {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && (Arc::ptr_eq(&self.namespace, &other.namespace) || self.namespace == other.namespace)
    }
}

impl Eq for NamespaceResource {}

impl Hash for NamespaceResource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
