use crate::file::FileResource;
use crate::namespace::NamespaceResource;
use crate::url::UrlResource;
use classglob_api::ResourceResult;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use url::Url;

/// A read-only handle on one resource.
///
/// Creating a handle performs no I/O; every probe consults the backing store
/// at call time. Handles are immutable and cheap to clone, and equal handles
/// hash equally so they can be deduplicated in sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    File(FileResource),
    Url(UrlResource),
    Namespace(NamespaceResource),
}

impl Resource {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Resource::File(FileResource::new(path))
    }

    pub fn from_url(url: Url) -> Self {
        Resource::Url(UrlResource::new(url))
    }

    /// Like [`Resource::from_url`], but a local `file:` URL becomes a
    /// [`Resource::File`] so it equals the handle a directory scan yields.
    pub fn from_url_normalized(url: Url) -> Self {
        if url.scheme() == "file" {
            if let Ok(path) = url.to_file_path() {
                return Resource::from_path(path);
            }
        }
        Self::from_url(url)
    }

    pub fn exists(&self) -> bool {
        match self {
            Resource::File(r) => r.exists(),
            Resource::Url(r) => r.exists(),
            Resource::Namespace(r) => r.exists(),
        }
    }

    pub fn is_readable(&self) -> bool {
        match self {
            Resource::File(r) => r.is_readable(),
            Resource::Url(r) => r.is_readable(),
            Resource::Namespace(r) => r.is_readable(),
        }
    }

    /// Whether this resource is a regular file on the local filesystem
    pub fn is_file(&self) -> bool {
        match self {
            Resource::File(r) => r.is_file(),
            Resource::Url(r) => r.is_file(),
            Resource::Namespace(r) => r.is_file(),
        }
    }

    pub fn content_length(&self) -> ResourceResult<u64> {
        match self {
            Resource::File(r) => r.content_length(),
            Resource::Url(r) => r.content_length(),
            Resource::Namespace(r) => r.content_length(),
        }
    }

    pub fn last_modified(&self) -> ResourceResult<SystemTime> {
        match self {
            Resource::File(r) => r.last_modified(),
            Resource::Url(r) => r.last_modified(),
            Resource::Namespace(r) => r.last_modified(),
        }
    }

    /// Open a fresh byte stream. Each call returns an independent stream.
    pub fn open(&self) -> ResourceResult<Box<dyn Read + Send>> {
        match self {
            Resource::File(r) => r.open(),
            Resource::Url(r) => r.open(),
            Resource::Namespace(r) => r.open(),
        }
    }

    /// A handle of the same kind for `relative`, resolved against this
    /// resource's parent. No I/O is performed.
    pub fn create_relative(&self, relative: &str) -> ResourceResult<Resource> {
        Ok(match self {
            Resource::File(r) => Resource::File(r.create_relative(relative)),
            Resource::Url(r) => Resource::Url(r.create_relative(relative)?),
            Resource::Namespace(r) => Resource::Namespace(r.create_relative(relative)),
        })
    }

    pub fn filename(&self) -> Option<String> {
        match self {
            Resource::File(r) => r.filename(),
            Resource::Url(r) => r.filename(),
            Resource::Namespace(r) => r.filename(),
        }
    }

    /// Human-readable description used in logs and error messages
    pub fn description(&self) -> String {
        match self {
            Resource::File(r) => r.description(),
            Resource::Url(r) => r.description(),
            Resource::Namespace(r) => r.description(),
        }
    }

    pub fn url(&self) -> ResourceResult<Url> {
        match self {
            Resource::File(r) => r.url(),
            Resource::Url(r) => Ok(r.url().clone()),
            Resource::Namespace(r) => r.resolve(),
        }
    }

    /// Local filesystem path, when the resource has one
    pub fn file_path(&self) -> Option<PathBuf> {
        match self {
            Resource::File(r) => Some(r.file_path()),
            Resource::Url(r) => r.file_path(),
            Resource::Namespace(r) => r.file_path(),
        }
    }

    pub fn read_to_string(&self) -> ResourceResult<String> {
        let mut content = String::new();
        self.open()?
            .read_to_string(&mut content)
            .map_err(|e| classglob_api::ResourceError::from_io(self.description(), e))?;
        Ok(content)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

impl From<FileResource> for Resource {
    fn from(r: FileResource) -> Self {
        Resource::File(r)
    }
}

impl From<UrlResource> for Resource {
    fn from(r: UrlResource) -> Self {
        Resource::Url(r)
    }
}

impl From<NamespaceResource> for Resource {
    fn from(r: NamespaceResource) -> Self {
        Resource::Namespace(r)
    }
}
