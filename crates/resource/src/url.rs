use crate::archive::{ArchiveLocation, ENTRY_SEPARATOR, is_archive_protocol};
use crate::path::{apply_relative_path, clean_path, filename};
use classglob_api::{ResourceError, ResourceResult};
use std::fmt;
use std::fs::{self, File};
use std::hash::{Hash, Hasher};
use std::io::{self, Cursor, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;
use url::Url;

/// Metadata returned by a remote probe
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteMetadata {
    pub content_length: Option<u64>,
    pub last_modified: Option<SystemTime>,
}

/// Access to URLs that are neither local files nor archive entries.
///
/// No network client is bundled; without a fetcher such URLs never exist.
pub trait RemoteFetcher: Send + Sync {
    /// Metadata-only probe. `Ok(None)` means the protocol has no such request
    /// and existence should be checked by opening a stream instead.
    fn head(&self, url: &Url) -> io::Result<Option<RemoteMetadata>>;

    fn open(&self, url: &Url) -> io::Result<Box<dyn Read + Send>>;
}

enum Target {
    File(PathBuf),
    Archive(ArchiveLocation),
    Remote,
}

/// A resource addressed by an absolute URL.
///
/// `file:` URLs are probed through the filesystem and `jar:`/`zip:`/`war:`
/// URLs by opening the archive. Anything else goes through the configured
/// [`RemoteFetcher`].
#[derive(Clone)]
pub struct UrlResource {
    url: Url,
    cleaned: String,
    fetcher: Option<Arc<dyn RemoteFetcher>>,
}

impl UrlResource {
    pub fn new(url: Url) -> Self {
        let cleaned = clean_path(url.as_str());
        Self {
            url,
            cleaned,
            fetcher: None,
        }
    }

    pub fn parse(location: &str) -> ResourceResult<Self> {
        Url::parse(location)
            .map(Self::new)
            .map_err(|e| ResourceError::malformed(location, e.to_string()))
    }

    pub fn with_fetcher(mut self, fetcher: Option<Arc<dyn RemoteFetcher>>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn is_archive_entry(&self) -> bool {
        is_archive_protocol(self.url.scheme())
    }

    pub fn archive_location(&self) -> Option<ArchiveLocation> {
        if !self.is_archive_entry() {
            return None;
        }
        ArchiveLocation::parse(&self.url).ok()
    }

    fn target(&self) -> ResourceResult<Target> {
        match self.url.scheme() {
            "file" => self
                .url
                .to_file_path()
                .map(Target::File)
                .map_err(|_| ResourceError::malformed(self.url.as_str(), "not a local file URL")),
            scheme if is_archive_protocol(scheme) => ArchiveLocation::parse(&self.url).map(Target::Archive),
            _ => Ok(Target::Remote),
        }
    }

    pub fn file_path(&self) -> Option<PathBuf> {
        match self.target() {
            Ok(Target::File(path)) => Some(path),
            _ => None,
        }
    }

    pub fn exists(&self) -> bool {
        match self.target() {
            Ok(Target::File(path)) => path.exists(),
            Ok(Target::Archive(location)) => location.exists().unwrap_or_else(|e| {
                debug!("Failed to probe {}: {}", self.url, e);
                false
            }),
            Ok(Target::Remote) => self.probe_remote(),
            Err(_) => false,
        }
    }

    pub fn is_readable(&self) -> bool {
        match self.target() {
            Ok(Target::File(path)) => path.is_file() && File::open(&path).is_ok(),
            Ok(Target::Archive(location)) => {
                !location.is_directory() && location.exists().unwrap_or(false)
            }
            Ok(Target::Remote) => self.probe_remote(),
            Err(_) => false,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.target(), Ok(Target::File(path)) if path.is_file())
    }

    fn probe_remote(&self) -> bool {
        let Some(fetcher) = &self.fetcher else {
            return false;
        };
        match fetcher.head(&self.url) {
            Ok(Some(_)) => true,
            Ok(None) => fetcher.open(&self.url).is_ok(),
            Err(e) => {
                debug!("Remote probe of {} failed: {}", self.url, e);
                false
            }
        }
    }

    fn remote_metadata(&self) -> ResourceResult<RemoteMetadata> {
        let fetcher = self.require_fetcher()?;
        fetcher
            .head(&self.url)
            .map(Option::unwrap_or_default)
            .map_err(|e| ResourceError::from_io(self.description(), e))
    }

    fn require_fetcher(&self) -> ResourceResult<&Arc<dyn RemoteFetcher>> {
        self.fetcher.as_ref().ok_or_else(|| ResourceError::Unreadable {
            description: self.description(),
            source: io::Error::new(
                io::ErrorKind::Unsupported,
                format!("no fetcher configured for scheme `{}`", self.url.scheme()),
            ),
        })
    }

    pub fn content_length(&self) -> ResourceResult<u64> {
        match self.target()? {
            Target::File(path) => fs::metadata(&path)
                .map(|m| m.len())
                .map_err(|e| ResourceError::from_io(self.description(), e)),
            Target::Archive(location) => location
                .entry_size()
                .map_err(|e| ResourceError::from_io(self.description(), e)),
            Target::Remote => match self.remote_metadata()?.content_length {
                Some(len) => Ok(len),
                // Fall back to counting the bytes of the stream
                None => {
                    let mut stream = self.open()?;
                    io::copy(&mut stream, &mut io::sink())
                        .map_err(|e| ResourceError::from_io(self.description(), e))
                }
            },
        }
    }

    /// For archive entries this is the modification time of the archive file.
    pub fn last_modified(&self) -> ResourceResult<SystemTime> {
        let path = match self.target()? {
            Target::File(path) => path,
            Target::Archive(location) => location.archive().to_path_buf(),
            Target::Remote => {
                return self.remote_metadata()?.last_modified.ok_or_else(|| {
                    ResourceError::Unreadable {
                        description: self.description(),
                        source: io::Error::new(
                            io::ErrorKind::Unsupported,
                            "remote did not report a modification time",
                        ),
                    }
                });
            }
        };
        fs::metadata(&path)
            .and_then(|m| m.modified())
            .map_err(|e| ResourceError::from_io(self.description(), e))
    }

    pub fn open(&self) -> ResourceResult<Box<dyn Read + Send>> {
        match self.target()? {
            Target::File(path) => {
                if path.is_dir() {
                    return Err(ResourceError::from_io(
                        self.description(),
                        io::Error::new(io::ErrorKind::InvalidInput, "is a directory"),
                    ));
                }
                let file = File::open(&path).map_err(|e| ResourceError::from_io(self.description(), e))?;
                Ok(Box::new(file))
            }
            Target::Archive(location) => {
                let bytes = location
                    .read()
                    .map_err(|e| ResourceError::from_io(self.description(), e))?;
                Ok(Box::new(Cursor::new(bytes)))
            }
            Target::Remote => self
                .require_fetcher()?
                .open(&self.url)
                .map_err(|e| ResourceError::from_io(self.description(), e)),
        }
    }

    /// Resolve `relative` against this URL. A leading `/` on `relative` is
    /// ignored, so the result always stays below this URL's parent.
    pub fn create_relative(&self, relative: &str) -> ResourceResult<Self> {
        let relative = relative.strip_prefix('/').unwrap_or(relative);
        let url = if self.is_archive_entry() {
            let raw = self.url.as_str();
            let Some(sep) = raw.find(ENTRY_SEPARATOR) else {
                return Err(ResourceError::malformed(raw, "missing archive entry separator"));
            };
            let (base, entry) = (&raw[..sep], &raw[sep + ENTRY_SEPARATOR.len()..]);
            let entry = clean_path(&apply_relative_path(entry, relative));
            let resolved = format!("{base}{ENTRY_SEPARATOR}{entry}");
            Url::parse(&resolved).map_err(|e| ResourceError::malformed(resolved, e.to_string()))?
        } else {
            let escaped = relative.replace('#', "%23");
            self.url
                .join(&escaped)
                .map_err(|e| ResourceError::malformed(relative, e.to_string()))?
        };
        Ok(Self::new(url).with_fetcher(self.fetcher.clone()))
    }

    pub fn filename(&self) -> Option<String> {
        match self.archive_location() {
            Some(location) => filename(location.entry()),
            None => filename(self.url.path()),
        }
    }

    pub fn description(&self) -> String {
        format!("URL [{}]", self.url)
    }
}

impl PartialEq for UrlResource {
    fn eq(&self, other: &Self) -> bool {
        self.cleaned == other.cleaned
    }
}

impl Eq for UrlResource {}

impl Hash for UrlResource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cleaned.hash(state);
    }
}

impl fmt::Debug for UrlResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlResource")
            .field("url", &self.url.as_str())
            .field("fetcher", &self.fetcher.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn create_test_jar(dir: &std::path::Path) -> PathBuf {
        let jar_path = dir.join("lib.jar");
        let file = File::create(&jar_path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("config/app.properties", options).unwrap();
        zip.write_all(b"name=demo").unwrap();
        zip.start_file("config/extra.properties", options).unwrap();
        zip.write_all(b"x=1").unwrap();
        zip.finish().unwrap();
        jar_path
    }

    fn entry_url(jar: &std::path::Path, entry: &str) -> Url {
        ArchiveLocation::new(jar, entry).to_url().unwrap()
    }

    /// Serves a fixed body for one URL and records every request.
    struct StaticFetcher {
        url: Url,
        body: &'static [u8],
        requests: Mutex<Vec<String>>,
    }

    impl RemoteFetcher for StaticFetcher {
        fn head(&self, url: &Url) -> io::Result<Option<RemoteMetadata>> {
            self.requests.lock().unwrap().push(format!("HEAD {url}"));
            if *url == self.url {
                Ok(Some(RemoteMetadata {
                    content_length: Some(self.body.len() as u64),
                    last_modified: None,
                }))
            } else {
                Err(io::Error::new(io::ErrorKind::NotFound, "404"))
            }
        }

        fn open(&self, url: &Url) -> io::Result<Box<dyn Read + Send>> {
            self.requests.lock().unwrap().push(format!("GET {url}"));
            if *url == self.url {
                Ok(Box::new(Cursor::new(self.body.to_vec())))
            } else {
                Err(io::Error::new(io::ErrorKind::NotFound, "404"))
            }
        }
    }

    #[test]
    fn test_archive_entry_probes() {
        let temp = TempDir::new().unwrap();
        let jar = create_test_jar(temp.path());
        let resource = UrlResource::new(entry_url(&jar, "config/app.properties"));

        assert!(resource.exists());
        assert!(resource.is_readable());
        assert!(!resource.is_file());
        assert_eq!(resource.content_length().unwrap(), 9);
        assert_eq!(
            resource.last_modified().unwrap(),
            fs::metadata(&jar).unwrap().modified().unwrap()
        );
        let mut content = String::new();
        resource.open().unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "name=demo");
        assert_eq!(resource.filename().as_deref(), Some("app.properties"));
    }

    #[test]
    fn test_archive_directory_exists_but_is_not_readable() {
        let temp = TempDir::new().unwrap();
        let jar = create_test_jar(temp.path());
        let dir = UrlResource::new(entry_url(&jar, "config/"));
        assert!(dir.exists());
        assert!(!dir.is_readable());
    }

    #[test]
    fn test_missing_archive_entry() {
        let temp = TempDir::new().unwrap();
        let jar = create_test_jar(temp.path());
        let resource = UrlResource::new(entry_url(&jar, "config/missing.properties"));
        assert!(!resource.exists());
        assert!(resource.open().err().unwrap().is_not_found());
    }

    #[test]
    fn test_create_relative_inside_archive() {
        let temp = TempDir::new().unwrap();
        let jar = create_test_jar(temp.path());
        let resource = UrlResource::new(entry_url(&jar, "config/app.properties"));

        let sibling = resource.create_relative("extra.properties").unwrap();
        assert_eq!(sibling, UrlResource::new(entry_url(&jar, "config/extra.properties")));
        assert!(sibling.exists());

        let up = resource.create_relative("../config/extra.properties").unwrap();
        assert_eq!(up, sibling);
    }

    #[test]
    fn test_file_url_probes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.txt");
        fs::write(&path, "abc").unwrap();
        let resource = UrlResource::new(Url::from_file_path(&path).unwrap());

        assert!(resource.exists());
        assert!(resource.is_file());
        assert_eq!(resource.content_length().unwrap(), 3);
        assert_eq!(resource.file_path(), Some(path.clone()));

        let relative = resource.create_relative("b.txt").unwrap();
        assert_eq!(relative.file_path(), Some(temp.path().join("b.txt")));
        assert!(!relative.exists());
    }

    #[test]
    fn test_equality_uses_cleaned_url() {
        let a = UrlResource::parse("jar:file:///lib/a.jar!/x/../y.txt").unwrap();
        let b = UrlResource::parse("jar:file:///lib/a.jar!/y.txt").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_remote_without_fetcher_does_not_exist() {
        let resource = UrlResource::parse("https://example.com/a.txt").unwrap();
        assert!(!resource.exists());
        assert!(matches!(
            resource.open().err().unwrap(),
            ResourceError::Unreadable { .. }
        ));
    }

    #[test]
    fn test_remote_through_fetcher() {
        let url = Url::parse("https://example.com/a.txt").unwrap();
        let fetcher = Arc::new(StaticFetcher {
            url: url.clone(),
            body: b"remote",
            requests: Mutex::new(Vec::new()),
        });
        let shared: Arc<dyn RemoteFetcher> = fetcher.clone();
        let resource = UrlResource::new(url).with_fetcher(Some(shared));

        assert!(resource.exists());
        assert_eq!(resource.content_length().unwrap(), 6);
        let mut content = String::new();
        resource.open().unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "remote");

        let missing = resource.create_relative("b.txt").unwrap();
        assert!(!missing.exists());
        assert!(missing.open().err().unwrap().is_not_found());

        let requests = fetcher.requests.lock().unwrap();
        assert!(requests.iter().any(|r| r == "HEAD https://example.com/b.txt"));
    }
}
