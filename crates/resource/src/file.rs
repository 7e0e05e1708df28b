use crate::path::{apply_relative_path, clean_file_path, filename};
use classglob_api::{ResourceError, ResourceResult};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use url::Url;

/// A resource backed by a path on the local filesystem.
///
/// Identity is the cleaned path: two handles built from `a/b/../c.txt` and
/// `a/c.txt` are equal. The empty path names the current directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileResource {
    path: PathBuf,
}

impl FileResource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: clean_file_path(path.as_ref()),
        }
    }

    /// The cleaned path this resource was created with
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_path(&self) -> PathBuf {
        self.path.clone()
    }

    fn absolute_path(&self) -> PathBuf {
        std::path::absolute(&self.path).unwrap_or_else(|_| self.path.clone())
    }

    pub fn exists(&self) -> bool {
        self.file_path().exists()
    }

    /// Exists, is not a directory, and can be opened for reading
    pub fn is_readable(&self) -> bool {
        let path = self.file_path();
        path.is_file() && File::open(&path).is_ok()
    }

    pub fn is_file(&self) -> bool {
        self.file_path().is_file()
    }

    fn metadata(&self) -> ResourceResult<fs::Metadata> {
        fs::metadata(self.file_path()).map_err(|e| ResourceError::from_io(self.description(), e))
    }

    pub fn content_length(&self) -> ResourceResult<u64> {
        Ok(self.metadata()?.len())
    }

    pub fn last_modified(&self) -> ResourceResult<SystemTime> {
        self.metadata()?
            .modified()
            .map_err(|e| ResourceError::from_io(self.description(), e))
    }

    pub fn open(&self) -> ResourceResult<Box<dyn Read + Send>> {
        let path = self.file_path();
        if path.is_dir() {
            return Err(ResourceError::from_io(
                self.description(),
                io::Error::new(io::ErrorKind::InvalidInput, "is a directory"),
            ));
        }
        let file = File::open(&path).map_err(|e| ResourceError::from_io(self.description(), e))?;
        Ok(Box::new(file))
    }

    pub fn create_relative(&self, relative: &str) -> Self {
        match self.path.to_str() {
            Some(path) => Self::new(apply_relative_path(path, relative)),
            None => {
                let parent = self.path.parent().unwrap_or_else(|| Path::new(""));
                Self::new(parent.join(relative.trim_start_matches('/')))
            }
        }
    }

    pub fn filename(&self) -> Option<String> {
        match self.path.to_str() {
            Some(path) => filename(path),
            None => self
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
        }
    }

    pub fn description(&self) -> String {
        format!("file [{}]", self.absolute_path().display())
    }

    pub fn url(&self) -> ResourceResult<Url> {
        let path = self.absolute_path();
        let url = if path.is_dir() {
            Url::from_directory_path(&path)
        } else {
            Url::from_file_path(&path)
        };
        url.map_err(|_| ResourceError::malformed(self.path.display().to_string(), "cannot express path as a file URL"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_identity_uses_cleaned_path() {
        let a = FileResource::new("/data/app/conf/../x.txt");
        let b = FileResource::new("/data/app/x.txt");
        assert_eq!(a, b);
        assert_eq!(a.path(), Path::new("/data/app/x.txt"));
    }

    #[test]
    fn test_probes_on_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.txt");
        std::fs::write(&path, "hello").unwrap();

        let resource = FileResource::new(&path);
        assert!(resource.exists());
        assert!(resource.is_readable());
        assert!(resource.is_file());
        assert_eq!(resource.content_length().unwrap(), 5);
        assert!(resource.last_modified().is_ok());

        let mut content = String::new();
        resource.open().unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "hello");
        assert_eq!(resource.filename().as_deref(), Some("a.txt"));
        assert_eq!(resource.url().unwrap().scheme(), "file");
    }

    #[test]
    fn test_directory_is_not_readable() {
        let temp = TempDir::new().unwrap();
        let resource = FileResource::new(temp.path());
        assert!(resource.exists());
        assert!(!resource.is_readable());
        assert!(!resource.is_file());
        assert!(resource.open().is_err());
        assert!(resource.url().unwrap().as_str().ends_with('/'));
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let resource = FileResource::new(temp.path().join("missing.txt"));
        assert!(!resource.exists());
        assert!(!resource.is_readable());
        assert!(resource.open().err().unwrap().is_not_found());
        assert!(resource.content_length().unwrap_err().is_not_found());
    }

    #[test]
    fn test_create_relative_normalizes() {
        let base = FileResource::new("/data/app/conf/base.xml");
        assert_eq!(
            base.create_relative("other.xml").path(),
            Path::new("/data/app/conf/other.xml")
        );
        assert_eq!(base.create_relative("../x").path(), Path::new("/data/app/x"));
    }

    #[test]
    fn test_empty_path_is_current_directory() {
        let resource = FileResource::new("");
        assert_eq!(resource, FileResource::new("."));
        assert!(resource.exists());
        assert!(!resource.is_file());
        assert_eq!(
            resource.description(),
            format!("file [{}]", std::env::current_dir().unwrap().display())
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_name_opens_the_same_file() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join(OsStr::from_bytes(b"a\xff.txt"));
        std::fs::write(&path, "raw").unwrap();

        let resource = FileResource::new(&path);
        assert_eq!(resource.file_path(), path);
        assert!(resource.is_readable());
        assert_eq!(resource.content_length().unwrap(), 3);
        assert_eq!(resource.filename().as_deref(), Some("a\u{FFFD}.txt"));

        let sibling = resource.create_relative("b.txt");
        assert_eq!(sibling.file_path(), temp.path().join("b.txt"));
    }
}
