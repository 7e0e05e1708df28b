//! Addressing and reading entries inside jar/zip archives.
//!
//! An archive entry is addressed by a URL of the form
//! `jar:file:/abs/lib.jar!/path/in/archive`. The part before `!/` must be a
//! `file:` URL; nested archives are not supported.

use classglob_api::{ResourceError, ResourceResult};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use url::Url;
use zip::ZipArchive;
use zip::result::ZipError;

/// URL schemes whose location names an entry inside an archive
pub const ARCHIVE_PROTOCOLS: &[&str] = &["jar", "zip", "war"];

/// File extensions treated as archives when they appear as namespace roots
pub const ARCHIVE_EXTENSIONS: &[&str] = &["jar", "zip", "war"];

/// Separator between the archive URL and the entry path
pub const ENTRY_SEPARATOR: &str = "!/";

pub fn is_archive_protocol(scheme: &str) -> bool {
    ARCHIVE_PROTOCOLS.contains(&scheme)
}

/// Whether `path` has an archive extension. No I/O is performed.
pub fn has_archive_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ARCHIVE_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
}

/// A parsed archive-entry URL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveLocation {
    protocol: String,
    archive: PathBuf,
    entry: String,
}

impl ArchiveLocation {
    pub fn new(archive: impl Into<PathBuf>, entry: impl Into<String>) -> Self {
        Self {
            protocol: "jar".to_string(),
            archive: archive.into(),
            entry: entry.into(),
        }
    }

    pub fn parse(url: &Url) -> ResourceResult<Self> {
        let raw = url.as_str();
        let protocol = url.scheme();
        if !is_archive_protocol(protocol) {
            return Err(ResourceError::malformed(raw, "not an archive URL"));
        }
        let inner = &raw[protocol.len() + 1..];
        let Some(sep) = inner.find(ENTRY_SEPARATOR) else {
            return Err(ResourceError::malformed(
                raw,
                format!("missing `{ENTRY_SEPARATOR}` entry separator"),
            ));
        };

        let archive_url = Url::parse(&inner[..sep])
            .map_err(|e| ResourceError::malformed(raw, e.to_string()))?;
        if archive_url.scheme() != "file" {
            return Err(ResourceError::malformed(
                raw,
                "only archives on the local filesystem are supported",
            ));
        }
        let archive = archive_url
            .to_file_path()
            .map_err(|_| ResourceError::malformed(raw, "archive URL is not a local path"))?;

        Ok(Self {
            protocol: protocol.to_string(),
            archive,
            entry: inner[sep + ENTRY_SEPARATOR.len()..].to_string(),
        })
    }

    pub fn archive(&self) -> &Path {
        &self.archive
    }

    /// Entry path inside the archive, without a leading `/`. Empty for the
    /// archive root.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn with_entry(&self, entry: impl Into<String>) -> Self {
        Self {
            protocol: self.protocol.clone(),
            archive: self.archive.clone(),
            entry: entry.into(),
        }
    }

    pub fn is_directory(&self) -> bool {
        self.entry.is_empty() || self.entry.ends_with('/')
    }

    pub fn to_url(&self) -> ResourceResult<Url> {
        let archive_url = Url::from_file_path(&self.archive).map_err(|_| {
            ResourceError::malformed(self.archive.display().to_string(), "archive path is not absolute")
        })?;
        let raw = format!(
            "{}:{}{}{}",
            self.protocol, archive_url, ENTRY_SEPARATOR, self.entry
        );
        Url::parse(&raw).map_err(|e| ResourceError::malformed(raw, e.to_string()))
    }

    /// Whether the entry exists. Directory entries that are only implied by
    /// the names of their children count as existing.
    pub fn exists(&self) -> io::Result<bool> {
        if !self.archive.is_file() {
            return Ok(false);
        }
        if self.entry.is_empty() {
            return Ok(true);
        }
        let archive = open_archive(&self.archive)?;
        if archive.index_for_name(&self.entry).is_some() {
            return Ok(true);
        }
        let dir_prefix = if self.entry.ends_with('/') {
            self.entry.clone()
        } else {
            format!("{}/", self.entry)
        };
        Ok(archive.file_names().any(|name| name.starts_with(&dir_prefix)))
    }

    pub fn read(&self) -> io::Result<Vec<u8>> {
        let mut archive = open_archive(&self.archive)?;
        let mut entry = archive.by_name(&self.entry).map_err(zip_to_io)?;
        let mut buf = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Uncompressed size of the entry
    pub fn entry_size(&self) -> io::Result<u64> {
        let mut archive = open_archive(&self.archive)?;
        let entry = archive.by_name(&self.entry).map_err(zip_to_io)?;
        Ok(entry.size())
    }
}

pub fn open_archive(path: &Path) -> io::Result<ZipArchive<File>> {
    let file = File::open(path)?;
    ZipArchive::new(file).map_err(zip_to_io)
}

/// All entry names of the archive in central-directory order
pub fn entry_names(path: &Path) -> io::Result<Vec<String>> {
    let archive = open_archive(path)?;
    Ok(archive.file_names().map(String::from).collect())
}

fn zip_to_io(err: ZipError) -> io::Error {
    match err {
        ZipError::Io(e) => e,
        ZipError::FileNotFound => io::Error::new(io::ErrorKind::NotFound, "no such archive entry"),
        other => io::Error::new(io::ErrorKind::InvalidData, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_jar(dir: &Path, entries: &[(&str, &str)]) -> PathBuf {
        let jar_path = dir.join("test.jar");
        let file = File::create(&jar_path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        jar_path
    }

    #[test]
    fn test_parse_archive_url() {
        let url = Url::parse("jar:file:///opt/lib/app.jar!/META-INF/MANIFEST.MF").unwrap();
        let location = ArchiveLocation::parse(&url).unwrap();
        assert_eq!(location.archive(), Path::new("/opt/lib/app.jar"));
        assert_eq!(location.entry(), "META-INF/MANIFEST.MF");
        assert!(!location.is_directory());
        assert_eq!(location.to_url().unwrap(), url);
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        let url = Url::parse("jar:file:///opt/lib/app.jar").unwrap();
        let err = ArchiveLocation::parse(&url).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_parse_rejects_remote_archive() {
        let url = Url::parse("jar:http://example.com/app.jar!/a.txt").unwrap();
        assert!(ArchiveLocation::parse(&url).unwrap_err().is_malformed());
    }

    #[test]
    fn test_entry_exists_and_read() {
        let temp = TempDir::new().unwrap();
        let jar = create_test_jar(
            temp.path(),
            &[("lib/a.txt", "alpha"), ("lib/sub/b.txt", "beta")],
        );

        let a = ArchiveLocation::new(&jar, "lib/a.txt");
        assert!(a.exists().unwrap());
        assert_eq!(a.read().unwrap(), b"alpha");
        assert_eq!(a.entry_size().unwrap(), 5);

        // Implicit directories
        assert!(ArchiveLocation::new(&jar, "lib/sub/").exists().unwrap());
        assert!(ArchiveLocation::new(&jar, "lib").exists().unwrap());
        assert!(ArchiveLocation::new(&jar, "").exists().unwrap());

        let missing = ArchiveLocation::new(&jar, "lib/c.txt");
        assert!(!missing.exists().unwrap());
        assert_eq!(missing.read().unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_missing_archive_does_not_exist() {
        let temp = TempDir::new().unwrap();
        let location = ArchiveLocation::new(temp.path().join("absent.jar"), "a.txt");
        assert!(!location.exists().unwrap());
    }

    #[test]
    fn test_entry_names_in_archive_order() {
        let temp = TempDir::new().unwrap();
        let jar = create_test_jar(temp.path(), &[("b.txt", ""), ("a.txt", "")]);
        assert_eq!(entry_names(&jar).unwrap(), vec!["b.txt", "a.txt"]);
    }

    #[test]
    fn test_corrupt_archive_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.jar");
        std::fs::write(&path, b"not a zip").unwrap();
        let err = entry_names(&path).unwrap_err();
        assert_ne!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_archive_extension() {
        assert!(has_archive_extension(Path::new("/lib/a.jar")));
        assert!(has_archive_extension(Path::new("/lib/a.ZIP")));
        assert!(!has_archive_extension(Path::new("/lib/classes")));
    }
}
