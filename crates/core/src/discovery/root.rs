//! Splitting a location expression into its literal root and the pattern
//! below it, and classifying resolved roots by how they can be enumerated.

use classglob_api::{ResourceError, ResourceResult};
use classglob_matcher::GlobMatcher;
use classglob_resource::archive::{ArchiveLocation, is_archive_protocol};
use classglob_resource::Resource;
use std::path::PathBuf;
use url::Url;

/// Longest wildcard-free leading part of `location` that ends on a `/`,
/// including any scheme prefix.
///
/// `root_prefix("classpath*:config/**/*.xml") == "classpath*:config/"`.
/// When even the first segment holds wildcards the prefix is just the scheme
/// (or empty). The scheme ends at the first `:`.
pub fn root_prefix<'a>(location: &'a str, matcher: &GlobMatcher) -> &'a str {
    let prefix_end = location.find(':').map_or(0, |i| i + 1);
    let mut root_end = location.len();
    while root_end > prefix_end && matcher.is_pattern(&location[prefix_end..root_end]) {
        // Skip the last character so a trailing `/` is not found again
        let search_end = location[..root_end]
            .char_indices()
            .next_back()
            .map_or(0, |(i, _)| i);
        root_end = location[..search_end].rfind('/').map_or(0, |i| i + 1);
    }
    if root_end == 0 {
        root_end = prefix_end;
    }
    &location[..root_end]
}

/// How a resolved root is enumerated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootKind {
    /// Entries inside an archive below `entry`
    Archive(ArchiveLocation),
    /// A directory on the local filesystem
    Filesystem(PathBuf),
    /// A URL that cannot be listed
    Remote(Url),
}

impl RootKind {
    /// Namespace roots are resolved here, so an absent namespace name fails
    /// with `NotFound`.
    pub fn classify(root: &Resource) -> ResourceResult<Self> {
        if let Resource::File(file) = root {
            return Ok(RootKind::Filesystem(file.file_path()));
        }
        let url = root.url()?;
        match url.scheme() {
            "file" => url
                .to_file_path()
                .map(RootKind::Filesystem)
                .map_err(|_| ResourceError::malformed(url.as_str(), "not a local file URL")),
            scheme if is_archive_protocol(scheme) => ArchiveLocation::parse(&url).map(RootKind::Archive),
            _ => Ok(RootKind::Remote(url)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classglob_resource::{Namespace, NamespaceResource};
    use std::sync::Arc;

    fn root(location: &str) -> &str {
        root_prefix(location, &GlobMatcher::uncached())
    }

    #[test]
    fn test_root_prefix() {
        assert_eq!(root("classpath*:config/**/*.xml"), "classpath*:config/");
        assert_eq!(root("classpath:config/*.xml"), "classpath:config/");
        assert_eq!(root("file:/var/data/**/x.txt"), "file:/var/data/");
        assert_eq!(root("/var/data/*/conf/*.txt"), "/var/data/");
        assert_eq!(root("lib/*.txt"), "lib/");
        assert_eq!(root("jar:file:/a.jar!/lib/**/*.txt"), "jar:file:/a.jar!/lib/");
    }

    #[test]
    fn test_root_prefix_without_literal_segment() {
        assert_eq!(root("classpath*:*.xml"), "classpath*:");
        assert_eq!(root("*.txt"), "");
        assert_eq!(root("file:*.txt"), "file:");
    }

    #[test]
    fn test_root_prefix_with_templates() {
        assert_eq!(root("/data/{year}/report.txt"), "/data/");
        // Unbalanced brace is literal
        assert_eq!(root("/data/{year/*.txt"), "/data/{year/");
    }

    #[test]
    fn test_root_prefix_multibyte() {
        assert_eq!(root("/données/é*"), "/données/");
    }

    #[test]
    fn test_classify() {
        let file = Resource::from_path("/var/data");
        assert_eq!(
            RootKind::classify(&file).unwrap(),
            RootKind::Filesystem(PathBuf::from("/var/data"))
        );

        let jar = Resource::from_url(Url::parse("jar:file:///opt/a.jar!/lib/").unwrap());
        assert!(matches!(RootKind::classify(&jar).unwrap(), RootKind::Archive(l) if l.entry() == "lib/"));

        let remote = Resource::from_url(Url::parse("https://example.com/lib/").unwrap());
        assert!(matches!(RootKind::classify(&remote).unwrap(), RootKind::Remote(_)));

        let absent = Resource::Namespace(NamespaceResource::new("config/", Arc::new(Namespace::default())));
        assert!(RootKind::classify(&absent).unwrap_err().is_not_found());
    }
}
