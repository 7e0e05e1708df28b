//! Resolving location expressions to sets of resources.
//!
//! Resolution:
//! 1. Without wildcard syntax after the scheme, a location names exactly one
//!    resource (from the loader), or under `classpath*:` the same name in
//!    every namespace root.
//! 2. Otherwise the literal root prefix is resolved recursively and each
//!    resulting root is scanned: archive roots through their entry listing,
//!    filesystem roots by walking the directory tree.
//! 3. Scans run in parallel; results are merged in root order.

pub mod archive;
pub mod builder;
pub mod filesystem;
pub mod result;
pub mod root;

pub use archive::{ArchiveIndexCache, ArchiveKey};
pub use builder::ResourceDiscoveryBuilder;
pub use filesystem::{DirEntry, DirectorySource, LocalDirectories};
pub use result::{ResourceSet, SkippedRoot};
pub use root::{RootKind, root_prefix};

use crate::config::DiscoveryConfig;
use crate::error::DiscoveryResult;
use classglob_api::ResourceResult;
use classglob_matcher::GlobMatcher;
use classglob_resource::{AGGREGATE_PREFIX, DefaultResourceLoader, Resource, ResourceLoader};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Discovery engine. Cheap to share between threads; one engine may serve
/// concurrent `resolve` calls.
pub struct ResourceDiscovery {
    loader: Arc<dyn ResourceLoader>,
    matcher: GlobMatcher,
    directories: Arc<dyn DirectorySource>,
    archive_index: Option<Arc<ArchiveIndexCache>>,
}

impl ResourceDiscovery {
    /// Engine over `loader` with a default matcher, local directory listing
    /// and no archive index cache.
    pub fn new(loader: Arc<dyn ResourceLoader>) -> Self {
        Self {
            loader,
            matcher: GlobMatcher::new(),
            directories: Arc::new(LocalDirectories),
            archive_index: None,
        }
    }

    pub fn builder() -> ResourceDiscoveryBuilder {
        ResourceDiscoveryBuilder::new()
    }

    pub fn from_config(config: &DiscoveryConfig) -> Self {
        ResourceDiscoveryBuilder::from_config(config).build()
    }

    pub(crate) fn from_parts(
        loader: Arc<dyn ResourceLoader>,
        matcher: GlobMatcher,
        directories: Arc<dyn DirectorySource>,
        archive_index: Option<Arc<ArchiveIndexCache>>,
    ) -> Self {
        Self {
            loader,
            matcher,
            directories,
            archive_index,
        }
    }

    pub fn loader(&self) -> &Arc<dyn ResourceLoader> {
        &self.loader
    }

    pub fn matcher(&self) -> &GlobMatcher {
        &self.matcher
    }

    pub fn archive_index(&self) -> Option<&Arc<ArchiveIndexCache>> {
        self.archive_index.as_ref()
    }

    /// Single handle for a location without wildcards
    pub fn get_resource(&self, location: &str) -> DiscoveryResult<Resource> {
        Ok(self.loader.get_resource(location)?)
    }

    /// Every resource matching `location`.
    ///
    /// Under `classpath*:` a root that fails to scan is left out and recorded
    /// in [`ResourceSet::skipped`]; for any other location the failure is
    /// returned. Malformed expressions always fail.
    pub fn resolve(&self, location: &str) -> DiscoveryResult<ResourceSet> {
        let started = Instant::now();
        let set = self.resolve_inner(location)?;
        debug!(
            "Resolved {} to {} resources ({} roots skipped) in {:?}",
            location,
            set.len(),
            set.skipped().len(),
            started.elapsed()
        );
        Ok(set)
    }

    fn resolve_inner(&self, location: &str) -> ResourceResult<ResourceSet> {
        if let Some(name) = location.strip_prefix(AGGREGATE_PREFIX) {
            if self.matcher.is_pattern(name) {
                return self.find_matching(location);
            }
            return Ok(self.find_in_all_roots(name));
        }

        let scheme_end = location.find(':').map_or(0, |i| i + 1);
        if self.matcher.is_pattern(&location[scheme_end..]) {
            return self.find_matching(location);
        }
        let mut set = ResourceSet::new();
        set.insert(self.loader.get_resource(location)?);
        Ok(set)
    }

    fn find_in_all_roots(&self, name: &str) -> ResourceSet {
        let name = name.strip_prefix('/').unwrap_or(name);
        self.loader
            .namespace()
            .find_all(name)
            .into_iter()
            .map(Resource::from_url_normalized)
            .collect()
    }

    fn find_matching(&self, location: &str) -> ResourceResult<ResourceSet> {
        let root_dir = root_prefix(location, &self.matcher);
        let sub_pattern = &location[root_dir.len()..];
        let aggregate = location.starts_with(AGGREGATE_PREFIX);

        let roots = self.resolve_inner(root_dir)?;
        let mut set = ResourceSet::new();
        for skipped in roots.skipped() {
            set.record_skipped(skipped.root.clone(), skipped.reason.clone());
        }

        let roots = roots.into_vec();
        let outcomes: Vec<ResourceResult<Vec<Resource>>> = roots
            .par_iter()
            .map(|root| self.scan_root(root, sub_pattern))
            .collect();

        for (root, outcome) in roots.iter().zip(outcomes) {
            match outcome {
                Ok(found) => set.extend(found),
                Err(e) if aggregate && !e.is_malformed() => {
                    debug!("Skipping root {}: {}", root, e);
                    set.record_skipped(root.description(), e.to_string());
                }
                Err(e) => return Err(e),
            }
        }
        Ok(set)
    }

    fn scan_root(&self, root: &Resource, sub_pattern: &str) -> ResourceResult<Vec<Resource>> {
        let kind = match RootKind::classify(root) {
            Ok(kind) => kind,
            Err(e) if e.is_not_found() => {
                debug!("Root {} does not exist", root);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };
        match kind {
            RootKind::Archive(location) => archive::scan(
                root,
                &location,
                sub_pattern,
                &self.matcher,
                self.archive_index.as_deref(),
            ),
            RootKind::Filesystem(path) => Ok(filesystem::scan(
                &path,
                sub_pattern,
                &self.matcher,
                self.directories.as_ref(),
            )),
            RootKind::Remote(url) => {
                debug!("Cannot enumerate remote root {}", url);
                Ok(Vec::new())
            }
        }
    }
}

impl Default for ResourceDiscovery {
    /// Engine over an empty namespace
    fn default() -> Self {
        Self::new(Arc::new(DefaultResourceLoader::new(Arc::default())))
    }
}
