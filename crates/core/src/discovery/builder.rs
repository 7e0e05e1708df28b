use super::{ArchiveIndexCache, DirectorySource, LocalDirectories, ResourceDiscovery};
use crate::config::DiscoveryConfig;
use classglob_matcher::{DEFAULT_SEPARATOR, GlobMatcher};
use classglob_resource::{
    DefaultResourceLoader, LoaderPolicy, Namespace, RemoteFetcher, ResourceLoader,
};
use std::sync::Arc;

/// Assembles a [`ResourceDiscovery`].
///
/// Without an explicit loader, a [`DefaultResourceLoader`] is built from the
/// namespace, policy and fetcher given here.
#[derive(Default)]
pub struct ResourceDiscoveryBuilder {
    loader: Option<Arc<dyn ResourceLoader>>,
    namespace: Namespace,
    policy: LoaderPolicy,
    fetcher: Option<Arc<dyn RemoteFetcher>>,
    matcher: Option<GlobMatcher>,
    directories: Option<Arc<dyn DirectorySource>>,
    archive_index: Option<Arc<ArchiveIndexCache>>,
}

impl ResourceDiscoveryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The configured separator only applies to [`DiscoveryConfig::matcher`];
    /// locations are always matched with `/`.
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        let builder = Self::new()
            .with_namespace(config.namespace())
            .with_policy(config.loader_policy)
            .with_matcher(config.matcher().with_separator(DEFAULT_SEPARATOR));
        if config.archive_cache_capacity == 0 {
            builder
        } else {
            builder.with_archive_index(Arc::new(ArchiveIndexCache::new(
                config.archive_cache_capacity,
            )))
        }
    }

    /// Use a custom loader; namespace, policy and fetcher are then ignored.
    pub fn with_loader(mut self, loader: Arc<dyn ResourceLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }

    /// Append one namespace root
    pub fn add_root(mut self, root: impl Into<std::path::PathBuf>) -> Self {
        self.namespace = self.namespace.with_root(root);
        self
    }

    pub fn with_policy(mut self, policy: LoaderPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn RemoteFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn with_matcher(mut self, matcher: GlobMatcher) -> Self {
        self.matcher = Some(matcher);
        self
    }

    pub fn with_directory_source(mut self, directories: Arc<dyn DirectorySource>) -> Self {
        self.directories = Some(directories);
        self
    }

    pub fn with_archive_index(mut self, index: Arc<ArchiveIndexCache>) -> Self {
        self.archive_index = Some(index);
        self
    }

    pub fn build(self) -> ResourceDiscovery {
        let loader = self.loader.unwrap_or_else(|| {
            let mut loader =
                DefaultResourceLoader::new(Arc::new(self.namespace)).with_policy(self.policy);
            if let Some(fetcher) = self.fetcher {
                loader = loader.with_fetcher(fetcher);
            }
            Arc::new(loader)
        });
        ResourceDiscovery::from_parts(
            loader,
            self.matcher.unwrap_or_default(),
            self.directories.unwrap_or_else(|| Arc::new(LocalDirectories)),
            self.archive_index,
        )
    }
}
