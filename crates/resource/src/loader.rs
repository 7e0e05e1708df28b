//! Turning a single location string into a [`Resource`] handle.

use crate::file::FileResource;
use crate::namespace::{Namespace, NamespaceResource};
use crate::resource::Resource;
use crate::url::{RemoteFetcher, UrlResource};
use classglob_api::{ResourceError, ResourceResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Names a resource in the namespace: `classpath:config/app.properties`
pub const NAMESPACE_PREFIX: &str = "classpath:";

/// Names every match across all namespace roots. Only meaningful to
/// discovery; a loader rejects it.
pub const AGGREGATE_PREFIX: &str = "classpath*:";

pub const FILE_PREFIX: &str = "file:";

/// How a location without a recognized prefix or URL scheme is interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoaderPolicy {
    /// Treat it as a namespace name
    #[default]
    NamespaceFirst,
    /// Treat it as a filesystem path
    FilesystemFirst,
}

pub trait ResourceLoader: Send + Sync {
    /// Resolve one location to a handle. Never checks existence.
    fn get_resource(&self, location: &str) -> ResourceResult<Resource>;

    /// The namespace that `classpath:` names resolve against
    fn namespace(&self) -> &Arc<Namespace>;
}

#[derive(Clone)]
pub struct DefaultResourceLoader {
    namespace: Arc<Namespace>,
    policy: LoaderPolicy,
    fetcher: Option<Arc<dyn RemoteFetcher>>,
}

impl DefaultResourceLoader {
    pub fn new(namespace: Arc<Namespace>) -> Self {
        Self {
            namespace,
            policy: LoaderPolicy::default(),
            fetcher: None,
        }
    }

    pub fn with_policy(mut self, policy: LoaderPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn RemoteFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn policy(&self) -> LoaderPolicy {
        self.policy
    }

    pub fn fetcher(&self) -> Option<&Arc<dyn RemoteFetcher>> {
        self.fetcher.as_ref()
    }

    /// Wrap a URL, attaching the remote fetcher when one is configured.
    pub fn url_resource(&self, url: Url) -> UrlResource {
        UrlResource::new(url).with_fetcher(self.fetcher.clone())
    }

    /// `file:` followed by a path or by `//host/path`. An empty remainder is
    /// the current directory.
    fn file_location(&self, location: &str, rest: &str) -> ResourceResult<Resource> {
        if !rest.starts_with("//") {
            return Ok(Resource::File(FileResource::new(rest)));
        }
        let url = Url::parse(location).map_err(|e| ResourceError::malformed(location, e.to_string()))?;
        let path = url
            .to_file_path()
            .map_err(|_| ResourceError::malformed(location, "not a local file URL"))?;
        Ok(Resource::File(FileResource::new(path)))
    }
}

impl ResourceLoader for DefaultResourceLoader {
    fn get_resource(&self, location: &str) -> ResourceResult<Resource> {
        if location.starts_with(AGGREGATE_PREFIX) {
            return Err(ResourceError::malformed(
                location,
                "aggregate locations can only be discovered, not loaded",
            ));
        }
        if let Some(name) = location.strip_prefix(NAMESPACE_PREFIX) {
            return Ok(Resource::Namespace(NamespaceResource::new(
                name,
                self.namespace.clone(),
            )));
        }
        if let Some(rest) = location.strip_prefix(FILE_PREFIX) {
            return self.file_location(location, rest);
        }
        if let Some(url) = parse_absolute_url(location) {
            return Ok(Resource::Url(self.url_resource(url)));
        }
        Ok(match self.policy {
            LoaderPolicy::NamespaceFirst => {
                Resource::Namespace(NamespaceResource::new(location, self.namespace.clone()))
            }
            LoaderPolicy::FilesystemFirst => Resource::File(FileResource::new(location)),
        })
    }

    fn namespace(&self) -> &Arc<Namespace> {
        &self.namespace
    }
}

impl fmt::Debug for DefaultResourceLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultResourceLoader")
            .field("namespace", &self.namespace)
            .field("policy", &self.policy)
            .field("fetcher", &self.fetcher.is_some())
            .finish()
    }
}

/// Parse `location` as an absolute URL. Single-letter schemes are rejected so
/// that Windows drive paths (`C:\lib`) stay filesystem paths.
fn parse_absolute_url(location: &str) -> Option<Url> {
    let url = Url::parse(location).ok()?;
    (url.scheme().len() > 1).then_some(url)
}
