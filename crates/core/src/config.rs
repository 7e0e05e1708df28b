//! Engine configuration.
//!
//! Every field has a default, so a JSON file only needs to name what it
//! changes:
//!
//! ```json
//! { "case_sensitive": false, "namespace_roots": ["build/classes", "lib/app.jar"] }
//! ```

use crate::error::{DiscoveryError, DiscoveryResult};
use classglob_matcher::{DEFAULT_CACHE_CAPACITY, DEFAULT_SEPARATOR, GlobMatcher, PatternCache};
use classglob_resource::{LoaderPolicy, Namespace};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Environment variable holding a platform path list of namespace roots
pub const PATH_ENV: &str = "CLASSGLOB_PATH";

pub const DEFAULT_ARCHIVE_CACHE_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub separator: String,
    pub case_sensitive: bool,
    pub trim_tokens: bool,
    /// Compiled pattern segments kept in memory; 0 disables the cache
    pub pattern_cache_capacity: usize,
    /// Archive entry listings kept in memory; 0 disables the cache
    pub archive_cache_capacity: usize,
    pub loader_policy: LoaderPolicy,
    pub namespace_roots: Vec<PathBuf>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            case_sensitive: true,
            trim_tokens: false,
            pattern_cache_capacity: DEFAULT_CACHE_CAPACITY,
            archive_cache_capacity: DEFAULT_ARCHIVE_CACHE_CAPACITY,
            loader_policy: LoaderPolicy::default(),
            namespace_roots: Vec::new(),
        }
    }
}

impl DiscoveryConfig {
    pub fn from_json_str(json: &str) -> DiscoveryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> DiscoveryResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DiscoveryError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| DiscoveryError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Defaults, with namespace roots taken from `CLASSGLOB_PATH` when set
    pub fn from_env() -> Self {
        Self::default().with_env_roots()
    }

    /// Append the roots listed in `CLASSGLOB_PATH`, if any.
    pub fn with_env_roots(mut self) -> Self {
        if let Some(list) = std::env::var_os(PATH_ENV) {
            self.namespace_roots.extend(
                std::env::split_paths(&list).filter(|p| !p.as_os_str().is_empty()),
            );
        }
        self
    }

    pub fn matcher(&self) -> GlobMatcher {
        let matcher = GlobMatcher::uncached()
            .with_separator(self.separator.clone())
            .with_case_sensitive(self.case_sensitive)
            .with_trim_tokens(self.trim_tokens);
        if self.pattern_cache_capacity == 0 {
            matcher
        } else {
            matcher.with_cache(Arc::new(PatternCache::new(self.pattern_cache_capacity)))
        }
    }

    pub fn namespace(&self) -> Namespace {
        Namespace::new(self.namespace_roots.iter().cloned())
    }
}
