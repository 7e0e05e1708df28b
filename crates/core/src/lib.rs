//! Glob-pattern resource discovery across filesystem trees, archives and
//! layered namespaces.
//!
//! ```no_run
//! use classglob_core::{DiscoveryConfig, ResourceDiscovery};
//!
//! let engine = ResourceDiscovery::from_config(&DiscoveryConfig::from_env());
//! for resource in &engine.resolve("classpath*:META-INF/**/*.properties")? {
//!     println!("{resource}");
//! }
//! # Ok::<(), classglob_core::DiscoveryError>(())
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;

pub use config::DiscoveryConfig;
pub use discovery::{
    ArchiveIndexCache, DirEntry, DirectorySource, LocalDirectories, ResourceDiscovery,
    ResourceDiscoveryBuilder, ResourceSet, SkippedRoot,
};
pub use error::{DiscoveryError, DiscoveryResult};

pub use classglob_matcher::GlobMatcher;
pub use classglob_resource::{LoaderPolicy, Namespace, Resource, ResourceLoader};
