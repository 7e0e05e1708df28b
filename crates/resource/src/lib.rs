//! Read-only resource handles over filesystem paths, URLs (including entries
//! inside jar/zip archives) and namespace-relative names, plus the loader that
//! turns a single location string into a handle.

pub mod archive;
pub mod file;
pub mod loader;
pub mod namespace;
pub mod path;
pub mod resource;
pub mod url;

pub use archive::ArchiveLocation;
pub use file::FileResource;
pub use loader::{
    AGGREGATE_PREFIX, DefaultResourceLoader, FILE_PREFIX, LoaderPolicy, NAMESPACE_PREFIX,
    ResourceLoader,
};
pub use namespace::{Namespace, NamespaceResource, NamespaceRoot};
pub use resource::Resource;
pub use url::{RemoteFetcher, RemoteMetadata, UrlResource};
