pub mod cache;
pub mod error;

// Re-export commonly used types
pub use cache::{BoundedCache, CacheStats};
pub use error::{ResourceError, ResourceResult};
