//! Glob path matching with `?`, `*`, `**` and `{name}` / `{name:regex}`
//! template segments.
//!
//! ```
//! use classglob_matcher::GlobMatcher;
//!
//! let matcher = GlobMatcher::new();
//! assert!(matcher.is_match("com/**/*.jsp", "com/acme/web/index.jsp"));
//! assert!(!matcher.is_match("com/*.jsp", "com/acme/index.jsp"));
//! ```

pub mod comparator;
pub mod error;
pub mod matcher;
pub mod segment;

pub use comparator::PatternComparator;
pub use error::MatchError;
pub use matcher::{DEFAULT_CACHE_CAPACITY, DEFAULT_SEPARATOR, GlobMatcher, PatternCache};
pub use segment::SegmentMatcher;
