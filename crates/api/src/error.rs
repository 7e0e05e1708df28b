use std::io;

/// Failure taxonomy shared by every layer that touches a resource.
///
/// `NotFound` and `Unreadable` are kept apart so callers can tell an absent
/// resource from one that exists but cannot be read.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("Not found: {description}")]
    NotFound { description: String },
    #[error("Unreadable: {description}: {source}")]
    Unreadable {
        description: String,
        #[source]
        source: io::Error,
    },
    #[error("Malformed location expression '{location}': {reason}")]
    MalformedExpression { location: String, reason: String },
    #[error("I/O failure while scanning {root}: {source}")]
    BackingIo {
        root: String,
        #[source]
        source: io::Error,
    },
}

impl ResourceError {
    pub fn not_found(description: impl Into<String>) -> Self {
        ResourceError::NotFound {
            description: description.into(),
        }
    }

    pub fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        ResourceError::MalformedExpression {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub fn backing_io(root: impl Into<String>, source: io::Error) -> Self {
        ResourceError::BackingIo {
            root: root.into(),
            source,
        }
    }

    /// Classify an I/O error raised while probing or opening a single resource.
    pub fn from_io(description: impl Into<String>, err: io::Error) -> Self {
        let description = description.into();
        if err.kind() == io::ErrorKind::NotFound {
            ResourceError::NotFound { description }
        } else {
            ResourceError::Unreadable {
                description,
                source: err,
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ResourceError::NotFound { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ResourceError::MalformedExpression { .. })
    }
}

pub type ResourceResult<T> = std::result::Result<T, ResourceError>;
