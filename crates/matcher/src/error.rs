use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("pattern \"{pattern}\" is not a match for \"{path}\"")]
    NoMatch { pattern: String, path: String },
    #[error(
        "segment \"{segment}\" declares {variables} template variable(s) but its expression has \
         {groups} capturing group(s); use non-capturing groups (?:...) inside templates"
    )]
    CaptureCountMismatch {
        segment: String,
        variables: usize,
        groups: usize,
    },
    #[error("invalid template expression in segment \"{segment}\": {reason}")]
    InvalidTemplate { segment: String, reason: String },
}
