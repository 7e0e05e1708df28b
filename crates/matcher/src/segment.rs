//! Matching of a single path segment against one pattern segment.

use crate::error::MatchError;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

/// `?`, `*`, or a `{...}` template token (one level of nested braces allowed
/// so that `{id:\d{3}}` works).
static GLOB_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\?|\*|\{((?:\{[^/]+?\}|[^/{}]|\\[{}])+?)\}").expect("glob token regex is valid")
});

/// Expression used for `{name}` without an explicit sub-pattern.
const DEFAULT_VARIABLE_PATTERN: &str = "((?s).*)";

#[derive(Debug)]
enum Kind {
    /// No wildcard or template: plain string comparison
    Exact,
    Expression {
        regex: Regex,
        variables: Vec<String>,
    },
}

/// Compiled form of one pattern segment
#[derive(Debug)]
pub struct SegmentMatcher {
    raw: String,
    case_sensitive: bool,
    kind: Kind,
}

impl SegmentMatcher {
    pub fn compile(segment: &str, case_sensitive: bool) -> Result<Self, MatchError> {
        let mut expression = String::with_capacity(segment.len() + 8);
        let mut variables = Vec::new();
        let mut end = 0;

        for caps in GLOB_TOKEN.captures_iter(segment) {
            let Some(token) = caps.get(0) else {
                continue;
            };
            expression.push_str(&regex::escape(&segment[end..token.start()]));
            match token.as_str() {
                "?" => expression.push('.'),
                "*" => expression.push_str(".*"),
                template => {
                    // Strip the surrounding braces
                    let body = &template[1..template.len() - 1];
                    match body.find(':') {
                        None => {
                            expression.push_str(DEFAULT_VARIABLE_PATTERN);
                            variables.push(body.to_string());
                        }
                        Some(colon) => {
                            expression.push('(');
                            expression.push_str(&body[colon + 1..]);
                            expression.push(')');
                            variables.push(body[..colon].to_string());
                        }
                    }
                }
            }
            end = token.end();
        }

        if end == 0 {
            return Ok(Self {
                raw: segment.to_string(),
                case_sensitive,
                kind: Kind::Exact,
            });
        }

        expression.push_str(&regex::escape(&segment[end..]));
        let regex = RegexBuilder::new(&format!("^(?:{expression})$"))
            .dot_matches_new_line(true)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| MatchError::InvalidTemplate {
                segment: segment.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            raw: segment.to_string(),
            case_sensitive,
            kind: Kind::Expression { regex, variables },
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Names of the template variables in declaration order
    pub fn variables(&self) -> &[String] {
        match &self.kind {
            Kind::Exact => &[],
            Kind::Expression { variables, .. } => variables,
        }
    }

    /// Match `text` and, when `captures` is given, record template variables.
    pub fn matches(
        &self,
        text: &str,
        captures: Option<&mut HashMap<String, String>>,
    ) -> Result<bool, MatchError> {
        match &self.kind {
            Kind::Exact => Ok(if self.case_sensitive {
                self.raw == text
            } else {
                self.raw.to_lowercase() == text.to_lowercase()
            }),
            Kind::Expression { regex, variables } => {
                let Some(caps) = regex.captures(text) else {
                    return Ok(false);
                };
                if let Some(captures) = captures {
                    let groups = caps.len() - 1;
                    if groups != variables.len() {
                        return Err(MatchError::CaptureCountMismatch {
                            segment: self.raw.clone(),
                            variables: variables.len(),
                            groups,
                        });
                    }
                    for (i, name) in variables.iter().enumerate() {
                        let value = caps.get(i + 1).map(|m| m.as_str()).unwrap_or_default();
                        captures.insert(name.clone(), value.to_string());
                    }
                }
                Ok(true)
            }
        }
    }
}
