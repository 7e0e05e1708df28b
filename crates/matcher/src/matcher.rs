//! Segment-wise glob matcher.
//!
//! Patterns and paths are split on the separator (empty tokens dropped) and
//! compared segment by segment:
//! 1. Leading segments are matched until the first `**`
//! 2. Trailing segments are matched back to the last `**`
//! 3. Runs of segments between interior `**` are placed at the first window
//!    of the remaining path where every segment matches

use crate::comparator::PatternComparator;
use crate::error::MatchError;
use crate::segment::SegmentMatcher;
use classglob_api::{BoundedCache, CacheStats};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;

pub const DEFAULT_SEPARATOR: &str = "/";

/// Default number of entries kept by each cache of a [`PatternCache`]
pub const DEFAULT_CACHE_CAPACITY: usize = 65536;

const DOUBLE_WILDCARD: &str = "**";

type Variables = HashMap<String, String>;

/// Memoized pattern tokenizations and compiled segment matchers.
///
/// Both caches are keyed by the matcher options that influence the cached
/// value, so one `PatternCache` may be shared by matchers configured
/// differently. Eviction follows [`BoundedCache`]: oldest insertion first.
#[derive(Debug)]
pub struct PatternCache {
    tokens: BoundedCache<(String, String, bool), Arc<[String]>>,
    segments: BoundedCache<(String, bool), Arc<SegmentMatcher>>,
}

impl PatternCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            tokens: BoundedCache::new(capacity),
            segments: BoundedCache::new(capacity),
        }
    }

    pub fn token_stats(&self) -> CacheStats {
        self.tokens.stats()
    }

    pub fn segment_stats(&self) -> CacheStats {
        self.segments.stats()
    }

    pub fn clear(&self) {
        self.tokens.clear();
        self.segments.clear();
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

/// Glob path matcher
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    separator: String,
    case_sensitive: bool,
    trim_tokens: bool,
    cache: Option<Arc<PatternCache>>,
    /// Patterns already reported as invalid; shared between clones
    reported: Arc<Mutex<HashSet<String>>>,
}

impl GlobMatcher {
    /// Matcher with `/` separator and its own cache of default capacity
    pub fn new() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            case_sensitive: true,
            trim_tokens: false,
            cache: Some(Arc::new(PatternCache::default())),
            reported: Arc::default(),
        }
    }

    /// Matcher that recompiles every segment on each call
    pub fn uncached() -> Self {
        Self::new().without_cache()
    }

    /// Use a different separator. An empty separator keeps `/`.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        if !separator.is_empty() {
            self.separator = separator;
        }
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Trim whitespace around tokens before matching
    pub fn with_trim_tokens(mut self, trim_tokens: bool) -> Self {
        self.trim_tokens = trim_tokens;
        self
    }

    /// Share an externally owned cache
    pub fn with_cache(mut self, cache: Arc<PatternCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn cache(&self) -> Option<&Arc<PatternCache>> {
        self.cache.as_ref()
    }

    /// Whether `path` contains wildcard or template syntax
    pub fn is_pattern(&self, path: &str) -> bool {
        let mut template_open = false;
        for c in path.chars() {
            match c {
                '*' | '?' => return true,
                '{' => template_open = true,
                '}' if template_open => return true,
                _ => {}
            }
        }
        false
    }

    /// Full match of `path` against `pattern`.
    ///
    /// A malformed `{name:regex}` segment never matches.
    pub fn is_match(&self, pattern: &str, path: &str) -> bool {
        self.do_match(pattern, path, true, None)
            .unwrap_or_else(|e| self.report_invalid(pattern, &e))
    }

    /// Whether `path` could be the start of something `pattern` matches.
    pub fn match_start(&self, pattern: &str, path: &str) -> bool {
        self.do_match(pattern, path, false, None)
            .unwrap_or_else(|e| self.report_invalid(pattern, &e))
    }

    /// Warn about an unusable pattern the first time it is seen
    fn report_invalid(&self, pattern: &str, error: &MatchError) -> bool {
        let mut reported = self.reported.lock().unwrap_or_else(PoisonError::into_inner);
        if reported.insert(pattern.to_string()) {
            warn!("Pattern {:?} cannot be evaluated: {}", pattern, error);
        }
        false
    }

    /// Template variables captured when `path` matches `pattern`.
    pub fn extract_variables(
        &self,
        pattern: &str,
        path: &str,
    ) -> Result<HashMap<String, String>, MatchError> {
        let mut variables = HashMap::new();
        if !self.do_match(pattern, path, true, Some(&mut variables))? {
            return Err(MatchError::NoMatch {
                pattern: pattern.to_string(),
                path: path.to_string(),
            });
        }
        Ok(variables)
    }

    /// The portion of `path` covered by the wildcard part of `pattern`.
    ///
    /// `("/docs/cvs/*.html", "/docs/cvs/commit.html")` gives `"commit.html"`,
    /// `("/docs/**", "/docs/cvs/commit.html")` gives `"cvs/commit.html"`.
    pub fn extract_path_within_pattern(&self, pattern: &str, path: &str) -> String {
        let pattern_parts = self.tokenize(pattern);
        let path_parts = self.tokenize(path);
        let mut out = String::new();
        let mut started = false;

        let mut segment = 0;
        while segment < pattern_parts.len() {
            let part = pattern_parts[segment];
            if part.contains('*') || part.contains('?') {
                while segment < path_parts.len() {
                    if started || (segment == 0 && !pattern.starts_with(&self.separator)) {
                        out.push_str(&self.separator);
                    }
                    out.push_str(path_parts[segment]);
                    started = true;
                    segment += 1;
                }
            }
            segment += 1;
        }
        out
    }

    /// Comparator ordering patterns by how specifically they match `path`
    pub fn comparator(&self, path: &str) -> PatternComparator {
        PatternComparator::new(path, &self.separator)
    }

    fn do_match(
        &self,
        pattern: &str,
        path: &str,
        full_match: bool,
        mut vars: Option<&mut Variables>,
    ) -> Result<bool, MatchError> {
        let sep = self.separator.as_str();
        if path.starts_with(sep) != pattern.starts_with(sep) {
            return Ok(false);
        }

        let patt_dirs = self.tokenize_pattern(pattern);
        let path_dirs = self.tokenize(path);

        // Half-open ranges [start, end)
        let (mut patt_start, mut patt_end) = (0, patt_dirs.len());
        let (mut path_start, mut path_end) = (0, path_dirs.len());

        // Match all elements up to the first **
        while patt_start < patt_end && path_start < path_end {
            let patt_dir = &patt_dirs[patt_start];
            if patt_dir == DOUBLE_WILDCARD {
                break;
            }
            if !self.match_segment(patt_dir, path_dirs[path_start], vars.as_deref_mut())? {
                return Ok(false);
            }
            patt_start += 1;
            path_start += 1;
        }

        if path_start >= path_end {
            // Path exhausted
            if patt_start >= patt_end {
                return Ok(pattern.ends_with(sep) == path.ends_with(sep));
            }
            if !full_match {
                return Ok(true);
            }
            if patt_start + 1 == patt_end && patt_dirs[patt_start] == "*" && path.ends_with(sep) {
                return Ok(true);
            }
            return Ok(only_double_wildcards(&patt_dirs[patt_start..patt_end]));
        } else if patt_start >= patt_end {
            // Pattern exhausted but path is not
            return Ok(false);
        } else if !full_match && patt_dirs[patt_start] == DOUBLE_WILDCARD {
            return Ok(true);
        }

        // Match trailing elements back to the last **
        while patt_start < patt_end && path_start < path_end {
            let patt_dir = &patt_dirs[patt_end - 1];
            if patt_dir == DOUBLE_WILDCARD {
                break;
            }
            if !self.match_segment(patt_dir, path_dirs[path_end - 1], vars.as_deref_mut())? {
                return Ok(false);
            }
            if patt_end == patt_dirs.len() && pattern.ends_with(sep) != path.ends_with(sep) {
                return Ok(false);
            }
            patt_end -= 1;
            path_end -= 1;
        }

        if path_start >= path_end {
            return Ok(only_double_wildcards(&patt_dirs[patt_start..patt_end]));
        }

        // patt_dirs[patt_start] and patt_dirs[patt_end - 1] are both ** here
        while patt_start + 1 != patt_end && path_start < path_end {
            let next_double = (patt_start + 1..patt_end)
                .find(|&i| patt_dirs[i] == DOUBLE_WILDCARD)
                .unwrap_or(patt_end - 1);
            if next_double == patt_start + 1 {
                // '**/**', skip one
                patt_start += 1;
                continue;
            }

            let run_len = next_double - patt_start - 1;
            let remaining = path_end - path_start;
            let mut found = None;

            if run_len <= remaining {
                'window: for offset in 0..=remaining - run_len {
                    for j in 0..run_len {
                        let sub_pattern = &patt_dirs[patt_start + j + 1];
                        let sub_path = path_dirs[path_start + offset + j];
                        if !self.match_segment(sub_pattern, sub_path, vars.as_deref_mut())? {
                            continue 'window;
                        }
                    }
                    found = Some(path_start + offset);
                    break;
                }
            }

            let Some(found) = found else {
                return Ok(false);
            };
            patt_start = next_double;
            path_start = found + run_len;
        }

        Ok(only_double_wildcards(&patt_dirs[patt_start..patt_end]))
    }

    fn match_segment(
        &self,
        pattern: &str,
        text: &str,
        vars: Option<&mut Variables>,
    ) -> Result<bool, MatchError> {
        match &self.cache {
            Some(cache) => {
                let matcher = cache
                    .segments
                    .get_or_insert_with((pattern.to_string(), self.case_sensitive), || {
                        SegmentMatcher::compile(pattern, self.case_sensitive).map(Arc::new)
                    })?;
                matcher.matches(text, vars)
            }
            None => SegmentMatcher::compile(pattern, self.case_sensitive)?.matches(text, vars),
        }
    }

    fn tokenize_pattern(&self, pattern: &str) -> Arc<[String]> {
        let compute = || -> Arc<[String]> {
            self.tokenize(pattern)
                .into_iter()
                .map(str::to_string)
                .collect()
        };
        match &self.cache {
            Some(cache) => {
                let key = (pattern.to_string(), self.separator.clone(), self.trim_tokens);
                if let Some(tokens) = cache.tokens.get(&key) {
                    return tokens;
                }
                let tokens = compute();
                cache.tokens.insert(key, tokens.clone());
                tokens
            }
            None => compute(),
        }
    }

    fn tokenize<'a>(&self, path: &'a str) -> Vec<&'a str> {
        path.split(self.separator.as_str())
            .map(|token| if self.trim_tokens { token.trim() } else { token })
            .filter(|token| !token.is_empty())
            .collect()
    }
}

impl Default for GlobMatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn only_double_wildcards(segments: &[String]) -> bool {
    segments.iter().all(|s| s == DOUBLE_WILDCARD)
}
