//! Specificity ordering of patterns relative to one concrete path.

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

static TEMPLATE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^/]+?\}").expect("template token regex is valid"));

/// Orders patterns so that the most specific match for `path` comes first.
///
/// Rules, in order:
/// - the catch-all `/**` is last
/// - a pattern equal to the path is first
/// - prefix patterns (`.../**`) come after patterns without `**`
/// - fewer templates + wildcards (a `**` counts twice) first
/// - longer pattern first, each template counting as one character
/// - fewer `*`, then fewer templates, first
#[derive(Debug, Clone)]
pub struct PatternComparator {
    path: String,
    separator: String,
}

impl PatternComparator {
    pub fn new(path: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            separator: separator.into(),
        }
    }

    pub fn compare(&self, pattern1: &str, pattern2: &str) -> Ordering {
        let info1 = PatternInfo::new(pattern1, &self.separator);
        let info2 = PatternInfo::new(pattern2, &self.separator);

        match (info1.catch_all, info2.catch_all) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }

        match (pattern1 == self.path, pattern2 == self.path) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        if info1.prefix && info2.prefix {
            return info2.length.cmp(&info1.length);
        } else if info1.prefix && info2.double_wildcards == 0 {
            return Ordering::Greater;
        } else if info2.prefix && info1.double_wildcards == 0 {
            return Ordering::Less;
        }

        info1
            .total_count()
            .cmp(&info2.total_count())
            .then_with(|| info2.length.cmp(&info1.length))
            .then_with(|| info1.single_wildcards.cmp(&info2.single_wildcards))
            .then_with(|| info1.templates.cmp(&info2.templates))
    }

    /// Sort `patterns` in place, most specific first
    pub fn sort<S: AsRef<str>>(&self, patterns: &mut [S]) {
        patterns.sort_by(|a, b| self.compare(a.as_ref(), b.as_ref()));
    }
}

#[derive(Debug, Default)]
struct PatternInfo {
    templates: usize,
    single_wildcards: usize,
    double_wildcards: usize,
    catch_all: bool,
    prefix: bool,
    length: usize,
}

impl PatternInfo {
    fn new(pattern: &str, separator: &str) -> Self {
        let catch_all_pattern = format!("{separator}**");
        let catch_all = pattern == catch_all_pattern;
        let mut info = Self {
            catch_all,
            prefix: !catch_all && pattern.ends_with(&catch_all_pattern),
            ..Self::default()
        };

        let bytes = pattern.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() {
            match bytes[pos] {
                b'{' => {
                    info.templates += 1;
                    pos += 1;
                }
                b'*' if bytes.get(pos + 1) == Some(&b'*') => {
                    info.double_wildcards += 1;
                    pos += 2;
                }
                // A leading `*`, or the `*` of a trailing `.*`, is not counted
                b'*' if pos > 0 && &bytes[pos - 1..] != b".*" => {
                    info.single_wildcards += 1;
                    pos += 1;
                }
                _ => pos += 1,
            }
        }

        info.length = if info.templates == 0 {
            pattern.chars().count()
        } else {
            TEMPLATE_TOKEN.replace_all(pattern, "#").chars().count()
        };
        info
    }

    fn total_count(&self) -> usize {
        self.templates + self.single_wildcards + 2 * self.double_wildcards
    }
}
