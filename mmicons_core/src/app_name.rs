use std::fmt::{Display, Formatter};

const NAME_SEPARATOR: char = ',';
const RESERVED_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
const REPLACEMENT_CHAR: char = '_';

/// One application name as read from a home-screen screenshot.
///
/// The value is kept exactly as the remote model produced it (after trimming), it is
/// only sanitized when turned into a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppName(String);

impl AppName {
    pub fn new(name: impl Into<String>) -> AppName {
        AppName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits a comma separated model answer into names, keeping order and duplicates.
    /// Blank tokens (e.g. a trailing comma) are dropped.
    pub fn parse_list(content: &str) -> Vec<AppName> {
        content
            .split(NAME_SEPARATOR)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(AppName::new)
            .collect()
    }

    /// Returns a file stem safe to join to an output directory, or `None` when the
    /// name has nothing usable left once separators and reserved characters are removed.
    pub fn file_stem(&self) -> Option<String> {
        let usable: String = self.0
            .chars()
            .filter(|c| !AppName::is_unsafe(*c))
            .collect();

        if AppName::trim_stem(&usable.replace("..", "")).is_empty() {
            return None;
        }

        let replaced: String = self.0
            .chars()
            .map(|c| if AppName::is_unsafe(c) { REPLACEMENT_CHAR } else { c })
            .collect();

        Some(AppName::trim_stem(&replaced.replace("..", "__")).to_string())
    }

    fn is_unsafe(c: char) -> bool {
        c.is_control() || RESERVED_CHARS.contains(&c)
    }

    fn trim_stem(stem: &str) -> &str {
        stem.trim().trim_start_matches('.').trim()
    }
}

impl Display for AppName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AppName {
    fn from(name: &str) -> Self {
        AppName::new(name)
    }
}

impl From<String> for AppName {
    fn from(name: String) -> Self {
        AppName(name)
    }
}
