//! Unified Result Model
//!
//! Every action (client dispatch, built-in resolution, doctor) maps its outcome
//! to this model before rendering output.

use serde::{Deserialize, Serialize};

use crate::locator::{Locator, LocatorKind};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Url,
    Tool,
    Command,
    Error,
}

/// Inclusive 1-based line range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeLine {
    pub start: u32,
    pub end: u32,
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Program that produced the URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolver: Option<String>,

    /// Whether the URL was placed on the clipboard
    #[serde(default)]
    pub copied: bool,

    /// Whether the URL was opened in a browser
    #[serde(default)]
    pub opened: bool,
}

/// Error information for a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcsError {
    pub code: String,
    pub message: String,
}

impl VcsError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for VcsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// The unified result item that all commands must produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    /// The kind of this result
    pub kind: Kind,

    /// Locator string as passed to the resolver
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,

    /// Which locator variant was resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator_kind: Option<LocatorKind>,

    /// Line range, for line-range locators
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeLine>,

    /// Resolved URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Free-form text (tool status, command description)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Metadata
    pub meta: Meta,

    /// Errors (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<VcsError>,
}

impl ResultItem {
    fn empty(kind: Kind) -> Self {
        Self {
            kind,
            locator: None,
            locator_kind: None,
            range: None,
            url: None,
            excerpt: None,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create a resolved URL result for a locator
    pub fn url(locator: &Locator, url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::for_locator(Kind::Url, locator)
        }
    }

    /// Create an error result
    pub fn error(error: VcsError) -> Self {
        Self {
            errors: vec![error],
            ..Self::empty(Kind::Error)
        }
    }

    /// Create an error result attached to the locator that failed
    pub fn locator_error(locator: &Locator, error: VcsError) -> Self {
        Self {
            errors: vec![error],
            ..Self::for_locator(Kind::Error, locator)
        }
    }

    /// Create a tool availability result
    pub fn tool(excerpt: impl Into<String>) -> Self {
        Self {
            excerpt: Some(excerpt.into()),
            ..Self::empty(Kind::Tool)
        }
    }

    /// Create a command table entry result
    pub fn command(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            locator: Some(name.into()),
            excerpt: Some(description.into()),
            ..Self::empty(Kind::Command)
        }
    }

    fn for_locator(kind: Kind, locator: &Locator) -> Self {
        let range = match locator {
            Locator::LineRange { start, end, .. } => Some(RangeLine {
                start: *start,
                end: *end,
            }),
            _ => None,
        };
        Self {
            locator: Some(locator.to_arg()),
            locator_kind: Some(locator.kind()),
            range,
            ..Self::empty(kind)
        }
    }

    /// Set metadata
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Add an error
    pub fn with_error(mut self, error: VcsError) -> Self {
        self.errors.push(error);
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == Kind::Error || !self.errors.is_empty()
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(ResultItem::is_error)
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultItem;
    type IntoIter = std::vec::IntoIter<ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// The URL a resolver produced: the first token of its output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedUrl(String);

impl ResolvedUrl {
    /// Take the first whitespace-delimited token of `text`, if any
    pub fn from_output(text: &str) -> Option<Self> {
        crate::core::util::first_token(text).map(|t| ResolvedUrl(t.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResolvedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ResolvedUrl {
    fn from(url: String) -> Self {
        ResolvedUrl(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_url_item_for_line_range() {
        let locator = Locator::line_range(PathBuf::from("/repo/src/lib.rs"), 3, 9).unwrap();
        let item = ResultItem::url(&locator, "https://example.com/x");

        assert_eq!(item.kind, Kind::Url);
        assert_eq!(item.locator.as_deref(), Some("/repo/src/lib.rs:3,9"));
        assert_eq!(item.locator_kind, Some(LocatorKind::LineRange));
        assert_eq!(item.range, Some(RangeLine { start: 3, end: 9 }));
        assert!(!item.is_error());
    }

    #[test]
    fn test_error_item_serialization() {
        let item = ResultItem::error(VcsError::new("EMPTY_OUTPUT", "no token"));
        let json = serde_json::to_string(&item).unwrap();

        assert!(json.contains("\"kind\":\"error\""));
        assert!(json.contains("\"code\":\"EMPTY_OUTPUT\""));
        assert!(!json.contains("\"url\""));
    }

    #[test]
    fn test_resolved_url_from_output() {
        let url = ResolvedUrl::from_output("https://example.com/x/y extra text\n").unwrap();
        assert_eq!(url.as_str(), "https://example.com/x/y");
        assert!(ResolvedUrl::from_output("\n\n").is_none());
    }

    #[test]
    fn test_result_set_has_errors() {
        let mut set = ResultSet::new();
        assert!(!set.has_errors());

        set.push(ResultItem::tool("git found"));
        assert!(!set.has_errors());

        set.push(ResultItem::tool("xclip").with_error(VcsError::new("MISSING_DEPENDENCY", "x")));
        assert!(set.has_errors());
        assert_eq!(set.len(), 2);
    }
}
