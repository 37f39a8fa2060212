//! Remote origin parsing
//!
//! Accepts URL form (`https://host/path`, `ssh://user@host/path`,
//! `github:user/repo`), scp-like form (`git@host:path`) and plain paths.

use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;
use url::Url;

/// `origin <url> (fetch)` line of `git remote -v`
static ORIGIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^origin(.*)\(fetch\)$").expect("Invalid ORIGIN_RE regex"));

/// scp-like remote: `[user@]host:path`
static SCP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:([^@/:]+)@)?([^@/:]+):(.*)$").expect("Invalid SCP_RE regex")
});

/// Schemes that are shorthands rather than hosts
const SHORTHAND_SCHEMES: &[&str] = &["github", "gh", "kiln"];

/// A parsed remote location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub scheme: Option<String>,
    pub user: Option<String>,
    pub host: Option<String>,
    pub path: String,
}

impl Origin {
    fn plain(path: &str) -> Self {
        Self {
            scheme: None,
            user: None,
            host: None,
            path: path.to_string(),
        }
    }

    fn from_url(url: &Url) -> Self {
        Self {
            scheme: Some(url.scheme().to_string()),
            user: Some(url.username().to_string()).filter(|u| !u.is_empty()),
            host: url.host_str().map(str::to_string),
            path: url.path().to_string(),
        }
    }

    /// Path with leading slashes and a trailing `.git` removed
    pub fn trimmed_path(&self) -> &str {
        let path = self.path.trim_start_matches('/').trim_end_matches('/');
        path.strip_suffix(".git").unwrap_or(path)
    }

    pub fn scheme_is(&self, candidates: &[&str]) -> bool {
        self.scheme
            .as_deref()
            .map(|s| candidates.iter().any(|c| s.eq_ignore_ascii_case(c)))
            .unwrap_or(false)
    }

    pub fn host_contains(&self, needle: &str) -> bool {
        self.host
            .as_deref()
            .map(|h| h.to_ascii_lowercase().contains(needle))
            .unwrap_or(false)
    }
}

impl FromStr for Origin {
    type Err = url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.contains("://") {
            return Url::parse(s).map(|url| Self::from_url(&url));
        }

        if let Some(caps) = SCP_RE.captures(s) {
            let host = &caps[2];
            if !SHORTHAND_SCHEMES.contains(&host.to_ascii_lowercase().as_str()) {
                return Ok(Self {
                    scheme: None,
                    user: caps.get(1).map(|m| m.as_str().to_string()),
                    host: Some(host.to_string()),
                    path: caps[3].to_string(),
                });
            }
        }

        match Url::parse(s) {
            Ok(url) => Ok(Self::from_url(&url)),
            Err(_) => Ok(Self::plain(s)),
        }
    }
}

/// Find the `origin` fetch URL in `git remote -v` output
pub fn find_origin(remote_output: &str) -> Option<&str> {
    remote_output.lines().find_map(|line| {
        ORIGIN_RE
            .captures(line.trim_end())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|url| !url.is_empty())
    })
}
